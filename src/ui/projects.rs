use crossterm::event::{KeyCode, KeyEvent};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Spans,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::models::{Project, ProjectId};

const HEADER: [&str; 4] = ["#", "Project Name", "Client Name", "Deadline"];

const COLUMN_WIDTHS: [Constraint; 4] = [
    Constraint::Length(6),
    Constraint::Percentage(35),
    Constraint::Percentage(35),
    Constraint::Percentage(20),
];

// Represents the state of the project table
pub struct ProjectsState {
    projects: Vec<Project>,
    table_state: TableState,
}

impl ProjectsState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut state = Self {
            projects: Vec::new(),
            table_state: TableState::default(),
        };
        state.replace(projects);
        state
    }

    /// Swap in a freshly fetched list, keeping the cursor in range
    pub fn replace(&mut self, projects: Vec<Project>) {
        self.projects = projects;

        let selected = match (self.table_state.selected(), self.projects.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
        self.table_state.select(selected);
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.projects.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.projects.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_index().and_then(|i| self.projects.get(i))
    }
}

pub enum ProjectAction {
    Quit,
    NewProject,
    EditProject(Project),
    DeleteProject(ProjectId),
}

/// Cells of one row. The ordinal comes from the row position, never the id.
pub fn row_cells(index: usize, project: &Project) -> [String; 4] {
    [
        (index + 1).to_string(),
        project.project_name.clone(),
        project.client_name.clone(),
        project.deadline.clone(),
    ]
}

/// Alternating background by row parity
pub fn row_style(index: usize) -> Style {
    if index % 2 == 0 {
        Style::default()
    } else {
        Style::default().bg(Color::DarkGray)
    }
}

pub fn render_projects<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectsState) {
    // Create the layout
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let title = Paragraph::new("Admin Table")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    // Create and render the projects table
    if state.projects().is_empty() {
        let empty = Paragraph::new(vec![Spans::from(""), Spans::from("No projects yet.")])
            .alignment(Alignment::Center)
            .block(Block::default().title("Projects").borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
    } else {
        let header = Row::new(HEADER.iter().map(|h| Cell::from(*h))).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

        let rows = state.projects().iter().enumerate().map(|(i, project)| {
            Row::new(row_cells(i, project).into_iter().map(Cell::from)).style(row_style(i))
        });

        let table = Table::new(rows)
            .header(header)
            .block(Block::default().title("Projects").borders(Borders::ALL))
            .widths(&COLUMN_WIDTHS)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(table, chunks[1], &mut state.table_state);
    }

    // Create and render the buttons
    let buttons_text = if state.selected_project().is_some() {
        "<N> Add Project | <E> Edit | <D> Delete | <Up>/<Down> Select | <Q> Quit"
    } else {
        "<N> Add Project | <Q> Quit"
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[2]);
}

pub fn handle_key(state: &mut ProjectsState, key: KeyEvent) -> Option<ProjectAction> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(ProjectAction::Quit),
        KeyCode::Char('n') => return Some(ProjectAction::NewProject),
        KeyCode::Char('e') => {
            if let Some(project) = state.selected_project() {
                return Some(ProjectAction::EditProject(project.clone()));
            }
        }
        // Deletes immediately, there is no confirmation step
        KeyCode::Char('d') => {
            if let Some(project) = state.selected_project() {
                return Some(ProjectAction::DeleteProject(project.id.clone()));
            }
        }
        KeyCode::Down => state.next(),
        KeyCode::Up => state.previous(),
        _ => {}
    }

    None
}
