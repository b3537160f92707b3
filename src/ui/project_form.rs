use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::models::{Project, ProjectId, ProjectInput};
use crate::ui::components::centered_rect;
use crate::ui::components::text_input::{render_text_input, TextInputState};

pub const VALIDATION_MESSAGE: &str = "All fields are required.";

pub enum ProjectFormAction {
    Cancel,
    Create(ProjectInput),
    Update(ProjectId, ProjectInput),
}

/// Whether the form creates a record or rewrites an existing one
#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Add,
    Edit(ProjectId),
}

#[derive(Debug, Clone, PartialEq, Copy)]
pub enum FormField {
    ProjectName,
    ClientName,
    Deadline,
}

impl FormField {
    const ALL: [FormField; 3] = [FormField::ProjectName, FormField::ClientName, FormField::Deadline];

    fn label(self) -> &'static str {
        match self {
            FormField::ProjectName => "Project Name",
            FormField::ClientName => "Client Name",
            FormField::Deadline => "Deadline (in days)",
        }
    }
}

/// Uncommitted edits of one record, shown as a modal over the list
pub struct ProjectFormState {
    mode: FormMode,
    project_name: TextInputState,
    client_name: TextInputState,
    deadline: TextInputState,
    current_field: FormField,
    error: Option<String>,
}

impl ProjectFormState {
    pub fn new() -> Self {
        Self {
            mode: FormMode::Add,
            project_name: TextInputState::default(),
            client_name: TextInputState::default(),
            deadline: TextInputState::default(),
            current_field: FormField::ProjectName,
            error: None,
        }
    }

    pub fn from_existing(project: &Project) -> Self {
        let ProjectInput {
            project_name,
            client_name,
            deadline,
        } = project.input();

        Self {
            mode: FormMode::Edit(project.id.clone()),
            project_name: TextInputState::new(project_name),
            client_name: TextInputState::new(client_name),
            deadline: TextInputState::new(deadline),
            current_field: FormField::ProjectName,
            error: None,
        }
    }

    pub fn current_field(&self) -> FormField {
        self.current_field
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> ProjectInput {
        ProjectInput {
            project_name: self.project_name.value.clone(),
            client_name: self.client_name.value.clone(),
            deadline: self.deadline.value.clone(),
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ProjectName => FormField::ClientName,
            FormField::ClientName => FormField::Deadline,
            FormField::Deadline => FormField::ProjectName,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::ProjectName => FormField::Deadline,
            FormField::ClientName => FormField::ProjectName,
            FormField::Deadline => FormField::ClientName,
        };
    }

    fn field(&self, field: FormField) -> &TextInputState {
        match field {
            FormField::ProjectName => &self.project_name,
            FormField::ClientName => &self.client_name,
            FormField::Deadline => &self.deadline,
        }
    }

    fn field_mut(&mut self, field: FormField) -> &mut TextInputState {
        match field {
            FormField::ProjectName => &mut self.project_name,
            FormField::ClientName => &mut self.client_name,
            FormField::Deadline => &mut self.deadline,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        let field = self.current_field;
        self.field_mut(field).handle_input(key);
    }

    /// Validate and turn the edits into a network action.
    ///
    /// An incomplete form keeps editing with the inline message set and
    /// yields nothing to send.
    pub fn submit(&mut self) -> Option<ProjectFormAction> {
        let input = self.input();
        if !input.is_complete() {
            self.error = Some(VALIDATION_MESSAGE.to_string());
            return None;
        }

        self.error = None;
        Some(match &self.mode {
            FormMode::Add => ProjectFormAction::Create(input),
            FormMode::Edit(id) => ProjectFormAction::Update(id.clone(), input),
        })
    }
}

impl Default for ProjectFormState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn render_project_form<B: Backend>(f: &mut Frame<B>, state: &ProjectFormState) {
    // Modal frame over the list
    let area = centered_rect(60, 70, f.size());

    let title = match state.mode {
        FormMode::Add => "Add New Project",
        FormMode::Edit(_) => "Edit Project",
    };
    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(Color::Cyan)))
        .borders(Borders::ALL);
    let inner = block.inner(area);

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    // Create the layout: three fields, message line, help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ]
            .as_ref(),
        )
        .split(inner);

    for (i, field) in FormField::ALL.iter().enumerate() {
        render_text_input(
            f,
            chunks[i],
            field.label(),
            state.field(*field),
            *field == state.current_field(),
        );
    }

    // Inline validation message
    if let Some(error) = state.error() {
        let message = Paragraph::new(error).style(Style::default().fg(Color::Red));
        f.render_widget(message, chunks[3]);
    }

    // Help text
    let submit_label = match state.mode {
        FormMode::Add => "Add Project",
        FormMode::Edit(_) => "Update Project",
    };
    let help = Paragraph::new(Spans::from(vec![
        Span::styled("<Enter> ", Style::default().fg(Color::Yellow)),
        Span::raw(submit_label),
        Span::raw(" | <Tab>/<Up>/<Down> Switch field | "),
        Span::styled("<Esc> ", Style::default().fg(Color::Yellow)),
        Span::raw("Cancel"),
    ]))
    .style(Style::default().fg(Color::Gray));
    f.render_widget(help, chunks[4]);
}

pub fn handle_key(state: &mut ProjectFormState, key: KeyEvent) -> Option<ProjectFormAction> {
    match key.code {
        KeyCode::Esc => return Some(ProjectFormAction::Cancel),
        KeyCode::Enter => return state.submit(),
        KeyCode::Tab | KeyCode::Down => state.next_field(),
        KeyCode::BackTab | KeyCode::Up => state.previous_field(),
        KeyCode::Char(_)
            if key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {}
        KeyCode::Char(_) | KeyCode::Backspace => state.edit_current_field(key.code),
        _ => {}
    }

    None
}
