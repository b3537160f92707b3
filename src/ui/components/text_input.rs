use crossterm::event::KeyCode;
use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Single-line free text field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextInputState {
    pub value: String,
}

impl TextInputState {
    pub fn new(value: impl Into<String>) -> Self {
        Self { value: value.into() }
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.value.push(c),
            KeyCode::Backspace => {
                self.value.pop();
            }
            _ => {}
        }
    }

    pub fn get_display_string(&self, focused: bool) -> String {
        if focused {
            format!("{}|", self.value)
        } else {
            self.value.clone()
        }
    }
}

pub fn render_text_input<B: Backend>(
    frame: &mut Frame<B>,
    area: Rect,
    label: &str,
    state: &TextInputState,
    focused: bool,
) {
    let (border_style, text_style) = if focused {
        (
            Style::default().fg(Color::Yellow),
            Style::default().add_modifier(Modifier::BOLD),
        )
    } else {
        (Style::default(), Style::default())
    };

    let input = Paragraph::new(Spans::from(Span::styled(
        state.get_display_string(focused),
        text_style,
    )))
    .block(
        Block::default()
            .title(Span::styled(label.to_string(), border_style))
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(input, area);
}
