//! Password prompt shown before profile editing is unlocked

use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph},
    Frame,
};

use super::common::{self, shortcuts};
use crate::ui::components::text_input::TextInput;

#[derive(Debug, Default)]
pub struct PasswordDialog {
    pub input: TextInput,
    pub error: Option<String>,
}

impl PasswordDialog {
    pub fn new() -> Self {
        Self {
            input: TextInput::password(),
            error: None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let dialog_area = common::centered_rect(50, 9, area);
        f.render_widget(Clear, dialog_area);
        f.render_widget(
            common::create_dialog_block(" Confirm your password ", Color::Yellow),
            dialog_area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Length(1)])
            .split(dialog_area.inner(Margin {
                vertical: 1,
                horizontal: 1,
            }));

        f.render_widget(
            common::create_input_paragraph(self.input.display(), "Password", true),
            chunks[0],
        );
        if let Some(error) = &self.error {
            f.render_widget(Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)), chunks[1]);
        }
        f.render_widget(
            common::create_instructions_paragraph(&[
                shortcuts::ENTER_SUBMIT,
                shortcuts::SEPARATOR,
                shortcuts::ESC_CANCEL,
            ]),
            chunks[2],
        );
    }
}
