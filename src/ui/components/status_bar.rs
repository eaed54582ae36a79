//! Status bar component

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::router::Route;
use crate::ui::core::Notice;

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Text shown for the current state, most urgent first
    pub fn status_text(route: &Route, notice: Option<&Notice>, active_tasks: usize) -> String {
        if let Some(notice) = notice {
            notice.text().to_string()
        } else if active_tasks > 0 {
            format!("🔄 Working ({} pending)...", active_tasks)
        } else {
            format!("{} • G: logs • Esc: back • Ctrl+C: quit", route.name())
        }
    }

    /// Render the status bar
    pub fn render(f: &mut Frame, area: Rect, route: &Route, notice: Option<&Notice>, active_tasks: usize) {
        let status_color = match notice {
            Some(notice) if notice.is_error() => Color::Red,
            Some(_) => Color::Green,
            None if active_tasks > 0 => Color::Yellow,
            None => Color::Gray,
        };

        let status_bar = Paragraph::new(Self::status_text(route, notice, active_tasks))
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color));

        f.render_widget(status_bar, area);
    }
}
