//! One session rendered as a selectable card

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::entities::Session;

/// Render-only view of a [`Session`]
pub struct SessionCard<'a> {
    pub session: &'a Session,
    pub selected: bool,
    pub confirmed: bool,
    pub focused: bool,
}

impl<'a> SessionCard<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            selected: false,
            confirmed: false,
            focused: false,
        }
    }

    /// `start to end`
    pub fn time_range(&self) -> String {
        format!("{} to {}", self.session.start_time, self.session.end_time)
    }

    pub fn lines(&self) -> Vec<Line<'static>> {
        let marker = if self.selected { "[x]" } else { "[ ]" };
        let style = if self.focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else if self.selected {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::White)
        };

        let mut header = vec![
            Span::styled(format!("{} ", marker), style),
            Span::styled(self.session.date.clone(), style.add_modifier(Modifier::BOLD)),
        ];
        if self.confirmed {
            header.push(Span::styled("  ✓ confirmed", Style::default().fg(Color::Green)));
        }

        vec![
            Line::from(header),
            Line::from(Span::styled(format!("    {}", self.time_range()), Style::default().fg(Color::Gray))),
        ]
    }
}
