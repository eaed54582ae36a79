use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

use super::dialogs::common::{centered_rect, create_dialog_block};
use crate::constants::ROUTE_LOGIN_CHOICE;
use crate::router::Route;
use crate::ui::core::{Action, Component};

/// Panel for routes this client has no dedicated view for
pub struct Placeholder {
    route: Route,
}

impl Placeholder {
    pub fn new(route: Route) -> Self {
        Self { route }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn message(&self) -> String {
        match &self.route {
            Route::NotFound { path } => format!("Page not found: {}", path),
            Route::ForbiddenAccess => "You do not have access to this page".to_string(),
            route => format!("{} is not available in the terminal client yet", route.name()),
        }
    }
}

impl Component for Placeholder {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => Action::Back,
            KeyCode::Enter if matches!(self.route, Route::NotFound { .. }) => {
                Action::Navigate(ROUTE_LOGIN_CHOICE.to_string())
            }
            _ => Action::None,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let color = match self.route {
            Route::ForbiddenAccess | Route::NotFound { .. } => Color::Red,
            _ => Color::Yellow,
        };
        let area = centered_rect(60, 7, rect);
        let title = format!(" {} ", self.route.name());
        let block = create_dialog_block(&title, color);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let lines = vec![
            Line::from(""),
            Line::from(self.message()),
            Line::from(""),
            Line::styled(format!("{}  •  Esc to go back", self.route.path()), Style::default().fg(Color::Gray)),
        ];
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}
