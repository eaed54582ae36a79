//! Role-specific navigation bar
//!
//! Each link dispatches exactly one route transition. Logging out always
//! ends at the entry route, even if the identity provider reports an error.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::backends::{BackendResult, Services};
use crate::constants::{
    APP_TITLE, ROUTE_ADMIN_MANAGE_TASKS, ROUTE_ADMIN_PROFILE, ROUTE_ADMIN_TAKE_ATTENDANCE, ROUTE_ENTRY,
    ROUTE_SEARCH_TASKS, ROUTE_USER_PROFILE, ROUTE_VIEW_TASKS,
};
use crate::router::Router;
use crate::ui::core::{Action, Component};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavRole {
    Admin,
    Volunteer,
}

/// Where a link leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Route(&'static str),
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub target: NavTarget,
}

const ADMIN_LINKS: [NavLink; 4] = [
    NavLink {
        label: "MANAGE TASKS",
        target: NavTarget::Route(ROUTE_ADMIN_MANAGE_TASKS),
    },
    NavLink {
        label: "TAKE ATTENDANCE",
        target: NavTarget::Route(ROUTE_ADMIN_TAKE_ATTENDANCE),
    },
    NavLink {
        label: "MY PROFILE",
        target: NavTarget::Route(ROUTE_ADMIN_PROFILE),
    },
    NavLink {
        label: "LOG OUT",
        target: NavTarget::Logout,
    },
];

const VOLUNTEER_LINKS: [NavLink; 4] = [
    NavLink {
        label: "VIEW MY TASKS",
        target: NavTarget::Route(ROUTE_VIEW_TASKS),
    },
    NavLink {
        label: "SEARCH OPPORTUNITIES",
        target: NavTarget::Route(ROUTE_SEARCH_TASKS),
    },
    NavLink {
        label: "MY PROFILE",
        target: NavTarget::Route(ROUTE_USER_PROFILE),
    },
    NavLink {
        label: "LOG OUT",
        target: NavTarget::Logout,
    },
];

pub struct NavBar {
    role: NavRole,
    link_areas: Vec<Rect>,
}

impl NavBar {
    pub fn new(role: NavRole) -> Self {
        Self {
            role,
            link_areas: Vec::new(),
        }
    }

    pub fn role(&self) -> NavRole {
        self.role
    }

    pub fn links(&self) -> &'static [NavLink] {
        match self.role {
            NavRole::Admin => &ADMIN_LINKS,
            NavRole::Volunteer => &VOLUNTEER_LINKS,
        }
    }

    /// The action for link `index`
    pub fn activate(&self, index: usize) -> Action {
        match self.links().get(index).map(|link| link.target) {
            Some(NavTarget::Route(path)) => Action::Navigate(path.to_string()),
            Some(NavTarget::Logout) => Action::Logout,
            None => Action::None,
        }
    }

    /// Sign out, then navigate to the entry route regardless of the result
    pub async fn logout(services: &Services, router: &mut Router) -> BackendResult<()> {
        let result = services.identity.sign_out().await;
        if let Err(e) = &result {
            log::error!("Sign-out failed: {}", e);
        }
        router.push(ROUTE_ENTRY);
        result
    }
}

impl Component for NavBar {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::F(n @ 1..=4) => self.activate(usize::from(n - 1)),
            _ => Action::None,
        }
    }

    fn handle_mouse_events(&mut self, mouse: MouseEvent) -> Action {
        let position = Position::new(mouse.column, mouse.row);
        match self.link_areas.iter().position(|area| area.contains(position)) {
            Some(index) => self.activate(index),
            None => Action::None,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let title = format!(" {} ", APP_TITLE);
        let mut spans = vec![Span::styled(
            title.clone(),
            Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];

        self.link_areas.clear();
        let mut x = rect.x + title.chars().count() as u16;
        for (index, link) in self.links().iter().enumerate() {
            let text = format!("  F{} {}", index + 1, link.label);
            let width = text.chars().count() as u16;
            self.link_areas.push(Rect {
                x,
                y: rect.y,
                width,
                height: 1,
            });
            x = x.saturating_add(width);
            let color = match link.target {
                NavTarget::Logout => Color::Red,
                NavTarget::Route(_) => Color::White,
            };
            spans.push(Span::styled(text, Style::default().fg(color)));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), rect);
    }
}
