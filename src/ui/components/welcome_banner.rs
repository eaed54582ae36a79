//! Greeting and last-login line on the profile pages

use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::backends::{AuthSubscription, User};
use crate::constants::WELCOME_LOADING;
use crate::ui::core::{Action, Component};
use crate::utils::datetime::format_last_login;

pub struct WelcomeBanner {
    subscription: AuthSubscription,
    user: Option<User>,
    username: Option<String>,
}

impl WelcomeBanner {
    pub fn new(subscription: AuthSubscription) -> Self {
        let user = subscription.current();
        Self {
            subscription,
            user,
            username: None,
        }
    }

    pub fn set_username(&mut self, username: Option<String>) {
        self.username = username.filter(|name| !name.trim().is_empty());
    }

    /// Pick up an auth-state change, if one happened
    pub fn poll(&mut self) -> bool {
        match self.subscription.try_changed() {
            Some(user) => {
                if user.is_none() {
                    self.username = None;
                }
                self.user = user;
                true
            }
            None => false,
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn greeting(&self) -> String {
        match (&self.user, &self.username) {
            (Some(_), Some(name)) => format!("Welcome, {}", name),
            _ => format!("Welcome, {}", WELCOME_LOADING),
        }
    }

    pub fn last_login(&self) -> String {
        format_last_login(self.user.as_ref().and_then(|u| u.last_sign_in))
    }
}

impl Component for WelcomeBanner {
    fn handle_key_events(&mut self, _key: KeyEvent) -> Action {
        Action::None
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                self.greeting(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(self.last_login(), Style::default().fg(Color::Gray))),
        ];
        f.render_widget(Paragraph::new(lines), rect);
    }

    fn teardown(&mut self) {
        self.subscription.cancel();
    }
}
