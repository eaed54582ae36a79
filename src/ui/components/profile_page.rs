use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::profile_editor::ProfileEditor;
use super::welcome_banner::WelcomeBanner;
use crate::backends::AuthSubscription;
use crate::ui::core::{Action, Component, Operation, Outcome};

/// Welcome banner above the profile form, for both roles
pub struct ProfilePage {
    banner: WelcomeBanner,
    editor: ProfileEditor,
}

impl ProfilePage {
    pub fn new(uid: impl Into<String>, subscription: AuthSubscription) -> Self {
        Self {
            banner: WelcomeBanner::new(subscription),
            editor: ProfileEditor::new(uid),
        }
    }

    pub fn load_request(&self) -> Operation {
        self.editor.load_request()
    }

    pub fn banner(&self) -> &WelcomeBanner {
        &self.banner
    }

    pub fn editor(&self) -> &ProfileEditor {
        &self.editor
    }

    /// Pick up auth-state changes for the banner
    pub fn poll(&mut self) -> bool {
        self.banner.poll()
    }
}

impl Component for ProfilePage {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        self.editor.handle_key_events(key)
    }

    fn update(&mut self, action: Action) -> Action {
        let loaded = matches!(
            action,
            Action::Completed {
                outcome: Outcome::ProfileLoaded(_) | Outcome::ProfileSaved(_),
                ..
            }
        );
        let action = self.editor.update(action);
        if loaded {
            self.banner
                .set_username(self.editor.profile().map(|p| p.username.clone()));
        }
        action
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(rect);
        self.banner.render(f, chunks[0]);
        self.editor.render(f, chunks[1]);
    }

    fn teardown(&mut self) {
        self.banner.teardown();
    }
}
