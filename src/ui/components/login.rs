//! Login choice and email/password sign-in views

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::dialogs::common::{
    centered_rect, create_dialog_block, create_input_paragraph, create_instructions_paragraph, shortcuts,
};
use super::text_input::TextInput;
use crate::backends::{BackendResult, User};
use crate::constants::{
    APP_TITLE, ROUTE_ADMIN_LOGIN, ROUTE_ADMIN_MANAGE_TASKS, ROUTE_SEARCH_TASKS, ROUTE_VOLUNTEER_LOGIN,
};
use crate::entities::Profile;
use crate::ui::core::{Action, Component, Operation, Outcome};

/// Where a freshly signed-in user lands, decided by the stored profile role
pub fn landing_route(profile: Option<&Profile>) -> &'static str {
    match profile {
        Some(profile) if profile.is_admin() => ROUTE_ADMIN_MANAGE_TASKS,
        _ => ROUTE_SEARCH_TASKS,
    }
}

/// `/loginChoice`: pick the volunteer or admin login
#[derive(Default)]
pub struct LoginChoice {
    selected: usize,
}

const CHOICES: [(&str, &str); 2] = [
    ("I am a Volunteer", ROUTE_VOLUNTEER_LOGIN),
    ("I am an Organisation Admin", ROUTE_ADMIN_LOGIN),
];

impl LoginChoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }
}

impl Component for LoginChoice {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                self.selected = (self.selected + 1) % CHOICES.len();
                Action::None
            }
            KeyCode::Char('v') => Action::Navigate(ROUTE_VOLUNTEER_LOGIN.to_string()),
            KeyCode::Char('a') => Action::Navigate(ROUTE_ADMIN_LOGIN.to_string()),
            KeyCode::Enter => Action::Navigate(CHOICES[self.selected].1.to_string()),
            _ => Action::None,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let area = centered_rect(44, 8, rect);
        let title = format!(" {} ", APP_TITLE);
        let block = create_dialog_block(&title, Color::Cyan);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let mut lines = vec![Line::from(""), Line::from("Welcome! How would you like to sign in?"), Line::from("")];
        for (i, (label, _)) in CHOICES.iter().enumerate() {
            let style = if i == self.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(format!("  {}  ", label), style)));
        }
        f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
    }
}

/// Which login route mounted the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Volunteer,
    Admin,
}

impl LoginKind {
    fn title(self) -> &'static str {
        match self {
            LoginKind::Volunteer => " Volunteer Login ",
            LoginKind::Admin => " Admin Login ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Email,
    Password,
}

pub struct LoginForm {
    kind: LoginKind,
    email: TextInput,
    password: TextInput,
    focus: LoginField,
    signing_in: bool,
    error: Option<String>,
}

impl LoginForm {
    pub fn new(kind: LoginKind) -> Self {
        Self {
            kind,
            email: TextInput::default(),
            password: TextInput::password(),
            focus: LoginField::Email,
            signing_in: false,
            error: None,
        }
    }

    pub fn kind(&self) -> LoginKind {
        self.kind
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_signing_in(&self) -> bool {
        self.signing_in
    }

    pub fn set_credentials(&mut self, email: &str, password: &str) {
        self.email.set(email);
        self.password.set(password);
    }

    /// Sign-in request, or `None` while one is pending or a field is blank
    pub fn begin_sign_in(&mut self) -> Option<Operation> {
        if self.signing_in {
            return None;
        }
        let email = self.email.value().trim().to_string();
        if email.is_empty() || self.password.value().is_empty() {
            self.error = Some("Enter your email and password".to_string());
            return None;
        }
        self.signing_in = true;
        self.error = None;
        Some(Operation::SignIn {
            email,
            password: self.password.value().to_string(),
        })
    }

    pub fn finish_sign_in(&mut self, result: BackendResult<(User, Option<Profile>)>) -> Action {
        self.signing_in = false;
        match result {
            Ok((user, profile)) => {
                log::info!("Signed in as {} via {:?} login", user.email, self.kind);
                Action::SignedIn { user, profile }
            }
            Err(e) => {
                log::warn!("Sign-in failed: {}", e);
                self.password.clear();
                self.error = Some(e.to_string());
                Action::None
            }
        }
    }
}

impl Component for LoginForm {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
                self.focus = match self.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
                Action::None
            }
            KeyCode::Enter if self.focus == LoginField::Email => {
                self.focus = LoginField::Password;
                Action::None
            }
            KeyCode::Enter => match self.begin_sign_in() {
                Some(operation) => Action::Request(operation),
                None => Action::None,
            },
            KeyCode::Esc => Action::Back,
            _ => {
                match self.focus {
                    LoginField::Email => self.email.handle_key(key),
                    LoginField::Password => self.password.handle_key(key),
                };
                Action::None
            }
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::SignedIn(result),
                ..
            } => self.finish_sign_in(result),
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let area = centered_rect(50, 12, rect);
        let block = create_dialog_block(self.kind.title(), Color::Cyan);
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(inner);

        f.render_widget(
            create_input_paragraph(self.email.display(), "Email", self.focus == LoginField::Email),
            chunks[0],
        );
        f.render_widget(
            create_input_paragraph(self.password.display(), "Password", self.focus == LoginField::Password),
            chunks[1],
        );

        let status = if self.signing_in {
            Span::styled("Signing in...", Style::default().fg(Color::Yellow))
        } else if let Some(error) = &self.error {
            Span::styled(error.clone(), Style::default().fg(Color::Red))
        } else {
            Span::raw("")
        };
        f.render_widget(Paragraph::new(Line::from(status)).alignment(Alignment::Center), chunks[2]);

        f.render_widget(
            create_instructions_paragraph(&[
                shortcuts::TAB_NEXT,
                shortcuts::SEPARATOR,
                shortcuts::ENTER_SUBMIT,
                shortcuts::SEPARATOR,
                ("Esc", Color::Red, " Back"),
            ]),
            chunks[3],
        );
    }
}
