//! Profile viewing and editing
//!
//! Fields are read-only until the user re-enters their password. Saving
//! writes the editable fields back and locks the form again.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use super::dialogs::common::{
    create_input_paragraph, create_instructions_paragraph, create_selection_paragraph, shortcuts,
};
use super::dialogs::PasswordDialog;
use super::text_input::TextInput;
use crate::backends::{BackendError, BackendResult, Services};
use crate::constants::{
    ERROR_EDITING_LOCKED, ERROR_PROFILE_NOT_LOADED, ERROR_REAUTH_FAILED, ERROR_SAVE_PROFILE_FAILED, INFO_EDITING_ENABLED, SUCCESS_PROFILE_SAVED,
    WELCOME_LOADING,
};
use crate::entities::{Profile, ProfileEdits};
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProfileError {
    #[error("{}", ERROR_EDITING_LOCKED)]
    EditingLocked,

    #[error("{}", ERROR_PROFILE_NOT_LOADED)]
    NotLoaded,

    #[error("{}", ERROR_REAUTH_FAILED)]
    AuthenticationFailed(BackendError),

    #[error("{}", ERROR_SAVE_PROFILE_FAILED)]
    Save(BackendError),
}

/// The editable profile fields, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    DateOfBirth,
    ResidentialAddress,
    Organisation,
    Skills,
}

impl ProfileField {
    pub const ALL: [ProfileField; 5] = [
        ProfileField::FullName,
        ProfileField::DateOfBirth,
        ProfileField::ResidentialAddress,
        ProfileField::Organisation,
        ProfileField::Skills,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ProfileField::FullName => "Full name",
            ProfileField::DateOfBirth => "Date of birth",
            ProfileField::ResidentialAddress => "Residential address",
            ProfileField::Organisation => "Organisation",
            ProfileField::Skills => "Skills",
        }
    }
}

pub struct ProfileEditor {
    uid: String,
    profile: Option<Profile>,
    /// Set once a load has answered, with or without a document
    loaded: bool,
    inputs: [TextInput; 5],
    focus: usize,
    editing_enabled: bool,
    password_prompt: Option<PasswordDialog>,
    loading: bool,
    saving: bool,
    message: Option<Notice>,
}

impl ProfileEditor {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            profile: None,
            loaded: false,
            inputs: Default::default(),
            focus: 0,
            editing_enabled: false,
            password_prompt: None,
            loading: true,
            saving: false,
            message: None,
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn editing_enabled(&self) -> bool {
        self.editing_enabled
    }

    pub fn is_prompting_password(&self) -> bool {
        self.password_prompt.is_some()
    }

    pub fn message(&self) -> Option<&Notice> {
        self.message.as_ref()
    }

    pub fn field(&self, field: ProfileField) -> &str {
        self.inputs[field as usize].value()
    }

    /// Change a field value. Ignored while editing is locked.
    pub fn set_field(&mut self, field: ProfileField, value: &str) -> bool {
        if !self.editing_enabled {
            return false;
        }
        self.inputs[field as usize].set(value);
        true
    }

    /// Current form values
    pub fn edits(&self) -> ProfileEdits {
        ProfileEdits {
            full_name: self.field(ProfileField::FullName).to_string(),
            dob: self.field(ProfileField::DateOfBirth).to_string(),
            residential_address: self.field(ProfileField::ResidentialAddress).to_string(),
            organisation: self.field(ProfileField::Organisation).to_string(),
            skills: self.field(ProfileField::Skills).to_string(),
        }
    }

    fn fill_inputs(&mut self, edits: &ProfileEdits) {
        self.inputs = [
            TextInput::new(edits.full_name.clone()),
            TextInput::new(edits.dob.clone()),
            TextInput::new(edits.residential_address.clone()),
            TextInput::new(edits.organisation.clone()),
            TextInput::new(edits.skills.clone()),
        ];
    }

    pub fn load_request(&self) -> Operation {
        Operation::LoadProfile { uid: self.uid.clone() }
    }

    /// A missing profile document is shown as an empty form
    pub fn finish_load(&mut self, result: BackendResult<Option<Profile>>) {
        self.loading = false;
        match result {
            Ok(profile) => {
                let edits = profile.as_ref().map(Profile::edits).unwrap_or_default();
                self.fill_inputs(&edits);
                self.profile = profile;
                self.loaded = true;
            }
            Err(e) => {
                log::error!("Failed to load profile {}: {}", self.uid, e);
                self.message = Some(Notice::Error(e.to_string()));
            }
        }
    }

    pub async fn load(&mut self, services: &Services) {
        if let Outcome::ProfileLoaded(result) = self.load_request().run(services).await {
            self.finish_load(result);
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Open the password prompt. Editing stays locked until re-authentication succeeds.
    /// Nothing opens until the profile has loaded.
    pub fn request_edit(&mut self) {
        if !self.loaded {
            self.message = Some(Notice::Error(ProfileError::NotLoaded.to_string()));
            return;
        }
        if !self.editing_enabled {
            self.password_prompt = Some(PasswordDialog::new());
        }
    }

    pub fn cancel_edit_request(&mut self) {
        self.password_prompt = None;
    }

    pub fn begin_re_authenticate(&self, password: &str) -> Operation {
        Operation::ReAuthenticate {
            password: password.to_string(),
        }
    }

    pub fn finish_re_authenticate(&mut self, result: BackendResult<()>) -> Result<(), ProfileError> {
        match result {
            Ok(()) => {
                log::info!("Profile editing unlocked for {}", self.uid);
                self.editing_enabled = true;
                self.password_prompt = None;
                self.message = Some(Notice::Info(INFO_EDITING_ENABLED.to_string()));
                Ok(())
            }
            Err(e) => {
                log::warn!("Re-authentication failed for {}: {}", self.uid, e);
                self.editing_enabled = false;
                let err = ProfileError::AuthenticationFailed(e);
                if let Some(prompt) = self.password_prompt.as_mut() {
                    prompt.error = Some(err.to_string());
                    prompt.input.clear();
                }
                self.message = Some(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Verify the password and unlock editing on success
    pub async fn re_authenticate(&mut self, services: &Services, password: &str) -> Result<(), ProfileError> {
        match self.begin_re_authenticate(password).run(services).await {
            Outcome::ReAuthenticated(result) => self.finish_re_authenticate(result),
            other => {
                log::error!("Unexpected outcome for re-authentication: {:?}", other);
                Ok(())
            }
        }
    }

    /// The write to perform, or a local rejection when editing is locked
    pub fn begin_save(&mut self) -> Result<Operation, ProfileError> {
        // A write built from an unloaded profile would blank role, username and email
        if !self.loaded {
            self.message = Some(Notice::Error(ProfileError::NotLoaded.to_string()));
            return Err(ProfileError::NotLoaded);
        }
        if !self.editing_enabled {
            self.message = Some(Notice::Error(ProfileError::EditingLocked.to_string()));
            return Err(ProfileError::EditingLocked);
        }
        let mut profile = self.profile.clone().unwrap_or_default();
        profile.apply(&self.edits());
        self.saving = true;
        Ok(Operation::SaveProfile {
            uid: self.uid.clone(),
            profile,
        })
    }

    pub fn finish_save(&mut self, result: BackendResult<Profile>) -> Result<(), ProfileError> {
        self.saving = false;
        match result {
            Ok(profile) => {
                self.profile = Some(profile);
                self.editing_enabled = false;
                self.message = Some(Notice::Info(SUCCESS_PROFILE_SAVED.to_string()));
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save profile {}: {}", self.uid, e);
                let err = ProfileError::Save(e);
                self.message = Some(Notice::Error(err.to_string()));
                Err(err)
            }
        }
    }

    pub async fn save(&mut self, services: &Services) -> Result<(), ProfileError> {
        match self.begin_save()?.run(services).await {
            Outcome::ProfileSaved(result) => self.finish_save(result),
            other => {
                log::error!("Unexpected outcome for profile save: {:?}", other);
                Ok(())
            }
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) -> Action {
        let Some(prompt) = self.password_prompt.as_mut() else {
            return Action::None;
        };
        match key.code {
            KeyCode::Esc => {
                self.cancel_edit_request();
                Action::None
            }
            KeyCode::Enter => {
                let password = prompt.input.value().to_string();
                Action::Request(self.begin_re_authenticate(&password))
            }
            _ => {
                prompt.input.handle_key(key);
                Action::None
            }
        }
    }

    fn action_for(result: Result<(), ProfileError>, success: &Option<Notice>) -> Action {
        match (result, success) {
            (Ok(()), Some(notice)) => Action::Notify(notice.clone()),
            (Ok(()), None) => Action::None,
            (Err(e), _) => Action::Notify(Notice::Error(e.to_string())),
        }
    }
}

impl Component for ProfileEditor {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        if self.password_prompt.is_some() {
            return self.handle_prompt_key(key);
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % ProfileField::ALL.len();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + ProfileField::ALL.len() - 1) % ProfileField::ALL.len();
                Action::None
            }
            KeyCode::Char('e') if !self.editing_enabled => {
                self.request_edit();
                match &self.message {
                    Some(notice) if !self.loaded => Action::Notify(notice.clone()),
                    _ => Action::None,
                }
            }
            KeyCode::Enter if self.editing_enabled && !self.saving => match self.begin_save() {
                Ok(operation) => Action::Request(operation),
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            KeyCode::Enter => Action::Notify(Notice::Error(ERROR_EDITING_LOCKED.to_string())),
            _ if self.editing_enabled => {
                self.inputs[self.focus].handle_key(key);
                Action::None
            }
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::ProfileLoaded(result),
                ..
            } => {
                self.finish_load(result);
                Action::None
            }
            Action::Completed {
                outcome: Outcome::ReAuthenticated(result),
                ..
            } => {
                let result = self.finish_re_authenticate(result);
                Self::action_for(result, &self.message)
            }
            Action::Completed {
                outcome: Outcome::ProfileSaved(result),
                ..
            } => {
                let result = self.finish_save(result);
                Self::action_for(result, &self.message)
            }
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        if self.loading {
            f.render_widget(Paragraph::new(WELCOME_LOADING), rect);
            return;
        }

        let mut constraints = vec![Constraint::Length(3); 3];
        constraints.extend([Constraint::Length(3); 5]);
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(rect);

        let profile = self.profile.clone().unwrap_or_default();
        f.render_widget(create_selection_paragraph(profile.username, "Username"), chunks[0]);
        f.render_widget(create_selection_paragraph(profile.email, "Email"), chunks[1]);
        f.render_widget(create_selection_paragraph(profile.role, "Role"), chunks[2]);

        for (i, field) in ProfileField::ALL.iter().enumerate() {
            let input = &self.inputs[i];
            let paragraph = if self.editing_enabled {
                create_input_paragraph(input.display(), field.label(), i == self.focus)
            } else {
                create_selection_paragraph(input.display(), field.label())
            };
            f.render_widget(paragraph, chunks[3 + i]);
        }

        if let Some(message) = &self.message {
            let color = if message.is_error() { Color::Red } else { Color::Green };
            f.render_widget(
                Paragraph::new(message.text().to_string()).style(Style::default().fg(color)),
                chunks[8],
            );
        }

        let instructions = if self.editing_enabled {
            create_instructions_paragraph(&[
                shortcuts::TAB_NEXT,
                shortcuts::SEPARATOR,
                ("Enter", Color::Green, " Save"),
            ])
        } else {
            create_instructions_paragraph(&[("e", Color::Yellow, " Edit profile")])
        };
        f.render_widget(instructions, chunks[9]);

        if let Some(prompt) = &self.password_prompt {
            prompt.render(f, f.area());
        }
    }
}
