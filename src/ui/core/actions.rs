use super::operations::{Operation, Outcome};
use crate::backends::{BackendResult, User};
use crate::entities::Profile;

/// Generation number of a mounted view.
///
/// Every navigation mounts a new view with a fresh token. Background results
/// carry the token of the view that asked for them and are dropped when it no
/// longer matches.
pub type ViewToken = u64;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Navigation
    Navigate(String),
    Back,

    // Background work
    Request(Operation),
    Completed { token: ViewToken, outcome: Outcome },

    // Session
    SignedIn { user: User, profile: Option<Profile> },
    AuthChanged(Option<User>),
    Logout,
    LoggedOut(BackendResult<()>),

    // Feedback
    Notify(Notice),
    ShowLogs(bool),

    // App control
    Quit,
    None,
}

/// A one-line message for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}
