//! Dialog components module

pub mod common;
mod logs_dialog;
mod password_dialog;

pub use logs_dialog::LogsDialog;
pub use password_dialog::PasswordDialog;
