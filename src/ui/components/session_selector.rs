//! Session sign-up for one task
//!
//! Volunteers toggle sessions locally and confirm them as a single
//! assignment document. Confirmation runs `Idle → Confirming → Confirmed`,
//! or back to an error state that can be retried.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use super::dialogs::common::{create_instructions_paragraph, shortcuts};
use super::session_card::SessionCard;
use crate::backends::{BackendError, BackendResult, Services};
use crate::constants::{
    ERROR_CONFIRM_IN_FLIGHT, ERROR_EMPTY_SELECTION, ERROR_SAVE_ASSIGNMENT_FAILED, STATUS_CONFIRMING,
    SUCCESS_SESSIONS_CONFIRMED,
};
use crate::entities::{Assignment, Session, SessionSet};
use crate::ui::core::{Action, Component, Notice, Operation, Outcome};

/// Where a confirmation stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfirmState {
    #[default]
    Idle,
    Confirming,
    Confirmed,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SelectionError {
    #[error("{}", ERROR_EMPTY_SELECTION)]
    EmptySelection,

    #[error("{}", ERROR_CONFIRM_IN_FLIGHT)]
    InFlight,

    #[error("{}", ERROR_SAVE_ASSIGNMENT_FAILED)]
    Save(BackendError),
}

pub struct SessionSelector {
    task_id: String,
    volunteer_id: String,
    sessions: Vec<Session>,
    selection: SessionSet,
    confirmed: SessionSet,
    has_existing_assignments: bool,
    state: ConfirmState,
    cursor: usize,
}

impl SessionSelector {
    pub fn new(task_id: impl Into<String>, volunteer_id: impl Into<String>, sessions: Vec<Session>) -> Self {
        Self {
            task_id: task_id.into(),
            volunteer_id: volunteer_id.into(),
            sessions,
            selection: SessionSet::new(),
            confirmed: SessionSet::new(),
            has_existing_assignments: false,
            state: ConfirmState::Idle,
            cursor: 0,
        }
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn selection(&self) -> &SessionSet {
        &self.selection
    }

    pub fn confirmed(&self) -> &SessionSet {
        &self.confirmed
    }

    pub fn has_existing_assignments(&self) -> bool {
        self.has_existing_assignments
    }

    pub fn state(&self) -> &ConfirmState {
        &self.state
    }

    /// Confirm is disabled while a write is in flight
    pub fn can_submit(&self) -> bool {
        self.state != ConfirmState::Confirming
    }

    /// Line shown under the session cards, if any
    pub fn status_text(&self) -> Option<&str> {
        match &self.state {
            ConfirmState::Idle => None,
            ConfirmState::Confirming => Some(STATUS_CONFIRMING),
            ConfirmState::Confirmed => Some(SUCCESS_SESSIONS_CONFIRMED),
            ConfirmState::Error(message) => Some(message),
        }
    }

    /// Flip membership of session `index`. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        if index >= self.sessions.len() {
            log::debug!("Ignoring toggle of session {} (task has {})", index, self.sessions.len());
            return false;
        }
        self.selection.toggle(index)
    }

    /// The read that seeds prior confirmations
    pub fn fetch_request(&self) -> Operation {
        Operation::LoadAssignment {
            task_id: self.task_id.clone(),
            volunteer_id: self.volunteer_id.clone(),
        }
    }

    /// Apply the existing-assignment read. A missing record means nothing was confirmed yet.
    /// While a confirm is in flight the read only notes whether a record exists;
    /// the selection being written and the in-flight state are left alone.
    pub fn finish_fetch(&mut self, result: BackendResult<Option<Assignment>>) {
        if self.state == ConfirmState::Confirming {
            match result {
                Ok(existing) => self.has_existing_assignments = existing.is_some(),
                Err(e) => log::warn!("Assignment read for task {} failed during confirm: {}", self.task_id, e),
            }
            return;
        }
        match result {
            Ok(Some(assignment)) => {
                let mut sessions = assignment.sessions;
                sessions.retain_valid(self.sessions.len());
                self.has_existing_assignments = true;
                self.selection = sessions.clone();
                self.confirmed = sessions;
            }
            Ok(None) => {
                self.has_existing_assignments = false;
                self.selection = SessionSet::new();
                self.confirmed = SessionSet::new();
            }
            Err(e) => {
                log::error!("Failed to load assignment for task {}: {}", self.task_id, e);
                self.state = ConfirmState::Error(e.to_string());
            }
        }
    }

    /// Load prior confirmations from the store
    pub async fn fetch_existing_assignments(&mut self, services: &Services) {
        let outcome = self.fetch_request().run(services).await;
        if let Outcome::AssignmentLoaded(result) = outcome {
            self.finish_fetch(result);
        }
    }

    /// Validate and enter `Confirming`, returning the write to perform
    pub fn begin_confirm(&mut self) -> Result<Operation, SelectionError> {
        if self.state == ConfirmState::Confirming {
            return Err(SelectionError::InFlight);
        }
        if self.selection.is_empty() {
            self.state = ConfirmState::Error(SelectionError::EmptySelection.to_string());
            return Err(SelectionError::EmptySelection);
        }

        self.state = ConfirmState::Confirming;
        log::info!(
            "Confirming sessions {:?} for task {}",
            self.selection.as_slice(),
            self.task_id
        );
        Ok(Operation::SaveAssignment {
            assignment: Assignment {
                task_id: self.task_id.clone(),
                volunteer_id: self.volunteer_id.clone(),
                sessions: self.selection.clone(),
            },
        })
    }

    /// Apply the result of the assignment write
    pub fn finish_confirm(&mut self, result: BackendResult<Assignment>) -> Result<(), SelectionError> {
        match result {
            Ok(assignment) => {
                self.confirmed = assignment.sessions;
                self.has_existing_assignments = true;
                self.state = ConfirmState::Confirmed;
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to save assignment for task {}: {}", self.task_id, e);
                let err = SelectionError::Save(e);
                self.state = ConfirmState::Error(err.to_string());
                Err(err)
            }
        }
    }

    /// Persist the current selection, overwriting any earlier confirmation
    pub async fn confirm(&mut self, services: &Services) -> Result<(), SelectionError> {
        let operation = self.begin_confirm()?;
        match operation.run(services).await {
            Outcome::AssignmentSaved(result) => self.finish_confirm(result),
            other => {
                log::error!("Unexpected outcome for assignment save: {:?}", other);
                Ok(())
            }
        }
    }

    fn move_cursor(&mut self, down: bool) {
        if self.sessions.is_empty() {
            return;
        }
        self.cursor = if down {
            (self.cursor + 1) % self.sessions.len()
        } else {
            (self.cursor + self.sessions.len() - 1) % self.sessions.len()
        };
    }
}

impl Component for SessionSelector {
    fn handle_key_events(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_cursor(false);
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_cursor(true);
                Action::None
            }
            KeyCode::Char(' ') => {
                self.toggle(self.cursor);
                Action::None
            }
            KeyCode::Enter => match self.begin_confirm() {
                Ok(operation) => Action::Request(operation),
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            _ => Action::None,
        }
    }

    fn update(&mut self, action: Action) -> Action {
        match action {
            Action::Completed {
                outcome: Outcome::AssignmentLoaded(result),
                ..
            } => {
                self.finish_fetch(result);
                Action::None
            }
            Action::Completed {
                outcome: Outcome::AssignmentSaved(result),
                ..
            } => match self.finish_confirm(result) {
                Ok(()) => Action::Notify(Notice::Info(SUCCESS_SESSIONS_CONFIRMED.to_string())),
                Err(e) => Action::Notify(Notice::Error(e.to_string())),
            },
            other => other,
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
            .split(rect);

        let mut lines: Vec<Line> = Vec::new();
        for (index, session) in self.sessions.iter().enumerate() {
            let card = SessionCard {
                session,
                selected: self.selection.contains(index),
                confirmed: self.confirmed.contains(index),
                focused: index == self.cursor,
            };
            lines.extend(card.lines());
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(" Sessions ");
        f.render_widget(Paragraph::new(lines).block(block), chunks[0]);

        if let Some(status) = self.status_text() {
            let color = match self.state {
                ConfirmState::Error(_) => Color::Red,
                ConfirmState::Confirming => Color::Yellow,
                _ => Color::Green,
            };
            f.render_widget(Paragraph::new(status).style(Style::default().fg(color)), chunks[1]);
        }

        let confirm_color = if self.can_submit() { Color::Green } else { Color::DarkGray };
        f.render_widget(
            create_instructions_paragraph(&[
                ("Space", Color::Cyan, " Toggle"),
                shortcuts::SEPARATOR,
                ("Enter", confirm_color, " Confirm"),
            ]),
            chunks[2],
        );
    }
}
