use crossterm::event::KeyCode;
use voluntrac::backends::memory::InMemoryServices;
use voluntrac::backends::BackendError;
use voluntrac::constants::{
    COLLECTION_ASSIGNMENTS, ERROR_EMPTY_SELECTION, ERROR_SAVE_ASSIGNMENT_FAILED, STATUS_CONFIRMING,
    SUCCESS_SESSIONS_CONFIRMED,
};
use voluntrac::entities::{Assignment, Session, SessionSet};
use voluntrac::ui::components::{ConfirmState, SelectionError, SessionSelector};
use voluntrac::ui::core::{Action, Component, Operation, Outcome};

use crate::support::{beach_cleanup, key, seeded};

fn two_sessions() -> Vec<Session> {
    vec![
        Session::new("2024-11-09", "10:00 AM", "12:00 PM"),
        Session::new("2024-11-09", "2:00 PM", "4:00 PM"),
    ]
}

fn stored_assignment(services: &InMemoryServices) -> Option<Assignment> {
    services
        .store
        .document(COLLECTION_ASSIGNMENTS, "t1_u1")
        .map(|doc| Assignment::from_document(&doc).unwrap())
}

#[test]
fn test_toggle_twice_restores_selection() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    selector.toggle(1);
    let before = selector.selection().clone();

    assert!(selector.toggle(0));
    assert!(!selector.toggle(0));
    assert_eq!(selector.selection(), &before);
}

#[test]
fn test_toggle_out_of_range_is_ignored() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    assert!(!selector.toggle(5));
    assert!(selector.selection().is_empty());
}

#[tokio::test]
async fn test_empty_confirm_is_rejected_without_writing() {
    let services = seeded();
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());

    let result = selector.confirm(&services.services()).await;

    assert_eq!(result, Err(SelectionError::EmptySelection));
    assert_eq!(selector.state(), &ConfirmState::Error(ERROR_EMPTY_SELECTION.to_string()));
    assert_eq!(services.store.write_count(), 0);
}

#[tokio::test]
async fn test_fetch_without_record_starts_empty() {
    let services = seeded();
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());

    selector.fetch_existing_assignments(&services.services()).await;

    assert!(selector.selection().is_empty());
    assert!(selector.confirmed().is_empty());
    assert!(!selector.has_existing_assignments());
    assert_eq!(selector.state(), &ConfirmState::Idle);
}

#[tokio::test]
async fn test_fetch_seeds_selection_and_drops_stale_indices() {
    let services = seeded();
    let stored = Assignment {
        task_id: "t1".to_string(),
        volunteer_id: "u1".to_string(),
        sessions: [1, 7].into_iter().collect(),
    };
    services.store.insert(COLLECTION_ASSIGNMENTS, "t1_u1", stored.to_document());
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());

    selector.fetch_existing_assignments(&services.services()).await;

    let expected: SessionSet = [1].into_iter().collect();
    assert!(selector.has_existing_assignments());
    assert_eq!(selector.selection(), &expected);
    assert_eq!(selector.confirmed(), &expected);
}

#[tokio::test]
async fn test_confirm_persists_selected_session() {
    let services = seeded();
    let task = beach_cleanup();
    let mut selector = SessionSelector::new(task.id.clone(), "u1", task.sessions.clone());

    selector.toggle(0);
    let operation = selector.begin_confirm().unwrap();
    assert_eq!(selector.state(), &ConfirmState::Confirming);
    assert_eq!(selector.status_text(), Some(STATUS_CONFIRMING));
    assert!(!selector.can_submit());

    let Outcome::AssignmentSaved(result) = operation.run(&services.services()).await else {
        panic!("expected an assignment save outcome");
    };
    selector.finish_confirm(result).unwrap();

    assert_eq!(selector.state(), &ConfirmState::Confirmed);
    assert_eq!(selector.status_text(), Some(SUCCESS_SESSIONS_CONFIRMED));
    let stored = stored_assignment(&services).unwrap();
    assert_eq!(stored.sessions.as_slice(), &[0]);
    assert_eq!(stored.volunteer_id, "u1");
}

#[tokio::test]
async fn test_reconfirm_overwrites_single_record() {
    let services = seeded();
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());

    selector.toggle(0);
    selector.confirm(&services.services()).await.unwrap();
    selector.toggle(0);
    selector.toggle(1);
    selector.confirm(&services.services()).await.unwrap();

    assert_eq!(services.store.write_count(), 2);
    assert_eq!(stored_assignment(&services).unwrap().sessions.as_slice(), &[1]);
    assert_eq!(selector.confirmed().as_slice(), &[1]);
}

#[test]
fn test_second_confirm_while_in_flight_is_refused() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    selector.toggle(0);

    assert!(selector.begin_confirm().is_ok());
    assert_eq!(selector.begin_confirm(), Err(SelectionError::InFlight));
    assert_eq!(selector.state(), &ConfirmState::Confirming);
}

#[test]
fn test_late_fetch_failure_keeps_confirm_in_flight() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    selector.toggle(1);
    let write = selector.begin_confirm().unwrap();

    selector.finish_fetch(Err(BackendError::Unavailable("timeout".to_string())));

    assert_eq!(selector.state(), &ConfirmState::Confirming);
    assert!(!selector.can_submit());
    assert_eq!(selector.begin_confirm(), Err(SelectionError::InFlight));
    assert_eq!(selector.selection().as_slice(), &[1]);

    let Operation::SaveAssignment { assignment } = write else {
        panic!("expected an assignment write");
    };
    assert!(selector.finish_confirm(Ok(assignment)).is_ok());
    assert_eq!(selector.state(), &ConfirmState::Confirmed);
}

#[test]
fn test_late_fetch_result_keeps_submitted_selection() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    selector.toggle(1);
    selector.begin_confirm().unwrap();

    selector.finish_fetch(Ok(Some(Assignment {
        task_id: "t1".to_string(),
        volunteer_id: "u1".to_string(),
        sessions: [0].into_iter().collect(),
    })));

    assert_eq!(selector.state(), &ConfirmState::Confirming);
    assert_eq!(selector.selection().as_slice(), &[1]);
    assert!(selector.has_existing_assignments());
}

#[tokio::test]
async fn test_failed_write_can_be_retried() {
    let services = seeded();
    services.store.set_fail_writes(true);
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());
    selector.toggle(1);

    assert!(matches!(
        selector.confirm(&services.services()).await,
        Err(SelectionError::Save(_))
    ));
    assert_eq!(
        selector.state(),
        &ConfirmState::Error(ERROR_SAVE_ASSIGNMENT_FAILED.to_string())
    );
    assert!(selector.can_submit());

    services.store.set_fail_writes(false);
    selector.confirm(&services.services()).await.unwrap();
    assert_eq!(selector.state(), &ConfirmState::Confirmed);
}

#[test]
fn test_keys_toggle_and_confirm() {
    let mut selector = SessionSelector::new("t1", "u1", two_sessions());

    assert_eq!(selector.handle_key_events(key(KeyCode::Char(' '))), Action::None);
    assert_eq!(selector.selection().as_slice(), &[0]);

    let action = selector.handle_key_events(key(KeyCode::Enter));
    assert!(matches!(action, Action::Request(Operation::SaveAssignment { .. })));
}
