use crossterm::event::KeyCode;
use voluntrac::backends::BackendError;
use voluntrac::constants::{COLLECTION_TASKS, ERROR_TASK_NOT_LOADED, ROUTE_ADMIN_MANAGE_TASKS, SUCCESS_TASK_SAVED};
use voluntrac::entities::{GeoPoint, Session, Task};
use voluntrac::ui::components::{FormError, SessionField, TaskField, TaskForm};
use voluntrac::ui::core::{Action, Component, Notice, Operation, Outcome};

use crate::support::{beach_cleanup, ctrl, key, seeded};

fn filled_form() -> TaskForm {
    let mut form = TaskForm::create();
    form.set_field(TaskField::Name, "  Food bank shift ");
    form.set_field(TaskField::StartDatetime, "2024-11-08T10:00");
    form.set_field(TaskField::EndDatetime, "2024-11-08T14:00");
    form.set_field(TaskField::Location, "1.3521, 103.8198");
    form.set_field(TaskField::Requirements, "Apron, , closed-toe shoes ");
    form
}

#[test]
fn test_name_is_required() {
    let mut form = TaskForm::create();
    assert_eq!(form.build_task(), Err(FormError::MissingName));

    assert_eq!(form.begin_save(), Err(FormError::MissingName));
    assert_eq!(
        form.message(),
        Some(&Notice::Error(FormError::MissingName.to_string()))
    );
}

#[test]
fn test_datetime_validation() {
    let mut form = filled_form();
    form.set_field(TaskField::StartDatetime, "tomorrow");
    assert_eq!(form.build_task(), Err(FormError::InvalidDatetime("Start date")));

    form.set_field(TaskField::StartDatetime, "2024-11-08T15:00");
    assert_eq!(form.build_task(), Err(FormError::EndBeforeStart));

    form.set_field(TaskField::StartDatetime, "");
    form.set_field(TaskField::EndDatetime, "");
    let task = form.build_task().unwrap();
    assert_eq!(task.start_datetime, None);
    assert_eq!(task.end_datetime, None);
}

#[test]
fn test_build_trims_and_splits_fields() {
    let mut form = filled_form();
    assert_eq!(form.resolve_location(), None);

    let task = form.build_task().unwrap();
    assert_eq!(task.id, "");
    assert_eq!(task.name, "Food bank shift");
    assert_eq!(task.requirements, vec!["Apron".to_string(), "closed-toe shoes".to_string()]);
    assert_eq!(task.location_point, Some(GeoPoint::new(1.3521, 103.8198)));
}

#[test]
fn test_editing_location_drops_resolved_point() {
    let mut form = filled_form();
    form.resolve_location();
    assert!(form.location_point().is_some());

    form.set_field(TaskField::Location, "Jurong");
    assert_eq!(form.location_point(), None);
    assert_eq!(
        form.resolve_location(),
        Some(Operation::Geocode {
            query: "Jurong".to_string()
        })
    );
}

#[test]
fn test_sessions_are_normalised() {
    let mut form = filled_form();
    let index = form.add_session();
    form.set_session_field(index, SessionField::Date, " 2024-11-09 ");
    form.set_session_field(index, SessionField::StartTime, "10:00");
    form.set_session_field(index, SessionField::EndTime, "14:30");

    let task = form.build_task().unwrap();
    assert_eq!(task.sessions, vec![Session::new("2024-11-09", "10:00 AM", "2:30 PM")]);
}

#[test]
fn test_incomplete_session_is_rejected() {
    let mut form = filled_form();
    form.add_session();
    let second = form.add_session();
    form.set_session_field(0, SessionField::Date, "2024-11-09");
    form.set_session_field(0, SessionField::StartTime, "9:00 AM");
    form.set_session_field(0, SessionField::EndTime, "11:00 AM");
    form.set_session_field(second, SessionField::Date, "2024-11-10");

    let err = form.build_task().unwrap_err();
    assert_eq!(err, FormError::InvalidSession(1));
    assert!(err.to_string().starts_with("❌ Session 2 "));

    form.remove_session(second);
    assert_eq!(form.session_count(), 1);
    assert!(form.build_task().is_ok());
}

#[tokio::test]
async fn test_new_task_is_created() {
    let services = seeded();
    let mut form = filled_form();
    form.resolve_location();

    let id = form.save(&services.services()).await.unwrap();

    assert_ne!(id, "t1");
    assert!(form.is_edit());
    assert_eq!(form.message(), Some(&Notice::Info(SUCCESS_TASK_SAVED.to_string())));
    let doc = services.store.document(COLLECTION_TASKS, &id).unwrap();
    let stored = Task::from_document(&id, &doc).unwrap();
    assert_eq!(stored.name, "Food bank shift");
    assert_eq!(stored.location_point, Some(GeoPoint::new(1.3521, 103.8198)));
}

#[tokio::test]
async fn test_edit_overwrites_existing_task() {
    let services = seeded();
    let mut form = TaskForm::edit("t1");
    assert_eq!(
        form.load_request(),
        Some(Operation::LoadTask {
            task_id: "t1".to_string()
        })
    );

    form.set_task(&beach_cleanup());
    assert_eq!(form.field(TaskField::StartDatetime), "2024-11-09T10:00");
    assert_eq!(form.field(TaskField::Requirements), "Gloves, Water bottle");
    assert_eq!(form.session_field(0, SessionField::StartTime), Some("10:00 AM"));

    form.set_field(TaskField::Description, "Bring sunscreen");
    let id = form.save(&services.services()).await.unwrap();

    assert_eq!(id, "t1");
    assert_eq!(services.store.write_count(), 1);
    let doc = services.store.document(COLLECTION_TASKS, "t1").unwrap();
    let stored = Task::from_document("t1", &doc).unwrap();
    assert_eq!(stored.description, "Bring sunscreen");
    assert_eq!(stored.sessions, beach_cleanup().sessions);
}

#[tokio::test]
async fn test_failed_edit_load_refuses_to_save() {
    let services = seeded();
    let mut form = TaskForm::edit("t1");

    let action = form.update(Action::Completed {
        token: 1,
        outcome: Outcome::TaskLoaded(Err(BackendError::Unavailable("offline".to_string()))),
    });
    assert!(matches!(action, Action::Notify(Notice::Error(_))));

    form.set_field(TaskField::Name, "Beach cleanup v2");
    assert_eq!(form.save(&services.services()).await, Err(FormError::NotLoaded));
    assert_eq!(form.message(), Some(&Notice::Error(ERROR_TASK_NOT_LOADED.to_string())));
    assert_eq!(form.handle_key_events(ctrl('s')), Action::Notify(Notice::Error(ERROR_TASK_NOT_LOADED.to_string())));

    assert_eq!(services.store.write_count(), 0);
    let stored = Task::from_document("t1", &services.store.document(COLLECTION_TASKS, "t1").unwrap()).unwrap();
    assert_eq!(stored, beach_cleanup());
}

#[test]
fn test_missing_edit_task_cannot_be_saved() {
    let mut form = TaskForm::edit("gone");
    form.finish_load(Ok(None));
    form.set_field(TaskField::Name, "Recreated");
    assert_eq!(form.begin_save(), Err(FormError::NotLoaded));
}

#[test]
fn test_save_is_not_repeated_while_in_flight() {
    let mut form = filled_form();
    assert!(form.begin_save().is_ok());
    assert_eq!(form.begin_save(), Err(FormError::SaveInFlight));
}

#[test]
fn test_keys_drive_sessions_and_save() {
    let mut form = filled_form();

    form.handle_key_events(ctrl('n'));
    assert_eq!(form.session_count(), 1);
    for c in "2024-11-09".chars() {
        form.handle_key_events(key(KeyCode::Char(c)));
    }
    assert_eq!(form.session_field(0, SessionField::Date), Some("2024-11-09"));

    form.handle_key_events(ctrl('d'));
    assert_eq!(form.session_count(), 0);

    let action = form.handle_key_events(ctrl('s'));
    assert!(matches!(action, Action::Request(Operation::SaveTask { .. })));
}

#[test]
fn test_successful_save_returns_to_task_management() {
    let mut form = filled_form();
    form.begin_save().unwrap();

    let action = form.update(Action::Completed {
        token: 1,
        outcome: Outcome::TaskSaved(Ok("new-id".to_string())),
    });
    assert_eq!(action, Action::Navigate(ROUTE_ADMIN_MANAGE_TASKS.to_string()));
}
