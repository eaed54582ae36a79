use voluntrac::backends::BackendError;
use voluntrac::ui::core::{Action, Operation, Outcome, TaskManager};

use crate::support::{seeded, VOLUNTEER_EMAIL};

#[tokio::test]
async fn test_completed_action_carries_view_token() {
    let services = seeded();
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_operation(
        services.services(),
        7,
        Operation::LoadTask {
            task_id: "missing".to_string(),
        },
    );
    assert_eq!(manager.task_count(), 1);

    let action = rx.recv().await.unwrap();
    assert_eq!(
        action,
        Action::Completed {
            token: 7,
            outcome: Outcome::TaskLoaded(Ok(None)),
        }
    );
}

#[tokio::test]
async fn test_sign_out_reports_logged_out() {
    let services = seeded();
    services.identity.force_sign_in(VOLUNTEER_EMAIL);
    services
        .identity
        .fail_sign_out(BackendError::Unavailable("offline".to_string()));
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_sign_out(services.services());

    assert_eq!(
        rx.recv().await.unwrap(),
        Action::LoggedOut(Err(BackendError::Unavailable("offline".to_string())))
    );
}

#[tokio::test]
async fn test_finished_tasks_are_cleaned_up() {
    let services = seeded();
    let (mut manager, mut rx) = TaskManager::new();

    manager.spawn_operation(services.services(), 1, Operation::LoadTasks);
    rx.recv().await.unwrap();

    // The send is the task's last step; give it a moment to exit
    for _ in 0..50 {
        if manager.task_count() == 0 {
            break;
        }
        let finished = manager.cleanup_finished_tasks();
        if finished.is_empty() {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        } else {
            assert_eq!(finished[0].1, "Load tasks");
        }
    }
    assert_eq!(manager.task_count(), 0);
}

#[tokio::test]
async fn test_cancel_all_tasks() {
    let services = seeded();
    let (mut manager, _rx) = TaskManager::new();
    manager.spawn_operation(services.services(), 1, Operation::LoadTasks);
    manager.spawn_operation(services.services(), 1, Operation::LocateDevice);

    manager.cancel_all_tasks();
    assert_eq!(manager.task_count(), 0);
}
