use voluntrac::constants::COLLECTION_TASKS;
use voluntrac::document::Document;
use voluntrac::ui::core::{Operation, Outcome};

use crate::support::{beach_cleanup, seeded, PASSWORD, VOLUNTEER_EMAIL};

#[test]
fn test_describe_names_the_target() {
    assert_eq!(
        Operation::LoadTask {
            task_id: "t1".to_string()
        }
        .describe(),
        "Load task t1"
    );
    let mut task = beach_cleanup();
    assert_eq!(Operation::SaveTask { task: task.clone() }.describe(), "Update task t1");
    task.id.clear();
    assert_eq!(Operation::SaveTask { task }.describe(), "Create task 'Beach cleanup'");
}

#[tokio::test]
async fn test_sign_in_loads_profile() {
    let services = seeded();
    let operation = Operation::SignIn {
        email: VOLUNTEER_EMAIL.to_string(),
        password: PASSWORD.to_string(),
    };

    let Outcome::SignedIn(Ok((user, profile))) = operation.run(&services.services()).await else {
        panic!("sign-in should succeed");
    };
    assert_eq!(user.uid, "u1");
    assert_eq!(profile.map(|p| p.username), Some("jdoe".to_string()));
}

#[tokio::test]
async fn test_load_tasks_skips_malformed_documents() {
    let services = seeded();
    let mut broken = Document::new();
    broken.insert("sessions".to_string(), "not a list".into());
    services.store.insert(COLLECTION_TASKS, "bad", broken);

    let Outcome::TasksLoaded(Ok(tasks)) = Operation::LoadTasks.run(&services.services()).await else {
        panic!("listing should succeed");
    };
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0], beach_cleanup());
}

#[tokio::test]
async fn test_missing_task_is_none() {
    let services = seeded();
    let outcome = Operation::LoadTask {
        task_id: "missing".to_string(),
    }
    .run(&services.services())
    .await;
    assert_eq!(outcome, Outcome::TaskLoaded(Ok(None)));
}
