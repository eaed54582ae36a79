//! Backend operations requested by components
//!
//! Components never hold futures. They describe the call they need as an
//! [`Operation`], the [`TaskManager`](super::TaskManager) runs it against the
//! injected [`Services`], and the [`Outcome`] comes back to the same view.

use crate::backends::{BackendResult, Place, Services, User};
use crate::constants::{COLLECTION_ASSIGNMENTS, COLLECTION_PROFILES, COLLECTION_TASKS};
use crate::entities::{Assignment, GeoPoint, Profile, Task};

/// A single call against the hosted services
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    SignIn { email: String, password: String },
    LoadProfile { uid: String },
    SaveProfile { uid: String, profile: Profile },
    ReAuthenticate { password: String },
    LoadTask { task_id: String },
    LoadTasks,
    SaveTask { task: Task },
    LoadAssignment { task_id: String, volunteer_id: String },
    SaveAssignment { assignment: Assignment },
    LocateDevice,
    Geocode { query: String },
}

/// Result of an [`Operation`], tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    SignedIn(BackendResult<(User, Option<Profile>)>),
    ProfileLoaded(BackendResult<Option<Profile>>),
    ProfileSaved(BackendResult<Profile>),
    ReAuthenticated(BackendResult<()>),
    TaskLoaded(BackendResult<Option<Task>>),
    TasksLoaded(BackendResult<Vec<Task>>),
    TaskSaved(BackendResult<String>),
    AssignmentLoaded(BackendResult<Option<Assignment>>),
    AssignmentSaved(BackendResult<Assignment>),
    DeviceLocated(BackendResult<GeoPoint>),
    Geocoded(BackendResult<Vec<Place>>),
}

impl Operation {
    /// Short description used in logs
    pub fn describe(&self) -> String {
        match self {
            Operation::SignIn { email, .. } => format!("Sign in {}", email),
            Operation::LoadProfile { uid } => format!("Load profile {}", uid),
            Operation::SaveProfile { uid, .. } => format!("Save profile {}", uid),
            Operation::ReAuthenticate { .. } => "Re-authenticate".to_string(),
            Operation::LoadTask { task_id } => format!("Load task {}", task_id),
            Operation::LoadTasks => "Load tasks".to_string(),
            Operation::SaveTask { task } if task.id.is_empty() => format!("Create task '{}'", task.name),
            Operation::SaveTask { task } => format!("Update task {}", task.id),
            Operation::LoadAssignment { task_id, volunteer_id } => {
                format!("Load assignment {}", Assignment::document_id(task_id, volunteer_id))
            }
            Operation::SaveAssignment { assignment } => format!(
                "Save assignment {}",
                Assignment::document_id(&assignment.task_id, &assignment.volunteer_id)
            ),
            Operation::LocateDevice => "Locate device".to_string(),
            Operation::Geocode { query } => format!("Geocode '{}'", query),
        }
    }

    /// Perform the call. Never panics; every failure is folded into the outcome.
    pub async fn run(self, services: &Services) -> Outcome {
        match self {
            Operation::SignIn { email, password } => Outcome::SignedIn(sign_in(services, &email, &password).await),
            Operation::LoadProfile { uid } => Outcome::ProfileLoaded(load_profile(services, &uid).await),
            Operation::SaveProfile { uid, profile } => Outcome::ProfileSaved(
                services
                    .store
                    .set_document(COLLECTION_PROFILES, &uid, &profile.to_document())
                    .await
                    .map(|_| profile),
            ),
            Operation::ReAuthenticate { password } => {
                Outcome::ReAuthenticated(services.identity.re_authenticate(&password).await)
            }
            Operation::LoadTask { task_id } => Outcome::TaskLoaded(load_task(services, &task_id).await),
            Operation::LoadTasks => Outcome::TasksLoaded(load_tasks(services).await),
            Operation::SaveTask { task } => Outcome::TaskSaved(save_task(services, &task).await),
            Operation::LoadAssignment { task_id, volunteer_id } => {
                Outcome::AssignmentLoaded(load_assignment(services, &task_id, &volunteer_id).await)
            }
            Operation::SaveAssignment { assignment } => {
                let id = Assignment::document_id(&assignment.task_id, &assignment.volunteer_id);
                Outcome::AssignmentSaved(
                    services
                        .store
                        .set_document(COLLECTION_ASSIGNMENTS, &id, &assignment.to_document())
                        .await
                        .map(|_| assignment),
                )
            }
            Operation::LocateDevice => Outcome::DeviceLocated(services.geolocator.current_position().await),
            Operation::Geocode { query } => Outcome::Geocoded(services.geocoder.geocode(&query).await),
        }
    }
}

async fn sign_in(services: &Services, email: &str, password: &str) -> BackendResult<(User, Option<Profile>)> {
    let user = services.identity.sign_in(email, password).await?;
    let profile = load_profile(services, &user.uid).await?;
    Ok((user, profile))
}

async fn load_profile(services: &Services, uid: &str) -> BackendResult<Option<Profile>> {
    match services.store.get_document(COLLECTION_PROFILES, uid).await? {
        Some(doc) => Ok(Some(Profile::from_document(&doc)?)),
        None => Ok(None),
    }
}

async fn load_task(services: &Services, task_id: &str) -> BackendResult<Option<Task>> {
    match services.store.get_document(COLLECTION_TASKS, task_id).await? {
        Some(doc) => Ok(Some(Task::from_document(task_id, &doc)?)),
        None => Ok(None),
    }
}

/// Malformed task documents are skipped so one bad record does not hide the rest.
async fn load_tasks(services: &Services) -> BackendResult<Vec<Task>> {
    let docs = services.store.list_documents(COLLECTION_TASKS).await?;
    let mut tasks = Vec::with_capacity(docs.len());
    for (id, doc) in docs {
        match Task::from_document(&id, &doc) {
            Ok(task) => tasks.push(task),
            Err(e) => log::warn!("Skipping task {}: {}", id, e),
        }
    }
    tasks.sort_by(|a, b| a.start_datetime.cmp(&b.start_datetime).then_with(|| a.name.cmp(&b.name)));
    Ok(tasks)
}

/// An empty id creates a new task; otherwise the task document is overwritten.
async fn save_task(services: &Services, task: &Task) -> BackendResult<String> {
    let doc = task.to_document();
    if task.id.is_empty() {
        services.store.add_document(COLLECTION_TASKS, &doc).await
    } else {
        services.store.set_document(COLLECTION_TASKS, &task.id, &doc).await?;
        Ok(task.id.clone())
    }
}

async fn load_assignment(services: &Services, task_id: &str, volunteer_id: &str) -> BackendResult<Option<Assignment>> {
    let id = Assignment::document_id(task_id, volunteer_id);
    match services.store.get_document(COLLECTION_ASSIGNMENTS, &id).await? {
        Some(doc) => Ok(Some(Assignment::from_document(&doc)?)),
        None => Ok(None),
    }
}

