use super::actions::{Action, ViewToken};
use super::operations::Operation;
use crate::backends::Services;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
    pub started_at: std::time::Instant,
}

/// Runs backend calls off the UI loop and reports back as [`Action`]s
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    action_sender: mpsc::UnboundedSender<Action>,
}

impl TaskManager {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                action_sender: tx,
            },
            rx,
        )
    }

    /// Spawn `operation` on behalf of the view identified by `token`
    pub fn spawn_operation(&mut self, services: Services, token: ViewToken, operation: Operation) -> TaskId {
        let description = operation.describe();
        let action_sender = self.action_sender.clone();

        self.spawn(description, async move {
            let outcome = operation.run(&services).await;
            // The receiver is gone only when the app is shutting down
            let _ = action_sender.send(Action::Completed { token, outcome });
        })
    }

    /// Spawn a sign-out; the result is reported whatever view is mounted
    pub fn spawn_sign_out(&mut self, services: Services) -> TaskId {
        let action_sender = self.action_sender.clone();

        self.spawn("Sign out".to_string(), async move {
            let result = services.identity.sign_out().await;
            let _ = action_sender.send(Action::LoggedOut(result));
        })
    }

    fn spawn<F>(&mut self, description: String, future: F) -> TaskId
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        log::debug!("Background task {} started: {}", task_id, description);
        let task = BackgroundTask {
            id: task_id,
            handle: tokio::spawn(future),
            description,
            started_at: std::time::Instant::now(),
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    /// Drop handles of finished tasks, returning their descriptions
    pub fn cleanup_finished_tasks(&mut self) -> Vec<(TaskId, String)> {
        let finished: Vec<TaskId> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.handle.is_finished())
            .map(|(id, _)| *id)
            .collect();

        finished
            .into_iter()
            .filter_map(|id| self.tasks.remove(&id))
            .map(|task| {
                log::debug!(
                    "Background task {} finished in {:?}: {}",
                    task.id,
                    task.started_at.elapsed(),
                    task.description
                );
                (task.id, task.description)
            })
            .collect()
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}
