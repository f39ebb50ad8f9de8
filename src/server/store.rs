//! Task storage

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::protocol::{error::A2AError, Task};

/// A mutation applied to a task under the store's per-task lock
pub type TaskMutator = Box<dyn FnOnce(&mut Task) + Send>;

/// Storage for tasks, keyed by task id
///
/// Tasks live as long as the store does; nothing is evicted.
#[async_trait]
pub trait TaskStore: Send + Sync + 'static {
    /// Insert a new task
    ///
    /// # Errors
    ///
    /// Returns `A2AError::DuplicateTask` if the id is taken; the existing
    /// task is left untouched.
    async fn create(&self, task: Task) -> Result<Task, A2AError>;

    /// Snapshot of a task, if it exists
    async fn get(&self, task_id: &str) -> Option<Task>;

    /// Atomically read, modify and write a task, returning the new snapshot
    ///
    /// Updates to the same task are applied one at a time.
    ///
    /// # Errors
    ///
    /// Returns `A2AError::TaskNotFound` if there is no such task.
    async fn update(&self, task_id: &str, mutator: TaskMutator) -> Result<Task, A2AError>;
}

/// In-memory [`TaskStore`]
///
/// The map lock is held only to look up or insert an entry; each task has its
/// own lock, so work on different tasks never contends.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<String, Arc<Mutex<Task>>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks
    pub async fn len(&self) -> usize {
        self.tasks.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.read().await.is_empty()
    }

    async fn entry(&self, task_id: &str) -> Option<Arc<Mutex<Task>>> {
        self.tasks.read().await.get(task_id).cloned()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, task: Task) -> Result<Task, A2AError> {
        let mut tasks = self.tasks.write().await;
        match tasks.entry(task.id.clone()) {
            Entry::Occupied(_) => Err(A2AError::DuplicateTask { task_id: task.id }),
            Entry::Vacant(slot) => {
                tracing::debug!(task_id = %task.id, "task created");
                slot.insert(Arc::new(Mutex::new(task.clone())));
                Ok(task)
            }
        }
    }

    async fn get(&self, task_id: &str) -> Option<Task> {
        let entry = self.entry(task_id).await?;
        let task = entry.lock().await.clone();
        Some(task)
    }

    async fn update(&self, task_id: &str, mutator: TaskMutator) -> Result<Task, A2AError> {
        let entry = self
            .entry(task_id)
            .await
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;

        let mut task = entry.lock().await;
        mutator(&mut task);
        Ok(task.clone())
    }
}
