//! Request handling: binds requests to tasks and drives the executor

use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, PoisonError, RwLock},
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    protocol::{
        error::{A2AError, TaskError},
        Event, Message, MessageSendParams, Role, SendMessageResult, Task, TaskIdParams,
        TaskStatus,
    },
    server::{
        context::RequestContext, executor::AgentExecutor, queue::EventQueue, store::TaskStore,
    },
};

/// Server-side entry points for the JSON-RPC methods
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Handle `message/send`
    async fn on_message_send(&self, params: MessageSendParams)
        -> Result<SendMessageResult, A2AError>;

    /// Handle `tasks/get`
    async fn on_get_task(&self, params: TaskIdParams) -> Result<Task, A2AError>;

    /// Handle `tasks/cancel`
    async fn on_cancel_task(&self, params: TaskIdParams) -> Result<Task, A2AError>;
}

/// Execution registered for a task while its executor runs
#[derive(Clone)]
struct Running {
    context: RequestContext,
    queue: Arc<EventQueue>,
}

/// Tasks that currently have an execution in flight
#[derive(Clone, Default)]
struct Registry(Arc<RwLock<HashMap<String, Running>>>);

impl Registry {
    fn get(&self, task_id: &str) -> Option<Running> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_id)
            .cloned()
    }

    /// Register an execution unless one is already in flight for the task
    fn claim(&self, task_id: &str, running: Running) -> Result<(), A2AError> {
        match self
            .0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(task_id.to_string())
        {
            Entry::Occupied(_) => Err(A2AError::Validation(format!(
                "Task {task_id} is already executing"
            ))),
            Entry::Vacant(slot) => {
                slot.insert(running);
                Ok(())
            }
        }
    }

    fn release(&self, task_id: &str) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(task_id);
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

/// Releases a claimed task when the execution finishes or is dropped
struct Claim {
    registry: Registry,
    task_id: String,
}

impl Drop for Claim {
    fn drop(&mut self) {
        self.registry.release(&self.task_id);
    }
}

/// Closes the queue when the executor future finishes or is dropped
struct CloseOnDrop(Arc<EventQueue>);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

/// The [`RequestHandler`] used by the server
///
/// One request moves through these phases, each logged at `debug`/`info`:
/// received, task bound, executing, draining, then completed, failed or
/// canceled. Everything after binding runs on a spawned tokio task, so a task
/// is finalized even if the caller stops waiting for the reply. The executor
/// runs on its own task while the queue is drained, so a `tasks/cancel`
/// arriving mid-flight reaches the same executor and queue.
pub struct DefaultRequestHandler {
    executor: Arc<dyn AgentExecutor>,
    store: Arc<dyn TaskStore>,
    running: Registry,
}

impl DefaultRequestHandler {
    pub fn new(executor: Arc<dyn AgentExecutor>, store: Arc<dyn TaskStore>) -> Self {
        Self {
            executor,
            store,
            running: Registry::default(),
        }
    }

    /// The task store backing this handler
    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Find or create the task the message belongs to
    async fn bind_task(
        &self,
        message: &Message,
        metadata: Option<HashMap<String, serde_json::Value>>,
    ) -> Result<RequestContext, A2AError> {
        let existing = match &message.task_id {
            Some(task_id) => self.store.get(task_id).await,
            None => None,
        };

        let task = match existing {
            Some(task) if task.is_terminal() => {
                return Err(A2AError::Validation(format!(
                    "Task {} is already {:?}",
                    task.id, task.status
                )));
            }
            Some(task) => task,
            None => {
                let task_id = message
                    .task_id
                    .clone()
                    .unwrap_or_else(|| Uuid::now_v7().to_string());
                let mut task = Task::new(task_id, message.clone());
                task.context_id
                    .get_or_insert_with(|| Uuid::now_v7().to_string());
                self.store.create(task).await?
            }
        };

        let context_id = task
            .context_id
            .clone()
            .unwrap_or_else(|| Uuid::now_v7().to_string());
        let mut context = RequestContext::new(message.clone(), task.id, context_id);
        context.metadata.extend(metadata.unwrap_or_default());
        Ok(context)
    }

    /// Claim the task and run it to completion on a spawned tokio task
    async fn execute(&self, context: RequestContext) -> Result<SendMessageResult, A2AError> {
        let task_id = context.task_id.clone();
        let queue = Arc::new(EventQueue::new());

        self.running.claim(
            &task_id,
            Running {
                context: context.clone(),
                queue: queue.clone(),
            },
        )?;
        let claim = Claim {
            registry: self.running.clone(),
            task_id: task_id.clone(),
        };

        let executor = self.executor.clone();
        let store = self.store.clone();
        let handle = tokio::spawn(async move {
            let _claim = claim;
            run(executor, store, context, queue).await
        });

        match handle.await {
            Ok(result) => result,
            Err(e) => Err(A2AError::ExecutionFailed(format!("request task aborted: {e}"))),
        }
    }
}

/// Execute, drain and finalize one claimed task
async fn run(
    executor: Arc<dyn AgentExecutor>,
    store: Arc<dyn TaskStore>,
    context: RequestContext,
    queue: Arc<EventQueue>,
) -> Result<SendMessageResult, A2AError> {
    let task_id = context.task_id.clone();

    store
        .update(
            &task_id,
            Box::new(|task: &mut Task| task.set_status(TaskStatus::Working)),
        )
        .await?;
    tracing::info!(%task_id, "executing");

    let handle = {
        let queue = queue.clone();
        tokio::spawn(async move {
            let guard = CloseOnDrop(queue);
            executor.execute(&context, &guard.0).await
        })
    };

    tracing::debug!(%task_id, "draining");
    let drained = drain(store.as_ref(), &task_id, &queue).await;

    let outcome = match handle.await {
        Ok(result) => result,
        Err(e) => Err(A2AError::ExecutionFailed(format!("executor task aborted: {e}"))),
    };
    let reply = drained?;

    if let Err(err) = outcome {
        let task_error = TaskError::from(&err);
        store
            .update(
                &task_id,
                Box::new(move |task: &mut Task| {
                    if !task.is_terminal() {
                        task.fail(task_error);
                    }
                }),
            )
            .await?;
        tracing::error!(%task_id, error = %err, "failed");
        return Err(err);
    }

    let task = store
        .update(
            &task_id,
            Box::new(|task: &mut Task| {
                if !task.is_terminal() {
                    task.set_status(TaskStatus::Completed);
                }
            }),
        )
        .await?;
    tracing::info!(%task_id, status = ?task.status, "finished");

    match reply {
        Some(message) if task.status != TaskStatus::Canceled => {
            Ok(SendMessageResult::Message(message))
        }
        _ => Ok(SendMessageResult::Task(task)),
    }
}

/// Record every event until the queue reports end-of-stream
///
/// Returns the first agent message seen.
async fn drain(
    store: &dyn TaskStore,
    task_id: &str,
    queue: &EventQueue,
) -> Result<Option<Message>, A2AError> {
    let mut reply = None;

    while let Some(event) = queue.dequeue().await {
        if reply.is_none() {
            reply = event.message().filter(|m| m.role == Role::Agent).cloned();
        }

        let status = match &event {
            Event::StatusUpdate(update) => Some(update.status),
            Event::Message(_) => None,
        };
        tracing::debug!(%task_id, ?status, "event received");

        store
            .update(
                task_id,
                Box::new(move |task: &mut Task| {
                    task.record(event);
                    if let Some(status) = status.filter(|_| !task.is_terminal()) {
                        task.set_status(status);
                    }
                }),
            )
            .await?;
    }

    Ok(reply)
}

#[async_trait]
impl RequestHandler for DefaultRequestHandler {
    async fn on_message_send(
        &self,
        params: MessageSendParams,
    ) -> Result<SendMessageResult, A2AError> {
        let MessageSendParams { message, metadata } = params;
        message.validate()?;
        tracing::debug!(message_id = %message.message_id, "received");

        let context = self.bind_task(&message, metadata).await?;
        tracing::debug!(task_id = %context.task_id, context_id = %context.context_id, "task bound");

        self.execute(context).await
    }

    async fn on_get_task(&self, params: TaskIdParams) -> Result<Task, A2AError> {
        self.store
            .get(&params.id)
            .await
            .ok_or(A2AError::TaskNotFound { task_id: params.id })
    }

    async fn on_cancel_task(&self, params: TaskIdParams) -> Result<Task, A2AError> {
        let task_id = params.id;
        let task = self
            .store
            .get(&task_id)
            .await
            .ok_or_else(|| A2AError::TaskNotFound {
                task_id: task_id.clone(),
            })?;

        if task.is_terminal() {
            return Err(A2AError::TaskNotCancelable {
                task_id,
                status: task.status,
            });
        }

        let Running { context, queue } = self.running.get(&task_id).unwrap_or_else(|| Running {
            context: RequestContext::new(
                task.input.clone(),
                task_id.clone(),
                task.context_id.clone().unwrap_or_default(),
            ),
            queue: Arc::new(EventQueue::new()),
        });

        if let Err(err) = self.executor.cancel(&context, &queue).await {
            tracing::warn!(%task_id, error = %err, "cancel rejected");
            return Err(err);
        }

        let task = self
            .store
            .update(
                &task_id,
                Box::new(|task: &mut Task| {
                    if !task.is_terminal() {
                        task.set_status(TaskStatus::Canceled);
                    }
                }),
            )
            .await?;

        if task.status != TaskStatus::Canceled {
            return Err(A2AError::TaskNotCancelable {
                task_id,
                status: task.status,
            });
        }
        tracing::info!(%task_id, "canceled");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Notify;

    use crate::{
        greeting::{GreetingAgentExecutor, GREETING},
        protocol::TaskStatusUpdate,
        server::{executor::MockAgentExecutor, store::InMemoryTaskStore},
    };

    use super::*;

    fn handler(executor: impl AgentExecutor) -> Arc<DefaultRequestHandler> {
        Arc::new(DefaultRequestHandler::new(
            Arc::new(executor),
            Arc::new(InMemoryTaskStore::new()),
        ))
    }

    fn send(message: Message) -> MessageSendParams {
        MessageSendParams::new(message)
    }

    fn id(task_id: &str) -> TaskIdParams {
        TaskIdParams {
            id: task_id.to_string(),
        }
    }

    /// Emits a working update, then waits until canceled
    struct CancellableExecutor {
        stop: Notify,
    }

    #[async_trait]
    impl AgentExecutor for CancellableExecutor {
        async fn execute(&self, ctx: &RequestContext, queue: &EventQueue) -> Result<(), A2AError> {
            queue.enqueue(TaskStatusUpdate::new(&ctx.task_id, TaskStatus::Working))?;
            self.stop.notified().await;
            Ok(())
        }

        async fn cancel(&self, ctx: &RequestContext, queue: &EventQueue) -> Result<(), A2AError> {
            queue.enqueue(TaskStatusUpdate::new(&ctx.task_id, TaskStatus::Canceled))?;
            self.stop.notify_one();
            Ok(())
        }
    }

    async fn wait_for_status(handler: &DefaultRequestHandler, task_id: &str, status: TaskStatus) {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(task) = handler.store().get(task_id).await {
                    if task.status == status && handler.running.get(task_id).is_some() {
                        return;
                    }
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("task did not reach status");
    }

    #[tokio::test]
    async fn test_greeting_round_trip() {
        let handler = handler(GreetingAgentExecutor::new());
        let message = Message::user("hi").with_task_id("task-1");

        let result = handler.on_message_send(send(message)).await.unwrap();
        let reply = result.as_message().expect("agent message");
        assert_eq!(reply.text(), GREETING);
        assert_eq!(reply.role, Role::Agent);

        let task = handler.on_get_task(id("task-1")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);
        assert_eq!(task.history.len(), 1);
        assert!(task.context_id.is_some());
    }

    #[tokio::test]
    async fn test_task_id_generated_when_absent() {
        let handler = handler(GreetingAgentExecutor::new());
        let result = handler.on_message_send(send(Message::user("hi"))).await.unwrap();
        assert!(result.as_message().is_some());
        assert!(handler.running.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_message_rejected() {
        let mut executor = MockAgentExecutor::new();
        executor.expect_execute().never();
        let handler = handler(executor);

        let mut message = Message::user("hi");
        message.parts.clear();
        let result = handler.on_message_send(send(message)).await;
        assert!(matches!(result, Err(A2AError::Validation(_))));
    }

    #[tokio::test]
    async fn test_no_message_returns_task() {
        let mut executor = MockAgentExecutor::new();
        executor.expect_execute().returning(|ctx, queue| {
            queue.enqueue(TaskStatusUpdate::new(&ctx.task_id, TaskStatus::Working))?;
            Ok(())
        });
        let handler = handler(executor);

        let result = handler
            .on_message_send(send(Message::user("hi").with_task_id("t")))
            .await
            .unwrap();
        match result {
            SendMessageResult::Task(task) => {
                assert_eq!(task.status, TaskStatus::Completed);
                assert_eq!(task.history.len(), 1);
            }
            other => panic!("Expected task result, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execution_failure_marks_task_failed() {
        let mut executor = MockAgentExecutor::new();
        executor
            .expect_execute()
            .returning(|_, _| Err(A2AError::ExecutionFailed("model offline".into())));
        let handler = handler(executor);

        let result = handler
            .on_message_send(send(Message::user("hi").with_task_id("t")))
            .await;
        assert!(matches!(result, Err(A2AError::ExecutionFailed(reason)) if reason == "model offline"));

        let task = handler.on_get_task(id("t")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Failed);
        assert_eq!(task.error.unwrap().code, "EXECUTION_FAILED");
    }

    #[tokio::test]
    async fn test_terminal_task_rejects_new_message() {
        let handler = handler(GreetingAgentExecutor::new());
        let message = || Message::user("hi").with_task_id("task-1");

        handler.on_message_send(send(message())).await.unwrap();
        let result = handler.on_message_send(send(message())).await;
        assert!(matches!(result, Err(A2AError::Validation(_))));
    }

    #[tokio::test]
    async fn test_silent_executor_keeps_drain_suspended() {
        // Never publishes, never returns
        struct Stalled;

        #[async_trait]
        impl AgentExecutor for Stalled {
            async fn execute(&self, _: &RequestContext, _: &EventQueue) -> Result<(), A2AError> {
                std::future::pending().await
            }

            async fn cancel(&self, _: &RequestContext, _: &EventQueue) -> Result<(), A2AError> {
                Err(A2AError::UnsupportedOperation("cancel".into()))
            }
        }

        let handler = handler(Stalled);
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            handler.on_message_send(send(Message::user("hi").with_task_id("t"))),
        )
        .await;
        assert!(result.is_err());

        let task = handler.on_get_task(id("t")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Working);
    }

    /// Replies once released
    struct GatedExecutor {
        release: Notify,
    }

    #[async_trait]
    impl AgentExecutor for GatedExecutor {
        async fn execute(&self, ctx: &RequestContext, queue: &EventQueue) -> Result<(), A2AError> {
            self.release.notified().await;
            queue.enqueue(Message::agent("done").with_task_id(&ctx.task_id))?;
            Ok(())
        }

        async fn cancel(&self, _: &RequestContext, _: &EventQueue) -> Result<(), A2AError> {
            Err(A2AError::UnsupportedOperation("cancel".into()))
        }
    }

    #[tokio::test]
    async fn test_task_finalized_after_caller_stops_waiting() {
        let executor = Arc::new(GatedExecutor {
            release: Notify::new(),
        });
        let handler = Arc::new(DefaultRequestHandler::new(
            executor.clone(),
            Arc::new(InMemoryTaskStore::new()),
        ));

        let result = tokio::time::timeout(
            Duration::from_millis(50),
            handler.on_message_send(send(Message::user("hi").with_task_id("t"))),
        )
        .await;
        assert!(result.is_err());

        executor.release.notify_one();
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let task = handler.on_get_task(id("t")).await.unwrap();
                if task.status == TaskStatus::Completed && handler.running.is_empty() {
                    return task;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .map(|task| {
            assert_eq!(task.history.len(), 1);
            assert_eq!(task.messages().next().unwrap().text(), "done");
        })
        .expect("task was not finalized");

        // Finished, so a new message is refused as terminal rather than busy
        let result = handler
            .on_message_send(send(Message::user("again").with_task_id("t")))
            .await;
        assert!(matches!(result, Err(A2AError::Validation(reason)) if reason.contains("Completed")));
    }

    #[tokio::test]
    async fn test_busy_task_rejects_second_message() {
        let executor = Arc::new(GatedExecutor {
            release: Notify::new(),
        });
        let handler = Arc::new(DefaultRequestHandler::new(
            executor.clone(),
            Arc::new(InMemoryTaskStore::new()),
        ));

        let first = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .on_message_send(send(Message::user("one").with_task_id("t")))
                    .await
            })
        };
        wait_for_status(&handler, "t", TaskStatus::Working).await;

        let second = handler
            .on_message_send(send(Message::user("two").with_task_id("t")))
            .await;
        assert!(matches!(second, Err(A2AError::Validation(reason)) if reason.contains("already executing")));

        executor.release.notify_one();
        assert!(first.await.unwrap().unwrap().as_message().is_some());
    }

    #[test]
    fn test_claim_is_exclusive() {
        let registry = Registry::default();
        let running = || Running {
            context: RequestContext::new(Message::user("hi"), "t", "ctx"),
            queue: Arc::new(EventQueue::new()),
        };

        registry.claim("t", running()).unwrap();
        assert!(matches!(registry.claim("t", running()), Err(A2AError::Validation(_))));

        registry.release("t");
        assert!(registry.claim("t", running()).is_ok());
    }

    #[tokio::test]
    async fn test_unsupported_cancel_leaves_task_unchanged() {
        let handler = handler(GreetingAgentExecutor::new());
        let task = handler
            .store()
            .create(Task::new("t", Message::user("hi")))
            .await
            .unwrap();

        let result = handler.on_cancel_task(id("t")).await;
        assert!(matches!(result, Err(A2AError::UnsupportedOperation(op)) if op == "cancel"));
        assert_eq!(handler.on_get_task(id("t")).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_cancel_unknown_and_terminal() {
        let handler = handler(GreetingAgentExecutor::new());
        assert!(matches!(
            handler.on_cancel_task(id("nope")).await,
            Err(A2AError::TaskNotFound { .. })
        ));

        handler
            .on_message_send(send(Message::user("hi").with_task_id("done")))
            .await
            .unwrap();
        assert!(matches!(
            handler.on_cancel_task(id("done")).await,
            Err(A2AError::TaskNotCancelable { status: TaskStatus::Completed, .. })
        ));
    }

    #[tokio::test]
    async fn test_cancel_during_execution() {
        let handler = handler(CancellableExecutor {
            stop: Notify::new(),
        });

        let send_task = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .on_message_send(send(Message::user("work").with_task_id("t")))
                    .await
            })
        };

        wait_for_status(&handler, "t", TaskStatus::Working).await;
        let canceled = handler.on_cancel_task(id("t")).await.unwrap();
        assert_eq!(canceled.status, TaskStatus::Canceled);

        let result = send_task.await.unwrap().unwrap();
        match result {
            SendMessageResult::Task(task) => assert_eq!(task.status, TaskStatus::Canceled),
            other => panic!("Expected task result, got {:?}", other),
        }

        let task = handler.on_get_task(id("t")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Canceled);
        assert_eq!(task.history.len(), 2);
    }

    #[tokio::test]
    async fn test_mock_cancel_is_invoked_with_task_context() {
        let mut executor = MockAgentExecutor::new();
        executor
            .expect_cancel()
            .withf(|ctx, _| ctx.task_id == "t")
            .times(1)
            .returning(|_, _| Ok(()));
        let handler = handler(executor);
        handler
            .store()
            .create(Task::new("t", Message::user("hi")))
            .await
            .unwrap();

        let task = handler.on_cancel_task(id("t")).await.unwrap();
        assert_eq!(task.status, TaskStatus::Canceled);
    }
}
