//! Task registry that dispatches jobs to registered handlers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use docmail_core::error::AppError;
use docmail_core::types::TargetKind;
use docmail_entity::job::QueuedJob;

/// Trait for task handler implementations
#[async_trait]
pub trait TaskHandler: Send + Sync + std::fmt::Debug {
    /// Kind of target this handler sends.
    fn kind(&self) -> TargetKind;

    /// Execute the job. The result is discarded by the runner.
    async fn execute(&self, job: &QueuedJob) -> Result<(), JobExecutionError>;
}

/// Error from job execution. Jobs are never retried, so there is no
/// transient variant.
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// The job can never succeed (bad arguments, missing mailer).
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Something failed while running the job.
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Maps each target kind to its handler; built explicitly at startup.
#[derive(Debug, Default)]
pub struct TaskRegistry {
    handlers: HashMap<TargetKind, Arc<dyn TaskHandler>>,
}

impl TaskRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its kind's task name
    pub fn register(&mut self, handler: Arc<dyn TaskHandler>) {
        let kind = handler.kind();
        info!(task = kind.task_name(), "Registered task handler");
        self.handlers.insert(kind, handler);
    }

    /// Execute a job by dispatching to the handler for its task name
    pub async fn execute(&self, job: &QueuedJob) -> Result<(), JobExecutionError> {
        let handler = TargetKind::from_task_name(&job.task)
            .and_then(|kind| self.handlers.get(&kind))
            .ok_or_else(|| {
                JobExecutionError::Permanent(format!(
                    "No handler registered for task '{}'",
                    job.task
                ))
            })?;

        handler.execute(job).await
    }

    /// Check if a handler is registered for a task name
    pub fn has_handler(&self, task: &str) -> bool {
        TargetKind::from_task_name(task).is_some_and(|kind| self.handlers.contains_key(&kind))
    }

    /// Registered task names
    pub fn registered_tasks(&self) -> Vec<&'static str> {
        self.handlers.keys().map(|k| k.task_name()).collect()
    }
}
