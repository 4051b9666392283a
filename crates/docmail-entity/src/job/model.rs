//! Job entity models.

use chrono::{DateTime, Utc};
use docmail_core::types::JobId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::JobStatus;

/// A job as it travels from the controller to a worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedJob {
    /// Unique job identifier.
    pub id: JobId,
    /// Queue name.
    pub queue: String,
    /// Task name (e.g., `"send_document_file"`).
    pub task: String,
    /// Keyword arguments, a JSON object.
    pub kwargs: serde_json::Value,
    /// When the job was enqueued.
    pub enqueued_at: DateTime<Utc>,
}

impl QueuedJob {
    /// Create a job with a fresh id.
    pub fn new(
        queue: impl Into<String>,
        task: impl Into<String>,
        kwargs: serde_json::Value,
    ) -> Self {
        Self {
            id: JobId::new(),
            queue: queue.into(),
            task: task.into(),
            kwargs,
            enqueued_at: Utc::now(),
        }
    }
}

/// A row of the `jobs` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRecord {
    /// Unique job identifier.
    pub id: uuid::Uuid,
    /// Queue name.
    pub queue: String,
    /// Task name.
    pub task: String,
    /// Keyword arguments.
    pub kwargs: serde_json::Value,
    /// Current status.
    pub status: JobStatus,
    /// Error message on failure.
    pub error_message: Option<String>,
    /// Worker that claimed the job.
    pub worker_id: Option<String>,
    /// When the job was enqueued.
    pub created_at: DateTime<Utc>,
    /// When a worker claimed the job.
    pub started_at: Option<DateTime<Utc>>,
    /// When the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<JobRecord> for QueuedJob {
    fn from(record: JobRecord) -> Self {
        Self {
            id: JobId(record.id),
            queue: record.queue,
            task: record.task,
            kwargs: record.kwargs,
            enqueued_at: record.created_at,
        }
    }
}
