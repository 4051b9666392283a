//! Durable queue over the `jobs` table.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use docmail_core::result::AppResult;
use docmail_database::repositories::JobRepository;
use docmail_entity::job::QueuedJob;

use super::{JobQueue, JobSource};

/// Queue persisted in PostgreSQL; several workers may share it.
#[derive(Debug, Clone)]
pub struct PgJobQueue {
    repo: JobRepository,
    queue: String,
    worker_id: String,
}

impl PgJobQueue {
    /// Create a queue reading jobs of `queue` on behalf of `worker_id`.
    pub fn new(repo: JobRepository, queue: impl Into<String>, worker_id: impl Into<String>) -> Self {
        Self {
            repo,
            queue: queue.into(),
            worker_id: worker_id.into(),
        }
    }
}

#[async_trait]
impl JobQueue for PgJobQueue {
    async fn enqueue(&self, job: QueuedJob) -> AppResult<()> {
        let record = self.repo.create(&job).await?;
        debug!(job_id = %record.id, task = %record.task, queue = %record.queue, "Enqueued job");
        Ok(())
    }

    async fn enqueue_batch(&self, jobs: Vec<QueuedJob>) -> AppResult<()> {
        self.repo.create_many(&jobs).await?;
        debug!(count = jobs.len(), queue = %self.queue, "Enqueued jobs");
        Ok(())
    }
}

#[async_trait]
impl JobSource for PgJobQueue {
    async fn next(&self, wait: Duration) -> AppResult<Option<QueuedJob>> {
        match self.repo.dequeue(&self.queue, &self.worker_id).await? {
            Some(record) => Ok(Some(record.into())),
            None => {
                if !wait.is_zero() {
                    tokio::time::sleep(wait).await;
                }
                Ok(None)
            }
        }
    }

    async fn complete(&self, job: &QueuedJob) -> AppResult<()> {
        self.repo.complete(job.id.into_uuid()).await
    }

    async fn fail(&self, job: &QueuedJob, error: &str) -> AppResult<()> {
        self.repo.fail(job.id.into_uuid(), error).await
    }
}
