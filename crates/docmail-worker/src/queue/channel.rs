//! In-process queue over a tokio channel.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tracing::debug;

use docmail_core::error::AppError;
use docmail_core::result::AppResult;
use docmail_entity::job::QueuedJob;

use super::{JobQueue, JobSource};

/// Bounded in-process queue. Outcomes are only logged.
#[derive(Debug)]
pub struct ChannelQueue {
    tx: mpsc::Sender<QueuedJob>,
    rx: Mutex<mpsc::Receiver<QueuedJob>>,
}

impl ChannelQueue {
    /// Create a queue holding at most `capacity` pending jobs.
    pub fn new(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }
}

#[async_trait]
impl JobQueue for ChannelQueue {
    async fn enqueue(&self, job: QueuedJob) -> AppResult<()> {
        let (id, task) = (job.id, job.task.clone());
        self.tx.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                AppError::service_unavailable("Mail queue is full")
            }
            mpsc::error::TrySendError::Closed(_) => {
                AppError::service_unavailable("Mail queue is closed")
            }
        })?;
        debug!(job_id = %id, task = %task, "Enqueued job");
        Ok(())
    }

    async fn enqueue_batch(&self, jobs: Vec<QueuedJob>) -> AppResult<()> {
        if jobs.is_empty() {
            return Ok(());
        }
        let count = jobs.len();
        if count > self.tx.max_capacity() {
            return Err(AppError::service_unavailable(format!(
                "Mail queue holds at most {} jobs, {count} requested",
                self.tx.max_capacity()
            )));
        }
        let permits = self.tx.try_reserve_many(count).map_err(|e| match e {
            mpsc::error::TrySendError::Full(()) => {
                AppError::service_unavailable("Mail queue is full")
            }
            mpsc::error::TrySendError::Closed(()) => {
                AppError::service_unavailable("Mail queue is closed")
            }
        })?;
        for (permit, job) in permits.zip(jobs) {
            permit.send(job);
        }
        debug!(count, "Enqueued jobs");
        Ok(())
    }
}

#[async_trait]
impl JobSource for ChannelQueue {
    async fn next(&self, wait: Duration) -> AppResult<Option<QueuedJob>> {
        let mut rx = self.rx.lock().await;
        if wait.is_zero() {
            return Ok(rx.try_recv().ok());
        }
        Ok(tokio::time::timeout(wait, rx.recv()).await.ok().flatten())
    }

    async fn complete(&self, _job: &QueuedJob) -> AppResult<()> {
        Ok(())
    }

    async fn fail(&self, _job: &QueuedJob, _error: &str) -> AppResult<()> {
        Ok(())
    }
}
