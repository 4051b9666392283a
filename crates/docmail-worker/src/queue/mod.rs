//! Job queue seams.
//!
//! The controller only sees [`JobQueue`]: enqueueing is one-way and
//! returns no handle to the job's outcome. Workers pull from a
//! [`JobSource`].

pub mod channel;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;

use docmail_core::result::AppResult;
use docmail_entity::job::QueuedJob;

pub use channel::ChannelQueue;
pub use postgres::PgJobQueue;

/// Accepts jobs for later execution.
#[async_trait]
pub trait JobQueue: Send + Sync + std::fmt::Debug + 'static {
    /// Place a job on the queue without waiting for it to run.
    async fn enqueue(&self, job: QueuedJob) -> AppResult<()>;

    /// Place every job on the queue, or none of them.
    async fn enqueue_batch(&self, jobs: Vec<QueuedJob>) -> AppResult<()>;
}

/// Hands jobs to workers and records their terminal outcome.
#[async_trait]
pub trait JobSource: Send + Sync + std::fmt::Debug + 'static {
    /// Next job, waiting at most `wait` for one to arrive.
    async fn next(&self, wait: Duration) -> AppResult<Option<QueuedJob>>;

    /// Record that the job succeeded.
    async fn complete(&self, job: &QueuedJob) -> AppResult<()>;

    /// Record that the job failed. It will not run again.
    async fn fail(&self, job: &QueuedJob, error: &str) -> AppResult<()>;
}
