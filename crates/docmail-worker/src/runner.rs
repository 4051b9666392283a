//! Worker runner: the main loop that pulls jobs and executes them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tracing::{error, info, warn};

use docmail_core::config::WorkerConfig;
use docmail_entity::job::QueuedJob;

use crate::executor::{JobExecutionError, TaskRegistry};
use crate::queue::JobSource;

/// How long shutdown waits for in-flight jobs.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Counts of terminal outcomes produced by [`WorkerRunner::drain`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Jobs that ran to completion.
    pub completed: usize,
    /// Jobs that failed.
    pub failed: usize,
}

/// Worker runner that pulls jobs from a source and executes each once
#[derive(Debug, Clone)]
pub struct WorkerRunner {
    source: Arc<dyn JobSource>,
    registry: Arc<TaskRegistry>,
    concurrency: u32,
    poll_interval: Duration,
    worker_id: String,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        source: Arc<dyn JobSource>,
        registry: Arc<TaskRegistry>,
        config: &WorkerConfig,
        worker_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            registry,
            concurrency: u32::try_from(config.concurrency.clamp(1, Semaphore::MAX_PERMITS))
                .unwrap_or(u32::MAX),
            poll_interval: Duration::from_secs(config.poll_interval_seconds.max(1)),
            worker_id: worker_id.into(),
        }
    }

    /// Run until the cancel signal is received, then wait for in-flight jobs.
    ///
    /// Returns the number of jobs still running when the shutdown grace
    /// period elapsed.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) -> usize {
        info!(
            worker_id = %self.worker_id,
            concurrency = self.concurrency,
            poll_interval_secs = self.poll_interval.as_secs(),
            tasks = ?self.registry.registered_tasks(),
            "Worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency as usize));

        loop {
            if *cancel.borrow() {
                break;
            }

            let permit = tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        break;
                    }
                    continue;
                }
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };

            match self.source.next(self.poll_interval).await {
                Ok(Some(job)) => {
                    let source = Arc::clone(&self.source);
                    let registry = Arc::clone(&self.registry);
                    tokio::spawn(async move {
                        let _permit = permit;
                        process(source.as_ref(), &registry, &job).await;
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    error!(worker_id = %self.worker_id, error = %e, "Failed to fetch job");
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }

        info!(worker_id = %self.worker_id, "Worker waiting for in-flight jobs");
        let abandoned =
            match tokio::time::timeout(SHUTDOWN_GRACE, semaphore.acquire_many(self.concurrency))
                .await
            {
                Ok(_) => 0,
                Err(_) => (self.concurrency as usize).saturating_sub(semaphore.available_permits()),
            };
        if abandoned > 0 {
            warn!(
                worker_id = %self.worker_id,
                in_flight = abandoned,
                grace_secs = SHUTDOWN_GRACE.as_secs(),
                "Shutdown grace period elapsed, abandoning in-flight jobs"
            );
        } else {
            info!(worker_id = %self.worker_id, "Worker shut down");
        }
        abandoned
    }

    /// Execute every job currently available, one at a time, and return
    /// the outcome counts.
    pub async fn drain(&self) -> DrainReport {
        let mut report = DrainReport::default();
        loop {
            match self.source.next(Duration::ZERO).await {
                Ok(Some(job)) => {
                    if process(self.source.as_ref(), &self.registry, &job).await {
                        report.completed += 1;
                    } else {
                        report.failed += 1;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!(worker_id = %self.worker_id, error = %e, "Failed to fetch job");
                    break;
                }
            }
        }
        report
    }
}

/// Run one job and record its outcome. Returns `true` on success.
async fn process(source: &dyn JobSource, registry: &TaskRegistry, job: &QueuedJob) -> bool {
    info!(job_id = %job.id, task = %job.task, queue = %job.queue, "Processing job");

    let outcome = registry.execute(job).await;
    let message = match &outcome {
        Ok(()) => {
            if let Err(e) = source.complete(job).await {
                error!(job_id = %job.id, error = %e, "Failed to mark job as completed");
            }
            info!(job_id = %job.id, task = %job.task, "Job completed");
            return true;
        }
        Err(JobExecutionError::Permanent(msg)) => {
            warn!(job_id = %job.id, task = %job.task, error = %msg, "Job failed permanently");
            msg.clone()
        }
        Err(JobExecutionError::Internal(err)) => {
            error!(job_id = %job.id, task = %job.task, error = %err, "Job failed");
            err.to_string()
        }
    };

    if let Err(e) = source.fail(job, &message).await {
        error!(job_id = %job.id, error = %e, "Failed to mark job as failed");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::TaskHandler;
    use crate::queue::{ChannelQueue, JobQueue};
    use async_trait::async_trait;
    use docmail_core::types::TargetKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Default)]
    struct Counting {
        runs: AtomicUsize,
    }

    #[async_trait]
    impl TaskHandler for Counting {
        fn kind(&self) -> TargetKind {
            TargetKind::Document
        }

        async fn execute(&self, job: &QueuedJob) -> Result<(), JobExecutionError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if job.kwargs["fail"] == true {
                Err(JobExecutionError::Permanent("asked to fail".into()))
            } else {
                Ok(())
            }
        }
    }

    fn setup() -> (Arc<ChannelQueue>, Arc<Counting>, WorkerRunner) {
        let queue = Arc::new(ChannelQueue::new(16));
        let handler = Arc::new(Counting::default());
        let mut registry = TaskRegistry::new();
        registry.register(handler.clone());
        let runner = WorkerRunner::new(
            queue.clone(),
            Arc::new(registry),
            &WorkerConfig::default(),
            "test-worker",
        );
        (queue, handler, runner)
    }

    #[tokio::test]
    async fn test_drain_runs_each_job_once() {
        let (queue, handler, runner) = setup();
        for fail in [false, true, false] {
            queue
                .enqueue(QueuedJob::new(
                    "mailing",
                    "send_document",
                    serde_json::json!({ "fail": fail }),
                ))
                .await
                .unwrap();
        }

        let report = runner.drain().await;
        assert_eq!(report, DrainReport { completed: 2, failed: 1 });
        assert_eq!(handler.runs.load(Ordering::SeqCst), 3);
        assert_eq!(runner.drain().await, DrainReport::default());
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (queue, handler, runner) = setup();
        queue
            .enqueue(QueuedJob::new("mailing", "send_document", serde_json::json!({})))
            .await
            .unwrap();

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(async move { runner.run(rx).await });

        for _ in 0..100 {
            if handler.runs.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(true).unwrap();
        let abandoned = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .expect("runner stops")
            .unwrap();
        assert_eq!(abandoned, 0);
        assert_eq!(handler.runs.load(Ordering::SeqCst), 1);
    }

    #[derive(Debug, Default)]
    struct Stuck {
        started: AtomicUsize,
    }

    #[async_trait]
    impl TaskHandler for Stuck {
        fn kind(&self) -> TargetKind {
            TargetKind::DocumentFile
        }

        async fn execute(&self, _job: &QueuedJob) -> Result<(), JobExecutionError> {
            self.started.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_reports_jobs_still_running_after_grace() {
        let queue = Arc::new(ChannelQueue::new(4));
        let handler = Arc::new(Stuck::default());
        let mut registry = TaskRegistry::new();
        registry.register(handler.clone());
        let runner = WorkerRunner::new(
            queue.clone(),
            Arc::new(registry),
            &WorkerConfig::default(),
            "test-worker",
        );
        queue
            .enqueue(QueuedJob::new("mailing", "send_document_file", serde_json::json!({})))
            .await
            .unwrap();

        let (tx, rx) = watch::channel(false);
        let task = tokio::spawn(async move { runner.run(rx).await });
        while handler.started.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        tx.send(true).unwrap();

        assert_eq!(task.await.unwrap(), 1);
    }

    #[test]
    fn test_oversized_concurrency_is_clamped() {
        let config = WorkerConfig {
            concurrency: usize::MAX,
            ..WorkerConfig::default()
        };
        let runner = WorkerRunner::new(
            Arc::new(ChannelQueue::new(1)),
            Arc::new(TaskRegistry::new()),
            &config,
            "test-worker",
        );
        assert!(runner.concurrency >= 1);
        assert!(runner.concurrency as usize <= Semaphore::MAX_PERMITS);
    }
}
