//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Which queue implementation carries jobs from the controller to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    /// In-process tokio channel; the worker runs inside the server process.
    Channel,
    /// `jobs` table in PostgreSQL; workers may run in separate processes.
    Postgres,
}

/// Background job worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker runs inside the server process.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Queue implementation.
    #[serde(default = "default_backend")]
    pub backend: QueueBackend,
    /// Name of the queue mail jobs are placed on.
    #[serde(default = "default_queue")]
    pub queue: String,
    /// Number of concurrent job processing tasks.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interval in seconds between job queue polls when the queue is empty.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Buffer size of the in-process channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            backend: default_backend(),
            queue: default_queue(),
            concurrency: default_concurrency(),
            poll_interval_seconds: default_poll_interval(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_backend() -> QueueBackend {
    QueueBackend::Channel
}

fn default_queue() -> String {
    "mailing".to_string()
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval() -> u64 {
    2
}

fn default_channel_capacity() -> usize {
    1024
}
