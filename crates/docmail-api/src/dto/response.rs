//! Response bodies.

use serde::{Deserialize, Serialize};

/// Body of a successful mail submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailResponse {
    /// Number of jobs queued.
    pub queued: usize,
    /// Confirmation message for the user.
    pub message: String,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected`, `unavailable` or `memory`.
    pub database: String,
    /// `available` or `unavailable`.
    pub storage: String,
}
