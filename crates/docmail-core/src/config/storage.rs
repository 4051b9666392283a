//! Document content storage configuration.

use serde::{Deserialize, Serialize};

/// Where document file and version content is read from when an email
/// carries an attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory of the local storage provider.
    #[serde(default = "default_root")]
    pub root: String,
    /// Largest attachment, in bytes, that will be read into an email.
    #[serde(default = "default_max_attachment")]
    pub max_attachment_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_attachment_bytes: default_max_attachment(),
        }
    }
}

fn default_root() -> String {
    "data/storage".to_string()
}

fn default_max_attachment() -> u64 {
    25 * 1024 * 1024
}
