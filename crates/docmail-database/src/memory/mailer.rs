//! In-memory mailer profile store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use docmail_core::result::AppResult;
use docmail_core::types::UserMailerId;
use docmail_entity::mailer::UserMailer;

use crate::store::MailerStore;

/// Mailer profiles held in memory.
#[derive(Debug)]
pub struct MemoryMailerStore {
    mailers: DashMap<UserMailerId, UserMailer>,
    sequence: AtomicI64,
}

impl MemoryMailerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            mailers: DashMap::new(),
            sequence: AtomicI64::new(1),
        }
    }

    /// Insert an enabled profile.
    pub fn add(
        &self,
        label: &str,
        backend_path: &str,
        backend_data: serde_json::Value,
        is_default: bool,
    ) -> UserMailer {
        let mailer = UserMailer {
            id: UserMailerId(self.sequence.fetch_add(1, Ordering::Relaxed)),
            label: label.to_string(),
            enabled: true,
            is_default,
            backend_path: backend_path.to_string(),
            backend_data,
            created_at: Utc::now(),
        };
        self.mailers.insert(mailer.id, mailer.clone());
        mailer
    }

    /// Enable or disable a profile.
    pub fn set_enabled(&self, id: UserMailerId, enabled: bool) {
        if let Some(mut mailer) = self.mailers.get_mut(&id) {
            mailer.enabled = enabled;
        }
    }

    /// Delete a profile.
    pub fn remove(&self, id: UserMailerId) {
        self.mailers.remove(&id);
    }
}

impl Default for MemoryMailerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MailerStore for MemoryMailerStore {
    async fn find_by_id(&self, id: UserMailerId) -> AppResult<Option<UserMailer>> {
        Ok(self.mailers.get(&id).map(|m| m.clone()))
    }

    async fn find_default(&self) -> AppResult<Option<UserMailer>> {
        Ok(self
            .mailers
            .iter()
            .filter(|m| m.enabled && m.is_default)
            .min_by_key(|m| m.id)
            .map(|m| m.clone()))
    }
}
