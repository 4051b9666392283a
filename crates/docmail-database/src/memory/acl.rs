//! In-memory ACL store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use docmail_core::result::AppResult;
use docmail_core::types::{AclEntryId, UserId};
use docmail_entity::permission::{AclEntry, CreateAclEntry, Permission};

use crate::store::AclStore;

/// ACL entries held in memory.
#[derive(Debug)]
pub struct MemoryAclStore {
    entries: DashMap<AclEntryId, AclEntry>,
    sequence: AtomicI64,
}

impl MemoryAclStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicI64::new(1),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryAclStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn has_grant(
        &self,
        user_id: UserId,
        resource_type: &str,
        resource_id: i64,
        permission: Permission,
    ) -> AppResult<bool> {
        Ok(self
            .entries
            .iter()
            .any(|e| e.grants(user_id, resource_type, resource_id, permission)))
    }

    async fn grant(&self, data: &CreateAclEntry) -> AppResult<AclEntry> {
        let entry = AclEntry {
            id: AclEntryId(self.sequence.fetch_add(1, Ordering::Relaxed)),
            resource_type: data.resource_type.clone(),
            resource_id: data.resource_id,
            user_id: data.user_id,
            permission: data.permission,
            created_at: Utc::now(),
        };
        self.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }
}
