//! In-memory store for tests and ephemeral daemon runs.

use crate::{HandStore, IdentityProfile, RecordId, StoreError};
use async_trait::async_trait;
use palmar_core::HandRecord;
use tokio::sync::RwLock;

/// Vec-backed store; insertion order is the scan order.
#[derive(Default)]
pub struct MemoryStore {
    hands: RwLock<Vec<HandRecord>>,
    identities: RwLock<Vec<IdentityProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored hand records.
    pub async fn hand_count(&self) -> usize {
        self.hands.read().await.len()
    }

    /// Number of stored identity profiles.
    pub async fn identity_count(&self) -> usize {
        self.identities.read().await.len()
    }
}

#[async_trait]
impl HandStore for MemoryStore {
    async fn find_all_hand_records(&self) -> Result<Vec<HandRecord>, StoreError> {
        Ok(self.hands.read().await.clone())
    }

    async fn insert_hand_record(&self, record: &HandRecord) -> Result<RecordId, StoreError> {
        let mut hands = self.hands.write().await;
        hands.push(record.clone());
        Ok(hands.len() as RecordId)
    }

    async fn find_hand_record_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<HandRecord>, StoreError> {
        Ok(self
            .hands
            .read()
            .await
            .iter()
            .find(|r| r.session_id == session_id)
            .cloned())
    }

    async fn update_hand_record_registered(
        &self,
        session_id: &str,
        registered: bool,
    ) -> Result<(), StoreError> {
        let mut hands = self.hands.write().await;
        match hands.iter_mut().find(|r| r.session_id == session_id) {
            Some(record) => {
                record.registered = registered;
                Ok(())
            }
            None => Err(StoreError::NotFound {
                session_id: session_id.to_string(),
            }),
        }
    }

    async fn insert_identity_record(&self, profile: &IdentityProfile) -> Result<(), StoreError> {
        self.identities.write().await.push(profile.clone());
        Ok(())
    }
}
