//! palmar-store — persistence for hand records and identity profiles.
//!
//! Exposes the [`HandStore`] trait the recognition engine scans and enrolls
//! through, with a SQLite implementation for the daemon and an in-memory
//! implementation for tests and ephemeral runs.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use palmar_core::HandRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row id assigned by the backing store on insert.
pub type RecordId = i64;

/// Identity fields attached to a hand record at registration time.
///
/// The matching engine never inspects these; they exist only to be stored
/// and linked to a session id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityProfile {
    pub session_id: String,
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub email: String,
    pub address: String,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no hand record for session {session_id}")]
    NotFound { session_id: String },
    #[error("landmark encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] tokio_rusqlite::Error),
}

/// Storage collaborator contract for the recognition engine.
///
/// `find_all_hand_records` must yield records in insertion order — the
/// engine's first-match rule depends on that order being stable. Reads must
/// observe the caller's own completed writes (a freshly inserted session id
/// resolves immediately).
#[async_trait]
pub trait HandStore: Send + Sync {
    async fn find_all_hand_records(&self) -> Result<Vec<HandRecord>, StoreError>;

    async fn insert_hand_record(&self, record: &HandRecord) -> Result<RecordId, StoreError>;

    async fn find_hand_record_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<HandRecord>, StoreError>;

    /// Flip the registered flag. Fails with [`StoreError::NotFound`] when
    /// the session id resolves to no record.
    async fn update_hand_record_registered(
        &self,
        session_id: &str,
        registered: bool,
    ) -> Result<(), StoreError>;

    async fn insert_identity_record(&self, profile: &IdentityProfile) -> Result<(), StoreError>;
}
