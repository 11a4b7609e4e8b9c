//! SQLite-backed store.
//!
//! Landmark vectors are stored as JSON text columns; `session_id` carries a
//! UNIQUE constraint so a racing duplicate enroll fails in the database even
//! if it slips past the engine's single-writer gate.

use crate::{HandStore, IdentityProfile, RecordId, StoreError};
use async_trait::async_trait;
use palmar_core::{HandRecord, Landmark, NormalizedLandmarks};
use std::path::Path;
use tokio_rusqlite::Connection;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS hand_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL UNIQUE,
    landmarks TEXT NOT NULL,
    normalized_landmarks TEXT NOT NULL,
    confidence REAL NOT NULL,
    registered INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS identity_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    session_id TEXT NOT NULL,
    name TEXT NOT NULL,
    age INTEGER NOT NULL,
    contact TEXT NOT NULL,
    email TEXT NOT NULL,
    address TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_hand_records_session ON hand_records(session_id);
"#;

const RECORD_COLUMNS: &str =
    "session_id, landmarks, normalized_landmarks, confidence, registered, created_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and ensure the schema.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path.to_path_buf()).await?;
        Self::init(conn).await
    }

    /// Fully in-memory database, used by tests and throwaway runs.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<HandRecord> {
    let session_id: String = row.get(0)?;
    let landmarks_json: String = row.get(1)?;
    let normalized_json: String = row.get(2)?;
    let confidence: f64 = row.get(3)?;
    let registered: bool = row.get(4)?;
    let created_at: String = row.get(5)?;

    let landmarks: Vec<Landmark> = decode_column(1, &landmarks_json)?;
    let points: Vec<Landmark> = decode_column(2, &normalized_json)?;

    Ok(HandRecord {
        session_id,
        landmarks,
        normalized: NormalizedLandmarks { points },
        confidence,
        registered,
        created_at,
    })
}

fn decode_column<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> rusqlite::Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[async_trait]
impl HandStore for SqliteStore {
    async fn find_all_hand_records(&self) -> Result<Vec<HandRecord>, StoreError> {
        let records = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM hand_records ORDER BY id ASC"
                ))?;
                let records = stmt
                    .query_map([], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(records)
            })
            .await?;
        Ok(records)
    }

    async fn insert_hand_record(&self, record: &HandRecord) -> Result<RecordId, StoreError> {
        let landmarks = serde_json::to_string(&record.landmarks)?;
        let normalized = serde_json::to_string(&record.normalized.points)?;
        let record = record.clone();

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    &format!("INSERT INTO hand_records ({RECORD_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
                    rusqlite::params![
                        record.session_id,
                        landmarks,
                        normalized,
                        record.confidence,
                        record.registered,
                        record.created_at,
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        tracing::debug!(id, "hand record inserted");
        Ok(id)
    }

    async fn find_hand_record_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<HandRecord>, StoreError> {
        let session = session_id.to_string();
        let record = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {RECORD_COLUMNS} FROM hand_records WHERE session_id = ?1"
                ))?;
                let mut rows = stmt.query_map([session], row_to_record)?;
                rows.next().transpose().map_err(Into::into)
            })
            .await?;
        Ok(record)
    }

    async fn update_hand_record_registered(
        &self,
        session_id: &str,
        registered: bool,
    ) -> Result<(), StoreError> {
        let session = session_id.to_string();
        let updated = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    "UPDATE hand_records SET registered = ?1 WHERE session_id = ?2",
                    rusqlite::params![registered, session],
                )?;
                Ok(n)
            })
            .await?;

        if updated == 0 {
            return Err(StoreError::NotFound {
                session_id: session_id.to_string(),
            });
        }
        Ok(())
    }

    async fn insert_identity_record(&self, profile: &IdentityProfile) -> Result<(), StoreError> {
        let profile = profile.clone();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO identity_records (session_id, name, age, contact, email, address, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                    rusqlite::params![
                        profile.session_id,
                        profile.name,
                        profile.age,
                        profile.contact,
                        profile.email,
                        profile.address,
                        created_at,
                    ],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }
}
