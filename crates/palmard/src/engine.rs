//! Enrollment decision engine.
//!
//! One capture in, one of two terminal outcomes out: the capture matches a
//! stored hand, or it is enrolled as a new provisional record awaiting
//! registration.

use palmar_core::{normalize, DataError, FirstMatchMatcher, HandRecord, Landmark, Matcher};
use palmar_store::{HandStore, IdentityProfile, StoreError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid capture: {0}")]
    Data(#[from] DataError),
    #[error("no hand record for session {session_id}")]
    SessionNotFound { session_id: String },
    #[error("store error during {operation}: {source}")]
    Store {
        operation: &'static str,
        source: StoreError,
    },
}

/// Outcome of a capture submission.
#[derive(Debug, Clone)]
pub enum RecognizeOutcome {
    /// The capture matched an already-stored hand.
    Known { score: f64, registered: bool },
    /// The capture was enrolled as a new provisional record.
    New { session_id: String },
}

pub struct Engine {
    store: Arc<dyn HandStore>,
    matcher: FirstMatchMatcher,
    threshold: f64,
    /// Serializes the scan+insert sequence so two concurrent captures of
    /// the same unknown hand cannot both enroll it.
    enroll_gate: Mutex<()>,
}

impl Engine {
    pub fn new(store: Arc<dyn HandStore>, threshold: f64) -> Self {
        Self {
            store,
            matcher: FirstMatchMatcher,
            threshold,
            enroll_gate: Mutex::new(()),
        }
    }

    /// Decide whether a capture belongs to a known hand or enrolls a new one.
    ///
    /// Scans stored records in insertion order and accepts the first whose
    /// score falls below the threshold. No match mints a fresh session id
    /// and persists exactly one new record.
    pub async fn recognize(
        &self,
        landmarks: Vec<Landmark>,
        confidence: f64,
    ) -> Result<RecognizeOutcome, EngineError> {
        let probe = normalize(&landmarks)?;

        let _gate = self.enroll_gate.lock().await;

        let gallery = self
            .store
            .find_all_hand_records()
            .await
            .map_err(|source| EngineError::Store {
                operation: "find_all_hand_records",
                source,
            })?;

        let outcome = self.matcher.compare(&probe, &gallery, self.threshold);
        if outcome.matched {
            tracing::info!(
                score = outcome.score,
                session_id = outcome.session_id.as_deref().unwrap_or(""),
                registered = outcome.registered,
                "capture matched stored hand"
            );
            return Ok(RecognizeOutcome::Known {
                score: outcome.score,
                registered: outcome.registered,
            });
        }

        let session_id = uuid::Uuid::new_v4().to_string();
        let record = HandRecord {
            session_id: session_id.clone(),
            landmarks,
            normalized: probe,
            confidence,
            registered: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        self.store
            .insert_hand_record(&record)
            .await
            .map_err(|source| EngineError::Store {
                operation: "insert_hand_record",
                source,
            })?;

        tracing::info!(
            session_id = %session_id,
            scanned = gallery.len(),
            "enrolled new hand"
        );
        Ok(RecognizeOutcome::New { session_id })
    }

    /// Attach an identity profile to a previously enrolled hand.
    ///
    /// Inserts exactly one identity record, then flips the hand record's
    /// registered flag.
    pub async fn register(&self, profile: IdentityProfile) -> Result<(), EngineError> {
        let session_id = profile.session_id.clone();

        let record = self
            .store
            .find_hand_record_by_session(&session_id)
            .await
            .map_err(|source| EngineError::Store {
                operation: "find_hand_record_by_session",
                source,
            })?;
        if record.is_none() {
            tracing::warn!(session_id = %session_id, "registration for unknown session");
            return Err(EngineError::SessionNotFound { session_id });
        }

        self.store
            .insert_identity_record(&profile)
            .await
            .map_err(|source| EngineError::Store {
                operation: "insert_identity_record",
                source,
            })?;
        self.store
            .update_hand_record_registered(&session_id, true)
            .await
            .map_err(|source| EngineError::Store {
                operation: "update_hand_record_registered",
                source,
            })?;

        tracing::info!(session_id = %session_id, "registration complete");
        Ok(())
    }
}
