//! Gallery scanning and the match acceptance rule.

use crate::normalize::normalize;
use crate::types::{HandRecord, NormalizedLandmarks};

/// Score cutoff below which two captures are considered the same hand.
pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.5;

/// Result of scanning a probe against stored records.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub matched: bool,
    /// Score of the accepted record, or the best score seen when nothing
    /// was accepted (`f64::INFINITY` for an empty gallery).
    pub score: f64,
    /// Session id of the accepted record (if any).
    pub session_id: Option<String>,
    /// Registration status of the accepted record.
    pub registered: bool,
}

/// Strategy for resolving a probe against the stored gallery.
pub trait Matcher {
    fn compare(
        &self,
        probe: &NormalizedLandmarks,
        gallery: &[HandRecord],
        threshold: f64,
    ) -> MatchOutcome;
}

/// First-under-threshold scan in gallery order.
///
/// Walks records in slice order (the store yields insertion order) and
/// accepts the FIRST one whose score is strictly below the threshold — not
/// the globally closest. The tie-break is therefore stable: the earliest
/// enrolled near-duplicate wins. Each record is re-standardized from its
/// raw landmarks on every scan; a record that fails standardization scores
/// as maximal dissimilarity and is logged, never propagated.
pub struct FirstMatchMatcher;

impl Matcher for FirstMatchMatcher {
    fn compare(
        &self,
        probe: &NormalizedLandmarks,
        gallery: &[HandRecord],
        threshold: f64,
    ) -> MatchOutcome {
        let mut best = f64::INFINITY;

        for record in gallery {
            let score = match normalize(&record.landmarks) {
                Ok(stored) => probe.distance(&stored),
                Err(err) => {
                    tracing::warn!(
                        session_id = %record.session_id,
                        error = %err,
                        "skipping unscorable stored record"
                    );
                    f64::INFINITY
                }
            };
            tracing::debug!(session_id = %record.session_id, score, "scored stored record");

            if score < best {
                best = score;
            }
            if score < threshold {
                return MatchOutcome {
                    matched: true,
                    score,
                    session_id: Some(record.session_id.clone()),
                    registered: record.registered,
                };
            }
        }

        MatchOutcome {
            matched: false,
            score: best,
            session_id: None,
            registered: false,
        }
    }
}
