//! palmar-core — Hand geometry matching engine.
//!
//! Standardizes 21-point hand-landmark captures (MediaPipe hand skeleton)
//! and scores them against stored records with a mean point-distance rule.

pub mod matcher;
pub mod normalize;
pub mod types;

pub use matcher::{FirstMatchMatcher, MatchOutcome, Matcher, DEFAULT_MATCH_THRESHOLD};
pub use normalize::{normalize, DataError};
pub use types::{HandRecord, Landmark, NormalizedLandmarks, HAND_LANDMARK_COUNT};
