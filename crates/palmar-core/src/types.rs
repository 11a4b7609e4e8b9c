use serde::{Deserialize, Serialize};

/// Number of landmarks in one hand-pose skeleton.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One anatomically defined point on a hand, as 3-D coordinates.
///
/// Serialized as a bare `[x, y, z]` triple — the format hand-tracking
/// frontends emit and the wire format of the capture endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<[f64; 3]> for Landmark {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(p: Landmark) -> Self {
        [p.x, p.y, p.z]
    }
}

impl Landmark {
    /// Euclidean distance to another landmark.
    pub fn distance(&self, other: &Landmark) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2))
            .sqrt()
    }
}

/// A landmark sequence after per-axis standardization.
///
/// Only produced by [`normalize`](crate::normalize::normalize); the scorer
/// accepts nothing else, so raw captures cannot reach a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmarks {
    pub points: Vec<Landmark>,
}

impl NormalizedLandmarks {
    /// Mean per-point Euclidean distance to another standardized sequence.
    ///
    /// Lower = more similar; 0 for an identical sequence. Sequences of
    /// different lengths score `f64::INFINITY` instead of failing, so one
    /// malformed stored record can never match and never aborts a scan.
    pub fn distance(&self, other: &NormalizedLandmarks) -> f64 {
        if self.points.len() != other.points.len() {
            return f64::INFINITY;
        }
        let total: f64 = self
            .points
            .iter()
            .zip(other.points.iter())
            .map(|(a, b)| a.distance(b))
            .sum();
        total / self.points.len() as f64
    }
}

/// A stored hand capture with its enrollment metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRecord {
    /// Opaque token linking this capture to a later registration.
    pub session_id: String,
    /// Raw landmarks exactly as captured.
    pub landmarks: Vec<Landmark>,
    /// Standardized form cached at insert time. Advisory only: scans
    /// recompute from `landmarks`, so the two cannot diverge silently.
    pub normalized: NormalizedLandmarks,
    /// Detection confidence reported by the capture frontend.
    pub confidence: f64,
    /// True once an identity profile has been attached.
    pub registered: bool,
    /// RFC 3339 insert timestamp.
    pub created_at: String,
}
