//! Per-axis standardization of landmark sequences.
//!
//! Centers and scales each coordinate axis independently, which makes the
//! representation invariant to uniform translation and per-axis scale.
//! Rotation is NOT normalized: two captures of the same hand at different
//! wrist angles remain distinct sequences.

use crate::types::{Landmark, NormalizedLandmarks};
use thiserror::Error;

/// Guards the scale division when all points are coincident on an axis.
pub const NORMALIZE_EPSILON: f64 = 1e-10;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("empty landmark sequence")]
    Empty,
    #[error("non-finite coordinate at landmark {index}")]
    NonFinite { index: usize },
}

/// Standardize a landmark sequence per axis.
///
/// For each axis the arithmetic mean and population standard deviation are
/// taken across all points, then every coordinate maps to
/// `(v - mean) / (std + NORMALIZE_EPSILON)`. Output preserves the input
/// length and ordering.
pub fn normalize(points: &[Landmark]) -> Result<NormalizedLandmarks, DataError> {
    if points.is_empty() {
        return Err(DataError::Empty);
    }
    for (index, p) in points.iter().enumerate() {
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(DataError::NonFinite { index });
        }
    }

    let n = points.len() as f64;

    let mut mean = [0.0f64; 3];
    for p in points {
        mean[0] += p.x;
        mean[1] += p.y;
        mean[2] += p.z;
    }
    for m in &mut mean {
        *m /= n;
    }

    let mut var = [0.0f64; 3];
    for p in points {
        var[0] += (p.x - mean[0]).powi(2);
        var[1] += (p.y - mean[1]).powi(2);
        var[2] += (p.z - mean[2]).powi(2);
    }
    let std = var.map(|v| (v / n).sqrt());

    let points = points
        .iter()
        .map(|p| Landmark {
            x: (p.x - mean[0]) / (std[0] + NORMALIZE_EPSILON),
            y: (p.y - mean[1]) / (std[1] + NORMALIZE_EPSILON),
            z: (p.z - mean[2]) / (std[2] + NORMALIZE_EPSILON),
        })
        .collect();

    Ok(NormalizedLandmarks { points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HAND_LANDMARK_COUNT;

    fn sample_hand() -> Vec<Landmark> {
        (0..HAND_LANDMARK_COUNT)
            .map(|i| Landmark {
                x: 0.3 + 0.02 * i as f64,
                y: 0.7 - 0.015 * i as f64,
                z: 0.01 * ((i % 5) as f64),
            })
            .collect()
    }

    fn axis_stats(points: &[Landmark], axis: fn(&Landmark) -> f64) -> (f64, f64) {
        let n = points.len() as f64;
        let mean = points.iter().map(axis).sum::<f64>() / n;
        let var = points.iter().map(|p| (axis(p) - mean).powi(2)).sum::<f64>() / n;
        (mean, var.sqrt())
    }

    #[test]
    fn test_output_has_zero_mean_unit_std() {
        let normalized = normalize(&sample_hand()).unwrap();
        for axis in [
            (|p: &Landmark| p.x) as fn(&Landmark) -> f64,
            |p: &Landmark| p.y,
            |p: &Landmark| p.z,
        ] {
            let (mean, std) = axis_stats(&normalized.points, axis);
            assert!(mean.abs() < 1e-9, "mean {mean}");
            assert!((std - 1.0).abs() < 1e-6, "std {std}");
        }
    }

    #[test]
    fn test_preserves_length_and_order() {
        let hand = sample_hand();
        let normalized = normalize(&hand).unwrap();
        assert_eq!(normalized.points.len(), hand.len());
        // The ramp along x must still be monotonically increasing.
        for pair in normalized.points.windows(2) {
            assert!(pair[0].x < pair[1].x);
        }
    }

    #[test]
    fn test_invariant_under_scale_and_translation() {
        let hand = sample_hand();
        let transformed: Vec<Landmark> = hand
            .iter()
            .map(|p| Landmark {
                x: 3.0 * p.x + 12.5,
                y: 0.25 * p.y - 4.0,
                z: 7.0 * p.z + 0.5,
            })
            .collect();

        let a = normalize(&hand).unwrap();
        let b = normalize(&transformed).unwrap();
        for (p, q) in a.points.iter().zip(b.points.iter()) {
            assert!((p.x - q.x).abs() < 1e-9);
            assert!((p.y - q.y).abs() < 1e-9);
            assert!((p.z - q.z).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_input_fails() {
        assert!(matches!(normalize(&[]), Err(DataError::Empty)));
    }

    #[test]
    fn test_non_finite_input_fails() {
        let mut hand = sample_hand();
        hand[7].y = f64::NAN;
        assert!(matches!(
            normalize(&hand),
            Err(DataError::NonFinite { index: 7 })
        ));

        hand[7].y = f64::INFINITY;
        assert!(matches!(
            normalize(&hand),
            Err(DataError::NonFinite { index: 7 })
        ));
    }

    #[test]
    fn test_coincident_points_stay_finite() {
        let hand = vec![Landmark { x: 0.5, y: 0.5, z: 0.0 }; HAND_LANDMARK_COUNT];
        let normalized = normalize(&hand).unwrap();
        for p in &normalized.points {
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            // Zero spread centers everything at the origin.
            assert_eq!((p.x, p.y, p.z), (0.0, 0.0, 0.0));
        }
    }
}
