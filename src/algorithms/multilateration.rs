//! Linearized least-squares multilateration
//!
//! Turns three or more anchor/range pairs into a single planar position.
//! Subtracting the reference anchor's squared-range equation from every other
//! pair's cancels the quadratic terms and leaves one linear equation per pair:
//!
//! `2(xi - x0)·x + 2(yi - y0)·y = (d0² - di²) + (xi² - x0²) + (yi² - y0²)`
//!
//! The rows are accumulated into a symmetric 2x2 normal-equation system and
//! solved in closed form. Degenerate geometry (collinear or coincident
//! anchors) makes the system singular and is reported, never silently solved.

use nalgebra::{Matrix2, Vector2};

use crate::core::constants::{MIN_RANGING_ANCHORS, SINGULARITY_EPSILON};
use crate::core::types::RangedAnchor;
use crate::validation::data::MeasurementValidator;
use crate::validation::error::{FusionError, FusionResult};

/// Stateless multilateration solver
///
/// Deterministic: identical input rows in the same order give identical
/// output. The accumulation is order-insensitive up to floating-point
/// summation order.
#[derive(Debug, Clone)]
pub struct MultilaterationSolver {
    /// Minimum usable anchor/range pairs
    min_anchors: usize,
    /// Singularity threshold on the normal-equation determinant
    epsilon: f64,
    validator: MeasurementValidator,
}

impl Default for MultilaterationSolver {
    fn default() -> Self {
        Self {
            min_anchors: MIN_RANGING_ANCHORS,
            epsilon: SINGULARITY_EPSILON,
            validator: MeasurementValidator::new(),
        }
    }
}

impl MultilaterationSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solve for the planar position minimizing the squared residuals of the
    /// linearized range equations.
    pub fn solve(&self, ranged: &[RangedAnchor]) -> FusionResult<(f64, f64)> {
        if ranged.len() < self.min_anchors {
            return Err(FusionError::InsufficientAnchors {
                available: ranged.len(),
                required: self.min_anchors,
                anchor_ids: ranged.iter().map(|r| r.id.clone()).collect(),
            });
        }
        self.validator.check_batch(ranged)?;

        let reference = &ranged[0];
        let d0_sq = reference.distance_m * reference.distance_m;

        // Normal equations: N = sum(a_i a_i^T), rhs = sum(a_i b_i)
        let mut normal = Matrix2::<f64>::zeros();
        let mut rhs = Vector2::<f64>::zeros();

        for pair in &ranged[1..] {
            let ax = 2.0 * (pair.x - reference.x);
            let ay = 2.0 * (pair.y - reference.y);
            let b = (d0_sq - pair.distance_m * pair.distance_m)
                + (pair.x * pair.x - reference.x * reference.x)
                + (pair.y * pair.y - reference.y * reference.y);

            normal[(0, 0)] += ax * ax;
            normal[(0, 1)] += ax * ay;
            normal[(1, 0)] += ax * ay;
            normal[(1, 1)] += ay * ay;
            rhs[0] += ax * b;
            rhs[1] += ay * b;
        }

        // Closed-form Cramer solve of the symmetric 2x2 system
        let det = normal[(0, 0)] * normal[(1, 1)] - normal[(0, 1)] * normal[(1, 0)];
        if det.abs() <= self.epsilon {
            return Err(FusionError::DegenerateGeometry {
                determinant: det,
                anchor_ids: ranged.iter().map(|r| r.id.clone()).collect(),
            });
        }

        let x = (normal[(1, 1)] * rhs[0] - normal[(0, 1)] * rhs[1]) / det;
        let y = (normal[(0, 0)] * rhs[1] - normal[(1, 0)] * rhs[0]) / det;
        Ok((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranged(id: &str, x: f64, y: f64, distance_m: f64) -> RangedAnchor {
        RangedAnchor {
            id: id.into(),
            x,
            y,
            distance_m,
            stddev_m: 0.3,
        }
    }

    fn exact_batch(anchors: &[(f64, f64)], truth: (f64, f64)) -> Vec<RangedAnchor> {
        anchors
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let d = ((truth.0 - x).powi(2) + (truth.1 - y).powi(2)).sqrt();
                ranged(&format!("a{}", i + 1), x, y, d)
            })
            .collect()
    }

    #[test]
    fn recovers_exact_position_from_noiseless_ranges() {
        let solver = MultilaterationSolver::new();
        let batch = exact_batch(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)], (5.0, 3.0));

        let (x, y) = solver.solve(&batch).unwrap();
        assert!((x - 5.0).abs() < 1e-6);
        assert!((y - 3.0).abs() < 1e-6);
    }

    #[test]
    fn recovers_exact_position_with_redundant_anchors() {
        let solver = MultilaterationSolver::new();
        let batch = exact_batch(
            &[(0.0, 0.0), (12.0, 0.0), (12.0, 9.0), (0.0, 9.0), (6.0, 4.0)],
            (3.5, 6.25),
        );

        let (x, y) = solver.solve(&batch).unwrap();
        assert!((x - 3.5).abs() < 1e-6);
        assert!((y - 6.25).abs() < 1e-6);
    }

    #[test]
    fn solution_is_deterministic_for_fixed_ordering() {
        let solver = MultilaterationSolver::new();
        let batch = exact_batch(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)], (2.0, 2.0));

        let first = solver.solve(&batch).unwrap();
        let second = solver.solve(&batch).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn collinear_anchors_are_degenerate() {
        let solver = MultilaterationSolver::new();
        let batch = vec![
            ranged("a1", 0.0, 0.0, 4.0),
            ranged("a2", 5.0, 0.0, 3.0),
            ranged("a3", 10.0, 0.0, 7.0),
        ];

        match solver.solve(&batch) {
            Err(FusionError::DegenerateGeometry { anchor_ids, .. }) => {
                assert_eq!(anchor_ids, vec!["a1", "a2", "a3"]);
            }
            other => panic!("expected DegenerateGeometry, got {:?}", other),
        }
    }

    #[test]
    fn two_pairs_are_insufficient() {
        let solver = MultilaterationSolver::new();
        let batch = vec![ranged("a1", 0.0, 0.0, 4.0), ranged("a2", 5.0, 0.0, 3.0)];

        match solver.solve(&batch) {
            Err(FusionError::InsufficientAnchors {
                available,
                required,
                ..
            }) => {
                assert_eq!(available, 2);
                assert_eq!(required, 3);
            }
            other => panic!("expected InsufficientAnchors, got {:?}", other),
        }
    }

    #[test]
    fn non_finite_distance_is_rejected_before_solving() {
        let solver = MultilaterationSolver::new();
        let mut batch = exact_batch(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.0)], (5.0, 3.0));
        batch[1].distance_m = f64::NAN;

        assert!(matches!(
            solver.solve(&batch),
            Err(FusionError::InvalidMeasurement { .. })
        ));
    }
}
