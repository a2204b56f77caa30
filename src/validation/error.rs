//! Error classification for the position fusion engine
//!
//! Every error here is recoverable: the filter keeps its last valid state
//! across a rejected batch, and the host retries on its own cadence. There is
//! no retry inside the core.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result type for fusion operations
pub type FusionResult<T> = Result<T, FusionError>;

/// Failure modes of the solver and filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FusionError {
    /// Fewer resolvable anchor/range pairs than the solve requires
    InsufficientAnchors {
        available: usize,
        required: usize,
        /// Ids of the pairs that were resolvable, for diagnostics
        anchor_ids: Vec<String>,
    },
    /// The linearized range system is singular or near-singular, e.g. all
    /// anchors collinear or too close together
    DegenerateGeometry {
        determinant: f64,
        /// The offending anchor set
        anchor_ids: Vec<String>,
    },
    /// Non-positive sigma, or a non-finite distance/coordinate input
    InvalidMeasurement {
        /// Which quantity was rejected
        quantity: String,
        value: f64,
    },
}

impl FusionError {
    pub fn invalid(quantity: impl Into<String>, value: f64) -> Self {
        FusionError::InvalidMeasurement {
            quantity: quantity.into(),
            value,
        }
    }

    /// All fusion errors leave the filter state intact and are safe to retry
    /// next cycle.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

impl fmt::Display for FusionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FusionError::InsufficientAnchors {
                available,
                required,
                ..
            } => write!(
                f,
                "insufficient anchors: {} resolvable, {} required",
                available, required
            ),
            FusionError::DegenerateGeometry {
                determinant,
                anchor_ids,
            } => write!(
                f,
                "degenerate anchor geometry (det = {:.3e}, anchors: {})",
                determinant,
                anchor_ids.join(", ")
            ),
            FusionError::InvalidMeasurement { quantity, value } => {
                write!(f, "invalid measurement: {} = {}", quantity, value)
            }
        }
    }
}

impl std::error::Error for FusionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_anchors() {
        let err = FusionError::DegenerateGeometry {
            determinant: 0.0,
            anchor_ids: vec!["a1".into(), "a2".into(), "a3".into()],
        };
        let text = err.to_string();
        assert!(text.contains("a1, a2, a3"));
        assert!(text.contains("degenerate"));
    }

    #[test]
    fn every_kind_is_recoverable() {
        let errors = [
            FusionError::InsufficientAnchors {
                available: 2,
                required: 3,
                anchor_ids: vec![],
            },
            FusionError::DegenerateGeometry {
                determinant: 1e-15,
                anchor_ids: vec![],
            },
            FusionError::invalid("sigma", 0.0),
        ];
        assert!(errors.iter().all(FusionError::is_recoverable));
    }
}
