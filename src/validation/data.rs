//! Pre-flight sanity checks for measurement inputs
//!
//! Rejecting bad input before any state mutation is what guarantees a single
//! corrupt batch can never poison the filter.

use crate::core::types::{PositionFix, RangedAnchor};
use crate::validation::error::{FusionError, FusionResult};

/// Stateless gate in front of the solve and correct paths
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementValidator;

impl MeasurementValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check one resolved anchor/range pair: finite coordinates, a finite
    /// non-negative distance, and a strictly positive finite stddev.
    pub fn check_ranged_anchor(&self, ranged: &RangedAnchor) -> FusionResult<()> {
        if !ranged.x.is_finite() {
            return Err(FusionError::invalid(
                format!("anchor {} x", ranged.id),
                ranged.x,
            ));
        }
        if !ranged.y.is_finite() {
            return Err(FusionError::invalid(
                format!("anchor {} y", ranged.id),
                ranged.y,
            ));
        }
        if !ranged.distance_m.is_finite() || ranged.distance_m < 0.0 {
            return Err(FusionError::invalid(
                format!("anchor {} distance_m", ranged.id),
                ranged.distance_m,
            ));
        }
        if !ranged.stddev_m.is_finite() || ranged.stddev_m <= 0.0 {
            return Err(FusionError::invalid(
                format!("anchor {} stddev_m", ranged.id),
                ranged.stddev_m,
            ));
        }
        Ok(())
    }

    /// Check an entire resolved batch, failing on the first bad pair.
    pub fn check_batch(&self, batch: &[RangedAnchor]) -> FusionResult<()> {
        batch.iter().try_for_each(|r| self.check_ranged_anchor(r))
    }

    /// Check a position fix before it reaches the filter.
    pub fn check_fix(&self, fix: &PositionFix) -> FusionResult<()> {
        if !fix.x.is_finite() {
            return Err(FusionError::invalid("fix x", fix.x));
        }
        if !fix.y.is_finite() {
            return Err(FusionError::invalid("fix y", fix.y));
        }
        if !fix.sigma.is_finite() || fix.sigma <= 0.0 {
            return Err(FusionError::invalid("fix sigma", fix.sigma));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_pair() -> RangedAnchor {
        RangedAnchor {
            id: "a1".into(),
            x: 1.0,
            y: 2.0,
            distance_m: 3.0,
            stddev_m: 0.25,
        }
    }

    #[test]
    fn accepts_sane_input() {
        let validator = MeasurementValidator::new();
        assert!(validator.check_ranged_anchor(&good_pair()).is_ok());
        assert!(validator.check_fix(&PositionFix::new(1.0, 2.0, 0.5)).is_ok());
    }

    #[test]
    fn rejects_zero_stddev() {
        let validator = MeasurementValidator::new();
        let mut pair = good_pair();
        pair.stddev_m = 0.0;
        let err = validator.check_ranged_anchor(&pair).unwrap_err();
        assert!(matches!(err, FusionError::InvalidMeasurement { .. }));
    }

    #[test]
    fn rejects_negative_distance_and_nan_coordinate() {
        let validator = MeasurementValidator::new();

        let mut pair = good_pair();
        pair.distance_m = -0.1;
        assert!(validator.check_ranged_anchor(&pair).is_err());

        let mut pair = good_pair();
        pair.x = f64::NAN;
        assert!(validator.check_ranged_anchor(&pair).is_err());
    }

    #[test]
    fn rejects_non_positive_fix_sigma() {
        let validator = MeasurementValidator::new();
        assert!(validator.check_fix(&PositionFix::new(0.0, 0.0, 0.0)).is_err());
        assert!(validator.check_fix(&PositionFix::new(0.0, 0.0, -1.0)).is_err());
        assert!(validator
            .check_fix(&PositionFix::new(0.0, 0.0, f64::INFINITY))
            .is_err());
    }
}
