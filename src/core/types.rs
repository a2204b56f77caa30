//! Core data types at the fusion-engine boundary

use serde::{Deserialize, Serialize};

/// Fixed ranging anchor with known planar coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Opaque identifier, e.g. the responder's MAC address
    pub id: String,
    /// East coordinate in the local planar frame (meters)
    pub x: f64,
    /// North coordinate in the local planar frame (meters)
    pub y: f64,
}

impl Anchor {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self { id: id.into(), x, y }
    }
}

/// One range measurement from a single ranging cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeReading {
    /// Identifier of the anchor that responded
    pub anchor_id: String,
    /// Measured distance to the anchor (meters, >= 0)
    pub distance_m: f64,
    /// Measurement standard deviation (meters, > 0)
    pub stddev_m: f64,
    /// Received signal strength, if the radio reports it
    pub rssi_dbm: Option<i32>,
}

impl RangeReading {
    pub fn new(anchor_id: impl Into<String>, distance_m: f64, stddev_m: f64) -> Self {
        Self {
            anchor_id: anchor_id.into(),
            distance_m,
            stddev_m,
            rssi_dbm: None,
        }
    }
}

/// A range reading joined with its anchor's coordinates, ready for the solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangedAnchor {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub distance_m: f64,
    pub stddev_m: f64,
}

/// Planar point estimate with a single scalar uncertainty radius
///
/// Produced raw by the multilateration solver and fused by the filter. The
/// sigma is a conservative scalar, not an error ellipse; consumers depend on
/// that convention.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionFix {
    pub x: f64,
    pub y: f64,
    /// Uncertainty radius (meters, > 0)
    pub sigma: f64,
}

impl PositionFix {
    pub fn new(x: f64, y: f64, sigma: f64) -> Self {
        Self { x, y, sigma }
    }
}

/// Relative displacement from one detected step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplacementEvent {
    /// Displacement east (meters)
    pub dx_m: f64,
    /// Displacement north (meters)
    pub dy_m: f64,
    /// Event timestamp (milliseconds since epoch), bookkeeping only
    pub timestamp_ms: u64,
}

impl DisplacementEvent {
    pub fn new(dx_m: f64, dy_m: f64, timestamp_ms: u64) -> Self {
        Self { dx_m, dy_m, timestamp_ms }
    }

    /// Project a detected step onto the plane from its heading and length.
    ///
    /// Heading is radians counterclockwise from the +x axis of the anchor
    /// frame; the host's dead-reckoning pipeline owns step detection and
    /// heading derivation.
    pub fn from_step(heading_rad: f64, step_length_m: f64, timestamp_ms: u64) -> Self {
        Self {
            dx_m: step_length_m * heading_rad.cos(),
            dy_m: step_length_m * heading_rad.sin(),
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_projection_follows_heading() {
        let east = DisplacementEvent::from_step(0.0, 0.7, 0);
        assert!((east.dx_m - 0.7).abs() < 1e-12);
        assert!(east.dy_m.abs() < 1e-12);

        let north = DisplacementEvent::from_step(std::f64::consts::FRAC_PI_2, 0.7, 0);
        assert!(north.dx_m.abs() < 1e-12);
        assert!((north.dy_m - 0.7).abs() < 1e-12);
    }

    #[test]
    fn range_reading_defaults_to_no_rssi() {
        let reading = RangeReading::new("aa:bb:cc:dd:ee:ff", 4.2, 0.3);
        assert_eq!(reading.rssi_dbm, None);
        assert_eq!(reading.anchor_id, "aa:bb:cc:dd:ee:ff");
    }
}
