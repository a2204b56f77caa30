//! Indoor Position Fusion Engine
//!
//! Estimates a mobile device's planar position inside a building by fusing
//! two noisy, asynchronous sources: absolute range measurements to fixed
//! anchors (radio round-trip-time ranging, reduced to a fix by
//! multilateration) and relative displacement from pedestrian dead reckoning.
//! A constant-velocity Kalman filter makes the fused estimate smoother and
//! more available than either source alone and keeps it stable under
//! near-degenerate anchor geometry.
//!
//! The crate is a library: the host owns radios, sensors, scheduling, and
//! presentation, and feeds events into a [`FusionOrchestrator`].

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod validation;
pub mod fusion;

// Re-export commonly used types
pub use crate::core::{Anchor, AnchorRegistry, DisplacementEvent, PositionFix, RangeReading, RangedAnchor};
pub use crate::algorithms::multilateration::MultilaterationSolver;
pub use crate::processing::kalman::{ConstantVelocityFilter, FilterConfig};
pub use crate::validation::{FusionError, FusionResult, MeasurementValidator};
pub use crate::fusion::{
    CallbackHandle, CsvFormatter, FixCallback, FixFormatter, FusionConfig, FusionOrchestrator,
    FusionState, FusionUpdate, JsonFormatter, SnapshotRecord, TextFormatter,
};
