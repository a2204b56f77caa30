//! Numeric defaults and system parameters

/// Minimum number of resolvable anchor/range pairs for a multilateration solve
pub const MIN_RANGING_ANCHORS: usize = 3;

/// Determinant magnitude at or below which a 2x2 system is treated as singular
pub const SINGULARITY_EPSILON: f64 = 1e-12;

/// Nominal time step between displacement events (seconds); covariance
/// propagation always uses this constant, never the wall-clock gap
pub const DEFAULT_STEP_DT_S: f64 = 0.5;

/// Default per-predict position process noise (m^2)
pub const DEFAULT_POSITION_PROCESS_NOISE: f64 = 0.1;

/// Default per-predict velocity process noise ((m/s)^2)
pub const DEFAULT_VELOCITY_PROCESS_NOISE: f64 = 0.01;

/// Position variance of the uninitialized prior (m^2)
pub const INITIAL_POSITION_VARIANCE: f64 = 100.0;

/// Velocity variance of the uninitialized prior ((m/s)^2)
pub const INITIAL_VELOCITY_VARIANCE: f64 = 1.0;
