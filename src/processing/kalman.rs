//! Constant-velocity Kalman filter over the planar state [x, y, vx, vy]
//!
//! Displacement events enter the position sub-state directly (dead reckoning
//! yields displacement, not acceleration); absolute fixes correct the position
//! sub-state through the standard linear update. Covariance propagation uses a
//! fixed nominal time step regardless of the wall-clock gap between events.
//!
//! All matrices are fixed-size and stack-allocated; the hot path performs no
//! allocation. The 2x2 innovation-covariance inverse is written out in closed
//! form so a singular system fails with a typed error instead of NaN.

use nalgebra::{Matrix2, Matrix2x4, Matrix4, Vector2, Vector4};

use crate::core::constants::{
    DEFAULT_POSITION_PROCESS_NOISE, DEFAULT_STEP_DT_S, DEFAULT_VELOCITY_PROCESS_NOISE,
    INITIAL_POSITION_VARIANCE, INITIAL_VELOCITY_VARIANCE, SINGULARITY_EPSILON,
};
use crate::core::types::PositionFix;
use crate::validation::error::{FusionError, FusionResult};

/// Filter tuning parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Nominal prediction time step (seconds); the propagation matrix is
    /// built once from this constant
    pub step_dt_s: f64,
    /// Position process noise added per predict (m^2)
    pub position_process_noise: f64,
    /// Velocity process noise added per predict ((m/s)^2)
    pub velocity_process_noise: f64,
    /// Position variance of the default prior (m^2)
    pub initial_position_variance: f64,
    /// Velocity variance of the default prior ((m/s)^2)
    pub initial_velocity_variance: f64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            step_dt_s: DEFAULT_STEP_DT_S,
            position_process_noise: DEFAULT_POSITION_PROCESS_NOISE,
            velocity_process_noise: DEFAULT_VELOCITY_PROCESS_NOISE,
            initial_position_variance: INITIAL_POSITION_VARIANCE,
            initial_velocity_variance: INITIAL_VELOCITY_VARIANCE,
        }
    }
}

/// Closed-form inverse of a 2x2 matrix.
///
/// Fails when the determinant magnitude is at or below the singularity
/// threshold; never produces NaN or Inf from a near-singular input.
pub(crate) fn invert_2x2(m: &Matrix2<f64>) -> Option<Matrix2<f64>> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    if det.abs() <= SINGULARITY_EPSILON {
        return None;
    }
    Some(Matrix2::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)]) / det)
}

/// Planar constant-velocity filter
///
/// Owns its state vector and covariance exclusively; callers observe through
/// the read-only accessors and mutate only via `predict`/`correct`/`reset`.
/// Operations are not individually thread-safe: the `&mut self` receivers
/// leave serialization to the single owner.
#[derive(Debug, Clone)]
pub struct ConstantVelocityFilter {
    /// State estimate [x, y, vx, vy]
    state: Vector4<f64>,
    /// State covariance, symmetric positive semi-definite by construction
    covariance: Matrix4<f64>,
    /// Constant-velocity transition matrix for the fixed nominal step
    transition: Matrix4<f64>,
    /// Diagonal process noise
    process_noise: Matrix4<f64>,
    config: FilterConfig,
    initialized: bool,
}

impl Default for ConstantVelocityFilter {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

impl ConstantVelocityFilter {
    pub fn new(config: FilterConfig) -> Self {
        let dt = config.step_dt_s;
        #[rustfmt::skip]
        let transition = Matrix4::new(
            1.0, 0.0, dt,  0.0,
            0.0, 1.0, 0.0, dt,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        let process_noise = Matrix4::from_diagonal(&Vector4::new(
            config.position_process_noise,
            config.position_process_noise,
            config.velocity_process_noise,
            config.velocity_process_noise,
        ));

        Self {
            state: Vector4::zeros(),
            covariance: Self::prior_covariance(&config),
            transition,
            process_noise,
            config,
            initialized: false,
        }
    }

    fn prior_covariance(config: &FilterConfig) -> Matrix4<f64> {
        Matrix4::from_diagonal(&Vector4::new(
            config.initial_position_variance,
            config.initial_position_variance,
            config.initial_velocity_variance,
            config.initial_velocity_variance,
        ))
    }

    /// Seed the filter at a fix location with zero velocity and the default
    /// high-uncertainty prior.
    pub fn initialize(&mut self, x: f64, y: f64) {
        self.state = Vector4::new(x, y, 0.0, 0.0);
        self.covariance = Self::prior_covariance(&self.config);
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Integrate a displacement into the position sub-state and propagate the
    /// covariance one nominal step: P <- F·P·Fᵀ + Q.
    pub fn predict(&mut self, dx_m: f64, dy_m: f64) -> FusionResult<()> {
        if !dx_m.is_finite() {
            return Err(FusionError::invalid("displacement dx_m", dx_m));
        }
        if !dy_m.is_finite() {
            return Err(FusionError::invalid("displacement dy_m", dy_m));
        }

        self.state[0] += dx_m;
        self.state[1] += dy_m;
        self.covariance =
            self.transition * self.covariance * self.transition.transpose() + self.process_noise;
        self.symmetrize();
        Ok(())
    }

    /// Standard linear Kalman update against an absolute position fix.
    ///
    /// A fix with non-positive sigma or non-finite components is rejected
    /// before the measurement covariance is built, leaving state and
    /// covariance untouched.
    pub fn correct(&mut self, fix: &PositionFix) -> FusionResult<()> {
        if !fix.x.is_finite() {
            return Err(FusionError::invalid("fix x", fix.x));
        }
        if !fix.y.is_finite() {
            return Err(FusionError::invalid("fix y", fix.y));
        }
        if !fix.sigma.is_finite() || fix.sigma <= 0.0 {
            return Err(FusionError::invalid("fix sigma", fix.sigma));
        }

        #[rustfmt::skip]
        let h = Matrix2x4::new(
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
        );
        let variance = fix.sigma * fix.sigma;
        let r = Matrix2::from_diagonal(&Vector2::new(variance, variance));

        let z = Vector2::new(fix.x, fix.y);
        let innovation = z - h * self.state;
        let s = h * self.covariance * h.transpose() + r;
        let s_inv = match invert_2x2(&s) {
            Some(inv) => inv,
            None => {
                let det = s[(0, 0)] * s[(1, 1)] - s[(0, 1)] * s[(1, 0)];
                return Err(FusionError::invalid("innovation covariance determinant", det));
            }
        };

        let gain = self.covariance * h.transpose() * s_inv;
        self.state += gain * innovation;
        self.covariance = (Matrix4::identity() - gain * h) * self.covariance;
        self.symmetrize();
        Ok(())
    }

    /// Return to the default uninitialized prior.
    pub fn reset(&mut self) {
        self.state = Vector4::zeros();
        self.covariance = Self::prior_covariance(&self.config);
        self.initialized = false;
    }

    pub fn position(&self) -> (f64, f64) {
        (self.state[0], self.state[1])
    }

    pub fn velocity(&self) -> (f64, f64) {
        (self.state[2], self.state[3])
    }

    pub fn covariance(&self) -> &Matrix4<f64> {
        &self.covariance
    }

    /// Conservative scalar uncertainty: sqrt of the larger position variance.
    ///
    /// This discards the off-diagonal correlation and the smaller axis on
    /// purpose; consumers depend on the conservative bias.
    pub fn horizontal_sigma(&self) -> f64 {
        self.covariance[(0, 0)].max(self.covariance[(1, 1)]).sqrt()
    }

    /// Snapshot of the current estimate.
    pub fn fix(&self) -> PositionFix {
        PositionFix::new(self.state[0], self.state[1], self.horizontal_sigma())
    }

    /// Float rounding in F·P·Fᵀ and (I-KH)·P leaves a sub-ulp asymmetry;
    /// averaging with the transpose keeps the symmetry invariant exact.
    fn symmetrize(&mut self) {
        self.covariance = (self.covariance + self.covariance.transpose()) * 0.5;
    }
}
