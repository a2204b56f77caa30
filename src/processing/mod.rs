//! State estimation

pub mod kalman;

pub use kalman::{ConstantVelocityFilter, FilterConfig};
