//! Position estimation algorithms

pub mod multilateration;

pub use multilateration::MultilaterationSolver;
