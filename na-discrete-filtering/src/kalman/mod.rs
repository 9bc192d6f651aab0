//! Kalman filters.

pub mod kf;

pub use self::kf::{Gaussian, Init, LinearStateEstimator, Posterior, SystemSpec};
