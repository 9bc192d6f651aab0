//! Discrete-time filtering for state-space models.
//!
//! Right now this is the linear-Gaussian Kalman filter in [`kalman::kf`]:
//!
//! ```text
//! x_{t+1} = A x_t + C w_{t+1}      w ~ N(0, I_p)
//! y_t     = G x_t + v_t            v ~ N(0, R)
//! ```

extern crate ndarray as nd;
extern crate nla_factorize as nla;

pub use error::{Error, Result};
pub use kalman::kf::{Gaussian, Init, LinearStateEstimator, Posterior, SystemSpec};
pub use nla::Scalar;

pub mod error;
pub mod kalman;
pub mod utils;
