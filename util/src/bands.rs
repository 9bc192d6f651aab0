//! Percentile intervals around filtered or forecast means.

use statrs::distribution::{ContinuousCDF, Normal};
use statrs::StatsError;

/// Upper 5% point of the standard normal.
pub const Z_90: f64 = 1.6448536269514722;

/// 5th and 95th percentiles.
pub const P_90: (f64, f64) = (0.05, 0.95);

#[derive(Debug, thiserror::Error)]
pub enum BandError {
  #[error("percentile {0} is outside [0, 1]")]
  Probability(f64),
  #[error("lower percentile {lower} is above upper percentile {upper}")]
  Order { lower: f64, upper: f64 },
  #[error(transparent)]
  Normal(#[from] StatsError),
}

/// The `lower` and `upper` quantiles of `N(mean, variance)`. A variance at
/// or below zero (round-off included) collapses the band to `mean`.
pub fn normal_band(mean: f64, variance: f64,
                   (lower, upper): (f64, f64)) -> Result<(f64, f64), BandError> {
  for &p in [lower, upper].iter() {
    if !(0.0..=1.0).contains(&p) {
      return Err(BandError::Probability(p));
    }
  }
  if lower > upper {
    return Err(BandError::Order { lower, upper });
  }

  if !(variance > 0.0) {
    return Ok((mean, mean));
  }
  let normal = Normal::new(mean, variance.sqrt())?;
  Ok((normal.inverse_cdf(lower), normal.inverse_cdf(upper)))
}
