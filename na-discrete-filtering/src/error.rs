
pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
  /// A matrix or observation whose shape does not agree with the system.
  #[error("{what} has shape {found:?}, expected {expected:?}")]
  Dimension {
    what: &'static str,
    expected: (usize, usize),
    found: (usize, usize),
  },
  /// `G Σ Gᵀ + R` could not be inverted while filtering step `step`.
  #[error("innovation covariance is singular at step {step}")]
  SingularInnovationCovariance { step: u64 },
  #[error(transparent)]
  Factorize(#[from] nla::Error),
}
