//! Small dense factorizations over `ndarray` matrices.

extern crate ndarray as nd;

use std::fmt::Debug;

use nd::{LinalgScalar, ScalarOperand};
use num_traits::Float;

pub use lu::*;

pub mod lu;

/// Element types the factorizations (and everything built on them) work over.
pub trait Scalar: Float + LinalgScalar + ScalarOperand + Debug + Send + Sync {}
impl<T> Scalar for T
  where T: Float + LinalgScalar + ScalarOperand + Debug + Send + Sync,
{ }

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  #[error("expected a square matrix, got {rows}x{cols}")]
  NotSquare { rows: usize, cols: usize },
  #[error("matrix is singular (no usable pivot in column {column})")]
  Singular { column: usize },
  #[error("right hand side has {found} rows, expected {expected}")]
  RhsRows { expected: usize, found: usize },
}
