use nd::{Array2, ArrayBase, Data, Ix2};
use num_traits::NumCast;

use crate::{Error, Result, Scalar};

/// `P A = L U`, with the unit lower factor and the upper factor packed
/// into one matrix.
#[derive(Debug, Clone)]
pub struct LuDecomposition<E> {
  lu: Array2<E>,
  /// Row `i` of `P A` is row `perm[i]` of `A`.
  perm: Vec<usize>,
  swaps: usize,
}

pub trait LU {
  type Elem;
  /// Gaussian elimination with partial pivoting. A pivot whose magnitude is
  /// at or below `n * eps * max|a_ij|` is treated as zero.
  fn lu_partial_pivot(&self) -> Result<LuDecomposition<Self::Elem>>;
}

pub trait Inverse {
  type Output;
  fn inv(&self) -> Result<Self::Output>;
}

impl<S, E> LU for ArrayBase<S, Ix2>
  where S: Data<Elem = E>,
        E: Scalar,
{
  type Elem = E;

  fn lu_partial_pivot(&self) -> Result<LuDecomposition<E>> {
    let (rows, cols) = self.dim();
    if rows != cols {
      return Err(Error::NotSquare { rows, cols });
    }
    let n = rows;

    let scale = self.iter()
      .fold(E::zero(), |acc, &v| acc.max(v.abs()));
    let n_e: E = NumCast::from(n.max(1)).unwrap_or_else(E::one);
    let tol = scale * n_e * E::epsilon();

    let mut lu = self.to_owned();
    let mut perm: Vec<usize> = (0..n).collect();
    let mut swaps = 0;

    for k in 0..n {
      let (p, pmax) = (k..n)
        .map(|i| (i, lu[[i, k]].abs()))
        .fold((k, E::zero()), |best, cur| {
          if cur.1 > best.1 { cur } else { best }
        });
      if !(pmax > tol) {
        return Err(Error::Singular { column: k });
      }

      if p != k {
        for j in 0..n {
          lu.swap([p, j], [k, j]);
        }
        perm.swap(p, k);
        swaps += 1;
      }

      let pivot = lu[[k, k]];
      for i in k + 1..n {
        let f = lu[[i, k]] / pivot;
        lu[[i, k]] = f;
        for j in k + 1..n {
          let v = lu[[i, j]] - f * lu[[k, j]];
          lu[[i, j]] = v;
        }
      }
    }

    Ok(LuDecomposition {
      lu: lu,
      perm: perm,
      swaps: swaps,
    })
  }
}

impl<E> LuDecomposition<E>
  where E: Scalar,
{
  pub fn dim(&self) -> usize { self.perm.len() }

  pub fn determinant(&self) -> E {
    let d = (0..self.dim())
      .fold(E::one(), |acc, i| acc * self.lu[[i, i]]);
    if self.swaps % 2 == 1 { -d } else { d }
  }

  /// Solves `A X = B` column by column.
  pub fn solve<S>(&self, b: &ArrayBase<S, Ix2>) -> Result<Array2<E>>
    where S: Data<Elem = E>,
  {
    let n = self.dim();
    if b.nrows() != n {
      return Err(Error::RhsRows { expected: n, found: b.nrows() });
    }

    let mut x = Array2::zeros(b.dim());
    for (col, mut out) in b.columns().into_iter().zip(x.columns_mut()) {
      // L y = P b
      for i in 0..n {
        let mut sum = col[self.perm[i]];
        for j in 0..i {
          sum = sum - self.lu[[i, j]] * out[j];
        }
        out[i] = sum;
      }
      // U x = y
      for i in (0..n).rev() {
        let mut sum = out[i];
        for j in i + 1..n {
          sum = sum - self.lu[[i, j]] * out[j];
        }
        out[i] = sum / self.lu[[i, i]];
      }
    }

    Ok(x)
  }
}

impl<S, E> Inverse for ArrayBase<S, Ix2>
  where S: Data<Elem = E>,
        E: Scalar,
{
  type Output = Array2<E>;
  fn inv(&self) -> Result<Array2<E>> {
    let lu = self.lu_partial_pivot()?;
    lu.solve(&Array2::eye(lu.dim()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;
  use nd::arr2;

  fn assert_matrix_eq(l: &Array2<f64>, r: &Array2<f64>, eps: f64) {
    assert_eq!(l.dim(), r.dim());
    for (a, b) in l.iter().zip(r.iter()) {
      assert_abs_diff_eq!(*a, *b, epsilon = eps);
    }
  }

  #[test]
  fn inverse_1x1() {
    let a = arr2(&[[12.0]]);
    let inv = a.inv().unwrap();
    assert_abs_diff_eq!(inv[[0, 0]], 1.0 / 12.0, epsilon = 1e-15);
  }

  #[test]
  fn inverse_needs_pivoting() {
    let a = arr2(&[
      [0.0, 2.0, 1.0],
      [1.0, 1.0, 0.0],
      [3.0, 0.0, 1.0],
    ]);
    let inv = a.inv().unwrap();
    assert_matrix_eq(&a.dot(&inv), &Array2::eye(3), 1e-12);
    assert_matrix_eq(&inv.dot(&a), &Array2::eye(3), 1e-12);
  }

  #[test]
  fn solve_known_3x3() {
    let a = arr2(&[
      [1.0, 2.0, 3.0],
      [4.0, 5.0, 6.0],
      [7.0, 8.0, 10.0],
    ]);
    let b = arr2(&[[1.0, 0.0], [2.0, 1.0], [3.0, 0.0]]);
    let x = a.lu_partial_pivot().unwrap().solve(&b).unwrap();
    assert_matrix_eq(&a.dot(&x), &b, 1e-10);
  }

  #[test]
  fn determinant_tracks_row_swaps() {
    let a = arr2(&[[0.0, 1.0], [1.0, 0.0]]);
    let lu = a.lu_partial_pivot().unwrap();
    assert_abs_diff_eq!(lu.determinant(), -1.0, epsilon = 1e-15);

    let b = arr2(&[[4.0, 12.0, -16.0], [12.0, 37.0, -43.0], [-16.0, -43.0, 98.0]]);
    assert_abs_diff_eq!(b.lu_partial_pivot().unwrap().determinant(), 36.0, epsilon = 1e-9);
  }

  #[test]
  fn singular_matrices_are_rejected() {
    let zero = Array2::<f64>::zeros((2, 2));
    assert_eq!(zero.inv().unwrap_err(), Error::Singular { column: 0 });

    let rank_one = arr2(&[[1.0, 2.0], [2.0, 4.0]]);
    assert_eq!(rank_one.inv().unwrap_err(), Error::Singular { column: 1 });
  }

  #[test]
  fn near_singular_is_rejected() {
    // 1 + 2e-16 rounds to 1 + eps: the last pivot is eps, tolerance 2 eps.
    let a = arr2(&[[1.0, 1.0], [1.0, 1.0 + 2e-16]]);
    assert!(a[[1, 1]] > 1.0);
    assert_eq!(a.inv().unwrap_err(), Error::Singular { column: 1 });

    let b = arr2(&[[1.0, 1.0], [1.0, 1.0 + 1e-14]]);
    assert!(b.inv().is_ok());
  }

  #[test]
  fn not_square() {
    let a = Array2::<f64>::zeros((2, 3));
    assert_eq!(a.inv().unwrap_err(), Error::NotSquare { rows: 2, cols: 3 });
  }

  #[test]
  fn rhs_rows_checked() {
    let a = arr2(&[[2.0, 0.0], [0.0, 2.0]]);
    let b = Array2::<f64>::zeros((3, 1));
    assert_eq!(a.lu_partial_pivot().unwrap().solve(&b).unwrap_err(),
               Error::RhsRows { expected: 2, found: 3 });
  }
}
