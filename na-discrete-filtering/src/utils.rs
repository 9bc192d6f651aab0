use nd::{Array2, ArrayBase, ArrayView2, Axis, Data, Ix0, Ix1, Ix2};

use nla::Scalar;

/// Coercion into a matrix with at least two axes. Scalars become 1x1,
/// vectors become columns, matrices are copied as is.
pub trait AtLeast2d<E> {
  fn at_least_2d(&self) -> Array2<E>;
}

macro_rules! scalar_at_least_2d {
  ($($t:ty),*) => {$(
    impl AtLeast2d<$t> for $t {
      fn at_least_2d(&self) -> Array2<$t> {
        Array2::from_elem((1, 1), *self)
      }
    }
  )*}
}
scalar_at_least_2d!(f32, f64);

impl<S, E> AtLeast2d<E> for ArrayBase<S, Ix0>
  where S: Data<Elem = E>,
        E: Clone,
{
  fn at_least_2d(&self) -> Array2<E> {
    Array2::from_elem((1, 1), self[()].clone())
  }
}
impl<S, E> AtLeast2d<E> for ArrayBase<S, Ix1>
  where S: Data<Elem = E>,
        E: Clone,
{
  fn at_least_2d(&self) -> Array2<E> {
    extend_dim_ref(self, false).to_owned()
  }
}
impl<S, E> AtLeast2d<E> for ArrayBase<S, Ix2>
  where S: Data<Elem = E>,
        E: Clone,
{
  fn at_least_2d(&self) -> Array2<E> {
    self.to_owned()
  }
}
impl<E> AtLeast2d<E> for [E]
  where E: Clone,
{
  fn at_least_2d(&self) -> Array2<E> {
    Array2::from_shape_fn((self.len(), 1), |(i, _)| self[i].clone())
  }
}
impl<E> AtLeast2d<E> for Vec<E>
  where E: Clone,
{
  fn at_least_2d(&self) -> Array2<E> {
    self[..].at_least_2d()
  }
}
impl<'a, E, T> AtLeast2d<E> for &'a T
  where T: AtLeast2d<E> + ?Sized,
{
  fn at_least_2d(&self) -> Array2<E> {
    (**self).at_least_2d()
  }
}

/// View a vector as a column (`t == false`) or a row (`t == true`).
pub fn extend_dim_ref<S>(d: &ArrayBase<S, Ix1>, t: bool) -> ArrayView2<S::Elem>
  where S: Data,
{
  if !t {
    d.view().insert_axis(Axis(1))
  } else {
    d.view().insert_axis(Axis(0))
  }
}

/// Largest `|m_ij - m_ji|`. Zero for an exactly symmetric matrix.
pub fn max_asymmetry<S, E>(m: &ArrayBase<S, Ix2>) -> E
  where S: Data<Elem = E>,
        E: Scalar,
{
  m.indexed_iter()
    .fold(E::zero(), |acc, ((i, j), &v)| {
      acc.max((v - m[[j, i]]).abs())
    })
}

/// Replace `m` with `(m + mᵀ) / 2`.
pub fn symmetrize_mut<E>(m: &mut Array2<E>)
  where E: Scalar,
{
  debug_assert_eq!(m.nrows(), m.ncols());
  let half = (E::one() + E::one()).recip();
  let n = m.nrows();
  for i in 0..n {
    for j in i + 1..n {
      let v = (m[[i, j]] + m[[j, i]]) * half;
      m[[i, j]] = v;
      m[[j, i]] = v;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use nd::{arr0, arr1, arr2};

  #[test]
  fn scalars_become_1x1() {
    assert_eq!(4.0f64.at_least_2d(), arr2(&[[4.0]]));
    assert_eq!(arr0(2.5f32).at_least_2d(), arr2(&[[2.5f32]]));
  }

  #[test]
  fn vectors_become_columns() {
    let v = arr1(&[1.0, 2.0, 3.0]);
    assert_eq!(v.at_least_2d(), arr2(&[[1.0], [2.0], [3.0]]));
    assert_eq!(vec![1.0, 2.0].at_least_2d(), arr2(&[[1.0], [2.0]]));
    assert_eq!((&[5.0, 6.0][..]).at_least_2d(), arr2(&[[5.0], [6.0]]));
    assert_eq!(extend_dim_ref(&v, true), arr2(&[[1.0, 2.0, 3.0]]));
  }

  #[test]
  fn matrices_pass_through() {
    let m = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
    assert_eq!(m.view().at_least_2d(), m);
    assert_eq!((&m).at_least_2d(), m);
  }

  #[test]
  fn symmetrize() {
    let mut m = arr2(&[[1.0, 2.0], [4.0, 5.0]]);
    assert_eq!(max_asymmetry(&m), 2.0);
    symmetrize_mut(&mut m);
    assert_eq!(m, arr2(&[[1.0, 3.0], [3.0, 5.0]]));
    assert_eq!(max_asymmetry(&m), 0.0);
  }
}
