extern crate ndarray as nd;
extern crate na_discrete_filtering as na_df;

use nd::{Array, Axis, Ix2, Ix3};

use na_df::LinearStateEstimator;

pub use bands::{normal_band, BandError, P_90, Z_90};

pub mod bands;

/// A filter run stacked into dense arrays, one leading index per step.
#[derive(Clone, Debug, PartialEq)]
pub struct StateSteps {
  /// steps × n, starting with the prior.
  pub means: Array<f64, Ix2>,
  /// steps × n × n
  pub covariances: Array<f64, Ix3>,
  /// updates × n × m
  pub gains: Array<f64, Ix3>,
  /// updates × m
  pub residuals: Array<f64, Ix2>,
  /// updates × m
  pub observations: Array<f64, Ix2>,
}
impl StateSteps {
  pub fn new(steps: usize, n: usize, m: usize) -> StateSteps {
    let updates = steps.saturating_sub(1);
    StateSteps {
      means: Array::zeros((steps, n)),
      covariances: Array::zeros((steps, n, n)),
      gains: Array::zeros((updates, n, m)),
      residuals: Array::zeros((updates, m)),
      observations: Array::zeros((updates, m)),
    }
  }

  /// Copies the recorded history out of `kf`.
  pub fn from_estimator(kf: &LinearStateEstimator<f64>) -> StateSteps {
    let n = kf.state_dim();
    let m = kf.observation_dim();
    let mut states = StateSteps::new(kf.means().len(), n, m);

    for (step, (mean, cov)) in kf.means().iter()
      .zip(kf.covariances().iter())
      .enumerate()
    {
      states.means
        .index_axis_mut(Axis(0), step)
        .assign(&mean.column(0));
      states.covariances
        .index_axis_mut(Axis(0), step)
        .assign(cov);
    }

    for (step, ((k, a), y)) in kf.gains().iter()
      .zip(kf.residuals().iter())
      .zip(kf.observations().iter())
      .enumerate()
    {
      states.gains
        .index_axis_mut(Axis(0), step)
        .assign(k);
      states.residuals
        .index_axis_mut(Axis(0), step)
        .assign(&a.column(0));
      states.observations
        .index_axis_mut(Axis(0), step)
        .assign(&y.column(0));
    }

    states
  }

  pub fn steps(&self) -> usize { self.means.dim().0 }

  /// `percentiles` band of state `component` at every step.
  pub fn band(&self, component: usize,
              percentiles: (f64, f64)) -> Result<Vec<(f64, f64)>, BandError> {
    self.means
      .column(component)
      .iter()
      .zip(self.covariances.axis_iter(Axis(0)))
      .map(|(&mean, cov)| normal_band(mean, cov[[component, component]], percentiles))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use approx::assert_abs_diff_eq;
  use nd::{arr1, arr2};

  #[test]
  fn stacks_scalar_history() {
    let mut kf = LinearStateEstimator::<f64>::new(1.0, 0.0, 1.0, 4.0, 8.0, 8.0).unwrap();
    kf.update(12.520413).unwrap();
    kf.update(9.0).unwrap();

    let states = StateSteps::from_estimator(&kf);
    assert_eq!(states.steps(), 3);
    assert_eq!(states.means.dim(), (3, 1));
    assert_eq!(states.covariances.dim(), (3, 1, 1));
    assert_eq!(states.gains.dim(), (2, 1, 1));
    assert_eq!(states.observations, arr2(&[[12.520413], [9.0]]));
    assert_eq!(states.means[[0, 0]], 8.0);
    assert_abs_diff_eq!(states.gains[[0, 0, 0]], 8.0 / 12.0, epsilon = 1e-12);
    assert_abs_diff_eq!(states.covariances[[1, 0, 0]], 8.0 / 3.0, epsilon = 1e-12);
  }

  #[test]
  fn stacks_vector_history() {
    let a = arr2(&[[1.0, 1.0], [0.0, 1.0]]);
    let g = arr2(&[[1.0, 0.0]]);
    let mut kf = LinearStateEstimator::new(a, arr2(&[[0.0], [0.1]]), g, 1.0,
                                           arr1(&[0.0, 1.0]),
                                           arr2(&[[1.0, 0.0], [0.0, 1.0]]))
      .unwrap();
    kf.update(1.2).unwrap();

    let states = StateSteps::from_estimator(&kf);
    assert_eq!(states.means.row(0), arr1(&[0.0, 1.0]));
    assert_eq!(states.means.row(1), kf.mean().column(0));
    assert_eq!(states.covariances.index_axis(Axis(0), 1), kf.covariance());
    assert_eq!(states.gains.index_axis(Axis(0), 0), kf.gain());
    assert_eq!(states.residuals[[0, 0]], 1.2);
  }

  #[test]
  fn band_widths_shrink() {
    let mut kf = LinearStateEstimator::<f64>::new(1.0, 0.0, 1.0, 4.0, 8.0, 8.0).unwrap();
    for &y in [10.0, 11.0, 9.5, 10.2].iter() {
      kf.update(y).unwrap();
    }
    let band = StateSteps::from_estimator(&kf).band(0, P_90).unwrap();
    assert_eq!(band.len(), 5);
    assert_abs_diff_eq!(band[0].0, 8.0 - Z_90 * 8.0f64.sqrt(), epsilon = 1e-9);
    assert!(band.windows(2).all(|w| (w[1].1 - w[1].0) < (w[0].1 - w[0].0)));
  }
}
