//! Jovanovic's job-matching problem: a firm learns a worker's fixed quality
//! θ from output `y_t = θ + ν_t`, `ν_t ~ N(0, R)`. As a state-space model
//! this is `A = 1, C = 0, G = 1`.

extern crate rand;
extern crate rand_distr;
extern crate rand_isaac;
extern crate ndarray as nd;
extern crate na_discrete_filtering as na_df;
extern crate util;

use nd::{Array, Ix1};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use rand_isaac::Isaac64Rng;

use na_df::{LinearStateEstimator, Result};

pub use util::{StateSteps, normal_band, BandError, P_90};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JovanovicSetup {
  /// True worker quality.
  pub theta: f64,
  /// R
  pub observation_variance: f64,
  pub prior_mean: f64,
  pub prior_variance: f64,
  pub steps: usize,
  pub rand_seed: u64,
}
impl Default for JovanovicSetup {
  fn default() -> Self {
    JovanovicSetup {
      theta: 10.0,
      observation_variance: 4.0,
      prior_mean: 8.0,
      prior_variance: 8.0,
      steps: 100,
      rand_seed: 2020,
    }
  }
}

impl From<JovanovicSetup> for JovanovicData {
  fn from(params: JovanovicSetup) -> JovanovicData {
    let mut rand = Isaac64Rng::seed_from_u64(params.rand_seed);
    let sd = params.observation_variance.sqrt();

    let observations: Array<f64, Ix1> = (0..params.steps)
      .map(|_| {
        let z: f64 = rand.sample(StandardNormal);
        params.theta + sd * z
      })
      .collect();

    JovanovicData {
      params: params,
      observations: observations,
    }
  }
}

#[derive(Clone, Debug)]
pub struct JovanovicData {
  pub params: JovanovicSetup,
  pub observations: Array<f64, Ix1>,
}
impl JovanovicData {
  pub fn estimator(&self) -> Result<LinearStateEstimator<f64>> {
    let p = &self.params;
    LinearStateEstimator::new(1.0, 0.0, 1.0,
                              p.observation_variance,
                              p.prior_mean, p.prior_variance)
  }

  /// Filters every observation in order.
  pub fn run(&self) -> Result<LinearStateEstimator<f64>> {
    let mut kf = self.estimator()?;
    for &y in self.observations.iter() {
      kf.update(y)?;
    }
    Ok(kf)
  }

  /// Posterior variance after `t` updates from the closed form
  /// `1/Σ_t = 1/Σ_0 + t/R`.
  pub fn closed_form_variance(&self, t: usize) -> f64 {
    let p = &self.params;
    1.0 / (1.0 / p.prior_variance + t as f64 / p.observation_variance)
  }
}
