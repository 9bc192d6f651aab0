//! The plain (linear-Gaussian) Kalman filter.
//!
//! Each observed period runs three phases: filter (innovation and gain
//! from the pre-update posterior), predict (Joseph-form propagation of
//! the mean and covariance one step ahead) and record (append the new pair
//! to the trajectory). `forecast` reruns predict alone.

use nd::{Array2, ArrayView2};
use tracing::{debug, trace, warn};

use nla::{self, Inverse, Scalar};

use crate::error::{Error, Result};
use crate::utils::{symmetrize_mut, AtLeast2d};

fn check_dim<E>(what: &'static str, m: &Array2<E>,
                expected: (usize, usize)) -> Result<()> {
  if m.dim() != expected {
    Err(Error::Dimension {
      what: what,
      expected: expected,
      found: m.dim(),
    })
  } else {
    Ok(())
  }
}

/// The model matrices. Fixed for the lifetime of an estimator.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemSpec<E> {
  transition: Array2<E>,
  state_noise: Array2<E>,
  observation_operator: Array2<E>,
  observation_covariance: Array2<E>,

  /// C Cᵀ
  state_noise_covariance: Array2<E>,
}

impl<E> SystemSpec<E>
  where E: Scalar,
{
  /// `a` is A (n×n), `c` is C (n×p), `g` is G (m×n) and `r` is R (m×m).
  pub fn new<A, C, G, R>(a: A, c: C, g: G, r: R) -> Result<SystemSpec<E>>
    where A: AtLeast2d<E>,
          C: AtLeast2d<E>,
          G: AtLeast2d<E>,
          R: AtLeast2d<E>,
  {
    let a = a.at_least_2d();
    let c = c.at_least_2d();
    let g = g.at_least_2d();
    let r = r.at_least_2d();

    let n = a.nrows();
    check_dim("transition A", &a, (n, n))?;
    check_dim("state noise C", &c, (n, c.ncols()))?;
    check_dim("observation operator G", &g, (g.nrows(), n))?;
    let m = g.nrows();
    check_dim("observation covariance R", &r, (m, m))?;

    let cct = c.dot(&c.t());
    Ok(SystemSpec {
      transition: a,
      state_noise: c,
      observation_operator: g,
      observation_covariance: r,
      state_noise_covariance: cct,
    })
  }

  /// n
  pub fn state_dim(&self) -> usize { self.transition.nrows() }
  /// m
  pub fn observation_dim(&self) -> usize { self.observation_operator.nrows() }
  /// p
  pub fn noise_dim(&self) -> usize { self.state_noise.ncols() }

  pub fn transition(&self) -> ArrayView2<E> { self.transition.view() }
  pub fn state_noise(&self) -> ArrayView2<E> { self.state_noise.view() }
  pub fn observation_operator(&self) -> ArrayView2<E> { self.observation_operator.view() }
  pub fn observation_covariance(&self) -> ArrayView2<E> { self.observation_covariance.view() }
  pub fn state_noise_covariance(&self) -> ArrayView2<E> { self.state_noise_covariance.view() }
}

/// A normal distribution: mean (k×1) and covariance (k×k).
#[derive(Debug, Clone, PartialEq)]
pub struct Gaussian<E> {
  pub mean: Array2<E>,
  pub covariance: Array2<E>,
}

/// A belief over the state, k = n.
pub type Posterior<E> = Gaussian<E>;

/// Borrowed construction arguments.
#[derive(Debug, Clone)]
pub struct Init<'a, E>
  where E: 'a,
{
  pub transition: ArrayView2<'a, E>,
  pub state_noise: ArrayView2<'a, E>,
  pub observation_operator: ArrayView2<'a, E>,
  pub observation_covariance: ArrayView2<'a, E>,
  pub initial_mean: ArrayView2<'a, E>,
  pub initial_covariance: ArrayView2<'a, E>,
}

/// Most recent filter outputs. Kept apart from the history because
/// forecasting keeps reusing them.
#[derive(Debug, Clone, PartialEq)]
struct Latest<E> {
  observation: Option<Array2<E>>,
  /// a
  innovation: Array2<E>,
  /// K
  gain: Array2<E>,
  /// F = A - K G
  error_transition: Array2<E>,
}
impl<E> Latest<E>
  where E: Scalar,
{
  fn placeholder(system: &SystemSpec<E>) -> Latest<E> {
    let n = system.state_dim();
    let m = system.observation_dim();
    let gain = Array2::from_elem((n, m), E::one());
    let f = &system.transition - &gain.dot(&system.observation_operator);
    Latest {
      observation: None,
      innovation: Array2::zeros((m, 1)),
      gain: gain,
      error_transition: f,
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
struct History<E> {
  means: Vec<Array2<E>>,
  covariances: Vec<Array2<E>>,
  gains: Vec<Array2<E>>,
  residuals: Vec<Array2<E>>,
  observations: Vec<Array2<E>>,
}
impl<E> History<E>
  where E: Scalar,
{
  fn seeded(prior: &Posterior<E>) -> History<E> {
    History {
      means: vec![prior.mean.clone()],
      covariances: vec![prior.covariance.clone()],
      gains: Vec::new(),
      residuals: Vec::new(),
      observations: Vec::new(),
    }
  }
}

/// Output of the filter phase, not yet committed.
struct Innovation<E> {
  observation: Array2<E>,
  innovation: Array2<E>,
  gain: Array2<E>,
}

/// Recursive Kalman filter for a fixed linear-Gaussian system.
///
/// Not internally synchronized; `update`, `forecast` and `reset` take
/// `&mut self`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearStateEstimator<E>
  where E: Scalar,
{
  system: SystemSpec<E>,
  prior: Posterior<E>,
  posterior: Posterior<E>,
  latest: Latest<E>,
  history: History<E>,
  t: u64,
}

impl<E> LinearStateEstimator<E>
  where E: Scalar,
{
  /// `x` and `sigma` are the prior mean and covariance. Every argument
  /// may be a scalar, a vector (taken as a column) or a matrix.
  pub fn new<A, C, G, R, X, S>(a: A, c: C, g: G, r: R,
                               x: X, sigma: S) -> Result<LinearStateEstimator<E>>
    where A: AtLeast2d<E>,
          C: AtLeast2d<E>,
          G: AtLeast2d<E>,
          R: AtLeast2d<E>,
          X: AtLeast2d<E>,
          S: AtLeast2d<E>,
  {
    let system = SystemSpec::new(a, c, g, r)?;
    let prior = Posterior {
      mean: x.at_least_2d(),
      covariance: sigma.at_least_2d(),
    };
    Self::with_system(system, prior)
  }

  pub fn from_init(i: Init<E>) -> Result<LinearStateEstimator<E>> {
    let Init {
      transition,
      state_noise,
      observation_operator,
      observation_covariance,
      initial_mean,
      initial_covariance,
    } = i;

    Self::new(transition, state_noise,
              observation_operator, observation_covariance,
              initial_mean, initial_covariance)
  }

  pub fn with_system(system: SystemSpec<E>,
                     prior: Posterior<E>) -> Result<LinearStateEstimator<E>> {
    let n = system.state_dim();
    check_dim("initial mean X", &prior.mean, (n, 1))?;
    check_dim("initial covariance Σ", &prior.covariance, (n, n))?;

    debug!(n = n, m = system.observation_dim(), p = system.noise_dim(),
           "new linear state estimator");

    Ok(LinearStateEstimator {
      latest: Latest::placeholder(&system),
      history: History::seeded(&prior),
      posterior: prior.clone(),
      prior: prior,
      system: system,
      t: 0,
    })
  }

  /// Advance one observed period: filter, predict, record. On error the
  /// estimator is left exactly as it was.
  pub fn update<Y>(&mut self, y: Y) -> Result<()>
    where Y: AtLeast2d<E>,
  {
    let step = self.innovation(y.at_least_2d())
      .map_err(|e| {
        if let Error::SingularInnovationCovariance { step } = e {
          warn!(step, "rejected observation: singular innovation covariance");
        }
        e
      })?;

    self.filter(step);
    self.predict();
    self.record();
    Ok(())
  }

  /// Propagate `h` steps with no new observations, holding the last gain
  /// and innovation fixed. Nothing is recorded, but the live posterior and
  /// `t` move forward.
  pub fn forecast(&mut self, h: usize) -> Vec<Gaussian<E>> {
    debug!(h, t = self.t, "forecast");
    (0..h)
      .map(|_| {
        self.predict();
        self.posterior.clone()
      })
      .collect()
  }

  /// `forecast` on a copy; `self` is untouched.
  pub fn forecast_detached(&self, h: usize) -> Vec<Gaussian<E>> {
    self.clone().forecast(h)
  }

  /// Back to the state right after construction.
  pub fn reset(&mut self) {
    debug!(t = self.t, "reset");
    self.t = 0;
    self.posterior = self.prior.clone();
    self.latest = Latest::placeholder(&self.system);
    self.history = History::seeded(&self.prior);
  }

  /// Predictive distribution of the next observation: `(G X, G Σ Gᵀ + R)`.
  pub fn predicted_observation(&self) -> Gaussian<E> {
    let g = &self.system.observation_operator;
    let mean = g.dot(&self.posterior.mean);
    let covariance = g.dot(&self.posterior.covariance).dot(&g.t())
      + &self.system.observation_covariance;
    Gaussian {
      mean: mean,
      covariance: covariance,
    }
  }

  fn innovation(&self, y: Array2<E>) -> Result<Innovation<E>> {
    let sys = &self.system;
    check_dim("observation y", &y, (sys.observation_dim(), 1))?;

    let g = &sys.observation_operator;
    let x = &self.posterior.mean;
    let sigma = &self.posterior.covariance;

    let a = &y - &g.dot(x);
    let sigma_gt = sigma.dot(&g.t());
    let s = g.dot(&sigma_gt) + &sys.observation_covariance;
    let s_inv = s.inv()
      .map_err(|e| match e {
        nla::Error::Singular { .. } => Error::SingularInnovationCovariance { step: self.t },
        e => Error::from(e),
      })?;
    let k = sys.transition.dot(&sigma_gt).dot(&s_inv);

    Ok(Innovation {
      observation: y,
      innovation: a,
      gain: k,
    })
  }

  fn filter(&mut self, step: Innovation<E>) {
    let Innovation {
      observation,
      innovation,
      gain,
    } = step;
    trace!(t = self.t, innovation = ?innovation, gain = ?gain, "filter");

    self.history.observations.push(observation.clone());
    self.history.gains.push(gain.clone());
    self.history.residuals.push(innovation.clone());

    self.latest.observation = Some(observation);
    self.latest.innovation = innovation;
    self.latest.gain = gain;
  }

  fn predict(&mut self) {
    let sys = &self.system;
    let k = &self.latest.gain;
    let a = &self.latest.innovation;
    let x = &self.posterior.mean;
    let sigma = &self.posterior.covariance;

    let mean = sys.transition.dot(x) + &k.dot(a);
    let f = &sys.transition - &k.dot(&sys.observation_operator);
    let mut covariance = f.dot(sigma).dot(&f.t())
      + &sys.state_noise_covariance
      + &k.dot(&sys.observation_covariance).dot(&k.t());
    symmetrize_mut(&mut covariance);

    self.t += 1;
    self.latest.error_transition = f;
    self.posterior = Posterior {
      mean: mean,
      covariance: covariance,
    };
  }

  fn record(&mut self) {
    self.history.means.push(self.posterior.mean.clone());
    self.history.covariances.push(self.posterior.covariance.clone());
  }

  pub fn system(&self) -> &SystemSpec<E> { &self.system }
  pub fn prior(&self) -> &Posterior<E> { &self.prior }
  pub fn posterior(&self) -> &Posterior<E> { &self.posterior }

  pub fn state_dim(&self) -> usize { self.system.state_dim() }
  pub fn observation_dim(&self) -> usize { self.system.observation_dim() }
  pub fn noise_dim(&self) -> usize { self.system.noise_dim() }

  /// Steps taken since construction or the last reset, forecast steps
  /// included.
  pub fn t(&self) -> u64 { self.t }

  /// Live mean X.
  pub fn mean(&self) -> ArrayView2<E> { self.posterior.mean.view() }
  /// Live covariance Σ.
  pub fn covariance(&self) -> ArrayView2<E> { self.posterior.covariance.view() }
  /// Latest gain K, or the all-ones placeholder before the first update.
  pub fn gain(&self) -> ArrayView2<E> { self.latest.gain.view() }
  /// Latest innovation a, zero before the first update.
  pub fn residual(&self) -> ArrayView2<E> { self.latest.innovation.view() }
  pub fn observation(&self) -> Option<ArrayView2<E>> {
    self.latest.observation.as_ref().map(|y| y.view())
  }
  /// F = A - K G from the last predict.
  pub fn error_transition(&self) -> ArrayView2<E> { self.latest.error_transition.view() }

  /// Prior mean followed by one mean per update.
  pub fn means(&self) -> &[Array2<E>] { &self.history.means }
  pub fn covariances(&self) -> &[Array2<E>] { &self.history.covariances }
  pub fn gains(&self) -> &[Array2<E>] { &self.history.gains }
  pub fn residuals(&self) -> &[Array2<E>] { &self.history.residuals }
  pub fn observations(&self) -> &[Array2<E>] { &self.history.observations }
}
