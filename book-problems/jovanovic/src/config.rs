use clap::Parser;

use common::JovanovicSetup;

/// Filter a simulated Jovanovic job-matching history.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
  /// True worker quality θ.
  #[arg(long)]
  pub theta: Option<f64>,

  /// Variance R of the output noise.
  #[arg(long, value_name = "R")]
  pub observation_variance: Option<f64>,

  /// Prior mean of θ.
  #[arg(long)]
  pub prior_mean: Option<f64>,

  /// Prior variance of θ.
  #[arg(long)]
  pub prior_variance: Option<f64>,

  /// Number of observed periods.
  #[arg(long)]
  pub steps: Option<usize>,

  /// Seed for the observation noise.
  #[arg(long)]
  pub seed: Option<u64>,

  /// Periods to forecast after the last observation.
  #[arg(long, value_name = "H", default_value_t = 10)]
  pub forecast: usize,

  /// Verbose logging (DEBUG level)
  #[arg(long, short, default_value_t = false)]
  pub verbose: bool,
}

impl Config {
  /// The default setup with any flags given on the command line applied.
  pub fn setup(&self) -> JovanovicSetup {
    let d = JovanovicSetup::default();
    JovanovicSetup {
      theta: self.theta.unwrap_or(d.theta),
      observation_variance: self.observation_variance.unwrap_or(d.observation_variance),
      prior_mean: self.prior_mean.unwrap_or(d.prior_mean),
      prior_variance: self.prior_variance.unwrap_or(d.prior_variance),
      steps: self.steps.unwrap_or(d.steps),
      rand_seed: self.seed.unwrap_or(d.rand_seed),
    }
  }
}
