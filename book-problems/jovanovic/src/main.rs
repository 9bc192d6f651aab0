extern crate common;

use clap::Parser;
use tracing::{debug, info};

use common::*;

mod config;

use config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let config = Config::parse();
  init_logging(config.verbose);

  let setup = config.setup();
  info!(?setup, "starting");

  let data: JovanovicData = setup.into();
  let mut kf = data.run()?;

  let states = StateSteps::from_estimator(&kf);
  for (t, ((y, x), (lo, hi))) in states.observations.column(0).iter()
    .zip(states.means.column(0).iter().skip(1))
    .zip(states.band(0, P_90)?.into_iter().skip(1))
    .enumerate()
  {
    debug!(t, y, mean = x, lo, hi, gain = states.gains[[t, 0, 0]], "step");
  }

  let sigma = kf.covariance()[[0, 0]];
  info!(mean = kf.mean()[[0, 0]], variance = sigma,
        closed_form = data.closed_form_variance(data.params.steps),
        theta = setup.theta,
        "posterior after {} periods", kf.t());
  info!(precision = 1.0 / sigma, "1/Σ = 1/Σ0 + t/R");

  let (lo, hi) = normal_band(kf.mean()[[0, 0]], sigma, P_90)?;
  info!(lo, hi, "90% band for θ");

  let next = kf.predicted_observation();
  info!(mean = next.mean[[0, 0]], variance = next.covariance[[0, 0]],
        "next observation");

  for (h, p) in kf.forecast(config.forecast).into_iter().enumerate() {
    let (lo, hi) = normal_band(p.mean[[0, 0]], p.covariance[[0, 0]], P_90)?;
    info!(h = h + 1, mean = p.mean[[0, 0]], lo, hi, "forecast");
  }

  Ok(())
}

fn init_logging(verbose: bool) {
  let subscriber = tracing_subscriber::fmt()
    .with_target(false)
    .with_level(true);

  if verbose {
    subscriber
      .with_max_level(tracing::Level::DEBUG)
      .init();
    debug!("Verbose logging enabled (DEBUG level)");
  } else {
    subscriber
      .with_max_level(tracing::Level::INFO)
      .init();
  }
}
