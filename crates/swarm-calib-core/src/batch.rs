use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExperimentConfig;
use crate::diffusion::{self, DiffusionEstimate};
use crate::error::{CalibError, Result};
use crate::geometry::{ClusterSet, Nest};
use crate::heterogeneity::HeterogeneityCalculator;
use crate::scenario::ScenarioTag;

/// Per-run heterogeneity and its arithmetic mean.
///
/// Runs are evaluated independently; power-law layouts differ between runs,
/// so averaging cluster positions first would change the result.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeterogeneitySummary {
    pub scenario: String,
    pub per_run: Vec<f64>,
    pub mean: f64,
}

pub fn mean_heterogeneity(
    calculator: &HeterogeneityCalculator,
    runs: &[ClusterSet],
    nest: &Nest,
    scenario: ScenarioTag,
) -> Result<(Vec<f64>, f64)> {
    if runs.is_empty() {
        return Err(CalibError::NoRuns);
    }
    let per_run = runs
        .iter()
        .map(|clusters| calculator.compute(clusters, nest, scenario))
        .collect::<Result<Vec<f64>>>()?;
    let mean = per_run.iter().sum::<f64>() / per_run.len() as f64;
    debug!(%scenario, runs = per_run.len(), mean, "averaged heterogeneity");
    Ok((per_run, mean))
}

/// Heterogeneity summary for every run of `config`.
pub fn summarize(config: &ExperimentConfig) -> Result<HeterogeneitySummary> {
    config.validate()?;
    let scenario = config.scenario_tag()?;
    let calculator = HeterogeneityCalculator::new(config.calibration.clone())?;
    let (per_run, mean) = mean_heterogeneity(&calculator, &config.runs, &config.nest(), scenario)?;
    Ok(HeterogeneitySummary {
        scenario: config.scenario.clone(),
        per_run,
        mean,
    })
}

/// Diffusion constants using the run-averaged heterogeneity as scenario scale.
pub fn diffusion_for(config: &ExperimentConfig) -> Result<(HeterogeneitySummary, DiffusionEstimate)> {
    let summary = summarize(config)?;
    let params = config.swarm.params(summary.mean, config.scenario_tag()?);
    let estimate = diffusion::estimate(&params)?;
    Ok((summary, estimate))
}
