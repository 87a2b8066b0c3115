//! Diffusion constants for a swarm of N correlated-random-walk robots in a
//! bounded arena, separately for searching and for collision avoidance.

use std::f64::consts::SQRT_2;

use tracing::debug;

use crate::constants::{
    AVOIDANCE_DIVISOR_DUAL_SOURCE, AVOIDANCE_DIVISOR_POWER_LAW, AVOIDANCE_DIVISOR_RANDOM,
    AVOIDANCE_DIVISOR_SINGLE_SOURCE, CRW_TURNING_INTEGRAL,
};
use crate::error::{CalibError, Result};
use crate::scenario::ScenarioTag;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwarmParams {
    /// Swarm population.
    pub n: f64,
    /// Wander speed (world units per tick).
    pub wander_speed: f64,
    pub ticks_per_sec: u32,
    /// Heterogeneity of the block layout, used directly as the scenario scale.
    pub scenario_hetero: f64,
    pub scenario: ScenarioTag,
}

impl SwarmParams {
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_sec == 0 {
            return Err(CalibError::DivisionByZero);
        }
        if !(self.n.is_finite() && self.n >= 0.0) {
            return Err(CalibError::InvalidSwarmParams(
                "n must be non-negative and finite",
            ));
        }
        if !(self.wander_speed.is_finite() && self.wander_speed >= 0.0) {
            return Err(CalibError::InvalidSwarmParams(
                "wander_speed must be non-negative and finite",
            ));
        }
        if !self.scenario_hetero.is_finite() {
            return Err(CalibError::InvalidSwarmParams(
                "scenario_hetero must be finite",
            ));
        }
        Ok(())
    }

    /// Seconds per simulation tick.
    pub fn tick_len(&self) -> Result<f64> {
        if self.ticks_per_sec == 0 {
            return Err(CalibError::DivisionByZero);
        }
        Ok(1.0 / f64::from(self.ticks_per_sec))
    }
}

/// Diffusion constant while searching: `N * v^2 / (4 * tick_len) / 0.055 * L_s`,
/// with `L_s = scenario_hetero` for every scenario.
pub fn crw_searching(params: &SwarmParams) -> Result<f64> {
    params.validate()?;
    let tick_len = params.tick_len()?;
    let drift = params.wander_speed.powi(2) / (4.0 * tick_len) / CRW_TURNING_INTEGRAL;
    let scenario_scale = params.scenario_hetero;
    let searching = params.n * drift * scenario_scale;
    debug!(
        scenario = %params.scenario,
        drift,
        scenario_scale,
        searching,
        "crw searching diffusion"
    );
    Ok(searching)
}

/// Diffusion constant while avoiding collisions.
///
/// Fails with [`CalibError::UnknownScenario`] for [`ScenarioTag::Default`],
/// which has no fitted divisor.
pub fn crw_avoiding(params: &SwarmParams) -> Result<f64> {
    let divisor = avoidance_divisor(params.scenario)?;
    let diffusion = crw_searching(params)? / CRW_TURNING_INTEGRAL;
    Ok(diffusion / divisor)
}

/// Avoidance diffusion from an already-rescaled searching constant `diffusion`.
pub fn avoiding_from_diffusion(diffusion: f64, scenario: ScenarioTag) -> Result<f64> {
    Ok(diffusion / avoidance_divisor(scenario)?)
}

/// Fitted avoidance divisor for `scenario`, including the `sqrt(2)` factor.
pub fn avoidance_divisor(scenario: ScenarioTag) -> Result<f64> {
    let base = match scenario {
        ScenarioTag::PowerLaw => AVOIDANCE_DIVISOR_POWER_LAW,
        ScenarioTag::Random => AVOIDANCE_DIVISOR_RANDOM,
        ScenarioTag::DualSource => AVOIDANCE_DIVISOR_DUAL_SOURCE,
        ScenarioTag::SingleSource => AVOIDANCE_DIVISOR_SINGLE_SOURCE,
        ScenarioTag::Default => return Err(CalibError::UnknownScenario(scenario.to_string())),
    };
    Ok(base * SQRT_2)
}

/// Searching and avoidance constants computed together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiffusionEstimate {
    pub searching: f64,
    /// `None` for scenarios without a fitted avoidance divisor.
    pub avoiding: Option<f64>,
}

/// Searching is defined for every scenario; avoidance only where a divisor
/// was fitted. Invalid swarm parameters still fail the whole estimate.
pub fn estimate(params: &SwarmParams) -> Result<DiffusionEstimate> {
    let searching = crw_searching(params)?;
    let avoiding = match avoiding_from_diffusion(searching / CRW_TURNING_INTEGRAL, params.scenario) {
        Ok(avoiding) => Some(avoiding),
        Err(CalibError::UnknownScenario(tag)) => {
            debug!(scenario = %tag, "no avoidance divisor; reporting searching only");
            None
        }
        Err(e) => return Err(e),
    };
    Ok(DiffusionEstimate {
        searching,
        avoiding,
    })
}
