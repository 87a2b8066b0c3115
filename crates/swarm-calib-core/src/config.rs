use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DENSITY_SCALE, LEGACY_SPREAD_EXPONENT, NEAR_FIELD_EXPONENT, SPREAD_EXPONENT,
};
use crate::diffusion::SwarmParams;
use crate::error::CalibError;
use crate::geometry::{ArenaExtent, ClusterSet, Nest, Point2D};
use crate::scenario::ScenarioTag;

/// Which heterogeneity formula family a deployment is calibrated against.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FormulaVersion {
    /// Nest-distance closed forms scaled by `xsize^near_field_exponent * rho`,
    /// neighbor spread amplified by `2^(variance / diagonal)`.
    #[default]
    NestScaled,
    /// Earlier density formulation: distances and variance normalized by the
    /// diagonal and scaled by cluster count over arena area.
    AreaDensity,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Calibration {
    /// Formula family. Never mix constants fitted for one family with the other.
    pub formula: FormulaVersion,
    /// Cluster density scale (rho) multiplied into every `NestScaled` branch.
    pub density_scale: f64,
    /// Exponent on the arena x-extent for the one- and two-cluster closed forms.
    pub near_field_exponent: f64,
    /// Exponent on the arena x-extent for the neighbor spread formula.
    pub spread_exponent: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            formula: FormulaVersion::NestScaled,
            density_scale: DEFAULT_DENSITY_SCALE,
            near_field_exponent: NEAR_FIELD_EXPONENT,
            spread_exponent: SPREAD_EXPONENT,
        }
    }
}

macro_rules! define_calibration_config_error {
    (
        $(
            $variant:ident => $fmt:literal
        );* $(;)?
    ) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum CalibrationConfigError {
            $( $variant, )*
        }

        impl std::fmt::Display for CalibrationConfigError {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $( Self::$variant => write!(f, $fmt), )*
                }
            }
        }
    };
}

define_calibration_config_error! {
    InvalidDensityScale => "density_scale must be positive and finite";
    InvalidNearFieldExponent => "near_field_exponent must be finite";
    InvalidSpreadExponent => "spread_exponent must be finite";
}

impl std::error::Error for CalibrationConfigError {}

impl Calibration {
    /// Same formula family as the default, with the earlier spread exponent fit.
    pub fn legacy_spread() -> Self {
        Self {
            spread_exponent: LEGACY_SPREAD_EXPONENT,
            ..Self::default()
        }
    }

    pub fn with_density_scale(density_scale: f64) -> Self {
        Self {
            density_scale,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CalibrationConfigError> {
        if !(self.density_scale.is_finite() && self.density_scale > 0.0) {
            return Err(CalibrationConfigError::InvalidDensityScale);
        }
        if !self.near_field_exponent.is_finite() {
            return Err(CalibrationConfigError::InvalidNearFieldExponent);
        }
        if !self.spread_exponent.is_finite() {
            return Err(CalibrationConfigError::InvalidSpreadExponent);
        }
        Ok(())
    }
}

/// Swarm and locomotion settings shared by every run of an experiment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SwarmConfig {
    /// Number of robots.
    pub n: f64,
    /// CRW wander speed (world units per tick).
    pub wander_speed: f64,
    /// Simulation ticks per second.
    pub ticks_per_sec: u32,
}

impl Default for SwarmConfig {
    fn default() -> Self {
        Self {
            n: 24.0,
            wander_speed: 0.1,
            ticks_per_sec: 5,
        }
    }
}

impl SwarmConfig {
    pub fn params(&self, scenario_hetero: f64, scenario: ScenarioTag) -> SwarmParams {
        SwarmParams {
            n: self.n,
            wander_speed: self.wander_speed,
            ticks_per_sec: self.ticks_per_sec,
            scenario_hetero,
            scenario,
        }
    }
}

/// One experiment: shared geometry plus the cluster centers of each run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Free-form scenario name, e.g. `"RN.32x16"`.
    pub scenario: String,
    pub arena: ArenaExtent,
    pub nest_center: Point2D,
    pub calibration: Calibration,
    pub swarm: SwarmConfig,
    /// Cluster centers, one set per simulation run.
    pub runs: Vec<ClusterSet>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            scenario: "RN.32x16".to_string(),
            arena: ArenaExtent::new(32.0, 16.0),
            nest_center: Point2D::new(2.0, 8.0),
            calibration: Calibration::default(),
            swarm: SwarmConfig::default(),
            runs: vec![ClusterSet::from_centers([
                (10.0, 4.0),
                (14.0, 12.0),
                (22.0, 6.0),
                (27.0, 11.0),
            ])],
        }
    }
}

impl ExperimentConfig {
    pub fn nest(&self) -> Nest {
        Nest::new(self.nest_center, self.arena)
    }

    pub fn scenario_tag(&self) -> Result<ScenarioTag, CalibError> {
        ScenarioTag::parse(&self.scenario)
    }

    pub fn validate(&self) -> Result<(), CalibError> {
        self.arena.validate()?;
        self.calibration.validate()?;
        self.scenario_tag()?;
        if self.runs.is_empty() {
            return Err(CalibError::NoRuns);
        }
        // Placeholder hetero: only the swarm fields are checked here.
        self.swarm.params(0.0, ScenarioTag::Default).validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default() {
        assert!(Calibration::default().validate().is_ok());
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn legacy_spread_only_changes_exponent() {
        let legacy = Calibration::legacy_spread();
        assert_eq!(legacy.spread_exponent, LEGACY_SPREAD_EXPONENT);
        assert_eq!(legacy.density_scale, Calibration::default().density_scale);
        assert_eq!(legacy.formula, FormulaVersion::NestScaled);
    }

    #[test]
    fn validate_rejects_bad_density_scale() {
        for rho in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                Calibration::with_density_scale(rho).validate(),
                Err(CalibrationConfigError::InvalidDensityScale)
            );
        }
    }

    #[test]
    fn validate_rejects_non_finite_exponents() {
        let config = Calibration {
            spread_exponent: f64::NAN,
            ..Calibration::default()
        };
        assert_eq!(
            config.validate(),
            Err(CalibrationConfigError::InvalidSpreadExponent)
        );
        let config = Calibration {
            near_field_exponent: f64::NEG_INFINITY,
            ..Calibration::default()
        };
        assert_eq!(
            config.validate(),
            Err(CalibrationConfigError::InvalidNearFieldExponent)
        );
    }

    #[test]
    fn experiment_validate_reports_first_failure() {
        let config = ExperimentConfig {
            arena: ArenaExtent::new(0.0, 16.0),
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CalibError::InvalidArena { .. })
        ));

        let config = ExperimentConfig {
            calibration: Calibration::with_density_scale(0.0),
            ..ExperimentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(CalibError::Calibration(
                CalibrationConfigError::InvalidDensityScale
            ))
        );

        let config = ExperimentConfig {
            runs: Vec::new(),
            ..ExperimentConfig::default()
        };
        assert_eq!(config.validate(), Err(CalibError::NoRuns));

        let config = ExperimentConfig {
            swarm: SwarmConfig {
                ticks_per_sec: 0,
                ..SwarmConfig::default()
            },
            ..ExperimentConfig::default()
        };
        assert_eq!(config.validate(), Err(CalibError::DivisionByZero));
    }

    #[test]
    fn sparse_config_json_deserializes_with_defaults() {
        let json = r#"{
            "scenario": "SS.16x8",
            "arena": { "xsize": 16.0, "ysize": 8.0 },
            "runs": [[{ "center": { "x": 12.0, "y": 4.0 } }]]
        }"#;
        let cfg: ExperimentConfig = serde_json::from_str(json).expect("sparse config should parse");
        assert_eq!(cfg.scenario_tag(), Ok(ScenarioTag::SingleSource));
        assert_eq!(cfg.calibration, Calibration::default());
        assert_eq!(cfg.swarm, SwarmConfig::default());
        assert_eq!(cfg.runs.len(), 1);
        assert_eq!(cfg.runs[0].len(), 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn formula_version_uses_snake_case() {
        let json = serde_json::to_string(&FormulaVersion::AreaDensity).expect("serialize");
        assert_eq!(json, "\"area_density\"");
        let parsed: Calibration =
            serde_json::from_str(r#"{ "formula": "area_density" }"#).expect("parse");
        assert_eq!(parsed.formula, FormulaVersion::AreaDensity);
    }
}
