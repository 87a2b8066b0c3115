use std::error::Error;
use std::fmt;

use crate::config::CalibrationConfigError;

/// Failures reported by the heterogeneity and diffusion computations.
///
/// Every variant is a caller contract violation; none are retried.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibError {
    InvalidArena { xsize: f64, ysize: f64 },
    InsufficientClusters { required: usize, actual: usize },
    InsufficientSamples { rank: usize, count: usize },
    UnknownScenario(String),
    AmbiguousScenario(String),
    DivisionByZero,
    InvalidSwarmParams(&'static str),
    NoRuns,
    Calibration(CalibrationConfigError),
}

impl fmt::Display for CalibError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalibError::InvalidArena { xsize, ysize } => write!(
                f,
                "arena {xsize} x {ysize} must have positive, finite area and diagonal"
            ),
            CalibError::InsufficientClusters { required, actual } => write!(
                f,
                "at least {required} cluster(s) required, got {actual}"
            ),
            CalibError::InsufficientSamples { rank, count } => write!(
                f,
                "neighbor rank {rank} has {count} sample(s); variance needs at least 2"
            ),
            CalibError::UnknownScenario(tag) => {
                write!(f, "scenario '{tag}' has no avoidance divisor")
            }
            CalibError::AmbiguousScenario(tag) => write!(
                f,
                "scenario '{tag}' matches more than one of SS, DS, RN, PL"
            ),
            CalibError::DivisionByZero => write!(f, "ticks_per_sec must be greater than 0"),
            CalibError::InvalidSwarmParams(reason) => write!(f, "invalid swarm parameters: {reason}"),
            CalibError::NoRuns => write!(f, "no simulation runs to average"),
            CalibError::Calibration(e) => write!(f, "invalid calibration: {e}"),
        }
    }
}

impl Error for CalibError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CalibError::Calibration(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CalibrationConfigError> for CalibError {
    fn from(e: CalibrationConfigError) -> Self {
        CalibError::Calibration(e)
    }
}

pub type Result<T> = std::result::Result<T, CalibError>;
