//! Scalar heterogeneity of a block cluster layout relative to the nest.
//!
//! One- and two-cluster layouts use closed forms over nest distances, since
//! neighbor ranking is undefined or trivial there. Larger layouts combine the
//! mean nearest-neighbor distance with the rank-wise spread of those distances;
//! under [`FormulaVersion::NestScaled`] the spread enters as
//! `2^(variance / diagonal)` so irregular spacing grows the metric
//! super-linearly.
//!
//! Values are only comparable within one scenario family and one
//! [`Calibration`].

use tracing::{debug, warn};

use crate::config::{Calibration, FormulaVersion};
use crate::constants::VARIANCE_AMPLIFICATION_BASE;
use crate::error::{CalibError, Result};
use crate::geometry::{euclidean, ArenaExtent, ClusterSet, Nest};
use crate::neighbors;
use crate::scenario::ScenarioTag;
use crate::variance::{self, RankSpread};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Branch {
    SingleCluster,
    DoubleCluster,
    NeighborSpread,
}

#[derive(Clone, Debug, Default)]
pub struct HeterogeneityCalculator {
    calibration: Calibration,
}

impl HeterogeneityCalculator {
    pub fn new(calibration: Calibration) -> Result<Self> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    /// Heterogeneity of `clusters` around `nest`.
    ///
    /// Dispatch is by cluster count; `scenario` is only checked for
    /// consistency with it.
    pub fn compute(&self, clusters: &ClusterSet, nest: &Nest, scenario: ScenarioTag) -> Result<f64> {
        let arena = nest.arena;
        arena.validate()?;

        let branch = match clusters.len() {
            0 => {
                return Err(CalibError::InsufficientClusters {
                    required: 1,
                    actual: 0,
                })
            }
            1 => Branch::SingleCluster,
            2 => Branch::DoubleCluster,
            _ => Branch::NeighborSpread,
        };
        if let Some(expected) = scenario.expected_cluster_count() {
            if expected != clusters.len() {
                warn!(
                    %scenario,
                    expected,
                    actual = clusters.len(),
                    "scenario tag disagrees with cluster count; dispatching by count"
                );
            }
        }
        debug!(
            %scenario,
            clusters = clusters.len(),
            ?branch,
            formula = ?self.calibration.formula,
            "heterogeneity dispatch"
        );

        let value = match branch {
            Branch::SingleCluster | Branch::DoubleCluster => {
                let mean_nest_distance = variance::mean(
                    &clusters
                        .iter()
                        .map(|c| euclidean(c.center, nest.center))
                        .collect::<Vec<_>>(),
                );
                self.nest_distance_term(mean_nest_distance, clusters.len(), &arena)
            }
            Branch::NeighborSpread => {
                let spread = variance::aggregate(&neighbors::profiles(clusters)?)?;
                self.spread_term(&spread, clusters.len(), &arena)
            }
        };
        Ok(value)
    }

    fn nest_distance_term(&self, mean_nest_distance: f64, count: usize, arena: &ArenaExtent) -> f64 {
        let normalized = mean_nest_distance / arena.diagonal();
        match self.calibration.formula {
            FormulaVersion::NestScaled => {
                normalized
                    * arena.xsize.powf(self.calibration.near_field_exponent)
                    * self.calibration.density_scale
            }
            FormulaVersion::AreaDensity => normalized * (count as f64 / arena.area()),
        }
    }

    fn spread_term(&self, spread: &RankSpread, count: usize, arena: &ArenaExtent) -> f64 {
        let diagonal = arena.diagonal();
        match self.calibration.formula {
            FormulaVersion::NestScaled => {
                self.calibration.density_scale
                    * arena.xsize.powf(self.calibration.spread_exponent)
                    * (spread.mean_neighbor_distance() / diagonal)
                    * VARIANCE_AMPLIFICATION_BASE.powf(spread.mean_variance / diagonal)
            }
            FormulaVersion::AreaDensity => {
                (spread.mean_variance / diagonal) * (count as f64 / arena.area())
            }
        }
    }
}

/// Heterogeneity under the default calibration.
pub fn compute(clusters: &ClusterSet, nest: &Nest, scenario: ScenarioTag) -> Result<f64> {
    HeterogeneityCalculator::default().compute(clusters, nest, scenario)
}
