use crate::constants::MAX_NEIGHBOR_RANKS;
use crate::error::{CalibError, Result};
use crate::neighbors::NeighborProfile;

/// Spread of neighbor distances across all clusters, rank by rank.
#[derive(Clone, Debug, PartialEq)]
pub struct RankSpread {
    /// Mean over ranks of the sample variance of each rank's distances.
    pub mean_variance: f64,
    /// Arithmetic mean distance of each rank, nearest first.
    pub per_rank_mean_distance: Vec<f64>,
}

impl RankSpread {
    /// Mean of the per-rank mean distances.
    pub fn mean_neighbor_distance(&self) -> f64 {
        mean(&self.per_rank_mean_distance)
    }
}

/// Aggregate neighbor profiles rank-wise.
///
/// Rank `r` collects the `r`-th distance of every profile long enough to have
/// one. Each rank present must have at least two samples.
pub fn aggregate(profiles: &[NeighborProfile]) -> Result<RankSpread> {
    let ranks = profiles
        .iter()
        .map(NeighborProfile::len)
        .max()
        .unwrap_or(0)
        .min(MAX_NEIGHBOR_RANKS);
    if ranks == 0 {
        return Err(CalibError::InsufficientSamples { rank: 0, count: 0 });
    }

    let mut variances = Vec::with_capacity(ranks);
    let mut per_rank_mean_distance = Vec::with_capacity(ranks);
    for rank in 0..ranks {
        let samples: Vec<f64> = profiles.iter().filter_map(|p| p.rank(rank)).collect();
        if samples.len() < 2 {
            return Err(CalibError::InsufficientSamples {
                rank,
                count: samples.len(),
            });
        }
        variances.push(sample_variance(&samples));
        per_rank_mean_distance.push(mean(&samples));
    }

    Ok(RankSpread {
        mean_variance: mean(&variances),
        per_rank_mean_distance,
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected variance. Callers guarantee at least two values.
fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    let sum_sq = values.iter().map(|v| (v - m).powi(2)).sum::<f64>();
    sum_sq / (values.len() - 1) as f64
}
