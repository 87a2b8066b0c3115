use crate::constants::MAX_NEIGHBOR_RANKS;
use crate::error::{CalibError, Result};
use crate::geometry::{euclidean, Cluster, ClusterSet, Point2D};

/// Ascending distances from one cluster to its nearest distinct neighbors.
///
/// Rank 0 is the nearest neighbor. Holds at most [`MAX_NEIGHBOR_RANKS`] entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborProfile {
    distances: Vec<f64>,
}

impl NeighborProfile {
    /// Build a profile from raw distances, keeping the nearest ranks in order.
    pub fn from_distances(mut distances: Vec<f64>) -> Self {
        distances.sort_by(f64::total_cmp);
        distances.truncate(MAX_NEIGHBOR_RANKS);
        Self { distances }
    }

    pub fn distances(&self) -> &[f64] {
        &self.distances
    }

    pub fn rank(&self, rank: usize) -> Option<f64> {
        self.distances.get(rank).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

/// Neighbor profile of the cluster at `center`.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterNeighbors {
    pub center: Point2D,
    pub profile: NeighborProfile,
}

/// Rank the nearest neighbors of every cluster, in input order.
///
/// Entries sharing a center are one cluster and are never ranked as each
/// other's neighbor. Profiles are recomputed on every call.
pub fn find(clusters: &ClusterSet) -> Result<Vec<ClusterNeighbors>> {
    if clusters.len() < 2 {
        return Err(CalibError::InsufficientClusters {
            required: 2,
            actual: clusters.len(),
        });
    }
    let all = clusters.as_slice();
    Ok(all
        .iter()
        .map(|cluster| ClusterNeighbors {
            center: cluster.center,
            profile: rank_neighbors(cluster.center, all),
        })
        .collect())
}

/// Profiles only, in input order.
pub fn profiles(clusters: &ClusterSet) -> Result<Vec<NeighborProfile>> {
    Ok(find(clusters)?.into_iter().map(|n| n.profile).collect())
}

// Running replacement over a full scan: until three candidates are held every
// distinct cluster is taken; after that a strictly closer candidate evicts the
// current farthest. Among equal farthest entries the first held is evicted, so
// results depend only on input order.
fn rank_neighbors(center: Point2D, clusters: &[Cluster]) -> NeighborProfile {
    let mut held: Vec<f64> = Vec::with_capacity(MAX_NEIGHBOR_RANKS);
    for other in clusters {
        if other.center == center {
            continue;
        }
        let dist = euclidean(center, other.center);
        if held.len() < MAX_NEIGHBOR_RANKS {
            held.push(dist);
            continue;
        }
        let (worst_idx, worst) = farthest(&held);
        if dist < worst {
            held[worst_idx] = dist;
        }
    }
    held.sort_by(f64::total_cmp);
    NeighborProfile { distances: held }
}

fn farthest(held: &[f64]) -> (usize, f64) {
    held.iter()
        .copied()
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |best, (idx, dist)| {
            if dist > best.1 {
                (idx, dist)
            } else {
                best
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha12Rng;
    use rstar::RTree;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn find_rejects_fewer_than_two_clusters() {
        assert_eq!(
            find(&ClusterSet::default()),
            Err(CalibError::InsufficientClusters {
                required: 2,
                actual: 0
            })
        );
        assert_eq!(
            find(&ClusterSet::from_centers([(1.0, 1.0)])),
            Err(CalibError::InsufficientClusters {
                required: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn keeps_three_nearest_sorted_ascending() {
        let clusters = ClusterSet::from_centers([
            (0.0, 0.0),
            (10.0, 0.0),
            (3.0, 0.0),
            (0.0, 1.0),
            (0.0, 7.0),
            (2.0, 0.0),
        ]);
        let found = find(&clusters).expect("six clusters");
        assert_eq!(found[0].center, Point2D::new(0.0, 0.0));
        assert_eq!(found[0].profile.distances(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn closer_candidate_evicts_the_farthest_held() {
        // Held after three: [9, 1, 5]. A 4 must replace the 9, not the 1.
        let clusters =
            ClusterSet::from_centers([(0.0, 0.0), (9.0, 0.0), (1.0, 0.0), (5.0, 0.0), (4.0, 0.0)]);
        let found = find(&clusters).expect("five clusters");
        assert_eq!(found[0].profile.distances(), &[1.0, 4.0, 5.0]);
    }

    #[test]
    fn shared_centers_are_never_neighbors() {
        let clusters =
            ClusterSet::from_centers([(1.0, 1.0), (1.0, 1.0), (4.0, 5.0), (1.0, 2.0)]);
        let found = find(&clusters).expect("four entries");
        assert_eq!(found[0].profile.distances(), &[1.0, 5.0]);
        assert_eq!(found[1].profile.distances(), &[1.0, 5.0]);
        assert!(found
            .iter()
            .all(|n| n.profile.distances().iter().all(|&d| d > 0.0)));
    }

    #[test]
    fn two_clusters_rank_each_other() {
        let clusters = ClusterSet::from_centers([(0.0, 0.0), (3.0, 4.0)]);
        let found = find(&clusters).expect("two clusters");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].profile.distances(), &[5.0]);
        assert_eq!(found[1].profile.distances(), &[5.0]);
    }

    #[test]
    fn seeded_layout_profile_lengths() {
        let mut rng = ChaCha12Rng::seed_from_u64(42);
        for k in 2..12usize {
            let clusters = ClusterSet::from_centers(
                (0..k).map(|_| (rng.random::<f64>() * 32.0, rng.random::<f64>() * 16.0)),
            );
            for n in find(&clusters).expect("k >= 2") {
                assert_eq!(n.profile.len(), MAX_NEIGHBOR_RANKS.min(k - 1));
                assert!(n.profile.distances().windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn from_distances_sorts_and_truncates() {
        let profile = NeighborProfile::from_distances(vec![4.0, 1.0, 3.0, 2.0]);
        assert_eq!(profile.distances(), &[1.0, 2.0, 3.0]);
        assert_eq!(profile.rank(0), Some(1.0));
        assert_eq!(profile.rank(3), None);
    }

    fn oracle_profile(tree: &RTree<[f64; 2]>, center: [f64; 2]) -> Vec<f64> {
        tree.nearest_neighbor_iter(&center)
            .filter(|p| **p != center)
            .take(MAX_NEIGHBOR_RANKS)
            .map(|p| euclidean(Point2D::from(*p), Point2D::from(center)))
            .collect()
    }

    proptest! {
        #[test]
        fn proptest_matches_rtree_knn(
            points in proptest::collection::vec((0.0f64..100.0, 0.0f64..100.0), 2..40),
        ) {
            let clusters = ClusterSet::from_centers(points.iter().copied());
            let tree = RTree::bulk_load(points.iter().map(|&(x, y)| [x, y]).collect());
            for n in find(&clusters).expect("at least two points") {
                let expected = oracle_profile(&tree, [n.center.x, n.center.y]);
                prop_assert_eq!(n.profile.len(), expected.len());
                for (got, want) in n.profile.distances().iter().zip(&expected) {
                    prop_assert!((got - want).abs() < 1e-9, "got {got}, want {want}");
                }
            }
        }
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let clusters = ClusterSet::from_centers([(0.3, 0.7), (5.1, 2.2), (9.9, 9.1), (4.4, 8.8)]);
        let first = find(&clusters).expect("four clusters");
        let second = find(&clusters).expect("four clusters");
        for (a, b) in first.iter().zip(&second) {
            let bits_a: Vec<u64> = a.profile.distances().iter().map(|d| d.to_bits()).collect();
            let bits_b: Vec<u64> = b.profile.distances().iter().map(|d| d.to_bits()).collect();
            assert_eq!(bits_a, bits_b);
        }
        assert_close(first[0].profile.distances()[0], 4.8f64.hypot(1.5));
    }
}
