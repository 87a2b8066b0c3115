use serde::{Deserialize, Serialize};

use crate::error::{CalibError, Result};

/// A point in the arena plane (world units).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2D) -> f64 {
        euclidean(*self, *other)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point2D {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

pub fn euclidean(a: Point2D, b: Point2D) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    (dx * dx + dy * dy).sqrt()
}

/// Rectangular arena dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArenaExtent {
    pub xsize: f64,
    pub ysize: f64,
}

impl ArenaExtent {
    pub const fn new(xsize: f64, ysize: f64) -> Self {
        Self { xsize, ysize }
    }

    pub fn area(&self) -> f64 {
        self.xsize * self.ysize
    }

    pub fn diagonal(&self) -> f64 {
        self.xsize.hypot(self.ysize)
    }

    /// Rejects arenas whose sides, area or diagonal are not positive and finite.
    pub fn validate(&self) -> Result<()> {
        let sides_ok = self.xsize.is_finite()
            && self.xsize > 0.0
            && self.ysize.is_finite()
            && self.ysize > 0.0;
        let area = self.area();
        let diagonal = self.diagonal();
        if !(sides_ok && area.is_finite() && area > 0.0 && diagonal.is_finite() && diagonal > 0.0)
        {
            return Err(CalibError::InvalidArena {
                xsize: self.xsize,
                ysize: self.ysize,
            });
        }
        Ok(())
    }
}

impl Default for ArenaExtent {
    fn default() -> Self {
        Self::new(32.0, 16.0)
    }
}

/// Reference point robots return to, and the arena it sits in.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Nest {
    pub center: Point2D,
    pub arena: ArenaExtent,
}

impl Nest {
    pub const fn new(center: Point2D, arena: ArenaExtent) -> Self {
        Self { center, arena }
    }
}

/// A block cluster, identified by its center.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub center: Point2D,
}

impl Cluster {
    pub const fn new(center: Point2D) -> Self {
        Self { center }
    }
}

impl From<Point2D> for Cluster {
    fn from(center: Point2D) -> Self {
        Self { center }
    }
}

/// Ordered collection of clusters from one simulation run.
///
/// Entries sharing a center are kept; the neighbor search treats them as the
/// same cluster and never pairs them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterSet {
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    pub fn new(clusters: Vec<Cluster>) -> Self {
        Self { clusters }
    }

    pub fn from_centers<I, P>(centers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Point2D>,
    {
        Self {
            clusters: centers.into_iter().map(|p| Cluster::new(p.into())).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cluster> {
        self.clusters.iter()
    }

    pub fn as_slice(&self) -> &[Cluster] {
        &self.clusters
    }
}

impl<'a> IntoIterator for &'a ClusterSet {
    type Item = &'a Cluster;
    type IntoIter = std::slice::Iter<'a, Cluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.clusters.iter()
    }
}

impl FromIterator<Cluster> for ClusterSet {
    fn from_iter<T: IntoIterator<Item = Cluster>>(iter: T) -> Self {
        Self {
            clusters: iter.into_iter().collect(),
        }
    }
}
