pub mod batch;
pub mod config;
pub mod constants;
pub mod diffusion;
pub mod error;
pub mod geometry;
pub mod heterogeneity;
pub mod neighbors;
pub mod scenario;
pub mod variance;

pub use config::{Calibration, CalibrationConfigError, ExperimentConfig, FormulaVersion, SwarmConfig};
pub use diffusion::{crw_avoiding, crw_searching, DiffusionEstimate, SwarmParams};
pub use error::{CalibError, Result};
pub use geometry::{ArenaExtent, Cluster, ClusterSet, Nest, Point2D};
pub use heterogeneity::HeterogeneityCalculator;
pub use neighbors::{ClusterNeighbors, NeighborProfile};
pub use scenario::ScenarioTag;
pub use variance::RankSpread;
