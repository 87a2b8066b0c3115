use std::fmt;
use std::str::FromStr;

use crate::error::CalibError;

/// Block distribution family of a simulation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ScenarioTag {
    /// Single source: one block cluster.
    SingleSource,
    /// Dual source: two block clusters.
    DualSource,
    /// Random block placement.
    Random,
    /// Power-law cluster sizes.
    PowerLaw,
    /// Uniform or otherwise unclassified distribution.
    #[default]
    Default,
}

impl ScenarioTag {
    const MARKERS: [(&'static str, ScenarioTag); 4] = [
        ("SS", ScenarioTag::SingleSource),
        ("DS", ScenarioTag::DualSource),
        ("RN", ScenarioTag::Random),
        ("PL", ScenarioTag::PowerLaw),
    ];

    /// Resolve a free-form scenario name such as `"SS.16x8"` or `"PL.32x16"`.
    ///
    /// Markers are matched case-sensitively as substrings. A name carrying no
    /// marker resolves to [`ScenarioTag::Default`]; one carrying several is
    /// rejected.
    pub fn parse(name: &str) -> Result<Self, CalibError> {
        let mut found = Self::MARKERS
            .iter()
            .filter(|(marker, _)| name.contains(marker))
            .map(|&(_, tag)| tag);
        match (found.next(), found.next()) {
            (None, _) => Ok(ScenarioTag::Default),
            (Some(tag), None) => Ok(tag),
            (Some(_), Some(_)) => Err(CalibError::AmbiguousScenario(name.to_string())),
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ScenarioTag::SingleSource => "SS",
            ScenarioTag::DualSource => "DS",
            ScenarioTag::Random => "RN",
            ScenarioTag::PowerLaw => "PL",
            ScenarioTag::Default => "default",
        }
    }

    /// Cluster count the closed-form branches expect for this family, if any.
    pub fn expected_cluster_count(&self) -> Option<usize> {
        match self {
            ScenarioTag::SingleSource => Some(1),
            ScenarioTag::DualSource => Some(2),
            _ => None,
        }
    }
}

impl FromStr for ScenarioTag {
    type Err = CalibError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScenarioTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.marker())
    }
}
