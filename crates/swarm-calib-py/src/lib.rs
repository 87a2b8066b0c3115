use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use swarm_calib_core::{
    diffusion, ArenaExtent, CalibError, Calibration, ClusterSet, ExperimentConfig,
    HeterogeneityCalculator, Nest, Point2D, ScenarioTag, SwarmParams,
};

/// Minimal PyO3 module exposing swarm-calib-core to Python.
#[pyfunction]
fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

fn value_error(e: CalibError) -> PyErr {
    PyValueError::new_err(e.to_string())
}

#[pyfunction]
fn default_config_json() -> PyResult<String> {
    serde_json::to_string(&ExperimentConfig::default())
        .map_err(|e| PyValueError::new_err(format!("failed to serialize default config: {e}")))
}

#[pyfunction]
fn validate_config_json(config_json: &str) -> PyResult<bool> {
    let config: ExperimentConfig = serde_json::from_str(config_json)
        .map_err(|e| PyValueError::new_err(format!("invalid config json: {e}")))?;
    config
        .validate()
        .map(|_| true)
        .map_err(|e| PyValueError::new_err(format!("invalid experiment: {e}")))
}

/// Calibration from optional JSON (missing fields take defaults), with `rho`
/// overriding the density scale when given.
fn calibration_from(
    calibration_json: Option<&str>,
    rho: Option<f64>,
) -> Result<Calibration, serde_json::Error> {
    let mut calibration = match calibration_json {
        Some(json) => serde_json::from_str(json)?,
        None => Calibration::default(),
    };
    if let Some(rho) = rho {
        calibration.density_scale = rho;
    }
    Ok(calibration)
}

fn heterogeneity_impl(
    clusters: Vec<(f64, f64)>,
    nest: (f64, f64),
    arena: (f64, f64),
    scenario: &str,
    calibration: Calibration,
) -> Result<f64, CalibError> {
    let scenario = ScenarioTag::parse(scenario)?;
    let calculator = HeterogeneityCalculator::new(calibration)?;
    let nest = Nest::new(Point2D::from(nest), ArenaExtent::new(arena.0, arena.1));
    calculator.compute(&ClusterSet::from_centers(clusters), &nest, scenario)
}

#[pyfunction]
#[pyo3(signature = (clusters, nest, arena, scenario, rho = None, calibration_json = None))]
fn heterogeneity(
    clusters: Vec<(f64, f64)>,
    nest: (f64, f64),
    arena: (f64, f64),
    scenario: &str,
    rho: Option<f64>,
    calibration_json: Option<&str>,
) -> PyResult<f64> {
    let calibration = calibration_from(calibration_json, rho)
        .map_err(|e| PyValueError::new_err(format!("invalid calibration json: {e}")))?;
    heterogeneity_impl(clusters, nest, arena, scenario, calibration).map_err(value_error)
}

fn swarm_params(
    n: f64,
    wander_speed: f64,
    ticks_per_sec: u32,
    scenario_hetero: f64,
    scenario: &str,
) -> Result<SwarmParams, CalibError> {
    Ok(SwarmParams {
        n,
        wander_speed,
        ticks_per_sec,
        scenario_hetero,
        scenario: ScenarioTag::parse(scenario)?,
    })
}

#[pyfunction]
fn crw_searching(
    n: f64,
    wander_speed: f64,
    ticks_per_sec: u32,
    scenario_hetero: f64,
    scenario: &str,
) -> PyResult<f64> {
    swarm_params(n, wander_speed, ticks_per_sec, scenario_hetero, scenario)
        .and_then(|p| diffusion::crw_searching(&p))
        .map_err(value_error)
}

#[pyfunction]
fn crw_avoiding(
    n: f64,
    wander_speed: f64,
    ticks_per_sec: u32,
    scenario_hetero: f64,
    scenario: &str,
) -> PyResult<f64> {
    swarm_params(n, wander_speed, ticks_per_sec, scenario_hetero, scenario)
        .and_then(|p| diffusion::crw_avoiding(&p))
        .map_err(value_error)
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(version, m)?)?;
    m.add_function(wrap_pyfunction!(default_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(validate_config_json, m)?)?;
    m.add_function(wrap_pyfunction!(heterogeneity, m)?)?;
    m.add_function(wrap_pyfunction!(crw_searching, m)?)?;
    m.add_function(wrap_pyfunction!(crw_avoiding, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use swarm_calib_core::FormulaVersion;

    fn single_cluster(calibration: Calibration) -> f64 {
        heterogeneity_impl(vec![(3.0, 4.0)], (0.0, 0.0), (6.0, 8.0), "SS.6x8", calibration)
            .expect("one cluster")
    }

    #[test]
    fn heterogeneity_impl_applies_rho() {
        let base = single_cluster(calibration_from(None, Some(1.0)).expect("no json"));
        let scaled = single_cluster(calibration_from(None, Some(2.0)).expect("no json"));
        assert_eq!(scaled, 2.0 * base);
    }

    #[test]
    fn calibration_json_selects_area_density() {
        let calibration =
            calibration_from(Some(r#"{"formula":"area_density"}"#), None).expect("valid json");
        assert_eq!(calibration.formula, FormulaVersion::AreaDensity);
        let value = single_cluster(calibration);
        assert!((value - 0.5 / 48.0).abs() < 1e-12, "got {value}");
    }

    #[test]
    fn calibration_json_round_trips_legacy_spread() {
        let json = serde_json::to_string(&Calibration::legacy_spread()).expect("serialize");
        assert_eq!(
            calibration_from(Some(&json), None).expect("valid json"),
            Calibration::legacy_spread()
        );
    }

    #[test]
    fn rho_overrides_calibration_json() {
        let calibration = calibration_from(Some(r#"{"density_scale":3.0}"#), Some(0.5))
            .expect("valid json");
        assert_eq!(calibration.density_scale, 0.5);
    }

    #[test]
    fn malformed_calibration_json_is_rejected() {
        assert!(calibration_from(Some(r#"{"formula":"cubic"}"#), None).is_err());
    }

    #[test]
    fn heterogeneity_impl_rejects_empty_clusters() {
        let result =
            heterogeneity_impl(Vec::new(), (0.0, 0.0), (6.0, 8.0), "RN", Calibration::default());
        assert!(matches!(
            result,
            Err(CalibError::InsufficientClusters { .. })
        ));
    }

    #[test]
    fn swarm_params_rejects_ambiguous_scenario() {
        assert!(matches!(
            swarm_params(10.0, 0.1, 5, 0.2, "RN+PL"),
            Err(CalibError::AmbiguousScenario(_))
        ));
    }
}
