use std::{
    fs,
    path::{Path, PathBuf},
};

use approx::assert_relative_eq;
use integration_tests::{LakeParams, STRIP_COL, init_logger, line_load_dem};
use lakeflex_core::fields;
use lakeflex_io::{
    Scenario, ScenarioError, esri_ascii, load_params,
    params::ParamsError,
    scenario::OUTPUTS,
};
use lakeflex_models::flexure::ElasticPlate;
use lakeflex_solvers::equilibrium::{Config, ConfigError, LakeFlexer, Status};

/// Writes the line-load DEM and a parameter file naming it into `dir`.
fn write_inputs(dir: &Path, params: &LakeParams) -> PathBuf {
    let (mut grid, elevation) = line_load_dem();
    grid.add_field(fields::TOPOGRAPHIC_ELEVATION, elevation)
        .unwrap();
    esri_ascii::write_esri_ascii(
        dir.join(&params.dem_filename),
        &grid,
        fields::TOPOGRAPHIC_ELEVATION,
    )
    .unwrap();

    let path = dir.join("test_params.txt");
    fs::write(&path, params.to_yaml()).unwrap();
    path
}

#[test]
fn parameter_file_runs_like_the_in_memory_solver() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let params = LakeParams::default();
    let path = write_inputs(dir.path(), &params);

    let mut scenario = Scenario::from_param_file(&path).unwrap();
    let state = scenario.run().unwrap();
    assert_eq!(state.status, Status::Converged);

    let (grid, elevation) = line_load_dem();
    let mut direct = LakeFlexer::new(ElasticPlate::new());
    direct
        .initialize(params.config().unwrap(), grid, &elevation)
        .unwrap();
    let direct_state = direct.update().unwrap();

    assert_eq!(state.evaluations, direct_state.evaluations);
    let from_file = scenario.flexer().deflection().unwrap();
    let in_memory = direct.deflection().unwrap();
    for (a, b) in from_file.iter().zip(in_memory) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }
}

#[test]
fn results_are_written_as_rasters() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_inputs(dir.path(), &LakeParams::default());
    let mut scenario = Scenario::from_param_file(&path).unwrap();
    scenario.run().unwrap();

    let out = dir.path().join("results");
    let results = scenario.write_results(&out).unwrap();

    for (_, file) in OUTPUTS {
        assert!(out.join(file).is_file(), "{file} was not written");
    }

    let (grid, deflection) = esri_ascii::read_esri_ascii(out.join("deflection.asc")).unwrap();
    assert_eq!(grid.shape(), (9, 9));
    assert_relative_eq!(grid.spacing().dx, 10_000.0);
    for (a, b) in deflection.iter().zip(results.deflection.iter()) {
        assert_relative_eq!(*a, *b, max_relative = 1e-12);
    }

    let (_, flexed) = esri_ascii::read_esri_ascii(out.join("flexed_elevation.asc")).unwrap();
    let strip = 4 * 9 + STRIP_COL;
    assert_relative_eq!(flexed[strip], -10.0 - results.deflection[[4, STRIP_COL]], epsilon = 1e-9);
}

#[test]
fn round_tripped_parameters_match() {
    let dir = tempfile::tempdir().unwrap();
    let params = LakeParams {
        max_iterations: Some(40),
        ..LakeParams::default()
    };
    let path = write_inputs(dir.path(), &params);

    let loaded = load_params(&path).unwrap();

    assert_eq!(loaded.dem_filename, Some(dir.path().join("test_dem.asc")));
    let config = Config::from_params(&loaded.values).unwrap();
    assert_eq!(config, params.config().unwrap());
    assert_eq!(config.max_iters, 40);
}

#[test]
fn bad_parameter_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let params = LakeParams {
        elastic_thickness: -1.0,
        ..LakeParams::default()
    };
    let path = write_inputs(dir.path(), &params);
    assert!(matches!(
        Scenario::from_param_file(&path),
        Err(ScenarioError::Config(ConfigError::NotPositive {
            key: "elastic_thickness",
            ..
        }))
    ));

    let text: String = params
        .to_yaml()
        .lines()
        .map(|line| {
            if line.starts_with("elastic_thickness:") {
                "elastic_thickness: thick\n".to_owned()
            } else {
                format!("{line}\n")
            }
        })
        .collect();
    fs::write(&path, text).unwrap();
    assert!(matches!(
        Scenario::from_param_file(&path),
        Err(ScenarioError::Params(ParamsError::Config(
            ConfigError::NotNumeric { .. }
        )))
    ));
}
