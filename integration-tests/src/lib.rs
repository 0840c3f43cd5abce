//! Shared fixtures for the cross-crate tests.

use std::collections::BTreeMap;

use lakeflex_core::{RasterGrid, Spacing};
use lakeflex_solvers::equilibrium::{Config, ConfigError, keys};
use serde::{Deserialize, Serialize};

/// Node spacing of the line-load DEM, m.
pub const LINE_LOAD_SPACING: f64 = 10_000.0;

/// Column holding the line load.
pub const STRIP_COL: usize = 4;

/// A 9x9 DEM at 10 m with a -10 m trough in the column where
/// 30 km < x <= 40 km.
///
/// # Panics
///
/// Never; the shape and spacing are valid.
#[must_use]
pub fn line_load_dem() -> (RasterGrid, Vec<f64>) {
    let grid = RasterGrid::new((9, 9), Spacing::uniform(LINE_LOAD_SPACING))
        .expect("valid grid");

    let mut elevation = Vec::with_capacity(grid.node_count());
    for _row in 0..9 {
        for col in 0..9 {
            let x = grid.x_of_col(col);
            let trough = x > 30_000.0 && x <= 40_000.0;
            elevation.push(if trough { -10.0 } else { 10.0 });
        }
    }
    (grid, elevation)
}

/// Contents of a parameter file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LakeParams {
    pub dem_filename: String,
    pub elastic_thickness: f64,
    pub youngs_modulus: f64,
    pub mantle_density: f64,
    pub gravitational_acceleration: f64,
    pub water_surface_elevation: f64,
    pub lake_water_density: f64,
    pub lake_elev_tolerance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
}

impl Default for LakeParams {
    fn default() -> Self {
        Self {
            dem_filename: "test_dem.asc".into(),
            elastic_thickness: 10_000.0,
            youngs_modulus: 7.0e10,
            mantle_density: 3300.0,
            gravitational_acceleration: 9.8,
            water_surface_elevation: 0.0,
            lake_water_density: 1000.0,
            lake_elev_tolerance: 1e-6,
            max_iterations: None,
        }
    }
}

impl LakeParams {
    /// The solver configuration these parameters describe.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of its domain.
    #[allow(clippy::cast_precision_loss)]
    pub fn config(&self) -> Result<Config, ConfigError> {
        let mut values: BTreeMap<String, f64> = [
            (keys::ELASTIC_THICKNESS, self.elastic_thickness),
            (keys::YOUNGS_MODULUS, self.youngs_modulus),
            (keys::MANTLE_DENSITY, self.mantle_density),
            (
                keys::GRAVITATIONAL_ACCELERATION,
                self.gravitational_acceleration,
            ),
            (keys::WATER_SURFACE_ELEVATION, self.water_surface_elevation),
            (keys::LAKE_WATER_DENSITY, self.lake_water_density),
            (keys::LAKE_ELEV_TOLERANCE, self.lake_elev_tolerance),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value))
        .collect();
        if let Some(max) = self.max_iterations {
            values.insert(keys::MAX_ITERATIONS.to_owned(), max as f64);
        }
        Config::from_params(&values)
    }

    /// Serializes the parameters as a YAML parameter file.
    ///
    /// # Panics
    ///
    /// Never; every field serializes.
    #[must_use]
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).expect("plain struct serializes")
    }
}

/// Installs a test logger controlled by `LAKEFLEX_LOG`.
pub fn init_logger() {
    let _ = env_logger::Builder::from_env("LAKEFLEX_LOG")
        .is_test(true)
        .try_init();
}
