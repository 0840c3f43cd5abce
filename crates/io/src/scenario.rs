//! End-to-end driver: parameter file and DEM in, result rasters out.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use lakeflex_core::{RasterGrid, fields};
use lakeflex_models::flexure::ElasticPlate;
use lakeflex_solvers::equilibrium::{self, Config, ConfigError, LakeFlexer, Results, SolverState};
use thiserror::Error;

use crate::{
    esri_ascii::{self, AsciiError},
    params::{self, ParamsError},
};

/// Result rasters written by [`Scenario::write_results`], by field.
pub const OUTPUTS: [(&str, &str); 3] = [
    (fields::DEFLECTION, "deflection.asc"),
    (fields::TOPOGRAPHIC_ELEVATION, "flexed_elevation.asc"),
    (fields::WATER_DEPTH, "water_depth.asc"),
];

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("parameter file does not name a `dem_filename`")]
    MissingDem,

    #[error("cannot read DEM")]
    Dem(#[source] AsciiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solver(#[from] equilibrium::Error),

    #[error("cannot create output directory `{}`", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write results")]
    Write(#[source] AsciiError),
}

/// A lake on an elastic plate, ready to run.
#[derive(Debug)]
pub struct Scenario {
    flexer: LakeFlexer<ElasticPlate>,
}

impl Scenario {
    /// Loads parameters, reads the DEM they name, and initializes a solver.
    ///
    /// A relative `dem_filename` is resolved against the parameter file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameter file or DEM cannot be read, the
    /// parameters are incomplete or invalid, or the DEM is unusable.
    pub fn from_param_file(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let params = params::load_params(path)?;
        let dem = params.dem_filename.as_ref().ok_or(ScenarioError::MissingDem)?;
        let config = Config::from_params(&params.values)?;
        let (header, grid, elevation) =
            esri_ascii::read_with_header(dem).map_err(ScenarioError::Dem)?;

        let nodata = esri_ascii::count_nodata(&header, &elevation);
        if nodata > 0 {
            log::warn!(
                "DEM {} has {nodata} NODATA cells; they are treated as elevations",
                dem.display(),
            );
        }

        log::info!(
            "loaded scenario from {}: {}x{} DEM {}, lake surface at {} m",
            path.display(),
            grid.shape().0,
            grid.shape().1,
            dem.display(),
            config.water_surface_elevation_m(),
        );
        Self::new(config, grid, &elevation)
    }

    /// Initializes a solver from values already in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the solver rejects the configuration or surface.
    pub fn new(config: Config, grid: RasterGrid, elevation: &[f64]) -> Result<Self, ScenarioError> {
        let mut flexer = LakeFlexer::new(ElasticPlate::new());
        flexer.initialize(config, grid, elevation)?;
        Ok(Self { flexer })
    }

    /// Iterates the solver to equilibrium or its iteration cap.
    ///
    /// # Errors
    ///
    /// Returns an error if the flexure kernel fails.
    pub fn run(&mut self) -> Result<SolverState, ScenarioError> {
        Ok(self.flexer.update()?)
    }

    /// The underlying solver.
    pub fn flexer(&self) -> &LakeFlexer<ElasticPlate> {
        &self.flexer
    }

    /// Writes the deflection, flexed elevation, and water depth rasters into
    /// `dir`, creating it if needed, and returns the final results.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or any raster cannot be written.
    pub fn write_results(&self, dir: impl AsRef<Path>) -> Result<Results, ScenarioError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| ScenarioError::OutputDir {
            path: dir.to_owned(),
            source,
        })?;

        let results = self.flexer.finalize()?;
        let grid = self.flexer.grid()?;
        for (field, file) in OUTPUTS {
            esri_ascii::write_esri_ascii(dir.join(file), grid, field)
                .map_err(ScenarioError::Write)?;
        }

        if let Some(warning) = results.warning() {
            log::warn!("writing unconverged results: {warning}");
        }
        log::info!("wrote results to {}", dir.display());
        Ok(results)
    }
}
