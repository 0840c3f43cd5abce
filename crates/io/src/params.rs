//! YAML parameter files.
//!
//! A parameter file is a flat mapping of names to values:
//!
//! ```yaml
//! dem_filename: dem.asc
//! elastic_thickness: 10000.0
//! youngs_modulus: 7.0e10
//! mantle_density: 3300.0
//! gravitational_acceleration: 9.8
//! water_surface_elevation: 0.0
//! lake_water_density: 1000.0
//! lake_elev_tolerance: 0.001
//! ```
//!
//! Numeric values are handed to
//! [`Config::from_params`](lakeflex_solvers::equilibrium::Config::from_params).

use std::{
    collections::BTreeMap,
    fs,
    io,
    path::{Path, PathBuf},
};

use lakeflex_solvers::equilibrium::{ConfigError, keys};
use serde::Deserialize;
use serde_yaml::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("cannot read parameter file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid parameter file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Parsed contents of a parameter file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    /// Location of the DEM. Relative paths are resolved against the parameter
    /// file's directory by [`load_params`].
    pub dem_filename: Option<PathBuf>,

    /// Every numeric parameter, keyed by name.
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct RawParams {
    dem_filename: Option<PathBuf>,
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

/// Reads a parameter file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not a YAML mapping, or
/// gives a non-numeric value for a numeric parameter.
pub fn load_params(path: impl AsRef<Path>) -> Result<Params, ParamsError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ParamsError::Io {
        path: path.to_owned(),
        source,
    })?;

    let mut params = parse_params(&text)?;
    params.dem_filename = params.dem_filename.take().map(|dem| match path.parent() {
        Some(dir) if dem.is_relative() => dir.join(dem),
        _ => dem,
    });
    log::debug!(
        "loaded {} parameters from {}",
        params.values.len(),
        path.display()
    );
    Ok(params)
}

/// Parses parameter text without resolving the DEM path.
///
/// # Errors
///
/// See [`load_params`].
pub fn parse_params(text: &str) -> Result<Params, ParamsError> {
    let raw: RawParams = serde_yaml::from_str(text)?;

    let mut values = BTreeMap::new();
    for (key, value) in raw.values {
        match number(&value) {
            Some(number) => {
                values.insert(key, number);
            }
            None if keys::ALL.contains(&key.as_str()) => {
                return Err(ConfigError::NotNumeric { key }.into());
            }
            None => log::debug!("ignoring non-numeric parameter `{key}`"),
        }
    }

    Ok(Params {
        dem_filename: raw.dem_filename,
        values,
    })
}

/// Numbers, and strings that spell one.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
