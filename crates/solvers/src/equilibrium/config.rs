use std::collections::BTreeMap;

use lakeflex_core::Plate;
use thiserror::Error;
use uom::si::{
    acceleration::meter_per_second_squared,
    f64::{Acceleration, Length, MassDensity, Pressure},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
};

/// Iteration cap used when a parameter set does not name one.
pub const DEFAULT_MAX_ITERS: usize = 100;

/// Largest accepted iteration cap.
#[allow(clippy::cast_possible_truncation)]
const MAX_ITERS_LIMIT: usize = u32::MAX as usize;

/// Parameter names recognized by [`Config::from_params`].
pub mod keys {
    pub const ELASTIC_THICKNESS: &str = "elastic_thickness";
    pub const YOUNGS_MODULUS: &str = "youngs_modulus";
    pub const MANTLE_DENSITY: &str = "mantle_density";
    pub const GRAVITATIONAL_ACCELERATION: &str = "gravitational_acceleration";
    pub const WATER_SURFACE_ELEVATION: &str = "water_surface_elevation";
    pub const LAKE_WATER_DENSITY: &str = "lake_water_density";
    pub const LAKE_ELEV_TOLERANCE: &str = "lake_elev_tolerance";
    pub const MAX_ITERATIONS: &str = "max_iterations";

    /// Every numeric key, required or optional.
    pub const ALL: [&str; 8] = [
        ELASTIC_THICKNESS,
        YOUNGS_MODULUS,
        MANTLE_DENSITY,
        GRAVITATIONAL_ACCELERATION,
        WATER_SURFACE_ELEVATION,
        LAKE_WATER_DENSITY,
        LAKE_ELEV_TOLERANCE,
        MAX_ITERATIONS,
    ];
}

/// Errors that can occur when building or validating a [`Config`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing required parameter `{key}`")]
    Missing { key: &'static str },

    #[error("parameter `{key}` is not a number")]
    NotNumeric { key: String },

    #[error("parameter `{key}` must be finite and positive, got {value}")]
    NotPositive { key: &'static str, value: f64 },

    #[error("parameter `{key}` must be finite, got {value}")]
    NonFinite { key: &'static str, value: f64 },

    #[error("max_iterations must be an integer from 1 to 4294967295, got {value}")]
    MaxIters { value: f64 },
}

/// Configuration of a lake-load equilibrium run.
///
/// All dimensioned values are `uom` quantities; parameter maps handed to
/// [`Config::from_params`] are read in SI base units (m, Pa, kg/m³, m/s²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub elastic_thickness: Length,
    pub youngs_modulus: Pressure,
    pub mantle_density: MassDensity,
    pub gravitational_acceleration: Acceleration,
    /// Target lake surface elevation.
    pub water_surface_elevation: Length,
    pub lake_water_density: MassDensity,
    /// Largest accepted lake-surface misfit over wet nodes.
    pub tolerance: Length,
    /// Iterations allowed after the first evaluation.
    pub max_iters: usize,
}

impl Config {
    /// Builds a config from named SI values.
    ///
    /// `max_iterations` is optional and defaults to [`DEFAULT_MAX_ITERS`];
    /// every other key in [`keys`] is required. Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if a required key is missing or any value is out of
    /// its domain.
    pub fn from_params(params: &BTreeMap<String, f64>) -> Result<Self, ConfigError> {
        let require = |key: &'static str| {
            params
                .get(key)
                .copied()
                .ok_or(ConfigError::Missing { key })
        };

        let max_iters = match params.get(keys::MAX_ITERATIONS) {
            None => DEFAULT_MAX_ITERS,
            Some(&value) => max_iters_from(value)?,
        };

        let config = Self {
            elastic_thickness: Length::new::<meter>(require(keys::ELASTIC_THICKNESS)?),
            youngs_modulus: Pressure::new::<pascal>(require(keys::YOUNGS_MODULUS)?),
            mantle_density: MassDensity::new::<kilogram_per_cubic_meter>(require(
                keys::MANTLE_DENSITY,
            )?),
            gravitational_acceleration: Acceleration::new::<meter_per_second_squared>(require(
                keys::GRAVITATIONAL_ACCELERATION,
            )?),
            water_surface_elevation: Length::new::<meter>(require(keys::WATER_SURFACE_ELEVATION)?),
            lake_water_density: MassDensity::new::<kilogram_per_cubic_meter>(require(
                keys::LAKE_WATER_DENSITY,
            )?),
            tolerance: Length::new::<meter>(require(keys::LAKE_ELEV_TOLERANCE)?),
            max_iters,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks every value against its domain.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive(keys::ELASTIC_THICKNESS, self.elastic_thickness.get::<meter>())?;
        positive(keys::YOUNGS_MODULUS, self.youngs_modulus.get::<pascal>())?;
        positive(
            keys::MANTLE_DENSITY,
            self.mantle_density.get::<kilogram_per_cubic_meter>(),
        )?;
        positive(
            keys::GRAVITATIONAL_ACCELERATION,
            self.gravitational_acceleration
                .get::<meter_per_second_squared>(),
        )?;
        positive(
            keys::LAKE_WATER_DENSITY,
            self.lake_water_density.get::<kilogram_per_cubic_meter>(),
        )?;
        positive(keys::LAKE_ELEV_TOLERANCE, self.tolerance.get::<meter>())?;

        let wse = self.water_surface_elevation_m();
        if !wse.is_finite() {
            return Err(ConfigError::NonFinite {
                key: keys::WATER_SURFACE_ELEVATION,
                value: wse,
            });
        }

        if !(1..=MAX_ITERS_LIMIT).contains(&self.max_iters) {
            #[allow(clippy::cast_precision_loss)]
            let value = self.max_iters as f64;
            return Err(ConfigError::MaxIters { value });
        }
        Ok(())
    }

    /// The plate properties handed to the flexure kernel.
    #[must_use]
    pub fn plate(&self) -> Plate {
        Plate {
            elastic_thickness: self.elastic_thickness,
            youngs_modulus: self.youngs_modulus,
            mantle_density: self.mantle_density,
            gravity: self.gravitational_acceleration,
        }
    }

    /// Target lake surface elevation in meters.
    #[must_use]
    pub fn water_surface_elevation_m(&self) -> f64 {
        self.water_surface_elevation.get::<meter>()
    }

    /// Tolerance in meters.
    #[must_use]
    pub fn tolerance_m(&self) -> f64 {
        self.tolerance.get::<meter>()
    }

    /// Pressure exerted by one meter of lake water, `ρw g`, in Pa/m.
    #[must_use]
    pub fn water_pressure_gradient(&self) -> f64 {
        self.lake_water_density.get::<kilogram_per_cubic_meter>()
            * self
                .gravitational_acceleration
                .get::<meter_per_second_squared>()
    }
}

fn positive(key: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { key, value })
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::float_cmp
)]
fn max_iters_from(value: f64) -> Result<usize, ConfigError> {
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as usize)
    } else {
        Err(ConfigError::MaxIters { value })
    }
}
