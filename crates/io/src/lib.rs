//! File-facing pieces of lakeflex.
//!
//! - [`esri_ascii`]: read a DEM into a [`RasterGrid`] and write fields back
//! - [`params`]: YAML parameter files
//! - [`scenario`]: wires a parameter file, its DEM, an elastic plate kernel,
//!   and the equilibrium solver together
//!
//! [`RasterGrid`]: lakeflex_core::RasterGrid

pub mod esri_ascii;
pub mod params;
pub mod scenario;

pub use params::{Params, ParamsError, load_params};
pub use scenario::{Scenario, ScenarioError};
