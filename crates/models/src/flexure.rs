//! Flexure kernels: surface load in, lithosphere deflection out.
//!
//! Every kernel implements [`Model`] with a [`PlateLoad`] input (pressure per
//! node in Pa, node spacing, plate properties) and returns an `Array2<f64>` of
//! deflections in meters with the same shape as the load. Positive
//! deflection is subsidence.
//!
//! # Kernels
//!
//! - [`ElasticPlate`]: thin elastic plate over an inviscid mantle; each loaded
//!   node is treated as a point force and the Green's functions are summed.
//! - [`LocalIsostasy`]: Airy compensation, every node sinks independently by
//!   `p / (ρm g)`.
//!
//! The helpers [`rigidity`] and [`flexural_parameter`] expose the plate
//! quantities both kernels are built on.
//!
//! [`Model`]: lakeflex_core::Model
//! [`PlateLoad`]: lakeflex_core::PlateLoad

mod airy;
mod core;
mod elastic;
mod error;

pub use airy::LocalIsostasy;
pub use self::core::{DEFAULT_POISSON_RATIO, flexural_parameter, kei, rigidity};
pub use elastic::ElasticPlate;
pub use error::FlexureError;
