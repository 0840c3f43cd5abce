//! Core traits and types for lake-load flexure modeling.
//!
//! This crate defines the shared abstractions that kernels, solvers, and I/O
//! build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Observer`]: receives solver events for monitoring
//! - [`RasterGrid`]: a regular raster of nodes carrying named scalar fields
//! - [`Plate`], [`PlateLoad`]: elastic plate properties and the load record
//!   handed to a flexure kernel

mod grid;
mod model;
mod observer;
mod plate;

pub use grid::{GridError, RasterGrid, Spacing, fields};
pub use model::Model;
pub use observer::Observer;
pub use plate::{Plate, PlateLoad};
