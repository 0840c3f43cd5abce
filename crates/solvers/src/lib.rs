//! Solvers for lake-load flexure problems.
//!
//! # Modules
//!
//! - [`equilibrium`]: fixed-point iteration that finds the lake level and
//!   lithosphere deflection consistent with each other

pub mod equilibrium;
