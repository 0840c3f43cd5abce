use std::error::Error as StdError;

use lakeflex_core::GridError;
use thiserror::Error;

use super::ConfigError;

/// Errors that can occur while setting up or running the equilibrium solver.
#[derive(Debug, Error)]
pub enum Error {
    #[error("solver must be initialized before use")]
    NotInitialized,

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("base surface has {found} values but the grid has {expected} nodes")]
    GridMismatch { expected: usize, found: usize },

    #[error("base surface value {value} at node {node} is not finite")]
    NonFiniteSurface { node: usize, value: f64 },

    #[error("flexure kernel failed")]
    Kernel(#[source] Box<dyn StdError + Send + Sync>),

    #[error("kernel returned a {found:?} deflection field for a {expected:?} grid")]
    DeflectionShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("kernel returned non-finite deflection {value} at node {node:?}")]
    NonFiniteDeflection { node: (usize, usize), value: f64 },

    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Non-fatal report that a run stopped at its iteration cap.
///
/// The fields left in the grid are the last computed ones and remain usable
/// as an approximate equilibrium.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
#[error(
    "lake level did not converge after {evaluations} evaluations: residual {residual} m exceeds tolerance {tolerance} m"
)]
pub struct ConvergenceWarning {
    pub evaluations: usize,
    pub residual: f64,
    pub tolerance: f64,
}
