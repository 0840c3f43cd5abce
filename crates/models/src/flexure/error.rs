use thiserror::Error;

/// Errors returned by flexure kernels.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum FlexureError {
    #[error("invalid plate: {reason}")]
    InvalidPlate { reason: &'static str },

    #[error("node spacing must be finite and positive, got dx={dx}, dy={dy}")]
    InvalidSpacing { dx: f64, dy: f64 },

    #[error("poisson ratio must lie in [0, 0.5), got {0}")]
    PoissonRatio(f64),
}
