use ndarray::Array2;

use super::ConvergenceWarning;

/// Lifecycle of a [`LakeFlexer`](super::LakeFlexer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No configuration or surface has been accepted yet.
    Uninitialized,

    /// Initialized; no run has finished since.
    Ready,

    /// The last run met the tolerance.
    Converged,

    /// The last run stopped at the iteration cap with a best-effort result.
    MaxItersExceeded,
}

/// Progress of the current or most recent run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverState {
    pub status: Status,

    /// Kernel evaluations performed by the last run.
    pub evaluations: usize,

    /// Largest lake-surface misfit over wet nodes after the last evaluation.
    ///
    /// `None` until the first evaluation of a run completes; `Some(0.0)` when
    /// no node was wet.
    pub residual: Option<f64>,

    /// Set when the run ended at the iteration cap.
    pub warning: Option<ConvergenceWarning>,
}

impl SolverState {
    pub(super) fn ready() -> Self {
        Self {
            status: Status::Ready,
            evaluations: 0,
            residual: None,
            warning: None,
        }
    }

    /// Returns true if the last run met the tolerance.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == Status::Converged
    }
}

/// Fields and state copied out of a solver for persistence.
#[derive(Debug, Clone)]
pub struct Results {
    /// Downward deflection in meters.
    pub deflection: Array2<f64>,

    /// Base surface minus deflection.
    pub flexed_surface: Array2<f64>,

    /// Lake depth used to compute the final load.
    pub water_depth: Array2<f64>,

    /// Final load in pascals.
    pub load: Array2<f64>,

    pub state: SolverState,
}

impl Results {
    /// The non-fatal convergence warning, if the run hit its cap.
    #[must_use]
    pub fn warning(&self) -> Option<&ConvergenceWarning> {
        self.state.warning.as_ref()
    }
}
