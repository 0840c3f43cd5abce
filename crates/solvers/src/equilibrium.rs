//! Load–deflection equilibrium for a lake standing on a flexible lithosphere.
//!
//! # Algorithm
//!
//! Water fills the terrain up to a fixed lake surface. Its weight deflects the
//! lithosphere, which lowers the terrain and deepens the lake, which adds
//! load. [`LakeFlexer`] resolves this coupling by fixed-point iteration:
//!
//! 1. `depth = max(0, wse − flexed)` from the current flexed surface
//! 2. `load = ρw g depth`
//! 3. `deflection = kernel(load)`
//! 4. `flexed = base − deflection`, always from the unloaded base surface
//! 5. `residual = max |wse − (flexed + depth)|` over nodes with `depth > 0`,
//!    zero when no node is wet
//!
//! The run stops as soon as `residual < tolerance` ([`Status::Converged`]).
//! Otherwise it stops after `max_iters + 1` evaluations
//! ([`Status::MaxItersExceeded`]); this is not an error, the last fields are
//! kept as a best-effort answer and a [`ConvergenceWarning`] is logged and
//! recorded in the [`SolverState`].
//!
//! # Convergence
//!
//! Each pass contracts the lake-level misfit by roughly the ratio of the
//! plate's response to its stiffness, which is at most `ρw / ρm` for a plate
//! with no strength. Typical water and mantle densities converge quickly, but
//! nothing guarantees it for arbitrary parameters, hence the cap.
//!
//! # Lifecycle
//!
//! A solver is built uninitialized around a flexure kernel, then
//! [`initialize`](LakeFlexer::initialize)d with a [`Config`] and base surface.
//! [`update`](LakeFlexer::update) may be called repeatedly; each call resets
//! the [`SolverState`] and resumes from the current flexed surface.
//!
//! # Observer Events
//!
//! [`update_observed`](LakeFlexer::update_observed) emits one [`Event`] per
//! kernel evaluation, carrying the residual and references to the fields
//! produced by that pass.

mod config;
mod error;
mod event;
mod solution;
mod state;


pub use config::{Config, ConfigError, DEFAULT_MAX_ITERS, keys};
pub use error::{ConvergenceWarning, Error};
pub use event::Event;
pub use solution::{Results, SolverState, Status};

use lakeflex_core::{Model, Observer, PlateLoad, RasterGrid, fields};
use ndarray::Array2;

use state::Scenario;

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Initialized(Box<Scenario>),
}

/// Fixed-point solver for the lake level on a flexed terrain surface.
///
/// `K` is the flexure kernel: any [`Model`] that turns a [`PlateLoad`] into a
/// deflection field of the same shape.
#[derive(Debug)]
pub struct LakeFlexer<K> {
    kernel: K,
    phase: Phase,
}

impl<K> LakeFlexer<K>
where
    K: Model<Input = PlateLoad, Output = Array2<f64>>,
{
    /// Creates an uninitialized solver around a flexure kernel.
    pub fn new(kernel: K) -> Self {
        Self {
            kernel,
            phase: Phase::Uninitialized,
        }
    }

    /// Accepts a configuration and the unloaded terrain surface.
    ///
    /// `base_surface` holds one elevation per grid node in the grid's
    /// row-major node order. The flexed surface starts equal to it and the
    /// water depth, load, and deflection fields start at zero. Calling this
    /// again replaces the previous scenario; if it fails, the solver is left
    /// as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid,
    /// [`Error::GridMismatch`] if `base_surface` does not have one value per
    /// node, or [`Error::NonFiniteSurface`] if any elevation is NaN or
    /// infinite.
    pub fn initialize(
        &mut self,
        config: Config,
        grid: RasterGrid,
        base_surface: &[f64],
    ) -> Result<(), Error> {
        let scenario = Scenario::new(config, grid, base_surface)?;
        log::debug!(
            "initialized {}x{} lake scenario, water surface at {} m",
            scenario.grid.shape().0,
            scenario.grid.shape().1,
            config.water_surface_elevation_m(),
        );
        self.phase = Phase::Initialized(Box::new(scenario));
        Ok(())
    }

    /// Iterates until the lake level converges or the iteration cap is hit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`initialize`](Self::initialize),
    /// or an error if the kernel fails or returns an unusable field.
    /// Reaching the cap is not an error.
    pub fn update(&mut self) -> Result<SolverState, Error> {
        self.update_observed(())
    }

    /// Like [`update`](Self::update), reporting every evaluation to `observer`.
    ///
    /// # Errors
    ///
    /// See [`update`](Self::update).
    pub fn update_observed<Obs>(&mut self, mut observer: Obs) -> Result<SolverState, Error>
    where
        Obs: for<'a> Observer<Event<'a>>,
    {
        let Self { kernel, phase } = self;
        let Phase::Initialized(scenario) = phase else {
            return Err(Error::NotInitialized);
        };

        scenario.state = SolverState::ready();
        let tolerance = scenario.config.tolerance_m();
        let max_evaluations = scenario.config.max_iters.saturating_add(1);

        for evaluation in 1..=max_evaluations {
            let pass = scenario.pass(&*kernel)?;
            scenario.state.evaluations = evaluation;
            scenario.state.residual = Some(pass.residual);

            let event = scenario.event(evaluation, pass)?;
            log::debug!(
                "evaluation {evaluation}: residual {:.3e} m over {} wet nodes, max deflection {:.3} m",
                pass.residual,
                pass.wet_nodes,
                event.max_deflection(),
            );
            observer.observe(&event);

            if pass.residual < tolerance {
                scenario.state.status = Status::Converged;
                log::info!(
                    "lake level converged after {evaluation} evaluations (residual {:.3e} m)",
                    pass.residual
                );
                return Ok(scenario.state);
            }
        }

        let warning = ConvergenceWarning {
            evaluations: scenario.state.evaluations,
            residual: scenario.state.residual.unwrap_or(f64::NAN),
            tolerance,
        };
        log::warn!("{warning}");
        scenario.state.status = Status::MaxItersExceeded;
        scenario.state.warning = Some(warning);
        Ok(scenario.state)
    }
}

impl<K> LakeFlexer<K> {
    /// Current lifecycle stage; never fails.
    pub fn status(&self) -> Status {
        match &self.phase {
            Phase::Uninitialized => Status::Uninitialized,
            Phase::Initialized(scenario) => scenario.state.status,
        }
    }

    /// Progress of the current or most recent run.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn state(&self) -> Result<&SolverState, Error> {
        self.scenario().map(|s| &s.state)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn config(&self) -> Result<&Config, Error> {
        self.scenario().map(|s| &s.config)
    }

    /// The grid with every field the solver maintains.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn grid(&self) -> Result<&RasterGrid, Error> {
        self.scenario().map(|s| &s.grid)
    }

    /// The unloaded terrain surface.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn base_surface(&self) -> Result<&Array2<f64>, Error> {
        self.field(fields::INITIAL_ELEVATION)
    }

    /// The terrain surface after the last deflection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn flexed_surface(&self) -> Result<&Array2<f64>, Error> {
        self.field(fields::TOPOGRAPHIC_ELEVATION)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn water_depth(&self) -> Result<&Array2<f64>, Error> {
        self.field(fields::WATER_DEPTH)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn load(&self) -> Result<&Array2<f64>, Error> {
        self.field(fields::LOAD)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn deflection(&self) -> Result<&Array2<f64>, Error> {
        self.field(fields::DEFLECTION)
    }

    /// Copies the final fields and state out for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before initialization.
    pub fn finalize(&self) -> Result<Results, Error> {
        Ok(Results {
            deflection: self.deflection()?.clone(),
            flexed_surface: self.flexed_surface()?.clone(),
            water_depth: self.water_depth()?.clone(),
            load: self.load()?.clone(),
            state: *self.state()?,
        })
    }

    fn scenario(&self) -> Result<&Scenario, Error> {
        match &self.phase {
            Phase::Uninitialized => Err(Error::NotInitialized),
            Phase::Initialized(scenario) => Ok(&**scenario),
        }
    }

    fn field(&self, name: &str) -> Result<&Array2<f64>, Error> {
        Ok(self.scenario()?.grid.field(name)?)
    }
}
