use lakeflex_core::{Model, PlateLoad, RasterGrid, fields};
use ndarray::{Array2, Zip};

use super::{Config, Error, Event, SolverState};

/// An initialized run: configuration, grid with its fields, and progress.
#[derive(Debug)]
pub(super) struct Scenario {
    pub(super) config: Config,
    pub(super) grid: RasterGrid,
    pub(super) state: SolverState,
}

/// Outcome of a single load–deflection pass.
#[derive(Debug, Clone, Copy)]
pub(super) struct Pass {
    pub(super) residual: f64,
    pub(super) wet_nodes: usize,
}

impl Scenario {
    pub(super) fn new(
        config: Config,
        mut grid: RasterGrid,
        base_surface: &[f64],
    ) -> Result<Self, Error> {
        config.validate()?;

        let expected = grid.node_count();
        let mismatch = || Error::GridMismatch {
            expected,
            found: base_surface.len(),
        };
        if base_surface.len() != expected {
            return Err(mismatch());
        }
        if let Some((node, &value)) = base_surface
            .iter()
            .enumerate()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(Error::NonFiniteSurface { node, value });
        }

        let shape = grid.shape();
        let base = Array2::from_shape_vec(shape, base_surface.to_vec()).map_err(|_| mismatch())?;
        grid.set_field(fields::INITIAL_ELEVATION, base.clone())?;
        grid.set_field(fields::TOPOGRAPHIC_ELEVATION, base)?;
        for name in [fields::WATER_DEPTH, fields::LOAD, fields::DEFLECTION] {
            grid.set_field(name, Array2::zeros(shape))?;
        }

        Ok(Self {
            config,
            grid,
            state: SolverState::ready(),
        })
    }

    /// Loads the current flexed surface, deflects the base surface, and
    /// measures how far the lake level moved on wet nodes.
    pub(super) fn pass<K>(&mut self, kernel: &K) -> Result<Pass, Error>
    where
        K: Model<Input = PlateLoad, Output = Array2<f64>>,
    {
        let wse = self.config.water_surface_elevation_m();
        let gradient = self.config.water_pressure_gradient();
        let shape = self.grid.shape();

        let depth = self
            .grid
            .field(fields::TOPOGRAPHIC_ELEVATION)?
            .mapv(|z| (wse - z).max(0.0));

        let input = PlateLoad {
            pressure: depth.mapv(|d| gradient * d),
            spacing: self.grid.spacing(),
            plate: self.config.plate(),
        };
        let deflection = kernel
            .call(&input)
            .map_err(|error| Error::Kernel(Box::new(error)))?;

        if deflection.dim() != shape {
            return Err(Error::DeflectionShape {
                expected: shape,
                found: deflection.dim(),
            });
        }
        if let Some((node, &value)) = deflection
            .indexed_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(Error::NonFiniteDeflection { node, value });
        }

        // Always measured from the unloaded surface so no drift accumulates.
        let flexed = self.grid.field(fields::INITIAL_ELEVATION)? - &deflection;
        let (residual, wet_nodes) = lake_residual(wse, &depth, &flexed);

        self.grid.set_field(fields::WATER_DEPTH, depth)?;
        self.grid.set_field(fields::LOAD, input.pressure)?;
        self.grid.set_field(fields::DEFLECTION, deflection)?;
        self.grid.set_field(fields::TOPOGRAPHIC_ELEVATION, flexed)?;

        Ok(Pass {
            residual,
            wet_nodes,
        })
    }

    /// Builds the observer event for the pass that just completed.
    pub(super) fn event(&self, evaluation: usize, pass: Pass) -> Result<Event<'_>, Error> {
        Ok(Event {
            evaluation,
            residual: pass.residual,
            wet_nodes: pass.wet_nodes,
            water_depth: self.grid.field(fields::WATER_DEPTH)?,
            load: self.grid.field(fields::LOAD)?,
            deflection: self.grid.field(fields::DEFLECTION)?,
            flexed_surface: self.grid.field(fields::TOPOGRAPHIC_ELEVATION)?,
        })
    }
}

/// Largest `|wse − (flexed + depth)|` over nodes that carried water, and the
/// number of such nodes. Zero when nothing is wet.
fn lake_residual(wse: f64, depth: &Array2<f64>, flexed: &Array2<f64>) -> (f64, usize) {
    let mut residual = 0.0_f64;
    let mut wet_nodes = 0;

    Zip::from(depth).and(flexed).for_each(|&d, &z| {
        if d > 0.0 {
            wet_nodes += 1;
            residual = residual.max((wse - (z + d)).abs());
        }
    });

    (residual, wet_nodes)
}
