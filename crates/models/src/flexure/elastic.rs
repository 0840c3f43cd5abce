use std::{cell::RefCell, f64::consts::PI};

use lakeflex_core::{Model, Plate, PlateLoad};
use ndarray::Array2;

use super::{
    FlexureError,
    core::{DEFAULT_POISSON_RATIO, GreenTable, flexural_parameter, rigidity},
};

/// Thin elastic plate over an inviscid mantle.
///
/// Each node's load acts as a point force `p · dx · dy`, and the deflection at
/// every node is the sum of the point-force Green's functions. The Green's
/// function table depends only on grid shape, spacing, and flexural
/// parameter, so it is built on the first call and reused while those stay
/// the same.
#[derive(Debug)]
pub struct ElasticPlate {
    poisson_ratio: f64,
    table: RefCell<Option<GreenTable>>,
}

impl Default for ElasticPlate {
    fn default() -> Self {
        Self {
            poisson_ratio: DEFAULT_POISSON_RATIO,
            table: RefCell::new(None),
        }
    }
}

impl ElasticPlate {
    /// Creates a kernel with the default Poisson ratio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a kernel with a custom Poisson ratio.
    ///
    /// # Errors
    ///
    /// Returns an error unless `0 <= poisson_ratio < 0.5`.
    pub fn with_poisson_ratio(poisson_ratio: f64) -> Result<Self, FlexureError> {
        if !(0.0..0.5).contains(&poisson_ratio) {
            return Err(FlexureError::PoissonRatio(poisson_ratio));
        }
        Ok(Self {
            poisson_ratio,
            table: RefCell::new(None),
        })
    }

    /// Flexural rigidity of `plate` under this kernel's Poisson ratio, N·m.
    #[must_use]
    pub fn rigidity(&self, plate: &Plate) -> f64 {
        rigidity(
            plate.youngs_modulus_pa(),
            self.poisson_ratio,
            plate.elastic_thickness_m(),
        )
    }

    /// Flexural parameter `α` of `plate`, m.
    #[must_use]
    pub fn alpha(&self, plate: &Plate) -> f64 {
        flexural_parameter(self.rigidity(plate), plate.mantle_stiffness())
    }
}

impl Model for ElasticPlate {
    type Input = PlateLoad;
    type Output = Array2<f64>;
    type Error = FlexureError;

    fn call(&self, input: &PlateLoad) -> Result<Array2<f64>, FlexureError> {
        validate_plate(&input.plate)?;
        let spacing = input.spacing;
        if !(spacing.dx.is_finite() && spacing.dx > 0.0 && spacing.dy.is_finite() && spacing.dy > 0.0)
        {
            return Err(FlexureError::InvalidSpacing {
                dx: spacing.dx,
                dy: spacing.dy,
            });
        }

        let shape = input.pressure.dim();
        let d = self.rigidity(&input.plate);
        let alpha = flexural_parameter(d, input.plate.mantle_stiffness());

        let mut cached = self.table.borrow_mut();
        let table = match cached.take() {
            Some(table) if table.matches(shape, spacing, alpha) => table,
            _ => {
                log::debug!(
                    "building {}x{} flexure table: alpha = {alpha:.1} m, 3/4 pi alpha = {:.1} m, pi alpha = {:.1} m",
                    shape.0,
                    shape.1,
                    0.75 * PI * alpha,
                    PI * alpha,
                );
                GreenTable::build(shape, spacing, d, alpha)
            }
        };
        let deflection = table.superpose(&input.pressure);
        *cached = Some(table);

        Ok(deflection)
    }
}

pub(super) fn validate_plate(plate: &Plate) -> Result<(), FlexureError> {
    let positive = |v: f64| v.is_finite() && v > 0.0;

    if !positive(plate.elastic_thickness_m()) {
        return Err(FlexureError::InvalidPlate {
            reason: "elastic thickness must be finite and positive",
        });
    }
    if !positive(plate.youngs_modulus_pa()) {
        return Err(FlexureError::InvalidPlate {
            reason: "youngs modulus must be finite and positive",
        });
    }
    if !positive(plate.mantle_stiffness()) {
        return Err(FlexureError::InvalidPlate {
            reason: "mantle density and gravity must be finite and positive",
        });
    }
    Ok(())
}
