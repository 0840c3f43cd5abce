use ndarray::Array2;
use uom::si::{
    acceleration::meter_per_second_squared,
    f64::{Acceleration, Length, MassDensity, Pressure},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    pressure::pascal,
};

use crate::Spacing;

/// Elastic and physical properties of a lithospheric plate over a fluid mantle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plate {
    pub elastic_thickness: Length,
    pub youngs_modulus: Pressure,
    pub mantle_density: MassDensity,
    pub gravity: Acceleration,
}

impl Plate {
    /// Elastic thickness in meters.
    #[must_use]
    pub fn elastic_thickness_m(&self) -> f64 {
        self.elastic_thickness.get::<meter>()
    }

    /// Young's modulus in pascals.
    #[must_use]
    pub fn youngs_modulus_pa(&self) -> f64 {
        self.youngs_modulus.get::<pascal>()
    }

    /// Restoring pressure per meter of deflection, `ρm g`, in Pa/m.
    #[must_use]
    pub fn mantle_stiffness(&self) -> f64 {
        self.mantle_density.get::<kilogram_per_cubic_meter>()
            * self.gravity.get::<meter_per_second_squared>()
    }
}

/// Input handed to a flexure kernel.
///
/// `pressure` holds the load at each node in pascals, laid out like the
/// fields of the [`RasterGrid`](crate::RasterGrid) it came from.
#[derive(Debug, Clone)]
pub struct PlateLoad {
    pub pressure: Array2<f64>,
    pub spacing: Spacing,
    pub plate: Plate,
}
