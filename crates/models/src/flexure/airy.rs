use lakeflex_core::{Model, PlateLoad};
use ndarray::Array2;

use super::{FlexureError, elastic::validate_plate};

/// Local (Airy) isostatic compensation.
///
/// The plate has no strength: each node sinks by `p / (ρm g)` independently
/// of its neighbors. This is the limit an [`ElasticPlate`] approaches for
/// loads much wider than its flexural parameter.
///
/// [`ElasticPlate`]: super::ElasticPlate
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalIsostasy;

impl Model for LocalIsostasy {
    type Input = PlateLoad;
    type Output = Array2<f64>;
    type Error = FlexureError;

    fn call(&self, input: &PlateLoad) -> Result<Array2<f64>, FlexureError> {
        validate_plate(&input.plate)?;
        let stiffness = input.plate.mantle_stiffness();
        Ok(input.pressure.mapv(|p| p / stiffness))
    }
}
