mod kelvin;

use std::f64::consts::PI;

use lakeflex_core::Spacing;
use ndarray::Array2;

pub use kelvin::kei;

/// Poisson ratio assumed for the lithosphere unless a kernel overrides it.
pub const DEFAULT_POISSON_RATIO: f64 = 0.25;

/// Flexural rigidity `D = E Te³ / (12 (1 − ν²))`, in N·m.
#[must_use]
pub fn rigidity(youngs_modulus_pa: f64, poisson_ratio: f64, elastic_thickness_m: f64) -> f64 {
    youngs_modulus_pa * elastic_thickness_m.powi(3) / (12.0 * (1.0 - poisson_ratio * poisson_ratio))
}

/// Flexural parameter of a 2-D plate, `α = (D / (ρm g))^(1/4)`, in meters.
///
/// `mantle_stiffness` is the restoring pressure per meter of deflection,
/// `ρm g`.
#[must_use]
pub fn flexural_parameter(rigidity: f64, mantle_stiffness: f64) -> f64 {
    (rigidity / mantle_stiffness).powf(0.25)
}

/// Deflection per unit point force at every node offset of a raster.
///
/// A point force `P` deflects the plate at distance `r` by
/// `w(r) = −P α² / (2π D) · kei(r / α)`. The table stores `w / P` indexed by
/// `[|Δrow|, |Δcol|]`, so one table serves every load position on a grid of
/// the same shape.
#[derive(Debug, Clone)]
pub(super) struct GreenTable {
    spacing: Spacing,
    alpha: f64,
    response: Array2<f64>,
}

impl GreenTable {
    pub(super) fn build(shape: (usize, usize), spacing: Spacing, rigidity: f64, alpha: f64) -> Self {
        let scale = -alpha * alpha / (2.0 * PI * rigidity);

        #[allow(clippy::cast_precision_loss)]
        let response = Array2::from_shape_fn(shape, |(drow, dcol)| {
            let dy = drow as f64 * spacing.dy;
            let dx = dcol as f64 * spacing.dx;
            scale * kei(dx.hypot(dy) / alpha)
        });

        Self {
            spacing,
            alpha,
            response,
        }
    }

    /// Returns true if the table was built for this grid and plate.
    #[allow(clippy::float_cmp)]
    pub(super) fn matches(&self, shape: (usize, usize), spacing: Spacing, alpha: f64) -> bool {
        self.response.dim() == shape && self.spacing == spacing && self.alpha == alpha
    }

    /// Sums the point-force responses of every loaded node.
    #[allow(clippy::float_cmp)]
    pub(super) fn superpose(&self, pressure: &Array2<f64>) -> Array2<f64> {
        let cell_area = self.spacing.cell_area();
        let mut deflection = Array2::zeros(pressure.dim());

        for ((row, col), &p) in pressure.indexed_iter() {
            if p == 0.0 {
                continue;
            }
            let force = p * cell_area;
            for ((i, j), w) in deflection.indexed_iter_mut() {
                *w += force * self.response[[i.abs_diff(row), j.abs_diff(col)]];
            }
        }

        deflection
    }
}
