use std::collections::BTreeMap;

use ndarray::Array2;
use thiserror::Error;

/// Standard field names used across the workspace.
pub mod fields {
    /// Current (flexed) land-surface elevation, m.
    pub const TOPOGRAPHIC_ELEVATION: &str = "topographic__elevation";

    /// Land-surface elevation before any lake load was applied, m.
    pub const INITIAL_ELEVATION: &str = "topographic__initial_elevation";

    /// Depth of standing lake water, m.
    pub const WATER_DEPTH: &str = "lake_water__depth";

    /// Pressure applied to the top of the lithosphere, Pa.
    pub const LOAD: &str = "lithosphere__overlying_pressure_increment";

    /// Downward displacement of the lithosphere surface, m.
    pub const DEFLECTION: &str = "lithosphere_surface__elevation_increment";
}

/// Errors raised by [`RasterGrid`] construction and field access.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyShape { rows: usize, cols: usize },

    #[error("a {rows}x{cols} grid has more nodes than can be addressed")]
    TooLarge { rows: usize, cols: usize },

    #[error("node spacing must be finite and positive, got dx={dx}, dy={dy}")]
    InvalidSpacing { dx: f64, dy: f64 },

    #[error("field `{name}` does not exist")]
    Missing { name: String },

    #[error("field `{name}` already exists")]
    Duplicate { name: String },

    #[error("field `{name}` has {found} values but the grid has {expected} nodes")]
    SizeMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Distance between adjacent nodes, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    /// Spacing between columns (along x).
    pub dx: f64,
    /// Spacing between rows (along y).
    pub dy: f64,
}

impl Spacing {
    /// Spacing with equal node distance along both axes.
    #[must_use]
    pub fn uniform(d: f64) -> Self {
        Self { dx: d, dy: d }
    }

    /// Area represented by a single node.
    #[must_use]
    pub fn cell_area(&self) -> f64 {
        self.dx * self.dy
    }

    fn is_valid(&self) -> bool {
        self.dx.is_finite() && self.dx > 0.0 && self.dy.is_finite() && self.dy > 0.0
    }
}

/// A regular raster of nodes with named per-node scalar fields.
///
/// Node `[row, col]` sits at `x = x0 + col * dx`, `y = y0 + row * dy`, so row
/// zero is the southern edge of the raster. Fields are stored as
/// `Array2<f64>` with the grid's shape; the flat node ordering used by
/// [`add_field`](Self::add_field) is row-major in the same orientation.
#[derive(Debug, Clone)]
pub struct RasterGrid {
    rows: usize,
    cols: usize,
    spacing: Spacing,
    origin: [f64; 2],
    at_node: BTreeMap<String, Array2<f64>>,
}

impl RasterGrid {
    /// Creates an empty grid of `(rows, cols)` nodes with its origin at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero, the node count overflows
    /// `usize`, or the spacing is not finite and positive.
    pub fn new(shape: (usize, usize), spacing: Spacing) -> Result<Self, GridError> {
        let (rows, cols) = shape;
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyShape { rows, cols });
        }
        if rows.checked_mul(cols).is_none() {
            return Err(GridError::TooLarge { rows, cols });
        }
        if !spacing.is_valid() {
            return Err(GridError::InvalidSpacing {
                dx: spacing.dx,
                dy: spacing.dy,
            });
        }

        Ok(Self {
            rows,
            cols,
            spacing,
            origin: [0.0, 0.0],
            at_node: BTreeMap::new(),
        })
    }

    /// Moves node `[0, 0]` to `(x0, y0)`.
    #[must_use]
    pub fn with_origin(mut self, x0: f64, y0: f64) -> Self {
        self.origin = [x0, y0];
        self
    }

    /// Returns `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.rows * self.cols
    }

    #[must_use]
    pub fn spacing(&self) -> Spacing {
        self.spacing
    }

    /// Coordinates of node `[0, 0]`.
    #[must_use]
    pub fn origin(&self) -> [f64; 2] {
        self.origin
    }

    /// x coordinate of every node in column `col`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn x_of_col(&self, col: usize) -> f64 {
        self.origin[0] + col as f64 * self.spacing.dx
    }

    /// Adds a zero-filled field and returns it for writing.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Duplicate`] if the field already exists.
    pub fn add_zeros(&mut self, name: &str) -> Result<&mut Array2<f64>, GridError> {
        let zeros = Array2::zeros(self.shape());
        self.insert_new(name, zeros)
    }

    /// Adds a field from node-ordered values.
    ///
    /// # Errors
    ///
    /// Returns an error if the field already exists or `values` does not have
    /// one entry per node.
    pub fn add_field(&mut self, name: &str, values: Vec<f64>) -> Result<&mut Array2<f64>, GridError> {
        let array = self.shape_values(name, values)?;
        self.insert_new(name, array)
    }

    /// Inserts or replaces a field.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::SizeMismatch`] if the array shape differs from the
    /// grid shape.
    pub fn set_field(&mut self, name: &str, values: Array2<f64>) -> Result<(), GridError> {
        if values.dim() != self.shape() {
            return Err(GridError::SizeMismatch {
                name: name.to_owned(),
                expected: self.node_count(),
                found: values.len(),
            });
        }
        self.at_node.insert(name.to_owned(), values);
        Ok(())
    }

    /// Returns a field by name.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Missing`] if no such field exists.
    pub fn field(&self, name: &str) -> Result<&Array2<f64>, GridError> {
        self.at_node.get(name).ok_or_else(|| GridError::Missing {
            name: name.to_owned(),
        })
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.at_node.contains_key(name)
    }

    fn shape_values(&self, name: &str, values: Vec<f64>) -> Result<Array2<f64>, GridError> {
        let found = values.len();
        let mismatch = || GridError::SizeMismatch {
            name: name.to_owned(),
            expected: self.node_count(),
            found,
        };
        if found != self.node_count() {
            return Err(mismatch());
        }
        Array2::from_shape_vec(self.shape(), values).map_err(|_| mismatch())
    }

    fn insert_new(&mut self, name: &str, values: Array2<f64>) -> Result<&mut Array2<f64>, GridError> {
        use std::collections::btree_map::Entry;

        match self.at_node.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(GridError::Duplicate {
                name: name.to_owned(),
            }),
            Entry::Vacant(slot) => Ok(slot.insert(values)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn grid_3x4() -> RasterGrid {
        RasterGrid::new((3, 4), Spacing { dx: 10.0, dy: 20.0 }).unwrap()
    }

    #[test]
    fn reports_shape_and_node_count() {
        let grid = grid_3x4();
        assert_eq!(grid.shape(), (3, 4));
        assert_eq!(grid.node_count(), 12);
        assert_relative_eq!(grid.spacing().cell_area(), 200.0);
    }

    #[test]
    fn rejects_empty_oversized_and_bad_spacing() {
        assert!(matches!(
            RasterGrid::new((0, 4), Spacing::uniform(1.0)),
            Err(GridError::EmptyShape { rows: 0, cols: 4 })
        ));
        assert!(matches!(
            RasterGrid::new((usize::MAX, 2), Spacing::uniform(1.0)),
            Err(GridError::TooLarge { .. })
        ));
        assert!(matches!(
            RasterGrid::new((2, 2), Spacing { dx: 1.0, dy: -1.0 }),
            Err(GridError::InvalidSpacing { .. })
        ));
        assert!(matches!(
            RasterGrid::new((2, 2), Spacing::uniform(f64::NAN)),
            Err(GridError::InvalidSpacing { .. })
        ));
    }

    #[test]
    fn node_coordinates_follow_origin_and_spacing() {
        let grid = grid_3x4().with_origin(100.0, -50.0);
        assert_relative_eq!(grid.x_of_col(0), 100.0);
        assert_relative_eq!(grid.x_of_col(3), 130.0);
    }

    #[test]
    fn add_field_is_row_major_from_the_south() {
        let mut grid = grid_3x4();
        let values: Vec<f64> = (0..12).map(f64::from).collect();
        grid.add_field("z", values).unwrap();

        let z = grid.field("z").unwrap();
        assert_relative_eq!(z[[0, 0]], 0.0);
        assert_relative_eq!(z[[0, 3]], 3.0);
        assert_relative_eq!(z[[1, 0]], 4.0);
        assert_relative_eq!(z[[2, 3]], 11.0);
    }

    #[test]
    fn add_field_checks_node_count() {
        let mut grid = grid_3x4();
        let err = grid.add_field("z", vec![0.0; 11]).unwrap_err();
        assert_eq!(
            err,
            GridError::SizeMismatch {
                name: "z".into(),
                expected: 12,
                found: 11
            }
        );
        assert!(!grid.has_field("z"));
    }

    #[test]
    fn duplicate_fields_are_rejected_but_set_field_replaces() {
        let mut grid = grid_3x4();
        grid.add_zeros(fields::LOAD).unwrap();
        assert!(matches!(
            grid.add_zeros(fields::LOAD),
            Err(GridError::Duplicate { .. })
        ));

        grid.set_field(fields::LOAD, Array2::from_elem((3, 4), 2.5))
            .unwrap();
        assert_relative_eq!(grid.field(fields::LOAD).unwrap()[[1, 1]], 2.5);

        assert!(grid.set_field(fields::LOAD, Array2::zeros((4, 3))).is_err());
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let grid = grid_3x4();
        assert_eq!(
            grid.field("nope").unwrap_err(),
            GridError::Missing {
                name: "nope".into()
            }
        );
    }
}
