use ndarray::Array2;

/// Emitted once per kernel evaluation, after the flexed surface is updated
/// and before the convergence check.
///
/// `water_depth` and `load` are the fields that produced `deflection`;
/// `flexed_surface` already reflects it.
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// 1-based evaluation counter within the current run.
    pub evaluation: usize,

    /// Lake-surface misfit over wet nodes, m.
    pub residual: f64,

    /// Number of nodes with positive water depth.
    pub wet_nodes: usize,

    pub water_depth: &'a Array2<f64>,
    pub load: &'a Array2<f64>,
    pub deflection: &'a Array2<f64>,
    pub flexed_surface: &'a Array2<f64>,
}

impl Event<'_> {
    /// Largest downward deflection in this evaluation, m.
    #[must_use]
    pub fn max_deflection(&self) -> f64 {
        self.deflection
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }
}
