//! TSP solve configuration.

use super::decoder::DEFAULT_TOLERANCE;
use crate::error::{TspError, TspResult};
use crate::milp::SolverConfig;

/// Configuration for [`TspRunner`](super::TspRunner).
///
/// # Examples
///
/// ```
/// use u_tsp::milp::SolverConfig;
/// use u_tsp::tsp::TspConfig;
///
/// let config = TspConfig::default()
///     .with_solver(SolverConfig::default().with_export_path("model.lp"))
///     .with_decode_tolerance(1e-3)
///     .with_self_arcs_forbidden(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct TspConfig {
    /// Passed through to the MILP solver.
    pub solver: SolverConfig,

    /// How close to 1 an arc value must be to count as selected.
    pub decode_tolerance: f64,

    /// Bound self-arc variables to 0 in the model.
    pub forbid_self_arcs: bool,
}

impl Default for TspConfig {
    fn default() -> Self {
        Self {
            solver: SolverConfig::default(),
            decode_tolerance: DEFAULT_TOLERANCE,
            forbid_self_arcs: false,
        }
    }
}

impl TspConfig {
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_decode_tolerance(mut self, tolerance: f64) -> Self {
        self.decode_tolerance = tolerance;
        self
    }

    pub fn with_self_arcs_forbidden(mut self, forbid: bool) -> Self {
        self.forbid_self_arcs = forbid;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        if !(self.decode_tolerance > 0.0 && self.decode_tolerance < 0.5) {
            return Err(TspError::InvalidConfig(format!(
                "decode_tolerance must be in (0, 0.5), got {}",
                self.decode_tolerance
            )));
        }
        self.solver.validate()
    }
}
