//! MILP solver interface.

use std::path::PathBuf;

use super::model::MilpModel;
use super::variables::VarId;
use crate::error::{TspError, TspResult};

/// Values of every model variable, indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of `var`.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Status reported by a solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// No feasible solution exists.
    Infeasible,
    /// The objective is unbounded.
    Unbounded,
    /// The engine failed internally.
    EngineError,
}

/// Outcome of a solve.
///
/// Infeasible and unbounded models are ordinary outcomes; only
/// [`SolveResult::EngineError`] signals that the engine itself failed.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveResult {
    /// Optimal objective value and the variable values achieving it.
    Optimal {
        objective: f64,
        assignment: Assignment,
    },
    Infeasible,
    Unbounded,
    /// The engine raised an internal fault.
    EngineError(String),
}

impl SolveResult {
    pub fn status(&self) -> SolverStatus {
        match self {
            SolveResult::Optimal { .. } => SolverStatus::Optimal,
            SolveResult::Infeasible => SolverStatus::Infeasible,
            SolveResult::Unbounded => SolverStatus::Unbounded,
            SolveResult::EngineError(_) => SolverStatus::EngineError,
        }
    }

    /// Whether an optimal assignment is available.
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveResult::Optimal { .. })
    }

    /// Optimal objective value, if any.
    pub fn objective(&self) -> Option<f64> {
        match self {
            SolveResult::Optimal { objective, .. } => Some(*objective),
            _ => None,
        }
    }
}

/// Solver configuration.
///
/// # Examples
///
/// ```
/// use u_tsp::milp::SolverConfig;
///
/// let config = SolverConfig::default().with_export_path("model.lp");
/// assert!(config.export_path.is_some());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// If set, the model is written here in LP format before solving.
    pub export_path: Option<PathBuf>,

    /// Largest distance from an integer accepted for integral variables
    /// in the engine's answer.
    pub integrality_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            export_path: None,
            integrality_tolerance: 1e-5,
        }
    }
}

impl SolverConfig {
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    pub fn with_integrality_tolerance(mut self, tolerance: f64) -> Self {
        self.integrality_tolerance = tolerance;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> TspResult<()> {
        if !(self.integrality_tolerance > 0.0 && self.integrality_tolerance < 0.5) {
            return Err(TspError::InvalidConfig(format!(
                "integrality_tolerance must be in (0, 0.5), got {}",
                self.integrality_tolerance
            )));
        }
        Ok(())
    }
}

/// Trait for MILP engine adapters.
///
/// A call is one blocking, self-contained session: every resource the
/// engine allocates for it is released before `solve` returns, on every
/// path.
///
/// `Err` is reserved for failures before the engine runs (invalid model
/// or configuration, failed export). Engine faults come back as
/// [`SolveResult::EngineError`].
pub trait MilpSolver {
    /// Solves the model.
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> TspResult<SolveResult>;
}
