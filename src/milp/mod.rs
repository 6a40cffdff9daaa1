//! Mixed Integer Linear Programming (MILP) layer.
//!
//! # Key Components
//!
//! - **Variables**: [`Variable`], [`VarId`], [`VarKind`]: binary, integer and
//!   continuous decision variables
//! - **Model**: [`MilpModel`]: container for variables, [`Constraint`]s and
//!   an [`Objective`], exportable as LP text
//! - **Solver**: [`MilpSolver`] trait, implemented by [`MicrolpSolver`]
//!
//! # Design
//!
//! The model is engine-agnostic. Solving is delegated to an external engine
//! through [`MilpSolver`]; the engine reports a [`SolveResult`] that callers
//! pattern-match instead of catching failures.

mod engine;
mod lp_format;
mod model;
mod solver;
mod variables;

pub use engine::MicrolpSolver;
pub use model::{ComparisonOp, Constraint, LinearExpr, MilpModel, Objective, Sense};
pub use solver::{Assignment, MilpSolver, SolveResult, SolverConfig, SolverStatus};
pub use variables::{VarId, VarKind, Variable};
