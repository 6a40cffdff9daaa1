//! End-to-end TSP solve: model building, solving and decoding.
//!
//! # Flow
//!
//! 1. Build the MTZ model for the graph
//! 2. Hand it to a [`MilpSolver`] as one blocking call
//! 3. On an optimal answer, decode the `x` matrix into a [`Tour`]
//!
//! Infeasible and unbounded answers are returned as outcomes. Engine
//! faults and malformed assignments are errors. Nothing is retried.

use std::time::Instant;

use log::{info, warn};

use super::builder::TspModelBuilder;
use super::config::TspConfig;
use super::decoder::{Tour, TourDecoder};
use crate::error::{TspError, TspResult};
use crate::graph::{Graph, GraphConfig, GraphGenerator};
use crate::milp::{MicrolpSolver, MilpSolver, SolveResult};

/// An optimal tour.
#[derive(Debug, Clone)]
pub struct TspSolution {
    /// The decoded tour, starting at node 0.
    pub tour: Tour,
    /// Objective value reported by the solver.
    pub objective: f64,
    /// Wall time spent in the solver, in milliseconds.
    pub solve_time_ms: u64,
}

/// Result of a TSP solve.
#[derive(Debug, Clone)]
pub enum TspOutcome {
    Solved(TspSolution),
    /// The solver proved the model infeasible.
    Infeasible,
    /// The solver reported an unbounded objective.
    Unbounded,
}

impl TspOutcome {
    pub fn solution(&self) -> Option<&TspSolution> {
        match self {
            TspOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, TspOutcome::Solved(_))
    }
}

/// Solves TSP instances exactly through a MILP solver.
pub struct TspRunner;

impl TspRunner {
    /// Solves `graph` with `solver`.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{Graph, Point};
    /// use u_tsp::milp::MicrolpSolver;
    /// use u_tsp::tsp::{TspConfig, TspRunner};
    ///
    /// let graph = Graph::from_points(
    ///     vec![Point::new(0.0, 0.0), Point::new(0.0, 2.0), Point::new(2.0, 0.0)],
    ///     2.0,
    /// ).unwrap();
    /// let outcome = TspRunner::run(&graph, &MicrolpSolver::new(), &TspConfig::default()).unwrap();
    /// let solution = outcome.solution().unwrap();
    /// assert_eq!(solution.tour.len(), 3);
    /// ```
    pub fn run<S: MilpSolver + ?Sized>(
        graph: &Graph,
        solver: &S,
        config: &TspConfig,
    ) -> TspResult<TspOutcome> {
        config.validate()?;

        let tsp = TspModelBuilder::new()
            .with_self_arcs_forbidden(config.forbid_self_arcs)
            .build(graph)?;

        let start = Instant::now();
        let result = solver.solve(tsp.model(), &config.solver)?;
        let solve_time_ms = start.elapsed().as_millis() as u64;

        match result {
            SolveResult::Optimal {
                objective,
                assignment,
            } => {
                let arcs = tsp.arc_values(&assignment)?;
                let tour = TourDecoder::new()
                    .with_tolerance(config.decode_tolerance)
                    .decode(&arcs, tsp.size())?;
                info!(
                    "solved {}-node tour: objective {objective:.4}, {solve_time_ms} ms",
                    tsp.size()
                );
                Ok(TspOutcome::Solved(TspSolution {
                    tour,
                    objective,
                    solve_time_ms,
                }))
            }
            SolveResult::Infeasible => {
                warn!("model {} is infeasible", tsp.model().name);
                Ok(TspOutcome::Infeasible)
            }
            SolveResult::Unbounded => {
                warn!("model {} is unbounded", tsp.model().name);
                Ok(TspOutcome::Unbounded)
            }
            SolveResult::EngineError(msg) => Err(TspError::Engine(msg)),
        }
    }

    /// Generates a graph from `graph_config` and solves it with
    /// [`MicrolpSolver`].
    pub fn generate_and_run(
        graph_config: &GraphConfig,
        config: &TspConfig,
    ) -> TspResult<(Graph, TspOutcome)> {
        let graph = GraphGenerator::generate(graph_config)?;
        let outcome = Self::run(&graph, &MicrolpSolver::new(), config)?;
        Ok((graph, outcome))
    }
}
