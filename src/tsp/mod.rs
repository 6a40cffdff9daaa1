//! Exact TSP via the Miller-Tucker-Zemlin formulation.
//!
//! - [`TspModelBuilder`] turns a [`Graph`](crate::graph::Graph) into a
//!   [`TspModel`]: `n^2` binary arc variables, `n` position variables,
//!   `2n` degree constraints and `(n-1)^2` MTZ constraints
//! - [`TourDecoder`] rebuilds the [`Tour`] from the solver's arc values
//! - [`TspRunner`] chains both around a [`MilpSolver`](crate::milp::MilpSolver)

mod builder;
mod config;
mod decoder;
mod runner;

pub use builder::{TspModel, TspModelBuilder};
pub use config::TspConfig;
pub use decoder::{ArcsDisplay, Tour, TourDecoder, DEFAULT_TOLERANCE};
pub use runner::{TspOutcome, TspRunner, TspSolution};
