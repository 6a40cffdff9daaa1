//! Exact Euclidean TSP through mixed integer linear programming.
//!
//! Provides the pieces of an MTZ-based TSP pipeline:
//!
//! - **Graphs**: random Euclidean instances with symmetric cost matrices
//!   and a self-arc sentinel ([`graph`]).
//! - **MILP modeling**: an engine-agnostic model of variables, linear
//!   constraints and a linear objective, with LP-format export, plus a
//!   solver trait and a `microlp`-backed adapter ([`milp`]).
//! - **TSP**: the Miller-Tucker-Zemlin formulation, tour decoding, and a
//!   runner tying them together ([`tsp`]).
//!
//! # Example
//!
//! ```
//! use u_tsp::graph::GraphConfig;
//! use u_tsp::tsp::{TspConfig, TspRunner};
//!
//! let graph_config = GraphConfig::default().with_nodes(5).with_seed(42);
//! let (graph, outcome) = TspRunner::generate_and_run(&graph_config, &TspConfig::default()).unwrap();
//! let solution = outcome.solution().unwrap();
//! assert_eq!(solution.tour.len(), graph.size());
//! println!("{}", solution.tour);
//! ```
//!
//! # Architecture
//!
//! Data flows one way: graph generation, model building, solving,
//! decoding. Solving itself is delegated to an external engine; this
//! crate only defines what is sent to it and what comes back.

pub mod error;
pub mod graph;
pub mod milp;
pub mod tsp;

pub use error::{DecodeError, TspError, TspResult};
