//! Euclidean graphs.
//!
//! A [`Graph`] is an immutable complete graph over points in a square,
//! with a symmetric cost matrix and a self-arc sentinel on the diagonal.
//! [`GraphGenerator`] samples one from a [`GraphConfig`].

mod config;
mod generator;
mod types;

pub use config::{GraphConfig, SamplingRegion, DEFAULT_SENTINEL_FACTOR};
pub use generator::GraphGenerator;
pub use types::{Graph, Point};
