//! Random Euclidean graph generation.

use log::debug;
use rand::Rng;
use u_numflow::random::create_rng;

use super::config::{GraphConfig, SamplingRegion};
use super::types::{Graph, Point};
use crate::error::TspResult;

/// Generates random Euclidean graphs.
pub struct GraphGenerator;

impl GraphGenerator {
    /// Samples `config.n_nodes` points uniformly in the configured square
    /// and builds their cost matrix.
    ///
    /// With `config.seed` set the output is bit-identical across calls.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::graph::{GraphConfig, GraphGenerator};
    ///
    /// let config = GraphConfig::default().with_nodes(5).with_seed(1);
    /// let a = GraphGenerator::generate(&config).unwrap();
    /// let b = GraphGenerator::generate(&config).unwrap();
    /// assert_eq!(a.costs(), b.costs());
    /// ```
    pub fn generate(config: &GraphConfig) -> TspResult<Graph> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let side = config.square_side;
        let (lo, hi) = match config.region {
            SamplingRegion::Positive => (0.0, side),
            SamplingRegion::Centered => (-side, side),
        };

        let points: Vec<Point> = (0..config.n_nodes)
            .map(|_| {
                let x = rng.random_range(lo..=hi);
                let y = rng.random_range(lo..=hi);
                Point::new(x, y)
            })
            .collect();

        let graph = Graph::with_sentinel(points, config.sentinel());
        debug!(
            "generated graph: {} nodes, side {}, region {:?}",
            graph.size(),
            side,
            config.region
        );
        Ok(graph)
    }
}
