//! Graph data types.

use std::fmt;

use super::config::DEFAULT_SENTINEL_FACTOR;
use crate::error::{TspError, TspResult};

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A complete graph with a symmetric Euclidean cost matrix.
///
/// Costs are stored row-major in a flat vector (`i * n + j`). Diagonal
/// entries hold a sentinel larger than any pairwise distance, so a
/// self-arc is never the cheapest choice.
///
/// # Examples
///
/// ```
/// use u_tsp::graph::{Graph, Point};
///
/// let graph = Graph::from_points(
///     vec![Point::new(0.0, 0.0), Point::new(3.0, 4.0)],
///     10.0,
/// ).unwrap();
/// assert_eq!(graph.size(), 2);
/// assert_eq!(graph.cost(0, 1), 5.0);
/// assert_eq!(graph.cost(1, 0), 5.0);
/// assert!(graph.cost(0, 0) > 5.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Graph {
    n_nodes: usize,
    costs: Vec<f64>,
    points: Vec<Point>,
}

impl Graph {
    /// Builds a graph over caller-supplied points.
    ///
    /// The self-arc sentinel is `999 * square_side`, as for generated
    /// graphs; it must exceed every pairwise distance.
    pub fn from_points(points: Vec<Point>, square_side: f64) -> TspResult<Self> {
        if points.is_empty() {
            return Err(TspError::InvalidConfig("at least one point is required".into()));
        }
        if !square_side.is_finite() || square_side <= 0.0 {
            return Err(TspError::InvalidConfig(format!(
                "square_side must be positive and finite, got {square_side}"
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(TspError::InvalidConfig(format!("non-finite point {p:?}")));
        }

        let sentinel = DEFAULT_SENTINEL_FACTOR * square_side;
        if !sentinel.is_finite() {
            return Err(TspError::InvalidConfig(format!(
                "self-arc sentinel for square_side {square_side} overflows"
            )));
        }
        let graph = Self::with_sentinel(points, sentinel);
        let max = graph.max_distance();
        if max >= sentinel {
            return Err(TspError::InvalidConfig(format!(
                "points span {max} which reaches the self-arc sentinel {sentinel}"
            )));
        }
        Ok(graph)
    }

    /// Fills the matrix; each unordered pair is computed once.
    pub(crate) fn with_sentinel(points: Vec<Point>, sentinel: f64) -> Self {
        let n = points.len();
        let mut costs = vec![0.0; n * n];
        for i in 0..n {
            costs[i * n + i] = sentinel;
            for j in (i + 1)..n {
                let d = points[i].distance(points[j]);
                costs[i * n + j] = d;
                costs[j * n + i] = d;
            }
        }
        Self {
            n_nodes: n,
            costs,
            points,
        }
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.n_nodes
    }

    /// Cost of arc `(i, j)`.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not a node id.
    pub fn cost(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n_nodes && j < self.n_nodes, "node out of range");
        self.costs[i * self.n_nodes + j]
    }

    /// The full cost matrix, row-major.
    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    /// Costs of arcs leaving `i`.
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.n_nodes;
        &self.costs[i * n..(i + 1) * n]
    }

    /// Node coordinates.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Largest off-diagonal cost (0 for a single node).
    pub fn max_distance(&self) -> f64 {
        let n = self.n_nodes;
        (0..n)
            .flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j)))
            .map(|(i, j)| self.costs[i * n + j])
            .fold(0.0, f64::max)
    }
}

/// Tab-separated cost grid, one row per line.
impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n_nodes {
            for c in self.row(i) {
                write!(f, "{c}\t")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
