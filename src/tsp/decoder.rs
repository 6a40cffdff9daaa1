//! Tour reconstruction from arc assignments.

use std::fmt;

use crate::error::DecodeError;
use crate::graph::Graph;

/// Default distance from 1 within which an arc counts as selected.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// A Hamiltonian cycle over nodes `0..n`.
///
/// Nodes are stored in visiting order starting at node 0; the arc back
/// to node 0 is implicit.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tour {
    nodes: Vec<usize>,
}

impl Tour {
    pub(crate) fn new(nodes: Vec<usize>) -> Self {
        Self { nodes }
    }

    /// Nodes in visiting order, starting with 0.
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Nodes visited after the start, in order.
    pub fn successors(&self) -> &[usize] {
        self.nodes.get(1..).unwrap_or(&[])
    }

    /// Number of nodes on the tour.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arcs `(i, j)` in order, including the one closing the cycle.
    pub fn arcs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.nodes.len();
        (0..n).map(move |k| (self.nodes[k], self.nodes[(k + 1) % n]))
    }

    /// Total cost of the tour in `graph`.
    pub fn length(&self, graph: &Graph) -> f64 {
        self.arcs().map(|(i, j)| graph.cost(i, j)).sum()
    }

    /// Renders one `i -> j` arc per line.
    pub fn arcs_display(&self) -> ArcsDisplay<'_> {
        ArcsDisplay(self)
    }
}

/// Cyclic sequence, e.g. `0 -> 2 -> 1 -> 3 -> 0`.
impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node} -> ")?;
        }
        match self.nodes.first() {
            Some(start) => write!(f, "{start}"),
            None => Ok(()),
        }
    }
}

/// See [`Tour::arcs_display`].
pub struct ArcsDisplay<'a>(&'a Tour);

impl fmt::Display for ArcsDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, j) in self.0.arcs() {
            writeln!(f, "{i} -> {j}")?;
        }
        Ok(())
    }
}

/// Follows selected arcs from node 0 to rebuild a [`Tour`].
///
/// Every step must find exactly one outgoing arc whose value is within
/// the tolerance of 1, and the walk must return to node 0 only after
/// visiting all nodes. Anything else is a [`DecodeError`]; the walk takes
/// at most `n` steps.
///
/// # Examples
///
/// ```
/// use u_tsp::tsp::TourDecoder;
///
/// // 0 -> 2 -> 1 -> 3 -> 0
/// let n = 4;
/// let mut arcs = vec![0.0; n * n];
/// for (i, j) in [(0, 2), (2, 1), (1, 3), (3, 0)] {
///     arcs[i * n + j] = 1.0;
/// }
/// let tour = TourDecoder::new().decode(&arcs, n).unwrap();
/// assert_eq!(tour.nodes(), &[0, 2, 1, 3]);
/// assert_eq!(tour.successors(), &[2, 1, 3]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TourDecoder {
    tolerance: f64,
}

impl Default for TourDecoder {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl TourDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the selection tolerance. Values of at least 0.5 would let
    /// ties count as selected and are clamped below it.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.clamp(0.0, 0.499);
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Decodes a row-major `n x n` arc matrix into a tour.
    pub fn decode(&self, arcs: &[f64], n: usize) -> Result<Tour, DecodeError> {
        if n == 0 {
            return Err(DecodeError::Empty);
        }
        if arcs.len() != n * n {
            return Err(DecodeError::DimensionMismatch {
                expected: n * n,
                actual: arcs.len(),
            });
        }

        let mut visited = vec![false; n];
        let mut nodes = Vec::with_capacity(n);
        let mut current = 0;
        visited[0] = true;
        nodes.push(0);

        for _ in 0..n {
            let next = self.successor(&arcs[current * n..(current + 1) * n], current)?;
            if next == 0 {
                if nodes.len() < n {
                    return Err(DecodeError::PrematureReturn {
                        visited: nodes.len(),
                        expected: n,
                    });
                }
                return Ok(Tour::new(nodes));
            }
            if visited[next] {
                return Err(DecodeError::NodeRevisited {
                    node: next,
                    position: nodes.len(),
                });
            }
            visited[next] = true;
            nodes.push(next);
            current = next;
        }

        // n distinct nodes pushed without closing: the last step would
        // have to revisit one, which the loop already rejects.
        Err(DecodeError::NodeRevisited {
            node: current,
            position: nodes.len(),
        })
    }

    fn successor(&self, row: &[f64], node: usize) -> Result<usize, DecodeError> {
        let mut selected = row
            .iter()
            .enumerate()
            .filter(|&(_, &v)| (v - 1.0).abs() <= self.tolerance)
            .map(|(j, _)| j);
        match (selected.next(), selected.next()) {
            (Some(j), None) => Ok(j),
            (None, _) => Err(DecodeError::NoOutgoingArc { node }),
            (Some(_), Some(_)) => Err(DecodeError::AmbiguousArc {
                node,
                candidates: 2 + selected.count(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Point;

    fn matrix(n: usize, arcs: &[(usize, usize)]) -> Vec<f64> {
        let mut m = vec![0.0; n * n];
        for &(i, j) in arcs {
            m[i * n + j] = 1.0;
        }
        m
    }

    #[test]
    fn test_decode_cycle() {
        let arcs = matrix(4, &[(0, 2), (2, 1), (1, 3), (3, 0)]);
        let tour = TourDecoder::new().decode(&arcs, 4).unwrap();
        assert_eq!(tour.nodes(), &[0, 2, 1, 3]);
        assert_eq!(tour.len(), 4);

        let mut seen = tour.nodes().to_vec();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_decode_noisy_values() {
        let mut arcs = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
        arcs[1] = 0.999_999_9;
        arcs[2] = 1e-9;
        arcs[5] = 1.000_000_2;
        let tour = TourDecoder::new().decode(&arcs, 3).unwrap();
        assert_eq!(tour.nodes(), &[0, 1, 2]);
    }

    #[test]
    fn test_no_outgoing_arc() {
        // row 1 is all zeros
        let arcs = matrix(4, &[(0, 1), (2, 3), (3, 0)]);
        assert_eq!(
            TourDecoder::new().decode(&arcs, 4),
            Err(DecodeError::NoOutgoingArc { node: 1 })
        );
    }

    #[test]
    fn test_half_values_are_not_selected() {
        let mut arcs = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
        arcs[1] = 0.5;
        arcs[2] = 0.5;
        assert_eq!(
            TourDecoder::new().decode(&arcs, 3),
            Err(DecodeError::NoOutgoingArc { node: 0 })
        );
    }

    #[test]
    fn test_ambiguous_arc() {
        let arcs = matrix(4, &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 3), (3, 0)]);
        assert_eq!(
            TourDecoder::new().decode(&arcs, 4),
            Err(DecodeError::AmbiguousArc {
                node: 0,
                candidates: 3
            })
        );
    }

    #[test]
    fn test_subtour_detected() {
        let arcs = matrix(4, &[(0, 1), (1, 0), (2, 3), (3, 2)]);
        assert_eq!(
            TourDecoder::new().decode(&arcs, 4),
            Err(DecodeError::PrematureReturn {
                visited: 2,
                expected: 4
            })
        );
    }

    #[test]
    fn test_revisit_detected() {
        // 0 -> 1 -> 2 -> 1 never returns to 0
        let arcs = matrix(4, &[(0, 1), (1, 2), (2, 1), (3, 0)]);
        assert_eq!(
            TourDecoder::new().decode(&arcs, 4),
            Err(DecodeError::NodeRevisited {
                node: 1,
                position: 3
            })
        );

        let self_loop = matrix(3, &[(0, 1), (1, 1), (2, 0)]);
        assert!(matches!(
            TourDecoder::new().decode(&self_loop, 3),
            Err(DecodeError::NodeRevisited { node: 1, .. })
        ));
    }

    #[test]
    fn test_dimension_checks() {
        assert_eq!(TourDecoder::new().decode(&[], 0), Err(DecodeError::Empty));
        assert_eq!(
            TourDecoder::new().decode(&[0.0; 8], 3),
            Err(DecodeError::DimensionMismatch {
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn test_tolerance_setting() {
        let decoder = TourDecoder::new().with_tolerance(0.2);
        assert!((decoder.tolerance() - 0.2).abs() < 1e-12);
        let mut arcs = matrix(2, &[(0, 1), (1, 0)]);
        arcs[1] = 0.85;
        assert!(decoder.decode(&arcs, 2).is_ok());
        assert!(TourDecoder::new().decode(&arcs, 2).is_err());

        assert!(TourDecoder::new().with_tolerance(0.9).tolerance() < 0.5);
    }

    #[test]
    fn test_empty_tour() {
        let tour = Tour::new(Vec::new());
        assert!(tour.is_empty());
        assert!(tour.successors().is_empty());
        assert_eq!(tour.arcs().count(), 0);
    }

    #[test]
    fn test_tour_display_and_length() {
        let arcs = matrix(4, &[(0, 2), (2, 1), (1, 3), (3, 0)]);
        let tour = TourDecoder::new().decode(&arcs, 4).unwrap();
        assert_eq!(tour.to_string(), "0 -> 2 -> 1 -> 3 -> 0");
        assert_eq!(
            tour.arcs_display().to_string(),
            "0 -> 2\n2 -> 1\n1 -> 3\n3 -> 0\n"
        );
        assert_eq!(
            tour.arcs().collect::<Vec<_>>(),
            vec![(0, 2), (2, 1), (1, 3), (3, 0)]
        );

        let graph = Graph::from_points(
            vec![
                Point::new(0.0, 0.0),
                Point::new(1.0, 1.0),
                Point::new(1.0, 0.0),
                Point::new(0.0, 1.0),
            ],
            1.0,
        )
        .unwrap();
        // 0 -> 2 -> 1 -> 3 -> 0 walks the perimeter
        assert!((tour.length(&graph) - 4.0).abs() < 1e-12);
    }
}
