//! MTZ formulation of the TSP.
//!
//! # Model
//!
//! ```text
//! x[i][j] in {0, 1}        arc (i, j) is used            for all i, j
//! t[0] = 1                 node 0 starts the tour
//! t[i] in [2, n]           position of node i             for i = 1..n-1
//!
//! min  sum(i, j) c[i][j] * x[i][j]
//! s.t. sum(j) x[j][i] = 1                                 for all i  (inbound)
//!      sum(j) x[i][j] = 1                                 for all i  (outbound)
//!      t[i] - t[j] + n * x[i][j] <= n - 1                 for i, j = 1..n-1
//! ```
//!
//! # Reference
//!
//! Miller, Tucker & Zemlin (1960), "Integer Programming Formulation of
//! Traveling Salesman Problems", *Journal of the ACM* 7(4), 326-329.

use log::debug;

use crate::error::{TspError, TspResult};
use crate::graph::Graph;
use crate::milp::{
    Assignment, ComparisonOp, LinearExpr, MilpModel, Objective, VarId, Variable,
};

/// Builds [`TspModel`]s from graphs.
///
/// # Examples
///
/// ```
/// use u_tsp::graph::{GraphConfig, GraphGenerator};
/// use u_tsp::tsp::TspModelBuilder;
///
/// let graph = GraphGenerator::generate(&GraphConfig::default().with_nodes(5).with_seed(3)).unwrap();
/// let tsp = TspModelBuilder::new().build(&graph).unwrap();
/// assert_eq!(tsp.model().variable_count(), 5 * 5 + 5);
/// assert_eq!(tsp.degree_constraint_count(), 10);
/// assert_eq!(tsp.mtz_constraint_count(), 16);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TspModelBuilder {
    forbid_self_arcs: bool,
}

impl TspModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds every `x[i][i]` to 0 instead of relying on the self-arc
    /// sentinel cost alone. The variables stay in the model.
    pub fn with_self_arcs_forbidden(mut self, forbid: bool) -> Self {
        self.forbid_self_arcs = forbid;
        self
    }

    /// Builds the MTZ model for `graph`.
    ///
    /// Fails with [`TspError::InvalidConfig`] for graphs with fewer than
    /// two nodes.
    pub fn build<'g>(&self, graph: &'g Graph) -> TspResult<TspModel<'g>> {
        let n = graph.size();
        if n < 2 {
            return Err(TspError::InvalidConfig(format!(
                "a tour needs at least 2 nodes, got {n}"
            )));
        }
        let big_m = n as f64;

        let mut model = MilpModel::new(format!("tsp_mtz_{n}"));

        // t[0] is pinned to 1 so that node 0 starts the tour.
        let mut positions = Vec::with_capacity(n);
        positions.push(model.add_var(Variable::fixed("t_0", 1)));
        for i in 1..n {
            positions.push(model.add_var(Variable::integer(format!("t_{i}"), 2, n as i64)));
        }

        let mut arcs = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let mut var = Variable::binary(format!("x_{i}_{j}"));
                if i == j && self.forbid_self_arcs {
                    var = var.with_upper(0.0);
                }
                arcs.push(model.add_var(var));
            }
        }

        for i in 0..n {
            let inbound: LinearExpr = (0..n).map(|j| (arcs[j * n + i], 1.0)).collect();
            model.add_constraint(format!("inbound_{i}"), inbound, ComparisonOp::Eq, 1.0);
        }
        for i in 0..n {
            let outbound: LinearExpr = (0..n).map(|j| (arcs[i * n + j], 1.0)).collect();
            model.add_constraint(format!("outbound_{i}"), outbound, ComparisonOp::Eq, 1.0);
        }
        let degree_constraints = 2 * n;

        // For i == j the t terms cancel, leaving n * x[i][i] <= n - 1.
        for i in 1..n {
            for j in 1..n {
                let expr = LinearExpr::new()
                    .with(positions[i], 1.0)
                    .with(positions[j], -1.0)
                    .with(arcs[i * n + j], big_m);
                model.add_constraint(format!("mtz_{i}_{j}"), expr, ComparisonOp::Le, big_m - 1.0);
            }
        }
        let mtz_constraints = (n - 1) * (n - 1);

        let cost: LinearExpr = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| (arcs[i * n + j], graph.cost(i, j)))
            .collect();
        model.set_objective(Objective::minimize(cost));

        debug!(
            "built {}: {} variables, {} constraints",
            model.name,
            model.variable_count(),
            model.constraint_count()
        );

        Ok(TspModel {
            graph,
            model,
            arcs,
            positions,
            degree_constraints,
            mtz_constraints,
        })
    }
}

/// An MTZ model together with the handles of its TSP variables.
///
/// Borrows the graph whose costs form the objective.
#[derive(Debug, Clone)]
pub struct TspModel<'g> {
    graph: &'g Graph,
    model: MilpModel,
    arcs: Vec<VarId>,
    positions: Vec<VarId>,
    degree_constraints: usize,
    mtz_constraints: usize,
}

impl<'g> TspModel<'g> {
    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.positions.len()
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// The underlying MILP.
    pub fn model(&self) -> &MilpModel {
        &self.model
    }

    /// Handle of `x[i][j]`.
    pub fn arc(&self, i: usize, j: usize) -> VarId {
        self.arcs[i * self.size() + j]
    }

    /// Handle of `t[i]`.
    pub fn position(&self, i: usize) -> VarId {
        self.positions[i]
    }

    /// Number of free position variables `t[1..n]`. `t[0]` is pinned to 1.
    pub fn position_count(&self) -> usize {
        self.positions[1..]
            .iter()
            .filter(|&&t| !self.model.variable(t).is_fixed())
            .count()
    }

    pub fn degree_constraint_count(&self) -> usize {
        self.degree_constraints
    }

    pub fn mtz_constraint_count(&self) -> usize {
        self.mtz_constraints
    }

    /// Extracts the `x` values as a row-major `n x n` matrix.
    pub fn arc_values(&self, assignment: &Assignment) -> TspResult<Vec<f64>> {
        if assignment.len() != self.model.variable_count() {
            return Err(TspError::InvalidModel(format!(
                "assignment has {} values for {} variables",
                assignment.len(),
                self.model.variable_count()
            )));
        }
        Ok(self.arcs.iter().map(|&v| assignment.value(v)).collect())
    }
}
