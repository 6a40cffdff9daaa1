//! MILP model definition.

use std::collections::HashSet;

use super::variables::{VarId, VarKind, Variable};
use crate::error::{TspError, TspResult};

/// A linear combination of variables.
///
/// Adding a variable that is already present merges the coefficients;
/// terms whose coefficient becomes zero are dropped.
///
/// # Examples
///
/// ```
/// use u_tsp::milp::{LinearExpr, MilpModel, Variable};
///
/// let mut model = MilpModel::new("demo");
/// let a = model.add_var(Variable::integer("a", 0, 9));
/// let b = model.add_var(Variable::binary("b"));
///
/// let mut expr = LinearExpr::new();
/// expr.add(a, 1.0);
/// expr.add(a, -1.0);
/// expr.add(b, 4.0);
/// assert_eq!(expr.terms(), &[(b, 4.0)]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `coeff * var`.
    pub fn add(&mut self, var: VarId, coeff: f64) {
        if let Some(pos) = self.terms.iter().position(|&(v, _)| v == var) {
            self.terms[pos].1 += coeff;
            if self.terms[pos].1 == 0.0 {
                self.terms.remove(pos);
            }
        } else if coeff != 0.0 {
            self.terms.push((var, coeff));
        }
    }

    /// Builder form of [`add`](Self::add).
    pub fn with(mut self, var: VarId, coeff: f64) -> Self {
        self.add(var, coeff);
        self
    }

    /// The `(variable, coefficient)` terms in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Evaluates the expression against per-variable values.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().map(|&(v, c)| c * values[v.0]).sum()
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        let mut expr = LinearExpr::new();
        for (var, coeff) in iter {
            expr.add(var, coeff);
        }
        expr
    }
}

/// Relation between the two sides of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    /// `lhs == rhs`
    Eq,
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
}

impl ComparisonOp {
    /// Operator as written in LP files.
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Le => "<=",
            ComparisonOp::Ge => ">=",
        }
    }
}

/// A named linear constraint `expr op rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Constraint name (unique within a model).
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub op: ComparisonOp,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Whether `values` satisfy the constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.op {
            ComparisonOp::Eq => (lhs - self.rhs).abs() <= tolerance,
            ComparisonOp::Le => lhs <= self.rhs + tolerance,
            ComparisonOp::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

/// Linear objective function.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub sense: Sense,
    pub expr: LinearExpr,
}

impl Objective {
    pub fn minimize(expr: LinearExpr) -> Self {
        Self {
            sense: Sense::Minimize,
            expr,
        }
    }

    pub fn maximize(expr: LinearExpr) -> Self {
        Self {
            sense: Sense::Maximize,
            expr,
        }
    }
}

/// A mixed integer linear program.
///
/// Owns its variables and constraints; variables are referenced by
/// [`VarId`] handles returned from [`add_var`](Self::add_var).
///
/// # Examples
///
/// ```
/// use u_tsp::milp::{ComparisonOp, LinearExpr, MilpModel, Objective, Variable};
///
/// let mut model = MilpModel::new("example");
/// let x = model.add_var(Variable::binary("x"));
/// let y = model.add_var(Variable::binary("y"));
/// model.add_constraint(
///     "pick_one",
///     LinearExpr::new().with(x, 1.0).with(y, 1.0),
///     ComparisonOp::Eq,
///     1.0,
/// );
/// model.set_objective(Objective::minimize(LinearExpr::new().with(x, 2.0).with(y, 3.0)));
/// assert!(model.validate().is_ok());
/// assert_eq!(model.variable_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MilpModel {
    /// Model name.
    pub name: String,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
}

impl MilpModel {
    /// Creates an empty model.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
        }
    }

    /// Adds a variable and returns its handle.
    pub fn add_var(&mut self, var: Variable) -> VarId {
        self.variables.push(var);
        VarId(self.variables.len() - 1)
    }

    /// Adds a constraint.
    pub fn add_constraint(
        &mut self,
        name: impl Into<String>,
        expr: LinearExpr,
        op: ComparisonOp,
        rhs: f64,
    ) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            op,
            rhs,
        });
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Looks a variable up by name.
    pub fn find_var(&self, name: &str) -> Option<VarId> {
        self.variables.iter().position(|v| v.name == name).map(VarId)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Number of variables of `kind` whose domain is not a single value.
    pub fn free_count(&self, kind: VarKind) -> usize {
        self.variables
            .iter()
            .filter(|v| v.kind == kind && !v.is_fixed())
            .count()
    }

    /// Number of variables of `kind`, fixed or not.
    pub fn kind_count(&self, kind: VarKind) -> usize {
        self.variables.iter().filter(|v| v.kind == kind).count()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Validates the model for consistency.
    ///
    /// Checks bounds, unique names, and that every referenced variable
    /// exists.
    pub fn validate(&self) -> TspResult<()> {
        let mut names = HashSet::with_capacity(self.variables.len());
        for var in &self.variables {
            if !names.insert(var.name.as_str()) {
                return Err(TspError::InvalidModel(format!(
                    "duplicate variable: {}",
                    var.name
                )));
            }
            if var.lower.is_nan() || var.upper.is_nan() || var.lower > var.upper {
                return Err(TspError::InvalidModel(format!(
                    "variable {} has bounds [{}, {}]",
                    var.name, var.lower, var.upper
                )));
            }
            if var.is_integral() && !(var.lower.is_finite() && var.upper.is_finite()) {
                return Err(TspError::InvalidModel(format!(
                    "integer variable {} must have finite bounds",
                    var.name
                )));
            }
        }

        let mut names = HashSet::with_capacity(self.constraints.len());
        for c in &self.constraints {
            if !names.insert(c.name.as_str()) {
                return Err(TspError::InvalidModel(format!(
                    "duplicate constraint: {}",
                    c.name
                )));
            }
            if !c.rhs.is_finite() {
                return Err(TspError::InvalidModel(format!(
                    "constraint {} has non-finite rhs",
                    c.name
                )));
            }
            self.check_expr(&c.expr, &c.name)?;
        }

        if let Some(obj) = &self.objective {
            self.check_expr(&obj.expr, "objective")?;
        }
        Ok(())
    }

    fn check_expr(&self, expr: &LinearExpr, owner: &str) -> TspResult<()> {
        for &(var, coeff) in expr.terms() {
            if var.0 >= self.variables.len() {
                return Err(TspError::InvalidModel(format!(
                    "{owner}: undefined variable #{}",
                    var.0
                )));
            }
            if !coeff.is_finite() {
                return Err(TspError::InvalidModel(format!(
                    "{owner}: non-finite coefficient on {}",
                    self.variables[var.0].name
                )));
            }
        }
        Ok(())
    }
}
