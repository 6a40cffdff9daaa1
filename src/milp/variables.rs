//! MILP variable types.

/// Handle to a variable inside a [`MilpModel`](super::MilpModel).
///
/// Ids are dense: the `k`-th variable added to a model has index `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in its model.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Domain of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// 0/1 variable.
    Binary,
    /// Integer variable within bounds.
    Integer,
    /// Real variable within bounds.
    Continuous,
}

/// A decision variable with inclusive bounds.
///
/// # Examples
///
/// ```
/// use u_tsp::milp::{Variable, VarKind};
///
/// let x = Variable::binary("x_0_1");
/// assert_eq!(x.kind, VarKind::Binary);
/// assert_eq!((x.lower, x.upper), (0.0, 1.0));
///
/// let t = Variable::fixed("t_0", 1);
/// assert!(t.is_fixed());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Variable name (unique within a model).
    pub name: String,
    /// Domain.
    pub kind: VarKind,
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl Variable {
    /// Creates a binary variable.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Binary,
            lower: 0.0,
            upper: 1.0,
        }
    }

    /// Creates an integer variable with domain `[min, max]`.
    pub fn integer(name: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Integer,
            lower: min as f64,
            upper: max as f64,
        }
    }

    /// Creates an integer variable fixed to `value`.
    pub fn fixed(name: impl Into<String>, value: i64) -> Self {
        Self::integer(name, value, value)
    }

    /// Creates a real variable with domain `[lower, upper]`.
    pub fn continuous(name: impl Into<String>, lower: f64, upper: f64) -> Self {
        Self {
            name: name.into(),
            kind: VarKind::Continuous,
            lower,
            upper,
        }
    }

    /// Replaces the upper bound.
    pub fn with_upper(mut self, upper: f64) -> Self {
        self.upper = upper;
        self
    }

    /// Whether the domain is a single value.
    pub fn is_fixed(&self) -> bool {
        self.lower == self.upper
    }

    /// Whether the variable must take an integral value.
    pub fn is_integral(&self) -> bool {
        matches!(self.kind, VarKind::Binary | VarKind::Integer)
    }
}
