//! [`MilpSolver`] backed by the pure-Rust `microlp` engine.
//!
//! Each solve opens an [`EngineSession`] that owns everything the engine
//! allocates. The session is a scoped value: it is dropped before
//! [`MicrolpSolver::solve`] returns, whether the engine succeeds, reports
//! infeasibility, or faults. Panics raised inside the engine are caught at
//! this boundary and surfaced as [`SolveResult::EngineError`].

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use log::{debug, warn};
use microlp::{OptimizationDirection, Problem};

use super::model::{ComparisonOp, MilpModel, Sense};
use super::solver::{Assignment, MilpSolver, SolveResult, SolverConfig};
use super::variables::{VarKind, Variable};
use crate::error::{TspError, TspResult};

/// Exact branch-and-bound MILP solver using `microlp`.
///
/// # Examples
///
/// ```
/// use u_tsp::milp::{
///     ComparisonOp, LinearExpr, MicrolpSolver, MilpModel, MilpSolver, Objective,
///     SolverConfig, Variable,
/// };
///
/// let mut model = MilpModel::new("pick");
/// let a = model.add_var(Variable::binary("a"));
/// let b = model.add_var(Variable::binary("b"));
/// model.add_constraint("one", LinearExpr::new().with(a, 1.0).with(b, 1.0), ComparisonOp::Eq, 1.0);
/// model.set_objective(Objective::minimize(LinearExpr::new().with(a, 3.0).with(b, 2.0)));
///
/// let result = MicrolpSolver::new().solve(&model, &SolverConfig::default()).unwrap();
/// assert!((result.objective().unwrap() - 2.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MicrolpSolver;

impl MicrolpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl MilpSolver for MicrolpSolver {
    fn solve(&self, model: &MilpModel, config: &SolverConfig) -> TspResult<SolveResult> {
        config.validate()?;
        model.validate()?;

        if let Some(path) = &config.export_path {
            model.export_lp(path)?;
            debug!("exported model {} to {}", model.name, path.display());
        }

        let session = match panic::catch_unwind(AssertUnwindSafe(|| EngineSession::open(model))) {
            Ok(session) => session?,
            Err(payload) => {
                let msg = panic_message(payload.as_ref());
                warn!("engine fault while loading model {}: {msg}", model.name);
                return Ok(SolveResult::EngineError(msg));
            }
        };
        let result = session.run(config.integrality_tolerance);
        drop(session);

        if let SolveResult::EngineError(msg) = &result {
            warn!("engine fault while solving model {}: {msg}", model.name);
        }
        Ok(result)
    }
}

/// Engine-side copy of one model, alive for exactly one solve.
struct EngineSession {
    problem: Problem,
    vars: Vec<microlp::Variable>,
    integral: Vec<bool>,
}

impl EngineSession {
    fn open(model: &MilpModel) -> TspResult<Self> {
        let (direction, objective) = match model.objective() {
            Some(obj) => (
                match obj.sense {
                    Sense::Minimize => OptimizationDirection::Minimize,
                    Sense::Maximize => OptimizationDirection::Maximize,
                },
                Some(&obj.expr),
            ),
            None => (OptimizationDirection::Minimize, None),
        };

        let mut coeffs = vec![0.0; model.variable_count()];
        if let Some(expr) = objective {
            for &(var, coeff) in expr.terms() {
                coeffs[var.index()] += coeff;
            }
        }

        let mut problem = Problem::new(direction);
        let mut vars = Vec::with_capacity(model.variable_count());
        let mut integral = Vec::with_capacity(model.variable_count());
        for (var, &coeff) in model.variables().iter().zip(&coeffs) {
            let handle = match var.kind {
                VarKind::Binary if var.lower == 0.0 && var.upper == 1.0 => {
                    problem.add_binary_var(coeff)
                }
                VarKind::Binary | VarKind::Integer => {
                    let bounds = (int_bound(var, var.lower)?, int_bound(var, var.upper)?);
                    problem.add_integer_var(coeff, bounds)
                }
                VarKind::Continuous => problem.add_var(coeff, (var.lower, var.upper)),
            };
            vars.push(handle);
            integral.push(var.is_integral());
        }

        for c in model.constraints() {
            let op = match c.op {
                ComparisonOp::Eq => microlp::ComparisonOp::Eq,
                ComparisonOp::Le => microlp::ComparisonOp::Le,
                ComparisonOp::Ge => microlp::ComparisonOp::Ge,
            };
            let terms = c
                .expr
                .terms()
                .iter()
                .map(|&(var, coeff)| (vars[var.index()], coeff));
            problem.add_constraint(terms, op, c.rhs);
        }

        debug!(
            "engine session opened for {}: {} variables, {} constraints",
            model.name,
            vars.len(),
            model.constraint_count()
        );
        Ok(Self {
            problem,
            vars,
            integral,
        })
    }

    fn run(&self, tolerance: f64) -> SolveResult {
        let solve = || {
            #[cfg(test)]
            if tests::FAULT_NEXT_SOLVE.with(|f| f.replace(false)) {
                panic!("injected engine fault");
            }
            self.problem.solve()
        };
        match panic::catch_unwind(AssertUnwindSafe(solve)) {
            Ok(Ok(solution)) => {
                let mut values: Vec<f64> = self
                    .vars
                    .iter()
                    .map(|&v| *solution.var_value(v))
                    .collect();
                if let Some(k) = first_fractional(&values, &self.integral, tolerance) {
                    return SolveResult::EngineError(format!(
                        "variable #{k} has non-integral value {}",
                        values[k]
                    ));
                }
                for (x, &int) in values.iter_mut().zip(&self.integral) {
                    if int {
                        *x = x.round();
                    }
                }
                SolveResult::Optimal {
                    objective: solution.objective(),
                    assignment: Assignment::new(values),
                }
            }
            Ok(Err(microlp::Error::Infeasible)) => SolveResult::Infeasible,
            Ok(Err(microlp::Error::Unbounded)) => SolveResult::Unbounded,
            Ok(Err(err)) => SolveResult::EngineError(err.to_string()),
            Err(payload) => SolveResult::EngineError(panic_message(payload.as_ref())),
        }
    }
}

impl Drop for EngineSession {
    fn drop(&mut self) {
        debug!("engine session released ({} variables)", self.vars.len());
        #[cfg(test)]
        tests::RELEASED.with(|n| n.set(n.get() + 1));
    }
}

/// Index of the first integral variable whose value is further than
/// `tolerance` from an integer.
fn first_fractional(values: &[f64], integral: &[bool], tolerance: f64) -> Option<usize> {
    values
        .iter()
        .zip(integral)
        .position(|(&x, &int)| int && (x - x.round()).abs() > tolerance)
}

fn int_bound(var: &Variable, value: f64) -> TspResult<i32> {
    if value.fract() != 0.0 || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(TspError::InvalidModel(format!(
            "bound {value} of integer variable {} is not representable",
            var.name
        )));
    }
    Ok(value as i32)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "engine panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::{LinearExpr, Objective};
    use std::cell::Cell;

    thread_local! {
        pub(super) static RELEASED: Cell<usize> = const { Cell::new(0) };
        pub(super) static FAULT_NEXT_SOLVE: Cell<bool> = const { Cell::new(false) };
    }

    fn released() -> usize {
        RELEASED.with(|n| n.get())
    }

    fn solve(model: &MilpModel) -> SolveResult {
        MicrolpSolver::new()
            .solve(model, &SolverConfig::default())
            .unwrap()
    }

    #[test]
    fn test_binary_optimum() {
        let mut model = MilpModel::new("cover");
        let x = model.add_var(Variable::binary("x"));
        let y = model.add_var(Variable::binary("y"));
        model.add_constraint(
            "cover",
            LinearExpr::new().with(x, 1.0).with(y, 1.0),
            ComparisonOp::Ge,
            1.0,
        );
        model.set_objective(Objective::minimize(
            LinearExpr::new().with(x, 5.0).with(y, 2.0),
        ));

        match solve(&model) {
            SolveResult::Optimal {
                objective,
                assignment,
            } => {
                assert!((objective - 2.0).abs() < 1e-6);
                assert!(assignment.value(x).abs() < 1e-6);
                assert!((assignment.value(y) - 1.0).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_integer_rounding_up() {
        let mut model = MilpModel::new("ceil");
        let t = model.add_var(Variable::integer("t", 2, 5));
        model.add_constraint("half", LinearExpr::new().with(t, 2.0), ComparisonOp::Ge, 5.0);
        model.set_objective(Objective::minimize(LinearExpr::new().with(t, 1.0)));

        let result = solve(&model);
        assert!((result.objective().unwrap() - 3.0).abs() < 1e-6);
        match result {
            SolveResult::Optimal { assignment, .. } => assert_eq!(assignment.value(t), 3.0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_fixed_variable() {
        let mut model = MilpModel::new("fixed");
        let f = model.add_var(Variable::fixed("f", 1));
        let t = model.add_var(Variable::integer("t", 0, 10));
        model.add_constraint(
            "gap",
            LinearExpr::new().with(t, 1.0).with(f, -1.0),
            ComparisonOp::Ge,
            3.0,
        );
        model.set_objective(Objective::minimize(LinearExpr::new().with(t, 1.0)));

        match solve(&model) {
            SolveResult::Optimal { assignment, .. } => {
                assert!((assignment.value(f) - 1.0).abs() < 1e-6);
                assert!((assignment.value(t) - 4.0).abs() < 1e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_maximize() {
        let mut model = MilpModel::new("max");
        let x = model.add_var(Variable::continuous("x", 0.0, 4.0));
        model.set_objective(Objective::maximize(LinearExpr::new().with(x, 2.0)));
        assert!((solve(&model).objective().unwrap() - 8.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let mut model = MilpModel::new("infeasible");
        let x = model.add_var(Variable::binary("x"));
        model.add_constraint("too_big", LinearExpr::new().with(x, 1.0), ComparisonOp::Ge, 2.0);
        model.set_objective(Objective::minimize(LinearExpr::new().with(x, 1.0)));

        let before = released();
        assert_eq!(solve(&model), SolveResult::Infeasible);
        assert_eq!(released(), before + 1);
    }

    #[test]
    fn test_unbounded() {
        let mut model = MilpModel::new("unbounded");
        let x = model.add_var(Variable::continuous("x", 0.0, f64::INFINITY));
        model.set_objective(Objective::maximize(LinearExpr::new().with(x, 1.0)));
        assert_eq!(solve(&model), SolveResult::Unbounded);
    }

    #[test]
    fn test_session_released_on_success() {
        let mut model = MilpModel::new("one");
        let x = model.add_var(Variable::binary("x"));
        model.set_objective(Objective::minimize(LinearExpr::new().with(x, 1.0)));

        let before = released();
        assert!(solve(&model).is_optimal());
        assert_eq!(released(), before + 1);
    }

    #[test]
    fn test_session_released_on_engine_fault() {
        let mut model = MilpModel::new("faulty");
        let x = model.add_var(Variable::binary("x"));
        model.set_objective(Objective::minimize(LinearExpr::new().with(x, 1.0)));

        let before = released();
        FAULT_NEXT_SOLVE.with(|f| f.set(true));
        let result = solve(&model);
        assert_eq!(
            result,
            SolveResult::EngineError("injected engine fault".into())
        );
        assert_eq!(released(), before + 1);

        // the next solve on this thread is unaffected
        assert!(solve(&model).is_optimal());
        assert_eq!(released(), before + 2);
    }

    #[test]
    fn test_first_fractional() {
        let integral = [true, false, true];
        assert_eq!(first_fractional(&[1.0, 0.3, 2.0 + 1e-9], &integral, 1e-5), None);
        assert_eq!(first_fractional(&[0.0, 0.3, 1.4], &integral, 1e-5), Some(2));
        assert_eq!(first_fractional(&[0.5, 0.3, 1.4], &integral, 1e-5), Some(0));
    }

    #[test]
    fn test_invalid_model_never_opens_session() {
        let mut model = MilpModel::new("bad");
        model.add_var(Variable::integer("t", 3, 1));

        let before = released();
        let err = MicrolpSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, TspError::InvalidModel(_)));
        assert_eq!(released(), before);
    }

    #[test]
    fn test_unrepresentable_bound() {
        let mut model = MilpModel::new("huge");
        model.add_var(Variable::integer("t", 0, i64::from(i32::MAX) + 1));
        let err = MicrolpSolver::new()
            .solve(&model, &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, TspError::InvalidModel(_)));
    }

    #[test]
    fn test_export_before_solve() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("diag.lp");

        let mut model = MilpModel::new("diag");
        let x = model.add_var(Variable::binary("x"));
        model.set_objective(Objective::minimize(LinearExpr::new().with(x, 1.0)));

        let config = SolverConfig::default().with_export_path(&path);
        let result = MicrolpSolver::new().solve(&model, &config).unwrap();
        assert!(result.is_optimal());
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("\\ Model diag\n"));
    }

    #[test]
    fn test_export_failure_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("diag.lp");

        let mut model = MilpModel::new("diag");
        model.add_var(Variable::binary("x"));

        let config = SolverConfig::default().with_export_path(path);
        let err = MicrolpSolver::new().solve(&model, &config).unwrap_err();
        assert!(matches!(err, TspError::Io(_)));
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(payload.as_ref()), "static message");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(payload.as_ref()), "owned message");
        let payload: Box<dyn Any + Send> = Box::new(17u8);
        assert_eq!(panic_message(payload.as_ref()), "engine panicked");
    }
}
