//! CPLEX LP text export.
//!
//! Diagnostic only: the output can be loaded into any LP-format reader
//! to inspect a model offline.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use super::model::{LinearExpr, MilpModel, Sense};
use super::variables::{VarKind, Variable};

/// Terms per line before wrapping; LP readers cap line length.
const TERMS_PER_LINE: usize = 8;

impl MilpModel {
    /// Writes the model in LP format.
    pub fn write_lp<W: Write>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(self.to_lp_string().as_bytes())
    }

    /// Writes the model in LP format to `path`, replacing any existing file.
    pub fn export_lp(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write_lp(&mut out)?;
        out.flush()
    }

    /// Renders the model in LP format.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_tsp::milp::{ComparisonOp, LinearExpr, MilpModel, Objective, Variable};
    ///
    /// let mut model = MilpModel::new("tiny");
    /// let x = model.add_var(Variable::binary("x"));
    /// let t = model.add_var(Variable::integer("t", 2, 3));
    /// model.add_constraint("c1", LinearExpr::new().with(t, 1.0).with(x, -2.0), ComparisonOp::Le, 1.0);
    /// model.set_objective(Objective::minimize(LinearExpr::new().with(x, 1.5)));
    ///
    /// let lp = model.to_lp_string();
    /// assert!(lp.contains("Minimize\n obj: 1.5 x\n"));
    /// assert!(lp.contains(" c1: t - 2 x <= 1\n"));
    /// assert!(lp.contains(" 2 <= t <= 3\n"));
    /// ```
    pub fn to_lp_string(&self) -> String {
        let vars = self.variables();
        let mut s = String::new();

        let _ = writeln!(s, "\\ Model {}", self.name);
        let (sense, expr) = match self.objective() {
            Some(obj) => (obj.sense, Some(&obj.expr)),
            None => (Sense::Minimize, None),
        };
        s.push_str(match sense {
            Sense::Minimize => "Minimize\n",
            Sense::Maximize => "Maximize\n",
        });
        s.push_str(" obj:");
        match expr {
            Some(expr) if !expr.is_empty() => push_expr(&mut s, expr, vars),
            _ => push_zero(&mut s, vars),
        }
        s.push('\n');

        s.push_str("Subject To\n");
        for c in self.constraints() {
            let _ = write!(s, " {}:", c.name);
            if c.expr.is_empty() {
                push_zero(&mut s, vars);
            } else {
                push_expr(&mut s, &c.expr, vars);
            }
            let _ = writeln!(s, " {} {}", c.op.symbol(), c.rhs);
        }

        s.push_str("Bounds\n");
        for v in vars {
            if v.kind == VarKind::Binary && v.lower == 0.0 && v.upper == 1.0 {
                continue;
            }
            if v.is_fixed() {
                let _ = writeln!(s, " {} = {}", v.name, v.lower);
            } else if v.lower == f64::NEG_INFINITY && v.upper == f64::INFINITY {
                let _ = writeln!(s, " {} free", v.name);
            } else {
                let _ = writeln!(
                    s,
                    " {} <= {} <= {}",
                    bound(v.lower),
                    v.name,
                    bound(v.upper)
                );
            }
        }

        push_section(&mut s, "Binaries", vars, VarKind::Binary);
        push_section(&mut s, "Generals", vars, VarKind::Integer);
        s.push_str("End\n");
        s
    }
}

fn push_expr(s: &mut String, expr: &LinearExpr, vars: &[Variable]) {
    for (k, &(var, coeff)) in expr.terms().iter().enumerate() {
        if k > 0 && k % TERMS_PER_LINE == 0 {
            s.push_str("\n   ");
        }
        let sign = if coeff < 0.0 { "-" } else { "+" };
        if k == 0 {
            if coeff < 0.0 {
                s.push_str(" -");
            }
        } else {
            let _ = write!(s, " {sign}");
        }
        let magnitude = coeff.abs();
        if magnitude == 1.0 {
            let _ = write!(s, " {}", vars[var.index()].name);
        } else {
            let _ = write!(s, " {} {}", magnitude, vars[var.index()].name);
        }
    }
}

// LP format has no bare constants on the left-hand side.
fn push_zero(s: &mut String, vars: &[Variable]) {
    if let Some(first) = vars.first() {
        let _ = write!(s, " 0 {}", first.name);
    }
}

fn push_section(s: &mut String, title: &str, vars: &[Variable], kind: VarKind) {
    let names: Vec<&str> = vars
        .iter()
        .filter(|v| v.kind == kind)
        .map(|v| v.name.as_str())
        .collect();
    if names.is_empty() {
        return;
    }
    let _ = writeln!(s, "{title}");
    for chunk in names.chunks(TERMS_PER_LINE) {
        let _ = writeln!(s, " {}", chunk.join(" "));
    }
}

fn bound(value: f64) -> String {
    if value == f64::INFINITY {
        "+inf".into()
    } else if value == f64::NEG_INFINITY {
        "-inf".into()
    } else {
        value.to_string()
    }
}
