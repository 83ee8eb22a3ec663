use anyhow::ensure;
use dautodiff::{forward::Dual, op, Graph, ScalarNode};
use itertools::Itertools;

use super::Cmd;

// -----------------------------------------------------------------------------
// Elementary
// -----------------------------------------------------------------------------
/// One function evaluated by the three engines.
struct Elementary {
    name: &'static str,
    reverse: fn(&ScalarNode) -> ScalarNode,
    forward: fn(&Dual) -> Dual,
    plain: fn(f64) -> f64,
}

macro_rules! _elementary {
    ($($name:literal => |$x:ident| $body:expr),* $(,)?) => {
        vec![$(
            Elementary {
                name: $name,
                reverse: |$x: &ScalarNode| $body,
                forward: |$x: &Dual| $body,
                plain: |$x: f64| $body,
            },
        )*]
    };
}

fn elementaries() -> Vec<Elementary> {
    _elementary![
        "sin" => |x| op::sin(x),
        "cos" => |x| op::cos(x),
        "tan" => |x| op::tan(x),
        "arcsin" => |x| op::arcsin(x),
        "arccos" => |x| op::arccos(x),
        "arctan" => |x| op::arctan(x),
        "sinh" => |x| op::sinh(x),
        "cosh" => |x| op::cosh(x),
        "tanh" => |x| op::tanh(x),
        "arcsinh" => |x| op::arcsinh(x),
        "arccosh" => |x| op::arccosh(x),
        "arctanh" => |x| op::arctanh(x),
        "exp" => |x| op::exp(x),
        "sqrt" => |x| op::sqrt(x),
        "erf" => |x| op::erf(x),
        "ln" => |x| op::ln(x),
        "log10" => |x| op::log(x, 10.0),
    ]
}

// -----------------------------------------------------------------------------
// Row
// -----------------------------------------------------------------------------
#[derive(Debug, serde::Serialize)]
struct Row {
    name: &'static str,
    value: f64,
    reverse: f64,
    forward: f64,
    finite_diff: f64,
}

impl Row {
    fn evaluate(f: &Elementary, at: f64, eps: f64) -> Self {
        let graph = Graph::new();
        let x = graph.scalar(at);
        let y = (f.reverse)(&x);
        y.backward();
        let reverse = x.gradient();
        log::debug!("{}: {:?}", f.name, graph.stats());

        let x = Dual::var(at);
        let forward = (f.forward)(&x).partial(&x).unwrap_or(f64::NAN);

        let finite_diff = ((f.plain)(at + eps) - (f.plain)(at - eps)) / (2.0 * eps);

        Self {
            name: f.name,
            value: y.value(),
            reverse,
            forward,
            finite_diff,
        }
    }

    /// `false` only when both derivatives are finite and disagree.
    fn is_consistent(&self, tolerance: f64) -> bool {
        if !(self.reverse.is_finite() && self.forward.is_finite()) {
            return true;
        }
        let scale = self.forward.abs().max(1.0);
        (self.reverse - self.forward).abs() <= tolerance * scale
    }
}

// -----------------------------------------------------------------------------
// Args
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Point at which every function is differentiated
    #[clap(long = "at", allow_negative_numbers = true)]
    pub at: f64,

    /// Step of central finite differences
    #[clap(long = "eps", default_value_t = 1e-6)]
    pub eps: f64,

    /// Relative tolerance between reverse and forward mode
    #[clap(long = "tolerance", default_value_t = 1e-9)]
    pub tolerance: f64,

    /// Print the report as JSON
    #[clap(long = "json")]
    pub json: bool,
}

impl Cmd for Args {
    fn run(&self) -> anyhow::Result<()> {
        ensure!(self.eps > 0.0, "eps must be positive, got {}", self.eps);

        let rows = elementaries()
            .iter()
            .map(|f| Row::evaluate(f, self.at, self.eps))
            .collect_vec();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else {
            println!(
                "{:<8} {:>22} {:>22} {:>22} {:>22}",
                "fn", "value", "reverse", "forward", "finite diff"
            );
            for row in &rows {
                println!(
                    "{:<8} {:>22.15e} {:>22.15e} {:>22.15e} {:>22.15e}",
                    row.name, row.value, row.reverse, row.forward, row.finite_diff
                );
            }
        }

        for row in &rows {
            let diff = (row.reverse - row.finite_diff).abs();
            if row.reverse.is_finite() && diff > 1e-4 * row.reverse.abs().max(1.0) {
                log::warn!(
                    "{}: finite difference {} is far from {}",
                    row.name,
                    row.finite_diff,
                    row.reverse
                );
            }
        }

        let failed = rows
            .iter()
            .filter(|row| !row.is_consistent(self.tolerance))
            .map(|row| row.name)
            .collect_vec();
        ensure!(
            failed.is_empty(),
            "reverse and forward mode disagree at {} for: {}",
            self.at,
            failed.join(", ")
        );
        Ok(())
    }
}
