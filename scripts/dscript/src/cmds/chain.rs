use dautodiff::{op, Graph};

use super::Cmd;

// -----------------------------------------------------------------------------
// Args
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Point at which `z = 2x + x^2` is evaluated
    #[clap(long = "at", allow_negative_numbers = true)]
    pub at: f64,
}

impl Args {
    fn evaluate(&self) -> (f64, f64) {
        let graph = Graph::new();
        let x = graph.scalar(self.at);

        let z = &x * 2.0 + op::pow(&x, 2.0);
        z.backward();
        let dzdx = x.gradient();

        log::debug!("{:?}", graph.stats());
        (z.value(), dzdx)
    }
}

impl Cmd for Args {
    fn run(&self) -> anyhow::Result<()> {
        let (value, grad) = self.evaluate();
        println!("z = 2x + x^2 at x = {}", self.at);
        println!("  z     = {}", value);
        println!("  dz/dx = {}", grad);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(3.0, 15.0, 8.0)]
    #[case(0.0, 0.0, 2.0)]
    #[case(-1.0, -1.0, 0.0)]
    fn test_evaluate(#[case] at: f64, #[case] value: f64, #[case] grad: f64) {
        let args = Args { at };

        assert_eq!(args.evaluate(), (value, grad));
    }
}
