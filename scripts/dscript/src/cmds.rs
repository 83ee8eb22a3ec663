pub mod chain;
pub mod grad_check;

// -----------------------------------------------------------------------------
// Cmd
// -----------------------------------------------------------------------------
pub trait Cmd {
    fn run(&self) -> anyhow::Result<()>;
}

// -----------------------------------------------------------------------------
// Commands
// -----------------------------------------------------------------------------
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Compare reverse mode, forward mode and finite differences for every elementary function
    GradCheck(grad_check::Args),
    /// Evaluate `z = 2x + x^2` and its derivative
    Chain(chain::Args),
}

impl Cmd for Commands {
    fn run(&self) -> anyhow::Result<()> {
        match self {
            Commands::GradCheck(args) => args.run(),
            Commands::Chain(args) => args.run(),
        }
    }
}
