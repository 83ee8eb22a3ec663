use clap::Parser;
use cmds::Cmd;

mod cmds;

#[derive(Debug, Parser)]
#[command(about = "Developers' utilities for the autodiff engines")]
struct Cli {
    /// Raise the log level, repeat for more detail
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: cmds::Commands,
}

impl Cli {
    fn level_filter(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    env_logger::builder()
        .filter_level(cli.level_filter())
        .parse_default_env()
        .init();

    log::info!("{:?}", cli);
    cli.command.run()
}
