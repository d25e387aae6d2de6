use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    expand::{self, ExpandArgs},
    list::{self, ListArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "sweep-sim", about = "Experiment template expansion CLI")]
struct Cli {
    /// Raise log verbosity to debug.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Expand experiment templates into per-repetition jobs.
    Expand(ExpandArgs),
    /// List the experiments declared in a configuration.
    List(ListArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Command::Expand(args) => expand::run(&args),
        Command::List(args) => list::run(&args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sweep_exp={level},sweep_sim={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
