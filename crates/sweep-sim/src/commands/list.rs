use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use sweep_exp::experiment_names;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// YAML configuration holding one experiment per document.
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(args: &ListArgs) -> Result<(), Box<dyn Error>> {
    let text = fs::read_to_string(&args.config)?;
    for name in experiment_names(&text)? {
        println!("{name}");
    }
    Ok(())
}
