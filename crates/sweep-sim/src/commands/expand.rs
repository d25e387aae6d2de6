use std::error::Error;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use clap::Args;
use sweep_exp::{load_templates, unfold, Expansion};

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// YAML configuration holding one experiment per document.
    #[arg(long)]
    pub config: PathBuf,
    /// Restrict expansion to the named experiments (repeatable).
    #[arg(long = "experiment", short = 'e', value_name = "NAME")]
    pub experiments: Vec<String>,
    /// Directory receiving `expansion.json`; a preview is printed when omitted.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Create every per-repetition log directory.
    #[arg(long)]
    pub create_dirs: bool,
}

pub fn run(args: &ExpandArgs) -> Result<(), Box<dyn Error>> {
    let templates = load_templates(&args.config, &args.experiments)?;
    let expansion = unfold(&templates)?;
    for diagnostic in &expansion.diagnostics {
        tracing::warn!("{}", diagnostic.message());
    }
    tracing::info!(
        templates = templates.len(),
        jobs = expansion.jobs.len(),
        plan_hash = %expansion.plan_hash,
        "expanded experiments"
    );

    if args.create_dirs {
        create_log_dirs(&expansion)?;
    }
    match &args.out {
        Some(out) => persist_expansion(out, &expansion)?,
        None => print_preview(&expansion),
    }
    Ok(())
}

fn create_log_dirs(expansion: &Expansion) -> Result<(), Box<dyn Error>> {
    for job in &expansion.jobs {
        let dir = job.rep_log_path.as_ref().unwrap_or(&job.log_path);
        fs::create_dir_all(dir)?;
        tracing::debug!(dir = %dir.display(), "created log directory");
    }
    Ok(())
}

fn persist_expansion(out: &Path, expansion: &Expansion) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(out)?;
    let bytes = expansion.to_manifest_bytes()?;
    fs::write(out.join("expansion.json"), bytes)?;
    fs::write(out.join("PLAN_HASH"), format!("{}\n", expansion.plan_hash))?;
    tracing::info!(out = %out.display(), "wrote expansion manifest");
    Ok(())
}

fn print_preview(expansion: &Expansion) {
    for job in &expansion.jobs {
        let rep = job
            .rep_idx
            .map(|idx| idx.to_string())
            .unwrap_or_else(|| "-".to_string());
        let dir = job.rep_log_path.as_ref().unwrap_or(&job.log_path);
        println!("{}\t{}\t{}", job.experiment_name, rep, dir.display());
    }
}
