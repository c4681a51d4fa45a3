//! vtlengine - evaluate VTL-style assignment scripts

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use log::info;
use std::path::PathBuf;
use vtlengine::config::{EngineConfig, DEFAULT_MAX_DEPTH};
use vtlengine::engine::{run_script_file, ScriptEngine};

/// Evaluate a script of `name := expression;` statements and print the results
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Script file to run
    #[arg(short, long, conflicts_with = "expr")]
    file: Option<PathBuf>,

    /// Script text to run
    #[arg(short, long)]
    expr: Option<String>,

    /// Bind a variable before running, e.g. `--set limit=10` (repeatable)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    /// Maximum expression nesting depth
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let engine = ScriptEngine::with_config(EngineConfig::with_max_depth(args.max_depth));

    for assignment in &args.set {
        let Some((name, source)) = assignment.split_once('=') else {
            bail!("Invalid binding {:?}, expected NAME=VALUE", assignment);
        };
        let value = engine
            .evaluate(source)
            .with_context(|| format!("Invalid value for {}", name.trim()))?;
        engine.set(name.trim(), value);
    }

    match (&args.file, &args.expr) {
        (Some(path), _) => {
            info!("Running script {}", path.display());
            run_script_file(&engine, path)?;
        }
        (None, Some(script)) => {
            engine.eval(script).context("Failed to evaluate script")?;
        }
        (None, None) => bail!("Either --file or --expr is required"),
    }

    for (name, binding) in engine.bindings().iter() {
        println!("{} : {} = {}", name, binding.data_type, binding.value);
    }

    Ok(())
}
