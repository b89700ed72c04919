// Mon Oct 12 2026 - Alex

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use interop_mapper::{
    config::Config,
    orchestration::{GenerationRun, RunInput},
    output::{JsonExporter, ReportRenderer},
    utils::logging,
};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "0.1.0")]
#[command(about = "Lays out native declarations and plans their managed bindings", long_about = None)]
struct Args {
    /// Declaration snapshot (tree, directives, extra bindings) as JSON.
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "model.json")]
    output: PathBuf,

    #[arg(short, long)]
    verbose: bool,

    /// Use `RUST_LOG` filtering instead of the colored logger.
    #[arg(long)]
    env_log: bool,

    #[arg(long)]
    compact: bool,
}

fn main() {
    let args = Args::parse();

    if args.env_log {
        logging::init_from_env();
    } else {
        logging::init_logger(args.verbose);
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {:#}", "[!]".red(), e);
            std::process::exit(2);
        }
    }
}

/// Returns whether the run finished without error diagnostics.
fn run(args: &Args) -> Result<bool> {
    let start_time = Instant::now();

    let config = match &args.config {
        Some(path) => {
            println!("{} Loading config: {}", "[*]".blue(), path.display());
            Config::load(path)?
        }
        None => Config::default(),
    };

    println!("{} Loading snapshot: {}", "[*]".blue(), args.input.display());
    let input = RunInput::load(&args.input).context("could not load the declaration snapshot")?;
    println!(
        "{} {} aggregates, {} interfaces, {} functions",
        "[+]".green(),
        input.tree.aggregates.len(),
        input.tree.interfaces.len(),
        input.tree.functions.len()
    );

    let outcome = GenerationRun::new(config).execute(&input.tree, &input.directives, &input.binding_table())?;

    JsonExporter::new()
        .with_pretty_print(!args.compact)
        .serialize_to_file(&outcome, &args.output)
        .with_context(|| format!("could not write {}", args.output.display()))?;
    println!("{} Model written to {}", "[+]".green(), args.output.display());
    println!();
    println!("{}", ReportRenderer::new().render(&outcome));
    println!("{} Finished in {:.2}s", "[*]".blue(), start_time.elapsed().as_secs_f64());

    Ok(!outcome.has_errors())
}
