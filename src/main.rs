//! # inobatch CLI entry point
//!
//! Parses CLI arguments with clap, wires the run together (catalog →
//! discovery → core warm-up → worker pool → report) and turns the failure
//! count into the process exit status.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use inobatch::catalog::BoardCatalog;
use inobatch::compile::BuildContext;
use inobatch::discover;
use inobatch::report::ReportAggregator;
use inobatch::scheduler;
use inobatch::warmup;

#[derive(Parser)]
#[command(name = "inobatch")]
#[command(about = "Batch-compile Arduino example sketches for a board", version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// The board to compile for (must exist in the FQBN file)
    board: Option<String>,

    /// TOML file mapping board names to FQBNs
    #[arg(long = "fqbn_file", default_value = "boards.toml")]
    fqbn_file: PathBuf,

    /// Directory tree containing the example sketches
    #[arg(long = "examples_dir", default_value = "examples")]
    examples_dir: PathBuf,

    /// Also compile examples without an @boards label
    #[arg(long = "include_unlabeled_examples")]
    include_unlabeled_examples: bool,

    /// Number of compile jobs to run in parallel [default: CPU count]
    #[arg(short = 'j', long = "jobs")]
    jobs: Option<usize>,

    /// Generate shell completion script and exit
    #[arg(long, value_enum)]
    completion: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completion {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "inobatch", &mut std::io::stdout());
        return;
    }

    match run(&cli) {
        Ok(failed) => std::process::exit(failed),
        Err(e) => {
            eprintln!("{} {:#}", "x".red(), e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32> {
    let Some(board) = cli.board.as_deref() else {
        Cli::command().print_help().ok();
        return Ok(2);
    };

    // Resolve the board before anything else touches the filesystem or
    // spawns a process: an unknown board must fail the whole run up front.
    let catalog = BoardCatalog::load(&cli.fqbn_file)?;
    let fqbn = catalog.resolve(board)?;
    let ctx = BuildContext::new(board, fqbn);

    let examples = discover::discover(&cli.examples_dir)
        .with_context(|| format!("Failed to scan {}", cli.examples_dir.display()))?;
    if examples.is_empty() {
        println!(
            "{} No examples found under {}",
            "!".yellow(),
            cli.examples_dir.display()
        );
        return Ok(0);
    }

    warmup::warm_core(&ctx)?;

    let jobs = cli.jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });
    let batch = scheduler::schedule(examples, &ctx, cli.include_unlabeled_examples, jobs)?;

    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("#>-");
    let pb = ProgressBar::new(batch.scheduled as u64);
    pb.set_style(style);
    pb.set_message("Compiling examples...");

    let mut aggregator = ReportAggregator::new(board);
    for (example, outcome) in batch.outcomes.iter() {
        let rel = example
            .path
            .strip_prefix(&cli.examples_dir)
            .unwrap_or(&example.path);
        pb.println(aggregator.record(rel, &outcome));
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!("{}", aggregator.summary());
    Ok(aggregator.exit_code())
}
