//! Core warm-up.
//!
//! `arduino-cli` populates its build cache on first use, and that first
//! population is not safe against concurrent writers. Building one trivial
//! sketch up front fills the cache for the board, so the worker pool only
//! ever reads from it. Warm-up failure aborts the whole run: if an empty
//! sketch does not compile, nothing else will.

use crate::compile::{BuildContext, CompileReport};
use anyhow::{Context, Result, bail};
use colored::*;
use std::fs;
use std::time::Instant;

const EMPTY_SKETCH: &str = "void setup() {} void loop() {}";
const SKETCH_NAME: &str = "inobatch-empty-sketch";

/// Build an empty sketch for the board, populating the shared cache.
pub fn warm_core(ctx: &BuildContext) -> Result<()> {
    let sketch_dir = std::env::temp_dir().join(SKETCH_NAME);
    fs::create_dir_all(&sketch_dir).context("Failed to create warm-up sketch directory")?;
    fs::write(sketch_dir.join(format!("{SKETCH_NAME}.ino")), EMPTY_SKETCH)
        .context("Failed to write warm-up sketch")?;

    println!("{} Building core for {}...", "🔧".cyan(), ctx.board.bold());

    let start = Instant::now();
    let mut cmd = ctx.compile_command(SKETCH_NAME);
    cmd.current_dir(&sketch_dir);
    let output = cmd
        .output()
        .with_context(|| format!("Failed to run {}", ctx.toolchain))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    match serde_json::from_str::<CompileReport>(&stdout) {
        Ok(report) if report.success => {
            println!(
                "{} Core ready in {:.3}s",
                "✓".green(),
                start.elapsed().as_secs_f64()
            );
            Ok(())
        }
        Ok(report) => {
            eprintln!("{stderr}");
            eprintln!("{}", report.compiler_err);
            bail!("Failed to compile core for board '{}'", ctx.board)
        }
        Err(e) => {
            eprintln!("{stdout}");
            eprintln!("{stderr}");
            bail!("Malformed toolchain output during core build: {e}")
        }
    }
}
