//! Worker-pool scheduling.
//!
//! Included examples fan out over a fixed-size rayon pool. Every job sends
//! its outcome back over a single mpsc channel, so results arrive in
//! completion order and the receiving side owns the summary alone. There is
//! no cancellation and no per-job timeout; a submitted batch runs to
//! completion.

use crate::compile::{self, BuildContext, CompileOutcome};
use crate::discover::ExampleUnit;
use anyhow::{Context, Result};
use colored::*;
use rayon::prelude::*;
use std::sync::mpsc::{self, Receiver};

pub struct ScheduledBatch {
    pub outcomes: Receiver<(ExampleUnit, CompileOutcome)>,
    pub scheduled: usize,
    // Keeps the worker threads alive while the receiver drains.
    _pool: rayon::ThreadPool,
}

/// Filter `examples` through the board inclusion policy and submit the rest
/// to a pool of `jobs` workers. Excluded examples are never submitted and
/// never appear in the stream; every submitted one appears exactly once.
pub fn schedule(
    examples: Vec<ExampleUnit>,
    ctx: &BuildContext,
    include_unlabeled: bool,
    jobs: usize,
) -> Result<ScheduledBatch> {
    let mut included = Vec::new();
    for example in examples {
        if example.is_included(&ctx.board, include_unlabeled) {
            included.push(example);
        } else if example.declared_boards.is_empty() {
            println!(
                "{} Skipping unlabeled example {}",
                "!".yellow(),
                example.path.display()
            );
        }
    }
    let scheduled = included.len();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build worker pool")?;

    let (tx, rx) = mpsc::channel();
    let ctx = ctx.clone();
    pool.spawn(move || {
        included.into_par_iter().for_each_with(tx, |tx, example| {
            let outcome = compile::run_job(&example, &ctx);
            // A hung-up receiver means the run is already over.
            let _ = tx.send((example, outcome));
        });
    });

    Ok(ScheduledBatch {
        outcomes: rx,
        scheduled,
        _pool: pool,
    })
}
