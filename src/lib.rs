//! # inobatch - Arduino Example Batch Builder
//!
//! inobatch compiles every example sketch under a directory tree against one
//! board, in parallel, and reports which ones failed.
//!
//! ## How a run works
//!
//! - **Resolve**: the board name is looked up in a TOML catalog mapping
//!   names to FQBNs (`uno = "arduino:avr:uno"`).
//! - **Discover**: the example tree is walked for sketches following the
//!   `Blink/Blink.ino` convention; each may declare compatible boards with
//!   an `@boards` annotation.
//! - **Warm up**: an empty sketch is built once to populate the shared
//!   `arduino-cli` build cache before workers start.
//! - **Fan out**: included examples compile concurrently on a bounded
//!   worker pool; each outcome streams back as it completes.
//! - **Report**: colored per-example blocks, a final tally, and an exit
//!   status equal to the number of failures.
//!
//! ## Quick Start
//!
//! ```bash
//! inobatch uno --examples_dir examples -j 8
//! ```

/// Board name to FQBN catalog (`boards.toml`).
pub mod catalog;

/// Subprocess invocation of `arduino-cli` and its JSON output schema.
pub mod compile;

/// Example sketch discovery and the board inclusion policy.
pub mod discover;

/// Per-example report blocks, run summary and exit status.
pub mod report;

/// Bounded worker pool fanning compile jobs out over rayon.
pub mod scheduler;

/// One-shot build-cache warm-up before the parallel phase.
pub mod warmup;
