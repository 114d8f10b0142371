//! Report formatting and aggregation.
//!
//! Formatting is kept as pure string functions so the blocks can be tested
//! without a terminal; the aggregator is the only owner of the failure list
//! and the final exit status.

use crate::compile::{CompileOutcome, SectionSize};
use colored::*;
use std::path::{Path, PathBuf};

/// Render one completed job as the block streamed to the console.
pub fn format_outcome(board: &str, rel_path: &Path, outcome: &CompileOutcome) -> String {
    let quoted = format!("\"{}\"", rel_path.display());
    let quoted = if outcome.success {
        quoted.green()
    } else {
        quoted.red()
    };

    let mut block = format!(
        "\n{}: {}\n----- {:.3}s -----\n",
        board.bold(),
        quoted,
        outcome.elapsed.as_secs_f64()
    );
    for section in &outcome.sections {
        block.push_str(&format_section(section));
        block.push('\n');
    }
    if !outcome.compiler_err.is_empty() {
        block.push_str(outcome.compiler_err.trim_end());
        block.push('\n');
    }
    if !outcome.stderr.is_empty() {
        block.push_str(outcome.stderr.trim_end());
        block.push('\n');
    }
    block.push_str(if outcome.success { "success\n" } else { "fail\n" });
    block
}

/// `text: 4,096 / 32,256 = 12.70%`. Boards without a section limit report
/// `max_size` as zero; utilization is then zero rather than a division error.
fn format_section(section: &SectionSize) -> String {
    let pct = if section.max_size > 0 {
        100.0 * section.size as f64 / section.max_size as f64
    } else {
        0.0
    };
    format!(
        "{}: {} / {} = {:.2}%",
        section.name,
        group_digits(section.size),
        group_digits(section.max_size),
        pct
    )
}

fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Single owner of the run summary. Outcomes reach it through the scheduler
/// channel only; nothing else mutates the failure list.
pub struct ReportAggregator {
    board: String,
    total: usize,
    failures: Vec<(String, PathBuf)>,
}

impl ReportAggregator {
    pub fn new(board: &str) -> Self {
        Self {
            board: board.to_string(),
            total: 0,
            failures: Vec::new(),
        }
    }

    /// Record one outcome and return its formatted block for printing.
    pub fn record(&mut self, rel_path: &Path, outcome: &CompileOutcome) -> String {
        self.total += 1;
        if !outcome.success {
            self.failures.push((self.board.clone(), rel_path.to_owned()));
        }
        format_outcome(&self.board, rel_path, outcome)
    }

    /// The final block printed after the stream is exhausted.
    pub fn summary(&self) -> String {
        if self.failures.is_empty() {
            format!(
                "\n-----\n\nSuccessfully compiled {} examples\n",
                self.total
            )
        } else {
            let mut out = format!(
                "\n-----\n\nFailed to compile {} of {} examples:\n\n",
                self.failures.len(),
                self.total
            );
            for (board, path) in &self.failures {
                out.push_str(&format!(
                    " - {}: {}\n",
                    board.bold(),
                    format!("\"{}\"", path.display()).red()
                ));
            }
            out
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Process exit status: the failure count, zero on full success.
    /// Unix truncates exit codes modulo 256, so the count saturates at 255
    /// instead of wrapping a large batch back to "success".
    pub fn exit_code(&self) -> i32 {
        self.failures.len().min(255) as i32
    }
}
