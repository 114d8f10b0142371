//! One compile job: invoke `arduino-cli` for a single example and turn
//! whatever happens into a [`CompileOutcome`].
//!
//! Jobs are fail-closed. A sketch that breaks the compiler, a toolchain that
//! is not installed, or output that does not parse all become a failed
//! outcome; nothing here ever panics a worker or aborts the batch.

use crate::discover::ExampleUnit;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// Everything a worker needs to invoke the toolchain for one board.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Toolchain binary, `arduino-cli` unless overridden.
    pub toolchain: String,
    pub board: String,
    pub fqbn: String,
    /// Build cache shared by every job of the run. Populated once by the
    /// core warm-up before the pool starts.
    pub cache_dir: PathBuf,
}

impl BuildContext {
    pub fn new(board: &str, fqbn: &str) -> Self {
        Self {
            toolchain: "arduino-cli".to_string(),
            board: board.to_string(),
            fqbn: fqbn.to_string(),
            cache_dir: std::env::temp_dir().join(format!("inobatch-core-{board}")),
        }
    }

    /// The `arduino-cli compile` invocation shared by the core warm-up and
    /// the example jobs. JSON output, shared cache, all warnings on.
    pub(crate) fn compile_command(&self, sketch_name: &str) -> Command {
        let mut cmd = Command::new(&self.toolchain);
        cmd.arg("compile")
            .arg("--format")
            .arg("json")
            .arg("--build-cache-path")
            .arg(&self.cache_dir)
            .arg("-b")
            .arg(&self.fqbn)
            .arg("--warnings")
            .arg("all")
            .arg(sketch_name);
        cmd
    }
}

/// One section of the produced binary, as reported by the toolchain.
/// `max_size` is absent for boards that do not report a limit.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionSize {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default, alias = "maxSize")]
    pub max_size: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct BuilderResult {
    #[serde(default)]
    pub executable_sections_size: Vec<SectionSize>,
}

/// The document `arduino-cli compile --format json` prints on stdout.
#[derive(Debug, Deserialize)]
pub(crate) struct CompileReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub compiler_err: String,
    pub builder_result: Option<BuilderResult>,
}

/// Result of one compile job. Exactly one per scheduled example.
#[derive(Debug)]
pub struct CompileOutcome {
    pub success: bool,
    pub sections: Vec<SectionSize>,
    pub compiler_err: String,
    pub stderr: String,
    pub elapsed: Duration,
    pub exit_code: i32,
}

impl CompileOutcome {
    fn failed(compiler_err: String, stderr: String, elapsed: Duration) -> Self {
        Self {
            success: false,
            sections: Vec::new(),
            compiler_err,
            stderr,
            elapsed,
            exit_code: 1,
        }
    }
}

/// Compile one example and report what happened. Spawn failures and
/// malformed toolchain output are folded into the outcome, so one broken
/// example can never take down the rest of the batch.
pub fn run_job(example: &ExampleUnit, ctx: &BuildContext) -> CompileOutcome {
    let cwd = example.path.parent().unwrap_or(Path::new("."));

    let start = Instant::now();
    let mut cmd = ctx.compile_command(example.name());
    cmd.current_dir(cwd);
    let output = cmd.output();
    let elapsed = start.elapsed();

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            return CompileOutcome::failed(
                format!("Failed to run {}: {}", ctx.toolchain, e),
                String::new(),
                elapsed,
            );
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    match serde_json::from_str::<CompileReport>(&stdout) {
        Ok(report) => CompileOutcome {
            success: report.success,
            sections: report
                .builder_result
                .unwrap_or_default()
                .executable_sections_size,
            compiler_err: report.compiler_err,
            stderr,
            elapsed,
            exit_code: output.status.code().unwrap_or(1),
        },
        Err(e) => CompileOutcome::failed(
            format!("Malformed toolchain output: {e}\n{stdout}"),
            stderr,
            elapsed,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_schema_camel_case_max_size() {
        let json = r#"{
            "success": true,
            "compiler_err": "",
            "builder_result": {
                "executable_sections_size": [
                    {"name": "text", "size": 4096, "maxSize": 32256}
                ]
            }
        }"#;
        let report: CompileReport = serde_json::from_str(json).unwrap();
        assert!(report.success);
        let sections = report.builder_result.unwrap().executable_sections_size;
        assert_eq!(sections[0].max_size, 32256);
    }

    #[test]
    fn test_report_schema_snake_case_max_size() {
        let json = r#"{
            "success": false,
            "compiler_err": "exit status 1",
            "builder_result": {
                "executable_sections_size": [
                    {"name": "data", "size": 9, "max_size": 2048}
                ]
            }
        }"#;
        let report: CompileReport = serde_json::from_str(json).unwrap();
        assert!(!report.success);
        assert_eq!(report.compiler_err, "exit status 1");
        let sections = report.builder_result.unwrap().executable_sections_size;
        assert_eq!(sections[0].max_size, 2048);
    }

    #[test]
    fn test_report_schema_missing_fields() {
        // Older CLIs omit builder_result entirely; sections may lack a limit.
        let report: CompileReport = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(report.success);
        assert!(report.builder_result.is_none());

        let section: SectionSize = serde_json::from_str(r#"{"name": "bss", "size": 12}"#).unwrap();
        assert_eq!(section.max_size, 0);
    }

    #[test]
    fn test_missing_toolchain_fails_closed() {
        let example = ExampleUnit {
            path: PathBuf::from("Blink/Blink.ino"),
            declared_boards: Default::default(),
        };
        let mut ctx = BuildContext::new("uno", "arduino:avr:uno");
        ctx.toolchain = "inobatch-no-such-toolchain".to_string();

        let outcome = run_job(&example, &ctx);
        assert!(!outcome.success);
        assert_eq!(outcome.exit_code, 1);
        assert!(outcome.compiler_err.contains("inobatch-no-such-toolchain"));
    }
}
