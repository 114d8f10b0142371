//! Example discovery.
//!
//! An example is one `*.ino` sketch whose containing directory carries the
//! same name as the file stem (`Blink/Blink.ino`). A sketch may declare
//! which boards it compiles for with an `@boards` annotation somewhere in
//! its header comment:
//!
//! ```text
//! // @boards uno, leonardo, mega
//! ```
//!
//! Sketches without the annotation have no board affinity; whether they are
//! compiled is decided by the `--include_unlabeled_examples` flag.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const BOARDS_MARKER: &str = "@boards";

#[derive(Debug, Clone)]
pub struct ExampleUnit {
    pub path: PathBuf,
    pub declared_boards: BTreeSet<String>,
}

impl ExampleUnit {
    /// The sketch name `arduino-cli` is pointed at. By the discovery filter
    /// this equals the containing directory name.
    pub fn name(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
    }

    /// Whether this example should be compiled for `board`.
    ///
    /// Labeled examples are matched against their `@boards` list; unlabeled
    /// ones only run when `include_unlabeled` is set.
    pub fn is_included(&self, board: &str, include_unlabeled: bool) -> bool {
        if self.declared_boards.is_empty() {
            include_unlabeled
        } else {
            self.declared_boards.contains(&board.to_lowercase())
        }
    }
}

/// Walk `root` and collect every sketch following the directory-equals-stem
/// convention. Pure filesystem read; safe to call again.
pub fn discover(root: &Path) -> Result<Vec<ExampleUnit>> {
    let mut examples = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "ino") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let parent_name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        if parent_name != Some(stem) {
            continue;
        }

        let raw = fs::read(path)
            .with_context(|| format!("Failed to read example {}", path.display()))?;
        let content = String::from_utf8_lossy(&raw);
        examples.push(ExampleUnit {
            path: path.to_owned(),
            declared_boards: parse_declared_boards(&content),
        });
    }

    Ok(examples)
}

/// Extract the board list following the first `@boards` marker, if any.
/// The remainder of the marker line is split on commas, trimmed and
/// lowercased. No marker means no declared affinity.
fn parse_declared_boards(content: &str) -> BTreeSet<String> {
    let Some(pos) = content.find(BOARDS_MARKER) else {
        return BTreeSet::new();
    };
    let rest = &content[pos + BOARDS_MARKER.len()..];
    let line = rest.lines().next().unwrap_or("");
    line.split(',')
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(boards: &[&str]) -> ExampleUnit {
        ExampleUnit {
            path: PathBuf::from("Blink/Blink.ino"),
            declared_boards: boards.iter().map(|b| b.to_string()).collect(),
        }
    }

    #[test]
    fn test_parse_boards_line() {
        let content = "/**\n * @boards  uno, Leonardo , mega\n */\nvoid setup() {}\n";
        let boards = parse_declared_boards(content);
        let expected: BTreeSet<String> = ["uno", "leonardo", "mega"]
            .iter()
            .map(|b| b.to_string())
            .collect();
        assert_eq!(boards, expected);
    }

    #[test]
    fn test_parse_no_marker() {
        assert!(parse_declared_boards("void setup() {}\nvoid loop() {}\n").is_empty());
    }

    #[test]
    fn test_parse_marker_at_end_of_file() {
        let boards = parse_declared_boards("// @boards due");
        assert!(boards.contains("due"));
        assert_eq!(boards.len(), 1);
    }

    #[test]
    fn test_inclusion_policy_matrix() {
        // Labeled, board listed.
        assert!(unit(&["uno", "due"]).is_included("uno", false));
        // Labeled, board not listed: excluded even with the flag.
        assert!(!unit(&["uno", "due"]).is_included("mega", true));
        // Unlabeled: follows the flag.
        assert!(unit(&[]).is_included("uno", true));
        assert!(!unit(&[]).is_included("uno", false));
    }

    #[test]
    fn test_inclusion_is_case_insensitive_on_board() {
        assert!(unit(&["uno"]).is_included("UNO", false));
    }
}
