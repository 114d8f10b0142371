//! Board catalog parsing (`boards.toml`).
//!
//! Maps short board names to the fully qualified board names (FQBNs) that
//! `arduino-cli` expects, e.g. `uno = "arduino:avr:uno"`. Loaded once at
//! startup; keys are expected lowercase.

use anyhow::{Context, Result, bail};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub struct BoardCatalog {
    boards: BTreeMap<String, String>,
}

impl BoardCatalog {
    /// Load the catalog from a TOML file of `name = "fqbn"` pairs.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read board catalog {}", path.display()))?;
        let boards: BTreeMap<String, String> = toml::from_str(&content)
            .with_context(|| format!("Failed to parse board catalog {}", path.display()))?;
        Ok(Self { boards })
    }

    /// Look up the FQBN for a board. The lookup is case-insensitive.
    pub fn resolve(&self, board: &str) -> Result<&str> {
        match self.boards.get(&board.to_lowercase()) {
            Some(fqbn) => Ok(fqbn),
            None => {
                let known: Vec<&str> = self.boards.keys().map(String::as_str).collect();
                bail!(
                    "Unknown board '{}'. Known boards: {}",
                    board,
                    known.join(", ")
                )
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boards.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_from(name: &str, content: &str) -> BoardCatalog {
        let temp_dir = std::env::temp_dir().join("inobatch_catalog_test");
        std::fs::create_dir_all(&temp_dir).unwrap();
        let file = temp_dir.join(format!("{name}.toml"));
        std::fs::write(&file, content).unwrap();
        let catalog = BoardCatalog::load(&file).unwrap();
        std::fs::remove_file(&file).ok();
        catalog
    }

    #[test]
    fn test_resolve_known_board() {
        let catalog = catalog_from(
            "known",
            "uno = \"arduino:avr:uno\"\ndue = \"arduino:sam:arduino_due_x\"\n",
        );
        assert_eq!(catalog.resolve("uno").unwrap(), "arduino:avr:uno");
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let catalog = catalog_from("case", "uno = \"arduino:avr:uno\"\n");
        assert_eq!(catalog.resolve("UNO").unwrap(), "arduino:avr:uno");
        assert_eq!(catalog.resolve("Uno").unwrap(), "arduino:avr:uno");
    }

    #[test]
    fn test_unknown_board_lists_known_names() {
        let catalog = catalog_from(
            "unknown",
            "uno = \"arduino:avr:uno\"\nmega = \"arduino:avr:mega\"\n",
        );
        let err = catalog.resolve("teensy40").unwrap_err().to_string();
        assert!(err.contains("teensy40"));
        assert!(err.contains("uno"));
        assert!(err.contains("mega"));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = BoardCatalog::load(Path::new("/definitely/not/here.toml"));
        assert!(err.is_err());
    }
}
