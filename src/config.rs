//! Comparison configuration file
//!
//! A `quarterdiff.json` in the working directory (or a file named with
//! `--config`) supplies the key column and the column selections. Command
//! line flags override whatever the file says.

use crate::column::ColumnRef;
use crate::comparator::CompareOptions;
use crate::error::{QuarterdiffError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "quarterdiff.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    pub key_column: ColumnRef,
    pub compare_columns: Vec<ColumnRef>,
    pub word_diff_columns: Vec<ColumnRef>,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            version: crate::FORMAT_VERSION.to_string(),
            created: None,
            key_column: letter("B"),
            compare_columns: ["I", "O", "P", "Q", "R"].into_iter().map(letter).collect(),
            word_diff_columns: ["O", "S", "T"].into_iter().map(letter).collect(),
        }
    }
}

fn letter(s: &str) -> ColumnRef {
    ColumnRef::Letter(s.to_string())
}

impl CompareConfig {
    /// Load a configuration file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QuarterdiffError::config(format!("Cannot read config '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            QuarterdiffError::config(format!("Invalid config '{}': {}", path.display(), e))
        })?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Use `explicit` if given, else `dir/quarterdiff.json` if present, else defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::load(&candidate);
        }

        Ok(Self::default())
    }

    /// Write the default configuration into `dir`
    pub fn write_default(dir: &Path, force: bool) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() && !force {
            return Err(QuarterdiffError::config(format!(
                "{} already exists, use --force to overwrite",
                path.display()
            )));
        }

        let config = Self {
            created: Some(Utc::now()),
            ..Self::default()
        };
        config.save(&path)?;
        log::info!("Wrote default configuration to {}", path.display());
        Ok(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Apply command line overrides
    pub fn with_overrides(
        mut self,
        key_column: Option<ColumnRef>,
        compare_columns: Option<Vec<ColumnRef>>,
        word_diff_columns: Option<Vec<ColumnRef>>,
    ) -> Self {
        if let Some(key) = key_column {
            self.key_column = key;
        }
        if let Some(columns) = compare_columns {
            self.compare_columns = columns;
        }
        if let Some(columns) = word_diff_columns {
            self.word_diff_columns = columns;
        }
        self
    }

    pub fn to_options(&self) -> CompareOptions {
        CompareOptions {
            key_column: self.key_column.clone(),
            compare_columns: self.compare_columns.clone(),
            word_diff_columns: self.word_diff_columns.clone(),
        }
    }
}
