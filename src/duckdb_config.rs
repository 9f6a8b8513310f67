//! DuckDB library discovery and startup validation

use crate::error::{QuarterdiffError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// DuckDB configuration manager
#[derive(Debug)]
pub struct DuckDbConfig {
    pub library_path: Option<PathBuf>,
    pub prefer_bundled: bool,
}

impl DuckDbConfig {
    /// Create a configuration with automatic discovery
    pub fn new() -> Self {
        Self {
            library_path: Self::discover_library_path(),
            prefer_bundled: env::var("DUCKDB_DISABLE_BUNDLED").is_err(),
        }
    }

    /// `DUCKDB_LIB_PATH` first, then the platform's usual library directories
    fn discover_library_path() -> Option<PathBuf> {
        if let Ok(path) = env::var("DUCKDB_LIB_PATH") {
            let path_buf = PathBuf::from(path);
            if path_buf.exists() {
                return Some(path_buf);
            }
        }

        Self::standard_paths()
            .into_iter()
            .find(|path| Self::has_duckdb_library(path))
    }

    fn standard_paths() -> Vec<PathBuf> {
        let paths: &[&str] = if cfg!(target_os = "macos") {
            &["/opt/homebrew/lib", "/usr/local/lib", "/opt/local/lib"]
        } else if cfg!(target_os = "windows") {
            &["C:\\Program Files\\DuckDB\\lib", "C:\\duckdb\\lib"]
        } else {
            &["/usr/lib", "/usr/local/lib", "/usr/lib/x86_64-linux-gnu", "/usr/lib64"]
        };
        paths.iter().map(PathBuf::from).collect()
    }

    fn has_duckdb_library(path: &Path) -> bool {
        let names: &[&str] = if cfg!(target_os = "windows") {
            &["duckdb.dll", "libduckdb.dll"]
        } else if cfg!(target_os = "macos") {
            &["libduckdb.dylib", "libduckdb.so"]
        } else {
            &["libduckdb.so", "libduckdb.so.1"]
        };
        path.is_dir() && names.iter().any(|name| path.join(name).exists())
    }

    /// Check if bundled DuckDB is in use
    pub fn use_bundled(&self) -> bool {
        cfg!(feature = "bundled") && self.prefer_bundled
    }

    /// Validate the current configuration
    pub fn validate(&self) -> Result<()> {
        if self.use_bundled() {
            return Ok(());
        }

        match self.library_path {
            Some(ref path) if Self::has_duckdb_library(path) => Ok(()),
            _ => Err(QuarterdiffError::library(self.missing_library_message())),
        }
    }

    fn missing_library_message(&self) -> String {
        let mut message = String::from("❌ DuckDB library not found!\n\nPossible solutions:\n");

        if cfg!(target_os = "macos") {
            message.push_str("1. Install DuckDB: brew install duckdb\n");
        } else if cfg!(target_os = "linux") {
            message.push_str("1. Install DuckDB: sudo apt install libduckdb-dev\n");
        } else {
            message.push_str("1. Download DuckDB from: https://duckdb.org/docs/installation/\n");
        }
        message.push_str("2. Set custom path: export DUCKDB_LIB_PATH=/path/to/duckdb/lib\n");
        message.push_str("3. Rebuild with bundled DuckDB: cargo build --features bundled\n");

        message.push_str("\nSearched paths:\n");
        for path in Self::standard_paths() {
            let status = if Self::has_duckdb_library(&path) { "✅" } else { "❌" };
            message.push_str(&format!("  {} {}\n", status, path.display()));
        }

        message
    }
}

impl Default for DuckDbConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize DuckDB configuration and validate it
pub fn init_duckdb() -> Result<DuckDbConfig> {
    let config = DuckDbConfig::new();
    config.validate()?;

    if config.use_bundled() {
        log::debug!("Using bundled DuckDB library");
    } else if let Some(path) = config.library_path.as_deref() {
        log::debug!("Using DuckDB library from: {}", path.display());
    }

    Ok(config)
}
