//! Common test utilities and helpers

use quarterdiff::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture manager for creating temporary test environments
pub struct TestFixture {
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    /// Get the root path of the test fixture
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a test CSV file with sample data
    pub fn create_csv(&self, name: &str, data: &[Vec<&str>]) -> Result<PathBuf> {
        let path = self.root().join(name);
        let mut content = String::new();

        for row in data {
            content.push_str(&row.join(","));
            content.push('\n');
        }

        fs::write(&path, content)?;
        Ok(path)
    }

    /// Create a test CSV file with raw string content
    pub fn create_csv_raw(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.root().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    /// Path for an output file inside the fixture
    pub fn path(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Read a JSON report written by `compare --output`
    pub fn read_json(&self, name: &str) -> serde_json::Value {
        let content = fs::read_to_string(self.path(name)).expect("report should exist");
        serde_json::from_str(&content).expect("report should be valid JSON")
    }
}

/// Helper for running CLI commands in tests
pub struct CliTestRunner {
    fixture: TestFixture,
}

impl CliTestRunner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            fixture: TestFixture::new()?,
        })
    }

    pub fn fixture(&self) -> &TestFixture {
        &self.fixture
    }

    /// Run a quarterdiff command and return the result
    pub fn run_command(&self, args: &[&str]) -> Result<()> {
        use clap::Parser;
        use quarterdiff::cli::Cli;
        use quarterdiff::commands::execute_command;

        let mut cmd_args = vec!["quarterdiff"];
        cmd_args.extend(args);

        let cli = Cli::try_parse_from(cmd_args)
            .map_err(|e| quarterdiff::QuarterdiffError::invalid_input(e.to_string()))?;

        execute_command(cli.command, cli.config.as_deref())
    }

    /// Run a command and expect it to succeed
    pub fn expect_success(&self, args: &[&str]) {
        self.run_command(args).expect("Command should succeed");
    }

    /// Run a command and expect it to fail
    pub fn expect_failure(&self, args: &[&str]) -> quarterdiff::QuarterdiffError {
        self.run_command(args).expect_err("Command should fail")
    }
}

/// Sample data generators for testing
pub mod sample_data {
    /// Older quarter, key in column B
    pub fn q1_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Region", "OB Main ID", "Status", "Notes", "Budget"],
            vec!["North", "1001", "Open", "on track", "100"],
            vec!["South", "1002", "Open", "waiting on vendor", "250"],
            vec!["East", "1003", "Closed", "done", "75"],
        ]
    }

    /// Newer quarter: one status change, one cleared budget, one new project
    pub fn q2_data() -> Vec<Vec<&'static str>> {
        vec![
            vec!["Region", "OB Main ID", "Status", "Notes", "Budget"],
            vec!["North", "1001", "Open", "on track", "100"],
            vec!["South", "1002", "Closed", "waiting on legal", ""],
            vec!["East", "1003", "Closed", "done", "75"],
            vec!["West", "2002", "Open", "kickoff", "40"],
        ]
    }
}
