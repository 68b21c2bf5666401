//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::report::ReportDir;
use crate::Config;
use tempfile::TempDir;

/// Test environment with a temporary project directory and a `Config` without credentials.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        crate::utils::make_dir(&root).await.unwrap();
        let config = Config::from_lookup(&root, |_| None);
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn report_dir(&self) -> ReportDir {
        ReportDir::new(self.config.project_dir())
    }

    /// Reads the report labeled `label` and returns its rows. Each row must have a single field.
    pub async fn read_report(&self, label: &str) -> Vec<String> {
        let path = self.report_dir().report_path(label);
        let data = crate::utils::read(&path).await.unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(data.as_bytes());
        reader
            .records()
            .map(|row| {
                let row = row.unwrap();
                assert_eq!(row.len(), 1, "{row:?}");
                row[0].to_string()
            })
            .collect()
    }
}
