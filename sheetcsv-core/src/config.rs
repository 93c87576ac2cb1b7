//! Configuration system for the conversion front end

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main converter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

impl ConverterConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: ConverterConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path of the CSV file written for `input`
    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let csv_path = input.with_extension("csv");
        match (&self.output.directory, csv_path.file_name()) {
            (Some(dir), Some(file_name)) => dir.join(file_name),
            _ => csv_path,
        }
    }
}

/// Where and how CSV files are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for CSV files (defaults to the input file's directory)
    #[serde(default)]
    pub directory: Option<PathBuf>,
    /// Replace existing CSV files
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            overwrite: default_overwrite(),
        }
    }
}

fn default_overwrite() -> bool {
    true
}
