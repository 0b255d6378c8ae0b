use crate::cli::Args;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings that can be stored in a JSON file instead of passed as flags
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub convert_path: Option<String>,
    pub temp_dir: Option<String>,
    pub extensions: Option<String>,
    pub jobs: Option<usize>,
    pub verbose: Option<bool>,
    pub skip_existing: Option<bool>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

impl Args {
    /// Load configuration from a JSON file and merge with command-line arguments
    /// Command-line arguments take precedence over config file values
    pub fn load_and_merge_config(&mut self) -> Result<()> {
        if let Some(config_path) = self.config_file.clone() {
            let config = ConfigFile::load(&config_path)?;
            self.merge_from_config(config);

            if self.verbose {
                eprintln!("Loaded configuration from: {:?}", config_path);
            }
        }
        Ok(())
    }

    fn merge_from_config(&mut self, config: ConfigFile) {
        if self.convert_path.is_none() {
            self.convert_path = config.convert_path.map(PathBuf::from);
        }
        if self.temp_dir.is_none() {
            self.temp_dir = config.temp_dir.map(PathBuf::from);
        }
        if self.extensions_str.is_none() {
            self.extensions_str = config.extensions;
        }
        if self.jobs_opt.is_none() {
            self.jobs_opt = config.jobs;
        }

        // Boolean flags can only be switched on from the file
        self.verbose |= config.verbose.unwrap_or(false);
        self.skip_existing |= config.skip_existing.unwrap_or(false);
    }
}
