//! Optional TOML defaults for the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use keystamp_core::Platform;
use serde::{Deserialize, Serialize};

const DEFAULT_OFFSETS_FILE: &str = "offsets.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Info file used when `--offsets` is not given
    pub offsets_file: Option<PathBuf>,
    /// Platform used when `--platform` is not given
    pub platform: Option<Platform>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn platform(&self, explicit: Option<Platform>) -> Platform {
        explicit.or(self.platform).unwrap_or(Platform::Windows)
    }

    pub fn offsets_file(&self, explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .or_else(|| self.offsets_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OFFSETS_FILE))
    }
}
