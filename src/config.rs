use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_delay_min_ms() -> u64 {
    800
}

fn default_delay_max_ms() -> u64 {
    2000
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Band the simulated "assistant is typing" delay is drawn from.
    #[serde(default = "default_delay_min_ms")]
    pub reply_delay_min_ms: u64,
    #[serde(default = "default_delay_max_ms")]
    pub reply_delay_max_ms: u64,
    /// Tracing output goes here when set; the terminal owns stderr.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            reply_delay_min_ms: default_delay_min_ms(),
            reply_delay_max_ms: default_delay_max_ms(),
            log_file: None,
        }
    }

    /// Load the user config, writing a starter file on first run so the
    /// delay band and log path are discoverable.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            let config = Self::new();
            config.save_to(&path)?;
            return Ok(config);
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Delay band in milliseconds, with the upper bound clamped so a
    /// hand-edited config can never produce an empty range.
    pub fn delay_bounds(&self) -> (u64, u64) {
        let min = self.reply_delay_min_ms;
        (min, self.reply_delay_max_ms.max(min))
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("mindmate").join("config.json"))
    }
}
