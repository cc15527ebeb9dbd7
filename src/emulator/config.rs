// Emulator configuration
//
// Loaded from and saved to a TOML file. Everything has a default so a
// missing file just means a stock NTSC setup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// TV standard the emulated console is wired for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TvStandard {
    #[default]
    Ntsc,
    Pal,
}

/// Emulator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    /// TV standard (drives the master clock and frame timing)
    pub tv_standard: TvStandard,

    /// Run the slave SH-2 as well
    pub run_slave_sh2: bool,

    /// Record an execution trace of the master SH-2
    pub trace_execution: bool,

    /// Boot ROM image to load, when present
    pub boot_rom_path: Option<PathBuf>,

    /// Frame budget for the headless runner (None = run until stopped)
    pub frames_to_run: Option<u64>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            tv_standard: TvStandard::Ntsc,
            run_slave_sh2: false,
            trace_execution: false,
            boot_rom_path: None,
            frames_to_run: None,
        }
    }
}

/// Configuration loading/saving errors
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {}", e),
            ConfigError::Parse(e) => write!(f, "config parse error: {}", e),
            ConfigError::Serialize(e) => write!(f, "config serialize error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl EmulatorConfig {
    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(ConfigError::Parse)
    }

    /// Load from a TOML file, falling back to defaults when it is missing
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(ConfigError::Io(_)) => Self::default(),
            Err(e) => {
                log::warn!("Invalid configuration file: {}", e);
                Self::default()
            }
        }
    }

    /// Save to a TOML file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let text = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}
