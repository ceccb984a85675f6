//! Diagnostics configuration.
//!
//! Read from `$XDG_CONFIG_HOME/kodi/diagnostics.toml` when present:
//!
//! ```toml
//! undefined_variables = true
//! globals = ["request", "env"]
//! marker_width = 10
//! source = "KodiScript"
//! debounce_ms = 500
//! ```
//!
//! Every key is optional; a missing file means all defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Run the undefined-variable pass.
    pub undefined_variables: bool,
    /// Names the host injects into every script (never reported as undefined).
    pub globals: Vec<String>,
    /// Columns covered by an editor marker.
    pub marker_width: u32,
    /// Source label attached to markers.
    pub source: String,
    /// Quiet period before a changed buffer is validated.
    pub debounce_ms: u64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            undefined_variables: true,
            globals: Vec::new(),
            marker_width: 10,
            source: "KodiScript".to_string(),
            debounce_ms: 500,
        }
    }
}

impl DiagnosticsConfig {
    /// Syntax errors only.
    pub fn syntax_only() -> Self {
        Self {
            undefined_variables: false,
            ..Self::default()
        }
    }

    /// Defaults plus host-provided globals.
    pub fn with_globals<I, S>(globals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            globals: globals.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from [`default_path`].
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&default_path())
    }
}

/// The config directory.
///
/// Uses `$XDG_CONFIG_HOME/kodi` or falls back to `~/.config/kodi`.
pub fn config_dir() -> PathBuf {
    BaseDirs::new()
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| home_fallback().join(".config"))
        .join("kodi")
}

/// `config_dir()/diagnostics.toml`
pub fn default_path() -> PathBuf {
    config_dir().join("diagnostics.toml")
}

fn home_fallback() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
