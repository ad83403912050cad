use chrono::Utc;
use directories::BaseDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::config::data::{path_display, Config};
use crate::core::constants::CONFIG_FILE_NAME;

/// Errors that can occur when loading or saving the state file.
#[derive(Debug)]
pub enum ConfigError {
    /// The state file does not exist; the user has never run `--init`.
    NotFound {
        /// Path that was probed.
        path: PathBuf,
    },

    /// Failed to read the state file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The state file is present but is not the JSON document we expect.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to write the state file to disk.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound { path } => {
                write!(f, "No configuration found at {}", path_display(path))
            }
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Write { path, source } => {
                write!(
                    f,
                    "Failed to write config at {}: {}",
                    path_display(path),
                    source
                )
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::NotFound { .. } => None,
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Write { source, .. } => Some(source),
        }
    }
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

impl Config {
    /// Load persisted state from `config_path`.
    ///
    /// A missing file is [`ConfigError::NotFound`] so the caller can direct
    /// the user to `--init`; malformed content is [`ConfigError::Parse`] and
    /// never falls back to defaults. A zero `updated_at` (never persisted,
    /// or pre-migration data) is normalized to the current time in memory so
    /// the staleness window starts counting from first use.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::NotFound {
                path: config_path.to_path_buf(),
            });
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let mut config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;

        if config.has_zero_timestamp() {
            config.updated_at = Utc::now();
        }

        debug!(
            path = %config_path.display(),
            messages = config.conversation.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Persist the whole document to `config_path`.
    ///
    /// The content is staged in a temp file in the same directory and moved
    /// into place, so the target always holds either the old or the new
    /// complete document. The file is made owner-readable only since the
    /// credential is embedded in plaintext.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        let parent = config_path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());

        if let Some(dir) = parent {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

        let mut temp_file = match parent {
            Some(dir) => NamedTempFile::new_in(dir),
            None => NamedTempFile::new(),
        }
        .map_err(write_err)?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(write_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp_file
                .as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(write_err)?;
        }

        temp_file.as_file_mut().sync_all().map_err(write_err)?;
        temp_file
            .persist(config_path)
            .map_err(|err| write_err(err.error))?;

        debug!(
            path = %config_path.display(),
            messages = self.conversation.len(),
            "saved config"
        );
        Ok(())
    }
}

/// Resolve the fixed state-file location, `~/.explain.json`.
pub fn default_config_path() -> Result<PathBuf, Box<dyn StdError>> {
    let base_dirs = BaseDirs::new().ok_or("Failed to determine home directory")?;
    Ok(base_dirs.home_dir().join(CONFIG_FILE_NAME))
}
