//! Configuration resolution for sweather
//!
//! Data folder resolution follows a 4-tier priority order:
//! 1. Command-line argument (highest priority)
//! 2. `SWEATHER_DATA` environment variable
//! 3. TOML config file (`~/.config/sweather/config.toml`)
//! 4. OS-dependent compiled default (fallback)
//!
//! The Gemini API key resolves env → TOML; it is never written to the
//! wardrobe store.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default model for all three gateway operations
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Optional TOML config file contents
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub data_folder: Option<String>,
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
}

/// Load the TOML config file if one exists on the platform
pub fn load_toml_config() -> Option<TomlConfig> {
    let path = config_file_path()?;
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<TomlConfig>(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!("Ignoring unparsable config file {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            None
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sweather").join("config.toml"))
}

/// Resolve the data folder using the 4-tier priority order
pub fn resolve_data_folder(cli_arg: Option<&Path>, toml_config: Option<&TomlConfig>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var("SWEATHER_DATA") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(folder) = toml_config.and_then(|c| c.data_folder.as_deref()) {
        return PathBuf::from(folder);
    }

    // Priority 4: OS-dependent default
    default_data_folder()
}

/// OS-dependent default data folder path
fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("sweather"))
        .unwrap_or_else(|| PathBuf::from("./sweather_data"))
}

/// Create the data folder if missing
pub fn ensure_data_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        std::fs::create_dir_all(folder)?;
        info!("Created data folder: {}", folder.display());
    }
    Ok(())
}

/// Path of the SQLite database inside the data folder
pub fn database_path(folder: &Path) -> PathBuf {
    folder.join("sweather.db")
}

/// Resolve the Gemini API key: `GEMINI_API_KEY` env var → TOML config
pub fn resolve_api_key(toml_config: Option<&TomlConfig>) -> Result<String> {
    if let Ok(key) = std::env::var("GEMINI_API_KEY") {
        if is_valid_key(&key) {
            info!("Gemini API key loaded from environment variable");
            return Ok(key.trim().to_string());
        }
    }

    if let Some(key) = toml_config.and_then(|c| c.gemini_api_key.as_deref()) {
        if is_valid_key(key) {
            info!("Gemini API key loaded from TOML config");
            return Ok(key.trim().to_string());
        }
    }

    Err(Error::Config(
        "Gemini API key not configured. Please configure using one of:\n\
         1. Environment: GEMINI_API_KEY=your-key-here\n\
         2. TOML config: ~/.config/sweather/config.toml (gemini_api_key = \"your-key\")\n\
         \n\
         Obtain API key at: https://aistudio.google.com/apikey"
            .to_string(),
    ))
}

/// Resolve the model name: `SWEATHER_MODEL` env var → TOML config → default
pub fn resolve_model(toml_config: Option<&TomlConfig>) -> String {
    if let Ok(model) = std::env::var("SWEATHER_MODEL") {
        if !model.trim().is_empty() {
            return model.trim().to_string();
        }
    }
    toml_config
        .and_then(|c| c.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_takes_priority() {
        let toml = TomlConfig {
            data_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };
        let folder = resolve_data_folder(Some(Path::new("/from/cli")), Some(&toml));
        assert_eq!(folder, PathBuf::from("/from/cli"));
    }

    #[test]
    fn test_toml_folder_used_when_no_cli_arg() {
        let toml = TomlConfig {
            data_folder: Some("/from/toml".to_string()),
            ..Default::default()
        };
        // Assumes SWEATHER_DATA unset in the test environment
        if std::env::var("SWEATHER_DATA").is_err() {
            let folder = resolve_data_folder(None, Some(&toml));
            assert_eq!(folder, PathBuf::from("/from/toml"));
        }
    }

    #[test]
    fn test_model_defaults_to_flash() {
        if std::env::var("SWEATHER_MODEL").is_err() {
            assert_eq!(resolve_model(None), DEFAULT_MODEL);
        }
    }

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }
}
