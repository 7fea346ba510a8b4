use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

use super::AppConfig;

const APP_NAME: &str = "DualCommander";
const CONFIG_FILE: &str = "config.json";

/// Returns the platform-specific configuration directory for the application.
pub fn get_config_directory() -> Option<PathBuf> {
    ProjectDirs::from("com", "dualcommander", APP_NAME)
        .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
}

fn resolve_config_directory(config_dir: Option<&Path>) -> Result<PathBuf> {
    match config_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => get_config_directory()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory")),
    }
}

/// Loads the application configuration from `config_dir`, or from the
/// platform directory when `None`.
///
/// A missing file is created with the defaults. A file that cannot be parsed
/// is left alone and the defaults are used instead.
pub fn load_config(config_dir: Option<&Path>) -> Result<AppConfig> {
    let config_path = resolve_config_directory(config_dir)?.join(CONFIG_FILE);

    if !config_path.exists() {
        tracing::info!(
            "Config file not found, creating default config at {:?}",
            config_path
        );
        let default_config = AppConfig::default();
        save_config(&default_config, config_dir)?;
        return Ok(default_config);
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match serde_json::from_str::<AppConfig>(&config_content) {
        Ok(config) => {
            tracing::info!("Loaded config from {:?}", config_path);
            Ok(config)
        }
        Err(e) => {
            tracing::warn!(
                "Failed to parse config file at {:?}: {}. Falling back to default config.",
                config_path,
                e
            );
            Ok(AppConfig::default())
        }
    }
}

/// Saves the provided configuration to `config_dir`, or to the platform
/// directory when `None`.
pub fn save_config(config: &AppConfig, config_dir: Option<&Path>) -> Result<()> {
    let config_dir = resolve_config_directory(config_dir)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
        tracing::info!("Created config directory: {:?}", config_dir);
    }

    let config_path = config_dir.join(CONFIG_FILE);
    let config_json = serde_json::to_string_pretty(config)?;

    fs::write(&config_path, config_json)?;
    tracing::info!("Saved config to {:?}", config_path);

    Ok(())
}

// Platform-specific configuration paths for reference:
// macOS:   ~/Library/Application Support/com.dualcommander.DualCommander/
// Linux:   ~/.config/dualcommander/
// Windows: %APPDATA%/dualcommander/DualCommander/config/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ErrorPolicy;
    use tempfile::tempdir;

    #[test]
    fn test_load_creates_default_when_missing() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("nested");

        let config = load_config(Some(&config_dir)).unwrap();

        assert_eq!(config, AppConfig::default());
        assert!(config_dir.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_save_then_load_keeps_values() {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            left_directory: Some(PathBuf::from("/srv")),
            delete_policy: ErrorPolicy::Strict,
            parallel_delete: true,
            ..Default::default()
        };

        save_config(&config, Some(dir.path())).unwrap();
        let loaded = load_config(Some(dir.path())).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();

        let config = load_config(Some(dir.path())).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_missing_fields() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "show_hidden": true, "delete_policy": "strict" }"#,
        )
        .unwrap();

        let config = load_config(Some(dir.path())).unwrap();

        assert!(config.show_hidden);
        assert_eq!(config.delete_policy, ErrorPolicy::Strict);
        assert_eq!(config.left_directory, None);
    }
}
