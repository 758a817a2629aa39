use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pollen_types::config::AppConfig;
use tracing::info;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".pollen";

const CONFIG_FILE: &str = "config.toml";

/// Required subdirectories inside the dotfolder.
const SUBDIRS: &[&str] = &["plots"];

/// Resolve the root path: `$HOME/.pollen/`.
pub fn root_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

/// Resolve a path relative to the dotfolder root.
pub fn resolve(relative: &str) -> Result<PathBuf> {
    Ok(root_dir()?.join(relative))
}

pub fn config_path() -> Result<PathBuf> {
    resolve(CONFIG_FILE)
}

/// Ensure the dotfolder exists with a default `config.toml`.
/// Idempotent, called on every launch.
///
/// ```text
/// $HOME/.pollen/
/// ├── config.toml
/// └── plots/        (default lineplot output)
/// ```
pub fn init_workspace() -> Result<()> {
    init_workspace_at(&root_dir()?)
}

pub fn init_workspace_at(root: &Path) -> Result<()> {
    for sub in SUBDIRS {
        let dir = root.join(sub);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            info!("created directory: {}", dir.display());
        }
    }

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        let toml_str = AppConfig::default()
            .to_toml_string()
            .context("Failed to serialize default config")?;
        fs::write(&config_path, &toml_str)
            .with_context(|| format!("Failed to write {}", config_path.display()))?;
        info!("created default config: {}", config_path.display());
    }

    Ok(())
}

/// Load the config from disk.
pub fn load_config() -> Result<AppConfig> {
    load_config_from(&root_dir()?)
}

/// Load `config.toml` under `root`. An unparseable file is regenerated
/// with defaults, keeping `api.url` if it can still be read.
pub fn load_config_from(root: &Path) -> Result<AppConfig> {
    let config_path = root.join(CONFIG_FILE);
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match AppConfig::from_toml_str(&raw) {
        Ok(config) => Ok(config),
        Err(_) => {
            info!("config.toml outdated, migrating to new schema");
            let mut new_config = AppConfig::default();

            if let Ok(old) = raw.parse::<toml::Table>() {
                if let Some(url) = old
                    .get("api")
                    .and_then(|v| v.as_table())
                    .and_then(|api| api.get("url"))
                    .and_then(|v| v.as_str())
                {
                    new_config.api.url = url.to_string();
                }
            }

            save_config_to(root, &new_config)?;
            info!("config migrated successfully");
            Ok(new_config)
        }
    }
}

/// Write the config back to disk.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&root_dir()?, config)
}

pub fn save_config_to(root: &Path, config: &AppConfig) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(&config_path, &toml_str)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollen_common::constants::DEFAULT_API_URL;
    use pollen_common::types::RenderMode;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("pollen-ws-{}-{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_root_dir_under_home() {
        let root = root_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(root, home.join(".pollen"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let path = config_path().unwrap();
        assert!(path.ends_with("config.toml"));
        assert!(path.starts_with(root_dir().unwrap()));
    }

    #[test]
    fn test_init_workspace_idempotent() {
        let root = scratch("init");
        init_workspace_at(&root).unwrap();
        init_workspace_at(&root).unwrap();
        assert!(root.join(CONFIG_FILE).is_file());
        for sub in SUBDIRS {
            assert!(root.join(sub).is_dir(), "{sub} directory should exist");
        }
        let config = load_config_from(&root).unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let root = scratch("keep");
        fs::write(root.join(CONFIG_FILE), "[api]\nurl = \"https://pollen.example.lu\"\n").unwrap();
        init_workspace_at(&root).unwrap();
        let config = load_config_from(&root).unwrap();
        assert_eq!(config.api.url, "https://pollen.example.lu");
    }

    #[test]
    fn test_load_and_save_config() {
        let root = scratch("roundtrip");
        init_workspace_at(&root).unwrap();
        let mut config = load_config_from(&root).unwrap();
        config.system.verbose = true;
        config.system.mode = RenderMode::Ssr;
        config.api.timeout_secs = Some(15);
        save_config_to(&root, &config).unwrap();

        let reloaded = load_config_from(&root).unwrap();
        assert!(reloaded.system.verbose);
        assert_eq!(reloaded.system.mode, RenderMode::Ssr);
        assert_eq!(reloaded.api.timeout_secs, Some(15));
    }

    #[test]
    fn test_migration_preserves_url() {
        let root = scratch("migrate");
        fs::write(
            root.join(CONFIG_FILE),
            "[api]\nurl = \"http://10.0.0.5:8000\"\n\n[system]\nverbose = \"yes\"\n",
        )
        .unwrap();

        let config = load_config_from(&root).unwrap();
        assert_eq!(config.api.url, "http://10.0.0.5:8000");
        assert!(!config.system.verbose);

        // The migrated file now parses cleanly.
        let raw = fs::read_to_string(root.join(CONFIG_FILE)).unwrap();
        assert!(AppConfig::from_toml_str(&raw).is_ok());
    }

    #[test]
    fn test_migration_from_garbage() {
        let root = scratch("garbage");
        fs::write(root.join(CONFIG_FILE), "not toml at all [[[").unwrap();
        let config = load_config_from(&root).unwrap();
        assert_eq!(config.api.url, DEFAULT_API_URL);
    }

    #[test]
    fn test_load_missing_file_errors() {
        let root = scratch("missing");
        assert!(load_config_from(&root).is_err());
    }
}
