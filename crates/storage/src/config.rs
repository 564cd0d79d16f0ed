//! Startup settings shared by the desktop app and the maintenance CLI.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::SortKey;

use crate::DEFAULT_STORAGE_KEY;

pub const DEFAULT_CONFIG_PATH: &str = "notes.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupConfig {
    pub data_dir: Option<PathBuf>,
    pub storage_key: String,
    pub default_sort: SortKey,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_sort: SortKey::Newest,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    data_dir: Option<PathBuf>,
    storage_key: Option<String>,
    default_sort: Option<String>,
}

/// Values given on the command line; they win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub data_dir: Option<PathBuf>,
    pub storage_key: Option<String>,
    pub sort: Option<String>,
}

/// Defaults, then `notes.toml`, then `NOTES_*` / `APP__*` variables, then the command line.
pub fn load_startup_config(
    config_path: &Path,
    overrides: &CliOverrides,
) -> anyhow::Result<StartupConfig> {
    let mut config = StartupConfig::default();

    if let Some(file_cfg) = read_config_file(config_path)? {
        apply_file_config(&mut config, file_cfg);
    }
    apply_env(&mut config, |name| std::env::var(name).ok());
    apply_overrides(&mut config, overrides);

    Ok(config)
}

fn read_config_file(path: &Path) -> anyhow::Result<Option<FileConfig>> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };

    let parsed = toml::from_str::<FileConfig>(&raw)
        .with_context(|| format!("invalid config file '{}'", path.display()))?;
    Ok(Some(parsed))
}

fn apply_file_config(config: &mut StartupConfig, file_cfg: FileConfig) {
    if let Some(v) = file_cfg.data_dir {
        config.data_dir = Some(v);
    }
    if let Some(v) = file_cfg.storage_key {
        config.storage_key = v;
    }
    if let Some(v) = file_cfg.default_sort {
        config.default_sort = SortKey::from_selector(&v);
    }
}

fn apply_env(config: &mut StartupConfig, lookup: impl Fn(&str) -> Option<String>) {
    let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    for name in ["NOTES_DATA_DIR", "APP__DATA_DIR"] {
        if let Some(v) = non_empty(name) {
            config.data_dir = Some(PathBuf::from(v));
        }
    }
    for name in ["NOTES_STORAGE_KEY", "APP__STORAGE_KEY"] {
        if let Some(v) = non_empty(name) {
            config.storage_key = v;
        }
    }
    for name in ["NOTES_DEFAULT_SORT", "APP__DEFAULT_SORT"] {
        if let Some(v) = non_empty(name) {
            config.default_sort = SortKey::from_selector(v.trim());
        }
    }
}

fn apply_overrides(config: &mut StartupConfig, overrides: &CliOverrides) {
    if let Some(v) = &overrides.data_dir {
        config.data_dir = Some(v.clone());
    }
    if let Some(v) = &overrides.storage_key {
        config.storage_key = v.clone();
    }
    if let Some(v) = &overrides.sort {
        config.default_sort = SortKey::from_selector(v);
    }
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_root: PathBuf,
    pub kv_dir: PathBuf,
}

impl AppPaths {
    pub fn from_startup(startup: &StartupConfig) -> anyhow::Result<Self> {
        let root = if let Some(p) = &startup.data_dir {
            p.clone()
        } else {
            let base = dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("unable to resolve local app data dir"))?;
            base.join("post_notes")
        };

        Ok(Self {
            kv_dir: root.join("kv"),
            data_root: root,
        })
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
