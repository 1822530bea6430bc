use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub import: Option<ImportConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub extractors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportConfig {
    /// "discard" or "record".
    pub failure_policy: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub notice_secs: Option<u64>,
}

/// Platform config directory path: `<config_dir>/text-analyzer/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("text-analyzer").join("config.toml"))
}

/// Load config by cascading CWD `.text-analyzer.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".text-analyzer.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config file");
            None
        }
    }
}

fn pick<S, T>(overlay: &Option<S>, base: &Option<S>, field: impl Fn(&S) -> Option<T>) -> Option<T> {
    overlay
        .as_ref()
        .and_then(&field)
        .or_else(|| base.as_ref().and_then(&field))
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        api: Some(ApiConfig {
            api_key: pick(&overlay.api, &base.api, |a| a.api_key.clone()),
            endpoint: pick(&overlay.api, &base.api, |a| a.endpoint.clone()),
            extractors: pick(&overlay.api, &base.api, |a| a.extractors.clone()),
        }),
        import: Some(ImportConfig {
            failure_policy: pick(&overlay.import, &base.import, |i| {
                i.failure_policy.clone()
            }),
        }),
        display: Some(DisplayConfig {
            theme: pick(&overlay.display, &base.display, |d| d.theme.clone()),
            notice_secs: pick(&overlay.display, &base.display, |d| d.notice_secs),
        }),
    }
}

/// Merge `changes` into the platform config file and save it.
pub fn save_config(changes: ConfigFile) -> Result<PathBuf, CoreError> {
    let path = config_path()
        .ok_or_else(|| CoreError::Config("could not determine config directory".to_string()))?;
    update_at(&path, changes)?;
    Ok(path)
}

/// Merge `changes` over whatever is stored at `path` and write the result.
/// Fields left `None` in `changes` keep their stored value.
pub fn update_at(path: &Path, changes: ConfigFile) -> Result<ConfigFile, CoreError> {
    let merged = match load_from_path(path) {
        Some(existing) => merge(existing, changes),
        None => changes,
    };
    save_to_path(&merged, path)?;
    Ok(merged)
}

pub fn save_to_path(config: &ConfigFile, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)
        .map_err(|e| CoreError::Config(format!("failed to serialize config: {}", e)))?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
