/// `load_config` module: reads `~/.dockitrc.json` and merges it with the environment.
///
/// The config file is optional. A missing file means defaults. An unreadable or malformed
/// file is reported with a warning and then also means defaults, so a broken file never
/// stops an upload session.
///
/// Environment variables (after `.env` is loaded in `main`) always win over the file.
use anyhow::{Context, Result};
use dockit_core::config::{Config, FileConfig};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = ".dockitrc.json";

/// `$HOME/.dockitrc.json`, falling back to `%USERPROFILE%` and then the working directory.
pub fn default_config_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .or_else(|| std::env::var_os("USERPROFILE").filter(|h| !h.is_empty()))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(CONFIG_FILE_NAME)
}

/// Reads the file layer. Never fails: problems are logged and yield an empty layer.
pub fn read_file_config(path: &Path) -> FileConfig {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(config_path = ?path, "No config file, using defaults");
            return FileConfig::default();
        }
        Err(e) => {
            warn!(error = %e, config_path = ?path, "Failed to read config file, using defaults");
            return FileConfig::default();
        }
    };

    match serde_json::from_str::<FileConfig>(&content) {
        Ok(file) => {
            info!(config_path = ?path, "Parsed config file");
            file
        }
        Err(e) => {
            warn!(error = %e, config_path = ?path, "Failed to parse config file, using defaults");
            FileConfig::default()
        }
    }
}

/// Resolves the process configuration from `path` (or the default path) and the environment.
pub fn load_config(path: Option<&Path>) -> Config {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);
    info!(config_path = ?path, "Loading configuration");
    let file = read_file_config(&path);
    Config::resolve(file, |var| std::env::var(var).ok())
}

#[derive(Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Writes the default config template to `path` unless a file is already there.
pub fn write_default_config(path: &Path) -> Result<WriteOutcome> {
    let template = FileConfig::template(|var| std::env::var(var).ok());
    let json = serde_json::to_string_pretty(&template).context("Failed to serialize default config")?;

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            info!(config_path = ?path, "Config file already exists, leaving it untouched");
            return Ok(WriteOutcome::AlreadyExists(path.to_path_buf()));
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create config file {}", path.display()));
        }
    };
    file.write_all(json.as_bytes())
        .and_then(|_| file.write_all(b"\n"))
        .with_context(|| format!("Failed to write config file {}", path.display()))?;

    info!(config_path = ?path, "Created default config file");
    Ok(WriteOutcome::Created(path.to_path_buf()))
}
