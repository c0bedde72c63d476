use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// File looked up in the working directory when no config path is given
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// Error type for configuration loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    JsonError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not parse {path}: {source}")]
    TomlError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Read a config file. `.toml` files are parsed as TOML, anything else as
/// JSON. A leading `~` in `base_dir` is expanded to the home directory.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::error!(path = %path.display(), "config file does not exist");
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut config: Config = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&text).map_err(|e| ConfigError::TomlError {
            path: path.to_path_buf(),
            source: e,
        })?
    } else {
        serde_json::from_str(&text).map_err(|e| ConfigError::JsonError {
            path: path.to_path_buf(),
            source: e,
        })?
    };

    config.base_dir = expand_home(&config.base_dir);
    tracing::debug!(base_dir = %config.base_dir.display(), "loaded config");
    Ok(config)
}

/// Resolve the effective config: an explicit file if given, otherwise
/// `config.json` in `cwd` if present, otherwise defaults.
pub fn resolve_config(explicit: Option<&Path>, cwd: &Path) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let fallback = cwd.join(DEFAULT_CONFIG_FILE);
    if fallback.is_file() {
        return read_config(&fallback);
    }
    Ok(Config::default())
}

fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_json_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, r#"{"base_dir": "/srv/tasks"}"#).unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/tasks"));
        assert_eq!(config.trash_dir, "Trash");
    }

    #[test]
    fn test_read_json_ignores_unknown_sections() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(
            &path,
            r#"{"base_dir": "/srv/tasks", "openai": {"model": "gpt-3.5-turbo"}}"#,
        )
        .unwrap();
        assert_eq!(read_config(&path).unwrap().base_dir, PathBuf::from("/srv/tasks"));
    }

    #[test]
    fn test_read_toml_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("lanes.toml");
        fs::write(&path, "base_dir = \"/srv/tasks\"\ntrash_dir = \"Archive\"\n").unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/srv/tasks"));
        assert_eq!(config.trash_dir, "Archive");
    }

    #[test]
    fn test_missing_config_is_error() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            read_config(&tmp.path().join("nope.json")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_json_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        fs::write(&path, "{ invalid json }").unwrap();
        assert!(matches!(read_config(&path), Err(ConfigError::JsonError { .. })));
    }

    #[test]
    fn test_resolve_defaults_and_fallback() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(resolve_config(None, tmp.path()).unwrap(), Config::default());

        fs::write(tmp.path().join("config.json"), r#"{"base_dir": "/data/tasks"}"#).unwrap();
        let config = resolve_config(None, tmp.path()).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/data/tasks"));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home(Path::new("~/tasks")),
                PathBuf::from(home).join("tasks")
            );
        }
    }
}
