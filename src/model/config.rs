use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Name of the holding directory for archived tasks
pub const DEFAULT_TRASH_DIR: &str = "Trash";

/// Board configuration, read from `config.json` or a TOML file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per lane
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    /// Directory (under `base_dir`) that archived tasks are moved into
    #[serde(default = "default_trash_dir")]
    pub trash_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_dir: default_base_dir(),
            trash_dir: default_trash_dir(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_trash_dir() -> String {
    DEFAULT_TRASH_DIR.to_string()
}
