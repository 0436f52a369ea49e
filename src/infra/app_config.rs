use crate::domain::ReviewRule;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_timeout_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Reviewer command to spawn (resolved on PATH).
    pub agent_cmd: Option<String>,
    /// Extra arguments passed to the reviewer command.
    #[serde(default)]
    pub agent_args: Vec<String>,
    /// Upper bound on the reviewer call before the run is aborted.
    #[serde(default = "default_timeout_secs")]
    pub agent_timeout_secs: u64,
    /// Reviewer rules forwarded to the collaborator per run.
    #[serde(default)]
    pub rules: Vec<ReviewRule>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            agent_cmd: None,
            agent_args: Vec::new(),
            agent_timeout_secs: default_timeout_secs(),
            rules: Vec::new(),
        }
    }
}

pub fn load_config() -> AppConfig {
    let path = config_path();
    let Ok(contents) = std::fs::read_to_string(&path) else {
        return AppConfig::default();
    };
    toml::from_str(&contents).unwrap_or_default()
}

fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("RECHECK_CONFIG_PATH") {
        return PathBuf::from(path);
    }

    app_data_dir().join("config.toml")
}

fn app_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("RECHECK_DATA_HOME") {
        return PathBuf::from(path);
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = home::home_dir() {
            return home
                .join("Library")
                .join("Application Support")
                .join("recheck");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("recheck");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Some(xdg) = std::env::var_os("XDG_DATA_HOME") {
            return PathBuf::from(xdg).join("recheck");
        }
        if let Some(home) = home::home_dir() {
            return home.join(".local").join("share").join("recheck");
        }
    }

    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".recheck")
}
