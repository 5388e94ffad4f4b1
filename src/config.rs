use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Session length presets. The limit is fixed before a session starts and
/// immutable while it runs.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    ValueEnum,
    strum_macros::Display,
    Serialize,
    Deserialize,
)]
pub enum TimeLimit {
    #[value(name = "15")]
    #[strum(serialize = "15")]
    #[serde(rename = "15")]
    Secs15,
    #[value(name = "30")]
    #[strum(serialize = "30")]
    #[serde(rename = "30")]
    Secs30,
    #[default]
    #[value(name = "60")]
    #[strum(serialize = "60")]
    #[serde(rename = "60")]
    Secs60,
    #[value(name = "120")]
    #[strum(serialize = "120")]
    #[serde(rename = "120")]
    Secs120,
}

impl TimeLimit {
    pub fn as_secs(&self) -> u64 {
        match self {
            TimeLimit::Secs15 => 15,
            TimeLimit::Secs30 => 30,
            TimeLimit::Secs60 => 60,
            TimeLimit::Secs120 => 120,
        }
    }
}

/// Persisted user preferences. Preferences only; session results never
/// touch durable storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub time_limit: TimeLimit,
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "typr") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("typr_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
