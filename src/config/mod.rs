use crate::core::autosave::DEFAULT_DEBOUNCE;
use crate::errors::{AppError, AppResult};
use crate::utils::path;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Where the authoritative rows live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RemoteConfig {
    /// Relational backend in a SQLite file.
    Sqlite { path: String },
    /// Hosted PostgREST backend.
    Rest { url: String, api_key: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Local (offline) store.
    pub database: String,
    pub remote: RemoteConfig,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_log_window")]
    pub log_window_days: u32,
    #[serde(default = "default_history_days")]
    pub history_fetch_days: u32,
    #[serde(default = "default_autosave_ms")]
    pub autosave_debounce_ms: u64,
}

fn default_log_window() -> u32 {
    14
}
fn default_history_days() -> u32 {
    365
}
fn default_autosave_ms() -> u64 {
    DEFAULT_DEBOUNCE.as_millis() as u64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            remote: RemoteConfig::Sqlite {
                path: Self::remote_file().to_string_lossy().to_string(),
            },
            user: None,
            log_window_days: default_log_window(),
            history_fetch_days: default_history_days(),
            autosave_debounce_ms: default_autosave_ms(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("practicelog")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".practicelog")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("practicelog.conf")
    }

    /// Return the full path of the local SQLite store
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("practicelog.sqlite")
    }

    /// Default self-hosted remote store
    pub fn remote_file() -> PathBuf {
        Self::config_dir().join("practicelog-remote.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let mut cfg: Config = serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        cfg.database = path::resolve(&cfg.database);
        if let RemoteConfig::Sqlite { path: p } = &mut cfg.remote {
            *p = path::resolve(p);
        }
        Ok(cfg)
    }

    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;
        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Initialize configuration: write the config file unless `is_test`.
    pub fn init_all(&self, is_test: bool) -> AppResult<()> {
        if let Some(parent) = PathBuf::from(&self.database).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if !is_test {
            self.save()?;
            println!("✅ Config file: {:?}", Self::config_file());
        }
        Ok(())
    }
}
