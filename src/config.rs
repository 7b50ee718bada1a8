use crate::error::{RankError, Result};
use crate::sync::BackoffPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = ".valuerank.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub backup: BackupSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub remote: RemoteSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_path")]
    pub path: String,

    /// Cap on the total bytes held in local storage. Zero disables the cap.
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

fn default_path() -> String {
    ".valuerank".to_string()
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_path(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    #[serde(default = "default_backup_key")]
    pub key: String,

    #[serde(default = "default_expiry_hours")]
    pub expiry_hours: u64,
}

fn default_backup_key() -> String {
    "values_backup".to_string()
}

fn default_expiry_hours() -> u64 {
    24
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            key: default_backup_key(),
            expiry_hours: default_expiry_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_factor")]
    pub factor: f64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Total attempts per remote write, the first try included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_factor() -> f64 {
    1.5
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    4
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            base_delay_ms: default_base_delay_ms(),
            factor: default_factor(),
            max_delay_ms: default_max_delay_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl SyncSettings {
    pub fn backoff_policy(&self) -> BackoffPolicy {
        BackoffPolicy {
            base_delay: Duration::from_millis(self.base_delay_ms),
            factor: self.factor,
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_attempts: self.max_attempts.max(1),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of a running `valuerank serve`. Empty means the local document store.
    #[serde(default)]
    pub url: String,
}

impl RemoteSettings {
    pub fn url(&self) -> Option<&str> {
        let url = self.url.trim();
        if url.is_empty() { None } else { Some(url) }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    4000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Filter used when `RUST_LOG` is unset: a level, or full directives.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON log file, relative to the data directory. Empty disables it.
    #[serde(default)]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: String::new(),
        }
    }
}

impl RankConfig {
    pub fn load(start_path: &Path) -> Result<(Self, PathBuf)> {
        let config_path = Self::find_config_file(start_path)?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<(Self, PathBuf)> {
        let content = std::fs::read_to_string(config_path)?;
        let config: RankConfig = toml::from_str(&content)?;
        config.validate()?;
        let project_root = config_path
            .parent()
            .ok_or_else(|| RankError::Config("Config file has no parent directory".to_string()))?
            .to_path_buf();
        Ok((config, project_root))
    }

    pub fn find_config_file(start_path: &Path) -> Result<PathBuf> {
        let mut current = start_path.to_path_buf();
        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }
            if !current.pop() {
                return Err(RankError::NotInitialized);
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.sync.factor < 1.0 {
            return Err(RankError::Config(format!(
                "sync.factor must be at least 1.0, got {}",
                self.sync.factor
            )));
        }
        if self.backup.key.trim().is_empty() {
            return Err(RankError::Config("backup.key cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn data_path(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.storage.path)
    }

    pub fn local_storage_path(&self, project_root: &Path) -> PathBuf {
        self.data_path(project_root).join("local")
    }

    pub fn document_store_path(&self, project_root: &Path) -> PathBuf {
        self.data_path(project_root).join("store")
    }

    pub fn log_file_path(&self, project_root: &Path) -> Option<PathBuf> {
        let file = self.logging.file.trim();
        if file.is_empty() {
            None
        } else {
            Some(self.data_path(project_root).join(file))
        }
    }

    pub fn catalog_path(&self, project_root: &Path) -> Option<PathBuf> {
        let path = self.catalog.path.trim();
        if path.is_empty() {
            None
        } else {
            Some(project_root.join(path))
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| RankError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
