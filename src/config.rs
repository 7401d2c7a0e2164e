//! Configuration for pelagia-progress

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::LessonCatalog;
use crate::error::ProgressError;

/// Default storage directory
pub fn default_storage_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pelagia-progress")
}

fn default_max_pool_size() -> u32 {
    8
}

/// Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Storage directory for the progress database
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Path to a lesson catalog TOML file; the bundled catalog is used
    /// when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Maximum connections in the database pool
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
            catalog_path: None,
            max_pool_size: default_max_pool_size(),
        }
    }
}

impl Config {
    /// Load config from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProgressError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ProgressError::Config(format!("Parse failed: {}", e)))
    }

    /// Save config to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ProgressError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ProgressError::Config(format!("Serialize failed: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the lesson catalog this config points at
    pub fn catalog(&self) -> Result<LessonCatalog, ProgressError> {
        match &self.catalog_path {
            Some(path) => LessonCatalog::load(path),
            None => LessonCatalog::builtin(),
        }
    }

    /// Get progress database path
    pub fn database_path(&self) -> PathBuf {
        self.storage_dir.join("progress.db")
    }

    /// Get config file path
    pub fn config_path(&self) -> PathBuf {
        self.storage_dir.join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.catalog_path.is_none());
        assert_eq!(config.max_pool_size, 8);
        assert!(config.database_path().ends_with("progress.db"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let config = Config {
            storage_dir: PathBuf::from("/var/lib/pelagia"),
            catalog_path: Some(PathBuf::from("/etc/pelagia/catalog.toml")),
            max_pool_size: 4,
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.storage_dir, config.storage_dir);
        assert_eq!(loaded.catalog_path, config.catalog_path);
        assert_eq!(loaded.max_pool_size, 4);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_pool_size = 2\n").unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.max_pool_size, 2);
        assert!(loaded.catalog_path.is_none());
        assert_eq!(loaded.storage_dir, default_storage_dir());
    }

    #[test]
    fn test_default_catalog_is_builtin() {
        let config = Config::default();
        let catalog = config.catalog().unwrap();
        assert!(catalog.contains_lesson("ocean-literacy-principle-1"));
    }
}
