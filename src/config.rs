// Configuration file handling

use crate::backend::{FileBackend, KvBackend, MemoryBackend, SqliteBackend};
use eyre::{Context, Result, eyre};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const APP_DIR: &str = "tasktracker";
const CONFIG_FILE: &str = "tasktracker.yml";
const DB_FILE: &str = "tasktracker.db";

/// Which key-value backend to persist through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::File => write!(f, "file"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(BackendKind::Sqlite),
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown backend: {} (expected sqlite, file or memory)", other)),
        }
    }
}

/// Contents of `tasktracker.yml`; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendKind,
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// `<config_dir>/tasktracker/tasktracker.yml`, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`Config::default_path`] when `None`
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = ?path, "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).with_context(|| format!("Failed to read config {:?}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config {:?}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Configured data directory, falling back to the platform data dir
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| eyre!("Could not determine data directory; set data_dir in the config"))
    }

    /// Open the configured backend
    pub fn open_backend(&self) -> Result<Box<dyn KvBackend>> {
        let backend: Box<dyn KvBackend> = match self.backend {
            BackendKind::Memory => Box::new(MemoryBackend::new()),
            BackendKind::File => Box::new(FileBackend::open(self.resolved_data_dir()?)?),
            BackendKind::Sqlite => Box::new(SqliteBackend::open(self.resolved_data_dir()?.join(DB_FILE))?),
        };
        debug!(backend = %self.backend, "Opened storage backend");
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_yaml() {
        let config = Config::from_yaml("backend: file\ndata_dir: /tmp/tasks\n").unwrap();
        assert_eq!(config.backend, BackendKind::File);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/tasks")));
    }

    #[test]
    fn test_from_yaml_partial_and_empty() {
        let config = Config::from_yaml("data_dir: /srv/tasks\n").unwrap();
        assert_eq!(config.backend, BackendKind::Sqlite);

        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_from_yaml_invalid_backend() {
        assert!(Config::from_yaml("backend: redis\n").is_err());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.yml");
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("tasktracker.yml");
        fs::write(&path, "backend: memory\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_open_backend_file_and_sqlite() {
        let temp = TempDir::new().unwrap();

        let config = Config {
            backend: BackendKind::File,
            data_dir: Some(temp.path().join("files")),
        };
        let mut backend = config.open_backend().unwrap();
        backend.set("taskTracker_tasks", "[]").unwrap();
        assert!(temp.path().join("files").join("taskTracker_tasks.json").exists());

        let config = Config {
            backend: BackendKind::Sqlite,
            data_dir: Some(temp.path().join("db")),
        };
        let mut backend = config.open_backend().unwrap();
        backend.set("taskTracker_tasks", "[]").unwrap();
        assert!(temp.path().join("db").join(DB_FILE).exists());
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("SQLite".parse::<BackendKind>().unwrap(), BackendKind::Sqlite);
        assert_eq!(BackendKind::File.to_string(), "file");
        assert!("redis".parse::<BackendKind>().is_err());
    }
}
