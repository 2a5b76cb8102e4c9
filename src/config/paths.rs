//! Path management for AIMS
//!
//! Provides XDG-compliant path resolution for configuration, data, and logs.
//! Each domain (health, finance, projects, personal development) is its own
//! storage unit with its own file.
//!
//! ## Path Resolution Order
//!
//! 1. `AIMS_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/aims` or `~/.config/aims`
//! 3. Windows: `%APPDATA%\aims`

use std::path::PathBuf;

use crate::error::AimsError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "AIMS_DATA_DIR";

/// Manages all paths used by AIMS
#[derive(Debug, Clone)]
pub struct AimsPaths {
    base_dir: PathBuf,
}

impl AimsPaths {
    /// Create a new AimsPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, AimsError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create AimsPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/aims/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (~/.config/aims/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the log directory (~/.config/aims/logs/)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Health storage unit (daily logs, imported records)
    pub fn health_file(&self) -> PathBuf {
        self.data_dir().join("health.json")
    }

    /// Finance storage unit (transactions, budgets, assets, liabilities, goals)
    pub fn finance_file(&self) -> PathBuf {
        self.data_dir().join("finance.json")
    }

    /// Projects storage unit (projects, tasks, time logs)
    pub fn projects_file(&self) -> PathBuf {
        self.data_dir().join("projects.json")
    }

    /// Personal development storage unit
    pub fn development_file(&self) -> PathBuf {
        self.data_dir().join("personal_development.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), AimsError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AimsError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AimsError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if AIMS has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, AimsError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME")
                .map_err(|_| AimsError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("aims"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, AimsError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| AimsError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("aims"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(paths.log_dir(), temp_dir.path().join("logs"));
    }

    #[test]
    fn test_one_file_per_storage_unit() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let data = temp_dir.path().join("data");

        assert_eq!(paths.health_file(), data.join("health.json"));
        assert_eq!(paths.finance_file(), data.join("finance.json"));
        assert_eq!(paths.projects_file(), data.join("projects.json"));
        assert_eq!(
            paths.development_file(),
            data.join("personal_development.json")
        );
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
