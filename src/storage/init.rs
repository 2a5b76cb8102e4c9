//! First-run setup

use crate::config::paths::AimsPaths;
use crate::config::settings::Settings;
use crate::error::AimsResult;

use super::data::{DevelopmentData, FinanceData, HealthData, ProjectsData};
use super::file_io::write_json_atomic;

/// Create the directory layout, empty unit files and default settings
///
/// Existing files are left untouched. Returns `true` when this call wrote
/// the settings file (a fresh installation).
pub fn initialize_storage(paths: &AimsPaths) -> AimsResult<bool> {
    paths.ensure_directories()?;

    if !paths.health_file().exists() {
        write_json_atomic(paths.health_file(), &HealthData::default())?;
    }
    if !paths.finance_file().exists() {
        write_json_atomic(paths.finance_file(), &FinanceData::default())?;
    }
    if !paths.projects_file().exists() {
        write_json_atomic(paths.projects_file(), &ProjectsData::default())?;
    }
    if !paths.development_file().exists() {
        write_json_atomic(paths.development_file(), &DevelopmentData::default())?;
    }

    if paths.is_initialized() {
        return Ok(false);
    }

    Settings::default().save(paths)?;
    log::info!("Initialized AIMS data at {}", paths.base_dir().display());
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());
        assert!(paths.finance_file().exists());
        assert!(paths.development_file().exists());

        assert!(!initialize_storage(&paths).unwrap());
    }
}
