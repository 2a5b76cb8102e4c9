//! Storage layer for AIMS
//!
//! Four independent storage units (health, finance, projects, personal
//! development), each a JSON file with atomic writes, plus the audit log.

pub mod data;
pub mod file_io;
pub mod init;
pub mod table;
pub mod unit;

pub use data::{DevelopmentData, FinanceData, HealthData, ProjectsData};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use table::Table;
pub use unit::StorageUnit;

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::AimsPaths;
use crate::error::AimsResult;

/// Main storage coordinator giving access to every unit
pub struct Storage {
    paths: AimsPaths,
    audit: AuditLogger,
    pub health: StorageUnit<HealthData>,
    pub finance: StorageUnit<FinanceData>,
    pub projects: StorageUnit<ProjectsData>,
    pub development: StorageUnit<DevelopmentData>,
}

impl Storage {
    /// Create a Storage instance; call `load_all` before reading
    pub fn new(paths: AimsPaths) -> AimsResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            audit: AuditLogger::new(paths.audit_log()),
            health: StorageUnit::new("health", paths.health_file()),
            finance: StorageUnit::new("finance", paths.finance_file()),
            projects: StorageUnit::new("projects", paths.projects_file()),
            development: StorageUnit::new("personal_development", paths.development_file()),
            paths,
        })
    }

    /// Open and load every unit
    pub fn open(paths: AimsPaths) -> AimsResult<Self> {
        let storage = Self::new(paths)?;
        storage.load_all()?;
        Ok(storage)
    }

    pub fn paths(&self) -> &AimsPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn load_all(&self) -> AimsResult<()> {
        self.health.load()?;
        self.finance.load()?;
        self.projects.load()?;
        self.development.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> AimsResult<()> {
        self.health.save()?;
        self.finance.save()?;
        self.projects.save()?;
        self.development.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Record a newly created row in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> AimsResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a changed row in the audit log
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> AimsResult<()> {
        self.audit.log(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    /// Record a removed row in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> AimsResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// Record several created rows with one write
    pub fn log_create_batch(&self, entries: Vec<AuditEntry>) -> AimsResult<()> {
        self.audit.log_batch(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Project, Task};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_units_are_independent_files() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths.clone()).unwrap();

        let project = Project::new("Garden", NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let task = Task::new(project.id, "Dig");
        storage
            .projects
            .transaction(|data| {
                data.projects.insert(project.clone());
                data.tasks.insert(task.clone());
                Ok(())
            })
            .unwrap();

        assert!(paths.projects_file().exists());
        assert!(!paths.health_file().exists());

        let reopened = Storage::open(paths).unwrap();
        assert_eq!(reopened.projects.read(|d| d.tasks.len()).unwrap(), 1);
        assert_eq!(reopened.finance.read(|d| d.transactions.len()).unwrap(), 0);
    }

    #[test]
    fn test_audit_helpers() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let before = serde_json::json!({"progress": 0.0});
        let after = serde_json::json!({"progress": 100.0});
        storage
            .log_create(EntityType::Project, "prj-1", None, &before)
            .unwrap();
        storage
            .log_update(EntityType::Project, "prj-1", None, &before, &after)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].diff_summary.is_some());
    }
}
