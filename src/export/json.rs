//! JSON Export functionality
//!
//! Exports every storage unit to one JSON document with schema versioning.
//! Encrypted columns are exported as their ciphertext tokens, so an export
//! is only readable with the same key.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AimsError, AimsResult};
use crate::storage::{DevelopmentData, FinanceData, HealthData, ProjectsData, Storage};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub health: HealthData,
    pub finance: FinanceData,
    pub projects: ProjectsData,
    pub personal_development: DevelopmentData,
}

impl FullExport {
    pub fn from_storage(storage: &Storage) -> AimsResult<Self> {
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            health: storage.health.read(|d| d.clone())?,
            finance: storage.finance.read(|d| d.clone())?,
            projects: storage.projects.read(|d| d.clone())?,
            personal_development: storage.development.read(|d| d.clone())?,
        })
    }

    /// Check the schema version and that tasks and time logs point at
    /// existing parents
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let project_ids: HashSet<_> = self.projects.projects.iter().map(|p| p.id).collect();
        if let Some(task) = self
            .projects
            .tasks
            .iter()
            .find(|t| !project_ids.contains(&t.project_id))
        {
            return Err(format!(
                "Task {} references unknown project {}",
                task.id, task.project_id
            ));
        }

        let task_ids: HashSet<_> = self.projects.tasks.iter().map(|t| t.id).collect();
        if let Some(log) = self
            .projects
            .time_logs
            .iter()
            .find(|l| !task_ids.contains(&l.task_id))
        {
            return Err(format!(
                "Time log {} references unknown task {}",
                log.id, log.task_id
            ));
        }

        Ok(())
    }
}

/// Export the full database to JSON
pub fn export_full_json<W: Write>(storage: &Storage, writer: W, pretty: bool) -> AimsResult<()> {
    let export = FullExport::from_storage(storage)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| AimsError::Export(e.to_string()))
}

/// Parse and validate a JSON export
pub fn import_from_json(json_str: &str) -> AimsResult<FullExport> {
    let export: FullExport =
        serde_json::from_str(json_str).map_err(|e| AimsError::Import(e.to_string()))?;
    export.validate().map_err(AimsError::Import)?;
    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use crate::crypto::{FieldCodec, SecretKey};
    use crate::models::{HealthEntry, Project, ProjectId, Task};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_full_export_keeps_tokens_sealed() {
        let (_temp_dir, storage) = create_test_storage();
        let codec = FieldCodec::new(SecretKey::from_bytes([1u8; 32]));

        storage
            .health
            .transaction(|data| {
                let mut entry = HealthEntry::new(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
                entry.mood = Some(codec.encrypt("😊 Happy")?);
                data.entries.insert(entry);
                Ok(())
            })
            .unwrap();

        let mut out = Vec::new();
        export_full_json(&storage, &mut out, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("Happy"));

        let parsed = import_from_json(&text).unwrap();
        assert_eq!(parsed.health.entries.len(), 1);
        let token = parsed.health.entries.all()[0].mood.clone().unwrap();
        assert_eq!(codec.decrypt(&token).unwrap(), "😊 Happy");
    }

    #[test]
    fn test_validate_orphan_task() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .projects
            .transaction(|data| {
                data.projects.insert(Project::new(
                    "Garden",
                    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                ));
                data.tasks.insert(Task::new(ProjectId::new(), "Orphan"));
                Ok(())
            })
            .unwrap();

        let export = FullExport::from_storage(&storage).unwrap();
        assert!(export.validate().unwrap_err().contains("unknown project"));
    }

    #[test]
    fn test_schema_mismatch() {
        let (_temp_dir, storage) = create_test_storage();
        let mut export = FullExport::from_storage(&storage).unwrap();
        export.schema_version = "0.1.0".into();
        assert!(export.validate().is_err());
    }
}
