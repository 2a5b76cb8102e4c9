//! Append-only JSONL audit logger

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{AimsError, AimsResult};

use super::entry::{AuditEntry, EntityType};

/// Writes audit entries to one JSONL file, one entry per line
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    fn open_append(&self) -> AimsResult<BufWriter<File>> {
        if let Some(parent) = self.log_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| AimsError::Io(format!("Failed to create audit directory: {}", e)))?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| AimsError::Io(format!("Failed to open audit log: {}", e)))?;

        Ok(BufWriter::new(file))
    }

    fn write_line(writer: &mut impl Write, entry: &AuditEntry) -> AimsResult<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| AimsError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(writer, "{}", json)
            .map_err(|e| AimsError::Io(format!("Failed to write audit entry: {}", e)))
    }

    /// Append one entry and flush
    pub fn log(&self, entry: &AuditEntry) -> AimsResult<()> {
        self.log_batch(std::slice::from_ref(entry))
    }

    /// Append several entries with a single flush (CSV and health imports)
    pub fn log_batch(&self, entries: &[AuditEntry]) -> AimsResult<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut writer = self.open_append()?;
        for entry in entries {
            Self::write_line(&mut writer, entry)?;
        }

        writer
            .flush()
            .map_err(|e| AimsError::Io(format!("Failed to flush audit log: {}", e)))
    }

    /// All entries, oldest first
    pub fn read_all(&self) -> AimsResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AimsError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (line_num, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                AimsError::Io(format!("Failed to read audit log line {}: {}", line_num + 1, e))
            })?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: AuditEntry = serde_json::from_str(&line).map_err(|e| {
                AimsError::Json(format!(
                    "Failed to parse audit entry at line {}: {}",
                    line_num + 1,
                    e
                ))
            })?;
            entries.push(entry);
        }

        Ok(entries)
    }

    /// The most recent `count` entries, optionally for one entity kind
    pub fn read_recent(
        &self,
        count: usize,
        entity_type: Option<EntityType>,
    ) -> AimsResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        if let Some(kind) = entity_type {
            entries.retain(|e| e.entity_type == kind);
        }
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    pub fn entry_count(&self) -> AimsResult<usize> {
        if !self.log_path.exists() {
            return Ok(0);
        }

        let file = File::open(&self.log_path)
            .map_err(|e| AimsError::Io(format!("Failed to open audit log: {}", e)))?;

        Ok(BufReader::new(file)
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.trim().is_empty())
            .count())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("audit.log"));
        (logger, temp_dir)
    }

    fn txn_entry(i: usize) -> AuditEntry {
        AuditEntry::create(
            EntityType::Transaction,
            format!("txn-{}", i),
            Some("Food".to_string()),
            &json!({"category": "Food", "amount": i * 100}),
        )
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = create_test_logger();
        logger.log(&txn_entry(1)).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Transaction);
    }

    #[test]
    fn test_log_batch() {
        let (logger, _temp) = create_test_logger();
        let entries: Vec<_> = (0..3).map(txn_entry).collect();
        logger.log_batch(&entries).unwrap();
        logger.log_batch(&[]).unwrap();

        assert_eq!(logger.entry_count().unwrap(), 3);
    }

    #[test]
    fn test_read_recent_filters_by_kind() {
        let (logger, _temp) = create_test_logger();
        for i in 0..5 {
            logger.log(&txn_entry(i)).unwrap();
        }
        logger
            .log(&AuditEntry::create(EntityType::Goal, "gol-1", None, &json!({})))
            .unwrap();

        let recent = logger.read_recent(2, None).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[1].entity_id, "gol-1");

        let txns = logger.read_recent(3, Some(EntityType::Transaction)).unwrap();
        let ids: Vec<_> = txns.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, ["txn-2", "txn-3", "txn-4"]);
    }

    #[test]
    fn test_empty_log() {
        let (logger, _temp) = create_test_logger();
        assert_eq!(logger.entry_count().unwrap(), 0);
        assert!(logger.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_reads_existing_entries() {
        let (logger, temp) = create_test_logger();
        logger.log(&txn_entry(7)).unwrap();

        let reopened = AuditLogger::new(temp.path().join("audit.log"));
        assert_eq!(reopened.read_all().unwrap()[0].entity_id, "txn-7");
    }
}
