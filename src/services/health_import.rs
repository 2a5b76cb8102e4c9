//! Apple Health export import
//!
//! Reads `Record` elements from an `export.xml` and keeps sleep-analysis
//! and step-count records as health rows. Every other record type is
//! skipped. Imported rows carry no mood, so no key is needed.

use std::path::Path;

use chrono::{DateTime, FixedOffset};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{AimsError, AimsResult};
use crate::models::{EntrySource, HealthEntry};
use crate::storage::Storage;

const SLEEP_TYPE: &str = "SleepAnalysis";
const STEPS_TYPE: &str = "StepCount";
const APPLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Attributes of one `<Record>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecord {
    pub record_type: String,
    pub value: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn record_from_element(element: &BytesStart<'_>) -> AimsResult<HealthRecord> {
    let mut record = HealthRecord::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| AimsError::Import(format!("Malformed attribute: {}", e)))?;
        let value = attr
            .unescape_value()
            .map_err(|e| AimsError::Import(format!("Malformed attribute value: {}", e)))?
            .into_owned();

        match attr.key.as_ref() {
            b"type" => record.record_type = value,
            b"value" => record.value = Some(value),
            b"startDate" => record.start_date = Some(value),
            b"endDate" => record.end_date = Some(value),
            _ => {}
        }
    }

    Ok(record)
}

/// Collect every `Record` element in document order
pub fn parse_records(xml: &str) -> AimsResult<Vec<HealthRecord>> {
    let mut reader = Reader::from_str(xml);
    let mut records = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"Record" => {
                records.push(record_from_element(&e)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(AimsError::Import(format!(
                    "Invalid health export at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
        }
    }

    Ok(records)
}

fn parse_apple_date(field: &str, value: Option<&str>) -> Result<DateTime<FixedOffset>, String> {
    let value = value.ok_or_else(|| format!("missing {}", field))?;
    DateTime::parse_from_str(value.trim(), APPLE_DATE_FORMAT)
        .map_err(|e| format!("invalid {} '{}': {}", field, value, e))
}

/// Map a record to a health row; `Ok(None)` for record types we don't keep
pub fn record_to_entry(record: &HealthRecord) -> Result<Option<HealthEntry>, String> {
    let is_sleep = record.record_type.contains(SLEEP_TYPE);
    let is_steps = record.record_type.contains(STEPS_TYPE);
    if !is_sleep && !is_steps {
        return Ok(None);
    }

    let start = parse_apple_date("startDate", record.start_date.as_deref())?;
    let mut entry = HealthEntry::new(start.date_naive());
    entry.source = EntrySource::AppleHealth;

    if is_sleep {
        let end = parse_apple_date("endDate", record.end_date.as_deref())?;
        let seconds = (end - start).num_seconds();
        if seconds < 0 {
            return Err(format!("sleep ends before it starts ({} > {})", start, end));
        }
        let hours = seconds as f64 / 3600.0;
        entry.sleep_hours = Some((hours * 100.0).round() / 100.0);
    } else {
        let raw = record
            .value
            .as_deref()
            .ok_or_else(|| "missing step count value".to_string())?;
        let steps: f64 = raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid step count '{}'", raw))?;
        if !steps.is_finite() || steps < 0.0 || steps > u32::MAX as f64 {
            return Err(format!("invalid step count '{}'", raw));
        }
        entry.steps = Some(steps.round() as u32);
    }

    entry.validate().map_err(|e| e.to_string())?;
    Ok(Some(entry))
}

/// Outcome of an import
#[derive(Debug, Clone, Default)]
pub struct HealthImportSummary {
    pub sleep_records: usize,
    pub step_records: usize,
    /// Records of other types
    pub skipped: usize,
    /// `(record index, message)` for kept types that could not be mapped
    pub errors: Vec<(usize, String)>,
}

impl HealthImportSummary {
    pub fn imported(&self) -> usize {
        self.sleep_records + self.step_records
    }
}

pub struct HealthImportService<'a> {
    storage: &'a Storage,
}

impl<'a> HealthImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn import_file(&self, path: &Path) -> AimsResult<HealthImportSummary> {
        let xml = std::fs::read_to_string(path).map_err(|e| {
            AimsError::Import(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.import_xml(&xml)
    }

    /// Import every sleep and step record in one storage transaction
    pub fn import_xml(&self, xml: &str) -> AimsResult<HealthImportSummary> {
        let records = parse_records(xml)?;
        let mut summary = HealthImportSummary::default();
        let mut entries = Vec::new();

        for (idx, record) in records.iter().enumerate() {
            match record_to_entry(record) {
                Ok(Some(entry)) => {
                    if entry.sleep_hours.is_some() {
                        summary.sleep_records += 1;
                    } else {
                        summary.step_records += 1;
                    }
                    entries.push(entry);
                }
                Ok(None) => summary.skipped += 1,
                Err(message) => {
                    log::warn!("Skipping health record {}: {}", idx, message);
                    summary.errors.push((idx, message));
                }
            }
        }

        if !entries.is_empty() {
            self.storage.health.transaction(|data| {
                for entry in &entries {
                    data.entries.insert(entry.clone());
                }
                Ok(())
            })?;

            let audit: Vec<AuditEntry> = entries
                .iter()
                .map(|e| {
                    AuditEntry::create(
                        EntityType::HealthEntry,
                        e.id.to_string(),
                        Some(e.date.to_string()),
                        e,
                    )
                })
                .collect();
            self.storage.log_create_batch(audit)?;
        }

        log::info!(
            "Imported {} health records ({} skipped, {} errors)",
            summary.imported(),
            summary.skipped,
            summary.errors.len()
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<HealthData locale="en_US">
 <ExportDate value="2024-06-10 08:00:00 -0700"/>
 <Record type="HKCategoryTypeIdentifierSleepAnalysis" sourceName="Watch" value="HKCategoryValueSleepAnalysisAsleep" startDate="2024-06-01 23:00:00 -0700" endDate="2024-06-02 06:30:00 -0700"/>
 <Record type="HKQuantityTypeIdentifierStepCount" sourceName="Phone" unit="count" value="8421" startDate="2024-06-02 09:00:00 -0700" endDate="2024-06-02 10:00:00 -0700"/>
 <Record type="HKQuantityTypeIdentifierHeartRate" unit="count/min" value="62" startDate="2024-06-02 09:00:00 -0700" endDate="2024-06-02 09:00:00 -0700">
  <MetadataEntry key="HKMetadataKeyHeartRateMotionContext" value="0"/>
 </Record>
 <Record type="HKQuantityTypeIdentifierStepCount" value="lots" startDate="2024-06-03 09:00:00 -0700" endDate="2024-06-03 10:00:00 -0700"/>
</HealthData>"#;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_parse_records_reads_empty_and_open_elements() {
        let records = parse_records(EXPORT).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[1].value.as_deref(), Some("8421"));
        assert_eq!(records[2].record_type, "HKQuantityTypeIdentifierHeartRate");
    }

    #[test]
    fn test_sleep_hours_from_date_span() {
        let records = parse_records(EXPORT).unwrap();
        let entry = record_to_entry(&records[0]).unwrap().unwrap();

        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(entry.sleep_hours, Some(7.5));
        assert_eq!(entry.source, EntrySource::AppleHealth);
    }

    #[test]
    fn test_unknown_types_are_skipped() {
        let records = parse_records(EXPORT).unwrap();
        assert!(record_to_entry(&records[2]).unwrap().is_none());
        assert!(record_to_entry(&records[3]).is_err());
    }

    #[test]
    fn test_import_summary_and_rows() {
        let (_temp, storage) = create_test_storage();
        let summary = HealthImportService::new(&storage).import_xml(EXPORT).unwrap();

        assert_eq!(summary.sleep_records, 1);
        assert_eq!(summary.step_records, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].0, 3);

        assert_eq!(storage.health.read(|d| d.entries.len()).unwrap(), 2);
        assert_eq!(storage.audit().entry_count().unwrap(), 2);
    }

    #[test]
    fn test_malformed_xml_is_import_error() {
        let (_temp, storage) = create_test_storage();
        let err = HealthImportService::new(&storage)
            .import_xml("<HealthData><Record type=\"x\"></HealthData>")
            .unwrap_err();
        assert!(matches!(err, AimsError::Import(_)));
        assert_eq!(storage.health.read(|d| d.entries.len()).unwrap(), 0);
    }
}
