//! CSV transaction import
//!
//! Reads a transaction history with the columns
//! `Date,Type,Category,Amount,Description` (header names are matched
//! case-insensitively and may appear in any order). Rows that parse are
//! imported together in one storage transaction; rows that don't are
//! reported by row number and skipped.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{AimsError, AimsResult};
use crate::models::{Money, TransactionKind};
use crate::storage::Storage;

use super::transaction::{CreateTransactionInput, TransactionService};

const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%Y/%m/%d", "%m-%d-%Y"];

/// Positions of the known columns in the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub date: usize,
    pub kind: usize,
    pub category: Option<usize>,
    pub amount: usize,
    pub description: Option<usize>,
}

impl ColumnMapping {
    /// Locate columns by header name
    ///
    /// `Date`, `Type` and `Amount` are required; `Category` and
    /// `Description` are optional.
    pub fn from_headers(headers: &StringRecord) -> AimsResult<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let required = |name: &str| {
            position(name)
                .ok_or_else(|| AimsError::Import(format!("Missing required column '{}'", name)))
        };

        Ok(Self {
            date: required("date")?,
            kind: required("type")?,
            category: position("category"),
            amount: required("amount")?,
            description: position("description"),
        })
    }
}

/// Parse a date in any of the accepted formats
fn parse_date(s: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .ok_or_else(|| format!("Could not parse date: '{}'", s))
}

fn field<'r>(record: &'r StringRecord, column: Option<usize>) -> &'r str {
    column.and_then(|c| record.get(c)).map(str::trim).unwrap_or("")
}

/// Map one CSV record to transaction input
fn parse_record(
    record: &StringRecord,
    mapping: &ColumnMapping,
) -> Result<CreateTransactionInput, String> {
    let date = parse_date(field(record, Some(mapping.date)))?;
    let kind: TransactionKind = field(record, Some(mapping.kind))
        .parse()
        .map_err(|e: AimsError| e.to_string())?;

    let raw_amount = field(record, Some(mapping.amount));
    let amount = Money::parse(raw_amount).map_err(|e| e.to_string())?;
    // Bank exports often write expenses as negative numbers
    let amount = match kind {
        TransactionKind::Expense => amount.abs(),
        TransactionKind::Income if amount.is_negative() => {
            return Err(format!("Income amount cannot be negative: {}", raw_amount))
        }
        TransactionKind::Income => amount,
    };

    let category = field(record, mapping.category);
    let description = field(record, mapping.description);

    Ok(CreateTransactionInput {
        date,
        kind,
        category: (!category.is_empty()).then(|| category.to_string()),
        amount,
        description: (!description.is_empty()).then(|| description.to_string()),
    })
}

/// Result of a completed import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    /// IDs of imported transactions
    pub imported_ids: Vec<String>,
    /// Error message by data row (1-based, header excluded)
    pub errors: BTreeMap<usize, String>,
}

/// Service for CSV import
pub struct ImportService<'a> {
    storage: &'a Storage,
}

impl<'a> ImportService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Parse every data row; the outer error is for an unusable header
    pub fn parse_csv<R: Read>(
        &self,
        input: R,
    ) -> AimsResult<Vec<Result<CreateTransactionInput, String>>> {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input);
        let mapping = ColumnMapping::from_headers(reader.headers()?)?;

        Ok(reader
            .records()
            .map(|record| {
                record
                    .map_err(|e| format!("Error reading CSV record: {}", e))
                    .and_then(|r| parse_record(&r, &mapping))
            })
            .collect())
    }

    pub fn import_file(&self, path: &Path) -> AimsResult<ImportResult> {
        let file = std::fs::File::open(path)
            .map_err(|e| AimsError::Import(format!("Failed to open {}: {}", path.display(), e)))?;
        self.import_csv(file)
    }

    /// Import all valid rows from CSV text
    pub fn import_csv<R: Read>(&self, input: R) -> AimsResult<ImportResult> {
        let parsed = self.parse_csv(input)?;
        let mut result = ImportResult::default();
        let mut rows = Vec::new();

        for (idx, row) in parsed.into_iter().enumerate() {
            let txn =
                row.and_then(|input| TransactionService::build(input).map_err(|e| e.to_string()));
            match txn {
                Ok(txn) => rows.push(txn),
                Err(message) => {
                    log::warn!("Skipping CSV row {}: {}", idx + 1, message);
                    result.errors.insert(idx + 1, message);
                }
            }
        }

        if rows.is_empty() {
            return Ok(result);
        }

        self.storage.finance.transaction(|data| {
            for txn in &rows {
                data.transactions.insert(txn.clone());
            }
            Ok(())
        })?;

        self.storage.log_create_batch(
            rows.iter()
                .map(|t| {
                    AuditEntry::create(
                        EntityType::Transaction,
                        t.id.to_string(),
                        Some(format!("{} {} {} (import)", t.date, t.kind, t.category)),
                        t,
                    )
                })
                .collect(),
        )?;

        result.imported = rows.len();
        result.imported_ids = rows.iter().map(|t| t.id.to_string()).collect();
        log::info!(
            "Imported {} transactions, {} rows rejected",
            result.imported,
            result.errors.len()
        );
        Ok(result)
    }
}
