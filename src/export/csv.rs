//! CSV export of the finance tables
//!
//! Amounts are written in currency units with two decimals.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{AimsError, AimsResult};
use crate::models::Money;
use crate::storage::{FinanceData, Storage};

fn amount(m: Money) -> String {
    format!("{:.2}", m.as_f64())
}

fn export_error(e: impl fmt::Display) -> AimsError {
    AimsError::Export(e.to_string())
}

/// Write `header` and `rows` with the csv crate, rows sorted by the caller
fn write_rows<W, I>(writer: W, header: &[&str], rows: I) -> AimsResult<()>
where
    W: Write,
    I: IntoIterator<Item = Vec<String>>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(header).map_err(export_error)?;
    for row in rows {
        wtr.write_record(&row).map_err(export_error)?;
    }
    wtr.flush().map_err(export_error)
}

fn transactions_csv<W: Write>(data: &FinanceData, writer: W) -> AimsResult<()> {
    let mut rows: Vec<_> = data.transactions.iter().collect();
    rows.sort_by_key(|t| (t.date, t.created_at));
    write_rows(
        writer,
        &["ID", "Date", "Type", "Category", "Amount", "Description"],
        rows.into_iter().map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.kind.to_string(),
                t.category.clone(),
                amount(t.amount),
                t.description.clone(),
            ]
        }),
    )
}

fn budgets_csv<W: Write>(data: &FinanceData, writer: W) -> AimsResult<()> {
    let mut rows: Vec<_> = data.budgets.iter().collect();
    rows.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.category.cmp(&b.category)));
    write_rows(
        writer,
        &["ID", "Category", "Month", "Amount"],
        rows.into_iter().map(|b| {
            vec![
                b.id.to_string(),
                b.category.clone(),
                b.month.to_string(),
                amount(b.amount),
            ]
        }),
    )
}

fn assets_csv<W: Write>(data: &FinanceData, writer: W) -> AimsResult<()> {
    let mut rows: Vec<_> = data.assets.iter().collect();
    rows.sort_by_key(|a| a.date);
    write_rows(
        writer,
        &["ID", "Date", "Type", "Amount", "Description"],
        rows.into_iter().map(|a| {
            vec![
                a.id.to_string(),
                a.date.to_string(),
                a.kind.clone(),
                amount(a.amount),
                a.description.clone(),
            ]
        }),
    )
}

fn liabilities_csv<W: Write>(data: &FinanceData, writer: W) -> AimsResult<()> {
    let mut rows: Vec<_> = data.liabilities.iter().collect();
    rows.sort_by_key(|l| l.date);
    write_rows(
        writer,
        &["ID", "Date", "Type", "Amount", "Description"],
        rows.into_iter().map(|l| {
            vec![
                l.id.to_string(),
                l.date.to_string(),
                l.kind.clone(),
                amount(l.amount),
                l.description.clone(),
            ]
        }),
    )
}

fn goals_csv<W: Write>(data: &FinanceData, writer: W) -> AimsResult<()> {
    write_rows(
        writer,
        &["ID", "Name", "Target Amount", "Current Amount", "Deadline"],
        data.goals.iter().map(|g| {
            vec![
                g.id.to_string(),
                g.name.clone(),
                amount(g.target_amount),
                amount(g.current_amount),
                g.deadline.map(|d| d.to_string()).unwrap_or_default(),
            ]
        }),
    )
}

pub fn export_transactions_csv<W: Write>(storage: &Storage, writer: W) -> AimsResult<()> {
    storage.finance.read(|data| transactions_csv(data, writer))?
}

pub fn export_budgets_csv<W: Write>(storage: &Storage, writer: W) -> AimsResult<()> {
    storage.finance.read(|data| budgets_csv(data, writer))?
}

pub fn export_assets_csv<W: Write>(storage: &Storage, writer: W) -> AimsResult<()> {
    storage.finance.read(|data| assets_csv(data, writer))?
}

pub fn export_liabilities_csv<W: Write>(storage: &Storage, writer: W) -> AimsResult<()> {
    storage.finance.read(|data| liabilities_csv(data, writer))?
}

pub fn export_goals_csv<W: Write>(storage: &Storage, writer: W) -> AimsResult<()> {
    storage.finance.read(|data| goals_csv(data, writer))?
}

/// The exportable finance tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceTable {
    Transactions,
    Budgets,
    Assets,
    Liabilities,
    Goals,
}

impl FinanceTable {
    pub const ALL: [FinanceTable; 5] = [
        Self::Transactions,
        Self::Budgets,
        Self::Assets,
        Self::Liabilities,
        Self::Goals,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Transactions => "transactions.csv",
            Self::Budgets => "budgets.csv",
            Self::Assets => "assets.csv",
            Self::Liabilities => "liabilities.csv",
            Self::Goals => "goals.csv",
        }
    }

    pub fn export<W: Write>(self, storage: &Storage, writer: W) -> AimsResult<()> {
        match self {
            Self::Transactions => export_transactions_csv(storage, writer),
            Self::Budgets => export_budgets_csv(storage, writer),
            Self::Assets => export_assets_csv(storage, writer),
            Self::Liabilities => export_liabilities_csv(storage, writer),
            Self::Goals => export_goals_csv(storage, writer),
        }
    }
}

impl FromStr for FinanceTable {
    type Err = AimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transactions" | "txn" => Ok(Self::Transactions),
            "budgets" => Ok(Self::Budgets),
            "assets" => Ok(Self::Assets),
            "liabilities" => Ok(Self::Liabilities),
            "goals" => Ok(Self::Goals),
            other => Err(AimsError::Validation(format!(
                "Unknown finance table '{}'",
                other
            ))),
        }
    }
}

/// Write every finance table into `dir`, returning the files written
pub fn export_finance_csv(storage: &Storage, dir: &Path) -> AimsResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| AimsError::Export(format!("Failed to create {}: {}", dir.display(), e)))?;

    FinanceTable::ALL
        .iter()
        .map(|table| {
            let path = dir.join(table.file_name());
            let file = std::fs::File::create(&path).map_err(|e| {
                AimsError::Export(format!("Failed to create {}: {}", path.display(), e))
            })?;
            table.export(storage, file)?;
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use crate::models::{Goal, Transaction, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_transactions_csv() {
        let (_temp, storage) = create_test_storage();
        storage
            .finance
            .transaction(|data| {
                let mut txn = Transaction::new(
                    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
                    TransactionKind::Expense,
                    "Food",
                    Money::from_cents(1250),
                );
                txn.description = "Lunch, with \"team\"".into();
                data.transactions.insert(txn);
                Ok(())
            })
            .unwrap();

        let mut out = Vec::new();
        export_transactions_csv(&storage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "ID,Date,Type,Category,Amount,Description");
        assert!(lines[1].ends_with(",2025-01-15,Expense,Food,12.50,\"Lunch, with \"\"team\"\"\""));
    }

    #[test]
    fn test_goals_csv() {
        let (_temp, storage) = create_test_storage();
        storage
            .finance
            .transaction(|data| {
                let mut goal = Goal::new("Trip", Money::from_units(1000));
                goal.current_amount = Money::from_units(250);
                data.goals.insert(goal);
                Ok(())
            })
            .unwrap();

        let mut out = Vec::new();
        export_goals_csv(&storage, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(",Trip,1000.00,250.00,"));
    }

    #[test]
    fn test_export_all_tables_to_dir() {
        let (temp, storage) = create_test_storage();
        let dir = temp.path().join("out");

        let written = export_finance_csv(&storage, &dir).unwrap();
        assert_eq!(written.len(), 5);
        let budgets = std::fs::read_to_string(dir.join("budgets.csv")).unwrap();
        assert_eq!(budgets.trim(), "ID,Category,Month,Amount");
    }

    #[test]
    fn test_table_parse() {
        assert_eq!("Assets".parse::<FinanceTable>().unwrap(), FinanceTable::Assets);
        assert!("payees".parse::<FinanceTable>().is_err());
    }
}
