//! Spending Report
//!
//! Income and expense totals by category over an optional date range.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{AimsError, AimsResult};
use crate::models::{Money, Transaction, TransactionKind};
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub kind: TransactionKind,
    pub category: String,
    pub total: Money,
    pub transaction_count: usize,
    /// Share of all income (or all expenses) in the period
    pub percentage: f64,
}

#[derive(Debug, Clone)]
pub struct SpendingReport {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_income: Money,
    pub total_expenses: Money,
    /// Income first, then expenses; largest total first within each
    pub categories: Vec<CategoryTotal>,
}

impl SpendingReport {
    pub fn from_transactions(
        transactions: &[Transaction],
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        let in_range = |t: &&Transaction| {
            start_date.map_or(true, |s| t.date >= s) && end_date.map_or(true, |e| t.date <= e)
        };

        let mut grouped: BTreeMap<(bool, String), (Money, usize)> = BTreeMap::new();
        let mut total_income = Money::zero();
        let mut total_expenses = Money::zero();

        for txn in transactions.iter().filter(in_range) {
            match txn.kind {
                TransactionKind::Income => total_income += txn.amount,
                TransactionKind::Expense => total_expenses += txn.amount,
            }
            let entry = grouped
                .entry((txn.is_expense(), txn.category.clone()))
                .or_default();
            entry.0 += txn.amount;
            entry.1 += 1;
        }

        let mut categories: Vec<CategoryTotal> = grouped
            .into_iter()
            .map(|((is_expense, category), (total, count))| {
                let (kind, whole) = if is_expense {
                    (TransactionKind::Expense, total_expenses)
                } else {
                    (TransactionKind::Income, total_income)
                };
                CategoryTotal {
                    kind,
                    category,
                    total,
                    transaction_count: count,
                    percentage: total.percent_of(whole).unwrap_or(0.0),
                }
            })
            .collect();

        categories.sort_by_key(|c| (c.kind == TransactionKind::Expense, Reverse(c.total)));

        Self {
            start_date,
            end_date,
            total_income,
            total_expenses,
            categories,
        }
    }

    pub fn generate(
        storage: &Storage,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AimsResult<Self> {
        storage.finance.read(|data| {
            Self::from_transactions(data.transactions.all(), start_date, end_date)
        })
    }

    /// Income minus expenses
    pub fn net(&self) -> Money {
        self.total_income - self.total_expenses
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        let period = match (self.start_date, self.end_date) {
            (Some(s), Some(e)) => format!("{} to {}", s, e),
            (Some(s), None) => format!("since {}", s),
            (None, Some(e)) => format!("through {}", e),
            (None, None) => "all time".to_string(),
        };
        output.push_str(&format!("Income/Expense Breakdown ({})\n", period));
        output.push_str(&"=".repeat(60));
        output.push('\n');

        for kind in [TransactionKind::Income, TransactionKind::Expense] {
            output.push_str(&format!("\n{}\n", kind.to_string().to_uppercase()));
            for cat in self.categories.iter().filter(|c| c.kind == kind) {
                output.push_str(&format!(
                    "  {:<24} {:>14} {:>6.1}% ({} txns)\n",
                    cat.category, cat.total, cat.percentage, cat.transaction_count
                ));
            }
        }

        output.push_str(&"-".repeat(60));
        output.push('\n');
        output.push_str(&format!("Total Income:   {:>14}\n", self.total_income));
        output.push_str(&format!("Total Expenses: {:>14}\n", self.total_expenses));
        output.push_str(&format!("Net:            {:>14}\n", self.net()));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AimsResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Type", "Category", "Total", "Transactions", "Percentage"])
            .map_err(|e| AimsError::Export(e.to_string()))?;

        for cat in &self.categories {
            csv.write_record([
                cat.kind.to_string(),
                cat.category.clone(),
                format!("{:.2}", cat.total.as_f64()),
                cat.transaction_count.to_string(),
                format!("{:.1}", cat.percentage),
            ])
            .map_err(|e| AimsError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| AimsError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn txn(kind: TransactionKind, category: &str, units: i64, d: u32) -> Transaction {
        Transaction::new(date(d), kind, category, Money::from_units(units))
    }

    #[test]
    fn test_breakdown() {
        let txns = vec![
            txn(TransactionKind::Income, "Salary", 1000, 1),
            txn(TransactionKind::Expense, "Food", 75, 2),
            txn(TransactionKind::Expense, "Food", 25, 3),
            txn(TransactionKind::Expense, "Transport", 300, 4),
        ];

        let report = SpendingReport::from_transactions(&txns, None, None);
        assert_eq!(report.total_income, Money::from_units(1000));
        assert_eq!(report.total_expenses, Money::from_units(400));
        assert_eq!(report.net(), Money::from_units(600));

        let names: Vec<_> = report.categories.iter().map(|c| c.category.as_str()).collect();
        assert_eq!(names, ["Salary", "Transport", "Food"]);

        let food = &report.categories[2];
        assert_eq!(food.transaction_count, 2);
        assert_eq!(food.percentage, 25.0);
    }

    #[test]
    fn test_date_range() {
        let txns = vec![
            txn(TransactionKind::Expense, "Food", 10, 1),
            txn(TransactionKind::Expense, "Food", 20, 15),
            txn(TransactionKind::Expense, "Food", 40, 30),
        ];

        let report = SpendingReport::from_transactions(&txns, Some(date(10)), Some(date(20)));
        assert_eq!(report.total_expenses, Money::from_units(20));
    }

    #[test]
    fn test_rendering() {
        let txns = vec![txn(TransactionKind::Expense, "Food", 10, 1)];
        let report = SpendingReport::from_transactions(&txns, None, None);

        assert!(report.format_terminal().contains("EXPENSE"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Expense,Food,10.00,1,100.0"));
    }
}
