//! Budget Progress Report
//!
//! Joins each `(category, month)` budget against expense transactions in
//! the same category. Which transactions are counted is controlled by
//! `BudgetScope`.

use std::io::Write;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AimsError, AimsResult};
use crate::models::{Budget, Money, Month, Transaction};
use crate::storage::Storage;

/// Which transactions count against a budget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BudgetScope {
    /// Every expense in the category, regardless of date
    AllTime,
    /// Only expenses dated inside the budget's own month
    #[default]
    BudgetMonth,
    /// Only expenses dated inside an explicit inclusive range
    Range { start: NaiveDate, end: NaiveDate },
}

impl BudgetScope {
    fn includes(&self, budget: &Budget, date: NaiveDate) -> bool {
        match self {
            BudgetScope::AllTime => true,
            BudgetScope::BudgetMonth => budget.month.contains(date),
            BudgetScope::Range { start, end } => *start <= date && date <= *end,
        }
    }
}

impl std::fmt::Display for BudgetScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetScope::AllTime => write!(f, "all time"),
            BudgetScope::BudgetMonth => write!(f, "budget month"),
            BudgetScope::Range { start, end } => write!(f, "{} to {}", start, end),
        }
    }
}

/// Progress of one budget
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetProgress {
    pub category: String,
    pub month: Month,
    pub budget: Money,
    pub spent: Money,
    /// `spent / budget * 100`, unclamped; 0 when the budget is zero
    pub percent: f64,
    /// `Some(spent - budget)` when spending exceeds the budget
    pub over_budget: Option<Money>,
}

impl BudgetProgress {
    /// Compute progress for a budget amount and the spend counted against it
    pub fn compute(category: impl Into<String>, month: Month, budget: Money, spent: Money) -> Self {
        let percent = spent.percent_of(budget).unwrap_or(0.0);
        let over_budget = if spent > budget {
            Some(spent - budget)
        } else {
            None
        };

        Self {
            category: category.into(),
            month,
            budget,
            spent,
            percent,
            over_budget,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.over_budget.is_some()
    }

    /// Budget left to spend (never negative)
    pub fn remaining(&self) -> Money {
        if self.spent >= self.budget {
            Money::zero()
        } else {
            self.budget - self.spent
        }
    }
}

/// Progress for every budget; only expense transactions count as spend
pub fn budget_progress(
    budgets: &[Budget],
    transactions: &[Transaction],
    scope: BudgetScope,
) -> Vec<BudgetProgress> {
    budgets
        .iter()
        .map(|budget| {
            let spent: Money = transactions
                .iter()
                .filter(|t| t.is_expense())
                .filter(|t| t.category.eq_ignore_ascii_case(&budget.category))
                .filter(|t| scope.includes(budget, t.date))
                .map(|t| t.amount)
                .sum();

            BudgetProgress::compute(budget.category.clone(), budget.month, budget.amount, spent)
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct BudgetProgressReport {
    pub scope: BudgetScope,
    pub rows: Vec<BudgetProgress>,
}

impl BudgetProgressReport {
    /// Build the report, optionally limited to one month's budgets
    pub fn generate(storage: &Storage, scope: BudgetScope, month: Option<Month>) -> AimsResult<Self> {
        let mut rows = storage.finance.read(|data| {
            let budgets: Vec<Budget> = data
                .budgets
                .iter()
                .filter(|b| month.map_or(true, |m| b.month == m))
                .cloned()
                .collect();
            budget_progress(&budgets, data.transactions.all(), scope)
        })?;

        rows.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.category.cmp(&b.category)));
        Ok(Self { scope, rows })
    }

    pub fn over_budget_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_over_budget()).count()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Budget Progress ({})\n", self.scope));
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<8} {:<18} {:>12} {:>12} {:>8}  {}\n",
            "Month", "Category", "Budget", "Spent", "Used", "Status"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            let status = match row.over_budget {
                Some(over) => format!("OVER by {}", over),
                None => format!("{} left", row.remaining()),
            };
            output.push_str(&format!(
                "{:<8} {:<18} {:>12} {:>12} {:>7.1}%  {}\n",
                row.month.to_string(),
                row.category,
                row.budget,
                row.spent,
                row.percent,
                status
            ));
        }

        if self.rows.is_empty() {
            output.push_str("No budgets set.\n");
        } else if self.over_budget_count() > 0 {
            output.push_str(&format!(
                "\n{} budget(s) exceeded.\n",
                self.over_budget_count()
            ));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AimsResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Category", "Budget", "Spent", "Percent", "Over Budget"])
            .map_err(|e| AimsError::Export(e.to_string()))?;

        for row in &self.rows {
            csv.write_record([
                row.month.to_string(),
                row.category.clone(),
                format!("{:.2}", row.budget.as_f64()),
                format!("{:.2}", row.spent.as_f64()),
                format!("{:.2}", row.percent),
                row.over_budget
                    .map(|o| format!("{:.2}", o.as_f64()))
                    .unwrap_or_default(),
            ])
            .map_err(|e| AimsError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| AimsError::Export(e.to_string()))
    }
}
