//! Budget CLI commands

use clap::Subcommand;

use crate::error::{AimsError, AimsResult};
use crate::models::Month;
use crate::reports::BudgetScope;
use crate::services::BudgetService;
use crate::storage::Storage;

use super::{parse_amount, parse_date, parse_month};

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Set (or replace) the budget for a category in a month
    Set {
        category: String,
        /// Amount (e.g., "400.00")
        amount: String,
        /// Month (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,
    },
    /// List budgets
    List {
        /// Only budgets for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show spending against budgets
    Progress {
        /// Only budgets for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// Which expenses count: all-time, month, or START..END
        #[arg(short, long)]
        scope: Option<String>,
    },
    /// Remove the budget for a category in a month
    Remove {
        category: String,
        #[arg(short, long)]
        month: Option<String>,
    },
}

fn month_or_current(month: Option<&str>) -> AimsResult<Month> {
    month.map(parse_month).transpose().map(|m| m.unwrap_or_else(Month::current))
}

/// Parse a `--scope` argument
pub(crate) fn parse_scope(s: &str) -> AimsResult<BudgetScope> {
    match s.trim().to_lowercase().as_str() {
        "all" | "all-time" | "alltime" => Ok(BudgetScope::AllTime),
        "month" | "budget-month" => Ok(BudgetScope::BudgetMonth),
        other => {
            let (start, end) = other.split_once("..").ok_or_else(|| {
                AimsError::Validation(format!(
                    "Invalid scope '{}': use all-time, month, or YYYY-MM-DD..YYYY-MM-DD",
                    s
                ))
            })?;
            let (start, end) = (parse_date(start)?, parse_date(end)?);
            if start > end {
                return Err(AimsError::Validation(format!(
                    "Scope start {} is after end {}",
                    start, end
                )));
            }
            Ok(BudgetScope::Range { start, end })
        }
    }
}

/// Handle a budget command
pub fn handle_budget_command(
    storage: &Storage,
    default_scope: BudgetScope,
    currency: &str,
    cmd: BudgetCommands,
) -> AimsResult<()> {
    let service = BudgetService::new(storage);

    match cmd {
        BudgetCommands::Set {
            category,
            amount,
            month,
        } => {
            let month = month_or_current(month.as_deref())?;
            let budget = service.set_budget(&category, month, parse_amount(&amount)?)?;
            println!(
                "Budget for {} in {} set to {}",
                budget.category,
                budget.month,
                budget.amount.format_with_symbol(currency)
            );
        }

        BudgetCommands::List { month } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let budgets = service.list(month)?;
            if budgets.is_empty() {
                println!("No budgets set.");
                return Ok(());
            }

            println!("{:<10} {:<20} {:>12}", "Month", "Category", "Budget");
            println!("{}", "-".repeat(44));
            for budget in budgets {
                println!(
                    "{:<10} {:<20} {:>12}",
                    budget.month.to_string(),
                    budget.category,
                    budget.amount.format_with_symbol(currency)
                );
            }
        }

        BudgetCommands::Progress { month, scope } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let scope = match scope {
                Some(s) => parse_scope(&s)?,
                None => default_scope,
            };
            let report = service.progress(scope, month)?;
            print!("{}", report.format_terminal());
        }

        BudgetCommands::Remove { category, month } => {
            let month = month_or_current(month.as_deref())?;
            let budget = service.remove(&category, month)?;
            println!("Removed budget for {} in {}", budget.category, budget.month);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_scope() {
        assert_eq!(parse_scope("all-time").unwrap(), BudgetScope::AllTime);
        assert_eq!(parse_scope("Month").unwrap(), BudgetScope::BudgetMonth);
        assert_eq!(
            parse_scope("2025-01-01..2025-03-31").unwrap(),
            BudgetScope::Range {
                start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                end: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
            }
        );
        assert!(parse_scope("2025-03-31..2025-01-01").is_err());
        assert!(parse_scope("weekly").unwrap_err().is_validation());
    }
}
