//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod budget;
pub mod development;
pub mod export;
pub mod goal;
pub mod health;
pub mod networth;
pub mod project;
pub mod report;
pub mod transaction;

pub use budget::{handle_budget_command, BudgetCommands};
pub use development::{handle_dev_command, DevCommands};
pub use export::{handle_export_command, ExportCommands};
pub use goal::{handle_goal_command, GoalCommands};
pub use health::{handle_health_command, HealthCommands};
pub use networth::{handle_networth_command, NetWorthCommands};
pub use project::{
    handle_project_command, handle_task_command, handle_time_command, ProjectCommands,
    TaskCommands, TimeCommands,
};
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::NaiveDate;

use crate::error::{AimsError, AimsResult};
use crate::models::{Money, Month};

/// Parse a YYYY-MM-DD date argument
pub(crate) fn parse_date(s: &str) -> AimsResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| AimsError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s)))
}

pub(crate) fn parse_opt_date(s: Option<&str>) -> AimsResult<Option<NaiveDate>> {
    s.map(parse_date).transpose()
}

/// Parse an optional date, defaulting to today
pub(crate) fn date_or_today(s: Option<&str>) -> AimsResult<NaiveDate> {
    Ok(parse_opt_date(s)?.unwrap_or_else(|| chrono::Local::now().date_naive()))
}

pub(crate) fn parse_amount(s: &str) -> AimsResult<Money> {
    Money::parse(s).map_err(|e| {
        AimsError::Validation(format!(
            "Invalid amount format: '{}'. Use format like '50.00' or '100'. Error: {}",
            s, e
        ))
    })
}

pub(crate) fn parse_month(s: &str) -> AimsResult<Month> {
    s.parse().map_err(|e: crate::models::MonthParseError| AimsError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(
            parse_date("2025-02-03").unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 3).unwrap()
        );
        assert!(parse_date("02/03/2025").unwrap_err().is_validation());
        assert_eq!(parse_amount("$12.50").unwrap().cents(), 1250);
        assert!(parse_amount("twelve").unwrap_err().is_validation());
        assert_eq!(parse_month("2025-02").unwrap(), Month::new(2025, 2).unwrap());
        assert!(parse_opt_date(None).unwrap().is_none());
    }
}
