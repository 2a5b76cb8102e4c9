//! CLI commands for reports
//!
//! Every report prints to the terminal, or writes CSV with `--output`.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::error::{AimsError, AimsResult};
use crate::reports::{
    BudgetProgressReport, BudgetScope, GoalProgressReport, NetWorthReport, ProjectProgressReport,
    SpendingReport,
};
use crate::storage::Storage;

use super::budget::parse_scope;
use super::{parse_month, parse_opt_date};

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Income and expenses by category
    Spending {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Spending against budgets
    Budget {
        /// Only budgets for this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
        /// all-time, month, or START..END
        #[arg(long)]
        scope: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Net worth and its history
    #[command(alias = "networth")]
    NetWorth {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Progress toward savings goals
    Goals {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Project completion and hours logged
    Projects {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn create_output(path: &Path) -> AimsResult<BufWriter<File>> {
    let file = File::create(path).map_err(|e| {
        AimsError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    Ok(BufWriter::new(file))
}

/// Handle report commands
pub fn handle_report_command(
    storage: &Storage,
    default_scope: BudgetScope,
    cmd: ReportCommands,
) -> AimsResult<()> {
    match cmd {
        ReportCommands::Spending { start, end, output } => {
            let report = SpendingReport::generate(
                storage,
                parse_opt_date(start.as_deref())?,
                parse_opt_date(end.as_deref())?,
            )?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Spending report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Budget {
            month,
            scope,
            output,
        } => {
            let month = month.as_deref().map(parse_month).transpose()?;
            let scope = match scope {
                Some(s) => parse_scope(&s)?,
                None => default_scope,
            };
            let report = BudgetProgressReport::generate(storage, scope, month)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Budget report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::NetWorth { output } => {
            let report = NetWorthReport::generate(storage)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Net worth report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Goals { output } => {
            let report = GoalProgressReport::generate(storage)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Goal report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }

        ReportCommands::Projects { output } => {
            let report = ProjectProgressReport::generate(storage)?;
            match output {
                Some(path) => {
                    report.export_csv(&mut create_output(&path)?)?;
                    println!("Project report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal()),
            }
        }
    }

    Ok(())
}
