//! Asset, liability and net worth CLI commands

use clap::Subcommand;

use crate::error::AimsResult;
use crate::services::{BalanceInput, BalanceService};
use crate::storage::Storage;

use super::{date_or_today, parse_amount};

#[derive(Subcommand)]
pub enum NetWorthCommands {
    /// Record an asset snapshot
    AddAsset {
        /// Asset type (e.g., Cash, Investments, Property)
        kind: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// Record a liability snapshot
    AddLiability {
        /// Liability type (e.g., Mortgage, Credit Card)
        kind: String,
        amount: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// List assets and liabilities
    List,
    /// Show net worth with its history
    Report,
}

pub fn handle_networth_command(
    storage: &Storage,
    currency: &str,
    cmd: NetWorthCommands,
) -> AimsResult<()> {
    let service = BalanceService::new(storage);

    match cmd {
        NetWorthCommands::AddAsset {
            kind,
            amount,
            date,
            description,
        } => {
            let asset = service.add_asset(BalanceInput {
                date: date_or_today(date.as_deref())?,
                kind,
                amount: parse_amount(&amount)?,
                description,
            })?;
            println!(
                "Recorded asset {} ({}) of {} on {}",
                asset.id,
                asset.kind,
                asset.amount.format_with_symbol(currency),
                asset.date
            );
        }

        NetWorthCommands::AddLiability {
            kind,
            amount,
            date,
            description,
        } => {
            let liability = service.add_liability(BalanceInput {
                date: date_or_today(date.as_deref())?,
                kind,
                amount: parse_amount(&amount)?,
                description,
            })?;
            println!(
                "Recorded liability {} ({}) of {} on {}",
                liability.id,
                liability.kind,
                liability.amount.format_with_symbol(currency),
                liability.date
            );
        }

        NetWorthCommands::List => {
            let assets = service.list_assets()?;
            let liabilities = service.list_liabilities()?;

            println!("Assets");
            if assets.is_empty() {
                println!("  (none)");
            }
            for a in &assets {
                println!(
                    "  {:<12} {:<20} {:>14}  {}",
                    a.date.to_string(),
                    a.kind,
                    a.amount.format_with_symbol(currency),
                    a.description
                );
            }

            println!();
            println!("Liabilities");
            if liabilities.is_empty() {
                println!("  (none)");
            }
            for l in &liabilities {
                println!(
                    "  {:<12} {:<20} {:>14}  {}",
                    l.date.to_string(),
                    l.kind,
                    l.amount.format_with_symbol(currency),
                    l.description
                );
            }
        }

        NetWorthCommands::Report => {
            print!("{}", service.net_worth()?.format_terminal());
        }
    }

    Ok(())
}
