//! Transaction CLI commands
//!
//! Implements CLI commands for logging income and expenses.

use std::path::PathBuf;

use clap::Subcommand;

use crate::error::AimsResult;
use crate::models::{Transaction, TransactionKind, EXPENSE_CATEGORIES, INCOME_CATEGORIES};
use crate::services::{CreateTransactionInput, ImportService, TransactionFilter, TransactionService};
use crate::storage::Storage;

use super::{date_or_today, parse_amount, parse_opt_date};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Transaction type (income or expense)
        kind: String,
        /// Amount (e.g., "50.00")
        amount: String,
        /// Category; inferred from the description for expenses when omitted
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short = 'D', long)]
        description: Option<String>,
    },
    /// List transactions
    List {
        /// Filter by type (income or expense)
        #[arg(short, long)]
        kind: Option<String>,
        /// Filter by category name
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
    /// Import transactions from a CSV file (Date, Type, Amount, Category, Description)
    Import { file: PathBuf },
    /// Show the suggested categories
    Categories,
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    currency: &str,
    cmd: TransactionCommands,
) -> AimsResult<()> {
    let service = TransactionService::new(storage);

    match cmd {
        TransactionCommands::Add {
            kind,
            amount,
            category,
            date,
            description,
        } => {
            let txn = service.create(CreateTransactionInput {
                date: date_or_today(date.as_deref())?,
                kind: kind.parse()?,
                category,
                amount: parse_amount(&amount)?,
                description,
            })?;

            println!("Created transaction: {}", txn.id);
            println!("  Date:     {}", txn.date);
            println!("  Type:     {}", txn.kind);
            println!("  Category: {}", txn.category);
            println!("  Amount:   {}", txn.amount.format_with_symbol(currency));
            if !txn.description.is_empty() {
                println!("  Note:     {}", txn.description);
            }
        }

        TransactionCommands::List {
            kind,
            category,
            limit,
            from,
            to,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(kind) = kind {
                filter = filter.kind(kind.parse()?);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            let from = parse_opt_date(from.as_deref())?;
            let to = parse_opt_date(to.as_deref())?;
            if from.is_some() || to.is_some() {
                filter = filter.date_range(
                    from.unwrap_or(chrono::NaiveDate::MIN),
                    to.unwrap_or(chrono::NaiveDate::MAX),
                );
            }

            let transactions = service.list(&filter)?;
            if transactions.is_empty() {
                println!("No transactions found.");
            } else {
                print!("{}", format_register(&transactions, currency));
            }
        }

        TransactionCommands::Delete { id } => {
            let txn = service.find(&id)?;
            service.delete(txn.id)?;
            println!(
                "Deleted transaction {} ({} {} {})",
                txn.id,
                txn.date,
                txn.category,
                txn.amount.format_with_symbol(currency)
            );
        }

        TransactionCommands::Import { file } => {
            let result = ImportService::new(storage).import_file(&file)?;
            println!("Imported {} transaction(s) from {}", result.imported, file.display());
            if !result.errors.is_empty() {
                println!("Skipped {} row(s):", result.errors.len());
                for (row, message) in &result.errors {
                    println!("  row {}: {}", row, message);
                }
            }
        }

        TransactionCommands::Categories => {
            println!("Income:  {}", INCOME_CATEGORIES.join(", "));
            println!("Expense: {}", EXPENSE_CATEGORIES.join(", "));
        }
    }

    Ok(())
}

fn format_register(transactions: &[Transaction], currency: &str) -> String {
    let mut out = format!(
        "{:<14} {:<12} {:<8} {:<16} {:>12}  {}\n",
        "ID", "Date", "Type", "Category", "Amount", "Description"
    );
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for txn in transactions {
        let amount = match txn.kind {
            TransactionKind::Income => txn.amount.format_with_symbol(currency),
            TransactionKind::Expense => (-txn.amount).format_with_symbol(currency),
        };
        out.push_str(&format!(
            "{:<14} {:<12} {:<8} {:<16} {:>12}  {}\n",
            txn.id.to_string(),
            txn.date.to_string(),
            txn.kind.to_string(),
            txn.category,
            amount,
            txn.description
        ));
    }
    out
}
