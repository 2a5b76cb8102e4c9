//! CLI commands for data export

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Subcommand;

use crate::error::{AimsError, AimsResult};
use crate::export::{export_finance_csv, export_full_json, import_from_json, FinanceTable};
use crate::storage::Storage;

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Write every finance table as CSV into a directory
    Finance {
        /// Output directory
        dir: PathBuf,
    },

    /// Write one finance table as CSV
    Table {
        /// transactions, budgets, assets, liabilities or goals
        table: String,
        /// Output file path
        output: PathBuf,
    },

    /// Export all data to one JSON file
    Json {
        output: PathBuf,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Check that a JSON export is readable and consistent
    Verify { file: PathBuf },
}

/// Handle export commands
pub fn handle_export_command(storage: &Storage, cmd: ExportCommands) -> AimsResult<()> {
    match cmd {
        ExportCommands::Finance { dir } => {
            let written = export_finance_csv(storage, &dir)?;
            println!("Exported {} file(s) to {}", written.len(), dir.display());
            for path in written {
                println!("  {}", path.display());
            }
        }

        ExportCommands::Table { table, output } => {
            let table: FinanceTable = table.parse()?;
            let file = File::create(&output).map_err(|e| {
                AimsError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            table.export(storage, BufWriter::new(file))?;
            println!("Exported {} to {}", table.file_name(), output.display());
        }

        ExportCommands::Json { output, pretty } => {
            let file = File::create(&output).map_err(|e| {
                AimsError::Export(format!("Failed to create file {}: {}", output.display(), e))
            })?;
            export_full_json(storage, BufWriter::new(file), pretty)?;
            println!("Exported all data to: {}", output.display());
            println!("Encrypted fields are kept as ciphertext; keep your key to read them.");
        }

        ExportCommands::Verify { file } => {
            let contents = std::fs::read_to_string(&file)?;
            let export = import_from_json(&contents)?;
            println!("Export is valid (schema {})", export.schema_version);
            println!("  Created:      {}", export.exported_at);
            println!("  App version:  {}", export.app_version);
            println!("  Health:       {} entries", export.health.entries.len());
            println!("  Transactions: {}", export.finance.transactions.len());
            println!("  Projects:     {}", export.projects.projects.len());
            println!("  Journal:      {} entries", export.personal_development.journal.len());
        }
    }

    Ok(())
}
