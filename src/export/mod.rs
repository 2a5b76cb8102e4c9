//! Export module for AIMS
//!
//! - CSV: one file per finance table (spreadsheet-compatible)
//! - JSON: every storage unit in one versioned document; encrypted fields
//!   stay as ciphertext tokens

pub mod csv;
pub mod json;

pub use self::csv::{
    export_assets_csv, export_budgets_csv, export_finance_csv, export_goals_csv,
    export_liabilities_csv, export_transactions_csv, FinanceTable,
};
pub use json::{export_full_json, import_from_json, FullExport, EXPORT_SCHEMA_VERSION};
