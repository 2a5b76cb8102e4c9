//! AIMS - personal life-tracking core
//!
//! This library provides the core functionality behind the `aims` command:
//! daily health logs with an encrypted mood field, income and expense
//! tracking with month-scoped budgets, net worth and savings goals,
//! projects with task-driven progress, and a personal development tracker
//! with an encrypted journal.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `crypto`: Field-level AES-256-GCM encryption
//! - `models`: Core data models (health entries, transactions, projects, etc.)
//! - `storage`: JSON file storage, one file per domain
//! - `audit`: Audit logging system
//! - `services`: Business logic layer
//! - `reports`: Derived metrics (progress, budgets, net worth, goals)
//! - `insights`: Rule-based suggestions
//! - `export`: CSV and JSON export
//! - `logging`: Rolling diagnostic log files
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use aims::config::{paths::AimsPaths, settings::Settings};
//! use aims::storage::Storage;
//!
//! let paths = AimsPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(paths)?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod export;
pub mod insights;
pub mod logging;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::AimsError;
