//! Service layer for AIMS
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, sealing of encrypted fields, derived-value write-back and
//! audit logging.

pub mod balance;
pub mod budget;
pub mod development;
pub mod goal;
pub mod health;
pub mod health_import;
pub mod import;
pub mod nutrition;
pub mod project;
pub mod transaction;

pub use balance::{BalanceInput, BalanceService};
pub use budget::BudgetService;
pub use development::{DecryptedJournalEntry, DevelopmentService, LearningInput, LearningKind};
pub use goal::GoalService;
pub use health::{DecryptedHealthEntry, HealthLogInput, HealthService};
pub use health_import::{HealthImportService, HealthImportSummary};
pub use import::{ImportResult, ImportService};
pub use nutrition::{NutritionLookup, NutritionixClient};
pub use project::{CreateProjectInput, CreateTaskInput, ProjectService, TaskChange};
pub use transaction::{CreateTransactionInput, TransactionFilter, TransactionService};
