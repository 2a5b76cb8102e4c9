//! Core data models for AIMS
//!
//! Rows for the four storage units: health, finance, projects and personal
//! development, plus the value types they share (ids, money, months).

pub mod development;
pub mod finance;
pub mod health;
pub mod ids;
pub mod money;
pub mod month;
pub mod project;
pub mod record;

pub use development::{Book, Course, JournalEntry, NetworkingActivity, PersonalGoal, Skill};
pub use finance::{
    Asset, Budget, Goal, Liability, Transaction, TransactionKind, EXPENSE_CATEGORIES,
    INCOME_CATEGORIES,
};
pub use health::{EntrySource, HealthEntry, Nutrition, MOOD_CHOICES};
pub use ids::{
    AssetId, BookId, BudgetId, CourseId, GoalId, HealthEntryId, JournalEntryId, LiabilityId,
    NetworkingId, PersonalGoalId, ProjectId, SkillId, TaskId, TimeLogId, TransactionId,
};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthParseError};
pub use project::{Project, ProjectStatus, Task, TimeLog};
pub use record::Record;
