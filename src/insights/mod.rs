//! Rule-based insights
//!
//! Pure functions over rows already loaded from storage. Each rule yields
//! typed findings; `Display` renders them as one line of advice.

pub mod categorize;
pub mod development;
pub mod projects;

pub use categorize::categorize_expense;
pub use development::{development_insights, DevelopmentInsight, JOURNAL_KEYWORDS};
pub use projects::{project_insights, ProjectInsight};

/// Progress below this percentage is flagged as low
pub const LOW_PROGRESS_PERCENT: f64 = 50.0;
