//! Aggregation engine and reports
//!
//! Pure functions deriving progress, budget, net-worth and goal metrics
//! from logged rows, and report types that render them for the terminal
//! or as CSV. Zero denominators yield 0% rather than NaN or infinity.

pub mod budget_progress;
pub mod goal_progress;
pub mod net_worth;
pub mod project_progress;
pub mod spending;

pub use budget_progress::{budget_progress, BudgetProgress, BudgetProgressReport, BudgetScope};
pub use goal_progress::{goal_progress, GoalProgress, GoalProgressReport, GoalStatus};
pub use net_worth::{net_worth_series, NetWorthPoint, NetWorthReport};
pub use project_progress::{
    hours_by_task, project_progress, total_hours, ProjectProgressReport, ProjectProgressRow,
};
pub use spending::{CategoryTotal, SpendingReport};
