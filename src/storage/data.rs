//! On-disk layout of the four storage units

use serde::{Deserialize, Serialize};

use crate::models::{
    Asset, Book, Budget, Course, Goal, HealthEntry, JournalEntry, Liability, NetworkingActivity,
    PersonalGoal, Project, Skill, Task, TimeLog, Transaction,
};

use super::table::Table;

/// `health.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HealthData {
    #[serde(default)]
    pub entries: Table<HealthEntry>,
}

/// `finance.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinanceData {
    #[serde(default)]
    pub transactions: Table<Transaction>,
    #[serde(default)]
    pub budgets: Table<Budget>,
    #[serde(default)]
    pub assets: Table<Asset>,
    #[serde(default)]
    pub liabilities: Table<Liability>,
    #[serde(default)]
    pub goals: Table<Goal>,
}

/// `projects.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectsData {
    #[serde(default)]
    pub projects: Table<Project>,
    #[serde(default)]
    pub tasks: Table<Task>,
    #[serde(default)]
    pub time_logs: Table<TimeLog>,
}

/// `personal_development.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevelopmentData {
    #[serde(default)]
    pub skills: Table<Skill>,
    #[serde(default)]
    pub books: Table<Book>,
    #[serde(default)]
    pub courses: Table<Course>,
    #[serde(default)]
    pub goals: Table<PersonalGoal>,
    #[serde(default)]
    pub journal: Table<JournalEntry>,
    #[serde(default)]
    pub networking: Table<NetworkingActivity>,
}
