//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// Kinds of rows that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    HealthEntry,
    Transaction,
    Budget,
    Asset,
    Liability,
    Goal,
    Project,
    Task,
    TimeLog,
    Skill,
    Book,
    Course,
    PersonalGoal,
    JournalEntry,
    NetworkingActivity,
}

impl EntityType {
    /// Storage unit the entity belongs to
    pub fn unit(&self) -> &'static str {
        match self {
            EntityType::HealthEntry => "health",
            EntityType::Transaction
            | EntityType::Budget
            | EntityType::Asset
            | EntityType::Liability
            | EntityType::Goal => "finance",
            EntityType::Project | EntityType::Task | EntityType::TimeLog => "projects",
            EntityType::Skill
            | EntityType::Book
            | EntityType::Course
            | EntityType::PersonalGoal
            | EntityType::JournalEntry
            | EntityType::NetworkingActivity => "personal_development",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityType::HealthEntry => "HealthEntry",
            EntityType::Transaction => "Transaction",
            EntityType::Budget => "Budget",
            EntityType::Asset => "Asset",
            EntityType::Liability => "Liability",
            EntityType::Goal => "Goal",
            EntityType::Project => "Project",
            EntityType::Task => "Task",
            EntityType::TimeLog => "TimeLog",
            EntityType::Skill => "Skill",
            EntityType::Book => "Book",
            EntityType::Course => "Course",
            EntityType::PersonalGoal => "PersonalGoal",
            EntityType::JournalEntry => "JournalEntry",
            EntityType::NetworkingActivity => "NetworkingActivity",
        };
        f.write_str(name)
    }
}

impl EntityType {
    pub const ALL: [EntityType; 15] = [
        EntityType::HealthEntry,
        EntityType::Transaction,
        EntityType::Budget,
        EntityType::Asset,
        EntityType::Liability,
        EntityType::Goal,
        EntityType::Project,
        EntityType::Task,
        EntityType::TimeLog,
        EntityType::Skill,
        EntityType::Book,
        EntityType::Course,
        EntityType::PersonalGoal,
        EntityType::JournalEntry,
        EntityType::NetworkingActivity,
    ];
}

impl std::str::FromStr for EntityType {
    type Err = String;

    /// Accepts "TimeLog", "time_log" or "time-log"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        EntityType::ALL
            .into_iter()
            .find(|kind| kind.to_string().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown entity type '{}'", s))
    }
}

/// A single audit log line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: Operation,
    pub entity_type: EntityType,
    pub entity_id: String,

    /// Label for humans (project name, category, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(
        operation: Operation,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id,
            entity_name,
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    /// Entry for a newly inserted row
    pub fn create<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Create, entity_type, entity_id.into(), entity_name);
        entry.after = serde_json::to_value(entity).ok();
        entry
    }

    /// Entry for a changed row; the diff is computed from the two snapshots
    pub fn update<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Update, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(before).ok();
        entry.after = serde_json::to_value(after).ok();
        entry.diff_summary = match (&entry.before, &entry.after) {
            (Some(b), Some(a)) => super::generate_diff(b, a),
            _ => None,
        };
        entry
    }

    /// Entry for a removed row
    pub fn delete<T: Serialize>(
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Self {
        let mut entry = Self::new(Operation::Delete, entity_type, entity_id.into(), entity_name);
        entry.before = serde_json::to_value(entity).ok();
        entry
    }

    /// One or two lines for `aims audit`
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(name) = &self.entity_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}
