//! Project models
//!
//! A project owns tasks; a task owns time logs. `Project::progress` is a
//! persisted copy of the completed-task percentage and is rewritten every
//! time the project's task set changes.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{ProjectId, TaskId, TimeLogId};
use super::record::{impl_record, validate_name};
use crate::error::{AimsError, AimsResult};

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    InProgress,
    Completed,
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "Planning"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = AimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "planning" => Ok(Self::Planning),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(AimsError::Validation(format!(
                "Unknown project status '{}'",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,

    /// Free-form type, e.g. "Personal" or "Work"
    #[serde(default)]
    pub kind: String,

    #[serde(default)]
    pub status: ProjectStatus,

    pub start_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Percentage of completed tasks, 0 when the project has none
    #[serde(default)]
    pub progress: f64,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl_record!(Project, ProjectId);

impl Project {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            kind: String::new(),
            status: ProjectStatus::Planning,
            start_date,
            deadline: None,
            progress: 0.0,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Project name", &self.name)?;
        if let Some(deadline) = self.deadline {
            if deadline < self.start_date {
                return Err(AimsError::Validation(format!(
                    "Deadline {} is before start date {}",
                    deadline, self.start_date
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project_id: ProjectId,
    pub name: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,
}

impl_record!(Task, TaskId);

impl Task {
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            project_id,
            name: name.into(),
            completed: false,
            deadline: None,
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Incomplete and past its deadline
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.deadline.is_some_and(|d| d < today)
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Task name", &self.name)
    }
}

/// Hours spent on a task on a given day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeLog {
    pub id: TimeLogId,
    pub task_id: TaskId,
    pub date: NaiveDate,
    pub hours: f64,
    #[serde(default)]
    pub notes: String,
}

impl_record!(TimeLog, TimeLogId);

impl TimeLog {
    pub fn new(task_id: TaskId, date: NaiveDate, hours: f64) -> Self {
        Self {
            id: TimeLogId::new(),
            task_id,
            date,
            hours,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        if !self.hours.is_finite() || self.hours <= 0.0 || self.hours > 24.0 {
            return Err(AimsError::Validation(format!(
                "Hours must be greater than 0 and at most 24, got {}",
                self.hours
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("In Progress".parse::<ProjectStatus>().unwrap(), ProjectStatus::InProgress);
        assert_eq!("in_progress".parse::<ProjectStatus>().unwrap(), ProjectStatus::InProgress);
        assert_eq!("done".parse::<ProjectStatus>().unwrap(), ProjectStatus::Completed);
        assert!("paused".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_project_deadline_validation() {
        let mut project = Project::new("Garden", date(10));
        project.deadline = Some(date(9));
        assert!(project.validate().is_err());
        project.deadline = Some(date(11));
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_task_overdue() {
        let mut task = Task::new(ProjectId::new(), "Dig beds");
        assert!(!task.is_overdue(date(20)));

        task.deadline = Some(date(15));
        assert!(task.is_overdue(date(20)));
        assert!(!task.is_overdue(date(15)));

        task.completed = true;
        assert!(!task.is_overdue(date(20)));
    }

    #[test]
    fn test_time_log_hours() {
        let task_id = TaskId::new();
        assert!(TimeLog::new(task_id, date(1), 1.5).validate().is_ok());
        assert!(TimeLog::new(task_id, date(1), 0.0).validate().is_err());
        assert!(TimeLog::new(task_id, date(1), 25.0).validate().is_err());
    }
}
