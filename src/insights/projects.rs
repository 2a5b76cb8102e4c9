//! Project and task insights

use std::fmt;

use chrono::NaiveDate;

use crate::models::{Project, ProjectId, Task};

use super::LOW_PROGRESS_PERCENT;

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectInsight {
    /// A project with no tasks at all
    NoTasks { project: String },
    /// An incomplete task whose deadline has passed
    OverdueTask {
        task: String,
        project: String,
        deadline: NaiveDate,
    },
    LowProgress { project: String, progress: f64 },
    /// A task due today or later
    Upcoming {
        task: String,
        project: String,
        deadline: NaiveDate,
    },
}

impl fmt::Display for ProjectInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTasks { project } => {
                write!(f, "{} has no tasks. Add tasks to start making progress.", project)
            }
            Self::OverdueTask {
                task,
                project,
                deadline,
            } => write!(f, "{} in {} is overdue (deadline: {}).", task, project, deadline),
            Self::LowProgress { project, progress } => write!(
                f,
                "{} is only {:.1}% complete. Focus on completing tasks.",
                project, progress
            ),
            Self::Upcoming {
                task,
                project,
                deadline,
            } => write!(f, "Prioritize {} in {} (deadline: {}).", task, project, deadline),
        }
    }
}

fn project_name(projects: &[Project], id: ProjectId) -> String {
    projects
        .iter()
        .find(|p| p.id == id)
        .map(|p| p.name.clone())
        .unwrap_or_else(|| id.to_string())
}

/// Findings grouped in rule order: empty projects, overdue tasks, low
/// progress, then upcoming deadlines (soonest first)
pub fn project_insights(
    projects: &[Project],
    tasks: &[Task],
    today: NaiveDate,
) -> Vec<ProjectInsight> {
    let mut insights: Vec<ProjectInsight> = projects
        .iter()
        .filter(|p| !tasks.iter().any(|t| t.project_id == p.id))
        .map(|p| ProjectInsight::NoTasks {
            project: p.name.clone(),
        })
        .collect();

    insights.extend(tasks.iter().filter(|t| t.is_overdue(today)).filter_map(|t| {
        Some(ProjectInsight::OverdueTask {
            task: t.name.clone(),
            project: project_name(projects, t.project_id),
            deadline: t.deadline?,
        })
    }));

    insights.extend(
        projects
            .iter()
            .filter(|p| p.progress < LOW_PROGRESS_PERCENT)
            .map(|p| ProjectInsight::LowProgress {
                project: p.name.clone(),
                progress: p.progress,
            }),
    );

    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| !t.completed && t.deadline.is_some_and(|d| d >= today))
        .collect();
    upcoming.sort_by_key(|t| t.deadline);
    insights.extend(upcoming.into_iter().filter_map(|t| {
        Some(ProjectInsight::Upcoming {
            task: t.name.clone(),
            project: project_name(projects, t.project_id),
            deadline: t.deadline?,
        })
    }));

    insights
}
