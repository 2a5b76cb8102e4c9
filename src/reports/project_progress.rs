//! Project Progress Report
//!
//! Completed-task percentage per project, plus logged hours.

use std::collections::HashMap;
use std::io::Write;

use crate::error::{AimsError, AimsResult};
use crate::models::{Project, ProjectId, ProjectStatus, Task, TaskId, TimeLog};
use crate::storage::Storage;

/// `100 * completed / total` over the project's tasks, or 0 with no tasks
///
/// Bounded to 0..=100 by construction.
pub fn project_progress(tasks: &[Task], project_id: ProjectId) -> f64 {
    let (total, completed) = tasks
        .iter()
        .filter(|t| t.project_id == project_id)
        .fold((0usize, 0usize), |(total, done), t| {
            (total + 1, done + usize::from(t.completed))
        });

    if total == 0 {
        0.0
    } else {
        100.0 * completed as f64 / total as f64
    }
}

/// Hours logged per task
pub fn hours_by_task(time_logs: &[TimeLog]) -> HashMap<TaskId, f64> {
    let mut hours = HashMap::new();
    for log in time_logs {
        *hours.entry(log.task_id).or_insert(0.0) += log.hours;
    }
    hours
}

/// Hours logged across every task
pub fn total_hours(time_logs: &[TimeLog]) -> f64 {
    time_logs.iter().map(|l| l.hours).sum()
}

#[derive(Debug, Clone)]
pub struct ProjectProgressRow {
    pub project_id: ProjectId,
    pub name: String,
    pub status: ProjectStatus,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Persisted progress from the project row
    pub progress: f64,
    pub hours_logged: f64,
}

#[derive(Debug, Clone)]
pub struct ProjectProgressReport {
    pub rows: Vec<ProjectProgressRow>,
    pub total_hours: f64,
}

impl ProjectProgressReport {
    /// Build from in-memory rows
    pub fn from_rows(projects: &[Project], tasks: &[Task], time_logs: &[TimeLog]) -> Self {
        let hours = hours_by_task(time_logs);

        let rows = projects
            .iter()
            .map(|project| {
                let project_tasks: Vec<&Task> =
                    tasks.iter().filter(|t| t.project_id == project.id).collect();

                ProjectProgressRow {
                    project_id: project.id,
                    name: project.name.clone(),
                    status: project.status,
                    total_tasks: project_tasks.len(),
                    completed_tasks: project_tasks.iter().filter(|t| t.completed).count(),
                    progress: project.progress,
                    hours_logged: project_tasks
                        .iter()
                        .filter_map(|t| hours.get(&t.id))
                        .sum(),
                }
            })
            .collect();

        Self {
            rows,
            total_hours: total_hours(time_logs),
        }
    }

    pub fn generate(storage: &Storage) -> AimsResult<Self> {
        storage.projects.read(|data| {
            Self::from_rows(data.projects.all(), data.tasks.all(), data.time_logs.all())
        })
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Project Progress\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{:<12} {:<24} {:<12} {:>7} {:>8} {:>6}\n",
            "ID", "Project", "Status", "Tasks", "Progress", "Hours"
        ));
        output.push_str(&"-".repeat(72));
        output.push('\n');

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:<24} {:<12} {:>3}/{:<3} {:>7.2}% {:>6.1}\n",
                row.project_id.to_string(),
                truncate(&row.name, 24),
                row.status.to_string(),
                row.completed_tasks,
                row.total_tasks,
                row.progress,
                row.hours_logged
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!("Total hours logged: {:.1}\n", self.total_hours));
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AimsResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Project", "Status", "Completed Tasks", "Total Tasks", "Progress", "Hours"])
            .map_err(|e| AimsError::Export(e.to_string()))?;

        for row in &self.rows {
            csv.write_record([
                row.name.clone(),
                row.status.to_string(),
                row.completed_tasks.to_string(),
                row.total_tasks.to_string(),
                format!("{:.2}", row.progress),
                format!("{:.2}", row.hours_logged),
            ])
            .map_err(|e| AimsError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| AimsError::Export(e.to_string()))
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn test_no_tasks_is_zero() {
        assert_eq!(project_progress(&[], ProjectId::new()), 0.0);
    }

    #[test]
    fn test_one_of_three_then_two_of_three() {
        let project = ProjectId::new();
        let mut tasks: Vec<Task> = (0..3).map(|i| Task::new(project, format!("t{}", i))).collect();
        tasks[0].completed = true;

        let progress = project_progress(&tasks, project);
        assert!((progress - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(format!("{:.2}", progress), "33.33");

        tasks[1].completed = true;
        assert_eq!(format!("{:.2}", project_progress(&tasks, project)), "66.67");
    }

    #[test]
    fn test_other_projects_ignored() {
        let project = ProjectId::new();
        let mut other = Task::new(ProjectId::new(), "elsewhere");
        other.completed = true;
        let tasks = vec![Task::new(project, "mine"), other];

        assert_eq!(project_progress(&tasks, project), 0.0);
    }

    #[test]
    fn test_report_rows_and_hours() {
        let mut project = Project::new("Garden", date());
        project.progress = 50.0;
        let mut done = Task::new(project.id, "Dig");
        done.completed = true;
        let open = Task::new(project.id, "Plant");
        let logs = vec![
            TimeLog::new(done.id, date(), 1.5),
            TimeLog::new(done.id, date(), 2.0),
            TimeLog::new(open.id, date(), 0.5),
        ];

        let report = ProjectProgressReport::from_rows(&[project], &[done, open], &logs);
        assert_eq!(report.rows[0].completed_tasks, 1);
        assert_eq!(report.rows[0].total_tasks, 2);
        assert_eq!(report.rows[0].hours_logged, 4.0);
        assert_eq!(report.total_hours, 4.0);

        let text = report.format_terminal();
        assert!(text.contains("Garden"));
        assert!(text.contains("50.00%"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.starts_with("Project,Status"));
        assert!(csv.contains("Garden,Planning,1,2,50.00,4.00"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long project name", 8), "a very …");
    }
}
