//! Project service
//!
//! Every change to a project's task set (adding a task, completing or
//! reopening one) recomputes the project's persisted progress in the same
//! projects transaction as the change itself.

use chrono::NaiveDate;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{AimsError, AimsResult};
use crate::insights::{project_insights, ProjectInsight};
use crate::models::{Project, ProjectId, ProjectStatus, Task, TaskId, TimeLog};
use crate::reports::{project_progress, ProjectProgressReport};
use crate::storage::{ProjectsData, Storage};

/// Input for creating a project
#[derive(Debug, Clone, Default)]
pub struct CreateProjectInput {
    pub name: String,
    pub kind: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for adding a task
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub name: String,
    pub deadline: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// A task change and the project progress it produced
#[derive(Debug, Clone)]
pub struct TaskChange {
    pub task: Task,
    pub project: Project,
    /// Project progress before the change
    pub previous_progress: f64,
}

pub struct ProjectService<'a> {
    storage: &'a Storage,
}

/// Recompute and store `project_id`'s progress; returns (before, after)
fn refresh_progress(data: &mut ProjectsData, project_id: ProjectId) -> AimsResult<(Project, Project)> {
    let progress = project_progress(data.tasks.all(), project_id);
    data.projects
        .update(project_id, |project| {
            let before = project.clone();
            project.progress = progress;
            Ok((before, project.clone()))
        })
        .unwrap_or_else(|| Err(AimsError::project_not_found(project_id.to_string())))
}

impl<'a> ProjectService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create_project(&self, input: CreateProjectInput) -> AimsResult<Project> {
        let start = input
            .start_date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let mut project = Project::new(input.name.trim(), start);
        project.kind = input.kind.unwrap_or_default();
        project.deadline = input.deadline;
        project.notes = input.notes.unwrap_or_default();
        project.validate()?;

        self.storage.projects.transaction(|data| {
            if data
                .projects
                .find(|p| p.name.eq_ignore_ascii_case(&project.name))
                .is_some()
            {
                return Err(AimsError::Validation(format!(
                    "A project named '{}' already exists",
                    project.name
                )));
            }
            data.projects.insert(project.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::Project,
            project.id.to_string(),
            Some(project.name.clone()),
            &project,
        )?;
        Ok(project)
    }

    /// Find a project by id or name (case-insensitive)
    pub fn find_project(&self, identifier: &str) -> AimsResult<Project> {
        let identifier = identifier.trim();
        self.storage
            .projects
            .read(|data| {
                data.projects
                    .find(|p| p.id.matches(identifier))
                    .or_else(|| {
                        data.projects
                            .find(|p| p.name.eq_ignore_ascii_case(identifier))
                    })
                    .cloned()
            })?
            .ok_or_else(|| AimsError::project_not_found(identifier))
    }

    /// Find a task by full or short id
    pub fn find_task(&self, identifier: &str) -> AimsResult<Task> {
        self.storage
            .projects
            .read(|data| data.tasks.find(|t| t.id.matches(identifier)).cloned())?
            .ok_or_else(|| AimsError::task_not_found(identifier))
    }

    pub fn list_projects(&self) -> AimsResult<Vec<Project>> {
        self.storage.projects.read(|data| data.projects.all().to_vec())
    }

    /// Tasks of one project in creation order
    pub fn list_tasks(&self, project_id: ProjectId) -> AimsResult<Vec<Task>> {
        self.storage.projects.read(|data| {
            data.tasks
                .iter()
                .filter(|t| t.project_id == project_id)
                .cloned()
                .collect()
        })
    }

    pub fn set_status(&self, project_id: ProjectId, status: ProjectStatus) -> AimsResult<Project> {
        let (before, after) = self.storage.projects.transaction(|data| {
            data.projects
                .update(project_id, |project| {
                    let before = project.clone();
                    project.status = status;
                    Ok((before, project.clone()))
                })
                .unwrap_or_else(|| Err(AimsError::project_not_found(project_id.to_string())))
        })?;

        self.storage.log_update(
            EntityType::Project,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;
        Ok(after)
    }

    /// Add a task and recompute the project's progress
    pub fn add_task(&self, project_id: ProjectId, input: CreateTaskInput) -> AimsResult<TaskChange> {
        let mut task = Task::new(project_id, input.name.trim());
        task.deadline = input.deadline;
        task.notes = input.notes.unwrap_or_default();
        task.validate()?;

        let (before, after) = self.storage.projects.transaction(|data| {
            if data.projects.get(project_id).is_none() {
                return Err(AimsError::project_not_found(project_id.to_string()));
            }
            data.tasks.insert(task.clone());
            refresh_progress(data, project_id)
        })?;

        self.log_task_change(
            AuditEntry::create(
                EntityType::Task,
                task.id.to_string(),
                Some(task.name.clone()),
                &task,
            ),
            &before,
            &after,
        )?;

        Ok(TaskChange {
            task,
            previous_progress: before.progress,
            project: after,
        })
    }

    /// Mark a task complete or incomplete and recompute progress
    pub fn set_task_completed(&self, task_id: TaskId, completed: bool) -> AimsResult<TaskChange> {
        self.change_task(task_id, |_| completed)
    }

    /// Flip a task's completion flag and recompute progress
    pub fn toggle_task(&self, task_id: TaskId) -> AimsResult<TaskChange> {
        self.change_task(task_id, |current| !current)
    }

    fn change_task(
        &self,
        task_id: TaskId,
        next: impl FnOnce(bool) -> bool,
    ) -> AimsResult<TaskChange> {
        let (task_before, task_after, project_before, project_after) =
            self.storage.projects.transaction(|data| {
                let (task_before, task_after) = data
                    .tasks
                    .update(task_id, |task| {
                        let before = task.clone();
                        task.completed = next(task.completed);
                        Ok((before, task.clone()))
                    })
                    .unwrap_or_else(|| Err(AimsError::task_not_found(task_id.to_string())))?;

                let (project_before, project_after) =
                    refresh_progress(data, task_after.project_id)?;
                Ok((task_before, task_after, project_before, project_after))
            })?;

        self.log_task_change(
            AuditEntry::update(
                EntityType::Task,
                task_after.id.to_string(),
                Some(task_after.name.clone()),
                &task_before,
                &task_after,
            ),
            &project_before,
            &project_after,
        )?;

        log::info!(
            "Task {} completed={}, project {} progress {:.2}% -> {:.2}%",
            task_after.id,
            task_after.completed,
            project_after.id,
            project_before.progress,
            project_after.progress
        );

        Ok(TaskChange {
            task: task_after,
            previous_progress: project_before.progress,
            project: project_after,
        })
    }

    fn log_task_change(
        &self,
        task_entry: AuditEntry,
        project_before: &Project,
        project_after: &Project,
    ) -> AimsResult<()> {
        let mut entries = vec![task_entry];
        if project_before.progress != project_after.progress {
            entries.push(AuditEntry::update(
                EntityType::Project,
                project_after.id.to_string(),
                Some(project_after.name.clone()),
                project_before,
                project_after,
            ));
        }
        self.storage.log_create_batch(entries)
    }

    /// Record hours spent on a task
    pub fn log_time(
        &self,
        task_id: TaskId,
        date: NaiveDate,
        hours: f64,
        notes: Option<String>,
    ) -> AimsResult<TimeLog> {
        let mut log = TimeLog::new(task_id, date, hours);
        log.notes = notes.unwrap_or_default();
        log.validate()?;

        self.storage.projects.transaction(|data| {
            if data.tasks.get(task_id).is_none() {
                return Err(AimsError::task_not_found(task_id.to_string()));
            }
            data.time_logs.insert(log.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::TimeLog,
            log.id.to_string(),
            Some(format!("{} {}h", log.date, log.hours)),
            &log,
        )?;
        Ok(log)
    }

    /// Time logs, optionally for one task, oldest first
    pub fn list_time_logs(&self, task_id: Option<TaskId>) -> AimsResult<Vec<TimeLog>> {
        let mut logs = self.storage.projects.read(|data| {
            data.time_logs
                .iter()
                .filter(|l| task_id.map_or(true, |id| l.task_id == id))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        logs.sort_by_key(|l| l.date);
        Ok(logs)
    }

    pub fn report(&self) -> AimsResult<ProjectProgressReport> {
        ProjectProgressReport::generate(self.storage)
    }

    /// Rule-based findings over every project and task
    pub fn insights(&self, today: NaiveDate) -> AimsResult<Vec<ProjectInsight>> {
        self.storage.projects.read(|data| {
            project_insights(data.projects.all(), data.tasks.all(), today)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::AimsPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn project(service: &ProjectService, name: &str) -> Project {
        service
            .create_project(CreateProjectInput {
                name: name.to_string(),
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..Default::default()
            })
            .unwrap()
    }

    fn task(name: &str) -> CreateTaskInput {
        CreateTaskInput {
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn round2(x: f64) -> f64 {
        (x * 100.0).round() / 100.0
    }

    #[test]
    fn test_empty_project_has_zero_progress() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);

        let p = project(&service, "Garden");
        assert_eq!(p.progress, 0.0);
        assert!(service.list_tasks(p.id).unwrap().is_empty());
    }

    #[test]
    fn test_progress_follows_task_changes() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let p = project(&service, "Garden");

        let t1 = service.add_task(p.id, task("Plan beds")).unwrap().task;
        let t2 = service.add_task(p.id, task("Buy seeds")).unwrap().task;
        let change = service.add_task(p.id, task("Plant")).unwrap();
        assert_eq!(change.project.progress, 0.0);

        let change = service.set_task_completed(t1.id, true).unwrap();
        assert_eq!(round2(change.project.progress), 33.33);

        let change = service.toggle_task(t2.id).unwrap();
        assert!(change.task.completed);
        assert_eq!(round2(change.previous_progress), 33.33);
        assert_eq!(round2(change.project.progress), 66.67);

        // persisted on the project row
        let stored = service.find_project("garden").unwrap();
        assert_eq!(round2(stored.progress), 66.67);

        // adding a task lowers it again
        let change = service.add_task(p.id, task("Water")).unwrap();
        assert_eq!(change.project.progress, 50.0);
    }

    #[test]
    fn test_task_change_is_audited_with_project_update() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let p = project(&service, "Garden");
        let t = service.add_task(p.id, task("Dig")).unwrap().task;

        service.toggle_task(t.id).unwrap();

        let entries = storage.audit().read_all().unwrap();
        let last_two: Vec<(Operation, EntityType)> = entries[entries.len() - 2..]
            .iter()
            .map(|e| (e.operation, e.entity_type))
            .collect();
        assert_eq!(
            last_two,
            vec![
                (Operation::Update, EntityType::Task),
                (Operation::Update, EntityType::Project)
            ]
        );
    }

    #[test]
    fn test_add_task_to_unknown_project() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);

        let err = service.add_task(ProjectId::new(), task("Orphan")).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(storage.projects.read(|d| d.tasks.len()).unwrap(), 0);
    }

    #[test]
    fn test_toggle_unknown_task() {
        let (_temp_dir, storage) = create_test_storage();
        let err = ProjectService::new(&storage)
            .toggle_task(TaskId::new())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_time_logs() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let p = project(&service, "Garden");
        let t = service.add_task(p.id, task("Dig")).unwrap().task;
        let day = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();

        service.log_time(t.id, day, 1.5, None).unwrap();
        service.log_time(t.id, day, 2.0, Some("second pass".into())).unwrap();
        assert!(service.log_time(t.id, day, 0.0, None).unwrap_err().is_validation());
        assert!(service
            .log_time(TaskId::new(), day, 1.0, None)
            .unwrap_err()
            .is_not_found());

        assert_eq!(service.list_time_logs(Some(t.id)).unwrap().len(), 2);
        let report = service.report().unwrap();
        assert_eq!(report.rows[0].hours_logged, 3.5);
    }

    #[test]
    fn test_set_status() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        let p = project(&service, "Garden");

        let updated = service.set_status(p.id, ProjectStatus::InProgress).unwrap();
        assert_eq!(updated.status, ProjectStatus::InProgress);
    }

    #[test]
    fn test_duplicate_project_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        project(&service, "Garden");

        let err = service
            .create_project(CreateProjectInput {
                name: "GARDEN".into(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_insights_flag_empty_projects() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ProjectService::new(&storage);
        project(&service, "Garden");

        let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let insights = service.insights(today).unwrap();
        assert!(insights
            .iter()
            .any(|i| matches!(i, ProjectInsight::NoTasks { project } if project == "Garden")));
    }
}
