//! Project, task and time-log CLI commands
//!
//! Tasks are addressed by ID; projects by name or ID.

use clap::Subcommand;

use crate::error::AimsResult;
use crate::models::Project;
use crate::services::{CreateProjectInput, CreateTaskInput, ProjectService, TaskChange};
use crate::storage::Storage;

use super::{date_or_today, parse_opt_date};

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    Create {
        name: String,
        /// Project type (e.g., Personal, Work)
        #[arg(short, long)]
        kind: Option<String>,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        deadline: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List projects with their progress
    List,
    /// Show a project and its tasks
    Show {
        /// Project name or ID
        project: String,
    },
    /// Change a project's status (planning, in-progress, completed)
    Status { project: String, status: String },
    /// Show suggestions about deadlines and stalled projects
    Insights,
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a project
    Add {
        /// Project name or ID
        project: String,
        name: String,
        #[arg(short, long)]
        deadline: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Mark a task complete
    Done { task: String },
    /// Mark a task incomplete
    Undo { task: String },
    /// Flip a task's completion
    Toggle { task: String },
    /// List a project's tasks
    List { project: String },
}

#[derive(Subcommand)]
pub enum TimeCommands {
    /// Log hours spent on a task
    Log {
        task: String,
        hours: f64,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List time logs, optionally for one task
    List {
        #[arg(short, long)]
        task: Option<String>,
    },
}

pub fn handle_project_command(storage: &Storage, cmd: ProjectCommands) -> AimsResult<()> {
    let service = ProjectService::new(storage);

    match cmd {
        ProjectCommands::Create {
            name,
            kind,
            start,
            deadline,
            notes,
        } => {
            let project = service.create_project(CreateProjectInput {
                name,
                kind,
                start_date: parse_opt_date(start.as_deref())?,
                deadline: parse_opt_date(deadline.as_deref())?,
                notes,
            })?;
            println!("Created project: {} ({})", project.name, project.id);
        }

        ProjectCommands::List => {
            let projects = service.list_projects()?;
            if projects.is_empty() {
                println!("No projects yet. Create one with: aims project create <name>");
                return Ok(());
            }
            println!(
                "{:<14} {:<24} {:<12} {:<12} {:>9}",
                "ID", "Name", "Status", "Deadline", "Progress"
            );
            println!("{}", "-".repeat(75));
            for project in &projects {
                print_project_row(project);
            }
        }

        ProjectCommands::Show { project } => {
            let project = service.find_project(&project)?;
            println!("{} ({})", project.name, project.id);
            if !project.kind.is_empty() {
                println!("  Type:     {}", project.kind);
            }
            println!("  Status:   {}", project.status);
            println!("  Started:  {}", project.start_date);
            if let Some(deadline) = project.deadline {
                println!("  Deadline: {}", deadline);
            }
            println!("  Progress: {:.1}%", project.progress);
            if !project.notes.is_empty() {
                println!("  Notes:    {}", project.notes);
            }

            let tasks = service.list_tasks(project.id)?;
            println!();
            if tasks.is_empty() {
                println!("  No tasks.");
            }
            for task in tasks {
                println!(
                    "  [{}] {:<14} {}{}",
                    if task.completed { "x" } else { " " },
                    task.id.to_string(),
                    task.name,
                    task.deadline
                        .map(|d| format!(" (due {})", d))
                        .unwrap_or_default()
                );
            }
        }

        ProjectCommands::Status { project, status } => {
            let project = service.find_project(&project)?;
            let updated = service.set_status(project.id, status.parse()?)?;
            println!("{} is now {}", updated.name, updated.status);
        }

        ProjectCommands::Insights => {
            let insights = service.insights(chrono::Local::now().date_naive())?;
            if insights.is_empty() {
                println!("No project insights right now. Keep it up!");
            }
            for insight in insights {
                println!("- {}", insight);
            }
        }
    }

    Ok(())
}

fn print_project_row(project: &Project) {
    println!(
        "{:<14} {:<24} {:<12} {:<12} {:>8.1}%",
        project.id.to_string(),
        project.name,
        project.status.to_string(),
        project
            .deadline
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into()),
        project.progress
    );
}

fn print_task_change(change: &TaskChange) {
    println!(
        "Task '{}' is {}",
        change.task.name,
        if change.task.completed { "complete" } else { "incomplete" }
    );
    println!(
        "{} progress: {:.1}% -> {:.1}%",
        change.project.name, change.previous_progress, change.project.progress
    );
}

pub fn handle_task_command(storage: &Storage, cmd: TaskCommands) -> AimsResult<()> {
    let service = ProjectService::new(storage);

    match cmd {
        TaskCommands::Add {
            project,
            name,
            deadline,
            notes,
        } => {
            let project = service.find_project(&project)?;
            let change = service.add_task(
                project.id,
                CreateTaskInput {
                    name,
                    deadline: parse_opt_date(deadline.as_deref())?,
                    notes,
                },
            )?;
            println!("Added task {} ({})", change.task.name, change.task.id);
            println!(
                "{} progress: {:.1}% -> {:.1}%",
                change.project.name, change.previous_progress, change.project.progress
            );
        }

        TaskCommands::Done { task } => {
            let task = service.find_task(&task)?;
            print_task_change(&service.set_task_completed(task.id, true)?);
        }

        TaskCommands::Undo { task } => {
            let task = service.find_task(&task)?;
            print_task_change(&service.set_task_completed(task.id, false)?);
        }

        TaskCommands::Toggle { task } => {
            let task = service.find_task(&task)?;
            print_task_change(&service.toggle_task(task.id)?);
        }

        TaskCommands::List { project } => {
            let project = service.find_project(&project)?;
            let tasks = service.list_tasks(project.id)?;
            if tasks.is_empty() {
                println!("{} has no tasks.", project.name);
                return Ok(());
            }
            let today = chrono::Local::now().date_naive();
            for task in tasks {
                println!(
                    "[{}] {:<14} {:<30} {}{}",
                    if task.completed { "x" } else { " " },
                    task.id.to_string(),
                    task.name,
                    task.deadline.map(|d| d.to_string()).unwrap_or_default(),
                    if task.is_overdue(today) { "  OVERDUE" } else { "" }
                );
            }
        }
    }

    Ok(())
}

pub fn handle_time_command(storage: &Storage, cmd: TimeCommands) -> AimsResult<()> {
    let service = ProjectService::new(storage);

    match cmd {
        TimeCommands::Log {
            task,
            hours,
            date,
            notes,
        } => {
            let task = service.find_task(&task)?;
            let log = service.log_time(task.id, date_or_today(date.as_deref())?, hours, notes)?;
            println!("Logged {:.2}h on '{}' for {}", log.hours, task.name, log.date);
        }

        TimeCommands::List { task } => {
            let task_id = match task {
                Some(t) => Some(service.find_task(&t)?.id),
                None => None,
            };
            let logs = service.list_time_logs(task_id)?;
            if logs.is_empty() {
                println!("No time logged.");
                return Ok(());
            }
            let mut total = 0.0;
            for log in &logs {
                total += log.hours;
                println!(
                    "{:<12} {:<14} {:>6.2}h  {}",
                    log.date.to_string(),
                    log.task_id.to_string(),
                    log.hours,
                    log.notes
                );
            }
            println!("{}", "-".repeat(40));
            println!("Total: {:.2}h", total);
        }
    }

    Ok(())
}
