//! Personal development CLI commands
//!
//! Skills, books, courses, personal goals, the encrypted journal and
//! networking activities.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::crypto::FieldCodec;
use crate::error::AimsResult;
use crate::services::{DevelopmentService, LearningInput, LearningKind};
use crate::storage::Storage;

use super::{date_or_today, parse_opt_date};

#[derive(Subcommand)]
pub enum DevCommands {
    /// Add a skill, book, course or goal
    Add {
        /// skill, book, course or goal
        kind: String,
        /// Name (or title for books)
        name: String,
        /// Book author or course platform
        #[arg(long)]
        detail: Option<String>,
        #[arg(short, long)]
        start: Option<String>,
        #[arg(short, long)]
        target: Option<String>,
        /// Starting progress (0-100)
        #[arg(short, long, default_value = "0")]
        progress: f64,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Update progress (0-100) on an item, by name or ID
    Progress {
        kind: String,
        item: String,
        progress: f64,
    },
    /// List items of one kind
    List { kind: String },
    /// Write a journal entry (stored encrypted)
    Journal {
        text: String,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Read journal entries, newest first
    JournalList {
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
    /// Record a networking event
    Network {
        event: String,
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List networking events
    NetworkList,
    /// Show suggestions from journal themes, networking and progress
    Insights,
}

pub fn handle_dev_command(storage: &Storage, settings: &Settings, cmd: DevCommands) -> AimsResult<()> {
    match cmd {
        DevCommands::Add {
            kind,
            name,
            detail,
            start,
            target,
            progress,
            notes,
        } => {
            let service = DevelopmentService::new(storage);
            let kind: LearningKind = kind.parse()?;
            let input = LearningInput {
                name,
                detail,
                start_date: parse_opt_date(start.as_deref())?,
                target_date: parse_opt_date(target.as_deref())?,
                progress,
                notes,
            };
            let (id, label) = match kind {
                LearningKind::Skill => service.add_skill(input).map(|r| (r.id.to_string(), r.name))?,
                LearningKind::Book => service.add_book(input).map(|r| (r.id.to_string(), r.title))?,
                LearningKind::Course => service.add_course(input).map(|r| (r.id.to_string(), r.name))?,
                LearningKind::Goal => service.add_goal(input).map(|r| (r.id.to_string(), r.name))?,
            };
            println!("Added {} '{}' ({})", kind.to_string().to_lowercase(), label, id);
        }

        DevCommands::Progress {
            kind,
            item,
            progress,
        } => {
            let kind: LearningKind = kind.parse()?;
            let progress = DevelopmentService::new(storage).update_progress(kind, &item, progress)?;
            println!("{} '{}' progress set to {:.0}%", kind, item, progress);
        }

        DevCommands::List { kind } => {
            let service = DevelopmentService::new(storage);
            let rows: Vec<(String, String, f64, Option<chrono::NaiveDate>)> = match kind.parse::<LearningKind>()? {
                LearningKind::Skill => service
                    .list_skills()?
                    .into_iter()
                    .map(|r| (r.id.to_string(), r.name, r.progress, r.target_date))
                    .collect(),
                LearningKind::Book => service
                    .list_books()?
                    .into_iter()
                    .map(|r| {
                        let label = if r.author.is_empty() {
                            r.title
                        } else {
                            format!("{} ({})", r.title, r.author)
                        };
                        (r.id.to_string(), label, r.progress, r.target_date)
                    })
                    .collect(),
                LearningKind::Course => service
                    .list_courses()?
                    .into_iter()
                    .map(|r| {
                        let label = if r.platform.is_empty() {
                            r.name
                        } else {
                            format!("{} ({})", r.name, r.platform)
                        };
                        (r.id.to_string(), label, r.progress, r.target_date)
                    })
                    .collect(),
                LearningKind::Goal => service
                    .list_goals()?
                    .into_iter()
                    .map(|r| (r.id.to_string(), r.name, r.progress, r.target_date))
                    .collect(),
            };

            if rows.is_empty() {
                println!("Nothing tracked yet.");
                return Ok(());
            }
            for (id, label, progress, target) in rows {
                println!(
                    "{:<14} {:<36} {:>5.0}%  {}",
                    id,
                    label,
                    progress,
                    target.map(|d| format!("target {}", d)).unwrap_or_default()
                );
            }
        }

        DevCommands::Journal { text, date } => {
            let codec = FieldCodec::new(settings.load_key()?);
            let entry = DevelopmentService::with_codec(storage, &codec)
                .add_journal_entry(date_or_today(date.as_deref())?, &text)?;
            println!("Saved journal entry {} for {}", entry.id, entry.date);
        }

        DevCommands::JournalList { limit } => {
            let codec = FieldCodec::new(settings.load_key()?);
            let entries = DevelopmentService::with_codec(storage, &codec).list_journal()?;
            if entries.is_empty() {
                println!("The journal is empty.");
            }
            for e in entries.into_iter().take(limit) {
                match e.text {
                    Ok(text) => println!("{}  {}", e.entry.date, text),
                    Err(_) => println!("{}  <unreadable with the current key>", e.entry.date),
                }
            }
        }

        DevCommands::Network { event, date, notes } => {
            let activity = DevelopmentService::new(storage).add_networking(
                &event,
                date_or_today(date.as_deref())?,
                notes,
            )?;
            println!("Recorded '{}' on {}", activity.event_name, activity.date);
        }

        DevCommands::NetworkList => {
            let activities = DevelopmentService::new(storage).list_networking()?;
            if activities.is_empty() {
                println!("No networking events recorded.");
            }
            for a in activities {
                println!("{}  {:<30} {}", a.date, a.event_name, a.notes);
            }
        }

        DevCommands::Insights => {
            let today = chrono::Local::now().date_naive();
            let insights = match settings.load_key() {
                Ok(key) => {
                    let codec = FieldCodec::new(key);
                    DevelopmentService::with_codec(storage, &codec).insights(today)?
                }
                Err(e) => {
                    log::warn!("Journal themes skipped: {}", e);
                    DevelopmentService::new(storage).insights(today)?
                }
            };
            if insights.is_empty() {
                println!("No insights right now.");
            }
            for insight in insights {
                println!("- {}", insight);
            }
        }
    }

    Ok(())
}
