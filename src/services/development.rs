//! Personal development service
//!
//! Skills, books, courses and personal goals with a 0-100 progress value,
//! networking activities, and a journal whose entries are sealed with the
//! field codec before they are stored.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::audit::EntityType;
use crate::crypto::FieldCodec;
use crate::error::{AimsError, AimsResult};
use crate::insights::{development_insights, DevelopmentInsight};
use crate::models::{
    Book, Course, JournalEntry, JournalEntryId, NetworkingActivity, PersonalGoal, Record, Skill,
};
use crate::storage::{Storage, Table};

/// The four kinds of progress-tracked items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearningKind {
    Skill,
    Book,
    Course,
    Goal,
}

impl LearningKind {
    fn entity_type(self) -> EntityType {
        match self {
            Self::Skill => EntityType::Skill,
            Self::Book => EntityType::Book,
            Self::Course => EntityType::Course,
            Self::Goal => EntityType::PersonalGoal,
        }
    }
}

impl fmt::Display for LearningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill => write!(f, "Skill"),
            Self::Book => write!(f, "Book"),
            Self::Course => write!(f, "Course"),
            Self::Goal => write!(f, "Goal"),
        }
    }
}

impl FromStr for LearningKind {
    type Err = AimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "skill" | "skills" => Ok(Self::Skill),
            "book" | "books" => Ok(Self::Book),
            "course" | "courses" => Ok(Self::Course),
            "goal" | "goals" => Ok(Self::Goal),
            other => Err(AimsError::Validation(format!(
                "Unknown item kind '{}': expected skill, book, course or goal",
                other
            ))),
        }
    }
}

/// Input for adding a skill, book, course or personal goal
#[derive(Debug, Clone, Default)]
pub struct LearningInput {
    pub name: String,
    /// Book author or course platform; ignored for skills and goals
    pub detail: Option<String>,
    /// Defaults to today; ignored for goals
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
    pub progress: f64,
    pub notes: Option<String>,
}

/// A progress-tracked row
trait Tracked: Record + Clone + Serialize {
    fn label(&self) -> &str;
    fn progress_mut(&mut self) -> &mut f64;
    fn check(&self) -> AimsResult<()>;
}

macro_rules! impl_tracked {
    ($row:ty, $label:ident) => {
        impl Tracked for $row {
            fn label(&self) -> &str {
                &self.$label
            }

            fn progress_mut(&mut self) -> &mut f64 {
                &mut self.progress
            }

            fn check(&self) -> AimsResult<()> {
                self.validate()
            }
        }
    };
}

impl_tracked!(Skill, name);
impl_tracked!(Book, title);
impl_tracked!(Course, name);
impl_tracked!(PersonalGoal, name);

/// Set progress on the row named by id or label; returns (before, after)
fn set_progress_in<T: Tracked>(
    table: &mut Table<T>,
    kind: LearningKind,
    identifier: &str,
    progress: f64,
) -> AimsResult<(T, T)> {
    let id = table
        .find(|r| r.id().to_string() == identifier || r.label().eq_ignore_ascii_case(identifier))
        .map(|r| r.id())
        .ok_or_else(|| AimsError::NotFound {
            entity_type: match kind {
                LearningKind::Skill => "Skill",
                LearningKind::Book => "Book",
                LearningKind::Course => "Course",
                LearningKind::Goal => "Personal goal",
            },
            identifier: identifier.to_string(),
        })?;

    table
        .update(id, |row| {
            let before = row.clone();
            *row.progress_mut() = progress;
            row.check()?;
            Ok((before, row.clone()))
        })
        .unwrap_or_else(|| Err(AimsError::Storage(format!("{} {} vanished", kind, id))))
}

/// A journal entry with its opened text
#[derive(Debug)]
pub struct DecryptedJournalEntry {
    pub entry: JournalEntry,
    /// `Err(Decryption)` when the token could not be opened
    pub text: AimsResult<String>,
}

pub struct DevelopmentService<'a> {
    storage: &'a Storage,
    codec: Option<&'a FieldCodec>,
}

impl<'a> DevelopmentService<'a> {
    /// Service without journal access
    pub fn new(storage: &'a Storage) -> Self {
        Self {
            storage,
            codec: None,
        }
    }

    /// Service that can read and write the journal
    pub fn with_codec(storage: &'a Storage, codec: &'a FieldCodec) -> Self {
        Self {
            storage,
            codec: Some(codec),
        }
    }

    fn codec(&self) -> AimsResult<&'a FieldCodec> {
        self.codec
            .ok_or_else(|| AimsError::Config("Journal access requires the field-encryption key".into()))
    }

    fn log_added<T: Serialize>(&self, kind: LearningKind, id: String, name: &str, row: &T) -> AimsResult<()> {
        self.storage
            .log_create(kind.entity_type(), id, Some(name.to_string()), row)
    }

    pub fn add_skill(&self, input: LearningInput) -> AimsResult<Skill> {
        let mut skill = Skill::new(input.name.trim(), start_or_today(input.start_date));
        skill.target_date = input.target_date;
        skill.progress = input.progress;
        skill.notes = input.notes.unwrap_or_default();
        skill.validate()?;

        self.storage.development.transaction(|data| {
            data.skills.insert(skill.clone());
            Ok(())
        })?;
        self.log_added(LearningKind::Skill, skill.id.to_string(), &skill.name, &skill)?;
        Ok(skill)
    }

    pub fn add_book(&self, input: LearningInput) -> AimsResult<Book> {
        let mut book = Book::new(input.name.trim(), start_or_today(input.start_date));
        book.author = input.detail.unwrap_or_default();
        book.target_date = input.target_date;
        book.progress = input.progress;
        book.notes = input.notes.unwrap_or_default();
        book.validate()?;

        self.storage.development.transaction(|data| {
            data.books.insert(book.clone());
            Ok(())
        })?;
        self.log_added(LearningKind::Book, book.id.to_string(), &book.title, &book)?;
        Ok(book)
    }

    pub fn add_course(&self, input: LearningInput) -> AimsResult<Course> {
        let mut course = Course::new(input.name.trim(), start_or_today(input.start_date));
        course.platform = input.detail.unwrap_or_default();
        course.target_date = input.target_date;
        course.progress = input.progress;
        course.notes = input.notes.unwrap_or_default();
        course.validate()?;

        self.storage.development.transaction(|data| {
            data.courses.insert(course.clone());
            Ok(())
        })?;
        self.log_added(LearningKind::Course, course.id.to_string(), &course.name, &course)?;
        Ok(course)
    }

    pub fn add_goal(&self, input: LearningInput) -> AimsResult<PersonalGoal> {
        let mut goal = PersonalGoal::new(input.name.trim());
        goal.target_date = input.target_date;
        goal.progress = input.progress;
        goal.notes = input.notes.unwrap_or_default();
        goal.validate()?;

        self.storage.development.transaction(|data| {
            data.goals.insert(goal.clone());
            Ok(())
        })?;
        self.log_added(LearningKind::Goal, goal.id.to_string(), &goal.name, &goal)?;
        Ok(goal)
    }

    /// Set the progress of an item found by id or name; returns the new value
    pub fn update_progress(&self, kind: LearningKind, identifier: &str, progress: f64) -> AimsResult<f64> {
        let identifier = identifier.trim();
        let (id, name, before, after) = self.storage.development.transaction(|data| {
            fn audited<T: Tracked>(pair: (T, T)) -> AimsResult<(String, String, serde_json::Value, serde_json::Value)> {
                let (before, after) = pair;
                Ok((
                    after.id().to_string(),
                    after.label().to_string(),
                    serde_json::to_value(&before)?,
                    serde_json::to_value(&after)?,
                ))
            }

            match kind {
                LearningKind::Skill => audited(set_progress_in(&mut data.skills, kind, identifier, progress)?),
                LearningKind::Book => audited(set_progress_in(&mut data.books, kind, identifier, progress)?),
                LearningKind::Course => audited(set_progress_in(&mut data.courses, kind, identifier, progress)?),
                LearningKind::Goal => audited(set_progress_in(&mut data.goals, kind, identifier, progress)?),
            }
        })?;

        self.storage
            .log_update(kind.entity_type(), id, Some(name), &before, &after)?;
        Ok(progress)
    }

    pub fn list_skills(&self) -> AimsResult<Vec<Skill>> {
        self.storage.development.read(|data| data.skills.all().to_vec())
    }

    pub fn list_books(&self) -> AimsResult<Vec<Book>> {
        self.storage.development.read(|data| data.books.all().to_vec())
    }

    pub fn list_courses(&self) -> AimsResult<Vec<Course>> {
        self.storage.development.read(|data| data.courses.all().to_vec())
    }

    pub fn list_goals(&self) -> AimsResult<Vec<PersonalGoal>> {
        self.storage.development.read(|data| data.goals.all().to_vec())
    }

    /// Seal and store a journal entry
    pub fn add_journal_entry(&self, date: NaiveDate, text: &str) -> AimsResult<JournalEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AimsError::Validation("Journal entry cannot be empty".into()));
        }

        let entry = JournalEntry::new(date, self.codec()?.encrypt(text)?);
        self.storage.development.transaction(|data| {
            data.journal.insert(entry.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::JournalEntry,
            entry.id.to_string(),
            Some(entry.date.to_string()),
            &entry,
        )?;
        Ok(entry)
    }

    /// Journal entries newest first, each with its own decryption result
    pub fn list_journal(&self) -> AimsResult<Vec<DecryptedJournalEntry>> {
        let codec = self.codec()?;
        let mut entries = self
            .storage
            .development
            .read(|data| data.journal.all().to_vec())?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Ok(entries
            .into_iter()
            .map(|entry| {
                let text = codec.decrypt(&entry.entry);
                if let Err(e) = &text {
                    log::warn!("Could not open journal entry {}: {}", entry.id, e);
                }
                DecryptedJournalEntry { entry, text }
            })
            .collect())
    }

    /// Open one journal entry; fails with `Decryption` on a bad token
    pub fn journal_text(&self, id: JournalEntryId) -> AimsResult<String> {
        let entry = self
            .storage
            .development
            .read(|data| data.journal.get(id).cloned())?
            .ok_or_else(|| AimsError::journal_entry_not_found(id.to_string()))?;
        self.codec()?.decrypt(&entry.entry)
    }

    pub fn add_networking(
        &self,
        event_name: &str,
        date: NaiveDate,
        notes: Option<String>,
    ) -> AimsResult<NetworkingActivity> {
        let mut activity = NetworkingActivity::new(event_name.trim(), date);
        activity.notes = notes.unwrap_or_default();
        activity.validate()?;

        self.storage.development.transaction(|data| {
            data.networking.insert(activity.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::NetworkingActivity,
            activity.id.to_string(),
            Some(activity.event_name.clone()),
            &activity,
        )?;
        Ok(activity)
    }

    /// Networking activities, most recent first
    pub fn list_networking(&self) -> AimsResult<Vec<NetworkingActivity>> {
        let mut activities = self
            .storage
            .development
            .read(|data| data.networking.all().to_vec())?;
        activities.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(activities)
    }

    /// Rule-based insights; journal themes only when the key is available
    ///
    /// Entries that cannot be opened are left out of the keyword counts.
    pub fn insights(&self, today: NaiveDate) -> AimsResult<Vec<DevelopmentInsight>> {
        let journal: Vec<String> = match self.codec {
            Some(_) => self
                .list_journal()?
                .into_iter()
                .filter_map(|e| e.text.ok())
                .collect(),
            None => Vec::new(),
        };

        self.storage.development.read(|data| {
            development_insights(
                &journal,
                data.networking.all(),
                data.skills.all(),
                data.goals.all(),
                today,
            )
        })
    }
}

fn start_or_today(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| chrono::Local::now().date_naive())
}
