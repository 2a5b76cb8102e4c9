//! Personal-development models
//!
//! Skills, books, courses and personal goals carry a user-entered 0-100
//! progress value. Journal entries are sealed by the field codec.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{BookId, CourseId, JournalEntryId, NetworkingId, PersonalGoalId, SkillId};
use super::record::{impl_record, validate_name, validate_percent};
use crate::crypto::EncryptedField;
use crate::error::AimsResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub notes: String,
}

impl_record!(Skill, SkillId);

impl Skill {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: SkillId::new(),
            name: name.into(),
            start_date,
            target_date: None,
            progress: 0.0,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Skill name", &self.name)?;
        validate_percent("Skill progress", self.progress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub notes: String,
}

impl_record!(Book, BookId);

impl Book {
    pub fn new(title: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            author: String::new(),
            start_date,
            target_date: None,
            progress: 0.0,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Book title", &self.title)?;
        validate_percent("Book progress", self.progress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(default)]
    pub platform: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub notes: String,
}

impl_record!(Course, CourseId);

impl Course {
    pub fn new(name: impl Into<String>, start_date: NaiveDate) -> Self {
        Self {
            id: CourseId::new(),
            name: name.into(),
            platform: String::new(),
            start_date,
            target_date: None,
            progress: 0.0,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Course name", &self.name)?;
        validate_percent("Course progress", self.progress)
    }
}

/// A non-financial personal goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalGoal {
    pub id: PersonalGoalId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub notes: String,
}

impl_record!(PersonalGoal, PersonalGoalId);

impl PersonalGoal {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: PersonalGoalId::new(),
            name: name.into(),
            target_date: None,
            progress: 0.0,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Goal name", &self.name)?;
        validate_percent("Goal progress", self.progress)
    }
}

/// A journal entry; the body is stored only as a ciphertext token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub date: NaiveDate,
    pub entry: EncryptedField,
    pub created_at: DateTime<Utc>,
}

impl_record!(JournalEntry, JournalEntryId);

impl JournalEntry {
    pub fn new(date: NaiveDate, entry: EncryptedField) -> Self {
        Self {
            id: JournalEntryId::new(),
            date,
            entry,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkingActivity {
    pub id: NetworkingId,
    pub event_name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

impl_record!(NetworkingActivity, NetworkingId);

impl NetworkingActivity {
    pub fn new(event_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: NetworkingId::new(),
            event_name: event_name.into(),
            date,
            notes: String::new(),
        }
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Event name", &self.event_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()
    }

    #[test]
    fn test_progress_bounds() {
        let mut skill = Skill::new("Rust", date());
        skill.progress = 100.0;
        assert!(skill.validate().is_ok());

        skill.progress = 100.5;
        assert!(skill.validate().unwrap_err().is_validation());

        let mut book = Book::new("Dune", date());
        book.progress = -1.0;
        assert!(book.validate().is_err());

        let mut course = Course::new("Algorithms", date());
        course.progress = f64::NAN;
        assert!(course.validate().is_err());
    }

    #[test]
    fn test_blank_names_rejected() {
        assert!(PersonalGoal::new(" ").validate().is_err());
        assert!(NetworkingActivity::new("", date()).validate().is_err());
    }
}
