//! Health log model
//!
//! One row per logged day or imported record. The mood column is sealed by
//! the field codec before the row is stored.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::ids::HealthEntryId;
use super::record::impl_record;
use crate::crypto::EncryptedField;
use crate::error::{AimsError, AimsResult};

/// Moods offered by the log form
pub const MOOD_CHOICES: [&str; 5] = ["😊 Happy", "😐 Neutral", "😢 Sad", "😡 Angry", "😴 Tired"];

/// Macronutrients for a food/beverage description
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
}

/// Where a health row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    #[default]
    Manual,
    AppleHealth,
}

/// A single health log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: HealthEntryId,
    pub date: NaiveDate,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,

    /// Sealed mood text; never stored as plaintext
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<EncryptedField>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_glasses: Option<u32>,

    #[serde(default)]
    pub food_beverages: String,

    /// Filled by the nutrition lookup; `None` when the lookup failed or was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<Nutrition>,

    #[serde(default)]
    pub source: EntrySource,

    pub created_at: DateTime<Utc>,
}

impl_record!(HealthEntry, HealthEntryId);

impl HealthEntry {
    /// Create an empty entry for a date
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: HealthEntryId::new(),
            date,
            sleep_hours: None,
            steps: None,
            mood: None,
            water_glasses: None,
            food_beverages: String::new(),
            nutrition: None,
            source: EntrySource::Manual,
            created_at: Utc::now(),
        }
    }

    /// Validate ranges accepted by the log form
    pub fn validate(&self) -> AimsResult<()> {
        if let Some(sleep) = self.sleep_hours {
            if !sleep.is_finite() || !(0.0..=24.0).contains(&sleep) {
                return Err(AimsError::Validation(format!(
                    "Sleep must be between 0 and 24 hours, got {}",
                    sleep
                )));
            }
        }

        if let Some(water) = self.water_glasses {
            if water > 20 {
                return Err(AimsError::Validation(format!(
                    "Water intake must be at most 20 glasses, got {}",
                    water
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn test_validate_ranges() {
        let mut entry = HealthEntry::new(date());
        entry.sleep_hours = Some(7.5);
        entry.water_glasses = Some(8);
        assert!(entry.validate().is_ok());

        entry.sleep_hours = Some(25.0);
        assert!(entry.validate().unwrap_err().is_validation());

        entry.sleep_hours = Some(8.0);
        entry.water_glasses = Some(21);
        assert!(entry.validate().is_err());
    }

    #[test]
    fn test_optional_fields_omitted_from_json() {
        let entry = HealthEntry::new(date());
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("mood"));
        assert!(!json.contains("nutrition"));

        let back: HealthEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entry.id);
        assert_eq!(back.source, EntrySource::Manual);
    }
}
