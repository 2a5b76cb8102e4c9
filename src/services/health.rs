//! Health service
//!
//! Logs daily health entries. The mood text is sealed with the field codec
//! before it reaches storage, and food text is sent to the nutrition lookup
//! when one is configured.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::crypto::FieldCodec;
use crate::error::{AimsError, AimsResult};
use crate::models::{HealthEntry, HealthEntryId, Nutrition};
use crate::storage::Storage;

use super::nutrition::NutritionLookup;

/// Input for logging a health entry
#[derive(Debug, Clone, Default)]
pub struct HealthLogInput {
    pub date: Option<NaiveDate>,
    pub sleep_hours: Option<f64>,
    pub steps: Option<u32>,
    pub mood: Option<String>,
    pub water_glasses: Option<u32>,
    pub food_beverages: Option<String>,
}

/// A health row together with its opened mood
///
/// `mood` is `None` when no mood was logged, and `Some(Err(Decryption))`
/// when the stored token could not be opened.
#[derive(Debug)]
pub struct DecryptedHealthEntry {
    pub entry: HealthEntry,
    pub mood: Option<AimsResult<String>>,
}

impl DecryptedHealthEntry {
    /// Mood text for display, with a marker for unreadable tokens
    pub fn mood_display(&self) -> &str {
        match &self.mood {
            None => "-",
            Some(Ok(text)) => text,
            Some(Err(_)) => "<unreadable>",
        }
    }
}

pub struct HealthService<'a> {
    storage: &'a Storage,
    codec: &'a FieldCodec,
    nutrition: Option<&'a dyn NutritionLookup>,
}

impl<'a> HealthService<'a> {
    pub fn new(storage: &'a Storage, codec: &'a FieldCodec) -> Self {
        Self {
            storage,
            codec,
            nutrition: None,
        }
    }

    /// Use `lookup` to fill in nutrition for entries with food text
    pub fn with_nutrition(mut self, lookup: &'a dyn NutritionLookup) -> Self {
        self.nutrition = Some(lookup);
        self
    }

    fn lookup_nutrition(&self, food: &str) -> Option<Nutrition> {
        let lookup = self.nutrition?;
        match lookup.lookup(food) {
            Ok(nutrition) => Some(nutrition),
            Err(e) => {
                log::warn!("Nutrition lookup failed, saving entry without nutrition: {}", e);
                None
            }
        }
    }

    /// Log a new health entry
    ///
    /// Fails with `Encryption` (and stores nothing) if the mood cannot be
    /// sealed. A failed nutrition lookup does not fail the call.
    pub fn log_entry(&self, input: HealthLogInput) -> AimsResult<HealthEntry> {
        let date = input
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        let mut entry = HealthEntry::new(date);
        entry.sleep_hours = input.sleep_hours;
        entry.steps = input.steps;
        entry.water_glasses = input.water_glasses;

        let mood = input
            .mood
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty());
        entry.mood = self.codec.encrypt_opt(mood)?;

        if let Some(food) = input.food_beverages {
            let food = food.trim().to_string();
            if !food.is_empty() {
                entry.nutrition = self.lookup_nutrition(&food);
            }
            entry.food_beverages = food;
        }

        entry.validate()?;

        self.storage.health.transaction(|data| {
            data.entries.insert(entry.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::HealthEntry,
            entry.id.to_string(),
            Some(entry.date.to_string()),
            &entry,
        )?;

        log::info!(
            "Logged health entry {} for {} (nutrition: {})",
            entry.id,
            entry.date,
            entry.nutrition.is_some()
        );
        Ok(entry)
    }

    /// Find an entry by full or short id
    pub fn find(&self, text: &str) -> AimsResult<HealthEntry> {
        self.storage
            .health
            .read(|data| data.entries.find(|e| e.id.matches(text)).cloned())?
            .ok_or_else(|| AimsError::health_entry_not_found(text))
    }

    /// Entries in an optional date range, newest first, with moods opened
    ///
    /// An unreadable mood is reported on its own row rather than failing the
    /// whole listing.
    pub fn list_decrypted(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AimsResult<Vec<DecryptedHealthEntry>> {
        let mut entries = self.storage.health.read(|data| {
            data.entries
                .iter()
                .filter(|e| start.map_or(true, |s| e.date >= s))
                .filter(|e| end.map_or(true, |en| e.date <= en))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        entries.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        Ok(entries
            .into_iter()
            .map(|entry| {
                let mood = entry.mood.as_ref().map(|sealed| {
                    let opened = self.codec.decrypt(sealed);
                    if let Err(e) = &opened {
                        log::warn!("Could not open mood for health entry {}: {}", entry.id, e);
                    }
                    opened
                });
                DecryptedHealthEntry { entry, mood }
            })
            .collect())
    }

    /// Open the mood of one entry; fails with `Decryption` on a bad token
    pub fn mood(&self, id: HealthEntryId) -> AimsResult<Option<String>> {
        let entry = self
            .storage
            .health
            .read(|data| data.entries.get(id).cloned())?
            .ok_or_else(|| AimsError::health_entry_not_found(id.to_string()))?;

        entry.mood.as_ref().map(|m| self.codec.decrypt(m)).transpose()
    }

    /// Count of entries per mood; fails on the first unreadable token
    pub fn mood_distribution(&self) -> AimsResult<BTreeMap<String, usize>> {
        let sealed = self.storage.health.read(|data| {
            data.entries
                .iter()
                .filter_map(|e| e.mood.clone())
                .collect::<Vec<_>>()
        })?;

        let mut counts = BTreeMap::new();
        for token in &sealed {
            *counts.entry(self.codec.decrypt(token)?).or_insert(0) += 1;
        }
        Ok(counts)
    }

    /// Total sleep per date, ascending
    pub fn sleep_series(&self) -> AimsResult<Vec<(NaiveDate, f64)>> {
        self.storage.health.read(|data| {
            let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
            for entry in data.entries.iter() {
                if let Some(hours) = entry.sleep_hours {
                    *by_date.entry(entry.date).or_insert(0.0) += hours;
                }
            }
            by_date.into_iter().collect()
        })
    }

    pub fn delete(&self, id: HealthEntryId) -> AimsResult<HealthEntry> {
        let removed = self.storage.health.transaction(|data| {
            data.entries
                .remove(id)
                .ok_or_else(|| AimsError::health_entry_not_found(id.to_string()))
        })?;

        self.storage.log_delete(
            EntityType::HealthEntry,
            removed.id.to_string(),
            Some(removed.date.to_string()),
            &removed,
        )?;
        Ok(removed)
    }
}
