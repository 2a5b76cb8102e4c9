//! Personal development insights
//!
//! Journal text arrives already decrypted; callers decide what to do with
//! entries that could not be opened.

use std::fmt;

use chrono::NaiveDate;

use crate::models::{NetworkingActivity, PersonalGoal, Skill};

use super::LOW_PROGRESS_PERCENT;

/// Words counted across journal entries
pub const JOURNAL_KEYWORDS: [&str; 5] = ["stress", "happy", "productive", "tired", "excited"];

/// Days without networking before a reminder
const NETWORKING_GAP_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub enum DevelopmentInsight {
    /// Number of entries mentioning `word`
    JournalTheme { word: &'static str, entries: usize },
    NetworkingGap { days: i64 },
    GoalBehind { goal: String, progress: f64 },
    SkillBehind { skill: String, progress: f64 },
}

impl fmt::Display for DevelopmentInsight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::JournalTheme { word, entries } => write!(
                f,
                "The word '{}' appears in {} journal entries.",
                word, entries
            ),
            Self::NetworkingGap { days } => write!(
                f,
                "It's been {} days since your last networking activity. Consider reaching out to a contact.",
                days
            ),
            Self::GoalBehind { goal, progress } => write!(
                f,
                "Your goal {} is only {:.1}% complete. Consider focusing on it.",
                goal, progress
            ),
            Self::SkillBehind { skill, progress } => write!(
                f,
                "You're learning {} (progress: {:.1}%). Related books or courses could help.",
                skill, progress
            ),
        }
    }
}

pub fn development_insights<S: AsRef<str>>(
    journal: &[S],
    networking: &[NetworkingActivity],
    skills: &[Skill],
    goals: &[PersonalGoal],
    today: NaiveDate,
) -> Vec<DevelopmentInsight> {
    let lowered: Vec<String> = journal.iter().map(|e| e.as_ref().to_lowercase()).collect();
    let mut insights: Vec<DevelopmentInsight> = JOURNAL_KEYWORDS
        .into_iter()
        .filter_map(|word| {
            let entries = lowered.iter().filter(|e| e.contains(word)).count();
            (entries > 0).then_some(DevelopmentInsight::JournalTheme { word, entries })
        })
        .collect();

    if let Some(last) = networking.iter().map(|n| n.date).max() {
        let days = (today - last).num_days();
        if days > NETWORKING_GAP_DAYS {
            insights.push(DevelopmentInsight::NetworkingGap { days });
        }
    }

    insights.extend(
        goals
            .iter()
            .filter(|g| g.progress < LOW_PROGRESS_PERCENT)
            .map(|g| DevelopmentInsight::GoalBehind {
                goal: g.name.clone(),
                progress: g.progress,
            }),
    );
    insights.extend(
        skills
            .iter()
            .filter(|s| s.progress < LOW_PROGRESS_PERCENT)
            .map(|s| DevelopmentInsight::SkillBehind {
                skill: s.name.clone(),
                progress: s.progress,
            }),
    );

    insights
}
