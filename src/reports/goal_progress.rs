//! Goal Progress
//!
//! `current / target` for savings goals, with achievement signals.

use std::fmt;
use std::io::Write;

use crate::error::{AimsError, AimsResult};
use crate::models::{Goal, GoalId, Money};
use crate::storage::Storage;

/// Progress at or above this percentage (and not achieved) is "near"
pub const NEAR_ACHIEVEMENT_PERCENT: f64 = 90.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    Achieved,
    NearAchievement,
    InProgress,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalStatus::Achieved => write!(f, "Achieved"),
            GoalStatus::NearAchievement => write!(f, "Almost there"),
            GoalStatus::InProgress => write!(f, "In progress"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Unclamped; 0 when the target is zero
    pub percent: f64,
    pub status: GoalStatus,
}

impl GoalProgress {
    pub fn is_achieved(&self) -> bool {
        self.status == GoalStatus::Achieved
    }
}

pub fn goal_progress(current: Money, target: Money) -> GoalProgress {
    let percent = current.percent_of(target).unwrap_or(0.0);

    let status = if current >= target {
        GoalStatus::Achieved
    } else if percent >= NEAR_ACHIEVEMENT_PERCENT {
        GoalStatus::NearAchievement
    } else {
        GoalStatus::InProgress
    };

    GoalProgress { percent, status }
}

#[derive(Debug, Clone)]
pub struct GoalRow {
    pub goal_id: GoalId,
    pub name: String,
    pub current: Money,
    pub target: Money,
    pub progress: GoalProgress,
}

#[derive(Debug, Clone)]
pub struct GoalProgressReport {
    pub rows: Vec<GoalRow>,
}

impl GoalProgressReport {
    pub fn from_goals(goals: &[Goal]) -> Self {
        let rows = goals
            .iter()
            .map(|g| GoalRow {
                goal_id: g.id,
                name: g.name.clone(),
                current: g.current_amount,
                target: g.target_amount,
                progress: goal_progress(g.current_amount, g.target_amount),
            })
            .collect();
        Self { rows }
    }

    pub fn generate(storage: &Storage) -> AimsResult<Self> {
        storage.finance.read(|data| Self::from_goals(data.goals.all()))
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();
        output.push_str("Savings Goals\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if self.rows.is_empty() {
            output.push_str("No goals yet.\n");
            return output;
        }

        for row in &self.rows {
            output.push_str(&format!(
                "{:<12} {:<22} {:>12} / {:<12} {:>6.1}%  {}\n",
                row.goal_id.to_string(),
                super::project_progress::truncate(&row.name, 22),
                row.current,
                row.target,
                row.progress.percent,
                row.progress.status
            ));
        }
        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AimsResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Goal", "Current", "Target", "Percent", "Status"])
            .map_err(|e| AimsError::Export(e.to_string()))?;

        for row in &self.rows {
            csv.write_record([
                row.name.clone(),
                format!("{:.2}", row.current.as_f64()),
                format!("{:.2}", row.target.as_f64()),
                format!("{:.2}", row.progress.percent),
                row.progress.status.to_string(),
            ])
            .map_err(|e| AimsError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| AimsError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_then_achieved() {
        let target = Money::from_units(200);
        let mut current = Money::from_units(180);

        let p = goal_progress(current, target);
        assert_eq!(p.percent, 90.0);
        assert_eq!(p.status, GoalStatus::NearAchievement);
        assert!(!p.is_achieved());

        current += Money::from_units(20);
        let p = goal_progress(current, target);
        assert_eq!(current, Money::from_units(200));
        assert!(p.is_achieved());
        assert_eq!(p.percent, 100.0);
    }

    #[test]
    fn test_in_progress_and_overshoot() {
        assert_eq!(
            goal_progress(Money::from_units(50), Money::from_units(200)).status,
            GoalStatus::InProgress
        );

        let over = goal_progress(Money::from_units(300), Money::from_units(200));
        assert_eq!(over.percent, 150.0);
        assert!(over.is_achieved());
    }

    #[test]
    fn test_zero_target() {
        let p = goal_progress(Money::zero(), Money::zero());
        assert_eq!(p.percent, 0.0);
        assert!(p.is_achieved());

        let p = goal_progress(Money::from_units(5), Money::zero());
        assert_eq!(p.percent, 0.0);
        assert!(p.is_achieved());
    }

    #[test]
    fn test_report() {
        let mut goal = Goal::new("Laptop", Money::from_units(200));
        goal.contribute(Money::from_units(180)).unwrap();

        let report = GoalProgressReport::from_goals(&[goal]);
        assert!(report.format_terminal().contains("Almost there"));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Laptop,180.00,200.00,90.00,Almost there"));
    }
}
