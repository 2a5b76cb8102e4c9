//! Savings goal service
//!
//! `contribute` is the only way `current_amount` moves. The read, the
//! addition and the write-back happen inside one finance transaction, so
//! concurrent contributions never lose an update.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{AimsError, AimsResult};
use crate::models::{Goal, GoalId, Money};
use crate::reports::{goal_progress, GoalProgress, GoalProgressReport};
use crate::storage::Storage;

pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create(
        &self,
        name: &str,
        target: Money,
        deadline: Option<NaiveDate>,
    ) -> AimsResult<Goal> {
        let mut goal = Goal::new(name.trim(), target);
        goal.deadline = deadline;
        goal.validate()?;

        self.storage.finance.transaction(|data| {
            if data
                .goals
                .find(|g| g.name.eq_ignore_ascii_case(&goal.name))
                .is_some()
            {
                return Err(AimsError::Validation(format!(
                    "A goal named '{}' already exists",
                    goal.name
                )));
            }
            data.goals.insert(goal.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::Goal,
            goal.id.to_string(),
            Some(goal.name.clone()),
            &goal,
        )?;
        Ok(goal)
    }

    /// Find a goal by id or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> AimsResult<Goal> {
        let identifier = identifier.trim();
        self.storage
            .finance
            .read(|data| {
                data.goals
                    .find(|g| g.id.matches(identifier))
                    .or_else(|| data.goals.find(|g| g.name.eq_ignore_ascii_case(identifier)))
                    .cloned()
            })?
            .ok_or_else(|| AimsError::goal_not_found(identifier))
    }

    pub fn list(&self) -> AimsResult<Vec<Goal>> {
        self.storage.finance.read(|data| data.goals.all().to_vec())
    }

    /// Add `delta` to a goal's current amount and return the new progress
    pub fn contribute(&self, id: GoalId, delta: Money) -> AimsResult<(Goal, GoalProgress)> {
        let (before, after) = self.storage.finance.transaction(|data| {
            data.goals
                .update(id, |goal| {
                    let before = goal.clone();
                    goal.contribute(delta)?;
                    Ok((before, goal.clone()))
                })
                .unwrap_or_else(|| Err(AimsError::goal_not_found(id.to_string())))
        })?;

        self.storage.log_update(
            EntityType::Goal,
            after.id.to_string(),
            Some(after.name.clone()),
            &before,
            &after,
        )?;

        let progress = goal_progress(after.current_amount, after.target_amount);
        log::info!(
            "Goal {} now at {:.1}% ({})",
            after.id,
            progress.percent,
            progress.status
        );
        Ok((after, progress))
    }

    pub fn report(&self) -> AimsResult<GoalProgressReport> {
        GoalProgressReport::generate(self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use crate::reports::GoalStatus;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_contribution_reaches_target() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service.create("Emergency fund", Money::from_units(200), None).unwrap();

        let (_, progress) = service.contribute(goal.id, Money::from_units(180)).unwrap();
        assert_eq!(progress.percent, 90.0);
        assert_eq!(progress.status, GoalStatus::NearAchievement);
        assert!(!progress.is_achieved());

        let (goal, progress) = service.contribute(goal.id, Money::from_units(20)).unwrap();
        assert_eq!(goal.current_amount, Money::from_units(200));
        assert!(progress.is_achieved());

        // persisted
        let reloaded = service.find("emergency FUND").unwrap();
        assert_eq!(reloaded.current_amount, Money::from_units(200));
    }

    #[test]
    fn test_negative_contribution_changes_nothing() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        let goal = service.create("Car", Money::from_units(5000), None).unwrap();
        service.contribute(goal.id, Money::from_units(100)).unwrap();

        let err = service.contribute(goal.id, Money::from_units(-50)).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(
            service.find(&goal.id.short()).unwrap().current_amount,
            Money::from_units(100)
        );
    }

    #[test]
    fn test_unknown_goal() {
        let (_temp_dir, storage) = create_test_storage();
        let err = GoalService::new(&storage)
            .contribute(GoalId::new(), Money::from_units(1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = GoalService::new(&storage);

        service.create("House", Money::from_units(1), None).unwrap();
        assert!(service
            .create("house", Money::from_units(2), None)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_concurrent_contributions_are_not_lost() {
        let (_temp_dir, storage) = create_test_storage();
        let storage = Arc::new(storage);
        let id = GoalService::new(&storage)
            .create("Trip", Money::from_units(1000), None)
            .unwrap()
            .id;

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    let service = GoalService::new(&storage);
                    for _ in 0..5 {
                        service.contribute(id, Money::from_units(10)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let goal = GoalService::new(&storage).find(&id.short()).unwrap();
        assert_eq!(goal.current_amount, Money::from_units(200));
    }
}
