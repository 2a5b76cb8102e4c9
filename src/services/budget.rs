//! Budget service
//!
//! A budget is keyed by `(category, month)`: setting a budget for a key
//! that already has one replaces its amount.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{AimsError, AimsResult};
use crate::models::{Budget, Money, Month};
use crate::reports::{BudgetProgressReport, BudgetScope};
use crate::storage::Storage;

pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create or replace the budget for `(category, month)`
    pub fn set_budget(&self, category: &str, month: Month, amount: Money) -> AimsResult<Budget> {
        let category = category.trim();
        let candidate = Budget::new(category, month, amount);
        candidate.validate()?;

        let (before, after) = self.storage.finance.transaction(|data| {
            let existing = data
                .budgets
                .find(|b| b.is_for(category, month))
                .map(|b| b.id);

            match existing {
                Some(id) => data
                    .budgets
                    .update(id, |budget| {
                        let before = budget.clone();
                        budget.amount = amount;
                        budget.updated_at = Utc::now();
                        Ok((Some(before), budget.clone()))
                    })
                    .unwrap_or_else(|| Err(AimsError::Storage(format!("Budget {} vanished", id)))),
                None => {
                    data.budgets.insert(candidate.clone());
                    Ok((None, candidate.clone()))
                }
            }
        })?;

        let name = Some(format!("{} {}", after.category, after.month));
        match &before {
            Some(before) => self.storage.log_update(
                EntityType::Budget,
                after.id.to_string(),
                name,
                before,
                &after,
            )?,
            None => self
                .storage
                .log_create(EntityType::Budget, after.id.to_string(), name, &after)?,
        }

        log::info!(
            "{} budget {} for {} {}",
            if before.is_some() { "Updated" } else { "Created" },
            after.id,
            after.category,
            after.month
        );
        Ok(after)
    }

    /// Budgets ordered by month, then category; optionally one month only
    pub fn list(&self, month: Option<Month>) -> AimsResult<Vec<Budget>> {
        let mut budgets = self.storage.finance.read(|data| {
            data.budgets
                .iter()
                .filter(|b| month.map_or(true, |m| b.month == m))
                .cloned()
                .collect::<Vec<_>>()
        })?;
        budgets.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| a.category.cmp(&b.category)));
        Ok(budgets)
    }

    pub fn get(&self, category: &str, month: Month) -> AimsResult<Option<Budget>> {
        self.storage
            .finance
            .read(|data| data.budgets.find(|b| b.is_for(category, month)).cloned())
    }

    pub fn remove(&self, category: &str, month: Month) -> AimsResult<Budget> {
        let removed = self.storage.finance.transaction(|data| {
            let id = data.budgets.find(|b| b.is_for(category, month)).map(|b| b.id);
            Ok(id.and_then(|id| data.budgets.remove(id)))
        })?;
        let budget = removed.ok_or_else(|| AimsError::NotFound {
            entity_type: "Budget",
            identifier: format!("{} {}", category, month),
        })?;

        self.storage.log_delete(
            EntityType::Budget,
            budget.id.to_string(),
            Some(format!("{} {}", budget.category, budget.month)),
            &budget,
        )?;
        Ok(budget)
    }

    /// Spending against every budget (or one month's budgets)
    pub fn progress(&self, scope: BudgetScope, month: Option<Month>) -> AimsResult<BudgetProgressReport> {
        BudgetProgressReport::generate(self.storage, scope, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use crate::models::TransactionKind;
    use crate::services::{CreateTransactionInput, TransactionService};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn month(m: u32) -> Month {
        Month::new(2025, m).unwrap()
    }

    fn spend(storage: &Storage, m: u32, category: &str, units: i64) {
        TransactionService::new(storage)
            .create(CreateTransactionInput {
                date: NaiveDate::from_ymd_opt(2025, m, 10).unwrap(),
                kind: TransactionKind::Expense,
                category: Some(category.into()),
                amount: Money::from_units(units),
                description: None,
            })
            .unwrap();
    }

    #[test]
    fn test_set_budget_upserts_by_category_and_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let first = service.set_budget("Food", month(1), Money::from_units(300)).unwrap();
        let second = service.set_budget("food", month(1), Money::from_units(400)).unwrap();
        service.set_budget("Food", month(2), Money::from_units(350)).unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.amount, Money::from_units(400));
        assert_eq!(service.list(None).unwrap().len(), 2);
        assert_eq!(service.list(Some(month(1))).unwrap().len(), 1);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[1].diff_summary.as_deref().unwrap_or("").contains("amount"));
    }

    #[test]
    fn test_negative_budget_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let err = BudgetService::new(&storage)
            .set_budget("Food", month(1), Money::from_cents(-1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_progress_scoped_to_month() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.set_budget("Food", month(1), Money::from_units(100)).unwrap();
        spend(&storage, 1, "Food", 150);
        spend(&storage, 2, "Food", 40);

        let report = service.progress(BudgetScope::BudgetMonth, None).unwrap();
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].spent, Money::from_units(150));
        assert_eq!(report.rows[0].over_budget, Some(Money::from_units(50)));

        let all_time = service.progress(BudgetScope::AllTime, None).unwrap();
        assert_eq!(all_time.rows[0].spent, Money::from_units(190));
    }

    #[test]
    fn test_remove() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        service.set_budget("Rent", month(3), Money::from_units(900)).unwrap();
        service.remove("rent", month(3)).unwrap();

        assert!(service.get("Rent", month(3)).unwrap().is_none());
        assert!(service.remove("Rent", month(3)).unwrap_err().is_not_found());
    }
}
