//! Asset and liability service
//!
//! Assets and liabilities are dated snapshots; net worth is derived from
//! them by the net worth report.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{AimsError, AimsResult};
use crate::models::{Asset, Liability, Money};
use crate::reports::NetWorthReport;
use crate::storage::Storage;

/// Input shared by assets and liabilities
#[derive(Debug, Clone)]
pub struct BalanceInput {
    pub date: NaiveDate,
    /// e.g. "Cash", "Investments", "Mortgage"
    pub kind: String,
    pub amount: Money,
    pub description: Option<String>,
}

impl BalanceInput {
    fn validate(&self, what: &str) -> AimsResult<()> {
        if self.kind.trim().is_empty() {
            return Err(AimsError::Validation(format!("{} type cannot be empty", what)));
        }
        if self.amount.is_negative() {
            return Err(AimsError::Validation(format!(
                "{} amount cannot be negative: {}",
                what, self.amount
            )));
        }
        Ok(())
    }
}

pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn add_asset(&self, input: BalanceInput) -> AimsResult<Asset> {
        input.validate("Asset")?;
        let mut asset = Asset::new(input.date, input.kind.trim(), input.amount);
        asset.description = input.description.unwrap_or_default();

        self.storage.finance.transaction(|data| {
            data.assets.insert(asset.clone());
            Ok(())
        })?;
        self.storage.log_create(
            EntityType::Asset,
            asset.id.to_string(),
            Some(format!("{} {}", asset.date, asset.kind)),
            &asset,
        )?;
        Ok(asset)
    }

    pub fn add_liability(&self, input: BalanceInput) -> AimsResult<Liability> {
        input.validate("Liability")?;
        let mut liability = Liability::new(input.date, input.kind.trim(), input.amount);
        liability.description = input.description.unwrap_or_default();

        self.storage.finance.transaction(|data| {
            data.liabilities.insert(liability.clone());
            Ok(())
        })?;
        self.storage.log_create(
            EntityType::Liability,
            liability.id.to_string(),
            Some(format!("{} {}", liability.date, liability.kind)),
            &liability,
        )?;
        Ok(liability)
    }

    /// Assets oldest first
    pub fn list_assets(&self) -> AimsResult<Vec<Asset>> {
        let mut assets = self.storage.finance.read(|data| data.assets.all().to_vec())?;
        assets.sort_by_key(|a| a.date);
        Ok(assets)
    }

    /// Liabilities oldest first
    pub fn list_liabilities(&self) -> AimsResult<Vec<Liability>> {
        let mut liabilities = self
            .storage
            .finance
            .read(|data| data.liabilities.all().to_vec())?;
        liabilities.sort_by_key(|l| l.date);
        Ok(liabilities)
    }

    pub fn net_worth(&self) -> AimsResult<NetWorthReport> {
        NetWorthReport::generate(self.storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AimsPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AimsPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::open(paths).unwrap();
        (temp_dir, storage)
    }

    fn input(day: u32, kind: &str, units: i64) -> BalanceInput {
        BalanceInput {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            kind: kind.to_string(),
            amount: Money::from_units(units),
            description: None,
        }
    }

    #[test]
    fn test_net_worth_through_service() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BalanceService::new(&storage);

        service.add_asset(input(1, "Cash", 100)).unwrap();
        service.add_liability(input(1, "Credit Card", 30)).unwrap();
        service.add_liability(input(2, "Loan", 10)).unwrap();

        let report = service.net_worth().unwrap();
        let nets: Vec<i64> = report.series.iter().map(|p| p.net.units()).collect();
        assert_eq!(nets, vec![70, -10]);
        assert_eq!(report.net_worth, Money::from_units(60));
    }

    #[test]
    fn test_validation() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BalanceService::new(&storage);

        assert!(service.add_asset(input(1, " ", 10)).unwrap_err().is_validation());
        assert!(service
            .add_liability(input(1, "Loan", -10))
            .unwrap_err()
            .is_validation());
        assert!(service.list_assets().unwrap().is_empty());
    }

    #[test]
    fn test_lists_sorted_by_date() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BalanceService::new(&storage);

        service.add_asset(input(9, "Stocks", 5)).unwrap();
        service.add_asset(input(3, "Cash", 1)).unwrap();

        let kinds: Vec<String> = service
            .list_assets()
            .unwrap()
            .into_iter()
            .map(|a| a.kind)
            .collect();
        assert_eq!(kinds, vec!["Cash", "Stocks"]);
    }
}
