//! Net Worth Report
//!
//! Assets minus liabilities, as totals and as a dated series.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDate;

use crate::error::{AimsError, AimsResult};
use crate::models::{Asset, Liability, Money};
use crate::storage::Storage;

/// Net worth on one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetWorthPoint {
    pub date: NaiveDate,
    pub assets: Money,
    pub liabilities: Money,
    pub net: Money,
}

/// Per-date `assets - liabilities`, ascending by date
///
/// A date present on only one side counts the other side as zero.
pub fn net_worth_series(assets: &[Asset], liabilities: &[Liability]) -> Vec<NetWorthPoint> {
    let mut by_date: BTreeMap<NaiveDate, (Money, Money)> = BTreeMap::new();

    for asset in assets {
        by_date.entry(asset.date).or_default().0 += asset.amount;
    }
    for liability in liabilities {
        by_date.entry(liability.date).or_default().1 += liability.amount;
    }

    by_date
        .into_iter()
        .map(|(date, (assets, liabilities))| NetWorthPoint {
            date,
            assets,
            liabilities,
            net: assets - liabilities,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct NetWorthReport {
    pub total_assets: Money,
    pub total_liabilities: Money,
    pub net_worth: Money,
    pub series: Vec<NetWorthPoint>,
}

impl NetWorthReport {
    pub fn from_rows(assets: &[Asset], liabilities: &[Liability]) -> Self {
        let total_assets: Money = assets.iter().map(|a| a.amount).sum();
        let total_liabilities: Money = liabilities.iter().map(|l| l.amount).sum();

        Self {
            total_assets,
            total_liabilities,
            net_worth: total_assets - total_liabilities,
            series: net_worth_series(assets, liabilities),
        }
    }

    pub fn generate(storage: &Storage) -> AimsResult<Self> {
        storage
            .finance
            .read(|data| Self::from_rows(data.assets.all(), data.liabilities.all()))
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Net Worth Report\n");
        output.push_str(&"=".repeat(56));
        output.push('\n');
        output.push_str(&format!("Total Assets:      {:>15}\n", self.total_assets));
        output.push_str(&format!("Total Liabilities: {:>15}\n", self.total_liabilities));
        output.push_str(&"-".repeat(35));
        output.push('\n');
        output.push_str(&format!("Net Worth:         {:>15}\n\n", self.net_worth));

        if self.series.is_empty() {
            output.push_str("No assets or liabilities logged.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<12} {:>13} {:>13} {:>13}\n",
            "Date", "Assets", "Liabilities", "Net"
        ));
        output.push_str(&"-".repeat(56));
        output.push('\n');
        for point in &self.series {
            output.push_str(&format!(
                "{:<12} {:>13} {:>13} {:>13}\n",
                point.date.to_string(),
                point.assets,
                point.liabilities,
                point.net
            ));
        }

        output
    }

    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AimsResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Date", "Assets", "Liabilities", "Net Worth"])
            .map_err(|e| AimsError::Export(e.to_string()))?;

        for point in &self.series {
            csv.write_record([
                point.date.to_string(),
                format!("{:.2}", point.assets.as_f64()),
                format!("{:.2}", point.liabilities.as_f64()),
                format!("{:.2}", point.net.as_f64()),
            ])
            .map_err(|e| AimsError::Export(e.to_string()))?;
        }

        csv.flush().map_err(|e| AimsError::Export(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_outer_join_by_date() {
        let assets = vec![Asset::new(date(1), "Savings", Money::from_units(100))];
        let liabilities = vec![
            Liability::new(date(2), "Loan", Money::from_units(10)),
            Liability::new(date(1), "Credit Card", Money::from_units(30)),
        ];

        let series = net_worth_series(&assets, &liabilities);
        let pairs: Vec<_> = series.iter().map(|p| (p.date, p.net)).collect();
        assert_eq!(
            pairs,
            vec![
                (date(1), Money::from_units(70)),
                (date(2), Money::from_units(-10)),
            ]
        );
    }

    #[test]
    fn test_same_date_rows_are_summed() {
        let assets = vec![
            Asset::new(date(3), "Savings", Money::from_units(40)),
            Asset::new(date(3), "Investments", Money::from_units(60)),
        ];

        let series = net_worth_series(&assets, &[]);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].assets, Money::from_units(100));
        assert_eq!(series[0].liabilities, Money::zero());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(net_worth_series(&[], &[]).is_empty());
        let report = NetWorthReport::from_rows(&[], &[]);
        assert!(report.net_worth.is_zero());
        assert!(report.format_terminal().contains("No assets or liabilities"));
    }

    #[test]
    fn test_report_totals_and_csv() {
        let assets = vec![Asset::new(date(1), "Savings", Money::from_units(100))];
        let liabilities = vec![Liability::new(date(2), "Loan", Money::from_units(30))];

        let report = NetWorthReport::from_rows(&assets, &liabilities);
        assert_eq!(report.net_worth, Money::from_units(70));

        let mut out = Vec::new();
        report.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();
        assert!(csv.contains("2024-01-02,0.00,30.00,-30.00"));
    }
}
