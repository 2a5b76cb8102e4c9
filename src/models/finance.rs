//! Finance models
//!
//! Transactions (income and expense), month-scoped budgets, asset and
//! liability snapshots, and savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{AssetId, BudgetId, GoalId, LiabilityId, TransactionId};
use super::money::Money;
use super::month::Month;
use super::record::{impl_record, validate_name};
use crate::error::{AimsError, AimsResult};

/// Categories offered for income
pub const INCOME_CATEGORIES: [&str; 4] = ["Earned", "Portfolio", "Passive", "Gift"];

/// Categories offered for expenses
pub const EXPENSE_CATEGORIES: [&str; 5] = ["Food", "Transport", "Entertainment", "Rent", "Utilities"];

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
        }
    }
}

impl FromStr for TransactionKind {
    type Err = AimsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Self::Income),
            "expense" | "out" => Ok(Self::Expense),
            other => Err(AimsError::Validation(format!(
                "Unknown transaction type '{}': expected income or expense",
                other
            ))),
        }
    }
}

/// A logged income or expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: String,

    /// Always non-negative; direction comes from `kind`
    pub amount: Money,

    #[serde(default)]
    pub description: String,

    pub created_at: DateTime<Utc>,
}

impl_record!(Transaction, TransactionId);

impl Transaction {
    pub fn new(
        date: NaiveDate,
        kind: TransactionKind,
        category: impl Into<String>,
        amount: Money,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            date,
            kind,
            category: category.into(),
            amount,
            description: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Signed amount: positive for income, negative for expense
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Category", &self.category)?;
        if self.amount.is_negative() {
            return Err(AimsError::Validation(format!(
                "Transaction amount cannot be negative: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// Spending limit for one category in one month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub category: String,
    pub month: Month,
    pub amount: Money,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Budget, BudgetId);

impl Budget {
    pub fn new(category: impl Into<String>, month: Month, amount: Money) -> Self {
        Self {
            id: BudgetId::new(),
            category: category.into(),
            month,
            amount,
            updated_at: Utc::now(),
        }
    }

    /// Whether this budget is keyed by `(category, month)`
    pub fn is_for(&self, category: &str, month: Month) -> bool {
        self.month == month && self.category.eq_ignore_ascii_case(category)
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Category", &self.category)?;
        if self.amount.is_negative() {
            return Err(AimsError::Validation(format!(
                "Budget amount cannot be negative: {}",
                self.amount
            )));
        }
        Ok(())
    }
}

/// A dated asset value (cash, investments, property, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub date: NaiveDate,
    pub kind: String,
    pub amount: Money,
    #[serde(default)]
    pub description: String,
}

impl_record!(Asset, AssetId);

impl Asset {
    pub fn new(date: NaiveDate, kind: impl Into<String>, amount: Money) -> Self {
        Self {
            id: AssetId::new(),
            date,
            kind: kind.into(),
            amount,
            description: String::new(),
        }
    }
}

/// A dated liability balance (loan, credit card, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liability {
    pub id: LiabilityId,
    pub date: NaiveDate,
    pub kind: String,
    pub amount: Money,
    #[serde(default)]
    pub description: String,
}

impl_record!(Liability, LiabilityId);

impl Liability {
    pub fn new(date: NaiveDate, kind: impl Into<String>, amount: Money) -> Self {
        Self {
            id: LiabilityId::new(),
            date,
            kind: kind.into(),
            amount,
            description: String::new(),
        }
    }
}

/// A savings goal
///
/// `current_amount` is persisted and only ever moved by an additive
/// contribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: GoalId,
    pub name: String,
    pub target_amount: Money,
    pub current_amount: Money,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl_record!(Goal, GoalId);

impl Goal {
    pub fn new(name: impl Into<String>, target_amount: Money) -> Self {
        let now = Utc::now();
        Self {
            id: GoalId::new(),
            name: name.into(),
            target_amount,
            current_amount: Money::zero(),
            deadline: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Add `delta` to the current amount
    pub fn contribute(&mut self, delta: Money) -> AimsResult<()> {
        if delta.is_negative() {
            return Err(AimsError::Validation(format!(
                "Contribution cannot be negative: {}",
                delta
            )));
        }
        self.current_amount += delta;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn validate(&self) -> AimsResult<()> {
        validate_name("Goal name", &self.name)?;
        if self.target_amount.is_negative() || self.current_amount.is_negative() {
            return Err(AimsError::Validation(
                "Goal amounts cannot be negative".into(),
            ));
        }
        Ok(())
    }
}
