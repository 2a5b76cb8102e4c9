//! Transaction service
//!
//! Logs income and expense rows in the finance unit. An expense logged
//! without a category is categorized from its description.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{AimsError, AimsResult};
use crate::insights::categorize_expense;
use crate::models::{Money, Transaction, TransactionId, TransactionKind};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    /// Case-insensitive category match
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Inclusive date range
    pub fn date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.kind.map_or(true, |k| txn.kind == k)
            && self
                .category
                .as_deref()
                .map_or(true, |c| txn.category.eq_ignore_ascii_case(c))
            && self.start_date.map_or(true, |s| txn.date >= s)
            && self.end_date.map_or(true, |e| txn.date <= e)
    }
}

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub date: NaiveDate,
    pub kind: TransactionKind,
    pub category: Option<String>,
    /// Non-negative; direction comes from `kind`
    pub amount: Money,
    pub description: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Build a validated row from `input` without storing it
    pub(crate) fn build(input: CreateTransactionInput) -> AimsResult<Transaction> {
        let description = input
            .description
            .map(|d| d.trim().to_string())
            .unwrap_or_default();

        let category = match input.category.map(|c| c.trim().to_string()) {
            Some(c) if !c.is_empty() => c,
            _ => match input.kind {
                TransactionKind::Expense => categorize_expense(&description).to_string(),
                TransactionKind::Income => {
                    return Err(AimsError::Validation(
                        "Income transactions need a category".into(),
                    ))
                }
            },
        };

        let mut txn = Transaction::new(input.date, input.kind, category, input.amount);
        txn.description = description;
        txn.validate()?;
        Ok(txn)
    }

    /// Create a new transaction
    pub fn create(&self, input: CreateTransactionInput) -> AimsResult<Transaction> {
        let txn = Self::build(input)?;

        self.storage.finance.transaction(|data| {
            data.transactions.insert(txn.clone());
            Ok(())
        })?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(format!("{} {} {}", txn.date, txn.kind, txn.category)),
            &txn,
        )?;

        log::info!("Created {} transaction {}", txn.kind, txn.id);
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> AimsResult<Option<Transaction>> {
        self.storage
            .finance
            .read(|data| data.transactions.get(id).cloned())
    }

    /// Find a transaction by full or short id
    pub fn find(&self, identifier: &str) -> AimsResult<Transaction> {
        self.storage
            .finance
            .read(|data| {
                data.transactions
                    .find(|t| t.id.matches(identifier))
                    .cloned()
            })?
            .ok_or_else(|| AimsError::NotFound {
                entity_type: "Transaction",
                identifier: identifier.to_string(),
            })
    }

    /// Matching transactions, newest first
    pub fn list(&self, filter: &TransactionFilter) -> AimsResult<Vec<Transaction>> {
        let mut transactions = self.storage.finance.read(|data| {
            data.transactions
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect::<Vec<_>>()
        })?;

        transactions.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));

        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    pub fn delete(&self, id: TransactionId) -> AimsResult<Transaction> {
        let txn = self
            .storage
            .finance
            .transaction(|data| Ok(data.transactions.remove(id)))?
            .ok_or_else(|| AimsError::NotFound {
                entity_type: "Transaction",
                identifier: id.to_string(),
            })?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(format!("{} {} {}", txn.date, txn.kind, txn.category)),
            &txn,
        )?;

        Ok(txn)
    }
}
