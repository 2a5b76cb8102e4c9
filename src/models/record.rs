//! Row identity shared by every table
//!
//! Each logged row (health entry, transaction, task, skill, ...) is owned by
//! exactly one table and addressed by its typed id.

use std::fmt;
use std::hash::Hash;

/// A row that can live in a `storage::Table`
pub trait Record {
    /// The typed id of this row
    type Id: Copy + Eq + Hash + fmt::Display;

    /// Get the row's id
    fn id(&self) -> Self::Id;
}

/// Implement `Record` for a struct with an `id` field
macro_rules! impl_record {
    ($row:ty, $id:ty) => {
        impl $crate::models::Record for $row {
            type Id = $id;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

pub(crate) use impl_record;

/// Check that a user-entered percentage is within 0-100
pub(crate) fn validate_percent(field: &str, value: f64) -> crate::error::AimsResult<()> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(crate::error::AimsError::Validation(format!(
            "{} must be between 0 and 100, got {}",
            field, value
        )))
    }
}

/// Check that a name-like field is not blank
pub(crate) fn validate_name(field: &str, value: &str) -> crate::error::AimsResult<()> {
    if value.trim().is_empty() {
        Err(crate::error::AimsError::Validation(format!(
            "{} cannot be empty",
            field
        )))
    } else {
        Ok(())
    }
}
