//! Strongly-typed ID wrappers for every row type
//!
//! Using newtype wrappers prevents accidentally mixing up IDs from different
//! tables at compile time (a task id can never be passed as a project id).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $display_prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random ID
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Short display form, e.g. `tsk-1a2b3c4d`
            pub fn short(&self) -> String {
                self.to_string()
            }

            /// Whether `text` names this id, either as the full UUID or the
            /// short display form
            pub fn matches(&self, text: &str) -> bool {
                let text = text.trim();
                text == self.0.to_string() || text == self.short()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $display_prefix, &self.0.to_string()[..8])
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let s = s.strip_prefix($display_prefix).unwrap_or(s);
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(HealthEntryId, "hlt-");
define_id!(TransactionId, "txn-");
define_id!(BudgetId, "bud-");
define_id!(AssetId, "ast-");
define_id!(LiabilityId, "lia-");
define_id!(GoalId, "gol-");
define_id!(ProjectId, "prj-");
define_id!(TaskId, "tsk-");
define_id!(TimeLogId, "tlg-");
define_id!(SkillId, "skl-");
define_id!(BookId, "bok-");
define_id!(CourseId, "crs-");
define_id!(PersonalGoalId, "pgl-");
define_id!(JournalEntryId, "jnl-");
define_id!(NetworkingId, "net-");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        let id = TaskId::new();
        let display = id.to_string();
        assert!(display.starts_with("tsk-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_matches_full_and_short() {
        let id = ProjectId::new();
        assert!(id.matches(&id.as_uuid().to_string()));
        assert!(id.matches(&id.short()));
        assert!(!id.matches("prj-00000000"));
    }

    #[test]
    fn test_parse_with_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: GoalId = format!("gol-{}", uuid_str).parse().unwrap();
        assert_eq!(id.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_id_serialization() {
        let id = HealthEntryId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: HealthEntryId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
