//! Ordered row collection keyed by typed id

use serde::{Deserialize, Serialize};

use crate::error::AimsResult;
use crate::models::Record;

/// Rows of one kind, kept in insertion order
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn all(&self) -> &[T] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn get(&self, id: T::Id) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    /// First row matching a predicate
    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.iter().find(|r| predicate(r))
    }

    pub fn insert(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Apply `f` to the row with `id`; `None` when no such row exists
    pub fn update<R>(
        &mut self,
        id: T::Id,
        f: impl FnOnce(&mut T) -> AimsResult<R>,
    ) -> Option<AimsResult<R>> {
        self.rows.iter_mut().find(|r| r.id() == id).map(f)
    }

    pub fn remove(&mut self, id: T::Id) -> Option<T> {
        let idx = self.rows.iter().position(|r| r.id() == id)?;
        Some(self.rows.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProjectId, Task};

    #[test]
    fn test_insert_get_update_remove() {
        let project = ProjectId::new();
        let mut table: Table<Task> = Table::default();
        let first = Task::new(project, "Plan");
        let second = Task::new(project, "Build");
        let (first_id, second_id) = (first.id, second.id);

        table.insert(first);
        table.insert(second);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(second_id).unwrap().name, "Build");

        let done = table
            .update(first_id, |t| {
                t.completed = true;
                Ok(t.completed)
            })
            .unwrap()
            .unwrap();
        assert!(done);

        let removed = table.remove(first_id).unwrap();
        assert!(removed.completed);
        assert!(table.get(first_id).is_none());
        assert!(table.update(first_id, |_| Ok(())).is_none());
    }

    #[test]
    fn test_serializes_as_array() {
        let mut table: Table<Task> = Table::default();
        assert_eq!(serde_json::to_string(&table).unwrap(), "[]");

        table.insert(Task::new(ProjectId::new(), "Plan"));
        let json = serde_json::to_string(&table).unwrap();
        let back: Table<Task> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
    }
}
