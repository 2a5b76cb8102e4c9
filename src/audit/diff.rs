//! Field-level diff between two audit snapshots

use serde_json::Value;

/// Summarize top-level field changes as `field: old -> new, ...`
///
/// Returns `None` when nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes: Vec<String> = match (before, after) {
        (Value::Object(old), Value::Object(new)) => {
            let changed_or_removed = old.iter().filter_map(|(key, old_val)| match new.get(key) {
                Some(new_val) if new_val == old_val => None,
                Some(new_val) => Some(format!(
                    "{}: {} -> {}",
                    key,
                    format_value(old_val),
                    format_value(new_val)
                )),
                None => Some(format!("{}: {} -> (removed)", key, format_value(old_val))),
            });

            let added = new
                .iter()
                .filter(|(key, _)| !old.contains_key(*key))
                .map(|(key, val)| format!("{}: (added) -> {}", key, format_value(val)));

            changed_or_removed.chain(added).collect()
        }
        _ if before == after => Vec::new(),
        _ => vec![format!("{} -> {}", format_value(before), format_value(after))],
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        // Char-based so emoji in notes never split mid-codepoint
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_progress_change() {
        let before = json!({"name": "Garden", "progress": 33.3});
        let after = json!({"name": "Garden", "progress": 66.7});

        let diff = generate_diff(&before, &after).unwrap();
        assert_eq!(diff, "progress: 33.3 -> 66.7");
    }

    #[test]
    fn test_added_and_removed_fields() {
        let before = json!({"category": "Food", "description": "lunch"});
        let after = json!({"category": "Food", "nutrition": {"calories": 200}});

        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("description: \"lunch\" -> (removed)"));
        assert!(diff.contains("nutrition: (added) -> {1 fields}"));
    }

    #[test]
    fn test_no_changes() {
        let value = json!({"current_amount": 18000, "target_amount": 20000});
        assert!(generate_diff(&value, &value).is_none());
    }

    #[test]
    fn test_non_object_values() {
        assert_eq!(generate_diff(&json!(1), &json!(2)).as_deref(), Some("1 -> 2"));
        assert!(generate_diff(&json!("a"), &json!("a")).is_none());
    }

    #[test]
    fn test_long_multibyte_string_truncation() {
        let long = "😊".repeat(60);
        let diff = generate_diff(&json!({"notes": long}), &json!({"notes": "ok"})).unwrap();
        assert!(diff.contains("...\""));
        assert!(diff.contains("-> \"ok\""));
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&json!(null)), "null");
        assert_eq!(format_value(&json!(true)), "true");
        assert_eq!(format_value(&json!([1, 2, 3])), "[3 items]");
    }
}
