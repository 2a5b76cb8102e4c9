//! Keyword categorization of expense descriptions

const RULES: &[(&[&str], &str)] = &[
    (&["uber", "lyft"], "Transport"),
    (&["restaurant", "coffee"], "Food"),
    (&["netflix", "spotify"], "Entertainment"),
];

const FALLBACK: &str = "Utilities";

/// Pick an expense category from a free-text description
///
/// Matching is case-insensitive on substrings; the first rule that hits
/// wins and anything unmatched falls back to "Utilities".
pub fn categorize_expense(description: &str) -> &'static str {
    let lower = description.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(FALLBACK)
}
