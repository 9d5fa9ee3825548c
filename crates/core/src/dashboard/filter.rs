use crate::domain::score::ScoreRow;

/// Trimmed, upper-cased search text.
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Rows whose ticker contains `query` (case-insensitive). An empty query keeps every row.
pub fn filter_by_ticker(rows: &[ScoreRow], query: &str) -> Vec<ScoreRow> {
    let query = normalize_query(query);
    if query.is_empty() {
        return rows.to_vec();
    }

    rows.iter()
        .filter(|r| r.ticker().to_uppercase().contains(&query))
        .cloned()
        .collect()
}
