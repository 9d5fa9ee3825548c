use crate::dashboard::format::{display_value, format_cell, numeric_value, Cell};
use crate::domain::score::ScoreRow;
use serde_json::Value;
use std::cmp::Ordering;

pub const EMPTY_TABLE_TEXT: &str = "No rows";

/// Current sort column and direction of one rendered table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    pub column: Option<String>,
    pub ascending: bool,
}

impl SortState {
    /// State after a click on `column`: the same column flips direction, a new column starts
    /// descending.
    pub fn after_click(&self, column: &str) -> Self {
        let ascending = match self.column.as_deref() {
            Some(current) if current == column => !self.ascending,
            _ => false,
        };
        Self {
            column: Some(column.to_string()),
            ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: String,
    /// `Some(true)` ascending, `Some(false)` descending, `None` unsorted.
    pub sorted: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    /// Single informational row.
    Empty,
    Rows(Vec<Vec<Cell>>),
}

/// Render output for the `scoresHead` / `scoresBody` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTable {
    pub header: Vec<HeaderCell>,
    pub body: TableBody,
}

impl RenderedTable {
    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Empty => 0,
            TableBody::Rows(rows) => rows.len(),
        }
    }
}

/// A sortable view over the rows it was rendered with.
///
/// Every call to [`ScoreTable::render`] starts with a fresh [`SortState`]; header clicks only
/// reorder the rows this instance displays.
#[derive(Debug, Clone)]
pub struct ScoreTable {
    rows: Vec<ScoreRow>,
    columns: Vec<String>,
    sort: SortState,
    view: RenderedTable,
}

impl ScoreTable {
    pub fn render(rows: Vec<ScoreRow>) -> Self {
        // Columns come from the first row only; rows are assumed to share a schema.
        let columns = rows.first().map(ScoreRow::columns).unwrap_or_default();
        let mut table = Self {
            rows,
            columns,
            sort: SortState::default(),
            view: RenderedTable {
                header: Vec::new(),
                body: TableBody::Empty,
            },
        };
        table.redraw();
        table
    }

    pub fn view(&self) -> &RenderedTable {
        &self.view
    }

    pub fn rows(&self) -> &[ScoreRow] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Sort the displayed rows by `column`. Returns `false` when the table has no such header.
    pub fn click_header(&mut self, column: &str) -> bool {
        if !self.columns.iter().any(|c| c == column) {
            return false;
        }

        self.sort = self.sort.after_click(column);
        let ascending = self.sort.ascending;
        self.rows.sort_by(|a, b| {
            let ord = compare_values(&a.cell(column), &b.cell(column));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });

        tracing::debug!(column, ascending, rows = self.rows.len(), "sorted score table");
        self.redraw();
        true
    }

    fn redraw(&mut self) {
        if self.rows.is_empty() {
            self.view = RenderedTable {
                header: Vec::new(),
                body: TableBody::Empty,
            };
            return;
        }

        let header = self
            .columns
            .iter()
            .map(|column| HeaderCell {
                column: column.clone(),
                sorted: (self.sort.column.as_deref() == Some(column.as_str()))
                    .then_some(self.sort.ascending),
            })
            .collect();

        let body = self
            .rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .map(|column| format_cell(column, &row.cell(column)))
                    .collect()
            })
            .collect();

        self.view = RenderedTable {
            header,
            body: TableBody::Rows(body),
        };
    }
}

/// Numbers (including numeric strings) sort before everything else and compare numerically;
/// the rest compare as locale-style strings. Ranking the two classes keeps the order total on
/// mixed columns.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => locale_compare(&display_value(a), &display_value(b)),
    }
}

/// Approximates en-US collation for ASCII text only: case-insensitive first, and on a tie
/// lowercase sorts before uppercase. Non-ASCII letters and punctuation fall back to codepoint
/// order (`"é"` sorts after `"z"`, `_` after the digits).
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}
