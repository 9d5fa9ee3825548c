use crate::domain::score::ScoreRow;
use crate::domain::{lenient, lenient_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

pub const REPORT_KEYS: [&str; 8] = [
    "asof",
    "universe_size",
    "train_rows",
    "eval_days",
    "ic_mean",
    "ic_std",
    "ic_t",
    "notes",
];

pub const SNAPSHOT_KEYS: [&str; 3] = ["dt", "tickers", "top_by_z"];

pub const REPORT_NOT_FOUND_NOTES: &str = "model_report.json not found yet.";
pub const MODEL_CARD_PLACEHOLDER: &str = "<p><em>No model card.</em></p>";

/// Model evaluation summary written by the training pipeline.
///
/// Counts keep the JSON number as written, so a pandas-style `50.0` still displays.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, deserialize_with = "lenient_text")]
    pub asof: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub universe_size: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub train_rows: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub eval_days: Option<Number>,
    #[serde(default, deserialize_with = "lenient")]
    pub ic_mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ic_std: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub ic_t: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

impl Report {
    pub fn not_found() -> Self {
        Self {
            notes: Some(REPORT_NOT_FOUND_NOTES.to_string()),
            ..Self::default()
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelCard {
    #[serde(default)]
    pub html: Option<String>,
}

impl ModelCard {
    /// The markup to inject, or the placeholder when the card has none.
    pub fn html_or_placeholder(&self) -> &str {
        self.html.as_deref().unwrap_or(MODEL_CARD_PLACEHOLDER)
    }
}

/// Summary of the scores batch shown next to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub dt: Option<String>,
    pub tickers: usize,
    /// First row's ticker. Relies on the server's `z_score` ordering.
    pub top_by_z: Option<String>,
}

impl Snapshot {
    pub fn from_rows(rows: &[ScoreRow]) -> Self {
        let first = rows.first();
        Self {
            dt: first.and_then(|r| r.dt.clone()),
            tickers: rows.len(),
            top_by_z: first.and_then(|r| r.ticker.clone()),
        }
    }

    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}
