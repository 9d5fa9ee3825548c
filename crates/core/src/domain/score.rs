use crate::domain::{lenient, lenient_text};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Core columns in display order. Anything else a row carries is an extra column.
pub const CORE_COLUMNS: [&str; 7] = ["ticker", "dt", "mu_1d", "sigma", "z_score", "p_pos", "label"];

/// A single JSON leaf as it appears in a score row.
///
/// Numeric columns are usually numbers, but upstream CSV exports sometimes leak text such as
/// `"nan"`; keeping the raw value lets the formatter fall back to its literal form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Scalar {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(n.to_string())),
            Self::Text(s) => Value::String(s.clone()),
            Self::Flag(b) => Value::Bool(*b),
        }
    }
}

/// One scored ticker for one observation date.
///
/// Core fields are read leniently: a value of the wrong shape is dropped for that cell only,
/// never for the whole batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreRow {
    #[serde(default, deserialize_with = "lenient_text")]
    pub ticker: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub dt: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub mu_1d: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub sigma: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub z_score: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub p_pos: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    /// Extra columns in upstream key order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ScoreRow {
    pub fn ticker(&self) -> &str {
        self.ticker.as_deref().unwrap_or("")
    }

    /// Value of `column` as JSON; `Null` when the row has no such column.
    pub fn cell(&self, column: &str) -> Value {
        let scalar = |v: &Option<Scalar>| v.as_ref().map(Scalar::to_value).unwrap_or(Value::Null);
        let text = |v: &Option<String>| v.clone().map(Value::String).unwrap_or(Value::Null);

        match column {
            "ticker" => text(&self.ticker),
            "dt" => text(&self.dt),
            "mu_1d" => scalar(&self.mu_1d),
            "sigma" => scalar(&self.sigma),
            "z_score" => scalar(&self.z_score),
            "p_pos" => scalar(&self.p_pos),
            "label" => text(&self.label),
            other => self.extra.get(other).cloned().unwrap_or(Value::Null),
        }
    }

    /// Core columns followed by this row's extra keys.
    pub fn columns(&self) -> Vec<String> {
        CORE_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .chain(self.extra.keys().cloned())
            .collect()
    }

    pub fn z_score_value(&self) -> Option<f64> {
        match self.z_score {
            Some(Scalar::Number(z)) if z.is_finite() => Some(z),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_core_and_extra_columns_in_order() {
        let v = json!({
            "ticker": "AAPL",
            "dt": "2024-01-02",
            "mu_1d": 0.0012,
            "sigma": 0.01,
            "z_score": 0.12,
            "p_pos": 0.55,
            "label": "Undervalued",
            "vol_20d": 0.2,
            "beta_mkt": 1.1,
        });

        let row: ScoreRow = serde_json::from_value(v).unwrap();
        assert_eq!(row.ticker(), "AAPL");
        assert_eq!(row.mu_1d, Some(Scalar::Number(0.0012)));
        assert_eq!(row.label.as_deref(), Some("Undervalued"));

        let cols = row.columns();
        assert_eq!(&cols[..7], &CORE_COLUMNS.map(String::from)[..]);
        assert_eq!(&cols[7..], &["vol_20d".to_string(), "beta_mkt".to_string()]);
    }

    #[test]
    fn tolerates_missing_and_non_numeric_fields() {
        let v = json!({"ticker": "MSFT", "sigma": "nan", "z_score": null});
        let row: ScoreRow = serde_json::from_value(v).unwrap();
        assert_eq!(row.sigma, Some(Scalar::Text("nan".into())));
        assert_eq!(row.z_score, None);
        assert_eq!(row.cell("dt"), Value::Null);
        assert_eq!(row.cell("unknown"), Value::Null);
        assert_eq!(row.z_score_value(), None);
    }

    #[test]
    fn malformed_core_fields_do_not_fail_the_batch() {
        let rows: Vec<ScoreRow> = serde_json::from_value(json!([
            {"ticker": 7203, "label": 1, "mu_1d": [1, 2], "dt": {"d": 2}},
            {"ticker": "AAPL", "label": "Undervalued", "mu_1d": 0.001},
        ]))
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ticker(), "7203");
        assert_eq!(rows[0].label.as_deref(), Some("1"));
        assert_eq!(rows[0].mu_1d, None);
        assert_eq!(rows[0].cell("mu_1d"), Value::Null);
        assert_eq!(rows[0].dt, None);
        assert_eq!(rows[1].mu_1d, Some(Scalar::Number(0.001)));
    }

    #[test]
    fn serializes_core_columns_before_extras() {
        let v = json!({"ticker": "AAPL", "score_0_100": 71});
        let row: ScoreRow = serde_json::from_value(v).unwrap();
        let out = serde_json::to_value(&row).unwrap();
        let keys: Vec<_> = out.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.first().map(String::as_str), Some("ticker"));
        assert_eq!(keys.last().map(String::as_str), Some("score_0_100"));
    }
}
