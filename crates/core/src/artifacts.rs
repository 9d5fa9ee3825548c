//! Pipeline outputs on disk: the scores CSV, the evaluation report and the model card.

use crate::config::Settings;
use crate::domain::report::{ModelCard, Report};
use crate::domain::score::{Scalar, ScoreRow, CORE_COLUMNS};
use crate::fetch::DashboardSource;
use crate::markdown::md_to_html;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Extra columns placed right after the core ones when present.
pub const OPTIONAL_COLUMNS: [&str; 2] = ["score_0_100", "top_contribs"];

pub const MODEL_CARD_NOT_FOUND: &str = "<p><em>model_card.md not found.</em></p>";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    pub scores_csv: PathBuf,
    pub report_json: PathBuf,
    pub model_card_md: PathBuf,
}

impl ArtifactStore {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            scores_csv: settings.scores_csv.clone(),
            report_json: settings.model_report_json.clone(),
            model_card_md: settings.model_card_md.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DashboardSource for ArtifactStore {
    fn source_name(&self) -> &'static str {
        "artifacts"
    }

    async fn fetch_report(&self) -> Result<Report> {
        load_report(&self.report_json).await
    }

    async fn fetch_scores(&self) -> Result<Vec<ScoreRow>> {
        load_scores(&self.scores_csv).await
    }

    async fn fetch_model(&self) -> Result<ModelCard> {
        load_model_card(&self.model_card_md).await
    }
}

pub async fn load_scores(path: &Path) -> Result<Vec<ScoreRow>> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            anyhow::bail!("missing scores file: {}", path.display())
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", path.display()));
        }
    };
    parse_scores_csv(&text).with_context(|| format!("invalid scores file: {}", path.display()))
}

/// Parse a scores CSV, best `z_score` first.
pub fn parse_scores_csv(text: &str) -> Result<Vec<ScoreRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV header")?
        .iter()
        .map(str::to_string)
        .collect();

    let missing: Vec<&str> = CORE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !headers.iter().any(|h| h == *c))
        .collect();
    anyhow::ensure!(
        missing.is_empty(),
        "scores CSV missing columns: {}",
        missing.join(", ")
    );

    let core_idx: Vec<usize> = CORE_COLUMNS
        .iter()
        .filter_map(|c| headers.iter().position(|h| h == *c))
        .collect();
    let extra_order = extra_column_order(&headers);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record {}", idx + 1))?;
        // Same order as CORE_COLUMNS.
        let core: Vec<&str> = core_idx
            .iter()
            .map(|i| record.get(*i).unwrap_or(""))
            .collect();

        let mut extra = Map::new();
        for (name, i) in &extra_order {
            extra.insert(name.clone(), parse_cell(record.get(*i).unwrap_or("")));
        }

        rows.push(ScoreRow {
            ticker: non_empty(core[0]),
            dt: non_empty(core[1]),
            mu_1d: parse_metric(core[2]),
            sigma: parse_metric(core[3]),
            z_score: parse_metric(core[4]),
            p_pos: parse_metric(core[5]),
            label: non_empty(core[6]),
            extra,
        });
    }

    sort_by_z_desc(&mut rows);
    Ok(rows)
}

/// Optional columns first, then everything else in file order.
fn extra_column_order(headers: &[String]) -> Vec<(String, usize)> {
    let is_extra = |h: &str| !CORE_COLUMNS.contains(&h) && !OPTIONAL_COLUMNS.contains(&h);

    let optional = OPTIONAL_COLUMNS
        .iter()
        .filter_map(|c| headers.iter().position(|h| h == *c).map(|i| (c.to_string(), i)));
    let rest = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_extra(h.as_str()))
        .map(|(i, h)| (h.clone(), i));

    optional.chain(rest).collect()
}

pub fn sort_by_z_desc(rows: &mut [ScoreRow]) {
    rows.sort_by(|a, b| match (a.z_score_value(), b.z_score_value()) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn parse_metric(s: &str) -> Option<Scalar> {
    if s.is_empty() {
        return None;
    }
    match s.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(Scalar::Number(n)),
        _ => Some(Scalar::Text(s.to_string())),
    }
}

fn parse_cell(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::from(i);
    }
    s.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(s.to_string()))
}

/// The report, or a placeholder report when the pipeline has not produced one yet.
pub async fn load_report(path: &Path) -> Result<Report> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => serde_json::from_str(&text)
            .with_context(|| format!("invalid report JSON: {}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "model report not found");
            Ok(Report::not_found())
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

pub async fn load_model_card(path: &Path) -> Result<ModelCard> {
    let html = match tokio::fs::read_to_string(path).await {
        Ok(md) => md_to_html(&md),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "model card not found");
            MODEL_CARD_NOT_FOUND.to_string()
        }
        Err(e) => return Err(e).with_context(|| format!("failed to read {}", path.display())),
    };
    Ok(ModelCard { html: Some(html) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::REPORT_NOT_FOUND_NOTES;

    const CSV: &str = "\
ticker,dt,mu_1d,sigma,z_score,p_pos,label,vol_20d,score_0_100
MSFT,2024-01-02,0.0002,0.011,0.02,0.51,neutral,0.21,55
AAPL,2024-01-02,0.0012,0.01,0.12,0.55,undervalued,0.25,71
XOM,2024-01-02,,0.02,nan,,overvalued,,
";

    #[test]
    fn parses_and_sorts_best_first() {
        let rows = parse_scores_csv(CSV).unwrap();
        let tickers: Vec<_> = rows.iter().map(ScoreRow::ticker).collect();
        assert_eq!(tickers, ["AAPL", "MSFT", "XOM"]);

        let aapl = &rows[0];
        assert_eq!(aapl.mu_1d, Some(Scalar::Number(0.0012)));
        assert_eq!(aapl.cell("score_0_100"), Value::from(71));

        let keys: Vec<_> = aapl.extra.keys().cloned().collect();
        assert_eq!(keys, ["score_0_100", "vol_20d"]);
    }

    #[test]
    fn empty_cells_become_null() {
        let rows = parse_scores_csv(CSV).unwrap();
        let xom = &rows[2];
        assert_eq!(xom.mu_1d, None);
        assert_eq!(xom.z_score, Some(Scalar::Text("nan".into())));
        assert_eq!(xom.cell("vol_20d"), Value::Null);
    }

    #[test]
    fn rejects_missing_core_columns() {
        let err = parse_scores_csv("ticker,dt,mu_1d\nAAPL,2024-01-02,0.1\n").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("sigma"));
        assert!(msg.contains("label"));
    }

    #[tokio::test]
    async fn missing_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();

        let report = load_report(&dir.path().join("model_report.json")).await.unwrap();
        assert_eq!(report.notes.as_deref(), Some(REPORT_NOT_FOUND_NOTES));
        assert_eq!(report.asof, None);

        let card = load_model_card(&dir.path().join("model_card.md")).await.unwrap();
        assert_eq!(card.html.as_deref(), Some(MODEL_CARD_NOT_FOUND));

        assert!(load_scores(&dir.path().join("today_scores.csv")).await.is_err());
    }

    #[tokio::test]
    async fn store_reads_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore {
            scores_csv: dir.path().join("today_scores.csv"),
            report_json: dir.path().join("model_report.json"),
            model_card_md: dir.path().join("model_card.md"),
        };
        std::fs::write(&store.scores_csv, CSV).unwrap();
        std::fs::write(&store.report_json, r#"{"asof":"2024-01-02","ic_t":2.1}"#).unwrap();
        std::fs::write(&store.model_card_md, "# Card").unwrap();

        assert_eq!(store.fetch_scores().await.unwrap().len(), 3);
        assert_eq!(store.fetch_report().await.unwrap().ic_t, Some(2.1));
        assert_eq!(
            store.fetch_model().await.unwrap().html.as_deref(),
            Some("<h1>Card</h1>")
        );
    }
}
