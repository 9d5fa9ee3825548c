pub mod artifacts;
pub mod dashboard;
pub mod domain;
pub mod fetch;
pub mod markdown;

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_SCORES_CSV: &str = "data/today_scores.csv";
    const DEFAULT_MODEL_REPORT_JSON: &str = "data/model_report.json";
    const DEFAULT_MODEL_CARD_MD: &str = "docs/model_card.md";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub scores_csv: PathBuf,
        pub model_report_json: PathBuf,
        pub model_card_md: PathBuf,
        pub dashboard_base_url: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                scores_csv: path_var("SCORES_CSV", DEFAULT_SCORES_CSV),
                model_report_json: path_var("MODEL_REPORT_JSON", DEFAULT_MODEL_REPORT_JSON),
                model_card_md: path_var("MODEL_CARD_MD", DEFAULT_MODEL_CARD_MD),
                dashboard_base_url: std::env::var("DASHBOARD_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            })
        }

        pub fn require_base_url(&self) -> anyhow::Result<&str> {
            self.dashboard_base_url
                .as_deref()
                .context("DASHBOARD_BASE_URL is required")
        }
    }

    fn path_var(key: &str, default: &str) -> PathBuf {
        std::env::var(key)
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    }
}
