use crate::config::Settings;
use crate::domain::report::{ModelCard, Report};
use crate::domain::score::ScoreRow;
use crate::fetch::{DashboardSource, FetchError, MODEL_PATH, REPORT_PATH, SCORES_PATH};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads the dashboard resources from a running API server.
///
/// One attempt per call: no retries and no client-side timeout. The caller decides whether a
/// failure is surfaced or only logged.
#[derive(Debug, Clone)]
pub struct HttpDashboardClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDashboardClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("equidash/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build dashboard http client")?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.require_base_url()?)
    }

    pub fn url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// GET `path` and decode the body as JSON.
    pub async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = self.url(path);

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::transport(&url, e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::status(&url, status.as_u16()));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| FetchError::transport(&url, e))?;

        serde_json::from_slice::<T>(&body)
            .map_err(|e| FetchError::decode(&url, status.as_u16(), e))
    }
}

#[async_trait::async_trait]
impl DashboardSource for HttpDashboardClient {
    fn source_name(&self) -> &'static str {
        "http"
    }

    async fn fetch_report(&self) -> Result<Report> {
        Ok(self.fetch_json(REPORT_PATH).await?)
    }

    async fn fetch_scores(&self) -> Result<Vec<ScoreRow>> {
        Ok(self.fetch_json(SCORES_PATH).await?)
    }

    async fn fetch_model(&self) -> Result<ModelCard> {
        Ok(self.fetch_json(MODEL_PATH).await?)
    }
}
