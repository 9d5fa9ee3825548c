pub mod error;
pub mod http;

use crate::domain::report::{ModelCard, Report};
use crate::domain::score::ScoreRow;

pub use error::{FetchError, FetchErrorKind};

pub const REPORT_PATH: &str = "/api/report";
pub const SCORES_PATH: &str = "/api/scores";
pub const MODEL_PATH: &str = "/api/model";

/// Where the dashboard reads its three resources from.
#[async_trait::async_trait]
pub trait DashboardSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn fetch_report(&self) -> anyhow::Result<Report>;

    async fn fetch_scores(&self) -> anyhow::Result<Vec<ScoreRow>>;

    async fn fetch_model(&self) -> anyhow::Result<ModelCard>;
}
