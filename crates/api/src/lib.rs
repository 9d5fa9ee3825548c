use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use equidash_core::artifacts::{self, ArtifactStore};
use equidash_core::dashboard::{Dashboard, PageLayout};
use equidash_core::domain::report::{ModelCard, Report};
use equidash_core::domain::score::ScoreRow;

pub const TITLE: &str = "Equity Bayesian Dashboard";

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ArtifactStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/scores", get(api_scores))
        .route("/api/report", get(api_report))
        .route("/api/model", get(api_model))
        .route("/", get(index))
        .route("/model", get(model_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> {
    Json(json!({"ok": true}))
}

async fn api_scores(State(state): State<AppState>) -> Result<Json<Vec<ScoreRow>>, StatusCode> {
    let rows = artifacts::load_scores(&state.store.scores_csv)
        .await
        .map_err(internal_error)?;
    Ok(Json(rows))
}

async fn api_report(State(state): State<AppState>) -> Result<Json<Report>, StatusCode> {
    let report = artifacts::load_report(&state.store.report_json)
        .await
        .map_err(internal_error)?;
    Ok(Json(report))
}

async fn api_model(State(state): State<AppState>) -> Result<Json<ModelCard>, StatusCode> {
    let card = artifacts::load_model_card(&state.store.model_card_md)
        .await
        .map_err(internal_error)?;
    Ok(Json(card))
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    /// Ticker search text.
    pub q: Option<String>,
    /// Column to sort by (one header click, descending).
    pub sort: Option<String>,
    /// Click the sort header a second time.
    #[serde(default)]
    pub asc: bool,
}

async fn index(State(state): State<AppState>, Query(query): Query<IndexQuery>) -> Html<String> {
    let mut page = Dashboard::bootstrap(&state.store, PageLayout::full()).await;

    if let Some(q) = query.q.as_deref() {
        page.on_search_input(q);
    }
    if let Some(col) = query.sort.as_deref() {
        let clicked = page.on_header_click(col);
        if clicked && query.asc {
            page.on_header_click(col);
        }
    }

    Html(page.to_html(TITLE))
}

async fn model_page(State(state): State<AppState>) -> Html<String> {
    let page = Dashboard::bootstrap(&state.store, PageLayout::model_only()).await;
    Html(page.to_html("Model card"))
}

fn internal_error(err: anyhow::Error) -> StatusCode {
    sentry_anyhow::capture_anyhow(&err);
    tracing::error!(error = %format!("{err:#}"), "artifact load failed");
    StatusCode::INTERNAL_SERVER_ERROR
}
