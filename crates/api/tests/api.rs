use equidash_api::{router, AppState};
use equidash_core::artifacts::ArtifactStore;
use equidash_core::dashboard::{Dashboard, PageLayout};
use equidash_core::fetch::http::HttpDashboardClient;
use equidash_core::fetch::{DashboardSource, FetchError};
use serde_json::Value;

const SCORES_CSV: &str = "\
ticker,dt,mu_1d,sigma,z_score,p_pos,label,vol_20d
MSFT,2024-01-02,0.0002,0.011,0.02,0.51,neutral,0.21
AAPL,2024-01-02,0.0012345,0.01,0.12,0.55,Undervalued,0.25
";

struct Fixture {
    _dir: tempfile::TempDir,
    store: ArtifactStore,
}

fn fixture(with_scores: bool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore {
        scores_csv: dir.path().join("today_scores.csv"),
        report_json: dir.path().join("model_report.json"),
        model_card_md: dir.path().join("model_card.md"),
    };
    if with_scores {
        std::fs::write(&store.scores_csv, SCORES_CSV).unwrap();
    }
    std::fs::write(&store.model_card_md, "# Model card\n- hierarchical priors").unwrap();
    Fixture { _dir: dir, store }
}

async fn serve(store: ArtifactStore) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState { store });
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn health_reports_ok() {
    let fx = fixture(true);
    let client = HttpDashboardClient::new(serve(fx.store.clone()).await).unwrap();
    let v: Value = client.fetch_json("/health").await.unwrap();
    assert_eq!(v, serde_json::json!({"ok": true}));
}

#[tokio::test]
async fn serves_scores_best_first_and_fallback_report() {
    let fx = fixture(true);
    let client = HttpDashboardClient::new(serve(fx.store.clone()).await).unwrap();

    let scores = client.fetch_scores().await.unwrap();
    let tickers: Vec<_> = scores.iter().map(|r| r.ticker().to_string()).collect();
    assert_eq!(tickers, ["AAPL", "MSFT"]);

    let report = client.fetch_report().await.unwrap();
    assert_eq!(report.notes.as_deref(), Some("model_report.json not found yet."));

    let card = client.fetch_model().await.unwrap();
    assert!(card.html.unwrap().starts_with("<h1>Model card</h1>"));
}

#[tokio::test]
async fn missing_scores_is_a_server_error() {
    let fx = fixture(false);
    let client = HttpDashboardClient::new(serve(fx.store.clone()).await).unwrap();

    let err = client.fetch_scores().await.unwrap_err();
    let fetch = err.downcast_ref::<FetchError>().unwrap();
    assert_eq!(fetch.status, Some(500));
    assert!(fetch.url.ends_with("/api/scores"));
}

#[tokio::test]
async fn client_bootstrap_end_to_end() {
    let fx = fixture(true);
    let client = HttpDashboardClient::new(serve(fx.store.clone()).await).unwrap();

    let mut page = Dashboard::bootstrap(&client, PageLayout::full()).await;
    assert_eq!(page.snapshot().unwrap().get("top_by_z"), Some("AAPL"));

    page.on_search_input("aa");
    let html = page.to_html("t");
    assert!(html.contains("<td>0.001235</td>"));
    assert!(html.contains("<span class=\"pill undervalued\">undervalued</span>"));
    assert!(!html.contains("<td>MSFT</td>"));
}

#[tokio::test]
async fn index_renders_server_side_with_query() {
    let fx = fixture(true);
    let base = serve(fx.store.clone()).await;

    let html = reqwest::get(format!("{base}/?sort=z_score&asc=true"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("data-sort=\"asc\""));
    let msft = html.find("<td>MSFT</td>").unwrap();
    let aapl = html.find("<td>AAPL</td>").unwrap();
    assert!(msft < aapl);

    let html = reqwest::get(format!("{base}/?q=zzz"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("No rows"));
}

#[tokio::test]
async fn model_page_has_only_the_card() {
    let fx = fixture(true);
    let base = serve(fx.store.clone()).await;

    let html = reqwest::get(format!("{base}/model"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.contains("id=\"modelCard\""));
    assert!(html.contains("<li>hierarchical priors</li>"));
    assert!(!html.contains("scoresBody"));
}
