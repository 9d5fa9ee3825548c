use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use equidash_core::dashboard::{Dashboard, PageLayout};
use equidash_core::fetch::http::HttpDashboardClient;

#[derive(Debug, Parser)]
#[command(name = "equidash_client")]
struct Args {
    /// Dashboard API base URL. Defaults to DASHBOARD_BASE_URL.
    #[arg(long)]
    base_url: Option<String>,

    /// Ticker search text, applied before any sort.
    #[arg(long)]
    search: Option<String>,

    /// Header click on this column. Repeat to click again (e.g. twice for ascending).
    #[arg(long = "sort")]
    sort: Vec<String>,

    /// Render the page without the model card container.
    #[arg(long)]
    no_model_card: bool,

    /// Page title.
    #[arg(long, default_value = "Equity Bayesian Dashboard")]
    title: String,

    /// Write the HTML page here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = equidash_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let client = match args.base_url.as_deref() {
        Some(url) => HttpDashboardClient::new(url)?,
        None => HttpDashboardClient::from_settings(&settings)?,
    };

    let mut layout = PageLayout::full();
    if args.no_model_card {
        layout = layout.without_model_card();
    }

    let mut page = Dashboard::bootstrap(&client, layout).await;

    if let Some(q) = args.search.as_deref() {
        page.on_search_input(q);
    }
    for col in &args.sort {
        if !page.on_header_click(col) {
            tracing::warn!(column = %col, "no such column; sort click ignored");
        }
    }

    let html = page.to_html(&args.title);
    match &args.out {
        Some(path) => {
            std::fs::write(path, &html)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => print!("{html}"),
    }

    tracing::info!(
        rows = page.table().map(|t| t.rows().len()).unwrap_or(0),
        base_rows = page.base_rows().len(),
        model_card = page.model_card_html().is_some(),
        out = ?args.out,
        "dashboard rendered"
    );

    Ok(())
}

fn init_sentry(settings: &equidash_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
