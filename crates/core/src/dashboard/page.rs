use crate::dashboard::filter::{filter_by_ticker, normalize_query};
use crate::dashboard::html;
use crate::dashboard::summary::{render_kv, KvPanel};
use crate::dashboard::table::ScoreTable;
use crate::domain::report::{Snapshot, REPORT_KEYS, SNAPSHOT_KEYS};
use crate::domain::score::ScoreRow;
use crate::fetch::DashboardSource;
use std::fmt::Write;

pub const REPORT_ID: &str = "report";
pub const SNAPSHOT_ID: &str = "snapshot";
pub const SCORES_HEAD_ID: &str = "scoresHead";
pub const SCORES_BODY_ID: &str = "scoresBody";
pub const SEARCH_ID: &str = "search";
pub const MODEL_CARD_ID: &str = "modelCard";

/// Which containers the page embeds. A missing container disables its feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    pub report: bool,
    pub snapshot: bool,
    pub scores_head: bool,
    pub scores_body: bool,
    pub search: bool,
    pub model_card: bool,
}

impl PageLayout {
    pub const fn full() -> Self {
        Self {
            report: true,
            snapshot: true,
            scores_head: true,
            scores_body: true,
            search: true,
            model_card: true,
        }
    }

    pub const fn model_only() -> Self {
        Self {
            report: false,
            snapshot: false,
            scores_head: false,
            scores_body: false,
            search: false,
            model_card: true,
        }
    }

    pub const fn without_model_card(self) -> Self {
        Self {
            model_card: false,
            ..self
        }
    }

    fn has_table(&self) -> bool {
        self.scores_head && self.scores_body
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::full()
    }
}

/// In-memory page: the rendered content of every container plus the state behind it.
#[derive(Debug, Clone)]
pub struct Dashboard {
    layout: PageLayout,
    report: Option<KvPanel>,
    snapshot: Option<KvPanel>,
    /// Rows captured at load; every search filters this, never the sorted view.
    base_rows: Vec<ScoreRow>,
    table: Option<ScoreTable>,
    search_wired: bool,
    search_text: String,
    model_card_html: Option<String>,
}

impl Dashboard {
    pub fn new(layout: PageLayout) -> Self {
        Self {
            layout,
            report: None,
            snapshot: None,
            base_rows: Vec::new(),
            table: None,
            search_wired: false,
            search_text: String::new(),
            model_card_html: None,
        }
    }

    /// Run both load routines concurrently. A failing routine is logged and leaves its
    /// containers empty; the other one still renders.
    pub async fn bootstrap(source: &dyn DashboardSource, layout: PageLayout) -> Self {
        let mut page = Self::new(layout);

        let (scores, model) = tokio::join!(
            Self::load_scores_view(source, layout),
            Self::load_model_card(source, layout)
        );

        match scores {
            Ok(Some(view)) => page.install_scores_view(view),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(source = source.source_name(), error = %err, "scores view failed to load")
            }
        }

        match model {
            Ok(html) => page.model_card_html = html,
            Err(err) => {
                tracing::error!(source = source.source_name(), error = %err, "model card failed to load")
            }
        }

        page
    }

    async fn load_scores_view(
        source: &dyn DashboardSource,
        layout: PageLayout,
    ) -> anyhow::Result<Option<ScoresView>> {
        if !layout.has_table() {
            return Ok(None);
        }

        let (report, scores) = tokio::join!(source.fetch_report(), source.fetch_scores());
        let report = report?;
        let scores = scores?;

        tracing::info!(
            source = source.source_name(),
            rows = scores.len(),
            asof = report.asof.as_deref().unwrap_or(""),
            "loaded scores view"
        );

        Ok(Some(ScoresView {
            report: render_kv(&report.to_map(), Some(&REPORT_KEYS)),
            snapshot: render_kv(&Snapshot::from_rows(&scores).to_map(), Some(&SNAPSHOT_KEYS)),
            rows: scores,
        }))
    }

    async fn load_model_card(
        source: &dyn DashboardSource,
        layout: PageLayout,
    ) -> anyhow::Result<Option<String>> {
        if !layout.model_card {
            return Ok(None);
        }
        let card = source.fetch_model().await?;
        Ok(Some(card.html_or_placeholder().to_string()))
    }

    fn install_scores_view(&mut self, view: ScoresView) {
        if self.layout.report {
            self.report = Some(view.report);
        }
        if self.layout.snapshot {
            self.snapshot = Some(view.snapshot);
        }
        self.table = Some(ScoreTable::render(view.rows.clone()));
        self.base_rows = view.rows;
        self.search_wired = self.layout.search;
    }

    /// Input event on the search box. Re-renders the table from the load-time rows, which
    /// discards any sort applied to the previous view.
    pub fn on_search_input(&mut self, text: &str) -> bool {
        if !self.search_wired {
            return false;
        }
        self.search_text = text.to_string();
        let rows = filter_by_ticker(&self.base_rows, text);
        tracing::debug!(query = %normalize_query(text), rows = rows.len(), "search filter applied");
        self.table = Some(ScoreTable::render(rows));
        true
    }

    /// Click on a header cell of the score table.
    pub fn on_header_click(&mut self, column: &str) -> bool {
        self.table
            .as_mut()
            .is_some_and(|table| table.click_header(column))
    }

    pub fn layout(&self) -> PageLayout {
        self.layout
    }

    pub fn report(&self) -> Option<&KvPanel> {
        self.report.as_ref()
    }

    pub fn snapshot(&self) -> Option<&KvPanel> {
        self.snapshot.as_ref()
    }

    pub fn table(&self) -> Option<&ScoreTable> {
        self.table.as_ref()
    }

    pub fn base_rows(&self) -> &[ScoreRow] {
        &self.base_rows
    }

    pub fn model_card_html(&self) -> Option<&str> {
        self.model_card_html.as_deref()
    }

    /// Serialize the page. Containers absent from the layout are left out entirely.
    pub fn to_html(&self, title: &str) -> String {
        let mut body = String::new();
        let _ = writeln!(body, "<h1>{}</h1>", html::escape(title));

        if self.layout.report || self.layout.snapshot {
            body.push_str("<section class=\"cards\">\n");
            if self.layout.report {
                let inner = self.report.as_ref().map(html::kv_rows).unwrap_or_default();
                let _ = writeln!(
                    body,
                    "<div class=\"card\"><h2>Model report</h2><div id=\"{REPORT_ID}\">{inner}</div></div>"
                );
            }
            if self.layout.snapshot {
                let inner = self.snapshot.as_ref().map(html::kv_rows).unwrap_or_default();
                let _ = writeln!(
                    body,
                    "<div class=\"card\"><h2>Snapshot</h2><div id=\"{SNAPSHOT_ID}\">{inner}</div></div>"
                );
            }
            body.push_str("</section>\n");
        }

        if self.layout.has_table() {
            body.push_str("<section class=\"card\">\n");
            if self.layout.search {
                let _ = writeln!(
                    body,
                    "<input id=\"{SEARCH_ID}\" type=\"search\" placeholder=\"Filter by ticker\" value=\"{}\">",
                    html::escape(&self.search_text)
                );
            }
            let (head, rows) = match &self.table {
                Some(table) => (html::table_head(table.view()), html::table_body(table.view())),
                None => (String::new(), String::new()),
            };
            let _ = writeln!(
                body,
                "<table><thead id=\"{SCORES_HEAD_ID}\">{head}</thead><tbody id=\"{SCORES_BODY_ID}\">{rows}</tbody></table>"
            );
            body.push_str("</section>\n");
        }

        if self.layout.model_card {
            let inner = self.model_card_html.as_deref().unwrap_or("");
            let _ = writeln!(
                body,
                "<section class=\"card\"><div id=\"{MODEL_CARD_ID}\">{inner}</div></section>"
            );
        }

        html::document(title, &body)
    }
}

#[derive(Debug)]
struct ScoresView {
    report: KvPanel,
    snapshot: KvPanel,
    rows: Vec<ScoreRow>,
}
