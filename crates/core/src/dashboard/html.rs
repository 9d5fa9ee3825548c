use crate::dashboard::format::Cell;
use crate::dashboard::summary::KvPanel;
use crate::dashboard::table::{RenderedTable, TableBody, EMPTY_TABLE_TEXT};
use std::fmt::Write;

/// Escape for text content; quotes are left alone.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape for text and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inner markup of a key/value container.
pub fn kv_rows(panel: &KvPanel) -> String {
    let mut out = String::new();
    for row in &panel.rows {
        let _ = write!(
            out,
            "<div class=\"kv-row\"><div class=\"kv-key\">{}</div><div class=\"kv-val\">{}</div></div>",
            escape(&row.key),
            escape(&row.value)
        );
    }
    out
}

/// Inner markup of `scoresHead`.
pub fn table_head(table: &RenderedTable) -> String {
    if table.header.is_empty() {
        return String::new();
    }

    let mut out = String::from("<tr>");
    for cell in &table.header {
        let col = escape(&cell.column);
        match cell.sorted {
            Some(asc) => {
                let dir = if asc { "asc" } else { "desc" };
                let _ = write!(out, "<th data-col=\"{col}\" data-sort=\"{dir}\">{col}</th>");
            }
            None => {
                let _ = write!(out, "<th data-col=\"{col}\">{col}</th>");
            }
        }
    }
    out.push_str("</tr>");
    out
}

/// Inner markup of `scoresBody`.
pub fn table_body(table: &RenderedTable) -> String {
    let rows = match &table.body {
        TableBody::Empty => {
            return format!("<tr><td class=\"muted\">{EMPTY_TABLE_TEXT}</td></tr>");
        }
        TableBody::Rows(rows) => rows,
    };

    let mut out = String::new();
    for row in rows {
        out.push_str("<tr>");
        for cell in row {
            match cell {
                Cell::Text(s) => {
                    let _ = write!(out, "<td>{}</td>", escape(s));
                }
                Cell::Pill(label) => {
                    let label = escape(label);
                    let _ = write!(out, "<td><span class=\"pill {label}\">{label}</span></td>");
                }
            }
        }
        out.push_str("</tr>");
    }
    out
}

pub const STYLE: &str = r#"
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',sans-serif;margin:0;background:#f5f5f7;color:#1d1d1f}
main{max-width:1200px;margin:0 auto;padding:24px}
.cards{display:grid;grid-template-columns:1fr 1fr;gap:16px;margin-bottom:16px}
.card{background:#fff;border-radius:12px;padding:16px;box-shadow:0 1px 3px rgba(0,0,0,.08)}
.kv-row{display:flex;justify-content:space-between;padding:4px 0;border-bottom:1px solid #eee}
.kv-key{color:#86868b}
table{width:100%;border-collapse:collapse;font-size:13px}
th{text-align:left;cursor:pointer;padding:6px;border-bottom:2px solid #d2d2d7}
th[data-sort=asc]::after{content:" \25B2"}
th[data-sort=desc]::after{content:" \25BC"}
td{padding:6px;border-bottom:1px solid #eee;font-variant-numeric:tabular-nums}
.muted{color:#86868b}
.pill{display:inline-block;padding:2px 8px;border-radius:999px;font-size:11px;background:#e5e5ea}
.pill.undervalued{background:#d1f5dd;color:#0a7a32}
.pill.overvalued{background:#fde2e1;color:#b3261e}
#search{padding:6px 10px;border:1px solid #d2d2d7;border-radius:6px;margin-bottom:8px}
"#;

/// Wrap rendered sections in a standalone document.
pub fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        escape(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::table::ScoreTable;
    use crate::domain::score::ScoreRow;
    use serde_json::json;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>&\"'"), "&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn empty_table_renders_single_row() {
        let table = ScoreTable::render(Vec::new());
        assert_eq!(table_head(table.view()), "");
        assert_eq!(
            table_body(table.view()),
            "<tr><td class=\"muted\">No rows</td></tr>"
        );
    }

    #[test]
    fn pill_and_sort_markers() {
        let rows: Vec<ScoreRow> = serde_json::from_value(json!([
            {"ticker": "AAPL", "label": "Undervalued"},
        ]))
        .unwrap();
        let mut table = ScoreTable::render(rows);
        table.click_header("ticker");

        let head = table_head(table.view());
        assert!(head.contains("<th data-col=\"ticker\" data-sort=\"desc\">ticker</th>"));
        assert!(head.contains("<th data-col=\"label\">label</th>"));

        let body = table_body(table.view());
        assert!(body.contains("<span class=\"pill undervalued\">undervalued</span>"));
    }
}
