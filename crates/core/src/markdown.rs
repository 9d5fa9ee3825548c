//! Small markdown subset for the model card: `#`/`##`/`###` headings, paragraphs, fenced code
//! and `- ` bullet lists. Good enough for a display-only page; no inline formatting.

use crate::dashboard::html::escape_text;

const SPACER: &str = "<div style='height:8px'></div>";

pub fn md_to_html(md: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_code = false;
    let mut in_list = false;

    for line in md.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            out.push(if in_code { "</code></pre>" } else { "<pre><code>" }.to_string());
            in_code = !in_code;
            continue;
        }

        if in_code {
            out.push(escape_text(line));
            continue;
        }

        if let Some(item) = trimmed.strip_prefix("- ") {
            if !in_list {
                out.push("<ul>".to_string());
                in_list = true;
            }
            out.push(format!("<li>{}</li>", escape_text(item)));
            continue;
        }

        if in_list {
            out.push("</ul>".to_string());
            in_list = false;
        }

        if let Some(h) = line.strip_prefix("### ") {
            out.push(format!("<h3>{}</h3>", escape_text(h)));
        } else if let Some(h) = line.strip_prefix("## ") {
            out.push(format!("<h2>{}</h2>", escape_text(h)));
        } else if let Some(h) = line.strip_prefix("# ") {
            out.push(format!("<h1>{}</h1>", escape_text(h)));
        } else if trimmed.is_empty() {
            out.push(SPACER.to_string());
        } else {
            out.push(format!("<p>{}</p>", escape_text(line)));
        }
    }

    if in_list {
        out.push("</ul>".to_string());
    }
    if in_code {
        out.push("</code></pre>".to_string());
    }

    out.join("\n")
}
