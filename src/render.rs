//! Presentation of documentation payloads.
//!
//! Payload text is already escaped, so these functions only wrap it.

use crate::lookup::{hex_color, short_summary};
use crate::types::{CatalogEntry, DocPayload, EntryKind};

/// Full HTML document for rich-text hover surfaces.
pub fn to_html(doc: &DocPayload) -> String {
    let mut html = String::from("<html>\n<body>\n");
    html.push_str(&format!("  <h3>{}</h3>\n", doc.title));

    if let Some(c) = doc.color_swatch {
        html.push_str(&format!(
            "  <div style=\"width:48px;height:20px;border:1px solid #000;display:inline-block;\
             background-color:rgb({},{},{});margin-bottom:8px;vertical-align:middle;\"></div>\n",
            c.r, c.g, c.b
        ));
    }

    html.push_str(&format!(
        "  <div>{}</div>\n",
        doc.description_html.as_deref().unwrap_or("")
    ));

    if let Some(ref code) = doc.code_block {
        html.push_str(&format!(
            "  <pre style=\"background:#f6f8fa;padding:8px;border-radius:4px;overflow:auto;\">\
             <code>{}</code></pre>\n",
            code
        ));
    }

    if let Some(ref origin) = doc.origin_label {
        html.push_str(&format!(
            "  <div style=\"font-size:0.9em;color:#666;margin-top:6px;\">Origin: {}</div>\n",
            origin
        ));
    }

    html.push_str("</body>\n</html>");
    html
}

/// Markdown for LSP-style hovers and the CLI.
pub fn to_markdown(doc: &DocPayload) -> String {
    let mut content = format!("### {}\n\n", doc.title);

    if let Some(c) = doc.color_swatch {
        content.push_str(&format!(
            "**Color:** `rgb({}, {}, {})` `{}`\n\n",
            c.r,
            c.g,
            c.b,
            hex_color(c)
        ));
    }

    if let Some(ref description) = doc.description_html {
        content.push_str(&description.replace("<br/>", "\n"));
        content.push_str("\n\n");
    }

    // Fenced blocks are not entity-decoded
    if let Some(ref code) = doc.code_block {
        content.push_str(&format!("```css\n{}\n```\n\n", unescape_html(code)));
    }

    if let Some(ref origin) = doc.origin_label {
        content.push_str(&format!("**Origin:** {}\n", origin));
    }

    content.trim().to_string()
}

/// One-line quick info, shown by hosts in place of generic element details.
pub fn quick_info(entry: CatalogEntry<'_>) -> String {
    let summary = short_summary(entry.description());
    match entry.kind() {
        EntryKind::Prop => summary,
        EntryKind::Class => {
            let name = match entry.preview_color() {
                Some(color) => format!("{} ({})", entry.name(), hex_color(color)),
                None => entry.name().to_string(),
            };
            if summary.is_empty() {
                name
            } else {
                format!("{} - {}", name, summary)
            }
        }
    }
}

/// Reverse of [`escape_html`](crate::escape_html), for plain-text output.
pub fn unescape_html(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
