//! Catalog lookups and documentation payloads.
//!
//! Everything user-controlled (descriptions, code samples, origins, names)
//! is HTML-escaped here, before any presentation layer embeds it.

use crate::loader::Catalog;
use crate::types::{
    CatalogEntry, ClassEntry, CompletionCandidate, DocPayload, EntryKind, PropEntry, Rgb,
};

impl Catalog {
    /// First class named exactly `name`.
    pub fn lookup_class(&self, name: &str) -> Option<&ClassEntry> {
        self.classes.iter().find(|c| c.name == name)
    }

    /// First prop named exactly `name`.
    pub fn lookup_prop(&self, name: &str) -> Option<&PropEntry> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Class first, then prop.
    pub fn lookup(&self, name: &str) -> Option<CatalogEntry<'_>> {
        self.lookup_class(name)
            .map(CatalogEntry::Class)
            .or_else(|| self.lookup_prop(name).map(CatalogEntry::Prop))
    }

    /// Whether any class has this exact name.
    pub fn is_known_class(&self, name: &str) -> bool {
        self.lookup_class(name).is_some()
    }

    /// Every entry of one kind, in catalog order.
    pub fn completion_candidates(&self, kind: EntryKind) -> Vec<CompletionCandidate> {
        match kind {
            EntryKind::Class => self
                .classes
                .iter()
                .map(|c| completion_candidate(CatalogEntry::Class(c)))
                .collect(),
            EntryKind::Prop => self
                .props
                .iter()
                .map(|p| completion_candidate(CatalogEntry::Prop(p)))
                .collect(),
        }
    }
}

/// Escape text for embedding in HTML.
pub fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Structured, escaped documentation for an entry.
pub fn render_doc(entry: CatalogEntry<'_>) -> DocPayload {
    DocPayload {
        kind: entry.kind(),
        title: escape_html(entry.name()),
        description_html: entry
            .description()
            .map(|d| escape_html(d).replace('\n', "<br/>")),
        color_swatch: entry.preview_color(),
        code_block: entry.code().map(escape_html),
        origin_label: entry.origin().map(escape_html),
    }
}

/// First line of a description, trimmed and escaped.
pub fn short_summary(description: Option<&str>) -> String {
    description
        .and_then(|d| d.lines().next())
        .map(|line| escape_html(line.trim()))
        .unwrap_or_default()
}

/// `#RRGGBB`, uppercase.
pub fn hex_color(rgb: Rgb) -> String {
    format!("#{:02X}{:02X}{:02X}", rgb.r, rgb.g, rgb.b)
}

fn completion_candidate(entry: CatalogEntry<'_>) -> CompletionCandidate {
    CompletionCandidate {
        kind: entry.kind(),
        name: entry.name().to_string(),
        short_description: short_summary(entry.description()),
        origin: entry
            .origin()
            .filter(|o| !o.trim().is_empty())
            .map(str::to_string),
        color: entry.preview_color(),
    }
}
