//! Editor-facing surface.
//!
//! [`HywindService`] is what host integrations talk to. Value-level methods
//! take an unquoted attribute value plus whatever the host knows about the
//! caret; document-level methods take raw markup and a 1-based position.

use crate::caret;
use crate::config::Settings;
use crate::context::{detect_attribute, range_between, AttributeContext};
use crate::loader::{Catalog, FetchError, MetaFetcher};
use crate::lookup::render_doc;
use crate::render::{quick_info, to_markdown};
use crate::store::CatalogStore;
use crate::tokenizer::{token_at, tokenize};
use crate::types::{
    CaretQuery, CatalogEntry, CompletionCandidate, Definition, DocPayload, EntryKind, HoverInfo,
    ReferenceTarget, Token,
};
use std::io;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Hover, completion and navigation over the current catalog snapshot.
#[derive(Debug, Clone)]
pub struct HywindService {
    store: Arc<CatalogStore>,
    settings: Settings,
}

impl HywindService {
    pub fn new(catalog: Catalog, settings: Settings) -> Self {
        Self::with_store(Arc::new(CatalogStore::new(catalog)), settings)
    }

    /// Share an existing store, e.g. between several open documents.
    pub fn with_store(store: Arc<CatalogStore>, settings: Settings) -> Self {
        Self { store, settings }
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The current catalog snapshot.
    pub fn catalog(&self) -> Arc<Catalog> {
        self.store.snapshot()
    }

    /// Best-guess token for a caret query.
    pub fn resolve_token(&self, value: &str, query: &CaretQuery) -> Option<String> {
        let catalog = self.catalog();
        let tokens = tokenize(value);
        caret::resolve(value, &tokens, query, |name| catalog.is_known_class(name))
    }

    /// Token containing `offset`, with its exact value range.
    ///
    /// Catalog membership is not required.
    pub fn resolve_reference_at(&self, value: &str, offset: usize) -> Option<ReferenceTarget> {
        let tokens = tokenize(value);
        token_at(&tokens, offset).map(reference_target)
    }

    /// Every token of a value, as navigable references.
    pub fn references_in(&self, value: &str) -> Vec<ReferenceTarget> {
        tokenize(value).iter().map(reference_target).collect()
    }

    /// Documentation for the token a caret query resolves to.
    pub fn hover_doc_at(&self, value: &str, query: &CaretQuery) -> Option<DocPayload> {
        let catalog = self.catalog();
        let tokens = tokenize(value);
        let name = caret::resolve(value, &tokens, query, |name| catalog.is_known_class(name))?;
        catalog.lookup(&name).map(render_doc)
    }

    /// One-line summary for the token a caret query resolves to.
    pub fn quick_info_at(&self, value: &str, query: &CaretQuery) -> Option<String> {
        let catalog = self.catalog();
        let tokens = tokenize(value);
        let name = caret::resolve(value, &tokens, query, |name| catalog.is_known_class(name))?;
        catalog.lookup(&name).map(quick_info)
    }

    /// Documentation for a prop used as an attribute name.
    pub fn attribute_doc(&self, attribute: &str) -> Option<DocPayload> {
        let catalog = self.catalog();
        catalog
            .lookup_prop(attribute)
            .map(|prop| render_doc(CatalogEntry::Prop(prop)))
    }

    /// Every entry of one kind; hosts filter by prefix themselves.
    pub fn completion_candidates(&self, kind: EntryKind) -> Vec<CompletionCandidate> {
        self.catalog().completion_candidates(kind)
    }

    /// Refresh from the configured URL on the calling thread.
    pub fn refresh(&self) -> Result<Arc<Catalog>, FetchError> {
        self.refresh_with(&self.settings.fetcher(), None)
    }

    /// Refresh through a caller-supplied fetcher, from `url` or the
    /// configured URL.
    pub fn refresh_with(
        &self,
        fetcher: &dyn MetaFetcher,
        url: Option<&str>,
    ) -> Result<Arc<Catalog>, FetchError> {
        let url = url.unwrap_or(&self.settings.meta_url);
        self.store
            .refresh(fetcher, url, self.settings.origin_override())
    }

    /// Refresh in the background.
    ///
    /// `url` and `origin_override` fall back to the configured values. The
    /// callback receives whether the new snapshot was published.
    pub fn trigger_refresh<F>(
        &self,
        url: Option<String>,
        origin_override: Option<String>,
        on_done: F,
    ) -> io::Result<JoinHandle<bool>>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let url = url.unwrap_or_else(|| self.settings.meta_url.clone());
        let origin_override = origin_override
            .or_else(|| self.settings.origin_override().map(str::to_string));

        self.store.spawn_refresh(
            Arc::new(self.settings.fetcher()),
            url,
            origin_override,
            on_done,
        )
    }

    /// Hover for a document position.
    ///
    /// Class-list attribute values resolve to class or prop docs. A class-list
    /// attribute name shows its first class; other attribute names resolve
    /// to prop docs.
    pub fn hover(&self, source: &str, line: u32, column: u32) -> Option<HoverInfo> {
        let context = detect_attribute(source, line, column);
        let caret = context.offset_in_value();

        match context {
            AttributeContext::Value {
                attribute,
                value,
                value_offset,
                cursor_offset,
                range,
                ..
            } => {
                if !self.settings.is_class_attribute(&attribute) {
                    return None;
                }

                let query = CaretQuery::default()
                    .offset_by(value_offset)
                    .with_range(cursor_offset..cursor_offset);
                let name = self.resolve_token(&value, &query)?;
                let catalog = self.catalog();
                let doc = render_doc(catalog.lookup(&name)?);

                // Fragment fallback names have no token; keep the value range
                let range = match token_named(&value, &name, caret.unwrap_or(0)) {
                    Some(token) => range_between(
                        source,
                        value_offset + token.start,
                        value_offset + token.end,
                    ),
                    None => range,
                };

                Some(HoverInfo::new(to_markdown(&doc), doc).with_range(range))
            }

            AttributeContext::Name {
                attribute,
                value,
                range,
                ..
            } => {
                let doc = if self.settings.is_class_attribute(&attribute) {
                    self.class_list_doc(value.as_deref()?)?
                } else {
                    self.attribute_doc(&attribute)?
                };
                Some(HoverInfo::new(to_markdown(&doc), doc).with_range(range))
            }

            AttributeContext::Tag { .. } | AttributeContext::None => None,
        }
    }

    /// Docs for a whole class list: its first token, else its first known
    /// class.
    pub fn class_list_doc(&self, value: &str) -> Option<DocPayload> {
        let catalog = self.catalog();
        let tokens = tokenize(value);
        let first = caret::resolve(value, &tokens, &CaretQuery::at(0), |name| {
            catalog.is_known_class(name)
        });

        if let Some(entry) = first.as_deref().and_then(|name| catalog.lookup(name)) {
            return Some(render_doc(entry));
        }

        tokens
            .iter()
            .find_map(|t| catalog.lookup_class(&t.text))
            .map(|class| render_doc(CatalogEntry::Class(class)))
    }

    /// Completion candidates for a document position.
    ///
    /// Classes inside class-list values, props on attribute names or
    /// wherever a new attribute could start.
    pub fn complete(&self, source: &str, line: u32, column: u32) -> Vec<CompletionCandidate> {
        match detect_attribute(source, line, column) {
            AttributeContext::Value { attribute, .. }
                if self.settings.is_class_attribute(&attribute) =>
            {
                self.completion_candidates(EntryKind::Class)
            }
            AttributeContext::Name { .. } | AttributeContext::Tag { .. } => {
                self.completion_candidates(EntryKind::Prop)
            }
            _ => Vec::new(),
        }
    }

    /// Token under the cursor in a class-list value, with its document range.
    pub fn definition(&self, source: &str, line: u32, column: u32) -> Option<Definition> {
        let context = detect_attribute(source, line, column);
        let caret = context.offset_in_value()?;
        let AttributeContext::Value {
            attribute,
            value,
            value_offset,
            ..
        } = context
        else {
            return None;
        };

        if !self.settings.is_class_attribute(&attribute) {
            return None;
        }

        let target = self.resolve_reference_at(&value, caret)?;
        let kind = self.catalog().lookup(&target.name).map(|e| e.kind());

        Some(Definition {
            range: range_between(
                source,
                value_offset + target.range.start,
                value_offset + target.range.end,
            ),
            name: target.name,
            kind,
        })
    }
}

fn reference_target(token: &Token) -> ReferenceTarget {
    ReferenceTarget {
        name: token.text.clone(),
        range: token.range(),
    }
}

/// The token called `name` closest to `caret`.
fn token_named(value: &str, name: &str, caret: usize) -> Option<Token> {
    let tokens: Vec<Token> = tokenize(value)
        .into_iter()
        .filter(|t| t.text == name)
        .collect();

    token_at(&tokens, caret)
        .or_else(|| caret::nearest_token(&tokens, caret))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rgb;

    fn sample_catalog() -> Catalog {
        Catalog::from_json(
            r#"{
                "classes": [
                    {"className": "bg-primary", "description": "Primary background\nmore", "previewColor": {"r": 10, "g": 20, "b": 30}},
                    {"className": "p-4", "description": "Padding", "origin": "core"}
                ],
                "props": [
                    {"propName": "hy-active", "description": "Active item"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn service() -> HywindService {
        HywindService::new(sample_catalog(), Settings::default())
    }

    #[test]
    fn test_hover_doc_end_to_end() {
        let doc = service()
            .hover_doc_at("bg-primary p-4", &CaretQuery::spanning(0..2))
            .unwrap();

        assert_eq!(doc.title, "bg-primary");
        assert_eq!(doc.color_swatch, Some(Rgb::new(10, 20, 30)));
        assert_eq!(
            crate::lookup::short_summary(Some("Primary background\nmore")),
            "Primary background"
        );
        assert_eq!(
            service().quick_info_at("bg-primary p-4", &CaretQuery::spanning(0..2)),
            Some("bg-primary (#0A141E) - Primary background".to_string())
        );
    }

    #[test]
    fn test_hover_doc_unknown_token() {
        assert!(service()
            .hover_doc_at("mystery p-4", &CaretQuery::at(1))
            .is_none());
    }

    #[test]
    fn test_hover_doc_uses_hint() {
        let query = CaretQuery::spanning(0..14).hint("\"p-4\"");
        let doc = service().hover_doc_at("bg-primary p-4", &query).unwrap();
        assert_eq!(doc.title, "p-4");
        assert_eq!(doc.origin_label.as_deref(), Some("core"));
    }

    #[test]
    fn test_prop_value_resolves() {
        let doc = service()
            .hover_doc_at("hy-active", &CaretQuery::at(3))
            .unwrap();
        assert_eq!(doc.kind, EntryKind::Prop);
    }

    #[test]
    fn test_resolve_reference_at() {
        let service = service();
        let target = service.resolve_reference_at("a b-c :d_e", 3).unwrap();
        assert_eq!(target.name, "b-c");
        assert_eq!(target.range, 2..5);

        assert!(service.resolve_reference_at("a b-c", 1).is_none());
        assert!(service.resolve_reference_at("", 0).is_none());
    }

    #[test]
    fn test_references_in() {
        let refs = service().references_in("flex  p-4");
        let names: Vec<_> = refs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["flex", "p-4"]);
        assert_eq!(refs[1].range, 6..9);
    }

    #[test]
    fn test_attribute_doc() {
        let service = service();
        assert_eq!(service.attribute_doc("hy-active").unwrap().title, "hy-active");
        assert!(service.attribute_doc("p-4").is_none());
    }

    #[test]
    fn test_completion_candidates() {
        let service = service();
        assert_eq!(service.completion_candidates(EntryKind::Class).len(), 2);
        assert_eq!(service.completion_candidates(EntryKind::Prop).len(), 1);
    }

    #[test]
    fn test_document_hover_on_class() {
        let source = r#"<div class="bg-primary p-4">"#;
        let info = service().hover(source, 1, 25).unwrap();

        assert_eq!(info.doc.title, "p-4");
        assert!(info.contents.starts_with("### p-4"));
        let range = info.range.unwrap();
        assert_eq!(range.start_col, 24);
        assert_eq!(range.end_col, 27);
    }

    #[test]
    fn test_document_hover_on_closing_quote() {
        let source = r#"<div class="bg-primary p-4">"#;
        let info = service().hover(source, 1, 27).unwrap();
        assert_eq!(info.doc.title, "p-4");
    }

    #[test]
    fn test_document_hover_ignores_other_attributes() {
        let source = r#"<div id="p-4">"#;
        assert!(service().hover(source, 1, 10).is_none());
    }

    #[test]
    fn test_document_hover_on_prop_name() {
        let source = r#"<button hy-active="true">"#;
        let info = service().hover(source, 1, 10).unwrap();
        assert_eq!(info.doc.kind, EntryKind::Prop);
        assert!(info.range.is_some());
    }

    #[test]
    fn test_complete() {
        let service = service();
        let in_class = service.complete(r#"<div class="p">"#, 1, 14);
        assert!(in_class.iter().all(|c| c.kind == EntryKind::Class));
        assert_eq!(in_class.len(), 2);

        let new_attr = service.complete("<div hy", 1, 8);
        assert!(new_attr.iter().all(|c| c.kind == EntryKind::Prop));
        assert_eq!(new_attr.len(), 1);

        assert!(service.complete("<div></div>", 1, 9).is_empty());
    }

    #[test]
    fn test_definition() {
        let source = "<div class=\"flex bg-primary\">";
        let def = service().definition(source, 1, 20).unwrap();
        assert_eq!(def.name, "bg-primary");
        assert_eq!(def.kind, Some(EntryKind::Class));
        assert_eq!(def.range.start_col, 18);
        assert_eq!(def.range.end_col, 28);

        let def = service().definition(source, 1, 14).unwrap();
        assert_eq!(def.name, "flex");
        assert!(def.kind.is_none());
    }

    #[test]
    fn test_custom_class_attributes() {
        let settings: Settings =
            serde_yaml::from_str("class_attributes: [styleClass]\n").unwrap();
        let service = HywindService::new(sample_catalog(), settings);

        assert!(service.hover(r#"<p styleClass="p-4">"#, 1, 16).is_some());
        assert!(service.hover(r#"<p class="p-4">"#, 1, 11).is_none());
    }

    #[test]
    fn test_refresh_with_publishes() {
        let service = service();
        let fetcher = |_: &str| -> Result<String, FetchError> {
            Ok(r#"{"classes": [{"className": "fresh"}]}"#.to_string())
        };

        service.refresh_with(&fetcher, Some("http://x")).unwrap();
        assert!(service.catalog().lookup_class("fresh").is_some());
        assert!(service
            .hover_doc_at("fresh", &CaretQuery::at(0))
            .is_some());
    }

    #[test]
    fn test_document_hover_between_tokens() {
        let source = r#"<div class="ab   p-4">"#;
        // Caret on the gap right after "ab" is nearer "ab", which is unknown
        assert!(service().hover(source, 1, 15).is_none());

        let info = service().hover(source, 1, 17).unwrap();
        assert_eq!(info.doc.title, "p-4");
        assert_eq!(info.range.unwrap().start_col, 18);
    }

    #[test]
    fn test_document_hover_fragment_fallback() {
        let catalog = Catalog::from_json(r#"{"classes": [{"className": "é"}]}"#).unwrap();
        let service = HywindService::new(catalog, Settings::default());
        let source = r#"<div class="é">"#;

        let info = service.hover(source, 1, 13).unwrap();
        assert_eq!(Some(info.doc.clone()), service.hover_doc_at("é", &CaretQuery::at(0)));
        let range = info.range.unwrap();
        assert_eq!((range.start_col, range.end_col), (13, 14));
    }

    #[test]
    fn test_document_hover_on_class_attribute_name() {
        let info = service()
            .hover(r#"<div class="bg-primary p-4">"#, 1, 7)
            .unwrap();
        assert_eq!(info.doc.title, "bg-primary");
        let range = info.range.unwrap();
        assert_eq!((range.start_col, range.end_col), (6, 11));

        // Unknown first token falls back to the first known class
        let info = service().hover(r#"<div class="mystery p-4">"#, 1, 7).unwrap();
        assert_eq!(info.doc.title, "p-4");

        assert!(service().hover(r#"<div class="mystery">"#, 1, 7).is_none());
        assert!(service().hover("<div class>", 1, 7).is_none());
    }

    #[test]
    fn test_class_list_doc() {
        let service = service();
        assert_eq!(service.class_list_doc("  p-4 bg-primary").unwrap().title, "p-4");
        assert_eq!(service.class_list_doc("hy-active").unwrap().kind, EntryKind::Prop);
        assert!(service.class_list_doc("").is_none());
    }
}
