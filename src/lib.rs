//! # hywind-hover
//!
//! Editor intelligence for Hywind utility classes embedded in markup
//! attributes.
//!
//! This library resolves the token under the caret inside an attribute value
//! such as `class="p-4 bg-primary"` and maps it to the Hywind catalog of
//! utility classes and element props. It's designed to be used by editor
//! integrations (plugins, LSP servers, etc.) and CLI tools.
//!
//! ## Features
//!
//! - Tokenizing attribute values into `[A-Za-z0-9:_-]+` tokens with exact ranges
//! - Caret resolution that tolerates imprecise host ranges
//! - Escaped documentation payloads, quick info and completion candidates
//! - Catalog refresh from the published manifest without blocking readers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use hywind_hover::{CaretQuery, Catalog, HywindService, Settings};
//!
//! let service = HywindService::new(Catalog::load_default(), Settings::default());
//!
//! // Value-level: the host knows the attribute value and roughly where the caret is
//! if let Some(doc) = service.hover_doc_at("bg-primary p-4", &CaretQuery::spanning(0..2)) {
//!     println!("{}", doc.title);
//! }
//!
//! // Document-level: raw markup and a 1-based position
//! let source = "<div class=\"bg-primary p-4\">";
//! if let Some(info) = service.hover(source, 1, 15) {
//!     println!("{}", info.contents);
//! }
//! ```
//!
//! ## CLI Usage
//!
//! ```bash
//! hywind-hover hover page.ui --line 3 --column 18 --format markdown
//! hywind-hover refresh --save cache/hywind-meta.json
//! ```

pub mod caret;
mod config;
mod context;
mod loader;
mod lookup;
pub mod render;
mod service;
mod store;
mod tokenizer;
mod types;

pub use config::{ConfigError, Settings};
pub use context::{detect_attribute, line_col_to_offset, offset_to_line_col, AttributeContext};
pub use loader::{
    Catalog, FetchError, HttpFetcher, LoadError, MetaFetcher, DEFAULT_META_URL,
};
pub use lookup::{escape_html, hex_color, render_doc, short_summary};
pub use service::HywindService;
pub use store::CatalogStore;
pub use tokenizer::{is_token_char, token_at, tokenize};
pub use types::{
    CaretQuery, CatalogEntry, ClassEntry, CompletionCandidate, Definition, DocPayload,
    EntryKind, HoverInfo, PropEntry, Range, ReferenceTarget, Rgb, Token,
};
