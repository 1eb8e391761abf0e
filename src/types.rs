//! Core types for Hywind editor intelligence.
//!
//! This module contains the data structures used throughout hywind-hover:
//! - Catalog types ([`ClassEntry`], [`PropEntry`], [`Rgb`], [`CatalogEntry`])
//! - [`Token`] - A token inside an attribute value
//! - [`CaretQuery`] - What the host knows about the caret position
//! - [`DocPayload`] - Escaped documentation fields for a catalog entry
//! - [`HoverInfo`] / [`Range`] - Document-level hover result

use serde::{Deserialize, Serialize};
use std::ops::Range as OffsetRange;

/// RGB preview color of a utility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Utility class definition from the Hywind manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassEntry {
    /// Class name as written in markup (e.g., "bg-primary")
    #[serde(rename = "className")]
    pub name: String,

    /// Free-form description, first line is the summary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Swatch color for color utilities
    #[serde(
        rename = "previewColor",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub preview_color: Option<Rgb>,

    /// CSS the class expands to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Provenance label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Element property definition from the Hywind manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropEntry {
    /// Property (attribute) name (e.g., "hy-prop-active")
    #[serde(rename = "propName")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

/// Which half of the catalog an entry lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Class,
    Prop,
}

/// A borrowed catalog entry of either kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogEntry<'a> {
    Class(&'a ClassEntry),
    Prop(&'a PropEntry),
}

impl<'a> CatalogEntry<'a> {
    pub fn kind(&self) -> EntryKind {
        match self {
            CatalogEntry::Class(_) => EntryKind::Class,
            CatalogEntry::Prop(_) => EntryKind::Prop,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            CatalogEntry::Class(c) => &c.name,
            CatalogEntry::Prop(p) => &p.name,
        }
    }

    pub fn description(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Class(c) => c.description.as_deref(),
            CatalogEntry::Prop(p) => p.description.as_deref(),
        }
    }

    pub fn code(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Class(c) => c.code.as_deref(),
            CatalogEntry::Prop(p) => p.code.as_deref(),
        }
    }

    pub fn origin(&self) -> Option<&'a str> {
        match self {
            CatalogEntry::Class(c) => c.origin.as_deref(),
            CatalogEntry::Prop(p) => p.origin.as_deref(),
        }
    }

    /// Only classes carry a preview color.
    pub fn preview_color(&self) -> Option<Rgb> {
        match self {
            CatalogEntry::Class(c) => c.preview_color,
            CatalogEntry::Prop(_) => None,
        }
    }
}

/// A token inside an unquoted attribute value.
///
/// Offsets are char indices, half-open `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

impl Token {
    pub fn new(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Half-open containment; a boundary offset belongs to the token starting there.
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn range(&self) -> OffsetRange<usize> {
        self.start..self.end
    }
}

/// What the host knows about the caret when asking for the token under it.
///
/// `ranges` are candidate element ranges in the host's own coordinate space
/// (char offsets), and `value_offset` is where the first char of the
/// unquoted value sits in that same space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaretQuery {
    /// Host offset of the value's first char
    pub value_offset: usize,

    /// Candidate element ranges overlapping the caret, any order
    pub ranges: Vec<OffsetRange<usize>>,

    /// Text of the hovered element, when the host has it
    pub exact_text: Option<String>,
}

impl CaretQuery {
    /// Zero-width caret at a value-relative offset.
    pub fn at(offset: usize) -> Self {
        Self {
            value_offset: 0,
            ranges: vec![offset..offset],
            exact_text: None,
        }
    }

    /// Value-relative approximate range.
    pub fn spanning(range: OffsetRange<usize>) -> Self {
        Self {
            value_offset: 0,
            ranges: vec![range],
            exact_text: None,
        }
    }

    /// Query carrying only an exact-text hint.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            exact_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Add a candidate range in host coordinates.
    pub fn with_range(mut self, range: OffsetRange<usize>) -> Self {
        self.ranges.push(range);
        self
    }

    /// Set the exact-text hint.
    pub fn hint(mut self, text: impl Into<String>) -> Self {
        self.exact_text = Some(text.into());
        self
    }

    /// Set the host offset of the value's first char.
    pub fn offset_by(mut self, value_offset: usize) -> Self {
        self.value_offset = value_offset;
        self
    }
}

/// Documentation for one catalog entry, with every text field already
/// HTML-escaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocPayload {
    pub kind: EntryKind,

    /// Escaped entry name
    pub title: String,

    /// Escaped description, newlines as `<br/>`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_swatch: Option<Rgb>,

    /// Escaped code sample
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_block: Option<String>,

    /// Escaped origin label
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_label: Option<String>,
}

/// Completion entry handed to the host, which does its own filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionCandidate {
    pub kind: EntryKind,
    pub name: String,
    pub short_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
}

/// A token that go-to-definition can jump from, with its exact value range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTarget {
    pub name: String,
    pub range: OffsetRange<usize>,
}

/// Go-to-definition result for a document position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub name: String,

    /// Catalog half the token was found in, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,

    /// Token range in the document
    pub range: Range,
}

/// Source range for highlighting.
///
/// All positions are 1-based (line 1, column 1 is the start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Range {
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
}

/// Hover information result for a document position.
#[derive(Debug, Clone, Serialize)]
pub struct HoverInfo {
    /// Markdown-formatted content
    pub contents: String,

    /// Structured payload the contents were rendered from
    pub doc: DocPayload,

    /// Range in source that this hover applies to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

impl HoverInfo {
    pub fn new(contents: String, doc: DocPayload) -> Self {
        Self {
            contents,
            doc,
            range: None,
        }
    }

    /// Add a source range to the hover info.
    pub fn with_range(mut self, range: Range) -> Self {
        self.range = Some(range);
        self
    }
}
