//! Cursor context detection inside markup tags.
//!
//! Finds the attribute name or quoted attribute value under a 1-based
//! line/column position. All offsets are char indices into the source.

use crate::types::Range;

/// What the cursor sits on inside a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeContext {
    /// Inside a quoted attribute value, closing quote included
    Value {
        element: String,
        attribute: String,
        value: String,
        /// Offset of the value's first char
        value_offset: usize,
        cursor_offset: usize,
        range: Range,
    },

    /// On an attribute name
    Name {
        element: String,
        attribute: String,
        /// The attribute's quoted value, if it has one
        value: Option<String>,
        range: Range,
    },

    /// Elsewhere inside an opening tag, past the element name
    Tag { element: String },

    None,
}

impl AttributeContext {
    /// Caret offset relative to the start of the value.
    pub fn offset_in_value(&self) -> Option<usize> {
        match self {
            AttributeContext::Value {
                value_offset,
                cursor_offset,
                ..
            } => Some(cursor_offset - value_offset),
            _ => None,
        }
    }
}

/// Detect the attribute context at a position.
pub fn detect_attribute(source: &str, line: u32, column: u32) -> AttributeContext {
    let chars: Vec<char> = source.chars().collect();
    let offset = line_col_to_offset(source, line, column);

    if chars.is_empty() || offset > chars.len() {
        return AttributeContext::None;
    }

    match find_enclosing_tag(&chars, offset) {
        Some((tag_start, tag_end)) => parse_tag(&chars, tag_start, tag_end, offset, source),
        None => AttributeContext::None,
    }
}

/// Convert line/column (1-based) to a char offset.
///
/// Positions past the end of the source map to the source's char count.
pub fn line_col_to_offset(source: &str, line: u32, column: u32) -> usize {
    let mut current_line = 1u32;
    let mut current_col = 1u32;
    let mut count = 0;

    for (i, ch) in source.chars().enumerate() {
        if current_line == line && current_col == column {
            return i;
        }

        if ch == '\n' {
            current_line += 1;
            current_col = 1;
        } else {
            current_col += 1;
        }
        count = i + 1;
    }

    count
}

/// Convert a char offset to line/column (1-based).
pub fn offset_to_line_col(source: &str, target_offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;

    for (i, ch) in source.chars().enumerate() {
        if i == target_offset {
            return (line, col);
        }

        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}

/// Range between two char offsets.
pub fn range_between(source: &str, start: usize, end: usize) -> Range {
    let (start_line, start_col) = offset_to_line_col(source, start);
    let (end_line, end_col) = offset_to_line_col(source, end);
    Range {
        start_line,
        start_col,
        end_line,
        end_col,
    }
}

/// Tag boundaries around `offset`: the `<` and the closing `>` (or the end
/// of the source for an unclosed tag), as `(start, end)` with `end` exclusive
/// of the `>`.
fn find_enclosing_tag(chars: &[char], offset: usize) -> Option<(usize, usize)> {
    let probe = offset.min(chars.len() - 1);
    let start = chars[..=probe]
        .iter()
        .rposition(|&c| c == '<' || c == '>')?;

    // Sitting on or after a '>' means we're outside a tag
    if chars[start] != '<' {
        return None;
    }

    let end = chars[start..]
        .iter()
        .position(|&c| c == '>')
        .map(|p| start + p)
        .unwrap_or(chars.len());

    Some((start, end))
}

fn parse_tag(
    chars: &[char],
    tag_start: usize,
    tag_end: usize,
    offset: usize,
    source: &str,
) -> AttributeContext {
    let name_start = tag_start + 1;

    // Closing tags and comments carry no attributes
    if matches!(chars.get(name_start), Some('/') | Some('!') | Some('?')) {
        return AttributeContext::None;
    }

    let mut pos = name_start;
    while pos < tag_end && !chars[pos].is_whitespace() && chars[pos] != '/' {
        pos += 1;
    }
    let element: String = chars[name_start..pos].iter().collect();

    if element.is_empty() || offset < pos {
        return AttributeContext::None;
    }

    while pos < tag_end {
        while pos < tag_end && chars[pos].is_whitespace() {
            pos += 1;
        }

        if pos >= tag_end || chars[pos] == '/' {
            break;
        }

        let attr_start = pos;
        while pos < tag_end
            && chars[pos] != '='
            && chars[pos] != '/'
            && !chars[pos].is_whitespace()
        {
            pos += 1;
        }
        let attr_end = pos;

        if attr_start == attr_end {
            break;
        }
        let attribute: String = chars[attr_start..attr_end].iter().collect();

        let value = scan_value(chars, &mut pos, tag_end);

        if offset >= attr_start && offset < attr_end {
            return AttributeContext::Name {
                element,
                attribute,
                value: value.map(|(start, end)| chars[start..end].iter().collect()),
                range: range_between(source, attr_start, attr_end),
            };
        }

        if let Some((value_start, value_end)) = value {
            if offset >= value_start && offset <= value_end {
                return AttributeContext::Value {
                    element,
                    attribute,
                    value: chars[value_start..value_end].iter().collect(),
                    value_offset: value_start,
                    cursor_offset: offset,
                    range: range_between(source, value_start, value_end),
                };
            }
        }
    }

    if offset <= tag_end {
        AttributeContext::Tag { element }
    } else {
        AttributeContext::None
    }
}

/// Scan `= "value"` after an attribute name, leaving `pos` on the next
/// attribute. Returns the quoted value's bounds; unquoted and missing values
/// give `None`.
fn scan_value(chars: &[char], pos: &mut usize, tag_end: usize) -> Option<(usize, usize)> {
    while *pos < tag_end && chars[*pos].is_whitespace() {
        *pos += 1;
    }

    if *pos >= tag_end || chars[*pos] != '=' {
        return None;
    }
    *pos += 1;

    while *pos < tag_end && chars[*pos].is_whitespace() {
        *pos += 1;
    }

    if *pos >= tag_end {
        return None;
    }

    let quote = chars[*pos];
    if quote != '"' && quote != '\'' {
        // Unquoted value
        while *pos < tag_end && !chars[*pos].is_whitespace() {
            *pos += 1;
        }
        return None;
    }
    *pos += 1;

    let value_start = *pos;
    while *pos < tag_end && chars[*pos] != quote {
        *pos += 1;
    }
    let value_end = *pos;

    if *pos < tag_end {
        *pos += 1;
    }

    Some((value_start, value_end))
}
