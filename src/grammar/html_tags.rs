//! Explicit block-level HTML tag table (spec §4.5).
//!
//! Tag matching is literal-lowercase-or-literal-uppercase only, never a
//! case-insensitive compare — `<Div>` is deliberately NOT recognised as a
//! block tag here and falls through to inline HTML instead. This is a
//! documented quirk (spec §9(a)) to preserve, not fix.

use crate::engine::Engine;

const BLOCK_TAGS: &[&str] = &[
    "address", "blockquote", "center", "div", "dl", "fieldset", "form", "h1", "h2", "h3", "h4",
    "h5", "h6", "menu", "noframes", "noscript", "ol", "p", "pre", "table", "ul", "dd", "dt",
    "frameset", "li", "tbody", "td", "tfoot", "th", "thead", "tr", "script", "head",
];

fn variants(tag: &str) -> (String, String) {
    (tag.to_ascii_lowercase(), tag.to_ascii_uppercase())
}

fn tag_boundary(b: Option<u8>) -> bool {
    matches!(
        b,
        Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') | None
    )
}

/// Matches the tag name immediately after an already-consumed `<`, trying
/// each table entry as a literal lowercase form then a literal uppercase
/// form. Returns the matched name (lowercase-normalised).
pub fn match_block_tag(engine: &mut Engine) -> Option<String> {
    for &tag in BLOCK_TAGS {
        let (lower, upper) = variants(tag);
        let start = engine.cursor;
        if engine.literal(lower.as_bytes()) || engine.literal(upper.as_bytes()) {
            if tag_boundary(engine.peek()) {
                return Some(lower);
            }
            engine.cursor = start;
        }
    }
    None
}

/// Non-consuming-on-failure check for a nested `<tag ...>` open matching
/// `tag` (either literal case form) at the current cursor; on success,
/// consumes through the matching `>`.
pub fn peek_open_tag(engine: &mut Engine, tag: &str) -> bool {
    let start = engine.cursor;
    if !engine.literal(b"<") {
        return false;
    }
    let (lower, upper) = variants(tag);
    if !(engine.literal(lower.as_bytes()) || engine.literal(upper.as_bytes())) {
        engine.cursor = start;
        return false;
    }
    if !tag_boundary(engine.peek()) {
        engine.cursor = start;
        return false;
    }
    while !matches!(engine.peek(), Some(b'>') | None) {
        engine.any();
    }
    if engine.literal(b">") {
        true
    } else {
        engine.cursor = start;
        false
    }
}

/// Same for a `</tag>` close.
pub fn peek_close_tag(engine: &mut Engine, tag: &str) -> bool {
    let start = engine.cursor;
    if !engine.literal(b"</") {
        return false;
    }
    let (lower, upper) = variants(tag);
    if !(engine.literal(lower.as_bytes()) || engine.literal(upper.as_bytes())) {
        engine.cursor = start;
        return false;
    }
    while !matches!(engine.peek(), Some(b'>') | None) {
        engine.any();
    }
    if engine.literal(b">") {
        true
    } else {
        engine.cursor = start;
        false
    }
}
