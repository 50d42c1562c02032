//! Block-level grammar (spec §4.5): partitions lines into headings, lists,
//! blockquotes, verbatims, horizontal rules, reference/footnote definitions,
//! HTML blocks, and paragraphs.

use super::{
    blank_line_lookahead, count_blank_lines, indent, newline, nonindent_space, raw_line,
    raw_line_terminated, skip_blank_lines, sp, GrammarState,
};
use crate::arena::NodeHandle;
use crate::ast::Kind;
use crate::engine::Engine;

/// `Blocks`: zero or more blocks in sequence, returned as a head-first
/// cons-list ready for `alloc_list` to reverse (spec §4.2, §4.5 "Entry
/// points"). Reference and footnote definitions are consumed here too —
/// passes 1/2 already recorded them; the Document pass just needs them gone
/// from the block stream.
pub fn blocks(state: &mut GrammarState) -> Option<NodeHandle> {
    let mut head = None;
    loop {
        skip_blank_lines(&mut state.engine);
        if state.engine.at_eof() {
            break;
        }
        if state.check_cancelled() {
            break;
        }
        if reference_def(state, false).is_some() {
            continue;
        }
        if state.options.notes && footnote_def(state, false).is_some() {
            continue;
        }
        match block(state) {
            Some(node) => head = state.cons(node, head),
            None => {
                // `Plain` is the catch-all (spec §7): reaching here with
                // input remaining means every production, including `Plain`,
                // failed to make progress — an engine bug, not a Markdown
                // input that "failed to parse".
                state.fatal = Some(crate::error::ParseError::EngineStalled(state.engine.cursor));
                break;
            }
        }
    }
    head
}

/// `Block`: ordered choice over every block production, classic-Markdown
/// order (more specific constructs before the `Paragraph`/`Plain` catch-all).
pub fn block(state: &mut GrammarState) -> Option<NodeHandle> {
    atx_heading(state)
        .or_else(|| setext_heading(state))
        .or_else(|| horizontal_rule(state))
        .or_else(|| {
            if state.options.dlists {
                crate::grammar::dlist::definition_list(state)
            } else {
                None
            }
        })
        .or_else(|| bullet_list(state))
        .or_else(|| ordered_list(state))
        .or_else(|| verbatim(state))
        .or_else(|| blockquote(state))
        .or_else(|| style_block(state))
        .or_else(|| html_block(state))
        .or_else(|| paragraph(state))
        .or_else(|| plain(state))
}

/// `SkipBlock`: advance over one block's worth of input without building a
/// tree (spec §4.5, used by the References/Notes passes). Returns `false`
/// only at end of input.
pub fn skip_block(state: &mut GrammarState) -> bool {
    skip_blank_lines(&mut state.engine);
    if state.engine.at_eof() {
        return false;
    }
    raw_line(&mut state.engine);
    true
}

/// A cheap, non-allocating heuristic for "does a new block start here" used
/// by `Paragraph` to stop absorbing lines without invoking (and discarding
/// the allocations of) the real block productions as lookahead.
fn starts_new_block(state: &GrammarState) -> bool {
    let eng = &state.engine;
    let mut off = 0usize;
    let mut spaces = 0;
    while spaces < 3 && eng.peek_at(off) == Some(b' ') {
        off += 1;
        spaces += 1;
    }
    match eng.peek_at(off) {
        Some(b'#') | Some(b'>') | Some(b'[') | Some(b'<') => true,
        Some(b'*') | Some(b'-') | Some(b'+') => eng.peek_at(off + 1) == Some(b' '),
        Some(c) if c.is_ascii_digit() => {
            let mut j = off;
            while matches!(eng.peek_at(j), Some(d) if d.is_ascii_digit()) {
                j += 1;
            }
            eng.peek_at(j) == Some(b'.') && eng.peek_at(j + 1) == Some(b' ')
        }
        _ => false,
    }
}

/// `AtxStart`/`AtxHeading`: the longest run of `#` up to six sets the level;
/// a run beyond six is NOT consumed as marker and instead becomes part of
/// the heading's own text (spec §8 boundary: seven `#`s yields H6 whose
/// content is a literal `#`).
pub fn atx_heading(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    let mut level = 0u8;
    while level < 6 && state.engine.literal(b"#") {
        level += 1;
    }
    if level == 0 {
        state.engine.cursor = start;
        return None;
    }
    while sp(&mut state.engine) {}
    let text_start = state.engine.cursor;
    while !state.engine.at_eof() && !matches!(state.engine.peek(), Some(b'\n') | Some(b'\r')) {
        state.engine.any();
    }
    let raw = state.engine.text_since(text_start);
    newline(&mut state.engine);
    skip_blank_lines(&mut state.engine);

    let trimmed = raw.trim_end_matches(['#', ' ', '\t']);
    let content = if trimmed.is_empty() && !raw.is_empty() {
        raw.as_str()
    } else {
        trimmed
    };
    let head = crate::grammar::inline::parse_inline_text(state, content);
    state.alloc_list(Kind::heading(level), head)
}

/// `SetextHeading`: a non-blank text line followed immediately by a line of
/// `=` (level 1) or `-` (level 2).
pub fn setext_heading(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if blank_line_lookahead(&mut state.engine) || state.engine.at_eof() {
        state.engine.cursor = start;
        return None;
    }
    let text = match raw_line(&mut state.engine) {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            state.engine.cursor = start;
            return None;
        }
    };

    let bottom_start = state.engine.cursor;
    let level = if state.engine.class(|b| b == b'=') {
        while state.engine.literal(b"=") {}
        while sp(&mut state.engine) {}
        if newline(&mut state.engine) || state.engine.at_eof() {
            Some(1u8)
        } else {
            None
        }
    } else {
        None
    };
    let level = match level {
        Some(l) => Some(l),
        None => {
            state.engine.cursor = bottom_start;
            if state.engine.class(|b| b == b'-') {
                while state.engine.literal(b"-") {}
                while sp(&mut state.engine) {}
                if newline(&mut state.engine) || state.engine.at_eof() {
                    Some(2u8)
                } else {
                    None
                }
            } else {
                None
            }
        }
    };
    let level = match level {
        Some(l) => l,
        None => {
            state.engine.cursor = start;
            return None;
        }
    };

    skip_blank_lines(&mut state.engine);
    let head = crate::grammar::inline::parse_inline_text(state, text.trim_end());
    state.alloc_list(Kind::heading(level), head)
}

/// `HorizontalRule`: three or more `*`, `-`, or `_` on a line, optionally
/// interspersed with spaces.
pub fn horizontal_rule(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    let marker = match state.engine.peek() {
        Some(b @ (b'*' | b'-' | b'_')) => b,
        _ => {
            state.engine.cursor = start;
            return None;
        }
    };
    let mut count = 0;
    loop {
        if state.engine.literal(&[marker]) {
            count += 1;
        } else if sp(&mut state.engine) {
            // interspersed spaces don't count toward the run
        } else {
            break;
        }
    }
    if count < 3 {
        state.engine.cursor = start;
        return None;
    }
    while sp(&mut state.engine) {}
    if !(state.engine.at_eof() || newline(&mut state.engine)) {
        state.engine.cursor = start;
        return None;
    }
    skip_blank_lines(&mut state.engine);
    state.alloc_elem(Kind::Hrule)
}

enum Marker {
    Bullet,
    Ordered,
}

/// Matches (and consumes) a list marker plus the single space or line end
/// that must follow it; restores the cursor and returns `false` on failure.
fn match_marker(engine: &mut Engine, kind: &Marker) -> bool {
    let start = engine.cursor;
    let ok = match kind {
        Marker::Bullet => {
            if matches!(engine.peek(), Some(b'*') | Some(b'-') | Some(b'+')) {
                engine.any();
                sp(engine) || engine.at_eof() || matches!(engine.peek(), Some(b'\n') | Some(b'\r'))
            } else {
                false
            }
        }
        Marker::Ordered => {
            let mut n = 0;
            while engine.class(|b| b.is_ascii_digit()) {
                n += 1;
            }
            n > 0
                && engine.literal(b".")
                && (sp(engine)
                    || engine.at_eof()
                    || matches!(engine.peek(), Some(b'\n') | Some(b'\r')))
        }
    };
    if ok {
        true
    } else {
        engine.cursor = start;
        false
    }
}

fn match_marker_lookahead(engine: &mut Engine, kind: &Marker) -> bool {
    engine.lookahead_positive(|e| {
        nonindent_space(e);
        match_marker(e, kind)
    })
}

/// `BulletList`/`OrderedList`/`ListTight`/`ListLoose`: a run of items all
/// sharing one marker discipline. Looseness (spec §4.5) is a property of the
/// whole list, not of one item: if any inter-item or intra-item gap contains
/// a blank line, every item's RAW gets `"\n\n"` appended before the recursive
/// reparse, so its content surfaces as PARA; a tight list leaves every item's
/// RAW without a trailing terminator, so it surfaces as PLAIN instead.
fn list_generic(state: &mut GrammarState, marker_kind: Marker) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !match_marker_lookahead(&mut state.engine, &marker_kind) {
        state.engine.cursor = start;
        return None;
    }

    let mut raws: Vec<String> = Vec::new();
    let mut is_loose = false;
    loop {
        let item_start = state.engine.cursor;
        nonindent_space(&mut state.engine);
        if !match_marker(&mut state.engine, &marker_kind) {
            state.engine.cursor = item_start;
            break;
        }
        while sp(&mut state.engine) {}

        let mut raw = String::new();
        if let Some(first_line) = raw_line(&mut state.engine) {
            raw.push_str(&first_line);
        }

        // Indented continuation lines within the same item (spec
        // "ListContinuationBlock"): an empty blank-run before an indented
        // continuation becomes a `0x01` separator byte; a real blank run is
        // kept as a real paragraph break and makes the whole list loose.
        loop {
            let save = state.engine.cursor;
            let blanks = count_blank_lines(&mut state.engine);
            if indent(&mut state.engine) {
                if blanks > 0 {
                    raw.push_str("\n\n");
                    is_loose = true;
                } else {
                    raw.push('\u{1}');
                }
                if let Some(line) = raw_line(&mut state.engine) {
                    raw.push_str(&line);
                }
                continue;
            }
            state.engine.cursor = save;
            break;
        }

        // Blank-line run between this item and whatever follows: only makes
        // the list loose if something (another item, or an indented
        // continuation already absorbed above) actually follows it.
        let after_item = state.engine.cursor;
        let blanks = count_blank_lines(&mut state.engine);
        if blanks > 0 {
            if match_marker_lookahead(&mut state.engine, &marker_kind) {
                is_loose = true;
            } else {
                state.engine.cursor = after_item;
            }
        }

        raws.push(raw);

        if !match_marker_lookahead(&mut state.engine, &marker_kind) {
            break;
        }
    }

    if raws.is_empty() {
        state.engine.cursor = start;
        return None;
    }

    let mut head = None;
    for mut raw in raws {
        if is_loose && !raw.ends_with("\n\n") {
            raw.push_str("\n\n");
        }
        let item_node = build_list_item(state, &raw)?;
        head = state.cons(item_node, head);
    }

    let kind = match marker_kind {
        Marker::Bullet => Kind::BulletList,
        Marker::Ordered => Kind::OrderedList,
    };
    state.alloc_list(kind, head)
}

pub fn bullet_list(state: &mut GrammarState) -> Option<NodeHandle> {
    list_generic(state, Marker::Bullet)
}

pub fn ordered_list(state: &mut GrammarState) -> Option<NodeHandle> {
    list_generic(state, Marker::Ordered)
}

/// Recursively reparses an item's RAW text as a block sequence (spec §9
/// "Recursive reparse"), then wraps the result as LISTITEM.
///
/// `list_generic`'s continuation-line loop splices the `0x01` separator byte
/// in ahead of an indented continuation line that had no blank run before it
/// (spec §4.5 `ListContinuationBlock`). That byte is only ever meant to join
/// the continuation to the same block the way a real line terminator would
/// — it must be translated to `\n` before this RAW is handed to `blocks`,
/// or the block/inline grammar has no production for it and `Symbol`'s
/// single-arbitrary-byte fallback leaks it into the tree as a literal STR.
fn build_list_item(state: &mut GrammarState, raw: &str) -> Option<NodeHandle> {
    let bytes: Vec<u8> = raw.replace('\u{1}', "\n").into_bytes();
    let head = state.reparse(bytes, blocks);
    state.alloc_list(Kind::ListItem, head)
}

/// `Verbatim`: a run of four-space/tab-indented lines, with interior blank
/// lines allowed only when another indented line follows.
pub fn verbatim(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    let mut text = String::new();
    loop {
        let save = state.engine.cursor;
        if indent(&mut state.engine) {
            match raw_line(&mut state.engine) {
                Some(line) => {
                    if !text.is_empty() {
                        text.push('\n');
                    }
                    text.push_str(&line);
                }
                None => {
                    state.engine.cursor = save;
                    break;
                }
            }
            continue;
        }
        let blanks = count_blank_lines(&mut state.engine);
        if blanks > 0 && indent(&mut state.engine) {
            state.engine.cursor = save;
            continue;
        }
        state.engine.cursor = save;
        break;
    }
    if text.is_empty() {
        state.engine.cursor = start;
        return None;
    }
    skip_blank_lines(&mut state.engine);
    state.alloc_string(Kind::Verbatim, text)
}

/// `BlockQuote`: one or more `>`-prefixed lines (a lazy continuation line
/// with no leading `>` is absorbed too, as long as it doesn't itself start a
/// new block), reparsed recursively as blocks (spec §9).
pub fn blockquote(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    if !state.engine.literal(b">") {
        state.engine.cursor = start;
        return None;
    }
    state.engine.literal(b" ");
    let mut raw = String::new();
    if let Some(line) = raw_line(&mut state.engine) {
        raw.push_str(&line);
    }
    loop {
        let save = state.engine.cursor;
        nonindent_space(&mut state.engine);
        if state.engine.literal(b">") {
            state.engine.literal(b" ");
            if let Some(line) = raw_line(&mut state.engine) {
                raw.push('\n');
                raw.push_str(&line);
            }
            continue;
        }
        state.engine.cursor = save;
        if !blank_line_lookahead(&mut state.engine)
            && !state.engine.at_eof()
            && !starts_new_block(state)
        {
            if let Some(line) = raw_line(&mut state.engine) {
                raw.push('\n');
                raw.push_str(&line);
                continue;
            }
        }
        state.engine.cursor = save;
        break;
    }
    skip_blank_lines(&mut state.engine);
    // A quote's content always surfaces as PARA, never PLAIN — unlike a list
    // item, a blockquote has no tight/loose distinction to preserve.
    if !raw.ends_with("\n\n") {
        raw.push_str("\n\n");
    }
    let bytes: Vec<u8> = raw.as_bytes().to_vec();
    let head = state.reparse(bytes, blocks);
    state.alloc_list(Kind::BlockQuote, head)
}

/// `StyleBlock`: a `<style>...</style>` block, recognised separately from the
/// general `HtmlBlock` tag table so `FilterStyles` can gate it independently
/// of `FilterHTML` (spec §4.5: "FilterHTML / FilterStyles options cause
/// HtmlBlock and StyleBlock productions to succeed but return an empty LIST").
pub fn style_block(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    let open_start = state.engine.cursor;
    if !(state.engine.literal_ci(b"<style")) {
        state.engine.cursor = start;
        return None;
    }
    if !matches!(
        state.engine.peek(),
        Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
    ) {
        state.engine.cursor = start;
        return None;
    }
    while !matches!(state.engine.peek(), Some(b'>') | None) {
        state.engine.any();
    }
    if !state.engine.literal(b">") {
        state.engine.cursor = start;
        return None;
    }
    loop {
        if state.engine.at_eof() {
            state.engine.cursor = start;
            return None;
        }
        if state.engine.literal_ci(b"</style>") {
            break;
        }
        state.engine.any();
    }
    skip_blank_lines(&mut state.engine);
    let text = state.engine.text_since(open_start);
    if state.options.filter_styles {
        state.alloc_list(Kind::List, None)
    } else {
        state.alloc_string(Kind::HtmlBlock, text)
    }
}

/// `HtmlBlock`: a block-level tag from the explicit table (spec §4.5), with
/// nested same-tag recursion, or an HTML comment. A self-closing open tag
/// (`<div/>`) finishes the block at its own `>` rather than entering the
/// nesting loop, which would otherwise scan for a `</tag>` that never comes.
/// `FilterHTML` replaces the captured text with an empty LIST rather than an
/// HTMLBLOCK node.
pub fn html_block(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    let open_start = state.engine.cursor;
    if !state.engine.literal(b"<") {
        state.engine.cursor = start;
        return None;
    }

    if state.engine.literal(b"!--") {
        loop {
            if state.engine.literal(b"-->") {
                break;
            }
            if state.engine.at_eof() {
                state.engine.cursor = start;
                return None;
            }
            state.engine.any();
        }
        skip_blank_lines(&mut state.engine);
        let text = state.engine.text_since(open_start);
        return finish_html_block(state, text);
    }

    let tag = match super::html_tags::match_block_tag(&mut state.engine) {
        Some(t) => t,
        None => {
            state.engine.cursor = start;
            return None;
        }
    };
    while !matches!(state.engine.peek(), Some(b'>') | None) {
        state.engine.any();
    }
    let self_closing = state.engine.cursor > 0
        && state.engine.buffer.byte_at(state.engine.cursor - 1) == Some(b'/');
    if !state.engine.literal(b">") {
        state.engine.cursor = start;
        return None;
    }
    if self_closing {
        skip_blank_lines(&mut state.engine);
        let text = state.engine.text_since(open_start);
        return finish_html_block(state, text);
    }

    let mut depth = 1u32;
    loop {
        if state.engine.at_eof() {
            break;
        }
        if super::html_tags::peek_open_tag(&mut state.engine, &tag) {
            depth += 1;
            continue;
        }
        if super::html_tags::peek_close_tag(&mut state.engine, &tag) {
            depth -= 1;
            if depth == 0 {
                break;
            }
            continue;
        }
        state.engine.any();
    }
    skip_blank_lines(&mut state.engine);
    let text = state.engine.text_since(open_start);
    finish_html_block(state, text)
}

fn finish_html_block(state: &mut GrammarState, text: String) -> Option<NodeHandle> {
    if state.options.filter_html {
        state.alloc_list(Kind::List, None)
    } else {
        state.alloc_string(Kind::HtmlBlock, text)
    }
}

/// `ReferenceDef`: `[label]: url "title"`. Called with `record = false`
/// during the Document pass purely to consume (and discard) the lines again
/// so they don't fall through to `Paragraph`.
pub fn reference_def(state: &mut GrammarState, record: bool) -> Option<()> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    let label_text = match super::inline::bracketed_text(&mut state.engine) {
        Some(t) => t,
        None => {
            state.engine.cursor = start;
            return None;
        }
    };
    if !state.engine.literal(b":") {
        state.engine.cursor = start;
        return None;
    }
    while sp(&mut state.engine) {}
    newline(&mut state.engine);
    while sp(&mut state.engine) {}

    let url_start = state.engine.cursor;
    if state.engine.literal(b"<") {
        while !matches!(state.engine.peek(), Some(b'>') | None) {
            state.engine.any();
        }
        state.engine.literal(b">");
    } else {
        while !matches!(
            state.engine.peek(),
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | None
        ) {
            state.engine.any();
        }
    }
    let raw_url = state.engine.text_since(url_start);
    let url = raw_url.trim_start_matches('<').trim_end_matches('>').to_string();
    if url.is_empty() {
        state.engine.cursor = start;
        return None;
    }

    while sp(&mut state.engine) {}
    let mut title = String::new();
    if state.engine.literal(b"\"") {
        let t_start = state.engine.cursor;
        while !matches!(state.engine.peek(), Some(b'"') | None) {
            state.engine.any();
        }
        title = state.engine.text_since(t_start);
        state.engine.literal(b"\"");
    } else if state.engine.literal(b"'") {
        let t_start = state.engine.cursor;
        while !matches!(state.engine.peek(), Some(b'\'') | None) {
            state.engine.any();
        }
        title = state.engine.text_since(t_start);
        state.engine.literal(b"'");
    } else if state.engine.literal(b"(") {
        let t_start = state.engine.cursor;
        while !matches!(state.engine.peek(), Some(b')') | None) {
            state.engine.any();
        }
        title = state.engine.text_since(t_start);
        state.engine.literal(b")");
    }
    while sp(&mut state.engine) {}
    newline(&mut state.engine);
    skip_blank_lines(&mut state.engine);

    if record {
        let label_handle = super::inline::parse_label(state, &label_text);
        let node = state.alloc_link(Kind::Reference, label_handle, url, title)?;
        state.references.record(node);
    }
    Some(())
}

/// `NoteDef`: `[^key]: ...`, with subsequent indented lines treated as
/// continuation of the definition's content.
pub fn footnote_def(state: &mut GrammarState, record: bool) -> Option<()> {
    let start = state.engine.cursor;
    nonindent_space(&mut state.engine);
    if !state.engine.literal(b"[^") {
        state.engine.cursor = start;
        return None;
    }
    let key_start = state.engine.cursor;
    while !matches!(state.engine.peek(), Some(b']') | None) {
        state.engine.any();
    }
    let key = state.engine.text_since(key_start);
    if !state.engine.literal(b"]") {
        state.engine.cursor = start;
        return None;
    }
    if !state.engine.literal(b":") {
        state.engine.cursor = start;
        return None;
    }
    while sp(&mut state.engine) {}

    let mut text = String::new();
    if let Some(first) = raw_line(&mut state.engine) {
        text.push_str(first.trim_start());
    }
    loop {
        let save = state.engine.cursor;
        skip_blank_lines(&mut state.engine);
        if indent(&mut state.engine) {
            if let Some(line) = raw_line(&mut state.engine) {
                text.push('\n');
                text.push_str(&line);
                continue;
            }
        }
        state.engine.cursor = save;
        break;
    }
    skip_blank_lines(&mut state.engine);

    if record {
        let head = super::inline::parse_inline_text(state, &text);
        let ordered = state.reverse_chain(head);
        state.notes.record(key, ordered);
    }
    Some(())
}

/// `Paragraph`: one or more non-blank lines, stopping at a blank line, the
/// start of a more specific block, or end of input — but only the first two
/// are a genuine boundary. Running off the end of input mid-line with no
/// terminator ever consumed (a tight list item's RAW, spec §4.5, never has
/// one) isn't; `paragraph` fails in that case and `plain` claims the text
/// instead, so `Kind::Plain` surfaces exactly where tight-list content does.
pub fn paragraph(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if state.engine.at_eof() || blank_line_lookahead(&mut state.engine) {
        state.engine.cursor = start;
        return None;
    }
    let mut text = String::new();
    let mut stopped_short = false;
    loop {
        if state.engine.at_eof() {
            break;
        }
        if blank_line_lookahead(&mut state.engine) {
            stopped_short = false;
            break;
        }
        if !text.is_empty() && starts_new_block(state) {
            stopped_short = false;
            break;
        }
        match raw_line_terminated(&mut state.engine) {
            Some((line, terminated)) => {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(&line);
                stopped_short = !terminated;
            }
            None => break,
        }
    }
    if text.is_empty() {
        state.engine.cursor = start;
        return None;
    }
    if stopped_short {
        state.engine.cursor = start;
        return None;
    }
    skip_blank_lines(&mut state.engine);
    let head = super::inline::parse_inline_text(state, &text);
    state.alloc_list(Kind::Para, head)
}

/// `Plain`: the catch-all that guarantees totality (spec §7) when nothing
/// else — not even `Paragraph` — could make progress. Reached for a tight
/// list item's content, whose RAW runs straight into end-of-input with no
/// trailing terminator.
pub fn plain(state: &mut GrammarState) -> Option<NodeHandle> {
    if state.engine.at_eof() {
        return None;
    }
    let line = raw_line(&mut state.engine)?;
    skip_blank_lines(&mut state.engine);
    let head = super::inline::parse_inline_text(state, &line);
    state.alloc_list(Kind::Plain, head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse(source: &str) -> crate::driver::ParseOutput {
        crate::driver::parse(source.as_bytes(), Options::new())
    }

    #[test]
    fn atx_heading_level_from_hash_run() {
        let out = parse("# Title\n\npara\n");
        let root = out.root.unwrap();
        let children: Vec<_> = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert_eq!(children, vec![Kind::H1, Kind::Para]);
    }

    #[test]
    fn seven_hashes_is_h6_with_literal_hash_text() {
        let out = parse("#######\n");
        let root = out.root.unwrap();
        let h6 = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(h6).kind, Kind::H6);
        let content = crate::ast::children(&out.arena, out.arena.get(h6).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(content).kind, Kind::Str);
        assert_eq!(out.arena.get(content).text, "#");
    }

    #[test]
    fn empty_input_yields_empty_list() {
        let out = parse("");
        let root = out.root.unwrap();
        assert_eq!(out.arena.get(root).kind, Kind::List);
        assert!(out.arena.get(root).first_child.is_none());
    }

    #[test]
    fn blank_lines_only_yields_empty_list() {
        let out = parse("\n\n   \n\n");
        let root = out.root.unwrap();
        assert!(out.arena.get(root).first_child.is_none());
    }

    #[test]
    fn style_block_is_kept_by_default() {
        let out = parse("<style>\np { color: red; }\n</style>\n");
        let root = out.root.unwrap();
        let first = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(first).kind, Kind::HtmlBlock);
    }

    #[test]
    fn filter_styles_strips_style_block_to_empty_list() {
        let out = crate::driver::parse(
            b"<style>\np { color: red; }\n</style>\n",
            Options::new().with_filter_styles(true),
        );
        let root = out.root.unwrap();
        let first = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let node = out.arena.get(first);
        assert_eq!(node.kind, Kind::List);
        assert!(node.first_child.is_none());
    }

    #[test]
    fn horizontal_rule_is_recognised() {
        let out = parse("---\n");
        let root = out.root.unwrap();
        let first = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(first).kind, Kind::Hrule);
    }

    #[test]
    fn tight_list_item_content_is_plain() {
        let out = parse("- one\n- two\n");
        let root = out.root.unwrap();
        let list = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(list).kind, Kind::BulletList);
        let item = crate::ast::children(&out.arena, out.arena.get(list).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(item).kind, Kind::ListItem);
        let content = out.arena.get(item).first_child.unwrap();
        assert_eq!(out.arena.get(content).kind, Kind::Plain);
    }

    #[test]
    fn tight_item_indented_continuation_has_no_control_byte() {
        let out = parse("- item\n    cont\n");
        let root = out.root.unwrap();
        let list = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let item = crate::ast::children(&out.arena, out.arena.get(list).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(item).kind, Kind::ListItem);

        let mut texts = Vec::new();
        for block in crate::ast::children(&out.arena, out.arena.get(item).first_child) {
            for inline in crate::ast::children(&out.arena, out.arena.get(block).first_child) {
                texts.push(out.arena.get(inline).text.clone());
            }
        }
        assert!(
            texts.iter().all(|t| !t.contains('\u{1}')),
            "continuation separator leaked into AST text: {texts:?}"
        );
        assert!(texts.iter().any(|t| t == "item"));
        assert!(texts.iter().any(|t| t == "cont"));
    }

    #[test]
    fn loose_list_item_content_is_para() {
        let out = parse("- one\n\n- two\n");
        let root = out.root.unwrap();
        let list = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(list).kind, Kind::BulletList);
        for item in crate::ast::children(&out.arena, out.arena.get(list).first_child) {
            assert_eq!(out.arena.get(item).kind, Kind::ListItem);
            let content = out.arena.get(item).first_child.unwrap();
            assert_eq!(out.arena.get(content).kind, Kind::Para);
        }
    }

    #[test]
    fn self_closing_html_block_does_not_swallow_rest_of_document() {
        let out = parse("<div/>\n\npara\n");
        let root = out.root.unwrap();
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert_eq!(kinds, vec![Kind::HtmlBlock, Kind::Para]);
    }
}
