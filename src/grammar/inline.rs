//! Inline grammar (spec §4.5): reparses the RAW text of block leaves into
//! spans — emphasis, strong, strikethrough, code, links, images, autolinks,
//! entities, escapes, footnote references, and smart punctuation.

use super::{blank_line_lookahead, sp, GrammarState};
use crate::arena::NodeHandle;
use crate::ast::Kind;
use crate::buffer::Buffer;
use crate::engine::{Engine, RuleId};
use regex::Regex;
use std::sync::OnceLock;

const ESCAPABLE: &[u8] = b"-`|*_{}[]()#+.!><\\";

/// `scheme://`: a letter, then letters/digits/`+-.`, then `://` (spec §4.5
/// "`<scheme://…>`"). Precompiled once, mirroring the teacher's
/// `link/extract.rs` idiom of a handful of fixed patterns scanned with
/// `regex` rather than hand-rolled character-class loops for link syntax.
fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap())
}

/// Reparses `text` as a sequence of inlines (spec §9 "Recursive reparse"),
/// returning the cons-list head exactly as [`inlines`] built it — callers
/// pass this straight to `alloc_list`, which reverses it into source order.
pub(crate) fn parse_inline_text(state: &mut GrammarState, text: &str) -> Option<NodeHandle> {
    let bytes: Vec<u8> = text.as_bytes().to_vec();
    state.reparse(bytes, inlines)
}

/// Like [`parse_inline_text`] but returns the chain already in source order,
/// for use as a LINK/IMAGE/REFERENCE label payload (spec §3: `label` is
/// "already source-ordered", unlike a node's lazily-reversed `first_child`).
pub(crate) fn parse_label(state: &mut GrammarState, text: &str) -> Option<NodeHandle> {
    let head = parse_inline_text(state, text);
    state.reverse_chain(head)
}

pub(crate) fn inlines(state: &mut GrammarState) -> Option<NodeHandle> {
    let mut head = None;
    loop {
        if state.engine.at_eof() {
            break;
        }
        if state.check_cancelled() {
            break;
        }
        match inline(state) {
            Some(node) => head = state.cons(node, head),
            None => break,
        }
    }
    head
}

/// `Inline`: ordered choice over every inline production. Strong is tried
/// before Emphasis so `**bold**` commits to STRONG rather than nested EMPH
/// (spec §4.5).
pub(crate) fn inline(state: &mut GrammarState) -> Option<NodeHandle> {
    if state.options.strike {
        if let Some(n) = strikethrough(state) {
            return Some(n);
        }
    }
    strong(state)
        .or_else(|| emphasis(state))
        .or_else(|| code_span(state))
        .or_else(|| link_or_image(state))
        .or_else(|| autolink(state))
        .or_else(|| {
            if state.options.notes {
                footnote_ref(state)
            } else {
                None
            }
        })
        .or_else(|| entity(state))
        .or_else(|| escape(state))
        .or_else(|| {
            if state.options.smart {
                super::smart::smart_punctuation(state)
            } else {
                None
            }
        })
        .or_else(|| endline_or_space(state))
        .or_else(|| str_or_symbol(state))
}

/// Parses a balanced `[ ... ]` span (escaped brackets and nested `[...]`
/// don't close it early) and returns its interior text, leaving the cursor
/// just past the closing `]`. Used for link/image labels, reference
/// definitions, and footnote keys.
pub(crate) fn bracketed_text(engine: &mut Engine) -> Option<String> {
    let start = engine.cursor;
    if !engine.literal(b"[") {
        return None;
    }
    let content_start = engine.cursor;
    let mut depth = 1i32;
    loop {
        match engine.peek() {
            None => {
                engine.cursor = start;
                return None;
            }
            Some(b'\\') => {
                engine.any();
                engine.any();
            }
            Some(b'[') => {
                depth += 1;
                engine.any();
            }
            Some(b']') => {
                depth -= 1;
                if depth == 0 {
                    let content_end = engine.cursor;
                    let text = engine.buffer.substring(content_start, content_end);
                    engine.any();
                    return Some(text);
                }
                engine.any();
            }
            _ => {
                engine.any();
            }
        }
    }
}

fn delimiter_run(
    state: &mut GrammarState,
    marker: &'static [u8],
    kind: Kind,
    rule: RuleId,
) -> Option<NodeHandle> {
    state.memoize(rule, |state| {
        let start = state.engine.cursor;
        if !state.engine.literal(marker) {
            return None;
        }
        if matches!(
            state.engine.peek(),
            Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | None
        ) {
            state.engine.cursor = start;
            return None;
        }
        let mut head = None;
        loop {
            if state.engine.literal(marker) {
                return state.alloc_list(kind, head);
            }
            if state.engine.at_eof() || blank_line_lookahead(&mut state.engine) {
                state.engine.cursor = start;
                return None;
            }
            match inline(state) {
                Some(n) => head = state.cons(n, head),
                None => {
                    state.engine.cursor = start;
                    return None;
                }
            }
        }
    })
}

pub(crate) fn strong(state: &mut GrammarState) -> Option<NodeHandle> {
    delimiter_run(state, b"**", Kind::Strong, RuleId::StarStrong)
        .or_else(|| delimiter_run(state, b"__", Kind::Strong, RuleId::UlStrong))
}

pub(crate) fn emphasis(state: &mut GrammarState) -> Option<NodeHandle> {
    delimiter_run(state, b"*", Kind::Emph, RuleId::StarEmphasis)
        .or_else(|| delimiter_run(state, b"_", Kind::Emph, RuleId::UlEmphasis))
}

pub(crate) fn strikethrough(state: &mut GrammarState) -> Option<NodeHandle> {
    delimiter_run(state, b"~~", Kind::Strike, RuleId::Strike)
}

/// `Code`: backtick runs of length 1–5; opening and closing counts must
/// match; a leading/trailing single space is trimmed; a blank line inside
/// terminates the span (spec §4.5).
pub(crate) fn code_span(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    let mut ticks = 0;
    while state.engine.literal(b"`") {
        ticks += 1;
    }
    if ticks == 0 || ticks > 5 {
        state.engine.cursor = start;
        return None;
    }
    let content_start = state.engine.cursor;
    loop {
        if state.engine.at_eof() {
            state.engine.cursor = start;
            return None;
        }
        if blank_line_lookahead(&mut state.engine) {
            state.engine.cursor = start;
            return None;
        }
        let close_pos = state.engine.cursor;
        let mut close_ticks = 0;
        while state.engine.literal(b"`") {
            close_ticks += 1;
        }
        if close_ticks == ticks {
            let raw = state.engine.buffer.substring(content_start, close_pos);
            let trimmed = raw.trim_matches([' ', '\t']).replace('\n', " ");
            return state.alloc_string(Kind::Code, trimmed);
        }
        state.engine.cursor = close_pos;
        state.engine.any();
    }
}

/// `Escape`: `\` followed by one of the documented punctuation bytes.
pub(crate) fn escape(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !state.engine.literal(b"\\") {
        return None;
    }
    match state.engine.peek() {
        Some(b) if ESCAPABLE.contains(&b) => {
            state.engine.any();
            state.alloc_string(Kind::Str, (b as char).to_string())
        }
        _ => {
            state.engine.cursor = start;
            None
        }
    }
}

/// `Entity`: hex, decimal, or named entities, captured verbatim and tagged
/// HTML. Implements the documented-correct `DecEntity = '&' '#' [0-9]+ ';'`
/// rule rather than the original grammar's stray-`>` capture bug (spec
/// §9(b)).
pub(crate) fn entity(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !state.engine.literal(b"&") {
        return None;
    }
    let ok = if state.engine.literal(b"#") {
        if state.engine.literal(b"x") || state.engine.literal(b"X") {
            let mut n = 0;
            while state.engine.class(|b| b.is_ascii_hexdigit()) {
                n += 1;
            }
            n > 0 && state.engine.literal(b";")
        } else {
            let mut n = 0;
            while state.engine.class(|b| b.is_ascii_digit()) {
                n += 1;
            }
            n > 0 && state.engine.literal(b";")
        }
    } else {
        let mut n = 0;
        while state.engine.class(|b| b.is_ascii_alphanumeric()) {
            n += 1;
        }
        n > 0 && state.engine.literal(b";")
    };
    if !ok {
        state.engine.cursor = start;
        return None;
    }
    let text = state.engine.text_since(start);
    state.alloc_string(Kind::Html, text)
}

/// `Autolink`: `<scheme://...>` or `<addr@host>`, the latter prepending
/// `mailto:` to the URL.
pub(crate) fn autolink(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !state.engine.literal(b"<") {
        return None;
    }
    let content_start = state.engine.cursor;
    while !state.engine.at_eof()
        && !matches!(
            state.engine.peek(),
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
        )
    {
        state.engine.any();
    }
    let content = state.engine.buffer.substring(content_start, state.engine.cursor);
    if !state.engine.literal(b">") || content.is_empty() {
        state.engine.cursor = start;
        return None;
    }
    let url = if scheme_re().is_match(&content) {
        content.clone()
    } else if content.contains('@') {
        format!("mailto:{content}")
    } else {
        state.engine.cursor = start;
        return None;
    };
    let label = state.alloc_string(Kind::Str, content)?;
    state.alloc_link(Kind::Link, Some(label), url, String::new())
}

/// `Link`/`Image`: explicit `[label](url "title")`, reference `[label][id]`
/// or `[label][]`, each optionally preceded by `!` for an image. A
/// reference miss reconstructs the literal bracketed source text (spec
/// §4.5); an image miss prepends `!` to that reconstruction.
pub(crate) fn link_or_image(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    let is_image = state.engine.literal(b"!");
    let label_text = match bracketed_text(&mut state.engine) {
        Some(t) => t,
        None => {
            state.engine.cursor = start;
            return None;
        }
    };
    let label_handle = parse_label(state, &label_text);

    if state.engine.literal(b"(") {
        while sp(&mut state.engine) {}
        let url_start = state.engine.cursor;
        if state.engine.literal(b"<") {
            while !matches!(state.engine.peek(), Some(b'>') | None) {
                state.engine.any();
            }
            state.engine.literal(b">");
        } else {
            let mut depth = 0i32;
            loop {
                match state.engine.peek() {
                    Some(b'(') => {
                        depth += 1;
                        state.engine.any();
                    }
                    Some(b')') if depth == 0 => break,
                    Some(b')') => {
                        depth -= 1;
                        state.engine.any();
                    }
                    Some(b' ') | Some(b'\t') | None => break,
                    _ => {
                        state.engine.any();
                    }
                }
            }
        }
        let raw_url = state.engine.buffer.substring(url_start, state.engine.cursor);
        let url = raw_url.trim_start_matches('<').trim_end_matches('>').to_string();
        while sp(&mut state.engine) {}
        let mut title = String::new();
        if state.engine.literal(b"\"") {
            let t_start = state.engine.cursor;
            while !matches!(state.engine.peek(), Some(b'"') | None) {
                state.engine.any();
            }
            title = state.engine.buffer.substring(t_start, state.engine.cursor);
            state.engine.literal(b"\"");
        } else if state.engine.literal(b"'") {
            let t_start = state.engine.cursor;
            while !matches!(state.engine.peek(), Some(b'\'') | None) {
                state.engine.any();
            }
            title = state.engine.buffer.substring(t_start, state.engine.cursor);
            state.engine.literal(b"'");
        }
        while sp(&mut state.engine) {}
        if !state.engine.literal(b")") {
            state.engine.cursor = start;
            return None;
        }
        let kind = if is_image { Kind::Image } else { Kind::Link };
        return state.alloc_link(kind, label_handle, url, title);
    }

    let ref_start = state.engine.cursor;
    let id_text = if state.engine.literal(b"[") {
        let id_start = state.engine.cursor;
        while !matches!(state.engine.peek(), Some(b']') | None) {
            state.engine.any();
        }
        let id = state.engine.buffer.substring(id_start, state.engine.cursor);
        state.engine.literal(b"]");
        Some(id)
    } else {
        None
    };

    let lookup_label = match &id_text {
        Some(id) if !id.is_empty() => parse_label(state, id),
        _ => label_handle,
    };

    match state.references.find(&state.arena, lookup_label) {
        Ok(Some(reference_node)) => {
            let payload = state.arena.get(reference_node).link.clone().unwrap();
            let kind = if is_image { Kind::Image } else { Kind::Link };
            state.alloc_link(kind, label_handle, payload.url, payload.title)
        }
        Ok(None) => {
            state.engine.cursor = ref_start;
            let bang = if is_image { "!" } else { "" };
            state.alloc_string(Kind::Str, format!("{bang}[{label_text}]"))
        }
        Err(e) => {
            state.fatal = Some(e);
            None
        }
    }
}

/// `NoteRef`/`InlineNote`: `[^key]` looks up a Notes-pass definition and
/// clones its children; `^[...]` is an inline note parsed on the spot. Both
/// gated by `Options::notes`.
pub(crate) fn footnote_ref(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if state.engine.literal(b"^") {
        match bracketed_text(&mut state.engine) {
            Some(text) => {
                let head = parse_inline_text(state, &text);
                return state.alloc_list(Kind::Note, head);
            }
            None => {
                state.engine.cursor = start;
                return None;
            }
        }
    }
    if state.engine.literal(b"[^") {
        let key_start = state.engine.cursor;
        while !matches!(state.engine.peek(), Some(b']') | None) {
            state.engine.any();
        }
        let key = state.engine.buffer.substring(key_start, state.engine.cursor);
        if !state.engine.literal(b"]") {
            state.engine.cursor = start;
            return None;
        }
        return match state.notes.find(&key) {
            Some(chain) => {
                let cloned = clone_chain(state, chain);
                state.alloc_list(Kind::Note, cloned)
            }
            None => state.alloc_string(Kind::Str, format!("[^{key}]")),
        };
    }
    state.engine.cursor = start;
    None
}

/// Deep-copies a child chain (and its subtrees) into freshly allocated
/// nodes, in source order. Footnote references (spec §4.5: "children cloned
/// from the matching definition") must not link multiple tree positions to
/// the same arena node.
fn clone_chain(state: &mut GrammarState, head: Option<NodeHandle>) -> Option<NodeHandle> {
    let mut items = Vec::new();
    let mut cur = head;
    while let Some(h) = cur {
        items.push(h);
        cur = state.arena.get(h).next;
    }
    let mut new_head = None;
    for &h in items.iter().rev() {
        let kind = state.arena.get(h).kind;
        let text = state.arena.get(h).text.clone();
        let link = state.arena.get(h).link.clone();
        let child = state.arena.get(h).first_child;
        let cloned_child = clone_chain(state, child);
        let new_handle = state.alloc_elem(kind)?;
        {
            let node = state.arena.get_mut(new_handle);
            node.text = text;
            node.link = link;
            node.first_child = cloned_child;
        }
        new_head = state.cons(new_handle, new_head);
    }
    new_head
}

/// `Endline`: a line break within a paragraph. Two or more trailing spaces
/// before the terminator make it a hard LINEBREAK; otherwise it's a SPACE.
pub(crate) fn endline_or_space(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if matches!(state.engine.peek(), Some(b' ')) {
        let mut n = 0;
        while state.engine.literal(b" ") {
            n += 1;
        }
        if matches!(state.engine.peek(), Some(b'\n') | Some(b'\r')) {
            super::newline(&mut state.engine);
            let kind = if n >= 2 { Kind::Linebreak } else { Kind::Space };
            return state.alloc_elem(kind);
        }
        return state.alloc_elem(Kind::Space);
    }
    if matches!(state.engine.peek(), Some(b'\t')) {
        while state.engine.literal(b"\t") {}
        return state.alloc_elem(Kind::Space);
    }
    if matches!(state.engine.peek(), Some(b'\n') | Some(b'\r')) {
        super::newline(&mut state.engine);
        return state.alloc_elem(Kind::Space);
    }
    state.engine.cursor = start;
    None
}

/// `Str`/`Symbol`: the catch-all. A run of `Alphanumeric` bytes (spec §4.3,
/// which counts 0x80..=0xFF as alphanumeric) becomes one STR node; failing
/// that, a single arbitrary byte becomes a one-byte STR so the grammar never
/// gets stuck.
pub(crate) fn str_or_symbol(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    let mut n = 0;
    while matches!(state.engine.peek(), Some(b) if Buffer::is_alphanumeric(b)) {
        state.engine.any();
        n += 1;
    }
    if n > 0 {
        let text = state.engine.text_since(start);
        return state.alloc_string(Kind::Str, text);
    }
    if state.engine.any() {
        let text = state.engine.text_since(start);
        state.alloc_string(Kind::Str, text)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse(source: &str) -> crate::driver::ParseOutput {
        crate::driver::parse(source.as_bytes(), Options::new())
    }

    #[test]
    fn hello_world_is_str_space_str() {
        let out = parse("hello world\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert_eq!(kinds, vec![Kind::Str, Kind::Space, Kind::Str]);
    }

    #[test]
    fn emphasis_and_strong_parse() {
        let out = parse("*em* **st**\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert_eq!(kinds, vec![Kind::Emph, Kind::Space, Kind::Strong]);
    }

    #[test]
    fn code_span_trims_surrounding_space() {
        let out = parse("`code`\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let code = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(code).kind, Kind::Code);
        assert_eq!(out.arena.get(code).text, "code");
    }

    #[test]
    fn escape_produces_literal_char() {
        let out = parse("\\*x\\*\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let first = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(first).kind, Kind::Str);
        assert_eq!(out.arena.get(first).text, "*");
    }

    #[test]
    fn autolink_recognises_uri_scheme() {
        let out = parse("<http://example.com>\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let link = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(link).kind, Kind::Link);
        assert_eq!(
            out.arena.get(link).link.as_ref().unwrap().url,
            "http://example.com"
        );
    }

    #[test]
    fn autolink_email_gets_mailto_prefix() {
        let out = parse("<a@b.com>\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let link = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(link).kind, Kind::Link);
        assert_eq!(
            out.arena.get(link).link.as_ref().unwrap().url,
            "mailto:a@b.com"
        );
    }
}
