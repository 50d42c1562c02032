//! Smart punctuation extension (spec §4.5, gated by `Options::smart`):
//! apostrophes, ellipses, em/en-dashes, and curly single/double quotes.

use super::{blank_line_lookahead, GrammarState};
use crate::arena::NodeHandle;
use crate::ast::Kind;
use crate::buffer::Buffer;

pub(crate) fn smart_punctuation(state: &mut GrammarState) -> Option<NodeHandle> {
    ellipsis(state)
        .or_else(|| em_dash(state))
        .or_else(|| en_dash(state))
        .or_else(|| double_quoted(state))
        .or_else(|| single_quoted(state))
        .or_else(|| apostrophe(state))
}

/// `...` or `. . .`.
fn ellipsis(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if state.engine.literal(b"...") || state.engine.literal(b". . .") {
        return state.alloc_elem(Kind::Ellipsis);
    }
    state.engine.cursor = start;
    None
}

/// `---` or `--`.
fn em_dash(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if state.engine.literal(b"---") || state.engine.literal(b"--") {
        return state.alloc_elem(Kind::Emdash);
    }
    state.engine.cursor = start;
    None
}

/// A `-` immediately following a digit.
fn en_dash(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    let preceded_by_digit = start > 0
        && state
            .engine
            .buffer
            .byte_at(start - 1)
            .is_some_and(|b| b.is_ascii_digit());
    if preceded_by_digit && state.engine.literal(b"-") {
        return state.alloc_elem(Kind::Endash);
    }
    state.engine.cursor = start;
    None
}

/// A bare `'` not opening a single-quoted run.
fn apostrophe(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if state.engine.literal(b"'") {
        return state.alloc_elem(Kind::Apostrophe);
    }
    state.engine.cursor = start;
    None
}

fn double_quoted(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !state.engine.literal(b"\"") {
        return None;
    }
    let mut head = None;
    loop {
        if state.engine.literal(b"\"") {
            return state.alloc_list(Kind::DoubleQuoted, head);
        }
        if state.engine.at_eof() || blank_line_lookahead(&mut state.engine) {
            state.engine.cursor = start;
            return None;
        }
        match super::inline::inline(state) {
            Some(n) => head = state.cons(n, head),
            None => {
                state.engine.cursor = start;
                return None;
            }
        }
    }
}

/// A `'...'` run; a closing `'` must NOT be immediately followed by another
/// alphanumeric byte, so a contraction like `don't` doesn't get swallowed as
/// an opening quote.
fn single_quoted(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;
    if !state.engine.literal(b"'") {
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
        let save = state.engine.cursor;
        if state.engine.literal(b"'") {
            if !matches!(state.engine.peek(), Some(b) if Buffer::is_alphanumeric(b)) {
                return state.alloc_list(Kind::SingleQuoted, head);
            }
            state.engine.cursor = save;
        }
        if state.engine.at_eof() || blank_line_lookahead(&mut state.engine) {
            state.engine.cursor = start;
            return None;
        }
        match super::inline::inline(state) {
            Some(n) => head = state.cons(n, head),
            None => {
                state.engine.cursor = start;
                return None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse(source: &str) -> crate::driver::ParseOutput {
        crate::driver::parse(source.as_bytes(), Options::new().with_smart(true))
    }

    #[test]
    fn ellipsis_is_recognised() {
        let out = parse("wait...\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert!(kinds.contains(&Kind::Ellipsis));
    }

    #[test]
    fn em_dash_is_recognised() {
        let out = parse("a---b\n");
        let root = out.root.unwrap();
        let para = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert!(kinds.contains(&Kind::Emdash));
    }
}
