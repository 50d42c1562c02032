//! Three-pass driver (spec C7 / §4.8): References, then Notes, then
//! Document, all sharing one arena and both registries.

use crate::arena::{Arena, NodeHandle};
use crate::error::ParseError;
use crate::grammar::{self, GrammarState};
use crate::options::Options;
use crate::registry::{NoteRegistry, ReferenceRegistry};
use std::rc::Rc;

/// Everything the caller gets back from a completed parse (spec §6.2): the
/// arena the tree lives in, the root node, and both registries. `root` is
/// `None` only when the Document pass's own top-level LIST allocation hit an
/// imposed arena cap (spec §7.1) — the only way this otherwise-total
/// function can fail to produce a tree; check `error` in that case.
pub struct ParseOutput {
    pub arena: Arena,
    pub root: Option<NodeHandle>,
    pub references: ReferenceRegistry,
    pub notes: NoteRegistry,
    pub error: Option<ParseError>,
}

/// `parse(source, options) -> {root, references, notes}` (spec §6.2): total
/// function, always returns a root unless a resource cap was configured and
/// hit.
pub fn parse(source: &[u8], options: Options) -> ParseOutput {
    parse_cancellable(source, options, || false)
}

/// Same as [`parse`], but `cancel` is polled cooperatively at block/inline
/// dispatch loop entry points (spec §5, §7.2). A cancelled parse still
/// returns whatever partial tree the Document pass had built so far, with
/// `error` set to [`ParseError::Cancelled`].
pub fn parse_cancellable(
    source: &[u8],
    options: Options,
    mut cancel: impl FnMut() -> bool,
) -> ParseOutput {
    // Guarantee the outer buffer ends with a real blank line, so a trailing
    // paragraph with no final newline still gets a genuine boundary to stop
    // at (spec §4.5 `Paragraph`) instead of being mistaken for a tight list
    // item's unterminated RAW. Nested reparses (list items, blockquotes)
    // build their own RAW separately and aren't affected by this padding.
    let mut padded = source.to_vec();
    if !padded.ends_with(b"\n\n") {
        padded.extend_from_slice(b"\n\n");
    }
    let source: Rc<[u8]> = Rc::from(padded);
    let mut state = GrammarState::new(source.clone(), options, Box::new(move || cancel()));

    grammar::references_pass(&mut state);
    state.engine.memo.commit();
    state.begin_pass(source.clone());

    if state.options.notes {
        grammar::notes_pass(&mut state);
        state.engine.memo.commit();
        state.begin_pass(source.clone());
    }

    let root = grammar::doc(&mut state);
    let error = state.fatal.take();

    ParseOutput {
        arena: state.arena,
        root,
        references: state.references,
        notes: state.notes,
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{children, Kind};

    #[test]
    fn empty_input_yields_list_root() {
        let out = parse(b"", Options::new());
        let root = out.root.expect("total parse always yields a root");
        assert_eq!(out.arena.get(root).kind, Kind::List);
        assert!(out.arena.get(root).first_child.is_none());
        assert!(out.error.is_none());
    }

    #[test]
    fn reference_is_resolved_across_passes() {
        let out = parse(b"[a]: http://x \"t\"\n\nsee [a]\n", Options::new());
        assert_eq!(out.references.len(), 1);
        let root = out.root.unwrap();
        let para = children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let link = children(&out.arena, out.arena.get(para).first_child)
            .nth(2)
            .unwrap();
        assert_eq!(out.arena.get(link).kind, Kind::Link);
        let payload = out.arena.get(link).link.as_ref().unwrap();
        assert_eq!(payload.url, "http://x");
        assert_eq!(payload.title, "t");
    }

    #[test]
    fn unresolved_reference_falls_back_to_literal_text() {
        let out = parse(b"see [nope]\n", Options::new());
        let root = out.root.unwrap();
        let para = children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert!(kinds.iter().all(|k| *k != Kind::Link));
    }

    #[test]
    fn footnote_is_resolved_across_passes() {
        let out = parse(b"x[^1]\n\n[^1]: note\n", Options::new().with_notes(true));
        assert_eq!(out.notes.len(), 1);
        let root = out.root.unwrap();
        let para = children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        let kinds: Vec<_> = children(&out.arena, out.arena.get(para).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert!(kinds.contains(&Kind::Note));
    }

    #[test]
    fn arena_cap_surfaces_as_error() {
        let out = parse(
            b"one two three four five\n",
            Options::new().with_max_nodes(Some(1)),
        );
        assert!(out.error.is_some());
    }
}
