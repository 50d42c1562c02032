//! The Markdown grammar and its semantic actions (spec C5 / §4.5).
//!
//! Two layers: [`block`] partitions lines into paragraphs, headings, lists,
//! blockquotes, verbatims, references, and HTML blocks; [`inline`] reparses
//! the RAW text of block leaves into spans. [`GrammarState`] is the single
//! state record (spec §9: "express it as a single state record... do not use
//! process-wide mutable singletons") threaded through every semantic action.

pub mod block;
pub mod dlist;
pub mod html_tags;
pub mod inline;
pub mod smart;

use crate::arena::{Arena, NodeHandle};
use crate::ast::{self, Kind};
use crate::buffer::Buffer;
use crate::engine::{Engine, MemoEntry, RuleId};
use crate::error::ParseError;
use crate::options::Options;
use crate::registry::{NoteRegistry, ReferenceRegistry};

/// Everything a semantic action needs: the recognizer (cursor, memo table),
/// the arena nodes are allocated from, the registries populated across passes,
/// the immutable extension flags, and the fatal-error side channel (spec §7)
/// a `None` return from an otherwise-infallible grammar rule can't otherwise
/// carry.
pub struct GrammarState {
    pub engine: Engine,
    pub arena: Arena,
    pub references: ReferenceRegistry,
    pub notes: NoteRegistry,
    pub options: Options,
    pub fatal: Option<ParseError>,
    cancel: Box<dyn FnMut() -> bool>,
}

impl GrammarState {
    pub fn new(
        source: impl Into<std::rc::Rc<[u8]>>,
        options: Options,
        cancel: Box<dyn FnMut() -> bool>,
    ) -> Self {
        GrammarState {
            engine: Engine::new(Buffer::new(source)),
            arena: Arena::new(options.max_nodes),
            references: ReferenceRegistry::default(),
            notes: NoteRegistry::default(),
            options,
            fatal: None,
            cancel,
        }
    }

    /// Reset the cursor and the memo table for the next pass (spec §4.4
    /// `commit`); the arena and both registries persist across passes.
    pub fn begin_pass(&mut self, source: impl Into<std::rc::Rc<[u8]>>) {
        self.engine = Engine::new(Buffer::new(source));
    }

    /// Build a nested state over owned, possibly-synthesised bytes (spec §9
    /// "Recursive reparse") sharing this state's arena and registries but
    /// starting with a fresh cursor and memo table. Used for LISTITEM and
    /// BLOCKQUOTE RAW text, which is sometimes not a literal substring of the
    /// outer source (loose-list `"\n\n"` append; a tight item's `0x01`
    /// continuation separator, spec §4.5, is translated to a real `\n` by
    /// `block::build_list_item` before it ever reaches here, since neither
    /// the block nor inline grammar has a production that recognizes
    /// `0x01`).
    pub fn reparse<T>(
        &mut self,
        text: impl Into<std::rc::Rc<[u8]>>,
        f: impl FnOnce(&mut GrammarState) -> T,
    ) -> T {
        let saved_engine = std::mem::replace(&mut self.engine, Engine::new(Buffer::new(text)));
        let result = f(self);
        self.engine = saved_engine;
        result
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal.is_some()
    }

    /// Cooperative cancellation check (spec §5): call at rule entry points
    /// that recur on every byte of input (the block and inline dispatch
    /// loops), not inside every primitive combinator.
    pub fn check_cancelled(&mut self) -> bool {
        if self.fatal.is_some() {
            return true;
        }
        if (self.cancel)() {
            self.fatal = Some(ParseError::Cancelled(self.engine.cursor));
            true
        } else {
            false
        }
    }

    /// Packrat memoization (spec §4.4): caches both success and failure at
    /// `(rule, cursor)`.
    pub fn memoize(
        &mut self,
        rule: RuleId,
        f: impl FnOnce(&mut Self) -> Option<NodeHandle>,
    ) -> Option<NodeHandle> {
        let start = self.engine.cursor;
        if let Some(entry) = self.engine.memo.get(rule, start) {
            return match entry {
                MemoEntry::Success { end_cursor, result } => {
                    self.engine.cursor = end_cursor;
                    result
                }
                MemoEntry::Failure => None,
            };
        }

        let result = f(self);
        match result {
            Some(_) => {
                let end_cursor = self.engine.cursor;
                self.engine
                    .memo
                    .insert(rule, start, MemoEntry::Success { end_cursor, result });
            }
            None => {
                self.engine.cursor = start;
                self.engine.memo.insert(rule, start, MemoEntry::Failure);
            }
        }
        result
    }

    fn record_fatal<T>(&mut self, result: Result<T, ParseError>) -> Option<T> {
        match result {
            Ok(v) => Some(v),
            Err(e) => {
                self.fatal = Some(e);
                None
            }
        }
    }

    pub fn alloc_elem(&mut self, kind: Kind) -> Option<NodeHandle> {
        let r = ast::elem(&mut self.arena, kind);
        self.record_fatal(r)
    }

    pub fn alloc_string(&mut self, kind: Kind, text: impl Into<String>) -> Option<NodeHandle> {
        let r = ast::string(&mut self.arena, kind, text);
        self.record_fatal(r)
    }

    pub fn alloc_list(&mut self, kind: Kind, head: Option<NodeHandle>) -> Option<NodeHandle> {
        let r = ast::make_list(&mut self.arena, kind, head);
        self.record_fatal(r)
    }

    pub fn alloc_string_from_list(
        &mut self,
        head: Option<NodeHandle>,
        trailing_newline: bool,
    ) -> Option<NodeHandle> {
        let r = ast::string_from_list(&mut self.arena, head, trailing_newline);
        self.record_fatal(r)
    }

    pub fn alloc_link(
        &mut self,
        kind: Kind,
        label_chain: Option<NodeHandle>,
        url: String,
        title: String,
    ) -> Option<NodeHandle> {
        let r = ast::link(&mut self.arena, kind, label_chain, url, title);
        self.record_fatal(r)
    }

    pub fn cons(&mut self, new: NodeHandle, list: Option<NodeHandle>) -> Option<NodeHandle> {
        ast::cons(&mut self.arena, new, list)
    }

    /// Recover source order on a cons-list built head-first outside of an
    /// `alloc_list` call — used for LINK/IMAGE/REFERENCE label chains, which
    /// are stored already source-ordered (spec §3) rather than reversed
    /// lazily the way a node's `first_child` chain is.
    pub fn reverse_chain(&mut self, head: Option<NodeHandle>) -> Option<NodeHandle> {
        ast::reverse(&mut self.arena, head)
    }
}

/// `Newline`: `\r\n`, `\n`, or `\r` (spec §6.3).
pub(crate) fn newline(engine: &mut Engine) -> bool {
    engine.literal(b"\r\n") || engine.literal(b"\n") || engine.literal(b"\r")
}

/// `Sp`: one space or tab.
pub(crate) fn sp(engine: &mut Engine) -> bool {
    engine.class(|b| b == b' ' || b == b'\t')
}

/// A line containing only spaces/tabs and then a line terminator (or EOF).
/// Matches zero-width at end of input, like `!.` in the rest of the grammar
/// — callers looping on this must stop on zero progress, not just on a
/// `false` return, or they'd spin forever once the cursor reaches EOF.
pub(crate) fn blank_line(engine: &mut Engine) -> bool {
    engine.attempt(|e| {
        while sp(e) {}
        newline(e) || e.at_eof()
    })
}

/// Repeats [`blank_line`] until it either fails or stops advancing the
/// cursor (the EOF case), returning how many real blank lines were consumed.
pub(crate) fn count_blank_lines(engine: &mut Engine) -> u32 {
    let mut n = 0;
    loop {
        let before = engine.cursor;
        if !blank_line(engine) || engine.cursor == before {
            break;
        }
        n += 1;
    }
    n
}

pub(crate) fn skip_blank_lines(engine: &mut Engine) {
    count_blank_lines(engine);
}

/// Non-consuming-on-failure check for whether a blank line starts here.
pub(crate) fn blank_line_lookahead(engine: &mut Engine) -> bool {
    engine.lookahead_positive(blank_line)
}

/// `Indent`: four spaces or one tab (spec §6.3 — tabs are indent markers
/// equivalent to four spaces only here, nowhere else).
pub(crate) fn indent(engine: &mut Engine) -> bool {
    engine.literal(b"    ") || engine.literal(b"\t")
}

/// `NonindentSpace`: zero to three leading spaces.
pub(crate) fn nonindent_space(engine: &mut Engine) {
    let mut n = 0;
    while n < 3 && engine.literal(b" ") {
        n += 1;
    }
}

/// `RawLine`: everything up to and including the next line terminator (the
/// terminator itself is consumed but not included in the returned text);
/// `None` only at end of input.
pub(crate) fn raw_line(engine: &mut Engine) -> Option<String> {
    raw_line_terminated(engine).map(|(text, _)| text)
}

/// Like [`raw_line`], but also reports whether a real terminator was
/// consumed rather than the line simply running into end-of-input. Used by
/// `block::paragraph` to tell a genuine trailing paragraph boundary from a
/// tight list item's RAW, which never carries a terminator on its last line.
pub(crate) fn raw_line_terminated(engine: &mut Engine) -> Option<(String, bool)> {
    if engine.at_eof() {
        return None;
    }
    let start = engine.cursor;
    while !engine.at_eof() && !matches!(engine.peek(), Some(b'\n') | Some(b'\r')) {
        engine.any();
    }
    let text = engine.text_since(start);
    let terminated = newline(engine);
    Some((text, terminated))
}

/// `Doc`: parse a document as a list of blocks, producing the root LIST node
/// (spec §4.5 "Entry points").
pub fn doc(state: &mut GrammarState) -> Option<NodeHandle> {
    let head = block::blocks(state);
    state.alloc_list(Kind::List, head)
}

/// `Docblock`: parse a single block, used for the recursive reparse of RAW
/// text stashed in LISTITEM/BLOCKQUOTE nodes (spec §4.5, §9 "Recursive
/// reparse").
pub fn docblock(state: &mut GrammarState) -> Option<NodeHandle> {
    block::block(state)
}

/// `References`: parse the whole input, recording only reference definitions
/// into the registry; everything else is skipped with `SkipBlock` (spec
/// §4.5, §4.8 pass 1).
pub fn references_pass(state: &mut GrammarState) {
    while !state.engine.at_eof() {
        if state.check_cancelled() {
            return;
        }
        if block::reference_def(state, true).is_some() {
            continue;
        }
        if !block::skip_block(state) {
            break;
        }
    }
}

/// `Notes`: parse the whole input, recording only footnote definitions into
/// the registry (spec §4.5, §4.8 pass 2).
pub fn notes_pass(state: &mut GrammarState) {
    while !state.engine.at_eof() {
        if state.check_cancelled() {
            return;
        }
        if state.options.notes && block::footnote_def(state, true).is_some() {
            continue;
        }
        if !block::skip_block(state) {
            break;
        }
    }
}
