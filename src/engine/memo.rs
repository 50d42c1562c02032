//! Packrat memoization table (spec §4.4).
//!
//! Failure is memoized alongside success — without it, the mutually recursive
//! inline rules (Emphasis, Strong, Strike) regress to exponential time on
//! pathological input (spec §9).

use crate::arena::NodeHandle;
use std::collections::HashMap;

/// Identifies a memoized grammar rule. Only rules that are recursive or
/// revisited at the same cursor across backtracking need an entry here;
/// straight-line productions are cheap enough to re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleId {
    StarEmphasis,
    UlEmphasis,
    StarStrong,
    UlStrong,
    Strike,
}

#[derive(Debug, Clone, Copy)]
pub enum MemoEntry {
    Success {
        end_cursor: usize,
        result: Option<NodeHandle>,
    },
    Failure,
}

#[derive(Default, Clone)]
pub struct MemoTable {
    entries: HashMap<(RuleId, usize), MemoEntry>,
}

impl MemoTable {
    pub fn get(&self, rule: RuleId, cursor: usize) -> Option<MemoEntry> {
        self.entries.get(&(rule, cursor)).copied()
    }

    pub fn insert(&mut self, rule: RuleId, cursor: usize, entry: MemoEntry) {
        self.entries.insert((rule, cursor), entry);
    }

    /// Discards all memoized state. Called by the driver (spec §4.4 `commit`)
    /// after each of the three top-level passes so the table does not grow
    /// across passes.
    pub fn commit(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
