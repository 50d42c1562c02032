//! Error surfaces for the narrow internal-failure paths the grammar cannot absorb.
//!
//! Parsing itself is total (every prefix eventually falls through to `Plain`,
//! `RawLine`, or `Symbol`); a [`ParseError`] only ever comes from an invariant
//! violation, an imposed resource cap, or cooperative cancellation.

use crate::ast::Kind;

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("unknown node kind encountered during structural label match: {0:?}")]
    UnknownKind(Kind),

    #[error("arena exhausted: allocating node {attempted} exceeds the configured cap of {cap}")]
    ArenaExhausted { attempted: usize, cap: usize },

    #[error("parse cancelled at byte offset {0}")]
    Cancelled(usize),

    #[error("grammar engine did not advance at byte offset {0}")]
    EngineStalled(usize),
}
