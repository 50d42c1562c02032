//! The AST node and its closed kind set (spec §3, §6.1).

use crate::arena::NodeHandle;

/// The closed set of node kinds making up the stable wire vocabulary (spec §6.1).
///
/// H1..H6 are numerically contiguous: [`Kind::heading`] recovers `Hn` from a run
/// length the way `AtxStart` does in spec §4.5 ("kind is H1 + (run_length - 1)").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Kind {
    List,
    Raw,
    Space,
    Linebreak,
    Ellipsis,
    Emdash,
    Endash,
    Apostrophe,
    SingleQuoted,
    DoubleQuoted,
    Str,
    Link,
    Image,
    Code,
    Html,
    Emph,
    Strong,
    Strike,
    Plain,
    Para,
    ListItem,
    BulletList,
    OrderedList,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    BlockQuote,
    Verbatim,
    HtmlBlock,
    Hrule,
    Reference,
    Note,
    DefinitionList,
    DefTitle,
    DefData,
}

const HEADING_KINDS: [Kind; 6] = [
    Kind::H1,
    Kind::H2,
    Kind::H3,
    Kind::H4,
    Kind::H5,
    Kind::H6,
];

impl Kind {
    /// `level` is 1..=6. Panics on an out-of-range level; the grammar only ever
    /// calls this with a run length already clamped to 1..=6 (spec §4.5).
    pub fn heading(level: u8) -> Kind {
        HEADING_KINDS[(level - 1) as usize]
    }

    /// The inverse of [`Kind::heading`]: `Some(1..=6)` for H1..H6, else `None`.
    pub fn heading_level(self) -> Option<u8> {
        HEADING_KINDS
            .iter()
            .position(|k| *k == self)
            .map(|i| (i + 1) as u8)
    }

    pub fn is_heading(self) -> bool {
        self.heading_level().is_some()
    }
}

impl Default for Kind {
    /// `Raw` is the interior "awaiting reparse" marker (spec GLOSSARY); it is the
    /// natural zero value for a freshly bump-allocated, not-yet-constructed node.
    fn default() -> Self {
        Kind::Raw
    }
}

/// The `{label-node-list, url, title}` payload carried by LINK/IMAGE/REFERENCE
/// nodes (spec §3).
#[derive(Debug, Clone, Default)]
pub struct LinkPayload {
    /// Head of the label's already-source-ordered inline child chain.
    pub label: Option<NodeHandle>,
    pub url: String,
    pub title: String,
}

/// The sole AST entity (spec §3). Forms a tree via `first_child` and, at each
/// level, a forward singly linked sibling chain via `next`.
#[derive(Debug, Clone, Default)]
pub struct Node {
    pub kind: Kind,
    /// Inline text slot: used by STR, CODE, HTML, HTMLBLOCK, VERBATIM, RAW, and by
    /// STR nodes synthesised during list construction.
    pub text: String,
    pub link: Option<LinkPayload>,
    pub first_child: Option<NodeHandle>,
    pub next: Option<NodeHandle>,
}

impl Node {
    pub fn empty() -> Self {
        Node::default()
    }
}
