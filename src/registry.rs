//! Reference and footnote registries, and the structural label match they are
//! built on (spec C6, §4.6, §4.7).

use crate::arena::{Arena, NodeHandle};
use crate::ast::Kind;
use crate::error::ParseError;

/// Sequence of REFERENCE nodes recorded during the References pass (spec
/// §4.8). Each entry's link payload is `{label, url, title}`; entries are
/// never removed, and `find` returns the first structural match in insertion
/// order (spec §9(c): duplicate-label behaviour is unspecified).
#[derive(Default)]
pub struct ReferenceRegistry {
    entries: Vec<NodeHandle>,
}

impl ReferenceRegistry {
    pub fn record(&mut self, reference_node: NodeHandle) {
        self.entries.push(reference_node);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeHandle> + '_ {
        self.entries.iter().copied()
    }

    /// First-match scan (spec §4.6) comparing `label` structurally (spec
    /// §4.7) against each recorded definition's label.
    pub fn find(
        &self,
        arena: &Arena,
        label: Option<NodeHandle>,
    ) -> Result<Option<NodeHandle>, ParseError> {
        for &reference_node in &self.entries {
            let payload = arena
                .get(reference_node)
                .link
                .as_ref()
                .expect("REFERENCE node without a link payload (spec §3 invariant)");
            if structural_eq(arena, label, payload.label)? {
                return Ok(Some(reference_node));
            }
        }
        Ok(None)
    }
}

/// Sequence of `(key, child-chain)` footnote definitions (spec §4.6).
#[derive(Default)]
pub struct NoteRegistry {
    entries: Vec<(String, Option<NodeHandle>)>,
}

impl NoteRegistry {
    pub fn record(&mut self, key: String, chain: Option<NodeHandle>) {
        self.entries.push((key, chain));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<NodeHandle>)> {
        self.entries.iter().map(|(k, c)| (k.as_str(), *c))
    }

    /// Simple string-keyed lookup; first match wins.
    pub fn find(&self, key: &str) -> Option<Option<NodeHandle>> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, chain)| *chain)
    }
}

/// Structural label match (spec §4.7): two inline chains are equal when
/// corresponding nodes match pairwise and both chains exhaust together.
///
/// LINK and IMAGE never compare equal (links inside labels are disallowed).
/// Any kind this table does not name is a fatal structural error, surfaced as
/// [`ParseError::UnknownKind`] rather than silently treated as unequal — per
/// spec §4.7, "the implementation must surface a fatal diagnostic."
pub fn structural_eq(
    arena: &Arena,
    a: Option<NodeHandle>,
    b: Option<NodeHandle>,
) -> Result<bool, ParseError> {
    match (a, b) {
        (None, None) => Ok(true),
        (Some(x), Some(y)) => {
            let nx = arena.get(x);
            let ny = arena.get(y);
            if nx.kind != ny.kind {
                return Ok(false);
            }
            let this_pair_eq = match nx.kind {
                Kind::Space
                | Kind::Linebreak
                | Kind::Ellipsis
                | Kind::Emdash
                | Kind::Endash
                | Kind::Apostrophe => true,
                Kind::Code | Kind::Str | Kind::Html => {
                    nx.text.eq_ignore_ascii_case(&ny.text)
                }
                Kind::Emph | Kind::Strong | Kind::List | Kind::SingleQuoted | Kind::DoubleQuoted => {
                    structural_eq(arena, nx.first_child, ny.first_child)?
                }
                Kind::Link | Kind::Image => false,
                other => return Err(ParseError::UnknownKind(other)),
            };
            if !this_pair_eq {
                return Ok(false);
            }
            structural_eq(arena, nx.next, ny.next)
        }
        // One chain exhausted before the other.
        _ => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::string;

    #[test]
    fn equal_str_chains_are_case_insensitive() {
        let mut arena = Arena::new(None);
        let a = string(&mut arena, Kind::Str, "Hello").unwrap();
        let b = string(&mut arena, Kind::Str, "HELLO").unwrap();
        assert!(structural_eq(&arena, Some(a), Some(b)).unwrap());
    }

    #[test]
    fn links_never_match() {
        let mut arena = Arena::new(None);
        let a = crate::ast::link(&mut arena, Kind::Link, None, "u".into(), "t".into()).unwrap();
        let b = crate::ast::link(&mut arena, Kind::Link, None, "u".into(), "t".into()).unwrap();
        assert!(!structural_eq(&arena, Some(a), Some(b)).unwrap());
    }

    #[test]
    fn chains_must_exhaust_together() {
        let mut arena = Arena::new(None);
        let a1 = string(&mut arena, Kind::Str, "a").unwrap();
        let b1 = string(&mut arena, Kind::Str, "a").unwrap();
        let b2 = string(&mut arena, Kind::Str, "b").unwrap();
        arena.get_mut(b1).next = Some(b2);
        assert!(!structural_eq(&arena, Some(a1), Some(b1)).unwrap());
    }

    #[test]
    fn unhandled_kind_is_fatal() {
        let mut arena = Arena::new(None);
        let a = crate::ast::elem(&mut arena, Kind::Note).unwrap();
        let b = crate::ast::elem(&mut arena, Kind::Note).unwrap();
        assert!(matches!(
            structural_eq(&arena, Some(a), Some(b)),
            Err(ParseError::UnknownKind(Kind::Note))
        ));
    }
}
