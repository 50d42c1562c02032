//! AST shape validation (spec §3 "Invariants"), mirroring the teacher's
//! `validate::Validate` trait — a node (or whole tree) reports every violation
//! it finds at once rather than stopping at the first one.

use crate::arena::{Arena, NodeHandle};
use crate::ast::{children, Kind};
use nonempty::NonEmpty;

/// A single shape violation, naming the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidNode {
    /// A LINK/IMAGE/REFERENCE node with no link payload (spec §3: "Kind-specific
    /// shape: LINK/IMAGE/REFERENCE MUST carry a link payload").
    MissingLinkPayload(NodeHandle),
}

/// Mirrors the teacher's `validate::Validate` trait: `Ok(())` or every
/// violation found, never just the first.
pub trait Validate {
    type ValidationError;
    fn validate(&self, arena: &Arena) -> Result<(), NonEmpty<Self::ValidationError>>;
}

impl Validate for NodeHandle {
    type ValidationError = InvalidNode;

    fn validate(&self, arena: &Arena) -> Result<(), NonEmpty<Self::ValidationError>> {
        let mut errors = Vec::new();
        collect(*self, arena, &mut errors);
        NonEmpty::from_vec(errors).map_or(Ok(()), Err)
    }
}

fn collect(handle: NodeHandle, arena: &Arena, errors: &mut Vec<InvalidNode>) {
    let node = arena.get(handle);
    if matches!(node.kind, Kind::Link | Kind::Image | Kind::Reference) && node.link.is_none() {
        errors.push(InvalidNode::MissingLinkPayload(handle));
    }
    for child in children(arena, node.first_child) {
        collect(child, arena, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    #[test]
    fn well_formed_tree_from_a_real_parse_validates() {
        let out = crate::driver::parse(b"see [a](http://x)\n", Options::new());
        let root = out.root.unwrap();
        assert!(root.validate(&out.arena).is_ok());
    }

    #[test]
    fn link_node_missing_payload_is_reported() {
        let mut arena = Arena::new(None);
        let bad_link = crate::ast::elem(&mut arena, Kind::Link).unwrap();
        let list = crate::ast::make_list(&mut arena, Kind::List, Some(bad_link)).unwrap();
        let errors = list.validate(&arena).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.first(), InvalidNode::MissingLinkPayload(_)));
    }
}
