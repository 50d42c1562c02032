//! Cons-list construction and the node constructors built on top of it
//! (spec §4.2).
//!
//! Semantic actions build child chains head-first with [`cons`]; [`reverse`]
//! recovers source order before a chain is exposed as a node's `first_child`.

use crate::arena::{Arena, NodeHandle};
use crate::ast::node::{Kind, LinkPayload};
use crate::error::ParseError;

/// Prepend `new` onto `list`, returning the new head. `new`'s own `next` is
/// overwritten, matching the semantic-action idiom `a:Rule { $$ = cons(a, $$) }`.
pub fn cons(arena: &mut Arena, new: NodeHandle, list: Option<NodeHandle>) -> Option<NodeHandle> {
    arena.get_mut(new).next = list;
    Some(new)
}

/// Iterative in-place reversal of a cons-list's `next` pointers.
pub fn reverse(arena: &mut Arena, head: Option<NodeHandle>) -> Option<NodeHandle> {
    let mut prev = None;
    let mut cur = head;
    while let Some(h) = cur {
        let next = arena.get(h).next;
        arena.get_mut(h).next = prev;
        prev = Some(h);
        cur = next;
    }
    prev
}

/// Walk a (already source-ordered) child chain without consuming it.
pub fn children(arena: &Arena, head: Option<NodeHandle>) -> impl Iterator<Item = NodeHandle> + '_ {
    std::iter::successors(head, move |&h| arena.get(h).next)
}

/// Fresh node with only `kind` set.
pub fn elem(arena: &mut Arena, kind: Kind) -> Result<NodeHandle, ParseError> {
    let h = arena.allocate()?;
    arena.get_mut(h).kind = kind;
    Ok(h)
}

/// Fresh STR-shaped node (also used for CODE/HTML/etc. text-bearing kinds).
pub fn string(
    arena: &mut Arena,
    kind: Kind,
    text: impl Into<String>,
) -> Result<NodeHandle, ParseError> {
    let h = arena.allocate()?;
    let node = arena.get_mut(h);
    node.kind = kind;
    node.text = text.into();
    Ok(h)
}

/// A node whose child chain is `reverse(head)` (spec §4.2).
pub fn list(
    arena: &mut Arena,
    kind: Kind,
    head: Option<NodeHandle>,
) -> Result<NodeHandle, ParseError> {
    let ordered = reverse(arena, head);
    let h = arena.allocate()?;
    let node = arena.get_mut(h);
    node.kind = kind;
    node.first_child = ordered;
    Ok(h)
}

/// Concatenate `reverse(head).text` into a single STR node, optionally
/// appending a trailing line feed (spec §4.2).
pub fn string_from_list(
    arena: &mut Arena,
    head: Option<NodeHandle>,
    trailing_newline: bool,
) -> Result<NodeHandle, ParseError> {
    let ordered = reverse(arena, head);
    let mut buf = String::new();
    for child in children(arena, ordered) {
        buf.push_str(&arena.get(child).text);
    }
    if trailing_newline {
        buf.push('\n');
    }
    string(arena, Kind::Str, buf)
}

/// LINK/IMAGE/REFERENCE node with its payload attached. `label_chain` is an
/// already source-ordered inline child chain (spec §3 invariant: these three
/// kinds MUST carry a link payload).
pub fn link(
    arena: &mut Arena,
    kind: Kind,
    label_chain: Option<NodeHandle>,
    url: String,
    title: String,
) -> Result<NodeHandle, ParseError> {
    let h = arena.allocate()?;
    let node = arena.get_mut(h);
    node.kind = kind;
    node.link = Some(LinkPayload {
        label: label_chain,
        url,
        title,
    });
    Ok(h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;

    #[test]
    fn reverse_of_reverse_is_identity() {
        let mut arena = Arena::new(None);
        let a = string(&mut arena, Kind::Str, "a").unwrap();
        let b = string(&mut arena, Kind::Str, "b").unwrap();
        let c = string(&mut arena, Kind::Str, "c").unwrap();
        let built = cons(&mut arena, c, cons(&mut arena, b, cons(&mut arena, a, None)));

        let once = reverse(&mut arena, built);
        let twice = reverse(&mut arena, once);

        let original: Vec<NodeHandle> = children(&arena, built).collect();
        let round_tripped: Vec<NodeHandle> = children(&arena, twice).collect();
        assert_eq!(original, round_tripped);
    }

    #[test]
    fn list_recovers_source_order() {
        let mut arena = Arena::new(None);
        let a = string(&mut arena, Kind::Str, "first").unwrap();
        let b = string(&mut arena, Kind::Str, "second").unwrap();
        // built head-first, as a semantic action would: "second" consed onto
        // "first" means "first" was parsed first and should end up first again.
        let head = cons(&mut arena, b, cons(&mut arena, a, None));

        let list_node = list(&mut arena, Kind::List, head).unwrap();
        let ordered: Vec<String> = children(&arena, arena.get(list_node).first_child)
            .map(|h| arena.get(h).text.clone())
            .collect();
        assert_eq!(ordered, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn string_from_list_concatenates_in_source_order() {
        let mut arena = Arena::new(None);
        let a = string(&mut arena, Kind::Str, "hello ").unwrap();
        let b = string(&mut arena, Kind::Str, "world").unwrap();
        let head = cons(&mut arena, b, cons(&mut arena, a, None));

        let joined = string_from_list(&mut arena, head, true).unwrap();
        assert_eq!(arena.get(joined).text, "hello world\n");
    }
}
