//! End-to-end scenarios from the grammar's documented boundary behaviours and
//! concrete parse shapes: empty/blank input, heading edges, and the S1/S4/S6
//! scenarios (paragraph inline runs, emphasis/strong, code spans).

use oyster_peg::ast::{children, Kind};
use oyster_peg::{parse, Options};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A compact s-expression rendering of a subtree, used for snapshotting
/// whole-paragraph shapes in one assertion instead of walking children by hand.
fn sexpr(arena: &oyster_peg::arena::Arena, handle: oyster_peg::arena::NodeHandle) -> String {
    let node = arena.get(handle);
    let text_repr = match node.kind {
        Kind::Str | Kind::Code | Kind::Html | Kind::Verbatim | Kind::HtmlBlock => {
            Some(format!("{:?}", node.text))
        }
        _ => None,
    };
    let kids: Vec<String> = children(arena, node.first_child)
        .map(|c| sexpr(arena, c))
        .collect();
    match (text_repr, kids.is_empty()) {
        (Some(t), _) => format!("({:?} {})", node.kind, t),
        (None, true) => format!("({:?})", node.kind),
        (None, false) => format!("({:?} {})", node.kind, kids.join(" ")),
    }
}

fn root_sexpr(out: &oyster_peg::driver::ParseOutput) -> String {
    sexpr(&out.arena, out.root.expect("total parse always yields a root"))
}

#[test]
fn s1_hello_world_is_str_space_str() {
    let out = parse(b"hello world\n", Options::new());
    insta::assert_snapshot!(root_sexpr(&out), @r#"(List (Para (Str "hello") (Space) (Str "world")))"#);
}

#[test]
fn s4_emphasis_and_strong() {
    let out = parse(b"*em* **st**\n", Options::new());
    insta::assert_snapshot!(root_sexpr(&out), @r#"(List (Para (Emph (Str "em")) (Space) (Strong (Str "st"))))"#);
}

#[test]
fn s6_code_span() {
    let out = parse(b"`code`\n", Options::new());
    insta::assert_snapshot!(root_sexpr(&out), @r#"(List (Para (Code "code")))"#);
}

#[test]
fn s2_heading_then_paragraph() {
    let out = parse(b"# Title\n\npara\n", Options::new());
    let root = out.root.unwrap();
    let kinds: Vec<_> = children(&out.arena, out.arena.get(root).first_child)
        .map(|h| out.arena.get(h).kind)
        .collect();
    assert_eq!(kinds, vec![Kind::H1, Kind::Para]);
}

#[test]
fn s3_reference_link_resolves_with_url_and_title() {
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
fn s5_footnote_resolves_with_notes_enabled() {
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

#[rstest]
#[case::empty("", 0)]
#[case::blank_lines_only("\n\n   \n\n", 0)]
fn boundary_empty_and_blank_input_yield_no_children(#[case] source: &str, #[case] expected: usize) {
    let out = parse(source.as_bytes(), Options::new());
    let root = out.root.expect("total parse always yields a root");
    assert_eq!(out.arena.get(root).kind, Kind::List);
    let count = children(&out.arena, out.arena.get(root).first_child).count();
    assert_eq!(count, expected);
}

#[rstest]
#[case::h1("# Title\n", Kind::H1)]
#[case::h2("## Title\n", Kind::H2)]
#[case::h3("### Title\n", Kind::H3)]
#[case::h4("#### Title\n", Kind::H4)]
#[case::h5("##### Title\n", Kind::H5)]
#[case::h6("###### Title\n", Kind::H6)]
fn atx_heading_levels_follow_hash_run_length(#[case] source: &str, #[case] expected: Kind) {
    let out = parse(source.as_bytes(), Options::new());
    let root = out.root.unwrap();
    let first = children(&out.arena, out.arena.get(root).first_child)
        .next()
        .unwrap();
    assert_eq!(out.arena.get(first).kind, expected);
}

#[test]
fn block_kind_sequence_yaml_snapshot() {
    let out = parse(b"# Title\n\npara\n\n> quote\n", Options::new());
    let root = out.root.unwrap();
    let kinds: Vec<Kind> = children(&out.arena, out.arena.get(root).first_child)
        .map(|h| out.arena.get(h).kind)
        .collect();
    insta::assert_yaml_snapshot!(kinds, @r#"
    - H1
    - Para
    - BlockQuote
    "#);
}

#[test]
fn seven_hashes_clamp_to_h6_with_literal_hash_in_content() {
    let out = parse(b"#######\n", Options::new());
    insta::assert_snapshot!(root_sexpr(&out), @r#"(List (H6 (Str "#")))"#);
}
