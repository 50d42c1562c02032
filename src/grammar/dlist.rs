//! Definition list extension (spec §4.5, gated by `Options::dlists`): one or
//! more title lines followed by one or more `:`/`~`-marked definitions.

use super::{blank_line_lookahead, indent, nonindent_space, raw_line, skip_blank_lines, sp, GrammarState};
use crate::arena::NodeHandle;
use crate::ast::Kind;

pub(crate) fn definition_list(state: &mut GrammarState) -> Option<NodeHandle> {
    let start = state.engine.cursor;

    let mut title_head = None;
    loop {
        let save = state.engine.cursor;
        if state.engine.at_eof() || blank_line_lookahead(&mut state.engine) {
            break;
        }
        nonindent_space(&mut state.engine);
        if matches!(state.engine.peek(), Some(b':') | Some(b'~')) {
            state.engine.cursor = save;
            break;
        }
        match raw_line(&mut state.engine) {
            Some(line) if !line.trim().is_empty() => {
                let head = super::inline::parse_inline_text(state, line.trim());
                let title = state.alloc_list(Kind::DefTitle, head)?;
                title_head = state.cons(title, title_head);
            }
            _ => {
                state.engine.cursor = save;
                break;
            }
        }
    }
    if title_head.is_none() {
        state.engine.cursor = start;
        return None;
    }

    let mut data_head = None;
    loop {
        let save = state.engine.cursor;
        skip_blank_lines(&mut state.engine);
        nonindent_space(&mut state.engine);
        if !(state.engine.literal(b":") || state.engine.literal(b"~")) {
            state.engine.cursor = save;
            break;
        }
        while sp(&mut state.engine) {}
        let mut raw = String::new();
        if let Some(line) = raw_line(&mut state.engine) {
            raw.push_str(&line);
        }
        loop {
            let inner_save = state.engine.cursor;
            if indent(&mut state.engine) {
                if let Some(line) = raw_line(&mut state.engine) {
                    raw.push('\n');
                    raw.push_str(&line);
                    continue;
                }
            }
            state.engine.cursor = inner_save;
            break;
        }
        let head = super::inline::parse_inline_text(state, &raw);
        let data_node = state.alloc_list(Kind::DefData, head)?;
        data_head = state.cons(data_node, data_head);
    }
    if data_head.is_none() {
        state.engine.cursor = start;
        return None;
    }
    skip_blank_lines(&mut state.engine);

    let titles_ordered = state.reverse_chain(title_head);
    let data_ordered = state.reverse_chain(data_head);
    let combined = splice(state, titles_ordered, data_ordered);

    let node = state.alloc_elem(Kind::DefinitionList)?;
    state.arena.get_mut(node).first_child = combined;
    Some(node)
}

/// Appends `tail` after the last node of `head`'s chain (both already in
/// source order); returns `head` with `tail` spliced in, or `tail` if `head`
/// is empty.
fn splice(
    state: &mut GrammarState,
    head: Option<NodeHandle>,
    tail: Option<NodeHandle>,
) -> Option<NodeHandle> {
    match head {
        None => tail,
        Some(h) => {
            let mut last = h;
            while let Some(n) = state.arena.get(last).next {
                last = n;
            }
            state.arena.get_mut(last).next = tail;
            Some(h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;

    fn parse(source: &str) -> crate::driver::ParseOutput {
        crate::driver::parse(source.as_bytes(), Options::new().with_dlists(true))
    }

    #[test]
    fn title_and_definition_produce_definition_list() {
        let out = parse("Term\n: definition text\n");
        let root = out.root.unwrap();
        let dlist = crate::ast::children(&out.arena, out.arena.get(root).first_child)
            .next()
            .unwrap();
        assert_eq!(out.arena.get(dlist).kind, Kind::DefinitionList);
        let kinds: Vec<_> = crate::ast::children(&out.arena, out.arena.get(dlist).first_child)
            .map(|h| out.arena.get(h).kind)
            .collect();
        assert_eq!(kinds, vec![Kind::DefTitle, Kind::DefData]);
    }
}
