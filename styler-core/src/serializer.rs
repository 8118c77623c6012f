//! Turns a nested tree back into source text.
//!
//! Walks terminals in `pos_id` order and emits each one's own text preceded
//! by `lag_newlines` newlines (with the resolved indentation on the new
//! line, see [`resolve_indent`]) or, on the same line, `lag_spaces` spaces.
//! A `stylerignore`d token's spacing fields were never touched by any rule,
//! so this single code path already reproduces an ignored region verbatim —
//! there is no separate patch-up pass.

use crate::arena::{Arena, NodeId};
use crate::options::Options;
use crate::rules::StyleGuide;
use std::collections::HashSet;

/// Render the whole tree to text, using the style guide's indentation
/// policy and the caller's `base_indention`.
pub fn serialize(arena: &Arena, guide: &StyleGuide, options: &Options) -> String {
    render(
        arena,
        &arena.terminals_in_order(),
        guide.reindention.indent_by as u32,
        guide.use_raw_indention,
        options.base_indention,
    )
}

/// Render just the subtree rooted at `node`, with no leading gap before its
/// first terminal — used to record a styled top-level expression's final
/// text in the cache. Indentation is resolved the same way `serialize` does,
/// so a recorded fixed point matches byte-for-byte what a full run emits.
pub fn serialize_subtree(arena: &Arena, node: NodeId, guide: &StyleGuide, options: &Options) -> String {
    render(
        arena,
        &arena.terminals_under(node),
        guide.reindention.indent_by as u32,
        guide.use_raw_indention,
        options.base_indention,
    )
}

/// Render a subtree exactly as the host parser produced it: every
/// `indent_ref_id` is still self-referential before any rule has run, so
/// this reproduces the original source text regardless of the style guide
/// that will eventually be applied. Used for the cache pre-filter's
/// candidate text, extracted before normalization or rule application.
pub fn serialize_subtree_verbatim(arena: &Arena, node: NodeId) -> String {
    render(arena, &arena.terminals_under(node), 0, true, 0)
}

fn render(arena: &Arena, terminals: &[NodeId], indent_by: u32, use_raw_indention: bool, base_indention: u32) -> String {
    let mut out = String::new();
    for (i, &node) in terminals.iter().enumerate() {
        let token = arena.token(node);
        if i > 0 {
            if token.lag_newlines > 0 {
                for _ in 0..token.lag_newlines {
                    out.push('\n');
                }
                let indent = resolve_indent(arena, node, indent_by, use_raw_indention, base_indention);
                for _ in 0..indent {
                    out.push(' ');
                }
            } else {
                for _ in 0..token.lag_spaces {
                    out.push(' ');
                }
            }
        }
        out.push_str(&token.text);
    }
    out
}

/// Resolve how many spaces of indentation a token that starts a new line
/// gets, per §4.H: follow `indent_ref_id` transitively until a
/// self-referential token is found and use its column, plus one indent unit
/// per hop along the chain (a token nested two continuation levels deep
/// picks up two units, not one).
///
/// A token a rule never touched (still self-referential) falls back to its
/// own original column when `use_raw_indention` is set — reproducing the
/// source's leading whitespace verbatim — or to a blank `0` baseline
/// otherwise, since a guide that recomputes indentation from scratch has no
/// business keeping whatever the input happened to have.
///
/// `base_indention` is added on top of every *computed* value (touched, or
/// the non-raw `0` baseline) but never on top of a verbatim one.
fn resolve_indent(arena: &Arena, node: NodeId, indent_by: u32, use_raw_indention: bool, base_indention: u32) -> u32 {
    let token = arena.token(node);
    if token.indent_ref_id != token.id {
        let mut current = token.indent_ref_id;
        let mut hops: u32 = 1;
        let mut seen = HashSet::new();
        loop {
            if !seen.insert(current) {
                break;
            }
            let Some(referenced) = arena.node_for_token_id(current) else {
                break;
            };
            let referenced_token = arena.token(referenced);
            if referenced_token.indent_ref_id == referenced_token.id {
                return referenced_token.col1.saturating_sub(1) + indent_by * hops + base_indention;
            }
            current = referenced_token.indent_ref_id;
            hops += 1;
        }
        token.col1.saturating_sub(1) + base_indention
    } else if use_raw_indention {
        token.col1.saturating_sub(1)
    } else {
        base_indention
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ROOT;
    use crate::rules::ReindentionSpec;
    use crate::token::{Token, TokenKind};

    fn leaf(id: u64, pos_id: u64, text: &str, lag_newlines: u32, lag_spaces: u32) -> Token {
        let mut t = Token::from_host_row(id, 0, 1, 1, 1, 1, TokenKind::Symbol, text.to_string(), true);
        t.pos_id = pos_id;
        t.lag_newlines = lag_newlines;
        t.lag_spaces = lag_spaces;
        t
    }

    fn guide(use_raw_indention: bool, indent_by: usize) -> StyleGuide {
        StyleGuide {
            name: "test".into(),
            version: "1".into(),
            line_break_rules: vec![],
            space_rules: vec![],
            token_rules: vec![],
            indention_rules: vec![],
            use_raw_indention,
            reindention: ReindentionSpec {
                indent_by,
                indent_on_open_bracket: true,
            },
        }
    }

    #[test]
    fn serializes_with_spaces() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        arena.push(leaf(2, 1, "+", 0, 1), ROOT);
        arena.push(leaf(3, 2, "b", 0, 1), ROOT);
        let g = guide(false, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "a + b");
    }

    #[test]
    fn untouched_newline_resets_to_zero_when_not_raw() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        let mut b = leaf(2, 1, "b", 1, 0);
        b.col1 = 5;
        arena.push(b, ROOT);
        let g = guide(false, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "a\nb");
    }

    #[test]
    fn untouched_newline_is_verbatim_when_raw() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        let mut b = leaf(2, 1, "b", 1, 0);
        b.col1 = 5;
        arena.push(b, ROOT);
        let g = guide(true, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "a\n    b");
    }

    #[test]
    fn touched_token_resolves_through_indent_ref_id_plus_one_unit() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        let mut anchor = leaf(1, 0, "call(", 0, 0);
        anchor.col1 = 1;
        let anchor_id = arena.push(anchor, ROOT);
        let anchor_token_id = arena.token(anchor_id).id;
        let mut cont = leaf(2, 1, "x", 1, 0);
        cont.indent_ref_id = anchor_token_id;
        arena.push(cont, ROOT);
        let g = guide(false, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "call(\n  x");
    }

    #[test]
    fn chained_indent_ref_id_accumulates_one_unit_per_hop() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        let mut outer = leaf(1, 0, "outer(", 0, 0);
        outer.col1 = 1;
        let outer_id = arena.push(outer, ROOT);
        let outer_token_id = arena.token(outer_id).id;

        let mut inner = leaf(2, 1, "inner(", 1, 0);
        inner.indent_ref_id = outer_token_id;
        let inner_id = arena.push(inner, ROOT);
        let inner_token_id = arena.token(inner_id).id;

        let mut x = leaf(3, 2, "x", 1, 0);
        x.indent_ref_id = inner_token_id;
        arena.push(x, ROOT);

        let g = guide(false, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "outer(\n  inner(\n    x");
    }

    #[test]
    fn base_indention_applies_on_top_of_computed_but_not_verbatim() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        let mut b = leaf(2, 1, "b", 1, 0);
        b.col1 = 5;
        arena.push(b, ROOT);

        let mut options = Options::default();
        options.base_indention = 4;

        let raw_guide = guide(true, 2);
        assert_eq!(serialize(&arena, &raw_guide, &options), "a\n    b");

        let computed_guide = guide(false, 2);
        assert_eq!(serialize(&arena, &computed_guide, &options), "a\n    b");
    }

    #[test]
    fn serializes_with_newlines() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        arena.push(leaf(2, 1, "b", 1, 0), ROOT);
        let g = guide(true, 2);
        assert_eq!(serialize(&arena, &g, &Options::default()), "a\nb");
    }

    #[test]
    fn verbatim_subtree_ignores_the_style_guide_entirely() {
        let root = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
        let mut arena = Arena::new(root);
        arena.push(leaf(1, 0, "a", 0, 0), ROOT);
        let mut b = leaf(2, 1, "b", 1, 0);
        b.col1 = 3;
        arena.push(b, ROOT);
        assert_eq!(serialize_subtree_verbatim(&arena, ROOT), "a\n  b");
    }
}

