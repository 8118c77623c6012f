//! Normalizes the nested tree into the shape later passes assume: operator
//! chains flattened to a single level, and an `=`-rooted assignment reshaped
//! to the same flat `lhs op rhs` layout a `<-` assignment already has.
//!
//! Block assignment (tagging each top-level expression with the cache block
//! it belongs to) is a separate, earlier concern: it has to run before the
//! cache pre-filter classifies candidates, not as part of this pass.

use crate::arena::{Arena, NodeId, ROOT};
use crate::token::TokenKind;

/// Binary operator kinds that chain left-to-right and are safe to flatten
/// into one level (`a + b - c` becomes one node with children
/// `[a, +, b, -, c]` instead of a nested `(a + b) - c` pair-tree).
fn is_flattenable_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Special(_)
    )
}

/// Run every tree-shape normalization pass over `arena`, rooted at the
/// document root. Neither pass here ever rewrites a token's `kind` or
/// `text` — that is the token phase's job (`Scope::Tokens`-gated rules in
/// the style guide), run later by the visitor.
pub fn normalize(arena: &mut Arena) {
    flatten_operator_chains(arena, ROOT);
    relocate_eq_assign(arena, ROOT);
}

/// Recursively flatten nested binary-operator subtrees that share the same
/// flattenable operator kind into a single nest.
fn flatten_operator_chains(arena: &mut Arena, node: NodeId) {
    let children: Vec<NodeId> = arena.children(node).to_vec();
    for &child in &children {
        flatten_operator_chains(arena, child);
    }

    let children = arena.children(node).to_vec();
    if children.len() != 3 {
        return;
    }
    let op_kind = arena.token(children[1]).kind.clone();
    if !is_flattenable_operator(&op_kind) {
        return;
    }

    let mut flattened = Vec::new();
    absorb_chain(arena, children[0], &op_kind, &mut flattened);
    flattened.push(children[1]);
    absorb_chain(arena, children[2], &op_kind, &mut flattened);
    arena.set_children(node, flattened);
}

/// If `node` is itself a `lhs op rhs` nest with a matching operator, splice
/// its children in rather than keeping it nested one level deeper.
fn absorb_chain(arena: &mut Arena, node: NodeId, op_kind: &TokenKind, out: &mut Vec<NodeId>) {
    let grandchildren = arena.children(node).to_vec();
    if grandchildren.len() == 3 && arena.token(grandchildren[1]).kind == *op_kind {
        out.push(grandchildren[0]);
        out.push(grandchildren[1]);
        out.push(grandchildren[2]);
    } else {
        out.push(node);
    }
}

/// Reshape an `=`-assignment nest to the same flat layout a `<-` assignment
/// has: if a nest's only child is itself a 3-child `lhs EQ_ASSIGN rhs`
/// triple, splice that triple's children up a level rather than leaving it
/// wrapped. This never touches the operator's `kind`/`text` — whether `=`
/// becomes `<-` in the output is decided later, by
/// `tidyverse::rewrite_eq_to_left_assign`, the `Scope::Tokens`-gated token
/// rule, so it can be skipped at narrower scopes without the tree shape
/// itself depending on that decision.
fn relocate_eq_assign(arena: &mut Arena, node: NodeId) {
    let children: Vec<NodeId> = arena.children(node).to_vec();
    for &child in &children {
        relocate_eq_assign(arena, child);
    }

    let children = arena.children(node).to_vec();
    if children.len() != 1 {
        return;
    }
    let only_child = children[0];
    let grandchildren = arena.children(only_child).to_vec();
    if grandchildren.len() == 3 && arena.token(grandchildren[1]).kind == TokenKind::EqAssign {
        arena.set_children(node, grandchildren);
    }
}

/// Tag each top-level expression with the cache block it belongs to. Two
/// consecutive top-level expressions share a block iff they sit on the same
/// source line (the first's closing line equals the second's opening line);
/// a line break between them starts a new block. When caching is disabled
/// there is no pre-filter to group for, so every expression gets block `1`.
pub fn assign_blocks(arena: &mut Arena, caching_enabled: bool) {
    let top_level = arena.children(ROOT).to_vec();
    if !caching_enabled {
        for &node in &top_level {
            arena.token_mut(node).block = 1;
        }
        return;
    }

    let mut current_block: u32 = 1;
    for (i, &node) in top_level.iter().enumerate() {
        if i > 0 {
            let prev = top_level[i - 1];
            let shares_line = arena.token(prev).line2 == arena.token(node).line1;
            if !shares_line {
                current_block += 1;
            }
        }
        arena.token_mut(node).block = current_block;
    }
}
