//! Joins the flat parse table into the nested arena.
//!
//! The flat table already carries one row per node, terminal and
//! non-terminal alike, with a `parent` field encoding the reconstruction:
//! `0` for top-level, a positive id for "child of that non-terminal", and a
//! negative id for "leading comment attached ahead of that expression". This
//! pass is purely mechanical: every row becomes an arena node, then gets
//! attached under its resolved parent, then each node's children are
//! ordered by `pos_id`.

use crate::arena::{Arena, NodeId, ROOT};
use crate::error::StyleError;
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

/// Build an [`Arena`] from a flat parse table.
///
/// Returns [`StyleError::InvalidOption`] if a row references a parent id
/// that is not present in `rows` — the flat table is malformed and nesting
/// cannot proceed.
pub fn nest(rows: Vec<Token>) -> Result<Arena, StyleError> {
    let root_token = Token::from_host_row(0, 0, 0, 0, 0, 0, TokenKind::Other("ROOT".into()), String::new(), false);
    let mut arena = Arena::new(root_token);

    let mut by_host_id: HashMap<u64, NodeId> = HashMap::new();
    for token in rows {
        let host_id = token.id;
        let node = arena.push_detached(token);
        by_host_id.insert(host_id, node);
    }

    let node_ids: Vec<NodeId> = by_host_id.values().copied().collect();
    for &node in &node_ids {
        let parent_field = arena.token(node).parent;
        let parent_node = if parent_field == 0 {
            ROOT
        } else {
            let owner_id = parent_field.unsigned_abs();
            *by_host_id.get(&owner_id).ok_or_else(|| StyleError::InvalidOption {
                message: format!("parse table references unknown parent id {}", parent_field),
            })?
        };
        arena.attach(parent_node, node);
    }

    let mut all_parents: Vec<NodeId> = vec![ROOT];
    all_parents.extend(node_ids.iter().copied());
    for parent in all_parents {
        arena.sort_children_by_pos(parent);
    }

    Ok(arena)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn row(id: u64, parent: i64, pos_id: u64, terminal: bool, text: &str) -> Token {
        let mut t = Token::from_host_row(
            id,
            parent,
            pos_id as u32 + 1,
            1,
            pos_id as u32 + 1,
            1,
            if terminal { TokenKind::Symbol } else { TokenKind::Other("expr".into()) },
            text.to_string(),
            terminal,
        );
        t.pos_id = pos_id;
        t
    }

    #[test]
    fn top_level_rows_attach_under_root() {
        let rows = vec![row(1, 0, 0, true, "x"), row(2, 0, 1, true, "y")];
        let arena = nest(rows).unwrap();
        assert_eq!(arena.children(ROOT).len(), 2);
    }

    #[test]
    fn child_rows_attach_under_their_non_terminal() {
        let rows = vec![
            row(1, 0, 0, false, "call"),
            row(2, 1, 1, true, "f"),
            row(3, 1, 2, true, "("),
        ];
        let arena = nest(rows).unwrap();
        let call_node = arena.children(ROOT)[0];
        assert_eq!(arena.children(call_node).len(), 2);
    }

    #[test]
    fn leading_comment_attaches_to_following_expression() {
        let rows = vec![row(1, -2, 0, true, "# doc"), row(2, 0, 1, true, "f")];
        let arena = nest(rows).unwrap();
        let f_node = arena.children(ROOT)[0];
        assert_eq!(arena.children(f_node).len(), 1);
    }

    #[test]
    fn unknown_parent_id_is_an_error() {
        let rows = vec![row(1, 99, 0, true, "x")];
        assert!(nest(rows).is_err());
    }

    #[test]
    fn children_are_ordered_by_pos_id() {
        let rows = vec![row(1, 0, 1, true, "b"), row(2, 0, 0, true, "a")];
        let arena = nest(rows).unwrap();
        let children = arena.children(ROOT);
        assert_eq!(arena.token(children[0]).text, "a");
        assert_eq!(arena.token(children[1]).text, "b");
    }
}
