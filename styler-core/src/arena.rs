//! An arena of token records linked by ordered child lists.
//!
//! This is the nested parse table: a tree with back-edges (each token knows
//! its parent), built as an arena indexed by stable ids, a parallel ordered
//! child-index list per node, and a parent index per node. There are no
//! cycles; it is a tree rooted at a synthetic document node so every real
//! token has exactly one parent, including top-level expressions whose
//! host-assigned `parent` is `0`.

use crate::token::{Token, TokenId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index into a [`Arena`]. Stable for the lifetime of the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A nested parse table.
///
/// `nodes[0]` is always the synthetic document root (a non-terminal with no
/// source text); every other node is reachable from it via `children`.
#[derive(Debug, Clone)]
pub struct Arena {
    nodes: Vec<Token>,
    children: Vec<Vec<NodeId>>,
    parent: Vec<Option<NodeId>>,
    by_token_id: HashMap<TokenId, NodeId>,
}

pub const ROOT: NodeId = NodeId(0);

impl Arena {
    /// Create an arena with only the synthetic document root.
    pub fn new(root_token: Token) -> Self {
        let mut by_token_id = HashMap::new();
        by_token_id.insert(root_token.id, ROOT);
        Arena {
            nodes: vec![root_token],
            children: vec![Vec::new()],
            parent: vec![None],
            by_token_id,
        }
    }

    pub fn push(&mut self, token: Token, parent: NodeId) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.by_token_id.insert(token.id, id);
        self.nodes.push(token);
        self.children.push(Vec::new());
        self.parent.push(Some(parent));
        self.children[parent.0 as usize].push(id);
        id
    }

    /// Insert a detached node (no parent yet); used by the nester while it
    /// is still discovering parent/child relationships.
    pub fn push_detached(&mut self, token: Token) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.by_token_id.insert(token.id, id);
        self.nodes.push(token);
        self.children.push(Vec::new());
        self.parent.push(None);
        id
    }

    /// Resolve the node holding the token with this id, used by the
    /// serializer to follow an `indent_ref_id` chain across nest boundaries.
    pub fn node_for_token_id(&self, id: TokenId) -> Option<NodeId> {
        self.by_token_id.get(&id).copied()
    }

    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.parent[child.0 as usize] = Some(parent);
        self.children[parent.0 as usize].push(child);
    }

    pub fn token(&self, id: NodeId) -> &Token {
        &self.nodes[id.0 as usize]
    }

    pub fn token_mut(&mut self, id: NodeId) -> &mut Token {
        &mut self.nodes[id.0 as usize]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.children[id.0 as usize]
    }

    pub fn children_mut(&mut self, id: NodeId) -> &mut Vec<NodeId> {
        &mut self.children[id.0 as usize]
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.parent[id.0 as usize]
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.parent[id.0 as usize] = parent;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.children[id.0 as usize].is_empty()
    }

    /// Sort a node's children in place by `pos_id`, the stable source-order key.
    pub fn sort_children_by_pos(&mut self, id: NodeId) {
        let nodes = &self.nodes;
        self.children[id.0 as usize].sort_by_key(|c| nodes[c.0 as usize].pos_id);
    }

    /// Replace a node's children wholesale (used by operator flattening,
    /// which rebuilds the child vector rather than mutating it in place).
    pub fn set_children(&mut self, id: NodeId, new_children: Vec<NodeId>) {
        for &child in &new_children {
            self.parent[child.0 as usize] = Some(id);
        }
        self.children[id.0 as usize] = new_children;
    }

    /// Pre-order walk (parent before children) over the full tree.
    pub fn walk_preorder(&self, start: NodeId, f: &mut impl FnMut(&Arena, NodeId)) {
        f(self, start);
        for &child in self.children(start).to_vec().iter() {
            self.walk_preorder(child, f);
        }
    }

    /// Leaves in source order (pos_id ascending), i.e. the terminal stream
    /// the serializer consumes.
    pub fn terminals_in_order(&self) -> Vec<NodeId> {
        self.terminals_under(ROOT)
    }

    /// Leaves under `id` in source order, for serializing one subtree on
    /// its own (used by the cache recorder to check a single top-level
    /// expression's output against its input).
    pub fn terminals_under(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_terminals(id, &mut out);
        out.sort_by_key(|n| self.token(*n).pos_id);
        out
    }

    fn collect_terminals(&self, id: NodeId, out: &mut Vec<NodeId>) {
        if self.is_leaf(id) {
            if id != ROOT {
                out.push(id);
            }
            return;
        }
        for &child in self.children(id) {
            self.collect_terminals(child, out);
        }
    }
}
