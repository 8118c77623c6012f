//! The permission-phased rule-function contract a style guide is built
//! from. Concrete rule bodies live in the sibling rules crate, registered
//! by name; this module only carries the scaffolding every rule set shares.
//!
//! Style guides are data, not types: a [`StyleGuide`] is a plain struct
//! holding ordered vectors of named rule closures per phase, not a trait
//! hierarchy of guide implementations.

use crate::arena::{Arena, NodeId};
use crate::token::Token;

/// A view of one "nest": a non-terminal node and its immediate children,
/// the unit every rule phase operates on.
pub struct NestView<'a> {
    arena: &'a mut Arena,
    node: NodeId,
}

impl<'a> NestView<'a> {
    pub fn new(arena: &'a mut Arena, node: NodeId) -> Self {
        NestView { arena, node }
    }

    pub fn node(&self) -> &Token {
        self.arena.token(self.node)
    }

    pub fn node_mut(&mut self) -> &mut Token {
        self.arena.token_mut(self.node)
    }

    pub fn children(&self) -> &[NodeId] {
        self.arena.children(self.node)
    }

    pub fn child(&self, idx: usize) -> &Token {
        self.arena.token(self.children()[idx])
    }

    pub fn child_mut(&mut self, idx: usize) -> &mut Token {
        let id = self.children()[idx];
        self.arena.token_mut(id)
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Access the underlying arena directly; used by indention rules that
    /// need to resolve `indent_ref_id` across nest boundaries.
    pub fn arena(&self) -> &Arena {
        self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        self.arena
    }
}

/// A rule function: reads whatever its phase allows and writes only the
/// column(s) that phase permits. The permission boundary between phases is
/// documentation, not compiler-enforced, matching a closure-registry rule
/// dispatch rather than a typed visitor per phase.
pub type RuleFn = Box<dyn Fn(&mut NestView) + Send + Sync>;

/// Whether a rule forces an exact value (`set_*`, used when `strict`) or
/// only enforces a minimum (`add_*`, used otherwise).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleStrength {
    Set,
    Add,
}

pub struct NamedRule {
    pub name: &'static str,
    pub strength: RuleStrength,
    pub run: RuleFn,
}

impl NamedRule {
    pub fn set(name: &'static str, run: RuleFn) -> Self {
        NamedRule {
            name,
            strength: RuleStrength::Set,
            run,
        }
    }

    pub fn add(name: &'static str, run: RuleFn) -> Self {
        NamedRule {
            name,
            strength: RuleStrength::Add,
            run,
        }
    }

    /// Only run this rule if it matches the caller's `strict` setting.
    pub fn applies(&self, strict: bool) -> bool {
        match self.strength {
            RuleStrength::Set => strict,
            RuleStrength::Add => !strict,
        }
    }
}

/// How re-indention should be computed when `use_raw_indention` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReindentionSpec {
    /// Number of spaces per indent level.
    pub indent_by: usize,
    /// Token kinds that introduce one extra indent level per unmatched
    /// open bracket still in scope.
    pub indent_on_open_bracket: bool,
}

impl Default for ReindentionSpec {
    fn default() -> Self {
        ReindentionSpec {
            indent_by: 2,
            indent_on_open_bracket: true,
        }
    }
}

/// A style guide: an ordered collection of rule functions grouped by phase,
/// plus the options that shape re-indention.
pub struct StyleGuide {
    pub name: String,
    pub version: String,
    pub line_break_rules: Vec<NamedRule>,
    pub space_rules: Vec<NamedRule>,
    pub token_rules: Vec<NamedRule>,
    pub indention_rules: Vec<NamedRule>,
    pub use_raw_indention: bool,
    pub reindention: ReindentionSpec,
}

impl StyleGuide {
    /// The identity string mixed into the cache hash.
    pub fn identity(&self) -> String {
        format!("{}@{}", self.name, self.version)
    }
}
