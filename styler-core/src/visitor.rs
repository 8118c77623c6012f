//! Applies a style guide's rules to every nest in the tree, in the fixed
//! phase order line-break, space, token, indention — each gated by the
//! caller's requested scope and, within a phase, by `strict`.
//!
//! Tokens tagged `stylerignore` are skipped entirely: no rule function ever
//! sees them, so their spacing fields stay at the defaults the tokenizer
//! gave them and the serializer falls back to reproducing their original
//! span verbatim.

use crate::arena::{Arena, NodeId, ROOT};
use crate::options::{Options, Scope};
use crate::rules::{NamedRule, NestView, StyleGuide};

/// Run `guide`'s rule phases over the whole tree, respecting `options.scope`
/// and `options.strict`.
pub fn visit(arena: &mut Arena, guide: &StyleGuide, options: &Options) {
    if options.scope.includes(Scope::LineBreaks) {
        run_phase(arena, ROOT, &guide.line_break_rules, options.strict);
    }
    if options.scope.includes(Scope::Spaces) {
        run_phase(arena, ROOT, &guide.space_rules, options.strict);
    }
    if options.scope.includes(Scope::Tokens) {
        run_phase(arena, ROOT, &guide.token_rules, options.strict);
    }
    if options.scope.includes(Scope::Indention) {
        run_phase(arena, ROOT, &guide.indention_rules, options.strict);
    }
}

/// Pre-order walk applying every rule in `rules` whose strength matches
/// `strict` to each non-leaf nest, skipping nests rooted at an ignored
/// token.
fn run_phase(arena: &mut Arena, node: NodeId, rules: &[NamedRule], strict: bool) {
    if arena.token(node).stylerignore {
        return;
    }
    if !arena.is_leaf(node) {
        for rule in rules.iter().filter(|r| r.applies(strict)) {
            let mut view = NestView::new(arena, node);
            (rule.run)(&mut view);
        }
    }
    let children: Vec<NodeId> = arena.children(node).to_vec();
    for child in children {
        run_phase(arena, child, rules, strict);
    }
}
