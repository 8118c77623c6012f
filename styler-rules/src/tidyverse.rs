//! The built-in "tidyverse" style guide: single spaces around binary and
//! assignment operators, one space after a comma and none before, no
//! padding just inside brackets, forced line breaks on multi-step pipe
//! chains, and two-space re-indention.

use styler_core::{NamedRule, NestView, ReindentionSpec, RuleStrength, StyleGuide, TokenKind};

fn is_binary_operator(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Caret
            | TokenKind::Lt
            | TokenKind::Gt
            | TokenKind::Le
            | TokenKind::Ge
            | TokenKind::EqEq
            | TokenKind::Ne
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::Special(_)
    )
}

fn is_assignment_operator(kind: &TokenKind) -> bool {
    kind.is_assignment()
}

/// One space on both sides of every binary/assignment operator found among
/// a nest's direct children (a flattened chain puts every operator at an
/// odd index, alternating with operands).
fn space_around_operators(view: &mut NestView) {
    let n = view.child_count();
    for i in 0..n {
        let kind = view.child(i).kind.clone();
        if (is_binary_operator(&kind) || is_assignment_operator(&kind)) && i > 0 && i + 1 < n {
            view.child_mut(i).lag_spaces = 1;
            view.child_mut(i + 1).lag_spaces = 1;
        }
    }
}

/// No space between a unary `+`/`-`/`!` and its operand.
fn no_space_after_unary(view: &mut NestView) {
    if view.child_count() == 2 {
        let op = view.child(0).kind.clone();
        if matches!(op, TokenKind::Plus | TokenKind::Minus | TokenKind::Not) {
            view.child_mut(1).lag_spaces = 0;
        }
    }
}

/// Exactly one space after a comma, none before; none just inside a call's
/// or index's brackets.
fn space_around_punctuation(view: &mut NestView) {
    let n = view.child_count();
    for i in 0..n {
        let kind = view.child(i).kind.clone();
        if kind == TokenKind::Comma {
            view.child_mut(i).lag_spaces = 0;
            if i + 1 < n {
                view.child_mut(i + 1).lag_spaces = 1;
            }
        }
        if kind.is_open_bracket() && i + 1 < n {
            view.child_mut(i + 1).lag_spaces = 0;
        }
        if kind.is_close_bracket() {
            view.child_mut(i).lag_spaces = 0;
        }
    }
}

/// No space between a call's name and its opening `(`.
fn no_space_before_call_paren(view: &mut NestView) {
    let n = view.child_count();
    for i in 0..n {
        if view.child(i).kind == TokenKind::LParen && i > 0 && view.child(i - 1).kind == TokenKind::Symbol {
            view.child_mut(i).lag_spaces = 0;
        }
    }
}

/// Force a line break after each step of a pipe chain once it has more than
/// one `%>%`/native-pipe step in scope, without ever collapsing a break
/// that is the sole separator before a trailing end-of-line comment.
fn line_break_after_pipe_steps(view: &mut NestView) {
    let n = view.child_count();
    let pipe_positions: Vec<usize> = (0..n)
        .filter(|&i| matches!(view.child(i).kind, TokenKind::Special(styler_core::SpecialKind::Pipe)))
        .collect();
    if pipe_positions.len() < 2 {
        return;
    }
    for &i in &pipe_positions {
        if i + 1 < n {
            let next_is_trailing_comment = view.child(i + 1).kind.is_comment();
            if !next_is_trailing_comment {
                view.child_mut(i + 1).lag_newlines = view.child(i + 1).lag_newlines.max(1);
            }
        }
    }
}

/// Rewrite a statement-level `=` to `<-`. Never touches `=` used to name a
/// call argument — recognized by the nest also containing a balanced
/// `(`/`)` pair, meaning this nest is a call's argument list, not a
/// top-level assignment.
fn rewrite_eq_to_left_assign(view: &mut NestView) {
    let n = view.child_count();
    let is_call_args = (0..n).any(|i| view.child(i).kind == TokenKind::LParen)
        && (0..n).any(|i| view.child(i).kind == TokenKind::RParen);
    if is_call_args {
        return;
    }
    for i in 0..n {
        if view.child(i).kind == TokenKind::EqAssign {
            let tok = view.child_mut(i);
            tok.kind = TokenKind::LeftAssign;
            tok.text = "<-".to_string();
        }
    }
}

/// Normalize a string literal's quote character to `"`, unless the literal
/// contains an unescaped `"` (in which case `'` is kept to avoid having to
/// re-escape the body).
fn normalize_string_quotes(view: &mut NestView) {
    for i in 0..view.child_count() {
        let token = view.child_mut(i);
        if token.kind != TokenKind::StringLit {
            continue;
        }
        if !token.text.starts_with('\'') {
            continue;
        }
        let body = &token.text[1..token.text.len() - 1];
        if contains_unescaped(body, '"') {
            continue;
        }
        token.text = format!("\"{}\"", body);
    }
}

fn contains_unescaped(body: &str, target: char) -> bool {
    let mut escaped = false;
    for ch in body.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == target {
            return true;
        }
    }
    false
}

/// Align a continuation line's indentation to the line-opening token's
/// column plus one indent unit, for every direct child that starts a new
/// line inside a still-open `(`/`[`/`{`. Points `indent_ref_id` at the
/// nest's first child rather than writing `spaces` directly — the
/// serializer resolves the actual column and adds the indent unit.
fn reindent_bracket_continuations(view: &mut NestView) {
    let n = view.child_count();
    let has_open_bracket = (0..n).any(|i| view.child(i).kind.is_open_bracket());
    if !has_open_bracket {
        return;
    }
    let anchor_id = view.child(0).id;
    for i in 1..n {
        if view.child(i).lag_newlines > 0 {
            view.child_mut(i).indent_ref_id = anchor_id;
        }
    }
}

/// Build the built-in "tidyverse" style guide.
///
/// Spacing, punctuation, and string-quote rules apply under both `strict`
/// settings — they are registered once as `set_*` and once as `add_*` so
/// [`NamedRule::applies`] picks the matching copy either way. Only the
/// `=` → `<-` rewrite is strict-exclusive, per its own rule above.
pub fn tidyverse() -> StyleGuide {
    StyleGuide {
        name: "tidyverse".into(),
        version: "1".into(),
        line_break_rules: vec![
            NamedRule::set("line_break_after_pipe_steps", Box::new(line_break_after_pipe_steps)),
            NamedRule::add("line_break_after_pipe_steps", Box::new(line_break_after_pipe_steps)),
        ],
        space_rules: vec![
            NamedRule::set("space_around_operators", Box::new(space_around_operators)),
            NamedRule::add("space_around_operators", Box::new(space_around_operators)),
            NamedRule::set("no_space_after_unary", Box::new(no_space_after_unary)),
            NamedRule::add("no_space_after_unary", Box::new(no_space_after_unary)),
            NamedRule::set("space_around_punctuation", Box::new(space_around_punctuation)),
            NamedRule::add("space_around_punctuation", Box::new(space_around_punctuation)),
            NamedRule::set("no_space_before_call_paren", Box::new(no_space_before_call_paren)),
            NamedRule::add("no_space_before_call_paren", Box::new(no_space_before_call_paren)),
        ],
        token_rules: vec![
            NamedRule::set("rewrite_eq_to_left_assign", Box::new(rewrite_eq_to_left_assign)),
            NamedRule::set("normalize_string_quotes", Box::new(normalize_string_quotes)),
            NamedRule::add("normalize_string_quotes", Box::new(normalize_string_quotes)),
        ],
        indention_rules: vec![
            NamedRule::set("reindent_bracket_continuations", Box::new(reindent_bracket_continuations)),
            NamedRule::add("reindent_bracket_continuations", Box::new(reindent_bracket_continuations)),
        ],
        use_raw_indention: false,
        reindention: ReindentionSpec {
            indent_by: 2,
            indent_on_open_bracket: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styler_core::arena::{Arena, ROOT};
    use styler_core::{Options, Token};

    fn leaf(id: u64, pos_id: u64, kind: TokenKind, text: &str) -> Token {
        let mut t = Token::from_host_row(id, 0, 1, 1, 1, 1, kind, text.to_string(), true);
        t.pos_id = pos_id;
        t
    }

    fn non_terminal(id: u64) -> Token {
        Token::from_host_row(id, 0, 1, 1, 1, 1, TokenKind::Other("expr".into()), String::new(), false)
    }

    #[test]
    fn builds_with_every_phase_populated() {
        let guide = tidyverse();
        assert!(!guide.space_rules.is_empty());
        assert!(!guide.token_rules.is_empty());
        assert!(!guide.indention_rules.is_empty());
        assert!(!guide.line_break_rules.is_empty());
        assert_eq!(guide.reindention.indent_by, 2);
    }

    #[test]
    fn space_around_operators_touches_both_sides() {
        let mut arena = Arena::new(non_terminal(0));
        let a = arena.push(leaf(1, 0, TokenKind::Symbol, "a"), ROOT);
        let plus = arena.push(leaf(2, 1, TokenKind::Plus, "+"), ROOT);
        let b = arena.push(leaf(3, 2, TokenKind::Symbol, "b"), ROOT);
        arena.set_children(ROOT, vec![a, plus, b]);

        let mut view = NestView::new(&mut arena, ROOT);
        space_around_operators(&mut view);
        assert_eq!(arena.token(plus).lag_spaces, 1);
        assert_eq!(arena.token(b).lag_spaces, 1);
    }

    #[test]
    fn eq_assign_is_left_alone_in_call_args() {
        let mut arena = Arena::new(non_terminal(0));
        let lparen = arena.push(leaf(1, 0, TokenKind::LParen, "("), ROOT);
        let name = arena.push(leaf(2, 1, TokenKind::Symbol, "n"), ROOT);
        let eq = arena.push(leaf(3, 2, TokenKind::EqAssign, "="), ROOT);
        let val = arena.push(leaf(4, 3, TokenKind::Numeric, "1"), ROOT);
        let rparen = arena.push(leaf(5, 4, TokenKind::RParen, ")"), ROOT);
        arena.set_children(ROOT, vec![lparen, name, eq, val, rparen]);

        let mut view = NestView::new(&mut arena, ROOT);
        rewrite_eq_to_left_assign(&mut view);
        assert_eq!(arena.token(eq).kind, TokenKind::EqAssign);
    }

    #[test]
    fn single_quote_literal_without_embedded_double_quote_is_rewritten() {
        let mut arena = Arena::new(non_terminal(0));
        let s = arena.push(leaf(1, 0, TokenKind::StringLit, "'hi'"), ROOT);
        arena.set_children(ROOT, vec![s]);

        let mut view = NestView::new(&mut arena, ROOT);
        normalize_string_quotes(&mut view);
        assert_eq!(arena.token(s).text, "\"hi\"");
    }

    #[test]
    fn single_quote_literal_with_embedded_double_quote_is_kept() {
        let mut arena = Arena::new(non_terminal(0));
        let s = arena.push(leaf(1, 0, TokenKind::StringLit, "'say \"hi\"'"), ROOT);
        arena.set_children(ROOT, vec![s]);

        let mut view = NestView::new(&mut arena, ROOT);
        normalize_string_quotes(&mut view);
        assert_eq!(arena.token(s).text, "'say \"hi\"'");
    }

    #[test]
    fn reindent_bracket_continuations_points_at_the_opening_token() {
        let mut arena = Arena::new(non_terminal(0));
        let call_open = arena.push(leaf(1, 0, TokenKind::LParen, "call("), ROOT);
        let mut cont_tok = leaf(2, 1, TokenKind::Symbol, "x");
        cont_tok.lag_newlines = 1;
        let cont = arena.push(cont_tok, ROOT);
        arena.set_children(ROOT, vec![call_open, cont]);

        let anchor_id = arena.token(call_open).id;
        let mut view = NestView::new(&mut arena, ROOT);
        reindent_bracket_continuations(&mut view);
        assert_eq!(arena.token(cont).indent_ref_id, anchor_id);
        assert_eq!(arena.token(call_open).indent_ref_id, anchor_id);
    }

    #[test]
    fn default_options_select_strict_rules() {
        let options = Options::default();
        assert!(options.strict);
    }
}
