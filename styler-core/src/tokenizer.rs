//! The tokenizer adapter: turns whatever a host parser hands back into a
//! uniform flat parse table.
//!
//! Assigns the stable `pos_id` ordering key, fills `token_before`/
//! `token_after`, and refines under-specified token kinds.

use crate::host::{HostParser, ParseError};
use crate::token::{Token, TokenKind};

/// Build the flat parse table for `source` using `parser`.
///
/// On failure returns [`ParseError`]; callers may fall back to emitting the
/// original text unchanged.
pub fn adapt(parser: &dyn HostParser, source: &str) -> Result<Vec<Token>, ParseError> {
    let mut rows = parser.parse(source)?;
    refine_special_kinds(&mut rows);
    assign_pos_ids(&mut rows);
    assign_token_neighbors(&mut rows);
    assign_original_spacing(&mut rows);
    Ok(rows)
}

/// Refine the generic `SPECIAL` kind into `%>%`/`%in%`/other.
fn refine_special_kinds(rows: &mut [Token]) {
    for row in rows.iter_mut() {
        if matches!(&row.kind, TokenKind::Other(marker) if marker == "SPECIAL") {
            row.kind = TokenKind::refine_special(&row.text);
        }
    }
}

/// Stable ordering key: lexicographic on `(line1, col1)`, tie-broken by
/// `(line2 desc, col2 desc)` so an enclosing non-terminal sorts before its
/// first child when they share a start position, then by `id` for full
/// determinism.
fn assign_pos_ids(rows: &mut [Token]) {
    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.sort_by_key(|&i| {
        let t = &rows[i];
        (t.line1, t.col1, std::cmp::Reverse(t.line2), std::cmp::Reverse(t.col2), t.id)
    });
    for (pos, &i) in indices.iter().enumerate() {
        rows[i].pos_id = pos as u64;
    }
}

/// Fill `token_before`/`token_after` from the terminal sequence only: the
/// kind of the previous/next terminal in source order.
fn assign_token_neighbors(rows: &mut [Token]) {
    let mut terminal_indices: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].terminal).collect();
    terminal_indices.sort_by_key(|&i| rows[i].pos_id);

    for w in 0..terminal_indices.len() {
        let cur = terminal_indices[w];
        let before = if w > 0 {
            Some(rows[terminal_indices[w - 1]].kind.clone())
        } else {
            None
        };
        let after = if w + 1 < terminal_indices.len() {
            Some(rows[terminal_indices[w + 1]].kind.clone())
        } else {
            None
        };
        rows[cur].token_before = before;
        rows[cur].token_after = after;
    }
}

/// Seed `lag_newlines`/`lag_spaces` from each terminal's span delta against
/// the terminal before it, so a token nothing ever rewrites still
/// serializes exactly as it appeared in the source, and a `stylerignore`d
/// run reproduces its original layout untouched.
fn assign_original_spacing(rows: &mut [Token]) {
    let mut terminal_indices: Vec<usize> = (0..rows.len()).filter(|&i| rows[i].terminal).collect();
    terminal_indices.sort_by_key(|&i| rows[i].pos_id);

    for w in 1..terminal_indices.len() {
        let prev = terminal_indices[w - 1];
        let cur = terminal_indices[w];
        let (prev_line2, prev_col2) = (rows[prev].line2, rows[prev].col2);
        let (line1, col1) = (rows[cur].line1, rows[cur].col1);
        let newline_gap = line1.saturating_sub(prev_line2);
        let space_gap = if newline_gap == 0 { col1.saturating_sub(prev_col2) } else { col1.saturating_sub(1) };
        rows[cur].lag_newlines = newline_gap;
        rows[cur].lag_spaces = space_gap;
    }
}
