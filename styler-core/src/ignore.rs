//! The ignore-region scanner: finds `stylerignore start`/`stop` comment
//! pairs and tags every token whose span falls inside one.
//!
//! Runs on the flat parse table, before nesting, so it only needs source
//! order (`pos_id`) and each token's own span.

use crate::error::StyleError;
use crate::token::Token;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFAULT_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^#\s*styler:\s*off\s*$").unwrap());
static DEFAULT_STOP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^#\s*styler:\s*on\s*$").unwrap());

/// Configurable markers. The default pair matches `styler`'s own
/// convention: `# styler: off` / `# styler: on`, compiled once and shared
/// across every job that doesn't override them.
#[derive(Debug, Clone)]
pub struct IgnoreMarkers {
    pub start: Regex,
    pub stop: Regex,
}

impl Default for IgnoreMarkers {
    fn default() -> Self {
        IgnoreMarkers {
            start: DEFAULT_START.clone(),
            stop: DEFAULT_STOP.clone(),
        }
    }
}

/// Scan `rows` for ignore markers and set `stylerignore` on every token
/// whose span lies within a matched region (inclusive of the marker
/// comments themselves).
///
/// An unmatched start (no following stop) or unmatched stop (no preceding
/// start) returns a warning-level [`StyleError::IgnoreMarkerMismatch`] and
/// tags nothing. The engine that calls this treats the error as a signal to
/// leave the whole file untouched rather than risk styling code the
/// (malformed) markers were meant to protect.
pub fn tag_ignored_regions(rows: &mut [Token], markers: &IgnoreMarkers) -> Result<(), StyleError> {
    let mut comment_indices: Vec<usize> = (0..rows.len())
        .filter(|&i| rows[i].terminal && rows[i].kind.is_comment())
        .collect();
    comment_indices.sort_by_key(|&i| rows[i].pos_id);

    let mut ranges: Vec<(u64, u64)> = Vec::new();
    let mut open_start: Option<u64> = None;

    for &i in &comment_indices {
        let text = rows[i].text.trim();
        if markers.start.is_match(text) {
            if open_start.is_some() {
                return Err(StyleError::IgnoreMarkerMismatch {
                    message: format!("nested 'styler: off' at line {}", rows[i].line1),
                });
            }
            open_start = Some(rows[i].pos_id);
        } else if markers.stop.is_match(text) {
            match open_start.take() {
                Some(start_pos) => ranges.push((start_pos, rows[i].pos_id)),
                None => {
                    return Err(StyleError::IgnoreMarkerMismatch {
                        message: format!("'styler: on' with no matching 'off' at line {}", rows[i].line1),
                    });
                }
            }
        }
    }

    if let Some(start_pos) = open_start {
        return Err(StyleError::IgnoreMarkerMismatch {
            message: format!("'styler: off' at pos {} is never closed", start_pos),
        });
    }

    for row in rows.iter_mut() {
        if ranges.iter().any(|&(lo, hi)| row.pos_id >= lo && row.pos_id <= hi) {
            row.stylerignore = true;
        }
    }

    Ok(())
}
