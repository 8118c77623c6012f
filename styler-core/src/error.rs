//! Error kinds for the styling pipeline: a plain enum with a manual
//! `Display` and `std::error::Error` impl, no `thiserror`/`anyhow`.

use crate::host::ParseError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum StyleError {
    /// Source does not parse. The caller should return the original text
    /// unchanged.
    Parse(ParseError),
    /// Round-trip validation found the output's AST differs from the
    /// input's. Carries a short diff hint; original text should be returned.
    AstDrift { hint: String },
    /// Unbalanced ignore markers. Warning only — no fatal data loss, but no
    /// tokens were tagged for ignoring in the affected file.
    IgnoreMarkerMismatch { message: String },
    /// Unknown filetype, invalid rule configuration, or missing style-guide
    /// identity. Fatal for the call that produced it.
    InvalidOption { message: String },
    /// Cache store failed to read or write. Demoted to a warning by the
    /// caller; the job proceeds without cache.
    CacheIo { message: String },
}

impl fmt::Display for StyleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleError::Parse(e) => write!(f, "parse error: {}", e),
            StyleError::AstDrift { hint } => write!(f, "AST drift after styling: {}", hint),
            StyleError::IgnoreMarkerMismatch { message } => {
                write!(f, "ignore marker mismatch: {}", message)
            }
            StyleError::InvalidOption { message } => write!(f, "invalid option: {}", message),
            StyleError::CacheIo { message } => write!(f, "cache I/O error: {}", message),
        }
    }
}

impl std::error::Error for StyleError {}

impl From<ParseError> for StyleError {
    fn from(e: ParseError) -> Self {
        StyleError::Parse(e)
    }
}

/// Whether an error is fatal (blocks the call) or merely a warning the
/// caller may choose to surface while the job still completes.
impl StyleError {
    pub fn is_warning_only(&self) -> bool {
        matches!(
            self,
            StyleError::IgnoreMarkerMismatch { .. } | StyleError::CacheIo { .. }
        )
    }
}
