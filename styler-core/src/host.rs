//! The abstraction boundary onto the host language parser.
//!
//! This crate never tokenizes or parses the target language itself.
//! Callers supply a `HostParser` that turns source text into the flat
//! parse table, and the round-trip validator calls back into the same
//! trait object to re-tokenize styled output.

use crate::token::{Token, TokenKind};
use std::fmt;

/// Source does not parse. Surfaced with file:line:col.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub col: Option<u32>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        ParseError {
            message: message.into(),
            file: None,
            line: None,
            col: None,
        }
    }

    pub fn at(mut self, line: u32, col: u32) -> Self {
        self.line = Some(line);
        self.col = Some(col);
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line, self.col) {
            (Some(file), Some(line), Some(col)) => {
                write!(f, "{}:{}:{}: {}", file, line, col, self.message)
            }
            (None, Some(line), Some(col)) => write!(f, "{}:{}: {}", line, col, self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// A single non-comment, non-whitespace token kind/text pair, as compared
/// by the round-trip validator.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticToken {
    pub kind: TokenKind,
    pub text: String,
}

/// Abstract interface onto whatever parser produces this language's parse
/// table.
///
/// Implementors populate every identity field of [`Token`] (via
/// [`Token::from_host_row`]); the tokenizer adapter takes care of the
/// derived fields and the `SPECIAL` kind refinement.
pub trait HostParser: Send + Sync {
    /// Parse `source` into a flat parse table (rows in no particular order;
    /// the tokenizer adapter sorts and stamps `pos_id`).
    fn parse(&self, source: &str) -> Result<Vec<Token>, ParseError>;

    /// Re-tokenize `source` and return the semantic (non-comment) token
    /// sequence used by round-trip validation. The default implementation
    /// calls [`HostParser::parse`] and filters; override it if retokenizing
    /// is cheaper than a full parse.
    fn semantic_tokens(&self, source: &str) -> Result<Vec<SemanticToken>, ParseError> {
        let mut rows = self.parse(source)?;
        rows.sort_by(|a, b| (a.line1, a.col1).cmp(&(b.line1, b.col1)));
        Ok(rows
            .into_iter()
            .filter(|t| t.terminal && !t.kind.is_comment())
            .map(|t| SemanticToken {
                kind: t.kind,
                text: t.text,
            })
            .collect())
    }
}
