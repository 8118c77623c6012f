//! The token row: the unit of the flat and nested parse tables.
//!
//! Every field up to and including `terminal` is immutable identity carried
//! in from the host parser (see [`crate::host`]). Everything after that is
//! derived and mutated by the pipeline stages in [`crate::tokenizer`],
//! [`crate::ignore`], [`crate::cache`], [`crate::nester`], [`crate::normalizer`]
//! and [`crate::visitor`], in that order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identity assigned by the host parser. Never reused within a job.
pub type TokenId = u64;

/// A refined token kind.
///
/// The host parser's kind tags are free-form strings (`SYMBOL`,
/// `LEFT_ASSIGN`, `'{'`, ...). Kinds the engine needs to reason about get a
/// dedicated variant; everything else is carried verbatim in `Other` so the
/// adapter never has to reject a kind it doesn't recognize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Symbol,
    Numeric,
    StringLit,
    Comment,
    LeftAssign,
    EqAssign,
    RightAssign,
    Special(SpecialKind),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Newline,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Tilde,
    Lt,
    Gt,
    Le,
    Ge,
    EqEq,
    Ne,
    And,
    Or,
    Not,
    /// Any host-parser kind this adapter does not special-case.
    Other(String),
}

/// The refinement of the generic `SPECIAL` kind (`%...%` operators).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// `%>%`
    Pipe,
    /// `%in%`
    In,
    /// Any other `%...%` operator.
    Other,
}

impl TokenKind {
    /// Refine a raw `SPECIAL` kind by its literal text.
    pub fn refine_special(text: &str) -> TokenKind {
        TokenKind::Special(match text {
            "%>%" => SpecialKind::Pipe,
            "%in%" => SpecialKind::In,
            _ => SpecialKind::Other,
        })
    }

    /// True for any assignment-operator kind (`<-`, `=`, `->`).
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftAssign | TokenKind::EqAssign | TokenKind::RightAssign
        )
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, TokenKind::Comment)
    }

    pub fn is_open_bracket(&self) -> bool {
        matches!(self, TokenKind::LParen | TokenKind::LBrace | TokenKind::LBracket)
    }

    pub fn is_close_bracket(&self) -> bool {
        matches!(self, TokenKind::RParen | TokenKind::RBrace | TokenKind::RBracket)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Symbol => write!(f, "SYMBOL"),
            TokenKind::Numeric => write!(f, "NUM_CONST"),
            TokenKind::StringLit => write!(f, "STR_CONST"),
            TokenKind::Comment => write!(f, "COMMENT"),
            TokenKind::LeftAssign => write!(f, "LEFT_ASSIGN"),
            TokenKind::EqAssign => write!(f, "EQ_ASSIGN"),
            TokenKind::RightAssign => write!(f, "RIGHT_ASSIGN"),
            TokenKind::Special(SpecialKind::Pipe) => write!(f, "SPECIAL-PIPE"),
            TokenKind::Special(SpecialKind::In) => write!(f, "SPECIAL-IN"),
            TokenKind::Special(SpecialKind::Other) => write!(f, "SPECIAL-OTHER"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Newline => write!(f, "NEWLINE"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::Tilde => write!(f, "'~'"),
            TokenKind::Lt => write!(f, "LT"),
            TokenKind::Gt => write!(f, "GT"),
            TokenKind::Le => write!(f, "LE"),
            TokenKind::Ge => write!(f, "GE"),
            TokenKind::EqEq => write!(f, "EQ"),
            TokenKind::Ne => write!(f, "NE"),
            TokenKind::And => write!(f, "AND"),
            TokenKind::Or => write!(f, "OR"),
            TokenKind::Not => write!(f, "'!'"),
            TokenKind::Other(s) => write!(f, "{}", s),
        }
    }
}

/// One row of the parse table: identity fields from the host parser,
/// positional fields, payload, then the mutable fields the pipeline attaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    // --- identity, from the host parser ---
    pub id: TokenId,
    /// 0 = top-level; negative = comment attached to the following
    /// expression; positive = id of the owning non-terminal.
    pub parent: i64,
    pub line1: u32,
    pub col1: u32,
    pub line2: u32,
    pub col2: u32,
    pub kind: TokenKind,
    pub text: String,
    pub terminal: bool,

    // --- derived/mutable, attached by the pipeline ---
    pub pos_id: u64,
    pub token_before: Option<TokenKind>,
    pub token_after: Option<TokenKind>,
    pub lag_newlines: u32,
    pub newlines: u32,
    pub spaces: u32,
    pub lag_spaces: u32,
    pub multi_line: bool,
    pub indent_ref_id: TokenId,
    pub block: u32,
    pub is_cached: bool,
    pub stylerignore: bool,
}

impl Token {
    /// Build a token straight from host-parser identity fields, with every
    /// derived field at its lifecycle-start default.
    pub fn from_host_row(
        id: TokenId,
        parent: i64,
        line1: u32,
        col1: u32,
        line2: u32,
        col2: u32,
        kind: TokenKind,
        text: String,
        terminal: bool,
    ) -> Self {
        Token {
            id,
            parent,
            line1,
            col1,
            line2,
            col2,
            kind,
            text,
            terminal,
            pos_id: 0,
            token_before: None,
            token_after: None,
            lag_newlines: 0,
            newlines: 0,
            spaces: 0,
            lag_spaces: 0,
            multi_line: line1 != line2,
            indent_ref_id: id,
            block: 0,
            is_cached: false,
            stylerignore: false,
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.parent == 0
    }

    pub fn is_leading_comment(&self) -> bool {
        self.parent < 0
    }
}
