//! A minimal reference [`HostParser`] used by this crate's own tests and
//! available to downstream crates for theirs. It recognizes enough of a
//! dynamically-typed, expression-oriented scripting language's lexical
//! grammar to exercise the pipeline end to end, but does not build a real
//! expression tree — every token it emits is a top-level terminal. Nothing
//! here should be mistaken for a production parser.

use crate::host::{HostParser, ParseError};
use crate::token::{Token, TokenKind};
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t]+")]
enum Lexeme {
    #[regex(r"[A-Za-z.][A-Za-z0-9._]*")]
    Symbol,
    #[regex(r"[0-9]+(\.[0-9]+)?L?")]
    Numeric,
    #[regex(r#""([^"\\]|\\.)*""#)]
    #[regex(r"'([^'\\]|\\.)*'")]
    StringLit,
    #[regex(r"#[^\n]*")]
    Comment,
    #[token("<-")]
    #[token("<<-")]
    LeftAssign,
    #[token("=")]
    EqAssign,
    #[token("->")]
    #[token("->>")]
    RightAssign,
    #[regex(r"%[A-Za-z>]*%")]
    Special,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token("\n")]
    Newline,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("==")]
    EqEq,
    #[token("!=")]
    Ne,
    #[token("&")]
    #[token("&&")]
    And,
    #[token("|")]
    #[token("||")]
    Or,
    #[token("!")]
    Not,
}

impl From<Lexeme> for TokenKind {
    fn from(l: Lexeme) -> TokenKind {
        match l {
            Lexeme::Symbol => TokenKind::Symbol,
            Lexeme::Numeric => TokenKind::Numeric,
            Lexeme::StringLit => TokenKind::StringLit,
            Lexeme::Comment => TokenKind::Comment,
            Lexeme::LeftAssign => TokenKind::LeftAssign,
            Lexeme::EqAssign => TokenKind::EqAssign,
            Lexeme::RightAssign => TokenKind::RightAssign,
            Lexeme::Special => TokenKind::Other("SPECIAL".into()),
            Lexeme::LParen => TokenKind::LParen,
            Lexeme::RParen => TokenKind::RParen,
            Lexeme::LBrace => TokenKind::LBrace,
            Lexeme::RBrace => TokenKind::RBrace,
            Lexeme::LBracket => TokenKind::LBracket,
            Lexeme::RBracket => TokenKind::RBracket,
            Lexeme::Comma => TokenKind::Comma,
            Lexeme::Semicolon => TokenKind::Semicolon,
            Lexeme::Newline => TokenKind::Newline,
            Lexeme::Plus => TokenKind::Plus,
            Lexeme::Minus => TokenKind::Minus,
            Lexeme::Star => TokenKind::Star,
            Lexeme::Slash => TokenKind::Slash,
            Lexeme::Caret => TokenKind::Caret,
            Lexeme::Tilde => TokenKind::Tilde,
            Lexeme::Lt => TokenKind::Lt,
            Lexeme::Gt => TokenKind::Gt,
            Lexeme::Le => TokenKind::Le,
            Lexeme::Ge => TokenKind::Ge,
            Lexeme::EqEq => TokenKind::EqEq,
            Lexeme::Ne => TokenKind::Ne,
            Lexeme::And => TokenKind::And,
            Lexeme::Or => TokenKind::Or,
            Lexeme::Not => TokenKind::Not,
        }
    }
}

/// Converts a byte offset into a 1-indexed `(line, col)` pair.
fn line_col(source: &str, byte_offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    for ch in source[..byte_offset].chars() {
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

/// A flat, non-nesting reference tokenizer: every emitted token is a
/// top-level terminal (`parent == 0`). Good enough to drive cache,
/// ignore-region, and serialization tests without a real grammar.
#[derive(Debug, Default)]
pub struct FlatReferenceParser;

impl HostParser for FlatReferenceParser {
    fn parse(&self, source: &str) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Lexeme::lexer(source);
        let mut rows = Vec::new();
        let mut id = 1u64;

        while let Some(result) = lexer.next() {
            let lexeme = result.map_err(|_| {
                let (line, col) = line_col(source, lexer.span().start);
                ParseError::new("unrecognized token").at(line, col)
            })?;
            let span = lexer.span();
            let (line1, col1) = line_col(source, span.start);
            let (line2, col2) = line_col(source, span.end);
            let text = lexer.slice().to_string();
            rows.push(Token::from_host_row(id, 0, line1, col1, line2, col2, lexeme.into(), text, true));
            id += 1;
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_assignment() {
        let parser = FlatReferenceParser;
        let rows = parser.parse("x <- 1").unwrap();
        let kinds: Vec<&TokenKind> = rows.iter().map(|t| &t.kind).collect();
        assert_eq!(kinds, vec![&TokenKind::Symbol, &TokenKind::LeftAssign, &TokenKind::Numeric]);
    }

    #[test]
    fn tokenizes_pipe_as_special() {
        let parser = FlatReferenceParser;
        let rows = parser.parse("x %>% f()").unwrap();
        assert!(rows.iter().any(|t| matches!(&t.kind, TokenKind::Other(s) if s == "SPECIAL")));
    }

    #[test]
    fn rejects_unrecognized_characters() {
        let parser = FlatReferenceParser;
        assert!(parser.parse("x <- `").is_err());
    }
}
