//! Round-trip validation: confirms that styling did not change what the
//! code means by re-tokenizing the styled output and comparing its
//! semantic token stream (terminal, non-comment kind/text pairs) against
//! the input's.
//!
//! A mismatch is never silently accepted; the caller is expected to return
//! the original text and surface [`crate::error::StyleError::AstDrift`].

use crate::error::StyleError;
use crate::host::HostParser;

/// Compare `original` and `styled` by their semantic token streams. Returns
/// `Ok(())` if they match, or `Err` with a short diff hint at the first
/// point of divergence.
pub fn validate_round_trip(parser: &dyn HostParser, original: &str, styled: &str) -> Result<(), StyleError> {
    let before = parser.semantic_tokens(original)?;
    let after = parser.semantic_tokens(styled)?;

    if before.len() != after.len() {
        return Err(StyleError::AstDrift {
            hint: format!("token count changed: {} -> {}", before.len(), after.len()),
        });
    }

    for (i, (b, a)) in before.iter().zip(after.iter()).enumerate() {
        if b.kind != a.kind || b.text != a.text {
            return Err(StyleError::AstDrift {
                hint: format!(
                    "token {} differs: {:?} {:?} -> {:?} {:?}",
                    i, b.kind, b.text, a.kind, a.text
                ),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{ParseError, SemanticToken};
    use crate::token::{Token, TokenKind};

    struct FixedParser {
        tokens: Vec<SemanticToken>,
    }

    impl HostParser for FixedParser {
        fn parse(&self, _source: &str) -> Result<Vec<Token>, ParseError> {
            Ok(vec![])
        }
        fn semantic_tokens(&self, _source: &str) -> Result<Vec<SemanticToken>, ParseError> {
            Ok(self.tokens.clone())
        }
    }

    #[test]
    fn identical_streams_pass() {
        let parser = FixedParser {
            tokens: vec![SemanticToken {
                kind: TokenKind::Symbol,
                text: "x".into(),
            }],
        };
        assert!(validate_round_trip(&parser, "x", "x ").is_ok());
    }

    #[test]
    fn differing_text_fails() {
        struct TwoFaced;
        impl HostParser for TwoFaced {
            fn parse(&self, _source: &str) -> Result<Vec<Token>, ParseError> {
                Ok(vec![])
            }
            fn semantic_tokens(&self, source: &str) -> Result<Vec<SemanticToken>, ParseError> {
                Ok(vec![SemanticToken {
                    kind: TokenKind::Symbol,
                    text: source.trim().to_string(),
                }])
            }
        }
        let err = validate_round_trip(&TwoFaced, "x", "y").unwrap_err();
        assert!(matches!(err, StyleError::AstDrift { .. }));
    }
}
