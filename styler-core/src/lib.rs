//! The nested-parse-table transformation engine behind the styler crate
//! family: turns a host parser's flat output into a fully nested tree,
//! applies a style guide's rules phase by phase, and serializes the result
//! back to text, guarded end to end by round-trip validation.

pub mod arena;
pub mod cache;
pub mod engine;
pub mod error;
pub mod host;
pub mod ignore;
pub mod nester;
pub mod normalizer;
pub mod options;
pub mod rules;
pub mod serializer;
pub mod token;
pub mod tokenizer;
pub mod validator;
pub mod visitor;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use arena::{Arena, NodeId};
pub use engine::Engine;
pub use error::StyleError;
pub use host::{HostParser, ParseError, SemanticToken};
pub use options::{Dry, Filetype, Options, Scope};
pub use rules::{NamedRule, NestView, ReindentionSpec, RuleStrength, StyleGuide};
pub use token::{SpecialKind, Token, TokenId, TokenKind};
