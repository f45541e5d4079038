//! Token definitions for the signature grammar.

use logos::Logos;
use std::fmt;

/// Token kinds of the signature vocabulary. Whitespace is skipped; unlike
/// the dox lexer, scanning a signature can fail, which surfaces as a
/// [`SigParseError`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum SigTokenKind {
    #[token("template")]
    Template,
    #[token("typename")]
    Typename,
    #[token("class")]
    ClassKw,
    #[token("struct")]
    StructKw,
    #[token("concept")]
    ConceptKw,
    #[token("enum")]
    EnumKw,
    #[token("::")]
    DoubleColon,
    #[token("#")]
    Hash,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token("*")]
    Star,
    #[token("&")]
    Amp,
    #[token("...")]
    Ellipsis,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

impl SigTokenKind {
    /// Identifier-like tokens that need a space between two of them when
    /// re-joined into a type string.
    pub fn is_wordy(&self) -> bool {
        matches!(
            self,
            SigTokenKind::Ident
                | SigTokenKind::Template
                | SigTokenKind::Typename
                | SigTokenKind::ClassKw
                | SigTokenKind::StructKw
                | SigTokenKind::ConceptKw
                | SigTokenKind::EnumKw
        )
    }
}

/// One signature token with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigToken {
    pub kind: SigTokenKind,
    pub text: String,
}

/// Scan a signature into tokens; fails on characters outside the grammar.
pub fn tokenize_sig(text: &str) -> Result<Vec<SigToken>, SigParseError> {
    let mut lexer = SigTokenKind::lexer(text);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(SigToken {
                kind,
                text: lexer.slice().to_string(),
            }),
            Err(()) => {
                return Err(SigParseError::new(format!(
                    "unexpected character {:?} in signature",
                    lexer.slice()
                )));
            }
        }
    }
    Ok(tokens)
}

/// Raised when a signature does not follow the signature grammar.
///
/// The caller treats the signature as un-indexable and continues; this error
/// never aborts parsing of the owning entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigParseError {
    pub msg: String,
}

impl SigParseError {
    pub fn new(msg: impl Into<String>) -> SigParseError {
        SigParseError { msg: msg.into() }
    }
}

impl fmt::Display for SigParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "signature parse error: {}", self.msg)
    }
}

impl std::error::Error for SigParseError {}
