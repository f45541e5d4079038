//! Token-backed text runs.

use std::fmt;

use crate::dox::lexer::Token;

/// A run of tokens with easy concatenation into a string.
///
/// Clause states collect their content as token lists; keeping the tokens
/// (rather than a flat string) preserves source locations for diagnostics
/// and lets the processor re-interpret inline markup later.
///
/// Equality is whitespace-normalized: two runs are equal when they contain
/// the same words in the same order, regardless of how the whitespace
/// between them was tokenized. This is the equivalence the round-trip law
/// is stated over.
#[derive(Debug, Clone, Default)]
pub struct RawText {
    pub tokens: Vec<Token>,
}

impl RawText {
    pub fn new() -> RawText {
        RawText { tokens: Vec::new() }
    }

    pub fn from_tokens(tokens: Vec<Token>) -> RawText {
        RawText { tokens }
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// The concatenated text of all tokens, byte for byte.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// The text with every whitespace run collapsed to a single space and
    /// leading/trailing whitespace removed.
    pub fn normalized(&self) -> String {
        self.text().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Whether the run contains no visible text.
    pub fn is_blank(&self) -> bool {
        self.tokens.iter().all(|t| t.kind.is_whitespace())
    }

    pub fn first_token(&self) -> Option<&Token> {
        self.tokens.first()
    }
}

impl PartialEq for RawText {
    fn eq(&self, other: &RawText) -> bool {
        self.normalized() == other.normalized()
    }
}

impl Eq for RawText {}

impl fmt::Display for RawText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}
