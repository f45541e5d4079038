//! Parser error type.

use std::fmt;

use crate::dox::lexer::Token;

/// Raised when the token stream violates the dox grammar.
///
/// Carries the offending token when one is available so the batch driver can
/// report a `file:line:column` location.
#[derive(Debug, Clone)]
pub struct ParserError {
    pub msg: String,
    pub token: Option<Token>,
}

impl ParserError {
    pub fn new(msg: impl Into<String>) -> ParserError {
        ParserError {
            msg: msg.into(),
            token: None,
        }
    }

    pub fn at(token: Token, msg: impl Into<String>) -> ParserError {
        ParserError {
            msg: msg.into(),
            token: Some(token),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.token {
            Some(t) => write!(
                f,
                "parse error at {}:{}:{} ({:?}): {}",
                t.file, t.line, t.column, t.text, self.msg
            ),
            None => write!(f, "parse error: {}", self.msg),
        }
    }
}

impl std::error::Error for ParserError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    #[test]
    fn test_display_with_token() {
        let token = tokenize("@bogus", "doc.dox").remove(0);
        let err = ParserError::at(token, "unexpected token");
        let text = err.to_string();
        assert!(text.contains("doc.dox:1:1"));
        assert!(text.contains("unexpected token"));
        assert!(text.contains("@bogus"));
    }

    #[test]
    fn test_display_without_token() {
        assert_eq!(
            ParserError::new("oops").to_string(),
            "parse error: oops"
        );
    }
}
