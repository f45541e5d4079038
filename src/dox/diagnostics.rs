//! Location-annotated diagnostics collected across files and passes.
//!
//! The toolchain never stops at the first problem: parse failures are
//! per-file, semantic problems are per-entry, and everything is collected
//! here with its source location. Only the caller (the CLI) decides what the
//! final exit code is.

use std::fmt;

use serde::Serialize;

use crate::dox::lexer::Token;
use crate::dox::parser::ParserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One collected problem.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => {
                write!(f, "{}:{}: ", file, line)?;
                if let Some(col) = self.column {
                    write!(f, "{}: ", col)?;
                }
            }
            (Some(file), None) => write!(f, "{}: ", file)?,
            _ => {}
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// The collector threaded through parsing and processing.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message.into(), None, None, None);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message.into(), None, None, None);
    }

    pub fn error_at(&mut self, file: &str, line: u32, message: impl Into<String>) {
        self.push(
            Severity::Error,
            message.into(),
            Some(file.to_string()),
            Some(line),
            None,
        );
    }

    pub fn warning_at(&mut self, file: &str, line: u32, message: impl Into<String>) {
        self.push(
            Severity::Warning,
            message.into(),
            Some(file.to_string()),
            Some(line),
            None,
        );
    }

    pub fn token_error(&mut self, token: &Token, message: impl Into<String>) {
        self.push(
            Severity::Error,
            message.into(),
            Some(token.file.clone()),
            Some(token.line),
            Some(token.column),
        );
    }

    pub fn token_warning(&mut self, token: &Token, message: impl Into<String>) {
        self.push(
            Severity::Warning,
            message.into(),
            Some(token.file.clone()),
            Some(token.line),
            Some(token.column),
        );
    }

    pub fn parser_error(&mut self, err: &ParserError) {
        match &err.token {
            Some(token) => self.token_error(token, err.msg.clone()),
            None => self.error(err.msg.clone()),
        }
    }

    fn push(
        &mut self,
        severity: Severity,
        message: String,
        file: Option<String>,
        line: Option<u32>,
        column: Option<u32>,
    ) {
        self.items.push(Diagnostic {
            severity,
            message,
            file,
            line,
            column,
        });
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.items
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Fold another collector's items into this one, in order.
    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.error_count(),
            self.warning_count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    #[test]
    fn test_counts() {
        let mut diags = Diagnostics::new();
        diags.error("bad");
        diags.warning("meh");
        diags.warning("meh again");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 2);
        assert!(!diags.is_empty());
    }

    #[test]
    fn test_token_location_display() {
        let mut diags = Diagnostics::new();
        let token = tokenize("@class", "a.dox").remove(0);
        diags.token_error(&token, "broken");
        let text = diags.to_string();
        assert!(text.contains("a.dox:1: 1: error: broken"));
    }

    #[test]
    fn test_extend_preserves_order() {
        let mut a = Diagnostics::new();
        a.error("first");
        let mut b = Diagnostics::new();
        b.warning("second");
        a.extend(b);
        assert_eq!(a.items()[0].message, "first");
        assert_eq!(a.items()[1].message, "second");
    }
}
