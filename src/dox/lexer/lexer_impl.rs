//! Implementation of the dox lexer.
//!
//! The shape scan is handled entirely by logos; this module attaches the
//! source text, 1-based line/column positions, and the originating file name
//! to every token, and resolves command words against the keyword table.
//!
//! Lexing is total: it has no error state, and any character that matches no
//! dedicated rule becomes (part of) a generic word token.

use logos::Logos;

use crate::dox::lexer::empty_line_transform::transform_empty_lines;
use crate::dox::lexer::tokens::{RawToken, Token, TokenKind, COMMANDS};

/// Tokenize `source`, producing raw tokens without the empty-line transform.
pub fn tokenize(source: &str, file: &str) -> Vec<Token> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut line: u32 = 1;
    let mut column: u32 = 1;

    while let Some(result) = lexer.next() {
        let text = lexer.slice();
        // The rule set covers every character, so scan errors cannot occur;
        // treat one defensively as a word to keep lexing total.
        let shape = result.unwrap_or(RawToken::Stray);
        tokens.push(Token {
            kind: classify(shape, text),
            text: text.to_string(),
            line,
            column,
            file: file.to_string(),
        });
        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
    }

    tokens
}

/// Tokenize `source` and apply the empty-line transform.
///
/// This is the token stream the dox parser consumes.
pub fn lex(source: &str, file: &str) -> Vec<Token> {
    transform_empty_lines(tokenize(source, file))
}

fn classify(shape: RawToken, text: &str) -> TokenKind {
    match shape {
        RawToken::CommandWord => match COMMANDS.get(text) {
            Some(cmd) => TokenKind::Command(*cmd),
            None => TokenKind::Word,
        },
        RawToken::InOutMarker => TokenKind::InOut,
        RawToken::HtmlTag => TokenKind::HtmlTag,
        RawToken::Newline => TokenKind::Break,
        RawToken::Space => TokenKind::Space,
        RawToken::Word | RawToken::Stray => TokenKind::Word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokens::Command;

    #[test]
    fn test_simple_tokenization() {
        let tokens = tokenize("hello world", "<test>");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![TokenKind::Word, TokenKind::Space, TokenKind::Word]
        );
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[2].text, "world");
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("@class A\n@brief B", "doc.dox");
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[0].column, 1);
        // "A" sits at column 8.
        assert_eq!(tokens[2].line, 1);
        assert_eq!(tokens[2].column, 8);
        // "@brief" starts the second line.
        assert_eq!(tokens[4].line, 2);
        assert_eq!(tokens[4].column, 1);
        assert_eq!(tokens[4].file, "doc.dox");
    }

    #[test]
    fn test_entry_line() {
        let tokens = tokenize("@class Klass The Klass.", "<test>");
        assert_eq!(tokens[0].kind, TokenKind::Command(Command::Class));
        assert_eq!(tokens[2].text, "Klass");
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn test_no_text_lost() {
        let source = "@fn foo\n@brief  Some <b>bold</b> text & more.\n\ncode{x}";
        let reassembled: String = tokenize(source, "<test>")
            .iter()
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(reassembled, source);
    }

    #[test]
    fn test_lex_applies_empty_line_transform() {
        let tokens = lex("a\n\nb", "<test>");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::EmptyLine,
                TokenKind::Word
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("", "<test>").is_empty());
    }

    #[test]
    fn test_code_marker_with_extension() {
        let tokens = tokenize("@code{.cpp}", "<test>");
        assert_eq!(tokens[0].kind, TokenKind::Command(Command::Code));
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert_eq!(tokens[1].text, "{.cpp}");
    }
}
