//! Empty-line transformation for the dox lexer.
//!
//! Clause and paragraph boundaries in dox are defined by blank lines, so the
//! parser wants them as a single semantic token rather than as a pattern of
//! breaks and spaces. This transform rewrites every run of two or more
//! consecutive line breaks (blank lines may carry spaces) into the first
//! `Break` followed by one `EmptyLine` token.
//!
//! The `EmptyLine` token keeps the exact source text it replaced, so
//! verbatim clauses (`@code`, `@htmlonly`) can reconstruct their input
//! byte for byte.

use crate::dox::lexer::tokens::{Token, TokenKind};

/// Rewrite runs of consecutive `Break` tokens into `Break` + `EmptyLine`.
pub fn transform_empty_lines(tokens: Vec<Token>) -> Vec<Token> {
    let mut result: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;

    while i < tokens.len() {
        if tokens[i].kind != TokenKind::Break {
            result.push(tokens[i].clone());
            i += 1;
            continue;
        }

        // Consume the run: the first break ends the current line; every
        // further (space-padded) break is part of the blank-line run.
        let first = tokens[i].clone();
        let mut j = i + 1;
        let mut consumed = String::new();
        loop {
            if j < tokens.len() && tokens[j].kind == TokenKind::Break {
                consumed.push_str(&tokens[j].text);
                j += 1;
            } else if j + 1 < tokens.len()
                && tokens[j].kind == TokenKind::Space
                && tokens[j + 1].kind == TokenKind::Break
            {
                consumed.push_str(&tokens[j].text);
                consumed.push_str(&tokens[j + 1].text);
                j += 2;
            } else {
                break;
            }
        }

        let (line, column, file) = if j > i + 1 {
            let t = &tokens[i + 1];
            (t.line, t.column, t.file.clone())
        } else {
            (first.line, first.column, first.file.clone())
        };
        result.push(first);
        if !consumed.is_empty() {
            result.push(Token {
                kind: TokenKind::EmptyLine,
                text: consumed,
                line,
                column,
                file,
            });
        }
        i = j;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    fn transform(input: &str) -> Vec<Token> {
        transform_empty_lines(tokenize(input, "<test>"))
    }

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_break_unchanged() {
        assert_eq!(
            kinds(&transform("a\nb")),
            vec![TokenKind::Word, TokenKind::Break, TokenKind::Word]
        );
    }

    #[test]
    fn test_double_break_becomes_empty_line() {
        assert_eq!(
            kinds(&transform("a\n\nb")),
            vec![
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::EmptyLine,
                TokenKind::Word
            ]
        );
    }

    #[test]
    fn test_many_breaks_collapse_to_one_empty_line() {
        assert_eq!(
            kinds(&transform("a\n\n\n\nb")),
            vec![
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::EmptyLine,
                TokenKind::Word
            ]
        );
    }

    #[test]
    fn test_blank_line_with_spaces() {
        let tokens = transform("a\n  \nb");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::EmptyLine,
                TokenKind::Word
            ]
        );
        assert_eq!(tokens[2].text, "  \n");
    }

    #[test]
    fn test_text_preserved_exactly() {
        let source = "a\n\n   \n\nb";
        let reassembled: String = transform(source).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(reassembled, source);
    }

    #[test]
    fn test_empty_line_at_start_and_end() {
        assert_eq!(
            kinds(&transform("\n\na\n\n")),
            vec![
                TokenKind::Break,
                TokenKind::EmptyLine,
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::EmptyLine
            ]
        );
    }

    #[test]
    fn test_trailing_space_is_not_a_blank_line() {
        assert_eq!(
            kinds(&transform("a\n ")),
            vec![TokenKind::Word, TokenKind::Break, TokenKind::Space]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(transform("").is_empty());
    }
}
