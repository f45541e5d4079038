//! Token definitions for dox annotation text.
//!
//! The scanner classifies input into shape classes with the logos derive
//! macro; command words are then resolved against the keyword table so that
//! unknown `@words` stay ordinary words. No input is ever dropped: every
//! token keeps the exact source text it was scanned from.

use logos::Logos;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Raw shape classes produced by the logos scanner.
///
/// These are internal; [`lexer_impl`](super::lexer_impl) maps them to
/// [`TokenKind`] after resolving command keywords.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub(crate) enum RawToken {
    // An @-prefixed command candidate. Resolved against COMMANDS; unknown
    // candidates classify as plain words.
    #[regex(r"@[a-zA-Z]+", priority = 5)]
    CommandWord,

    // Parameter direction markers, attached right after @param.
    #[token("[in]", priority = 10)]
    #[token("[out]", priority = 10)]
    #[token("[in,out]", priority = 10)]
    InOutMarker,

    // HTML-looking tags such as <i> or </tt>. Header paths like
    // <demo/base.h> also scan as one tag token; only the processor decides
    // whether tag semantics apply.
    #[regex(r"</?[a-zA-Z][^<>\n]*>", priority = 6)]
    HtmlTag,

    #[token("\n", priority = 4)]
    Newline,

    #[regex(r"[ \t\r]+", priority = 3)]
    Space,

    #[regex(r"[^ \t\r\n<>@]+", priority = 2)]
    Word,

    // Stray markup characters that formed neither a tag nor a command.
    #[regex(r"[<>@]", priority = 1)]
    Stray,
}

/// Every `@command` keyword the lexer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Command {
    // Item-starting commands.
    Class,
    Concept,
    Fn,
    Mfn,
    Macro,
    Enum,
    Typedef,
    Adaption,
    Var,
    Val,
    Tag,
    Page,
    MainPage,
    Defgroup,
    // Clause-starting commands.
    Signature,
    Code,
    HtmlOnly,
    Brief,
    Extends,
    Implements,
    Headerfile,
    Deprecated,
    Note,
    Warning,
    Aka,
    Internal,
    See,
    Param,
    TParam,
    Return,
    Throw,
    DataRace,
    Section,
    Subsection,
    Include,
    Snippet,
    // Explicit end markers; only valid inside their verbatim clause.
    EndCode,
    EndHtmlOnly,
    // Inline commands carried through as part of running text.
    Link,
    EndLink,
}

impl Command {
    /// The literal keyword, including the `@` prefix.
    pub fn keyword(&self) -> &'static str {
        use Command::*;
        match self {
            Class => "@class",
            Concept => "@concept",
            Fn => "@fn",
            Mfn => "@mfn",
            Macro => "@macro",
            Enum => "@enum",
            Typedef => "@typedef",
            Adaption => "@adaption",
            Var => "@var",
            Val => "@val",
            Tag => "@tag",
            Page => "@page",
            MainPage => "@mainpage",
            Defgroup => "@defgroup",
            Signature => "@signature",
            Code => "@code",
            HtmlOnly => "@htmlonly",
            Brief => "@brief",
            Extends => "@extends",
            Implements => "@implements",
            Headerfile => "@headerfile",
            Deprecated => "@deprecated",
            Note => "@note",
            Warning => "@warning",
            Aka => "@aka",
            Internal => "@internal",
            See => "@see",
            Param => "@param",
            TParam => "@tparam",
            Return => "@return",
            Throw => "@throw",
            DataRace => "@datarace",
            Section => "@section",
            Subsection => "@subsection",
            Include => "@include",
            Snippet => "@snippet",
            EndCode => "@endcode",
            EndHtmlOnly => "@endhtmlonly",
            Link => "@link",
            EndLink => "@endlink",
        }
    }

    /// Whether this command opens a new top-level documentation item.
    pub fn is_item_starting(&self) -> bool {
        use Command::*;
        matches!(
            self,
            Class
                | Concept
                | Fn
                | Mfn
                | Macro
                | Enum
                | Typedef
                | Adaption
                | Var
                | Val
                | Tag
                | Page
                | MainPage
                | Defgroup
        )
    }

    /// Whether this command opens a clause inside an entry body.
    pub fn is_clause_starting(&self) -> bool {
        use Command::*;
        matches!(
            self,
            Signature
                | Code
                | HtmlOnly
                | Brief
                | Extends
                | Implements
                | Headerfile
                | Deprecated
                | Note
                | Warning
                | Aka
                | Internal
                | See
                | Param
                | TParam
                | Return
                | Throw
                | DataRace
                | Section
                | Subsection
                | Include
                | Snippet
        )
    }

    /// Whether this command is inline markup that stays part of running text.
    pub fn is_inline(&self) -> bool {
        matches!(self, Command::Link | Command::EndLink)
    }
}

/// Keyword table resolving command words to [`Command`] values.
pub(crate) static COMMANDS: Lazy<HashMap<&'static str, Command>> = Lazy::new(|| {
    use Command::*;
    let all = [
        Class, Concept, Fn, Mfn, Macro, Enum, Typedef, Adaption, Var, Val, Tag, Page, MainPage,
        Defgroup, Signature, Code, HtmlOnly, Brief, Extends, Implements, Headerfile, Deprecated,
        Note, Warning, Aka, Internal, See, Param, TParam, Return, Throw, DataRace, Section,
        Subsection, Include, Snippet, EndCode, EndHtmlOnly, Link, EndLink,
    ];
    all.iter().map(|c| (c.keyword(), *c)).collect()
});

/// The classified kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    Command(Command),
    InOut,
    HtmlTag,
    Word,
    Space,
    Break,
    EmptyLine,
}

impl TokenKind {
    /// Space, line break, or empty line.
    pub fn is_whitespace(&self) -> bool {
        matches!(
            self,
            TokenKind::Space | TokenKind::Break | TokenKind::EmptyLine
        )
    }

    /// Break or empty line; both end an entry's first line.
    pub fn is_line_break(&self) -> bool {
        matches!(self, TokenKind::Break | TokenKind::EmptyLine)
    }
}

/// One lexed token. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: u32,
    pub file: String,
}

impl Token {
    /// A detached word token, mainly useful in tests and synthesized names.
    pub fn word(text: &str) -> Token {
        Token {
            kind: TokenKind::Word,
            text: text.to_string(),
            line: 0,
            column: 0,
            file: String::new(),
        }
    }

    pub fn command(&self) -> Option<Command> {
        match self.kind {
            TokenKind::Command(c) => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Command(c) => write!(f, "<command:{}>", c.keyword()),
            TokenKind::InOut => write!(f, "<inout:{}>", self.text),
            TokenKind::HtmlTag => write!(f, "<tag:{}>", self.text),
            TokenKind::Word => write!(f, "<word:{}>", self.text),
            TokenKind::Space => write!(f, "<space>"),
            TokenKind::Break => write!(f, "<break>"),
            TokenKind::EmptyLine => write!(f, "<emptyline>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, "<test>").into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_command_token() {
        assert_eq!(
            kinds("@brief"),
            vec![TokenKind::Command(Command::Brief)]
        );
    }

    #[test]
    fn test_unknown_command_is_word() {
        assert_eq!(kinds("@bogus"), vec![TokenKind::Word]);
    }

    #[test]
    fn test_command_with_trailing_punctuation_is_word() {
        // "@endlink." must not swallow the period into the command.
        let tokens = tokenize("@endlink.", "<test>");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Command(Command::EndLink));
        assert_eq!(tokens[1].text, ".");
    }

    #[test]
    fn test_in_out_markers() {
        assert_eq!(kinds("[in]"), vec![TokenKind::InOut]);
        assert_eq!(kinds("[out]"), vec![TokenKind::InOut]);
        assert_eq!(kinds("[in,out]"), vec![TokenKind::InOut]);
        assert_eq!(kinds("[inout]"), vec![TokenKind::Word]);
    }

    #[test]
    fn test_html_tag() {
        assert_eq!(kinds("<tt>"), vec![TokenKind::HtmlTag]);
        assert_eq!(kinds("</tt>"), vec![TokenKind::HtmlTag]);
        assert_eq!(kinds("<demo/base.h>"), vec![TokenKind::HtmlTag]);
    }

    #[test]
    fn test_stray_angle_is_word() {
        let tokens = tokenize("a < b", "<test>");
        assert_eq!(
            tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::Word
            ]
        );
        assert_eq!(tokens[2].text, "<");
    }

    #[test]
    fn test_whitespace_and_breaks() {
        assert_eq!(
            kinds("a  \tb\nc"),
            vec![
                TokenKind::Word,
                TokenKind::Space,
                TokenKind::Word,
                TokenKind::Break,
                TokenKind::Word
            ]
        );
    }

    #[test]
    fn test_keyword_table_is_total() {
        for (kw, cmd) in COMMANDS.iter() {
            assert_eq!(cmd.keyword(), *kw);
        }
        assert_eq!(COMMANDS.len(), 40);
    }

    #[test]
    fn test_predicates() {
        assert!(Command::Class.is_item_starting());
        assert!(!Command::Brief.is_item_starting());
        assert!(Command::Brief.is_clause_starting());
        assert!(!Command::EndCode.is_clause_starting());
        assert!(Command::Link.is_inline());
        assert!(TokenKind::Space.is_whitespace());
        assert!(TokenKind::EmptyLine.is_line_break());
        assert!(!TokenKind::Word.is_whitespace());
    }
}
