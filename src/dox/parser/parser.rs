//! The stack-of-states dox parser.
//!
//! `Top` is the bottom of the state stack and only accepts item-starting
//! commands. Each item command pushes an entry state that first collects the
//! entry's first line (name/title, or type/name for variables) and then its
//! body. Inside a body exactly one clause sub-state is active at a time;
//! each entry kind owns an explicit whitelist of the clause commands it
//! accepts. A new item-starting command pops back to `Top` and re-dispatches,
//! finalizing the previous entry.

use std::mem;

use crate::dox::lexer::{lex, Command, Token, TokenKind};
use crate::dox::parser::clauses::{
    apply_clause, normalize_whitespace, ClauseFlow, ClauseKind, ClauseState,
};
use crate::dox::parser::error::ParserError;
use crate::dox::raw::entry::{RawDoc, RawEntry};
use crate::dox::raw::text::RawText;

const CLASS_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::TParam,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Extends,
    Command::Implements,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const CONCEPT_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Extends,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const FUNCTION_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::TParam,
    Command::Param,
    Command::Return,
    Command::Throw,
    Command::DataRace,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const MACRO_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::Param,
    Command::Return,
    Command::Throw,
    Command::DataRace,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const METAFUNCTION_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::TParam,
    Command::Return,
    Command::Throw,
    Command::DataRace,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const PAGE_CLAUSES: &[Command] = &[
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
];

const VARIABLE_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

const TAG_CLAUSES: &[Command] = &[
    Command::Signature,
    Command::Code,
    Command::HtmlOnly,
    Command::See,
    Command::Brief,
    Command::TParam,
    Command::Section,
    Command::Subsection,
    Command::Include,
    Command::Snippet,
    Command::Headerfile,
    Command::Deprecated,
    Command::Note,
    Command::Warning,
    Command::Aka,
    Command::Internal,
];

/// The clause commands an entry kind accepts in its body.
pub fn allowed_clauses(entry: &RawEntry) -> &'static [Command] {
    match entry {
        RawEntry::Class(_) => CLASS_CLAUSES,
        RawEntry::Concept(_) => CONCEPT_CLAUSES,
        RawEntry::Function(_) => FUNCTION_CLAUSES,
        RawEntry::Macro(_) => MACRO_CLAUSES,
        RawEntry::Metafunction(_) => METAFUNCTION_CLAUSES,
        RawEntry::Page(_) | RawEntry::MainPage(_) | RawEntry::Group(_) => PAGE_CLAUSES,
        RawEntry::Variable(_)
        | RawEntry::EnumValue(_)
        | RawEntry::Enum(_)
        | RawEntry::Typedef(_)
        | RawEntry::Adaption(_) => VARIABLE_CLAUSES,
        RawEntry::Tag(_) => TAG_CLAUSES,
    }
}

/// How an entry's first line distributes into its fields.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FirstLineShape {
    /// Name up to the first space, title for the rest.
    NameTitle,
    /// Declared type up to the first space, name for the rest.
    TypeName,
    /// The whole line is the title (`@mainpage`).
    TitleOnly,
}

fn first_line_shape(entry: &RawEntry) -> FirstLineShape {
    match entry {
        RawEntry::Variable(_) | RawEntry::EnumValue(_) => FirstLineShape::TypeName,
        RawEntry::MainPage(_) => FirstLineShape::TitleOnly,
        _ => FirstLineShape::NameTitle,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Substate {
    FirstLine,
    Body,
}

/// What the entry state did with a token.
enum EntryFlow {
    Consumed,
    /// An item-starting command arrived: the entry is complete and the
    /// token must be re-dispatched at `Top`.
    Finished(Token),
}

/// Per-kind entry state: first line, then body with at most one clause.
struct EntryState {
    entry: RawEntry,
    substate: Substate,
    shape: FirstLineShape,
    first: Vec<Token>,
    second: Vec<Token>,
    seen_space: bool,
    clause: Option<ClauseState>,
}

impl EntryState {
    fn new(entry: RawEntry) -> EntryState {
        let shape = first_line_shape(&entry);
        EntryState {
            entry,
            substate: Substate::FirstLine,
            shape,
            first: Vec::new(),
            second: Vec::new(),
            seen_space: false,
            clause: None,
        }
    }

    fn handle(&mut self, token: Token) -> Result<EntryFlow, ParserError> {
        let mut pending = Some(token);
        while let Some(token) = pending.take() {
            match self.substate {
                Substate::FirstLine => self.handle_first_line(token),
                Substate::Body => {
                    if let Some(mut clause) = self.clause.take() {
                        match clause.handle(token) {
                            ClauseFlow::Consumed => self.clause = Some(clause),
                            ClauseFlow::End(next) => {
                                apply_clause(&mut self.entry, clause.finish());
                                pending = next;
                            }
                        }
                        continue;
                    }
                    match token.kind {
                        TokenKind::Command(cmd) if cmd.is_item_starting() => {
                            return Ok(EntryFlow::Finished(token));
                        }
                        TokenKind::Command(cmd) if cmd.is_clause_starting() => {
                            if !allowed_clauses(&self.entry).contains(&cmd) {
                                return Err(self.whitelist_error(token));
                            }
                            if let Some(kind) = ClauseKind::for_command(cmd) {
                                self.clause = Some(ClauseState::new(kind));
                            }
                        }
                        TokenKind::Command(cmd) if !cmd.is_inline() => {
                            // @endcode / @endhtmlonly without an open clause.
                            return Err(ParserError::at(
                                token,
                                "end marker without a matching verbatim clause",
                            ));
                        }
                        kind if kind.is_whitespace() => {}
                        _ => {
                            // Any other token opens an implicit paragraph.
                            self.clause = Some(ClauseState::new(ClauseKind::Paragraph));
                            pending = Some(token);
                        }
                    }
                }
            }
        }
        Ok(EntryFlow::Consumed)
    }

    fn handle_first_line(&mut self, token: Token) {
        if token.kind.is_line_break() {
            self.finish_first_line();
            return;
        }
        match self.shape {
            FirstLineShape::TitleOnly => {
                if !(self.second.is_empty() && token.kind == TokenKind::Space) {
                    self.second.push(token);
                }
            }
            FirstLineShape::NameTitle | FirstLineShape::TypeName => {
                if !self.seen_space {
                    if token.kind == TokenKind::Space {
                        if !self.first.is_empty() {
                            self.seen_space = true;
                        }
                    } else {
                        self.first.push(token);
                    }
                } else if !(self.second.is_empty() && token.kind == TokenKind::Space) {
                    self.second.push(token);
                }
            }
        }
    }

    fn finish_first_line(&mut self) {
        normalize_whitespace(&mut self.first);
        normalize_whitespace(&mut self.second);
        let first = mem::take(&mut self.first);
        let mut second = mem::take(&mut self.second);
        match self.shape {
            FirstLineShape::NameTitle => {
                self.entry.core_mut().name = RawText::from_tokens(first);
                self.entry.core_mut().title = RawText::from_tokens(second);
            }
            FirstLineShape::TypeName => {
                strip_trailing_semicolon(&mut second);
                if let RawEntry::Variable(v) | RawEntry::EnumValue(v) = &mut self.entry {
                    v.var_type = RawText::from_tokens(first);
                    v.core.name = RawText::from_tokens(second);
                }
            }
            FirstLineShape::TitleOnly => {
                self.entry.core_mut().title = RawText::from_tokens(second);
            }
        }
        self.substate = Substate::Body;
    }

    /// Finalize at end of input or when the next item command arrives.
    fn finalize(mut self) -> Result<RawEntry, ParserError> {
        if self.substate == Substate::FirstLine {
            self.finish_first_line();
        }
        if let Some(clause) = self.clause.take() {
            if clause.is_verbatim() {
                let marker = match clause.kind() {
                    ClauseKind::Code => "@code",
                    _ => "@htmlonly",
                };
                return Err(ParserError::new(format!(
                    "unterminated {} clause at end of input",
                    marker
                )));
            }
            apply_clause(&mut self.entry, clause.finish());
        }
        Ok(self.entry)
    }

    fn whitelist_error(&self, token: Token) -> ParserError {
        let allowed = allowed_clauses(&self.entry)
            .iter()
            .map(|c| c.keyword())
            .collect::<Vec<_>>()
            .join(", ");
        let msg = format!(
            "command {} is not allowed in {} entries; allowed commands: {}",
            token.text,
            self.entry.command().keyword(),
            allowed
        );
        ParserError::at(token, msg)
    }
}

enum State {
    Top,
    Entry(EntryState),
}

/// The dox parser: feeds tokens through the state stack and collects
/// finished entries into a [`RawDoc`].
pub struct Parser {
    states: Vec<State>,
    doc: RawDoc,
    file: String,
}

impl Parser {
    pub fn new(file: &str) -> Parser {
        Parser {
            states: vec![State::Top],
            doc: RawDoc::new(),
            file: file.to_string(),
        }
    }

    pub fn handle_token(&mut self, token: Token) -> Result<(), ParserError> {
        let mut pending = Some(token);
        while let Some(token) = pending.take() {
            match self.states.last_mut() {
                Some(State::Entry(state)) => match state.handle(token)? {
                    EntryFlow::Consumed => {}
                    EntryFlow::Finished(next) => {
                        self.leave_entry()?;
                        pending = Some(next);
                    }
                },
                _ => self.handle_top(token)?,
            }
        }
        Ok(())
    }

    fn handle_top(&mut self, token: Token) -> Result<(), ParserError> {
        if token.kind.is_whitespace() {
            return Ok(());
        }
        if let TokenKind::Command(cmd) = token.kind {
            if let Some(entry) = RawEntry::for_command(cmd) {
                self.states.push(State::Entry(EntryState::new(entry)));
                return Ok(());
            }
        }
        let expected = [
            Command::Class,
            Command::Concept,
            Command::Fn,
            Command::Mfn,
            Command::Macro,
            Command::Enum,
            Command::Typedef,
            Command::Adaption,
            Command::Var,
            Command::Val,
            Command::Tag,
            Command::Page,
            Command::MainPage,
            Command::Defgroup,
        ]
        .iter()
        .map(|c| c.keyword())
        .collect::<Vec<_>>()
        .join(", ");
        let msg = format!("expected one of {{{}}}, got {:?}", expected, token.text);
        Err(ParserError::at(token, msg))
    }

    fn leave_entry(&mut self) -> Result<(), ParserError> {
        if let Some(State::Entry(state)) = self.states.pop() {
            let entry = state.finalize()?;
            self.doc.add_entry(entry, &self.file);
        }
        Ok(())
    }

    /// Signal end of input and return the parsed document.
    pub fn finish(mut self) -> Result<RawDoc, ParserError> {
        while matches!(self.states.last(), Some(State::Entry(_))) {
            self.leave_entry()?;
        }
        Ok(self.doc)
    }
}

/// Lex and parse one annotation text.
pub fn parse_text(source: &str, file: &str) -> Result<RawDoc, ParserError> {
    let mut parser = Parser::new(file);
    for token in lex(source, file) {
        parser.handle_token(token)?;
    }
    parser.finish()
}

/// Variable names may carry the declaration's trailing semicolon; drop it so
/// `@var int x;` and `@var int x` name the same entity.
fn strip_trailing_semicolon(tokens: &mut Vec<Token>) {
    if let Some(last) = tokens.last_mut() {
        if last.text.ends_with(';') {
            last.text = last.text.trim_end_matches(';').to_string();
            if last.text.is_empty() {
                tokens.pop();
            }
        }
    }
}
