//! Clause sub-states of the dox parser.
//!
//! One clause is active at a time inside an entry body. Text clauses
//! accumulate whitespace-normalized tokens until a blank line, end of input,
//! or the next clause/item-starting command; verbatim clauses (`@code`,
//! `@htmlonly`) accumulate raw tokens until their explicit end command;
//! the remaining clauses have small shapes of their own (name + text,
//! path + name, heading).

use crate::dox::lexer::{Command, Token, TokenKind};
use crate::dox::raw::body::BodyNode;
use crate::dox::raw::entry::{InOut, RawEntry, RawParam, RawReturn, RawTParam, RawThrow};
use crate::dox::raw::text::RawText;

/// Which clause a [`ClauseState`] is accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Paragraph,
    Signature,
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
    DataRace,
    Param,
    TParam,
    Return,
    Throw,
    Code,
    HtmlOnly,
    Section,
    Subsection,
    Include,
    Snippet,
}

impl ClauseKind {
    /// The clause opened by a clause-starting command.
    pub fn for_command(cmd: Command) -> Option<ClauseKind> {
        match cmd {
            Command::Signature => Some(ClauseKind::Signature),
            Command::Brief => Some(ClauseKind::Brief),
            Command::Extends => Some(ClauseKind::Extends),
            Command::Implements => Some(ClauseKind::Implements),
            Command::Headerfile => Some(ClauseKind::Headerfile),
            Command::Deprecated => Some(ClauseKind::Deprecated),
            Command::Note => Some(ClauseKind::Note),
            Command::Warning => Some(ClauseKind::Warning),
            Command::Aka => Some(ClauseKind::Aka),
            Command::Internal => Some(ClauseKind::Internal),
            Command::See => Some(ClauseKind::See),
            Command::DataRace => Some(ClauseKind::DataRace),
            Command::Param => Some(ClauseKind::Param),
            Command::TParam => Some(ClauseKind::TParam),
            Command::Return => Some(ClauseKind::Return),
            Command::Throw => Some(ClauseKind::Throw),
            Command::Code => Some(ClauseKind::Code),
            Command::HtmlOnly => Some(ClauseKind::HtmlOnly),
            Command::Section => Some(ClauseKind::Section),
            Command::Subsection => Some(ClauseKind::Subsection),
            Command::Include => Some(ClauseKind::Include),
            Command::Snippet => Some(ClauseKind::Snippet),
            _ => None,
        }
    }
}

/// What the clause did with a token.
#[derive(Debug)]
pub enum ClauseFlow {
    Consumed,
    /// The clause is over; an unconsumed token may need re-dispatch.
    End(Option<Token>),
}

/// The active clause accumulator.
#[derive(Debug)]
pub struct ClauseState {
    kind: ClauseKind,
    tokens: Vec<Token>,
    in_out: Option<InOut>,
    name: Option<Token>,
    path: Vec<Token>,
    path_done: bool,
    name_toks: Vec<Token>,
}

impl ClauseState {
    pub fn new(kind: ClauseKind) -> ClauseState {
        ClauseState {
            kind,
            tokens: Vec::new(),
            in_out: None,
            name: None,
            path: Vec::new(),
            path_done: false,
            name_toks: Vec::new(),
        }
    }

    pub fn kind(&self) -> ClauseKind {
        self.kind
    }

    /// Verbatim clauses must see their end command; EOF inside one is an
    /// unterminated-command parse error.
    pub fn is_verbatim(&self) -> bool {
        matches!(self.kind, ClauseKind::Code | ClauseKind::HtmlOnly)
    }

    pub fn handle(&mut self, token: Token) -> ClauseFlow {
        match self.kind {
            ClauseKind::Code => {
                if token.command() == Some(Command::EndCode) {
                    ClauseFlow::End(None)
                } else {
                    self.tokens.push(token);
                    ClauseFlow::Consumed
                }
            }
            ClauseKind::HtmlOnly => {
                if token.command() == Some(Command::EndHtmlOnly) {
                    ClauseFlow::End(None)
                } else {
                    self.tokens.push(token);
                    ClauseFlow::Consumed
                }
            }
            ClauseKind::Include => {
                if token.kind.is_line_break() {
                    ClauseFlow::End(None)
                } else if is_clause_boundary(&token) {
                    ClauseFlow::End(Some(token))
                } else if token.kind == TokenKind::Space && self.path.is_empty() {
                    ClauseFlow::Consumed
                } else {
                    self.path.push(token);
                    ClauseFlow::Consumed
                }
            }
            ClauseKind::Snippet => {
                if token.kind.is_line_break() {
                    ClauseFlow::End(None)
                } else if is_clause_boundary(&token) {
                    ClauseFlow::End(Some(token))
                } else if token.kind == TokenKind::Space {
                    if self.path.is_empty() {
                        // Ignore space before the path.
                    } else if self.name_toks.is_empty() {
                        // First space after the path: switch to the name,
                        // which may itself contain spaces.
                        self.path_done = true;
                    } else {
                        self.name_toks.push(token);
                    }
                    ClauseFlow::Consumed
                } else {
                    if self.path_done {
                        self.name_toks.push(token);
                    } else {
                        self.path.push(token);
                    }
                    ClauseFlow::Consumed
                }
            }
            ClauseKind::Param | ClauseKind::TParam | ClauseKind::Return | ClauseKind::Throw => {
                if token.kind == TokenKind::EmptyLine {
                    ClauseFlow::End(None)
                } else if is_clause_boundary(&token) {
                    ClauseFlow::End(Some(token))
                } else if token.kind == TokenKind::InOut {
                    self.in_out = InOut::from_marker(&token.text);
                    ClauseFlow::Consumed
                } else if self.name.is_none() {
                    if !token.kind.is_whitespace() {
                        self.name = Some(token);
                    }
                    ClauseFlow::Consumed
                } else {
                    self.handle_text(token);
                    ClauseFlow::Consumed
                }
            }
            ClauseKind::Section | ClauseKind::Subsection => {
                if token.kind == TokenKind::EmptyLine {
                    ClauseFlow::End(None)
                } else if is_clause_boundary(&token) {
                    ClauseFlow::End(Some(token))
                } else {
                    self.handle_text(token);
                    ClauseFlow::Consumed
                }
            }
            _ => {
                // Plain text clauses, including implicit paragraphs.
                if token.kind == TokenKind::EmptyLine {
                    ClauseFlow::End(None)
                } else if is_clause_boundary(&token) {
                    ClauseFlow::End(Some(token))
                } else {
                    self.handle_text(token);
                    ClauseFlow::Consumed
                }
            }
        }
    }

    /// Whitespace-aware accumulation: drop space at the start and after
    /// breaks, and let a break swallow the space run before it.
    fn handle_text(&mut self, token: Token) {
        match token.kind {
            TokenKind::Space => {
                match self.tokens.last() {
                    None => {}
                    Some(last) if last.kind.is_line_break() => {}
                    _ => self.tokens.push(token),
                }
            }
            TokenKind::Break => match self.tokens.last_mut() {
                Some(last) if last.kind == TokenKind::Space => *last = token,
                _ => self.tokens.push(token),
            },
            _ => self.tokens.push(token),
        }
    }

    /// Close the clause and produce its typed result.
    pub fn finish(self) -> ClauseResult {
        match self.kind {
            ClauseKind::Paragraph => ClauseResult::Paragraph(normalized(self.tokens)),
            ClauseKind::Signature => ClauseResult::Signature(normalized(self.tokens)),
            ClauseKind::Brief => ClauseResult::Brief(normalized(self.tokens)),
            ClauseKind::Extends => ClauseResult::Extends(normalized(self.tokens)),
            ClauseKind::Implements => ClauseResult::Implements(normalized(self.tokens)),
            ClauseKind::Headerfile => ClauseResult::Headerfile(normalized(self.tokens)),
            ClauseKind::Deprecated => ClauseResult::Deprecated(normalized(self.tokens)),
            ClauseKind::Note => ClauseResult::Note(normalized(self.tokens)),
            ClauseKind::Warning => ClauseResult::Warning(normalized(self.tokens)),
            ClauseKind::Aka => ClauseResult::Aka(normalized(self.tokens)),
            ClauseKind::Internal => ClauseResult::Internal(normalized(self.tokens)),
            ClauseKind::See => ClauseResult::See(normalized(self.tokens)),
            ClauseKind::DataRace => ClauseResult::DataRace(normalized(self.tokens)),
            ClauseKind::Param => ClauseResult::Param(RawParam {
                name: name_text(self.name),
                text: normalized(self.tokens),
                in_out: self.in_out,
            }),
            ClauseKind::TParam => ClauseResult::TParam(RawTParam {
                name: name_text(self.name),
                text: normalized(self.tokens),
            }),
            ClauseKind::Return => ClauseResult::Return(RawReturn {
                ty: name_text(self.name),
                text: normalized(self.tokens),
            }),
            ClauseKind::Throw => ClauseResult::Throw(RawThrow {
                ty: name_text(self.name),
                text: normalized(self.tokens),
            }),
            ClauseKind::Code => ClauseResult::Code(concat_raw(&self.tokens)),
            ClauseKind::HtmlOnly => ClauseResult::HtmlOnly(concat_raw(&self.tokens)),
            ClauseKind::Section => ClauseResult::Section(normalized(self.tokens), 0),
            ClauseKind::Subsection => ClauseResult::Section(normalized(self.tokens), 1),
            ClauseKind::Include => ClauseResult::Include(normalized(self.path)),
            ClauseKind::Snippet => {
                ClauseResult::Snippet(normalized(self.path), normalized(self.name_toks))
            }
        }
    }
}

/// A clause- or item-starting command ends the running clause.
fn is_clause_boundary(token: &Token) -> bool {
    match token.command() {
        Some(cmd) => cmd.is_clause_starting() || cmd.is_item_starting(),
        None => false,
    }
}

/// Collapse space runs to single spaces and strip whitespace at both ends.
pub fn normalize_whitespace(tokens: &mut Vec<Token>) {
    for t in tokens.iter_mut() {
        if t.kind == TokenKind::Space {
            t.text = " ".to_string();
        }
    }
    while tokens.first().is_some_and(|t| t.kind.is_whitespace()) {
        tokens.remove(0);
    }
    while tokens.last().is_some_and(|t| t.kind.is_whitespace()) {
        tokens.pop();
    }
}

fn normalized(mut tokens: Vec<Token>) -> RawText {
    normalize_whitespace(&mut tokens);
    RawText::from_tokens(tokens)
}

fn name_text(name: Option<Token>) -> RawText {
    RawText::from_tokens(name.into_iter().collect())
}

fn concat_raw(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

/// The typed result of a closed clause.
#[derive(Debug)]
pub enum ClauseResult {
    Paragraph(RawText),
    Section(RawText, u8),
    Code(String),
    HtmlOnly(String),
    Include(RawText),
    Snippet(RawText, RawText),
    Signature(RawText),
    Brief(RawText),
    Extends(RawText),
    Implements(RawText),
    Headerfile(RawText),
    Deprecated(RawText),
    Note(RawText),
    Warning(RawText),
    Aka(RawText),
    Internal(RawText),
    See(RawText),
    DataRace(RawText),
    Param(RawParam),
    TParam(RawTParam),
    Return(RawReturn),
    Throw(RawThrow),
}

/// Append a closed clause to the owning entry's matching collection.
///
/// Combinations that the per-kind whitelist rejects can never reach this
/// function; the catch-all arms keep the match total anyway.
pub fn apply_clause(entry: &mut RawEntry, result: ClauseResult) {
    match result {
        ClauseResult::Paragraph(t) => {
            if !t.is_blank() {
                entry.core_mut().body.push(BodyNode::Paragraph(t));
            }
        }
        ClauseResult::Section(heading, level) => {
            entry.core_mut().body.push(BodyNode::Section { heading, level });
        }
        ClauseResult::Code(text) => entry.core_mut().body.push(BodyNode::Code(text)),
        ClauseResult::HtmlOnly(text) => entry.core_mut().body.push(BodyNode::HtmlOnly(text)),
        ClauseResult::Include(path) => entry.core_mut().body.push(BodyNode::Include { path }),
        ClauseResult::Snippet(path, name) => {
            entry.core_mut().body.push(BodyNode::Snippet { path, name });
        }
        ClauseResult::Brief(t) => entry.core_mut().briefs.push(t),
        ClauseResult::See(t) => entry.core_mut().sees.push(t),
        ClauseResult::Signature(t) => {
            if let Some(code) = entry.code_mut() {
                code.signatures.push(t);
            }
        }
        ClauseResult::Headerfile(t) => {
            if let Some(code) = entry.code_mut() {
                code.headerfiles.push(t);
            }
        }
        ClauseResult::Deprecated(t) => {
            if let Some(code) = entry.code_mut() {
                code.deprecation_msgs.push(t);
            }
        }
        ClauseResult::Note(t) => {
            if let Some(code) = entry.code_mut() {
                code.notes.push(t);
            }
        }
        ClauseResult::Warning(t) => {
            if let Some(code) = entry.code_mut() {
                code.warnings.push(t);
            }
        }
        ClauseResult::Aka(t) => {
            if let Some(code) = entry.code_mut() {
                code.akas.push(t);
            }
        }
        ClauseResult::Internal(t) => {
            if let Some(code) = entry.code_mut() {
                code.internals.push(t);
            }
        }
        ClauseResult::Extends(t) => match entry {
            RawEntry::Class(e) => e.extends.push(t),
            RawEntry::Concept(e) => e.extends.push(t),
            _ => {}
        },
        ClauseResult::Implements(t) => {
            if let RawEntry::Class(e) = entry {
                e.implements.push(t);
            }
        }
        ClauseResult::Param(p) => match entry {
            RawEntry::Function(e) => e.params.push(p),
            RawEntry::Macro(e) => e.params.push(p),
            _ => {}
        },
        ClauseResult::TParam(p) => match entry {
            RawEntry::Class(e) => e.tparams.push(p),
            RawEntry::Function(e) => e.tparams.push(p),
            RawEntry::Metafunction(e) => e.tparams.push(p),
            RawEntry::Tag(e) => e.tparams.push(p),
            _ => {}
        },
        ClauseResult::Return(r) => match entry {
            RawEntry::Function(e) => e.returns.push(r),
            RawEntry::Macro(e) => e.returns.push(r),
            RawEntry::Metafunction(e) => e.returns.push(r),
            _ => {}
        },
        ClauseResult::Throw(t) => match entry {
            RawEntry::Function(e) => e.throws.push(t),
            RawEntry::Macro(e) => e.throws.push(t),
            RawEntry::Metafunction(e) => e.throws.push(t),
            _ => {}
        },
        ClauseResult::DataRace(t) => match entry {
            RawEntry::Function(e) => e.dataraces.push(t),
            RawEntry::Macro(e) => e.dataraces.push(t),
            RawEntry::Metafunction(e) => e.dataraces.push(t),
            _ => {}
        },
    }
}
