//! Recursive-descent parser over the signature token vocabulary.

use crate::dox::sig::tokens::{tokenize_sig, SigParseError, SigToken, SigTokenKind};

/// What a parsed signature declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigKind {
    Class,
    Struct,
    Concept,
    Enum,
    Function,
    Metafunction,
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TParamKind {
    Typename,
    Class,
}

/// One template parameter from the `template <...>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigTParam {
    pub kind: TParamKind,
    pub name: String,
}

/// One `(type, name)` pair from a function parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigParam {
    pub ty: String,
    pub name: String,
}

/// The structured descriptor of one `@signature` body.
///
/// `return_type` is the leading return type of a function (or the declared
/// type of a variable); `result_name` is the trailing member of a
/// metafunction (`Type` in `Metafunction<T>::Type`); `targs` are the
/// metafunction's angle-bracket arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigEntry {
    pub kind: SigKind,
    pub name: String,
    pub is_tpl: bool,
    pub tparams: Vec<SigTParam>,
    pub params: Vec<SigParam>,
    pub return_type: Option<String>,
    pub result_name: Option<String>,
    pub targs: Vec<String>,
}

impl SigEntry {
    fn new(kind: SigKind, name: String) -> SigEntry {
        SigEntry {
            kind,
            name,
            is_tpl: false,
            tparams: Vec::new(),
            params: Vec::new(),
            return_type: None,
            result_name: None,
            targs: Vec::new(),
        }
    }
}

/// Parse one signature body.
pub fn parse(text: &str) -> Result<SigEntry, SigParseError> {
    SigParser::new(text)?.parse()
}

/// Cursor-based recursive descent over [`SigToken`]s.
pub struct SigParser {
    tokens: Vec<SigToken>,
    pos: usize,
}

impl SigParser {
    pub fn new(text: &str) -> Result<SigParser, SigParseError> {
        Ok(SigParser {
            tokens: tokenize_sig(text)?,
            pos: 0,
        })
    }

    pub fn parse(mut self) -> Result<SigEntry, SigParseError> {
        let (is_tpl, tparams) = self.parse_template_header()?;

        // Bare kind declaration: `class Name;` and friends.
        if let Some(kind) = self.peek_decl_kind() {
            self.bump();
            let name = self.expect_ident()?;
            self.accept(SigTokenKind::Semi);
            self.expect_end()?;
            let mut entry = SigEntry::new(kind, name);
            entry.is_tpl = is_tpl;
            entry.tparams = tparams;
            return Ok(entry);
        }

        // Optional leading return/value type, then the declared name.
        let first = self.parse_qualified()?;
        let (return_type, name) = if self.peek() == Some(SigTokenKind::Ident) {
            (Some(first), self.parse_qualified()?)
        } else {
            (None, first)
        };

        let mut entry = match self.peek() {
            Some(SigTokenKind::Lt) => {
                // Metafunction: Name<T1, ...>::Result
                self.bump();
                let mut targs = Vec::new();
                if self.peek() != Some(SigTokenKind::Gt) {
                    loop {
                        targs.push(self.parse_qualified()?);
                        if !self.accept(SigTokenKind::Comma) {
                            break;
                        }
                    }
                }
                self.expect(SigTokenKind::Gt)?;
                self.expect(SigTokenKind::DoubleColon)?;
                let result = self.expect_ident()?;
                let mut entry = SigEntry::new(SigKind::Metafunction, name);
                entry.targs = targs;
                entry.return_type = return_type;
                entry.result_name = Some(result);
                entry
            }
            Some(SigTokenKind::LParen) => {
                // Function or constructor; a missing return type is kept
                // absent, not defaulted.
                self.bump();
                let params = self.parse_params()?;
                let mut entry = SigEntry::new(SigKind::Function, name);
                entry.params = params;
                entry.return_type = return_type;
                entry
            }
            Some(SigTokenKind::Semi) | None => {
                let mut entry = SigEntry::new(SigKind::Variable, name);
                entry.return_type = return_type;
                entry
            }
            Some(other) => {
                return Err(SigParseError::new(format!(
                    "unexpected {:?} after name",
                    other
                )));
            }
        };
        self.accept(SigTokenKind::Semi);
        self.expect_end()?;
        entry.is_tpl = is_tpl;
        entry.tparams = tparams;
        Ok(entry)
    }

    fn parse_template_header(&mut self) -> Result<(bool, Vec<SigTParam>), SigParseError> {
        if self.peek() != Some(SigTokenKind::Template) {
            return Ok((false, Vec::new()));
        }
        self.bump();
        self.expect(SigTokenKind::Lt)?;
        let mut tparams = Vec::new();
        loop {
            let kind = match self.peek() {
                Some(SigTokenKind::Typename) => TParamKind::Typename,
                Some(SigTokenKind::ClassKw) => TParamKind::Class,
                other => {
                    return Err(SigParseError::new(format!(
                        "expected typename or class in template header, got {:?}",
                        other
                    )));
                }
            };
            self.bump();
            let name = self.expect_ident()?;
            tparams.push(SigTParam { kind, name });
            if !self.accept(SigTokenKind::Comma) {
                break;
            }
        }
        self.expect(SigTokenKind::Gt)?;
        Ok((true, tparams))
    }

    /// `Ident`, optionally continued by `::`/`#` qualifier segments. The
    /// qualifier always introduces a second identifier that is concatenated
    /// into the name.
    fn parse_qualified(&mut self) -> Result<String, SigParseError> {
        let mut name = self.expect_ident()?;
        loop {
            let sep = match self.peek() {
                Some(SigTokenKind::DoubleColon) => "::",
                Some(SigTokenKind::Hash) => "#",
                _ => break,
            };
            if self.peek_at(1) != Some(SigTokenKind::Ident) {
                break;
            }
            self.bump();
            name.push_str(sep);
            name.push_str(&self.expect_ident()?);
        }
        Ok(name)
    }

    /// Comma-separated `(type, name)` list; the opening paren is consumed.
    fn parse_params(&mut self) -> Result<Vec<SigParam>, SigParseError> {
        let mut params = Vec::new();
        if self.accept(SigTokenKind::RParen) {
            return Ok(params);
        }
        loop {
            let mut run: Vec<SigToken> = Vec::new();
            let mut depth = 0usize;
            loop {
                let token = self
                    .tokens
                    .get(self.pos)
                    .cloned()
                    .ok_or_else(|| SigParseError::new("unterminated parameter list"))?;
                match token.kind {
                    SigTokenKind::Lt | SigTokenKind::LParen => depth += 1,
                    SigTokenKind::Gt | SigTokenKind::RParen if depth > 0 => depth -= 1,
                    SigTokenKind::RParen | SigTokenKind::Comma if depth == 0 => break,
                    _ => {}
                }
                run.push(token);
                self.pos += 1;
            }
            if !run.is_empty() {
                params.push(param_from_run(run));
            }
            if self.accept(SigTokenKind::Comma) {
                continue;
            }
            self.expect(SigTokenKind::RParen)?;
            break;
        }
        Ok(params)
    }

    fn peek_decl_kind(&self) -> Option<SigKind> {
        match self.peek()? {
            SigTokenKind::ClassKw => Some(SigKind::Class),
            SigTokenKind::StructKw => Some(SigKind::Struct),
            SigTokenKind::ConceptKw => Some(SigKind::Concept),
            SigTokenKind::EnumKw => Some(SigKind::Enum),
            _ => None,
        }
    }

    fn peek(&self) -> Option<SigTokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_at(&self, offset: usize) -> Option<SigTokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn accept(&mut self, kind: SigTokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SigTokenKind) -> Result<(), SigParseError> {
        if self.accept(kind) {
            Ok(())
        } else {
            Err(SigParseError::new(format!(
                "expected {:?}, got {:?}",
                kind,
                self.peek()
            )))
        }
    }

    fn expect_ident(&mut self) -> Result<String, SigParseError> {
        match self.tokens.get(self.pos) {
            Some(t) if t.kind == SigTokenKind::Ident => {
                let text = t.text.clone();
                self.pos += 1;
                Ok(text)
            }
            other => Err(SigParseError::new(format!(
                "expected identifier, got {:?}",
                other.map(|t| t.kind)
            ))),
        }
    }

    fn expect_end(&mut self) -> Result<(), SigParseError> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(SigParseError::new(format!(
                "trailing {:?} after declaration",
                self.peek()
            )))
        }
    }
}

fn param_from_run(run: Vec<SigToken>) -> SigParam {
    if run.len() == 1 {
        return SigParam {
            ty: String::new(),
            name: run[0].text.clone(),
        };
    }
    if run.last().map(|t| t.kind) == Some(SigTokenKind::Ident) {
        SigParam {
            ty: join_tokens(&run[..run.len() - 1]),
            name: run[run.len() - 1].text.clone(),
        }
    } else {
        SigParam {
            ty: join_tokens(&run),
            name: String::new(),
        }
    }
}

/// Re-join type tokens: spaces between identifier-like tokens and before
/// `*`/`&`, nothing around qualifiers and brackets.
fn join_tokens(tokens: &[SigToken]) -> String {
    let mut out = String::new();
    for (i, t) in tokens.iter().enumerate() {
        if i > 0 {
            let prev = tokens[i - 1].kind;
            let space = (prev.is_wordy() && t.kind.is_wordy())
                || (prev.is_wordy()
                    && matches!(t.kind, SigTokenKind::Star | SigTokenKind::Amp));
            if space {
                out.push(' ');
            }
        }
        out.push_str(&t.text);
    }
    out
}
