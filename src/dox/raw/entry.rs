//! Raw documentation entries.
//!
//! One closed enum variant per entry kind, with the shared fields factored
//! into [`EntryCore`] (every entry) and [`CodeCore`] (code-bearing entries).
//! Clause dispatch over these types is an exhaustive match; there is no
//! dynamic per-kind attribute storage.

use serde::Serialize;

use crate::dox::lexer::{Command, Token};
use crate::dox::raw::body::RawBody;
use crate::dox::raw::text::RawText;

/// The processed-kind taxonomy shared by the raw and processed models.
///
/// Qualified names refine the kind: `Owner::member` names are member kinds,
/// `Owner#member` names are interface/grouped kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum EntryKind {
    Concept,
    Class,
    Specialization,
    GlobalFunction,
    MemberFunction,
    InterfaceFunction,
    GlobalMetafunction,
    InterfaceMetafunction,
    Macro,
    GroupedMacro,
    Enum,
    Adaption,
    GlobalTypedef,
    MemberTypedef,
    GroupedTypedef,
    Variable,
    MemberVariable,
    EnumValue,
    Tag,
    GroupedTag,
    Page,
    Group,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        use EntryKind::*;
        match self {
            Concept => "concept",
            Class => "class",
            Specialization => "specialization",
            GlobalFunction => "global_function",
            MemberFunction => "member_function",
            InterfaceFunction => "interface_function",
            GlobalMetafunction => "global_metafunction",
            InterfaceMetafunction => "interface_metafunction",
            Macro => "macro",
            GroupedMacro => "grouped_macro",
            Enum => "enum",
            Adaption => "adaption",
            GlobalTypedef => "global_typedef",
            MemberTypedef => "member_typedef",
            GroupedTypedef => "grouped_typedef",
            Variable => "variable",
            MemberVariable => "member_variable",
            EnumValue => "enum_value",
            Tag => "tag",
            GroupedTag => "grouped_tag",
            Page => "page",
            Group => "group",
        }
    }

    /// Kinds registered in pass 1 of the document processor.
    pub fn is_top_level(&self) -> bool {
        use EntryKind::*;
        matches!(
            self,
            Concept
                | Class
                | Specialization
                | GlobalFunction
                | GlobalMetafunction
                | Page
                | Tag
                | Group
                | Macro
                | Adaption
                | GlobalTypedef
                | Enum
        )
    }

    /// Kinds registered in pass 2, under a parent top-level entry.
    pub fn is_second_level(&self) -> bool {
        use EntryKind::*;
        matches!(
            self,
            MemberFunction
                | InterfaceFunction
                | InterfaceMetafunction
                | GroupedTag
                | GroupedMacro
                | MemberTypedef
                | GroupedTypedef
        )
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameter mutability marker from `@param[in]` / `[out]` / `[in,out]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InOut {
    In,
    Out,
    InOut,
}

impl InOut {
    pub fn from_marker(text: &str) -> Option<InOut> {
        match text {
            "[in]" => Some(InOut::In),
            "[out]" => Some(InOut::Out),
            "[in,out]" => Some(InOut::InOut),
            _ => None,
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            InOut::In => "[in]",
            InOut::Out => "[out]",
            InOut::InOut => "[in,out]",
        }
    }
}

/// A `@param` clause: name, description, optional direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawParam {
    pub name: RawText,
    pub text: RawText,
    pub in_out: Option<InOut>,
}

/// A `@tparam` clause: template parameter name and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTParam {
    pub name: RawText,
    pub text: RawText,
}

/// A `@return` clause: return type and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawReturn {
    pub ty: RawText,
    pub text: RawText,
}

/// A `@throw` clause: exception type and description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawThrow {
    pub ty: RawText,
    pub text: RawText,
}

/// Fields common to every entry kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryCore {
    pub name: RawText,
    pub title: RawText,
    pub briefs: Vec<RawText>,
    pub body: RawBody,
    pub sees: Vec<RawText>,
}

/// Fields common to code-bearing entry kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeCore {
    pub signatures: Vec<RawText>,
    pub headerfiles: Vec<RawText>,
    pub deprecation_msgs: Vec<RawText>,
    pub notes: Vec<RawText>,
    pub warnings: Vec<RawText>,
    pub akas: Vec<RawText>,
    pub internals: Vec<RawText>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawClass {
    pub core: EntryCore,
    pub code: CodeCore,
    pub extends: Vec<RawText>,
    pub implements: Vec<RawText>,
    pub tparams: Vec<RawTParam>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawConcept {
    pub core: EntryCore,
    pub code: CodeCore,
    pub extends: Vec<RawText>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawFunction {
    pub core: EntryCore,
    pub code: CodeCore,
    pub tparams: Vec<RawTParam>,
    pub params: Vec<RawParam>,
    pub returns: Vec<RawReturn>,
    pub throws: Vec<RawThrow>,
    pub dataraces: Vec<RawText>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMacro {
    pub core: EntryCore,
    pub code: CodeCore,
    pub params: Vec<RawParam>,
    pub returns: Vec<RawReturn>,
    pub throws: Vec<RawThrow>,
    pub dataraces: Vec<RawText>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetafunction {
    pub core: EntryCore,
    pub code: CodeCore,
    pub tparams: Vec<RawTParam>,
    pub returns: Vec<RawReturn>,
    pub throws: Vec<RawThrow>,
    pub dataraces: Vec<RawText>,
}

/// Shared shape for `@enum`, `@typedef`, and `@adaption` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCodeEntry {
    pub core: EntryCore,
    pub code: CodeCore,
}

/// `@var` and `@val` entries; the declared type precedes the name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawVariable {
    pub core: EntryCore,
    pub code: CodeCore,
    pub var_type: RawText,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTag {
    pub core: EntryCore,
    pub code: CodeCore,
    pub tparams: Vec<RawTParam>,
}

/// Shared shape for `@page`, `@mainpage`, and `@defgroup` entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub core: EntryCore,
}

/// One parsed documentation entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry {
    Class(RawClass),
    Concept(RawConcept),
    Function(RawFunction),
    Metafunction(RawMetafunction),
    Macro(RawMacro),
    Enum(RawCodeEntry),
    Typedef(RawCodeEntry),
    Adaption(RawCodeEntry),
    Variable(RawVariable),
    EnumValue(RawVariable),
    Tag(RawTag),
    Page(RawPage),
    MainPage(RawPage),
    Group(RawPage),
}

impl RawEntry {
    /// An empty entry for the given item-starting command.
    pub fn for_command(cmd: Command) -> Option<RawEntry> {
        match cmd {
            Command::Class => Some(RawEntry::Class(RawClass::default())),
            Command::Concept => Some(RawEntry::Concept(RawConcept::default())),
            Command::Fn => Some(RawEntry::Function(RawFunction::default())),
            Command::Mfn => Some(RawEntry::Metafunction(RawMetafunction::default())),
            Command::Macro => Some(RawEntry::Macro(RawMacro::default())),
            Command::Enum => Some(RawEntry::Enum(RawCodeEntry::default())),
            Command::Typedef => Some(RawEntry::Typedef(RawCodeEntry::default())),
            Command::Adaption => Some(RawEntry::Adaption(RawCodeEntry::default())),
            Command::Var => Some(RawEntry::Variable(RawVariable::default())),
            Command::Val => Some(RawEntry::EnumValue(RawVariable::default())),
            Command::Tag => Some(RawEntry::Tag(RawTag::default())),
            Command::Page => Some(RawEntry::Page(RawPage::default())),
            Command::MainPage => Some(RawEntry::MainPage(RawPage::default())),
            Command::Defgroup => Some(RawEntry::Group(RawPage::default())),
            _ => None,
        }
    }

    /// The item-starting command that introduces this entry kind.
    pub fn command(&self) -> Command {
        match self {
            RawEntry::Class(_) => Command::Class,
            RawEntry::Concept(_) => Command::Concept,
            RawEntry::Function(_) => Command::Fn,
            RawEntry::Metafunction(_) => Command::Mfn,
            RawEntry::Macro(_) => Command::Macro,
            RawEntry::Enum(_) => Command::Enum,
            RawEntry::Typedef(_) => Command::Typedef,
            RawEntry::Adaption(_) => Command::Adaption,
            RawEntry::Variable(_) => Command::Var,
            RawEntry::EnumValue(_) => Command::Val,
            RawEntry::Tag(_) => Command::Tag,
            RawEntry::Page(_) => Command::Page,
            RawEntry::MainPage(_) => Command::MainPage,
            RawEntry::Group(_) => Command::Defgroup,
        }
    }

    pub fn core(&self) -> &EntryCore {
        match self {
            RawEntry::Class(e) => &e.core,
            RawEntry::Concept(e) => &e.core,
            RawEntry::Function(e) => &e.core,
            RawEntry::Metafunction(e) => &e.core,
            RawEntry::Macro(e) => &e.core,
            RawEntry::Enum(e) => &e.core,
            RawEntry::Typedef(e) => &e.core,
            RawEntry::Adaption(e) => &e.core,
            RawEntry::Variable(e) => &e.core,
            RawEntry::EnumValue(e) => &e.core,
            RawEntry::Tag(e) => &e.core,
            RawEntry::Page(e) => &e.core,
            RawEntry::MainPage(e) => &e.core,
            RawEntry::Group(e) => &e.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut EntryCore {
        match self {
            RawEntry::Class(e) => &mut e.core,
            RawEntry::Concept(e) => &mut e.core,
            RawEntry::Function(e) => &mut e.core,
            RawEntry::Metafunction(e) => &mut e.core,
            RawEntry::Macro(e) => &mut e.core,
            RawEntry::Enum(e) => &mut e.core,
            RawEntry::Typedef(e) => &mut e.core,
            RawEntry::Adaption(e) => &mut e.core,
            RawEntry::Variable(e) => &mut e.core,
            RawEntry::EnumValue(e) => &mut e.core,
            RawEntry::Tag(e) => &mut e.core,
            RawEntry::Page(e) => &mut e.core,
            RawEntry::MainPage(e) => &mut e.core,
            RawEntry::Group(e) => &mut e.core,
        }
    }

    pub fn code(&self) -> Option<&CodeCore> {
        match self {
            RawEntry::Class(e) => Some(&e.code),
            RawEntry::Concept(e) => Some(&e.code),
            RawEntry::Function(e) => Some(&e.code),
            RawEntry::Metafunction(e) => Some(&e.code),
            RawEntry::Macro(e) => Some(&e.code),
            RawEntry::Enum(e) => Some(&e.code),
            RawEntry::Typedef(e) => Some(&e.code),
            RawEntry::Adaption(e) => Some(&e.code),
            RawEntry::Variable(e) => Some(&e.code),
            RawEntry::EnumValue(e) => Some(&e.code),
            RawEntry::Tag(e) => Some(&e.code),
            RawEntry::Page(_) | RawEntry::MainPage(_) | RawEntry::Group(_) => None,
        }
    }

    pub fn code_mut(&mut self) -> Option<&mut CodeCore> {
        match self {
            RawEntry::Class(e) => Some(&mut e.code),
            RawEntry::Concept(e) => Some(&mut e.code),
            RawEntry::Function(e) => Some(&mut e.code),
            RawEntry::Metafunction(e) => Some(&mut e.code),
            RawEntry::Macro(e) => Some(&mut e.code),
            RawEntry::Enum(e) => Some(&mut e.code),
            RawEntry::Typedef(e) => Some(&mut e.code),
            RawEntry::Adaption(e) => Some(&mut e.code),
            RawEntry::Variable(e) => Some(&mut e.code),
            RawEntry::EnumValue(e) => Some(&mut e.code),
            RawEntry::Tag(e) => Some(&mut e.code),
            RawEntry::Page(_) | RawEntry::MainPage(_) | RawEntry::Group(_) => None,
        }
    }

    pub fn extends_list(&self) -> Option<&[RawText]> {
        match self {
            RawEntry::Class(e) => Some(&e.extends),
            RawEntry::Concept(e) => Some(&e.extends),
            _ => None,
        }
    }

    pub fn implements_list(&self) -> Option<&[RawText]> {
        match self {
            RawEntry::Class(e) => Some(&e.implements),
            _ => None,
        }
    }

    pub fn tparams_list(&self) -> Option<&[RawTParam]> {
        match self {
            RawEntry::Class(e) => Some(&e.tparams),
            RawEntry::Function(e) => Some(&e.tparams),
            RawEntry::Metafunction(e) => Some(&e.tparams),
            RawEntry::Tag(e) => Some(&e.tparams),
            _ => None,
        }
    }

    pub fn params_list(&self) -> Option<&[RawParam]> {
        match self {
            RawEntry::Function(e) => Some(&e.params),
            RawEntry::Macro(e) => Some(&e.params),
            _ => None,
        }
    }

    pub fn returns_list(&self) -> Option<&[RawReturn]> {
        match self {
            RawEntry::Function(e) => Some(&e.returns),
            RawEntry::Macro(e) => Some(&e.returns),
            RawEntry::Metafunction(e) => Some(&e.returns),
            _ => None,
        }
    }

    pub fn throws_list(&self) -> Option<&[RawThrow]> {
        match self {
            RawEntry::Function(e) => Some(&e.throws),
            RawEntry::Macro(e) => Some(&e.throws),
            RawEntry::Metafunction(e) => Some(&e.throws),
            _ => None,
        }
    }

    pub fn dataraces_list(&self) -> Option<&[RawText]> {
        match self {
            RawEntry::Function(e) => Some(&e.dataraces),
            RawEntry::Macro(e) => Some(&e.dataraces),
            RawEntry::Metafunction(e) => Some(&e.dataraces),
            _ => None,
        }
    }

    /// The entry's registered name.
    ///
    /// `@mainpage` entries have no authored name and register under the
    /// fixed name `mainpage`.
    pub fn name_text(&self) -> String {
        match self {
            RawEntry::MainPage(_) => "mainpage".to_string(),
            _ => self.core().name.normalized(),
        }
    }

    pub fn title_text(&self) -> String {
        self.core().title.normalized()
    }

    /// The processed kind, refined by the qualified-name convention.
    pub fn kind(&self) -> EntryKind {
        let name = self.name_text();
        let interface = name.contains('#');
        let member = name.contains("::");
        match self {
            RawEntry::Class(_) => EntryKind::Class,
            RawEntry::Concept(_) => EntryKind::Concept,
            RawEntry::Function(_) => {
                if interface {
                    EntryKind::InterfaceFunction
                } else if member {
                    EntryKind::MemberFunction
                } else {
                    EntryKind::GlobalFunction
                }
            }
            RawEntry::Metafunction(_) => {
                if interface {
                    EntryKind::InterfaceMetafunction
                } else {
                    EntryKind::GlobalMetafunction
                }
            }
            RawEntry::Macro(_) => {
                if interface {
                    EntryKind::GroupedMacro
                } else {
                    EntryKind::Macro
                }
            }
            RawEntry::Enum(_) => EntryKind::Enum,
            RawEntry::Typedef(_) => {
                if interface {
                    EntryKind::GroupedTypedef
                } else if member {
                    EntryKind::MemberTypedef
                } else {
                    EntryKind::GlobalTypedef
                }
            }
            RawEntry::Adaption(_) => EntryKind::Adaption,
            RawEntry::Variable(_) => {
                if member {
                    EntryKind::MemberVariable
                } else {
                    EntryKind::Variable
                }
            }
            RawEntry::EnumValue(_) => EntryKind::EnumValue,
            RawEntry::Tag(_) => {
                if interface {
                    EntryKind::GroupedTag
                } else {
                    EntryKind::Tag
                }
            }
            RawEntry::Page(_) | RawEntry::MainPage(_) => EntryKind::Page,
            RawEntry::Group(_) => EntryKind::Group,
        }
    }

    /// Source location of the entry, taken from its first name or title token.
    pub fn location(&self) -> Option<&Token> {
        self.core()
            .name
            .first_token()
            .or_else(|| self.core().title.first_token())
    }
}

/// The parse result for a batch of annotation text: entries in document
/// order plus an index-aligned table of originating file names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDoc {
    pub entries: Vec<RawEntry>,
    pub filenames: Vec<String>,
}

impl RawDoc {
    pub fn new() -> RawDoc {
        RawDoc::default()
    }

    pub fn add_entry(&mut self, entry: RawEntry, filename: &str) {
        self.entries.push(entry);
        self.filenames.push(filename.to_string());
    }

    /// Append all entries of `other`, keeping their file attribution.
    pub fn merge(&mut self, other: RawDoc) {
        self.entries.extend(other.entries);
        self.filenames.extend(other.filenames);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::lexer::tokenize;

    fn name(entry: &mut RawEntry, text: &str) {
        entry.core_mut().name = RawText::from_tokens(tokenize(text, "<test>"));
    }

    #[test]
    fn test_kind_refinement_by_qualifier() {
        let mut f = RawEntry::for_command(Command::Fn).unwrap();
        name(&mut f, "foo");
        assert_eq!(f.kind(), EntryKind::GlobalFunction);
        name(&mut f, "Klass::foo");
        assert_eq!(f.kind(), EntryKind::MemberFunction);
        name(&mut f, "Klass#foo");
        assert_eq!(f.kind(), EntryKind::InterfaceFunction);
    }

    #[test]
    fn test_mainpage_fixed_name() {
        let entry = RawEntry::for_command(Command::MainPage).unwrap();
        assert_eq!(entry.name_text(), "mainpage");
        assert_eq!(entry.kind(), EntryKind::Page);
    }

    #[test]
    fn test_top_and_second_level_partition() {
        for kind in [
            EntryKind::MemberFunction,
            EntryKind::InterfaceFunction,
            EntryKind::InterfaceMetafunction,
            EntryKind::GroupedTag,
            EntryKind::GroupedMacro,
            EntryKind::MemberTypedef,
            EntryKind::GroupedTypedef,
        ] {
            assert!(kind.is_second_level() && !kind.is_top_level(), "{kind}");
        }
        for kind in [EntryKind::Class, EntryKind::Concept, EntryKind::Page] {
            assert!(kind.is_top_level() && !kind.is_second_level(), "{kind}");
        }
    }

    #[test]
    fn test_in_out_markers() {
        assert_eq!(InOut::from_marker("[in]"), Some(InOut::In));
        assert_eq!(InOut::from_marker("[out]"), Some(InOut::Out));
        assert_eq!(InOut::from_marker("[in,out]"), Some(InOut::InOut));
        assert_eq!(InOut::from_marker("[nope]"), None);
        assert_eq!(InOut::InOut.marker(), "[in,out]");
    }

    #[test]
    fn test_for_command_rejects_clause_commands() {
        assert!(RawEntry::for_command(Command::Brief).is_none());
        assert!(RawEntry::for_command(Command::Class).is_some());
    }
}
