//! Processed documentation entries.
//!
//! One variant per kind, mirroring the raw model, but with resolved text
//! trees instead of token runs and with the computed inheritance closures.
//! Entries live in the [`ProcDoc`](super::doc::ProcDoc) arena and reference
//! each other by [`EntryId`]; the closure sets hold entry names.

use std::collections::{BTreeMap, BTreeSet};

use crate::dox::processor::text_node::TextNode;
use crate::dox::raw::entry::{EntryKind, InOut};
use crate::dox::sig::SigEntry;

/// Index of an entry in the [`ProcDoc`](super::doc::ProcDoc) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct EntryId(pub usize);

/// Source location of an entry, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub file: String,
    pub line: u32,
}

/// Fields shared by every processed entry.
#[derive(Debug, Clone, Default)]
pub struct ProcCore {
    pub name: String,
    pub title: Option<String>,
    pub brief: Option<TextNode>,
    pub body: TextNode,
    pub sees: Vec<TextNode>,
    /// Children registered under this entry, grouped by kind.
    pub subentries: BTreeMap<EntryKind, Vec<EntryId>>,
    pub location: Location,
}

impl ProcCore {
    /// The display title: the authored title, or the name.
    pub fn title_or_name(&self) -> &str {
        match &self.title {
            Some(t) if !t.is_empty() => t,
            _ => &self.name,
        }
    }
}

/// Fields shared by code-bearing entries.
#[derive(Debug, Clone, Default)]
pub struct ProcCodeCore {
    pub signatures: Vec<TextNode>,
    pub signature_entries: Vec<SigEntry>,
    pub headerfiles: Vec<String>,
    pub deprecation_msgs: Vec<TextNode>,
    pub notes: Vec<TextNode>,
    pub warnings: Vec<TextNode>,
    pub akas: Vec<String>,
    pub internals: Vec<TextNode>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcParam {
    pub name: String,
    pub in_out: Option<InOut>,
    pub desc: TextNode,
}

#[derive(Debug, Clone, Default)]
pub struct ProcTParam {
    pub ty: String,
    pub desc: TextNode,
}

#[derive(Debug, Clone, Default)]
pub struct ProcReturn {
    pub ty: String,
    pub desc: TextNode,
}

#[derive(Debug, Clone, Default)]
pub struct ProcThrow {
    pub ty: String,
    pub desc: TextNode,
}

#[derive(Debug, Clone, Default)]
pub struct ProcConcept {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub extends: Vec<String>,
    pub all_extended: BTreeSet<String>,
    pub all_extending: BTreeSet<String>,
    pub all_implementing: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcClass {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub tparams: Vec<ProcTParam>,
    pub all_extended: BTreeSet<String>,
    pub all_extending: BTreeSet<String>,
    pub all_implemented: BTreeSet<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcFunction {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub params: Vec<ProcParam>,
    pub tparams: Vec<ProcTParam>,
    pub returns: Vec<ProcReturn>,
    pub throws: Vec<ProcThrow>,
    pub dataraces: Vec<TextNode>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcMacro {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub params: Vec<ProcParam>,
    pub returns: Vec<ProcReturn>,
    pub throws: Vec<ProcThrow>,
    pub dataraces: Vec<TextNode>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcMetafunction {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub tparams: Vec<ProcTParam>,
    pub returns: Vec<ProcReturn>,
    pub throws: Vec<ProcThrow>,
    pub dataraces: Vec<TextNode>,
}

/// Shared shape for enum, typedef, and adaption entries.
#[derive(Debug, Clone, Default)]
pub struct ProcCodeEntry {
    pub core: ProcCore,
    pub code: ProcCodeCore,
}

#[derive(Debug, Clone, Default)]
pub struct ProcVariable {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub var_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcTag {
    pub core: ProcCore,
    pub code: ProcCodeCore,
    pub tparams: Vec<ProcTParam>,
}

#[derive(Debug, Clone, Default)]
pub struct ProcPage {
    pub core: ProcCore,
}

/// One processed entry.
#[derive(Debug, Clone)]
pub enum ProcEntry {
    Concept(ProcConcept),
    Class(ProcClass),
    Function(ProcFunction),
    Metafunction(ProcMetafunction),
    Macro(ProcMacro),
    Enum(ProcCodeEntry),
    Typedef(ProcCodeEntry),
    Adaption(ProcCodeEntry),
    Variable(ProcVariable),
    EnumValue(ProcVariable),
    Tag(ProcTag),
    Page(ProcPage),
    Group(ProcPage),
}

impl ProcEntry {
    pub fn core(&self) -> &ProcCore {
        match self {
            ProcEntry::Concept(e) => &e.core,
            ProcEntry::Class(e) => &e.core,
            ProcEntry::Function(e) => &e.core,
            ProcEntry::Metafunction(e) => &e.core,
            ProcEntry::Macro(e) => &e.core,
            ProcEntry::Enum(e) => &e.core,
            ProcEntry::Typedef(e) => &e.core,
            ProcEntry::Adaption(e) => &e.core,
            ProcEntry::Variable(e) => &e.core,
            ProcEntry::EnumValue(e) => &e.core,
            ProcEntry::Tag(e) => &e.core,
            ProcEntry::Page(e) => &e.core,
            ProcEntry::Group(e) => &e.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ProcCore {
        match self {
            ProcEntry::Concept(e) => &mut e.core,
            ProcEntry::Class(e) => &mut e.core,
            ProcEntry::Function(e) => &mut e.core,
            ProcEntry::Metafunction(e) => &mut e.core,
            ProcEntry::Macro(e) => &mut e.core,
            ProcEntry::Enum(e) => &mut e.core,
            ProcEntry::Typedef(e) => &mut e.core,
            ProcEntry::Adaption(e) => &mut e.core,
            ProcEntry::Variable(e) => &mut e.core,
            ProcEntry::EnumValue(e) => &mut e.core,
            ProcEntry::Tag(e) => &mut e.core,
            ProcEntry::Page(e) => &mut e.core,
            ProcEntry::Group(e) => &mut e.core,
        }
    }

    pub fn code(&self) -> Option<&ProcCodeCore> {
        match self {
            ProcEntry::Concept(e) => Some(&e.code),
            ProcEntry::Class(e) => Some(&e.code),
            ProcEntry::Function(e) => Some(&e.code),
            ProcEntry::Metafunction(e) => Some(&e.code),
            ProcEntry::Macro(e) => Some(&e.code),
            ProcEntry::Enum(e) => Some(&e.code),
            ProcEntry::Typedef(e) => Some(&e.code),
            ProcEntry::Adaption(e) => Some(&e.code),
            ProcEntry::Variable(e) => Some(&e.code),
            ProcEntry::EnumValue(e) => Some(&e.code),
            ProcEntry::Tag(e) => Some(&e.code),
            ProcEntry::Page(_) | ProcEntry::Group(_) => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    /// The name with any `Owner::` / `Owner#` prefix removed.
    pub fn local_name(&self) -> &str {
        let name = self.name();
        if let Some((_, rest)) = name.split_once('#') {
            rest
        } else if let Some((_, rest)) = name.split_once("::") {
            rest
        } else {
            name
        }
    }

    /// The processed kind; classes with extends edges are specializations.
    pub fn kind(&self) -> EntryKind {
        let name = self.name();
        let interface = name.contains('#');
        let member = name.contains("::");
        match self {
            ProcEntry::Concept(_) => EntryKind::Concept,
            ProcEntry::Class(e) => {
                if e.extends.is_empty() {
                    EntryKind::Class
                } else {
                    EntryKind::Specialization
                }
            }
            ProcEntry::Function(_) => {
                if interface {
                    EntryKind::InterfaceFunction
                } else if member {
                    EntryKind::MemberFunction
                } else {
                    EntryKind::GlobalFunction
                }
            }
            ProcEntry::Metafunction(_) => {
                if interface {
                    EntryKind::InterfaceMetafunction
                } else {
                    EntryKind::GlobalMetafunction
                }
            }
            ProcEntry::Macro(_) => {
                if interface {
                    EntryKind::GroupedMacro
                } else {
                    EntryKind::Macro
                }
            }
            ProcEntry::Enum(_) => EntryKind::Enum,
            ProcEntry::Typedef(_) => {
                if interface {
                    EntryKind::GroupedTypedef
                } else if member {
                    EntryKind::MemberTypedef
                } else {
                    EntryKind::GlobalTypedef
                }
            }
            ProcEntry::Adaption(_) => EntryKind::Adaption,
            ProcEntry::Variable(_) => {
                if member {
                    EntryKind::MemberVariable
                } else {
                    EntryKind::Variable
                }
            }
            ProcEntry::EnumValue(_) => EntryKind::EnumValue,
            ProcEntry::Tag(_) => {
                if interface {
                    EntryKind::GroupedTag
                } else {
                    EntryKind::Tag
                }
            }
            ProcEntry::Page(_) => EntryKind::Page,
            ProcEntry::Group(_) => EntryKind::Group,
        }
    }

    pub fn as_concept(&self) -> Option<&ProcConcept> {
        match self {
            ProcEntry::Concept(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_concept_mut(&mut self) -> Option<&mut ProcConcept> {
        match self {
            ProcEntry::Concept(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_class(&self) -> Option<&ProcClass> {
        match self {
            ProcEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_class_mut(&mut self) -> Option<&mut ProcClass> {
        match self {
            ProcEntry::Class(e) => Some(e),
            _ => None,
        }
    }

    pub fn var_type(&self) -> Option<&str> {
        match self {
            ProcEntry::Variable(v) | ProcEntry::EnumValue(v) => v.var_type.as_deref(),
            _ => None,
        }
    }

    /// Visit every resolved text node of this entry.
    pub fn for_each_text_node(&self, visit: &mut impl FnMut(&TextNode)) {
        let core = self.core();
        if let Some(brief) = &core.brief {
            brief.walk(visit);
        }
        core.body.walk(visit);
        for see in &core.sees {
            see.walk(visit);
        }
        if let Some(code) = self.code() {
            for node in code
                .deprecation_msgs
                .iter()
                .chain(&code.notes)
                .chain(&code.warnings)
                .chain(&code.internals)
            {
                node.walk(visit);
            }
        }
        match self {
            ProcEntry::Function(e) => {
                for p in &e.params {
                    p.desc.walk(visit);
                }
                for p in &e.tparams {
                    p.desc.walk(visit);
                }
                for r in &e.returns {
                    r.desc.walk(visit);
                }
                for t in &e.throws {
                    t.desc.walk(visit);
                }
                for d in &e.dataraces {
                    d.walk(visit);
                }
            }
            ProcEntry::Macro(e) => {
                for p in &e.params {
                    p.desc.walk(visit);
                }
                for r in &e.returns {
                    r.desc.walk(visit);
                }
                for t in &e.throws {
                    t.desc.walk(visit);
                }
                for d in &e.dataraces {
                    d.walk(visit);
                }
            }
            ProcEntry::Metafunction(e) => {
                for p in &e.tparams {
                    p.desc.walk(visit);
                }
                for r in &e.returns {
                    r.desc.walk(visit);
                }
            }
            ProcEntry::Class(e) => {
                for p in &e.tparams {
                    p.desc.walk(visit);
                }
            }
            ProcEntry::Tag(e) => {
                for p in &e.tparams {
                    p.desc.walk(visit);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_name() {
        let mut entry = ProcEntry::Function(ProcFunction::default());
        entry.core_mut().name = "Klass#foo".to_string();
        assert_eq!(entry.local_name(), "foo");
        entry.core_mut().name = "Klass::foo".to_string();
        assert_eq!(entry.local_name(), "foo");
        entry.core_mut().name = "foo".to_string();
        assert_eq!(entry.local_name(), "foo");
    }

    #[test]
    fn test_class_becomes_specialization_with_extends() {
        let mut class = ProcClass::default();
        class.core.name = "Derived".to_string();
        assert_eq!(ProcEntry::Class(class.clone()).kind(), EntryKind::Class);
        class.extends.push("Base".to_string());
        assert_eq!(
            ProcEntry::Class(class).kind(),
            EntryKind::Specialization
        );
    }

    #[test]
    fn test_title_or_name() {
        let mut core = ProcCore::default();
        core.name = "Name".to_string();
        assert_eq!(core.title_or_name(), "Name");
        core.title = Some("A Title".to_string());
        assert_eq!(core.title_or_name(), "A Title");
    }
}
