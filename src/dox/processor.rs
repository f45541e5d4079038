//! The document processor: raw entries in, resolved document out.
//!
//! Processing is batch and strictly sequential. The passes, in order:
//!
//! 1. Convert and register top-level entries.
//! 2. Convert second-level entries and link them under their parents.
//! 3. Convert variables and enum values (variables typed by a known enum
//!    register as its values).
//! 4. Check links.
//! 5. Build inheritance closures.
//! 6. Run validators.
//!
//! Registries are written only during passes 1–3; afterwards the
//! [`ProcDoc`] is read-only for collaborators.

pub mod convert;
pub mod doc;
pub mod entries;
pub mod include_mgr;
pub mod inheritance;
pub mod link_check;
pub mod text_node;
pub mod validators;

use std::collections::BTreeSet;

use tracing::info;

use crate::dox::config::DoxConfig;
use crate::dox::diagnostics::Diagnostics;
use crate::dox::raw::entry::RawDoc;

pub use convert::{convert_entry, ConvertCx, TextConverter};
pub use doc::{split_qualified, ProcDoc};
pub use entries::{
    EntryId, Location, ProcClass, ProcCodeCore, ProcCodeEntry, ProcConcept, ProcCore, ProcEntry,
    ProcFunction, ProcMacro, ProcMetafunction, ProcPage, ProcParam, ProcReturn, ProcTParam,
    ProcTag, ProcThrow, ProcVariable,
};
pub use include_mgr::{IncludeError, IncludeManager};
pub use text_node::{NodeTag, TextNode};
pub use validators::{default_validators, Validator};

/// Drives the six processing passes over a fully parsed [`RawDoc`].
pub struct DocProcessor {
    include_mgr: IncludeManager,
    expected_tags: BTreeSet<String>,
    validators: Vec<Box<dyn Validator>>,
    pub diags: Diagnostics,
}

impl DocProcessor {
    pub fn new(config: &DoxConfig) -> DocProcessor {
        DocProcessor {
            include_mgr: IncludeManager::new(config.include_dirs.clone()),
            expected_tags: config.expected_tags.iter().cloned().collect(),
            validators: default_validators(),
            diags: Diagnostics::new(),
        }
    }

    /// Replace the default validator list.
    pub fn set_validators(&mut self, validators: Vec<Box<dyn Validator>>) {
        self.validators = validators;
    }

    /// Run all passes and return the resolved document.
    pub fn run(&mut self, raw: &RawDoc) -> ProcDoc {
        let mut doc = ProcDoc::new();
        info!(entries = raw.entries.len(), "processing documentation");

        info!("1) converting top-level entries");
        self.convert_top_level(raw, &mut doc);
        info!("2) converting second-level entries");
        self.convert_second_level(raw, &mut doc);
        info!("3) converting variables and enum values");
        self.convert_variables(raw, &mut doc);
        info!("4) checking links");
        link_check::check_links(&doc, &mut self.diags);
        info!("5) building inheritance closures");
        inheritance::build_inheritance(&mut doc, &mut self.diags);
        info!("6) running validators");
        self.validate(&doc);

        doc
    }

    fn convert_top_level(&mut self, raw: &RawDoc, doc: &mut ProcDoc) {
        for (entry, file) in raw.entries.iter().zip(&raw.filenames) {
            if !entry.kind().is_top_level() {
                continue;
            }
            let mut cx = ConvertCx {
                include_mgr: &mut self.include_mgr,
                expected_tags: &self.expected_tags,
                diags: &mut self.diags,
            };
            let proc = convert_entry(entry, file, &mut cx);
            doc.add_top_level(proc, &mut self.diags);
        }
    }

    fn convert_second_level(&mut self, raw: &RawDoc, doc: &mut ProcDoc) {
        for (entry, file) in raw.entries.iter().zip(&raw.filenames) {
            if !entry.kind().is_second_level() {
                continue;
            }
            let mut cx = ConvertCx {
                include_mgr: &mut self.include_mgr,
                expected_tags: &self.expected_tags,
                diags: &mut self.diags,
            };
            let proc = convert_entry(entry, file, &mut cx);
            doc.add_second_level(proc, &mut self.diags);
        }
    }

    fn convert_variables(&mut self, raw: &RawDoc, doc: &mut ProcDoc) {
        use crate::dox::raw::entry::EntryKind;
        for (entry, file) in raw.entries.iter().zip(&raw.filenames) {
            if !matches!(
                entry.kind(),
                EntryKind::Variable | EntryKind::MemberVariable
            ) {
                continue;
            }
            let mut cx = ConvertCx {
                include_mgr: &mut self.include_mgr,
                expected_tags: &self.expected_tags,
                diags: &mut self.diags,
            };
            let proc = convert_entry(entry, file, &mut cx);
            doc.add_variable(proc, &mut self.diags);
        }
        for (entry, file) in raw.entries.iter().zip(&raw.filenames) {
            if entry.kind() != EntryKind::EnumValue {
                continue;
            }
            let mut cx = ConvertCx {
                include_mgr: &mut self.include_mgr,
                expected_tags: &self.expected_tags,
                diags: &mut self.diags,
            };
            let proc = convert_entry(entry, file, &mut cx);
            doc.add_variable(proc, &mut self.diags);
        }
    }

    fn validate(&mut self, doc: &ProcDoc) {
        for id in doc.ids() {
            let entry = doc.get(id);
            for validator in &self.validators {
                validator.validate(entry, doc, &mut self.diags);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dox::raw::entry::EntryKind;
    use crate::dox::testing;

    #[test]
    fn test_top_level_registration() {
        let (doc, _) = testing::process("@class A\n@brief The A.\n@concept C\n@brief The C.\n");
        assert_eq!(doc.len(), 2);
        assert!(doc.top_level.contains_key("A"));
        assert!(doc.top_level.contains_key("C"));
    }

    #[test]
    fn test_second_level_linked_under_parent() {
        let (doc, diags) = testing::process(
            "@class Klass\n@brief K.\n@signature class Klass;\n\
             @fn Klass#len\n@brief Length.\n@signature int len();\n",
        );
        assert_eq!(diags.error_count(), 0);
        let parent = doc.by_name("Klass").unwrap();
        let children = parent
            .core()
            .subentries
            .get(&EntryKind::InterfaceFunction)
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(doc.get(children[0]).name(), "Klass#len");
        assert!(doc.second_level.contains_key("Klass#len"));
    }

    #[test]
    fn test_unknown_parent_is_reported_not_fatal() {
        let (doc, diags) = testing::process("@fn Ghost#foo\n@brief F.\n@signature void foo();\n");
        assert_eq!(diags.error_count(), 1);
        // The entry is still registered, only unlinked.
        assert!(doc.by_name("Ghost#foo").is_some());
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let (doc, diags) = testing::process(
            "@class Foo\n@brief First.\n@signature class Foo;\n\
             @page Foo Title\n@brief Second.\n",
        );
        assert_eq!(diags.error_count(), 1);
        assert_eq!(doc.by_name("Foo").unwrap().kind(), EntryKind::Class);
    }

    #[test]
    fn test_enum_typed_variable_becomes_enum_value() {
        let (doc, diags) = testing::process(
            "@enum Color\n@brief Colors.\n@signature enum Color;\n\
             @var Color RED\n@brief Red.\n",
        );
        assert_eq!(diags.error_count(), 0);
        let value = doc.by_name("Color::RED").expect("qualified enum value");
        assert_eq!(value.kind(), EntryKind::MemberVariable);
        let parent = doc.by_name("Color").unwrap();
        assert!(parent.core().subentries.contains_key(&EntryKind::EnumValue));
    }

    #[test]
    fn test_val_entry_requires_known_enum() {
        let (_, diags) = testing::process("@val Ghost VALUE\n@brief V.\n");
        assert!(diags
            .items()
            .iter()
            .any(|d| d.message.contains("unknown enum type")));
    }

    #[test]
    fn test_member_variable_registers_second_level() {
        let (doc, diags) = testing::process(
            "@class Klass\n@brief K.\n@signature class Klass;\n\
             @var int Klass::count\n@brief Counter.\n",
        );
        assert_eq!(diags.error_count(), 0);
        assert!(doc.second_level.contains_key("Klass::count"));
        let parent = doc.by_name("Klass").unwrap();
        assert!(parent
            .core()
            .subentries
            .contains_key(&EntryKind::MemberVariable));
    }
}
