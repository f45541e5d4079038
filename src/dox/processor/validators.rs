//! Pluggable validation over the processed document.
//!
//! Validators run as the final pass, only read the document, and report
//! through the shared diagnostics. The default set covers the classic
//! documentation smells; collaborators can install their own list.

use std::collections::BTreeSet;

use crate::dox::diagnostics::Diagnostics;
use crate::dox::processor::doc::ProcDoc;
use crate::dox::processor::entries::ProcEntry;
use crate::dox::raw::entry::EntryKind;

pub trait Validator {
    fn name(&self) -> &'static str;
    fn validate(&self, entry: &ProcEntry, doc: &ProcDoc, diags: &mut Diagnostics);
}

/// The validators installed by default.
pub fn default_validators() -> Vec<Box<dyn Validator>> {
    vec![
        Box::new(MissingBrief),
        Box::new(MissingSignature),
        Box::new(DuplicateParamDoc),
    ]
}

/// Every entry should carry a brief summary.
pub struct MissingBrief;

impl Validator for MissingBrief {
    fn name(&self) -> &'static str {
        "missing-brief"
    }

    fn validate(&self, entry: &ProcEntry, _doc: &ProcDoc, diags: &mut Diagnostics) {
        if entry.core().brief.is_none() {
            let loc = &entry.core().location;
            diags.warning_at(
                &loc.file,
                loc.line,
                format!("{} {:?} has no @brief", entry.kind(), entry.name()),
            );
        }
    }
}

/// Code entries without any `@signature` cannot be indexed.
pub struct MissingSignature;

impl Validator for MissingSignature {
    fn name(&self) -> &'static str {
        "missing-signature"
    }

    fn validate(&self, entry: &ProcEntry, _doc: &ProcDoc, diags: &mut Diagnostics) {
        // Variables and enum values habitually go without signatures.
        if matches!(
            entry.kind(),
            EntryKind::Variable | EntryKind::MemberVariable | EntryKind::EnumValue
        ) {
            return;
        }
        let Some(code) = entry.code() else {
            return;
        };
        if code.signatures.is_empty() {
            let loc = &entry.core().location;
            diags.warning_at(
                &loc.file,
                loc.line,
                format!("{} {:?} has no @signature", entry.kind(), entry.name()),
            );
        }
    }
}

/// A parameter documented twice is almost always a copy-paste slip.
pub struct DuplicateParamDoc;

impl Validator for DuplicateParamDoc {
    fn name(&self) -> &'static str {
        "duplicate-param"
    }

    fn validate(&self, entry: &ProcEntry, _doc: &ProcDoc, diags: &mut Diagnostics) {
        let params: Vec<&str> = match entry {
            ProcEntry::Function(f) => f.params.iter().map(|p| p.name.as_str()).collect(),
            ProcEntry::Macro(m) => m.params.iter().map(|p| p.name.as_str()).collect(),
            _ => return,
        };
        let mut seen = BTreeSet::new();
        for name in params {
            if !seen.insert(name) {
                let loc = &entry.core().location;
                diags.warning_at(
                    &loc.file,
                    loc.line,
                    format!(
                        "parameter {:?} of {:?} is documented more than once",
                        name,
                        entry.name()
                    ),
                );
            }
        }
    }
}
