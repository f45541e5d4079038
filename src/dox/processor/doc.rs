//! The processed document: the arena of entries and the name registries.

use std::collections::BTreeMap;

use crate::dox::diagnostics::Diagnostics;
use crate::dox::processor::entries::{EntryId, ProcEntry};
use crate::dox::raw::entry::EntryKind;

/// Split a qualified name into `(owner, local)`.
///
/// `Owner#member` splits at the first `#`; `Owner::member` splits at the
/// last `::`; a name without a separator has no owner.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    if let Some((owner, local)) = name.split_once('#') {
        return (Some(owner), local);
    }
    if let Some((owner, local)) = name.rsplit_once("::") {
        return (Some(owner), local);
    }
    (None, name)
}

/// The query-ready result of a documentation run.
///
/// Entries are stored once in an arena and referenced by [`EntryId`] from
/// the registries and from parent/child relations. Registering a name twice
/// reports an error and keeps the first registration. After the processor's
/// passes the structure is read-only for collaborators.
#[derive(Debug, Default)]
pub struct ProcDoc {
    arena: Vec<ProcEntry>,
    /// Every registered entry by fully qualified name.
    pub entries: BTreeMap<String, EntryId>,
    /// Top-level entries by name.
    pub top_level: BTreeMap<String, EntryId>,
    /// Second-level (member/interface) entries by qualified name.
    pub second_level: BTreeMap<String, EntryId>,
    /// Occurrences of each local name, used to decide whether a link's
    /// display text can be shortened.
    local_name_counter: BTreeMap<String, usize>,
}

impl ProcDoc {
    pub fn new() -> ProcDoc {
        ProcDoc::default()
    }

    pub fn get(&self, id: EntryId) -> &ProcEntry {
        &self.arena[id.0]
    }

    pub fn get_mut(&mut self, id: EntryId) -> &mut ProcEntry {
        &mut self.arena[id.0]
    }

    pub fn by_name(&self, name: &str) -> Option<&ProcEntry> {
        self.entries.get(name).map(|id| self.get(*id))
    }

    pub fn id_by_name(&self, name: &str) -> Option<EntryId> {
        self.entries.get(name).copied()
    }

    pub fn top_level_id(&self, name: &str) -> Option<EntryId> {
        self.top_level.get(name).copied()
    }

    /// Ids of all registered entries, in name order.
    pub fn ids(&self) -> Vec<EntryId> {
        self.entries.values().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a local name occurs exactly once across all second-level
    /// entries, so links may display the shortened form.
    pub fn local_name_unique(&self, local: &str) -> bool {
        self.local_name_counter.get(local).copied() == Some(1)
    }

    /// Register an entry in the global name table. First registration wins;
    /// a later entry with the same name is reported and dropped.
    fn register(&mut self, entry: ProcEntry, diags: &mut Diagnostics) -> Option<EntryId> {
        let name = entry.name().to_string();
        let location = entry.core().location.clone();
        if name.is_empty() {
            diags.error_at(&location.file, location.line, "entry has an empty name");
            return None;
        }
        if let Some(old_id) = self.entries.get(&name) {
            let old = self.get(*old_id);
            diags.error_at(
                &location.file,
                location.line,
                format!(
                    "{} {:?} is already defined as {} at {}:{}",
                    entry.kind(),
                    name,
                    old.kind(),
                    old.core().location.file,
                    old.core().location.line
                ),
            );
            return None;
        }
        let id = EntryId(self.arena.len());
        self.arena.push(entry);
        self.entries.insert(name, id);
        Some(id)
    }

    /// Pass 1: register a top-level entry.
    pub fn add_top_level(&mut self, entry: ProcEntry, diags: &mut Diagnostics) -> Option<EntryId> {
        let name = entry.name().to_string();
        let id = self.register(entry, diags)?;
        self.top_level.insert(name, id);
        Some(id)
    }

    /// Pass 2: register a second-level entry and link it under its parent.
    ///
    /// An unknown parent is reported; the entry stays registered but
    /// unlinked.
    pub fn add_second_level(
        &mut self,
        entry: ProcEntry,
        diags: &mut Diagnostics,
    ) -> Option<EntryId> {
        let name = entry.name().to_string();
        let kind = entry.kind();
        let location = entry.core().location.clone();
        let id = self.register(entry, diags)?;
        self.second_level.insert(name.clone(), id);
        let (owner, local) = split_qualified(&name);
        *self
            .local_name_counter
            .entry(local.to_string())
            .or_insert(0) += 1;
        match owner.and_then(|o| self.top_level_id(o)) {
            Some(parent) => self.link_subentry(parent, kind, id),
            None => diags.error_at(
                &location.file,
                location.line,
                format!(
                    "unknown top-level entry {:?} for {:?}",
                    owner.unwrap_or(""),
                    name
                ),
            ),
        }
        Some(id)
    }

    /// Pass 3: register a variable, member variable, or enum value.
    ///
    /// A variable whose declared type names a known enum registers as a
    /// value of that enum under the qualified name `Enum::NAME`.
    pub fn add_variable(&mut self, entry: ProcEntry, diags: &mut Diagnostics) -> Option<EntryId> {
        let declared_enum = entry.var_type().and_then(|ty| {
            self.top_level_id(ty)
                .filter(|id| self.get(*id).kind() == EntryKind::Enum)
                .map(|id| (ty.to_string(), id))
        });
        let is_value = matches!(entry.kind(), EntryKind::EnumValue);

        if let Some((enum_name, enum_id)) = declared_enum {
            let mut entry = entry;
            if !entry.name().contains("::") {
                let qualified = format!("{}::{}", enum_name, entry.name());
                entry.core_mut().name = qualified;
            }
            let id = self.register(entry, diags)?;
            self.link_subentry(enum_id, EntryKind::EnumValue, id);
            return Some(id);
        }

        if is_value {
            // `@val` with a type that is not a registered enum.
            let location = entry.core().location.clone();
            let ty = entry.var_type().unwrap_or("").to_string();
            let name = entry.name().to_string();
            let id = self.register(entry, diags)?;
            diags.error_at(
                &location.file,
                location.line,
                format!("unknown enum type {:?} for value {:?}", ty, name),
            );
            return Some(id);
        }

        if entry.name().contains("::") {
            return self.add_second_level(entry, diags);
        }

        self.add_top_level(entry, diags)
    }

    fn link_subentry(&mut self, parent: EntryId, kind: EntryKind, child: EntryId) {
        self.get_mut(parent)
            .core_mut()
            .subentries
            .entry(kind)
            .or_default()
            .push(child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_qualified_member() {
        assert_eq!(split_qualified("Klass::foo"), (Some("Klass"), "foo"));
    }

    #[test]
    fn test_split_qualified_interface() {
        assert_eq!(split_qualified("Klass#foo"), (Some("Klass"), "foo"));
    }

    #[test]
    fn test_split_qualified_global() {
        assert_eq!(split_qualified("foo"), (None, "foo"));
    }

    #[test]
    fn test_split_qualified_nested_member_uses_last_separator() {
        assert_eq!(
            split_qualified("Outer::Inner::foo"),
            (Some("Outer::Inner"), "foo")
        );
    }

    #[test]
    fn test_interface_separator_wins_over_member() {
        assert_eq!(
            split_qualified("Group#Klass::foo"),
            (Some("Group"), "Klass::foo")
        );
    }
}
