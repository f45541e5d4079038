//! Transitive inheritance closures for concepts and classes.
//!
//! The direct `@extends`/`@implements` edges are authored; everything else
//! here is computed: for concepts the sets of all extended/extending
//! concepts and all implementing classes, for classes the sets of all
//! extended/extending classes and all implemented concepts. Closures are
//! taken by explicit worklist over an adjacency map built up front, with a
//! visited check as the cycle guard.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use tracing::debug;

use crate::dox::diagnostics::Diagnostics;
use crate::dox::processor::doc::ProcDoc;
use crate::dox::processor::entries::EntryId;
use crate::dox::raw::entry::EntryKind;

/// Pass 5 of the document processor.
pub fn build_inheritance(doc: &mut ProcDoc, diags: &mut Diagnostics) {
    let concept_ids: Vec<EntryId> = doc
        .ids()
        .into_iter()
        .filter(|id| doc.get(*id).kind() == EntryKind::Concept)
        .collect();
    let class_ids: Vec<EntryId> = doc
        .ids()
        .into_iter()
        .filter(|id| {
            matches!(
                doc.get(*id).kind(),
                EntryKind::Class | EntryKind::Specialization
            )
        })
        .collect();
    debug!(
        concepts = concept_ids.len(),
        classes = class_ids.len(),
        "building inheritance closures"
    );

    // Concepts: all_extended by worklist, then the inverted all_extending.
    let concept_edges = extends_map(doc, &concept_ids, |doc, id| {
        doc.get(id).as_concept().map(|c| c.extends.clone())
    });
    for &id in &concept_ids {
        let seeds = doc
            .get(id)
            .as_concept()
            .map(|c| c.extends.clone())
            .unwrap_or_default();
        let closed = close_over(&seeds, &concept_edges, diags, "concept");
        if let Some(concept) = doc.get_mut(id).as_concept_mut() {
            concept.all_extended = closed;
        }
    }
    for &id in &concept_ids {
        let name = doc.get(id).name().to_string();
        let extended = doc
            .get(id)
            .as_concept()
            .map(|c| c.all_extended.clone())
            .unwrap_or_default();
        for base in extended {
            if let Some(base_id) = doc.top_level_id(&base) {
                if let Some(base_concept) = doc.get_mut(base_id).as_concept_mut() {
                    base_concept.all_extending.insert(name.clone());
                }
            }
        }
    }

    // Classes: identical closure over class extends edges.
    let class_edges = extends_map(doc, &class_ids, |doc, id| {
        doc.get(id).as_class().map(|c| c.extends.clone())
    });
    for &id in &class_ids {
        let seeds = doc
            .get(id)
            .as_class()
            .map(|c| c.extends.clone())
            .unwrap_or_default();
        let closed = close_over(&seeds, &class_edges, diags, "class");
        if let Some(class) = doc.get_mut(id).as_class_mut() {
            class.all_extended = closed;
        }
    }
    for &id in &class_ids {
        let name = doc.get(id).name().to_string();
        let extended = doc
            .get(id)
            .as_class()
            .map(|c| c.all_extended.clone())
            .unwrap_or_default();
        for base in extended {
            if let Some(base_id) = doc.top_level_id(&base) {
                if let Some(base_class) = doc.get_mut(base_id).as_class_mut() {
                    base_class.all_extending.insert(name.clone());
                }
            }
        }
    }

    // Direct implementations: a class implementing a concept implements it
    // together with every class extending the implementor.
    for &id in &class_ids {
        let class_name = doc.get(id).name().to_string();
        let (implements, extending) = match doc.get(id).as_class() {
            Some(c) => (c.implements.clone(), c.all_extending.clone()),
            None => continue,
        };
        for concept_name in implements {
            // Names carrying the transitive marker are already closed over.
            if concept_name.starts_with('\u{1}') {
                continue;
            }
            let concept_id = match doc.top_level_id(&concept_name) {
                Some(id) => id,
                None => {
                    diags.warning(format!(
                        "unknown concept {:?} implemented by {:?}",
                        concept_name, class_name
                    ));
                    continue;
                }
            };
            match doc.get_mut(concept_id).as_concept_mut() {
                Some(concept) => {
                    concept.all_implementing.insert(class_name.clone());
                    concept
                        .all_implementing
                        .extend(extending.iter().cloned());
                }
                None => diags.warning(format!(
                    "{:?} implements {:?}, which is not a concept",
                    class_name, concept_name
                )),
            }
        }
    }

    // Implemented concepts per class: each implementing class gains the
    // concept and everything the concept extends.
    for &id in &concept_ids {
        let concept_name = doc.get(id).name().to_string();
        let (implementing, extended) = match doc.get(id).as_concept() {
            Some(c) => (c.all_implementing.clone(), c.all_extended.clone()),
            None => continue,
        };
        for class_name in implementing {
            if let Some(class_id) = doc.top_level_id(&class_name) {
                if let Some(class) = doc.get_mut(class_id).as_class_mut() {
                    class.all_implemented.insert(concept_name.clone());
                    class.all_implemented.extend(extended.iter().cloned());
                }
            }
        }
    }

    // Finally propagate the transitive implementers back into the concepts.
    for &id in &class_ids {
        let class_name = doc.get(id).name().to_string();
        let implemented = match doc.get(id).as_class() {
            Some(c) => c.all_implemented.clone(),
            None => continue,
        };
        for concept_name in implemented {
            if let Some(concept_id) = doc.top_level_id(&concept_name) {
                if let Some(concept) = doc.get_mut(concept_id).as_concept_mut() {
                    concept.all_implementing.insert(class_name.clone());
                }
            }
        }
    }
}

/// Name-keyed adjacency of direct extends edges for the given entries.
fn extends_map(
    doc: &ProcDoc,
    ids: &[EntryId],
    edges_of: impl Fn(&ProcDoc, EntryId) -> Option<Vec<String>>,
) -> BTreeMap<String, Vec<String>> {
    let mut map = BTreeMap::new();
    for &id in ids {
        if let Some(edges) = edges_of(doc, id) {
            map.insert(doc.get(id).name().to_string(), edges);
        }
    }
    map
}

/// Worklist closure over the adjacency map; already-seen names are skipped,
/// which also guards against cycles.
fn close_over(
    seeds: &[String],
    edges: &BTreeMap<String, Vec<String>>,
    diags: &mut Diagnostics,
    what: &str,
) -> BTreeSet<String> {
    let mut all: BTreeSet<String> = BTreeSet::new();
    let mut queue: VecDeque<String> = seeds.iter().cloned().collect();
    while let Some(name) = queue.pop_front() {
        if all.contains(&name) {
            continue;
        }
        all.insert(name.clone());
        match edges.get(&name) {
            Some(next) => queue.extend(next.iter().cloned()),
            None => diags.warning(format!("unknown {} {:?} in extends chain", what, name)),
        }
    }
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_over_transitive() {
        let mut edges = BTreeMap::new();
        edges.insert("B".to_string(), vec!["A1".to_string(), "A2".to_string()]);
        edges.insert("A1".to_string(), vec![]);
        edges.insert("A2".to_string(), vec![]);
        let mut diags = Diagnostics::new();
        let closed = close_over(&["B".to_string()], &edges, &mut diags, "concept");
        let names: Vec<&str> = closed.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["A1", "A2", "B"]);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_close_over_cycle_terminates() {
        let mut edges = BTreeMap::new();
        edges.insert("A".to_string(), vec!["B".to_string()]);
        edges.insert("B".to_string(), vec!["A".to_string()]);
        let mut diags = Diagnostics::new();
        let closed = close_over(&["A".to_string()], &edges, &mut diags, "concept");
        assert_eq!(closed.len(), 2);
    }

    #[test]
    fn test_close_over_unknown_name_warns() {
        let edges = BTreeMap::new();
        let mut diags = Diagnostics::new();
        let closed = close_over(&["Ghost".to_string()], &edges, &mut diags, "class");
        assert!(closed.contains("Ghost"));
        assert_eq!(diags.warning_count(), 1);
    }
}
