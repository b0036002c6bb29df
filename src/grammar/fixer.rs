//! Normalization run once between parsing and matching.
//!
//! [`fix_identities`] makes equal leaves share one arena slot.
//! [`fix_list_arguments`] turns every leaf that can occur more than once
//! on some choice-resolved path into an accumulator.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::pattern::{Grammar, LeafId, LeafIdentity, Pattern, Value};

/// Apply both passes. The grammar's shape is left untouched.
pub fn fix(grammar: &mut Grammar) {
    fix_identities(grammar);
    fix_list_arguments(grammar);
}

/// Redirect every leaf reference to the first leaf of its identity class
/// in declaration order. Idempotent.
pub fn fix_identities(grammar: &mut Grammar) {
    let mut first_of: HashMap<LeafIdentity, LeafId> = HashMap::new();
    let mut canonical: HashMap<LeafId, LeafId> = HashMap::new();
    for id in grammar.flat() {
        let first = *first_of.entry(grammar.leaf(id).identity()).or_insert(id);
        canonical.insert(id, first);
    }

    redirect(grammar.root_mut(), &canonical);
    debug!(distinct = first_of.len(), "unified leaf identities");
}

fn redirect(pattern: &mut Pattern, canonical: &HashMap<LeafId, LeafId>) {
    match pattern {
        Pattern::Leaf(id) => {
            if let Some(&first) = canonical.get(id) {
                *id = first;
            }
        }
        composite => {
            for child in composite.children_mut() {
                redirect(child, canonical);
            }
        }
    }
}

/// Reset the value of every leaf that repeats within an either-group:
/// `Values([])` for arguments and value-taking options, `Count(0)` for
/// commands and flags. Declared defaults of such leaves are discarded.
pub fn fix_list_arguments(grammar: &mut Grammar) {
    let mut repeated: HashSet<LeafIdentity> = HashSet::new();
    for group in grammar.either_groups() {
        let mut counts: HashMap<LeafIdentity, usize> = HashMap::new();
        for id in group {
            *counts.entry(grammar.leaf(id).identity()).or_default() += 1;
        }
        repeated.extend(
            counts
                .into_iter()
                .filter(|(_, count)| *count > 1)
                .map(|(identity, _)| identity),
        );
    }

    for id in grammar.flat() {
        let leaf = grammar.leaf_mut(id);
        if repeated.contains(&leaf.identity()) {
            leaf.value = if leaf.collects_values() {
                Value::Values(Vec::new())
            } else {
                Value::Count(0)
            };
        }
    }
    debug!(accumulating = repeated.len(), "marked repeating leaves");
}
