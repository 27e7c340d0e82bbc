//! Maps each surviving subset back to the rules it is contained in.

use crate::dedup::DedupSets;
use crate::index::RuleIndex;
use crate::props::PropSet;
use crate::set_ops::compare_sets;
use crate::symbol::{RuleId, SymbolStore};
use serde::Serialize;
use std::fmt;

/// Mapping from a surviving declaration subset to the rules whose sets
/// contain it, in rule insertion order.
///
/// Subsets contained in no rule (possible after cross-worker union merges)
/// are omitted.
#[derive(Debug, Default)]
pub struct AffectedRules {
    entries: Vec<(PropSet, Vec<RuleId>)>,
}

/// Build the affected-rules map with one full pass over subsets x rules.
/// Single-threaded; runs once after the pool's collection stabilizes.
pub fn affected_rules(subsets: &DedupSets, rules: &RuleIndex) -> AffectedRules {
    let mut entries = Vec::with_capacity(subsets.len());
    for subset in subsets.iter() {
        let owners: Vec<RuleId> = rules
            .iter()
            .filter(|&(_, props)| compare_sets(subset, props).is_subset())
            .map(|(rule, _)| rule)
            .collect();
        if !owners.is_empty() {
            entries.push((subset.clone(), owners));
        }
    }
    AffectedRules { entries }
}

impl AffectedRules {
    pub fn iter(&self) -> impl Iterator<Item = (&PropSet, &[RuleId])> {
        self.entries
            .iter()
            .map(|(subset, rules)| (subset, rules.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve interned ids back to strings for rendering.
    ///
    /// Groups are ordered by declaration text for stable output; ids the
    /// store cannot resolve are skipped.
    pub fn resolve(&self, symbols: &SymbolStore) -> Report {
        let mut shared: Vec<SharedGroup> = self
            .entries
            .iter()
            .map(|(subset, rules)| {
                let mut declarations: Vec<String> = subset
                    .iter()
                    .filter_map(|p| symbols.resolve_prop(p))
                    .map(str::to_owned)
                    .collect();
                declarations.sort();
                let rules = rules
                    .iter()
                    .filter_map(|&r| symbols.resolve_rule(r))
                    .map(str::to_owned)
                    .collect();
                SharedGroup {
                    declarations,
                    rules,
                }
            })
            .collect();
        shared.sort_by(|a, b| a.declarations.cmp(&b.declarations));
        Report { shared }
    }
}

/// One surviving subset with the rules it affects, in resolved string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedGroup {
    pub declarations: Vec<String>,
    pub rules: Vec<String>,
}

/// The rendered result of a mining run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub shared: Vec<SharedGroup>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared.is_empty() {
            return writeln!(f, "no shared declaration groups");
        }
        for group in &self.shared {
            writeln!(f, "{{ {} }}", group.declarations.join("; "))?;
            writeln!(f, "  rules: {}", group.rules.join(", "))?;
        }
        Ok(())
    }
}
