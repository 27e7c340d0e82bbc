//! Rule and property indices built once from the parser collaborator's
//! output and shared read-only with every worker.

use crate::props::PropSet;
use crate::symbol::{PropId, RuleId};
use hashbrown::HashMap;
use std::fmt;

/// A rule id appeared twice in the input mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateRule(pub RuleId);

impl fmt::Display for DuplicateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate rule id in input mapping")
    }
}

impl std::error::Error for DuplicateRule {}

/// Insertion-ordered mapping from rule id to its declaration set.
///
/// Built once; read-only thereafter.
#[derive(Debug, Default)]
pub struct RuleIndex {
    entries: Vec<(RuleId, PropSet)>,
    by_id: HashMap<RuleId, usize>,
}

impl RuleIndex {
    /// Build the index, rejecting duplicate rule ids.
    pub fn from_entries<I>(entries: I) -> Result<Self, DuplicateRule>
    where
        I: IntoIterator<Item = (RuleId, PropSet)>,
    {
        let mut index = RuleIndex::default();
        for (rule, props) in entries {
            if index.by_id.contains_key(&rule) {
                return Err(DuplicateRule(rule));
            }
            index.by_id.insert(rule, index.entries.len());
            index.entries.push((rule, props));
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (RuleId, &PropSet)> {
        self.entries.iter().map(|(rule, props)| (*rule, props))
    }

    pub fn get(&self, rule: RuleId) -> Option<&PropSet> {
        self.by_id.get(&rule).map(|&i| &self.entries[i].1)
    }

    pub(crate) fn entries(&self) -> &[(RuleId, PropSet)] {
        &self.entries
    }
}

/// Inverse mapping: declaration to the rules that carry it.
#[derive(Debug, Default)]
pub struct PropertyIndex {
    owners: HashMap<PropId, Vec<RuleId>>,
}

impl PropertyIndex {
    /// Derive the inverse index from a rule index.
    pub fn build(rules: &RuleIndex) -> Self {
        let mut owners: HashMap<PropId, Vec<RuleId>> = HashMap::new();
        for (rule, props) in rules.iter() {
            for prop in props.iter() {
                owners.entry(prop).or_default().push(rule);
            }
        }
        Self { owners }
    }

    /// Rules carrying the declaration, in rule insertion order.
    pub fn rules_for(&self, prop: PropId) -> &[RuleId] {
        self.owners.get(&prop).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every declaration seen in any rule.
    pub fn props(&self) -> impl Iterator<Item = PropId> + '_ {
        self.owners.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}
