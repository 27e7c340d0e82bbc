//! The dedup collection: a set of property sets closed under subset
//! absorption.
//!
//! Invariant after every insertion: no stored member is a subset of another
//! and no two members intersect - the collection is an antichain of
//! pairwise-disjoint sets. Insertion is idempotent and order-insensitive in
//! final content, which is what makes merging partial results from workers
//! in arbitrary arrival order correct.

use crate::props::PropSet;
use crate::set_ops::{compare_sets, union, SetCompare};

/// A collection of declaration sets closed under subset absorption.
#[derive(Debug, Clone, Default)]
pub struct DedupSets {
    members: Vec<PropSet>,
}

impl DedupSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a candidate, restoring the closure invariant:
    ///
    /// 1. covered by an existing member (subset of or equal to it) - no-op;
    /// 2. members strictly contained in the candidate are removed;
    /// 3. members merely intersecting the candidate are removed and their
    ///    union with the candidate is inserted instead;
    /// 4. otherwise the candidate joins as a new member.
    pub fn add(&mut self, candidate: PropSet) {
        for member in &self.members {
            if compare_sets(member, &candidate).is_superset() {
                return;
            }
        }

        // Members pairwise disjoint means a member intersecting the final
        // union must already intersect the candidate itself, so one
        // classification pass against the original candidate suffices.
        let mut overlapping: Vec<PropSet> = Vec::new();
        self.members.retain(|member| match compare_sets(member, &candidate) {
            SetCompare::ProperSubset => false,
            SetCompare::Intersecting => {
                overlapping.push(member.clone());
                false
            }
            _ => true,
        });

        let mut merged = candidate;
        for member in &overlapping {
            merged = union(&merged, member);
        }
        self.members.push(merged);
    }

    /// Re-add every member of another collection, in any order.
    pub fn absorb(&mut self, other: DedupSets) {
        for set in other.members {
            self.add(set);
        }
    }

    /// Whether the exact set is currently a member.
    pub fn contains(&self, set: &PropSet) -> bool {
        self.members.iter().any(|m| m == set)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropSet> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/dedup.rs"]
mod tests;
