//! Pairwise set comparison and intersection/union primitives.
//!
//! `compare_sets` classifies two property sets in one interleaved scan over
//! their sorted storage, with an early exit as soon as the classification is
//! fully determined.

use crate::props::PropSet;
use smallvec::SmallVec;

/// Classification of an ordered pair of sets `(a, b)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SetCompare {
    /// No common element, both sides have their own.
    Disjoint,
    /// At least one common element, neither side contains the other.
    Intersecting,
    /// `a` is strictly contained in `b`.
    ProperSubset,
    /// `a` strictly contains `b`.
    ProperSuperset,
    /// Neither side has an element the other lacks.
    Equal,
}

impl SetCompare {
    /// True when every element of `a` is in `b`.
    pub fn is_subset(self) -> bool {
        matches!(self, SetCompare::ProperSubset | SetCompare::Equal)
    }

    /// True when every element of `b` is in `a`.
    pub fn is_superset(self) -> bool {
        matches!(self, SetCompare::ProperSuperset | SetCompare::Equal)
    }

    /// True when the sets share at least one element, including containment.
    pub fn is_intersecting(self) -> bool {
        !matches!(self, SetCompare::Disjoint)
    }
}

/// Classify two sets in a single interleaved scan.
///
/// `Equal` is reported exactly when neither side has an element the other
/// lacks, so two empty sets compare `Equal`, not `Disjoint`. An empty set
/// against a non-empty one classifies as a proper subset by the standard
/// vacuous-containment rule.
pub fn compare_sets(a: &PropSet, b: &PropSet) -> SetCompare {
    let xs = a.as_slice();
    let ys = b.as_slice();
    let mut a_unique = false;
    let mut b_unique = false;
    let mut common = false;

    let mut i = 0;
    let mut j = 0;
    while i < xs.len() && j < ys.len() {
        match xs[i].cmp(&ys[j]) {
            std::cmp::Ordering::Less => {
                a_unique = true;
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                b_unique = true;
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                common = true;
                i += 1;
                j += 1;
            }
        }
        // Once both sides have unique elements and a common one was seen,
        // nothing later can change the answer.
        if a_unique && b_unique && common {
            return SetCompare::Intersecting;
        }
    }
    if i < xs.len() {
        a_unique = true;
    }
    if j < ys.len() {
        b_unique = true;
    }

    match (a_unique, b_unique) {
        (false, false) => SetCompare::Equal,
        (true, false) => SetCompare::ProperSuperset,
        (false, true) => SetCompare::ProperSubset,
        (true, true) => {
            if common {
                SetCompare::Intersecting
            } else {
                SetCompare::Disjoint
            }
        }
    }
}

/// Elements present in both sets.
pub fn intersect(a: &PropSet, b: &PropSet) -> PropSet {
    let xs = a.as_slice();
    let ys = b.as_slice();
    let mut out: SmallVec<[_; 8]> = SmallVec::new();
    let mut i = 0;
    let mut j = 0;
    while i < xs.len() && j < ys.len() {
        match xs[i].cmp(&ys[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(xs[i]);
                i += 1;
                j += 1;
            }
        }
    }
    PropSet::from_sorted(out)
}

/// Elements present in either set.
pub fn union(a: &PropSet, b: &PropSet) -> PropSet {
    let xs = a.as_slice();
    let ys = b.as_slice();
    let mut out: SmallVec<[_; 8]> = SmallVec::with_capacity(xs.len().max(ys.len()));
    let mut i = 0;
    let mut j = 0;
    while i < xs.len() && j < ys.len() {
        match xs[i].cmp(&ys[j]) {
            std::cmp::Ordering::Less => {
                out.push(xs[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(ys[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(xs[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&xs[i..]);
    out.extend_from_slice(&ys[j..]);
    PropSet::from_sorted(out)
}

#[cfg(test)]
#[path = "tests/set_ops.rs"]
mod tests;
