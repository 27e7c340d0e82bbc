//! Coincidence counting and the non-trivial declaration filter.
//!
//! Two declarations coincide when they appear together in one rule's set.
//! Declarations that never co-occur with a distinct declaration more than
//! once are pruned before enumeration; this keeps the powerset tractable.

use crate::composite_map::CompositeMap;
use crate::index::{PropertyIndex, RuleIndex};
use crate::props::PropSet;
use crate::set_ops::intersect;
use crate::symbol::{PropId, RuleId};
use hashbrown::HashSet;

#[cfg(feature = "tracing")]
use crate::trace::debug;

/// Immutable corpus-wide coincidence data, built once and passed by
/// reference into every component that needs it.
pub struct CoincidenceContext {
    counts: CompositeMap<PropId, u32>,
    non_trivial: HashSet<PropId>,
}

impl CoincidenceContext {
    /// Count pairwise coincidences over the whole corpus and flag the
    /// non-trivial declarations.
    ///
    /// A declaration qualifies once some distinct-pair coincidence count
    /// reaches 2, i.e. the pair was already counted once before the current
    /// increment.
    pub fn build(rules: &RuleIndex, props: &PropertyIndex) -> Self {
        let mut counts: CompositeMap<PropId, u32> = CompositeMap::new();
        let mut non_trivial = HashSet::new();

        for prop in props.props() {
            for &rule in props.rules_for(prop) {
                let Some(rule_props) = rules.get(rule) else {
                    continue;
                };
                for other in rule_props.iter() {
                    let prev = counts.get(&[prop, other]).copied().unwrap_or(0);
                    counts.set(&[prop, other], prev + 1);
                    if other != prop && prev > 0 {
                        non_trivial.insert(prop);
                    }
                }
            }
        }

        #[cfg(feature = "tracing")]
        debug!(
            props = props.len(),
            non_trivial = non_trivial.len(),
            "coincidence filter built"
        );

        Self { counts, non_trivial }
    }

    /// How many times the two declarations co-occur across all rules.
    /// Symmetric: both key orderings resolve to the same count.
    pub fn count(&self, a: PropId, b: PropId) -> u32 {
        self.counts.get(&[a, b]).copied().unwrap_or(0)
    }

    /// Declarations that co-occur with some distinct declaration more than
    /// once.
    pub fn non_trivial(&self) -> &HashSet<PropId> {
        &self.non_trivial
    }

    /// Consume the context, keeping only the pruning set for dispatch to
    /// workers.
    pub fn into_non_trivial(self) -> HashSet<PropId> {
        self.non_trivial
    }
}

/// Intersection of every unordered pair of rule declaration sets.
///
/// A diagnostic complement to the coincidence counts; pairs with an empty
/// intersection are omitted.
pub fn pairwise_intersections(rules: &RuleIndex) -> CompositeMap<RuleId, PropSet> {
    let mut out = CompositeMap::new();
    let entries = rules.entries();
    for (i, (left, left_props)) in entries.iter().enumerate() {
        for (right, right_props) in &entries[i + 1..] {
            let shared = intersect(left_props, right_props);
            if !shared.is_empty() {
                out.set(&[*left, *right], shared);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbol::SymbolStore;

    fn index(store: &SymbolStore, rules: &[(&str, &[&str])]) -> RuleIndex {
        RuleIndex::from_entries(rules.iter().map(|(rule, decls)| {
            (
                store.intern_rule(rule),
                decls.iter().map(|d| store.intern_prop(d)).collect(),
            )
        }))
        .unwrap()
    }

    #[test]
    fn counts_are_symmetric() {
        let store = SymbolStore::new();
        let rules = index(
            &store,
            &[(".a", &["x", "y"]), (".b", &["x", "y"]), (".c", &["x"])],
        );
        let props = PropertyIndex::build(&rules);
        let ctx = CoincidenceContext::build(&rules, &props);

        let x = store.intern_prop("x");
        let y = store.intern_prop("y");
        assert_eq!(ctx.count(x, y), 2);
        assert_eq!(ctx.count(y, x), 2);
        // diagonal counts every occurrence of the declaration
        assert_eq!(ctx.count(x, x), 3);
    }

    #[test]
    fn single_coincidence_is_trivial() {
        // x and y co-occur exactly once; neither qualifies.
        let store = SymbolStore::new();
        let rules = index(&store, &[(".a", &["x", "y"]), (".b", &["x"])]);
        let props = PropertyIndex::build(&rules);
        let ctx = CoincidenceContext::build(&rules, &props);

        assert!(ctx.non_trivial().is_empty());
    }

    #[test]
    fn repeated_coincidence_qualifies_both_sides() {
        let store = SymbolStore::new();
        let rules = index(&store, &[(".a", &["x", "y"]), (".b", &["x", "y"])]);
        let props = PropertyIndex::build(&rules);
        let ctx = CoincidenceContext::build(&rules, &props);

        let x = store.intern_prop("x");
        let y = store.intern_prop("y");
        assert!(ctx.non_trivial().contains(&x));
        assert!(ctx.non_trivial().contains(&y));
    }

    #[test]
    fn lone_declaration_never_qualifies() {
        let store = SymbolStore::new();
        let rules = index(
            &store,
            &[(".a", &["x", "y"]), (".b", &["x", "y"]), (".c", &["z"])],
        );
        let props = PropertyIndex::build(&rules);
        let ctx = CoincidenceContext::build(&rules, &props);

        let z = store.intern_prop("z");
        assert!(!ctx.non_trivial().contains(&z));
    }

    #[test]
    fn pairwise_intersections_cover_all_pairs() {
        let store = SymbolStore::new();
        let rules = index(
            &store,
            &[(".a", &["x", "y"]), (".b", &["y", "z"]), (".c", &["w"])],
        );
        let shared = pairwise_intersections(&rules);

        let a = store.intern_rule(".a");
        let b = store.intern_rule(".b");
        let y = store.intern_prop("y");
        let got = shared.get(&[a, b]).unwrap();
        assert_eq!(got.iter().collect::<Vec<_>>(), vec![y]);
        // .c shares nothing with anyone
        assert_eq!(shared.len(), 1);
    }
}
