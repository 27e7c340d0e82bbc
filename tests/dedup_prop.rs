//! Property tests for the dedup collection's merge semantics.
//!
//! Parallel merging is only correct if insertion order cannot change the
//! final content; these tests drive that with arbitrary set sequences.

use declmine::dedup::DedupSets;
use declmine::props::PropSet;
use declmine::set_ops::{compare_sets, SetCompare};
use declmine::symbol::{PropId, SymbolStore};
use proptest::prelude::*;
use std::collections::BTreeSet;

const ALPHABET: usize = 8;

fn interned_alphabet() -> (SymbolStore, Vec<PropId>) {
    let store = SymbolStore::new();
    let props = (0..ALPHABET)
        .map(|i| store.intern_prop(&format!("prop{}", i)))
        .collect();
    (store, props)
}

fn materialize(props: &[PropId], raw: &[BTreeSet<usize>]) -> Vec<PropSet> {
    raw.iter()
        .map(|s| s.iter().map(|&i| props[i]).collect())
        .collect()
}

fn build(sets: Vec<PropSet>) -> DedupSets {
    let mut out = DedupSets::new();
    for s in sets {
        out.add(s);
    }
    out
}

fn content(sets: &DedupSets) -> Vec<Vec<PropId>> {
    let mut out: Vec<Vec<PropId>> = sets.iter().map(|s| s.iter().collect()).collect();
    out.sort();
    out
}

fn raw_sets() -> impl Strategy<Value = Vec<BTreeSet<usize>>> {
    prop::collection::vec(prop::collection::btree_set(0..ALPHABET, 1..5), 0..12)
}

proptest! {
    #[test]
    fn insertion_order_does_not_change_content(
        (raw, shuffled) in raw_sets().prop_flat_map(|raw| {
            let shuffled = Just(raw.clone()).prop_shuffle();
            (Just(raw), shuffled)
        })
    ) {
        let (_store, props) = interned_alphabet();
        let forward = build(materialize(&props, &raw));
        let reordered = build(materialize(&props, &shuffled));
        prop_assert_eq!(content(&forward), content(&reordered));
    }

    #[test]
    fn members_stay_pairwise_disjoint(raw in raw_sets()) {
        let (_store, props) = interned_alphabet();
        let sets = build(materialize(&props, &raw));
        let members: Vec<&PropSet> = sets.iter().collect();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                prop_assert_eq!(compare_sets(a, b), SetCompare::Disjoint);
            }
        }
    }

    #[test]
    fn reinserting_members_is_idempotent(raw in raw_sets()) {
        let (_store, props) = interned_alphabet();
        let sets = build(materialize(&props, &raw));
        let before = content(&sets);

        let mut again = sets.clone();
        for member in sets.iter() {
            again.add(member.clone());
        }
        prop_assert_eq!(before, content(&again));
    }

    #[test]
    fn split_merge_equals_sequential_build(
        (raw, split) in raw_sets().prop_flat_map(|raw| {
            let len = raw.len();
            (Just(raw), 0..=len)
        })
    ) {
        // building two partial collections and absorbing one into the other
        // must match building a single collection from the whole sequence
        let (_store, props) = interned_alphabet();
        let all = materialize(&props, &raw);
        let sequential = build(all.clone());

        let (left, right) = all.split_at(split);
        let mut merged = build(left.to_vec());
        merged.absorb(build(right.to_vec()));

        prop_assert_eq!(content(&sequential), content(&merged));
    }
}
