use super::*;
use crate::symbol::{PropId, SymbolStore};

fn fixture() -> (SymbolStore, Vec<PropId>) {
    let store = SymbolStore::new();
    let props = (0..8).map(|i| store.intern_prop(&format!("p{}", i))).collect();
    (store, props)
}

fn set(props: &[PropId], idx: &[usize]) -> PropSet {
    idx.iter().map(|&i| props[i]).collect()
}

fn members_sorted(sets: &DedupSets) -> Vec<Vec<PropId>> {
    let mut out: Vec<Vec<PropId>> = sets.iter().map(|s| s.iter().collect()).collect();
    out.sort();
    out
}

fn assert_closure_invariant(sets: &DedupSets) {
    let members: Vec<&PropSet> = sets.iter().collect();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            assert_eq!(
                compare_sets(a, b),
                SetCompare::Disjoint,
                "members {:?} and {:?} are not disjoint",
                a,
                b
            );
        }
    }
}

// ========== ABSORPTION TESTS ==========

#[test]
fn plain_insert() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[2, 3]));
    assert_eq!(sets.len(), 2);
    assert_closure_invariant(&sets);
}

#[test]
fn covered_candidate_is_dropped() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1, 2]));
    sets.add(set(&p, &[0, 1]));
    assert_eq!(sets.len(), 1);
    assert!(sets.contains(&set(&p, &[0, 1, 2])));
}

#[test]
fn reinsert_is_noop() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[0, 1]));
    assert_eq!(sets.len(), 1);
}

#[test]
fn superset_replaces_member() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[0, 1, 2]));
    assert_eq!(sets.len(), 1);
    assert!(sets.contains(&set(&p, &[0, 1, 2])));
}

#[test]
fn intersecting_members_merge_into_union() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[1, 2]));
    assert_eq!(sets.len(), 1);
    assert!(sets.contains(&set(&p, &[0, 1, 2])));
}

#[test]
fn one_insert_can_bridge_two_members() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[3, 4]));
    sets.add(set(&p, &[1, 3]));
    assert_eq!(sets.len(), 1);
    assert!(sets.contains(&set(&p, &[0, 1, 3, 4])));
    assert_closure_invariant(&sets);
}

#[test]
fn disjoint_member_survives_a_merge() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    sets.add(set(&p, &[0, 1]));
    sets.add(set(&p, &[5, 6]));
    sets.add(set(&p, &[1, 2]));
    assert_eq!(sets.len(), 2);
    assert!(sets.contains(&set(&p, &[0, 1, 2])));
    assert!(sets.contains(&set(&p, &[5, 6])));
    assert_closure_invariant(&sets);
}

// ========== MERGE TESTS ==========

#[test]
fn absorbing_worker_partials_merges_common_element() {
    // two worker partials {p,q} and {q,r} must coalesce into {p,q,r}
    let (_s, p) = fixture();
    let mut left = DedupSets::new();
    left.add(set(&p, &[0, 1]));
    let mut right = DedupSets::new();
    right.add(set(&p, &[1, 2]));

    let mut merged = DedupSets::new();
    merged.absorb(left);
    merged.absorb(right);

    assert_eq!(merged.len(), 1);
    assert!(merged.contains(&set(&p, &[0, 1, 2])));
}

#[test]
fn merge_order_does_not_change_content() {
    let (_s, p) = fixture();
    let inserts = [
        set(&p, &[0, 1]),
        set(&p, &[1, 2]),
        set(&p, &[4, 5]),
        set(&p, &[0, 1, 2]),
        set(&p, &[5, 6]),
        set(&p, &[3, 4]),
    ];

    let mut forward = DedupSets::new();
    for s in inserts.iter().cloned() {
        forward.add(s);
    }
    let mut backward = DedupSets::new();
    for s in inserts.iter().rev().cloned() {
        backward.add(s);
    }

    assert_eq!(members_sorted(&forward), members_sorted(&backward));
    assert_closure_invariant(&forward);
    assert_closure_invariant(&backward);
}

#[test]
fn closure_holds_after_arbitrary_sequence() {
    let (_s, p) = fixture();
    let mut sets = DedupSets::new();
    for chunk in [
        &[0usize, 1][..],
        &[2, 3],
        &[1, 2],
        &[5, 6],
        &[0, 5],
        &[6, 7],
        &[0, 1, 2, 3],
    ] {
        sets.add(set(&p, chunk));
        assert_closure_invariant(&sets);
    }
    // everything has been bridged into one component
    assert_eq!(sets.len(), 1);
    assert!(sets.contains(&set(&p, &[0, 1, 2, 3, 5, 6, 7])));
}
