use std::{collections::BTreeSet, ops::Range};

use proptest::prelude::*;

use crate::model;

use super::*;

fn tree_of(keys: &[i32]) -> SplayTree {
    let mut tree = SplayTree::new();

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    tree
}

fn insert_find_all(keys: &[i32]) {
    let mut tree = tree_of(keys);

    for &key in keys {
        assert!(tree.search(key), "{key} not found");
        assert!(matches!(tree.depth(key), Some(0 | 1)));
        tree.assert_invariants();
    }

    assert_eq!(tree.size(), keys.len());
}

#[test]
fn zero_elems_find() {
    insert_find_all(&[]);
}

#[test]
fn single_elem_find() {
    insert_find_all(&[0]);
}

#[test]
fn two_elems_find() {
    insert_find_all(&[0, 1]);
    insert_find_all(&[1, 0]);
}

#[test]
fn three_elems_find() {
    insert_find_all(&[0, 1, 2]);
    insert_find_all(&[0, 2, 1]);
    insert_find_all(&[1, 0, 2]);
    insert_find_all(&[1, 2, 0]);
    insert_find_all(&[2, 0, 1]);
    insert_find_all(&[2, 1, 0]);
}

#[test]
fn four_elems_find() {
    insert_find_all(&[0, 1, 2, 3]);
    insert_find_all(&[0, 1, 3, 2]);
    insert_find_all(&[0, 2, 1, 3]);
    insert_find_all(&[0, 2, 3, 1]);
    insert_find_all(&[0, 3, 1, 2]);
    insert_find_all(&[0, 3, 2, 1]);

    insert_find_all(&[1, 0, 2, 3]);
    insert_find_all(&[1, 0, 3, 2]);
    insert_find_all(&[1, 2, 0, 3]);
    insert_find_all(&[1, 2, 3, 0]);
    insert_find_all(&[1, 3, 0, 2]);
    insert_find_all(&[1, 3, 2, 0]);

    insert_find_all(&[2, 0, 1, 3]);
    insert_find_all(&[2, 0, 3, 1]);
    insert_find_all(&[2, 1, 0, 3]);
    insert_find_all(&[2, 1, 3, 0]);
    insert_find_all(&[2, 3, 0, 1]);
    insert_find_all(&[2, 3, 1, 0]);

    insert_find_all(&[3, 0, 1, 2]);
    insert_find_all(&[3, 0, 2, 1]);
    insert_find_all(&[3, 1, 0, 2]);
    insert_find_all(&[3, 1, 2, 0]);
    insert_find_all(&[3, 2, 0, 1]);
    insert_find_all(&[3, 2, 1, 0]);
}

fn insert_remove_all(keys: &[i32]) {
    let mut tree = tree_of(keys);

    for &key in keys {
        assert!(tree.remove(key));
        tree.assert_invariants();
        assert!(!tree.contains(key));
    }
    assert!(tree.is_empty());

    for &key in keys {
        tree.insert(key);
        tree.assert_invariants();
    }

    for &key in keys.iter().rev() {
        assert!(tree.remove(key));
        tree.assert_invariants();
    }
    assert!(tree.is_empty());
    assert_eq!(tree.node_count(), 0);
}

#[test]
fn remove_one() {
    insert_remove_all(&[0]);
}

#[test]
fn remove_two() {
    insert_remove_all(&[0, 1]);
    insert_remove_all(&[1, 0]);
}

#[test]
fn remove_three() {
    insert_remove_all(&[0, 1, 2]);
    insert_remove_all(&[0, 2, 1]);
    insert_remove_all(&[1, 0, 2]);
    insert_remove_all(&[1, 2, 0]);
    insert_remove_all(&[2, 0, 1]);
    insert_remove_all(&[2, 1, 0]);
}

#[test]
fn remove_four() {
    insert_remove_all(&[0, 1, 2, 3]);
    insert_remove_all(&[0, 1, 3, 2]);
    insert_remove_all(&[0, 2, 1, 3]);
    insert_remove_all(&[0, 2, 3, 1]);
    insert_remove_all(&[0, 3, 1, 2]);
    insert_remove_all(&[0, 3, 2, 1]);

    insert_remove_all(&[1, 0, 2, 3]);
    insert_remove_all(&[1, 0, 3, 2]);
    insert_remove_all(&[1, 2, 0, 3]);
    insert_remove_all(&[1, 2, 3, 0]);
    insert_remove_all(&[1, 3, 0, 2]);
    insert_remove_all(&[1, 3, 2, 0]);

    insert_remove_all(&[2, 0, 1, 3]);
    insert_remove_all(&[2, 0, 3, 1]);
    insert_remove_all(&[2, 1, 0, 3]);
    insert_remove_all(&[2, 1, 3, 0]);
    insert_remove_all(&[2, 3, 0, 1]);
    insert_remove_all(&[2, 3, 1, 0]);

    insert_remove_all(&[3, 0, 1, 2]);
    insert_remove_all(&[3, 0, 2, 1]);
    insert_remove_all(&[3, 1, 0, 2]);
    insert_remove_all(&[3, 1, 2, 0]);
    insert_remove_all(&[3, 2, 0, 1]);
    insert_remove_all(&[3, 2, 1, 0]);
}

#[test]
fn first_insert_becomes_root() {
    let tree = tree_of(&[42]);
    assert_eq!(tree.root_key(), Some(42));
    assert_eq!(tree.post_order_string(), "42");
}

#[test]
fn splay_stops_below_root() {
    let mut tree = tree_of(&[5, 3]);

    // 3 is a child of the root, so no rotation happens.
    assert_eq!(tree.root_key(), Some(5));
    assert_eq!(tree.depth(3), Some(1));

    assert!(tree.search(3));
    assert_eq!(tree.root_key(), Some(5));
    assert_eq!(tree.stats(), SplayStats::new());
}

#[test]
fn duplicates_do_not_grow_size() {
    let tree = tree_of(&[5, 3, 5, 8]);

    assert_eq!(tree.size(), 3);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.node_count(), 4);
    assert_eq!(tree.iter().collect::<Vec<_>>(), vec![3, 5, 5, 8]);
}

#[test]
fn removing_one_duplicate_keeps_key() {
    let mut tree = tree_of(&[5, 3, 5, 8]);

    assert!(tree.remove(5));
    tree.assert_invariants();
    assert!(tree.contains(5));
    assert_eq!(tree.size(), 3);
    assert_eq!(tree.node_count(), 3);

    assert!(tree.remove(5));
    tree.assert_invariants();
    assert!(!tree.contains(5));
    assert_eq!(tree.size(), 2);
    assert_eq!(tree.iter().collect::<Vec<_>>(), vec![3, 8]);
}

#[test]
fn insert_leaves_new_key_near_root() {
    let tree = tree_of(&[5, 3, 8]);

    assert_eq!(tree.root_key(), Some(5));
    assert_eq!(tree.depth(8), Some(1));
}

#[test]
fn search_splays_hit() {
    let mut tree = tree_of(&[10, 5, 15, 3, 7]);

    assert!(tree.search(3));
    assert!(matches!(tree.depth(3), Some(0 | 1)));
    tree.assert_invariants();
}

#[test]
fn search_miss_leaves_tree_alone() {
    let mut tree = tree_of(&[10, 5, 15, 3, 7]);
    let before = tree.pre_order_keys();
    let stats = tree.stats();

    assert!(!tree.search(4));
    assert_eq!(tree.pre_order_keys(), before);
    assert_eq!(tree.stats(), stats);
}

#[test]
fn zig_zig_counts() {
    let tree = tree_of(&[1, 2, 3]);

    assert_eq!(tree.root_key(), Some(3));
    assert_eq!(tree.post_order_string(), "1,2,3");
    assert_eq!(tree.zig_zig_count(), 1);
    assert_eq!(tree.zig_zag_count(), 0);
    assert_eq!(tree.compare_count(), 2);
}

#[test]
fn zig_zag_counts() {
    let tree = tree_of(&[1, 3, 2]);

    assert_eq!(tree.root_key(), Some(2));
    assert_eq!(tree.post_order_string(), "1,3,2");
    assert_eq!(tree.pre_order_keys(), vec![2, 1, 3]);
    assert_eq!(tree.zig_zig_count(), 0);
    assert_eq!(tree.zig_zag_count(), 1);
    // Two for the step, one for rewriting the root's child link.
    assert_eq!(tree.compare_count(), 3);
}

#[test]
fn reset_stats_zeroes_counters() {
    let mut tree = tree_of(&[1, 3, 2]);
    tree.reset_stats();
    assert_eq!(tree.stats(), SplayStats::default());
    assert_eq!(tree.root_key(), Some(2));
}

#[test]
fn operation_log_scenario() {
    // a5 a3 a8 f3 r8
    let mut tree = SplayTree::new();
    tree.insert(5);
    tree.insert(3);
    tree.insert(8);
    assert_eq!(tree.iter().collect::<Vec<_>>(), vec![3, 5, 8]);

    assert!(tree.search(3));

    assert!(tree.remove(8));
    assert_eq!(tree.size(), 2);
    assert_eq!(tree.post_order_string(), "3,5");
    tree.assert_invariants();
}

#[test]
fn remove_absent_is_noop() {
    let mut tree = tree_of(&[10, 5, 15, 3, 7]);
    let before = tree.post_order_string();

    assert!(!tree.remove(999));
    assert_eq!(tree.size(), 5);
    assert_eq!(tree.post_order_string(), before);
}

#[test]
fn remove_root_with_two_children() {
    let mut tree = tree_of(&[10, 5, 15, 3, 7, 12, 20]);

    assert!(tree.remove(10));
    tree.assert_invariants();
    assert_eq!(tree.iter().collect::<Vec<_>>(), vec![3, 5, 7, 12, 15, 20]);
    assert_eq!(tree.size(), 6);
}

#[test]
fn monotonic_inserts() {
    let keys: Vec<i32> = (0..2000).collect();
    let mut tree = tree_of(&[]);

    for &key in &keys {
        tree.insert(key);
    }
    tree.assert_invariants();
    assert_eq!(tree.size(), keys.len());
    assert!(tree.iter().eq(keys.iter().copied()));

    for &key in keys.iter().rev() {
        assert!(tree.search(key));
    }
    tree.assert_invariants();

    tree.clear();
    assert!(tree.is_empty());
    assert!(tree.iter().next().is_none());
}

#[test]
fn traversals_from_key() {
    let tree = tree_of(&[1, 3, 2]);

    let mut seen = Vec::new();
    assert!(tree.post_order_traverse_from(2, |key| seen.push(key)));
    assert_eq!(seen, vec![1, 3, 2]);

    seen.clear();
    assert!(tree.pre_order_traverse_from(3, |key| seen.push(key)));
    assert_eq!(seen, vec![3]);

    seen.clear();
    assert!(!tree.post_order_traverse_from(9, |key| seen.push(key)));
    assert!(seen.is_empty());
}

#[test]
fn empty_traversals() {
    let tree = SplayTree::new();
    assert_eq!(tree.post_order_string(), "");
    assert!(tree.pre_order_keys().is_empty());
    assert_eq!(tree.root_key(), None);
}

#[test]
fn dotgraph_smoke() {
    let tree = tree_of(&[1, 3, 2]);
    let mut out = String::new();
    tree.dotgraph("t", &mut out).unwrap();

    assert!(out.starts_with("digraph \"graph-t\""));
    assert!(out.contains("[label=\"2\"]"));
    assert!(out.contains("\"grapht-0\" -> \"grapht-1\";"));

    let mut empty = String::new();
    SplayTree::new().dotgraph("e", &mut empty).unwrap();
    assert_eq!(empty, "digraph \"graph-e\" {}");
}

#[cfg(miri)]
const FUZZ_RANGE: Range<usize> = 0..10;

#[cfg(not(miri))]
const FUZZ_RANGE: Range<usize> = 0..1000;

proptest::proptest! {
    #![proptest_config(ProptestConfig {
        max_shrink_iters: 65536,
        .. ProptestConfig::default()
    })]

    #[test]
    fn multiset_equivalence(ops in proptest::collection::vec(model::op_strategy(), FUZZ_RANGE)) {
        model::run_multiset_equivalence(ops);
    }

    #[test]
    fn remove_then_reinsert(keys in proptest::collection::btree_set(-1000i32..1000, 1..200), pick in any::<proptest::sample::Index>()) {
        let keys: Vec<i32> = keys.into_iter().collect();
        let mut tree = tree_of(&keys);
        let key = keys[pick.index(keys.len())];

        prop_assert!(tree.remove(key));
        tree.insert(key);

        prop_assert!(tree.is_valid_splay_structure());
        prop_assert_eq!(tree.size(), keys.len());
    }

    #[test]
    fn remove_absent_keeps_shape(keys in proptest::collection::vec(-1000i32..1000, 0..200), absent in 1000i32..2000) {
        let mut tree = tree_of(&keys);
        let distinct = keys.iter().collect::<BTreeSet<_>>().len();
        let before = tree.post_order_string();

        prop_assert!(!tree.remove(absent));
        prop_assert_eq!(tree.size(), distinct);
        prop_assert_eq!(tree.post_order_string(), before);
    }
}
