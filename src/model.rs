//! Model-based testing: replays an operation sequence against both a [`SplayTree`] and a
//! `BTreeMap` multiset, and checks they agree after every step.

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use proptest::strategy::Strategy;

use crate::SplayTree;

#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum ItemValue {
    /// Picks an existing key by position, so removals and finds tend to hit.
    Index(usize),
    Random(i32),
}

proptest::prop_compose! {
    fn index_strategy()(
        index in 0usize..1000,
    ) -> ItemValue {
        ItemValue::Index(index)
    }
}

proptest::prop_compose! {
    fn random_strategy()(
        random in -500i32..500,
    ) -> ItemValue {
        ItemValue::Random(random)
    }
}

fn value_strategy() -> impl Strategy<Value = ItemValue> {
    proptest::prop_oneof![index_strategy(), random_strategy()]
}

/// One line of an operation log: `a<N>`, `r<N>` or `f<N>`.
#[derive(Copy, Clone, Debug, Arbitrary)]
pub enum Op {
    Insert(ItemValue),
    Remove(ItemValue),
    Find(ItemValue),
}

impl Op {
    fn finalize(self, keys: &[i32]) -> FinalOp {
        fn get_value(v: &[i32], i: ItemValue) -> i32 {
            match i {
                ItemValue::Index(idx) => {
                    if v.is_empty() {
                        idx as i32
                    } else {
                        v[idx % v.len()]
                    }
                }
                ItemValue::Random(v) => v,
            }
        }

        match self {
            Op::Insert(item) => FinalOp::Insert(get_value(keys, item)),
            Op::Remove(item) => FinalOp::Remove(get_value(keys, item)),
            Op::Find(item) => FinalOp::Find(get_value(keys, item)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum FinalOp {
    Insert(i32),
    Remove(i32),
    Find(i32),
}

pub fn op_strategy() -> impl Strategy<Value = Op> {
    proptest::prop_oneof![
        value_strategy().prop_map(Op::Insert),
        value_strategy().prop_map(Op::Remove),
        value_strategy().prop_map(Op::Find),
    ]
}

pub fn run_multiset_equivalence(ops: Vec<Op>) {
    let mut model: BTreeMap<i32, usize> = BTreeMap::new();
    let mut tree = SplayTree::new();

    for (op_id, op) in ops.into_iter().enumerate() {
        let keys: Vec<i32> = model.keys().copied().collect();
        let final_op = op.finalize(&keys);

        match final_op {
            FinalOp::Insert(key) => {
                *model.entry(key).or_insert(0) += 1;
                tree.insert(key);

                let depth = tree.depth(key);
                assert!(
                    matches!(depth, Some(0 | 1)),
                    "FinalOp #{op_id}: {final_op:?} left key at depth {depth:?}"
                );
            }

            FinalOp::Remove(key) => {
                let before = tree.post_order_string();

                let from_model = match model.get_mut(&key) {
                    Some(count) => {
                        *count -= 1;
                        if *count == 0 {
                            model.remove(&key);
                        }
                        true
                    }
                    None => false,
                };
                let from_tree = tree.remove(key);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");

                if !from_tree {
                    assert_eq!(before, tree.post_order_string(), "FinalOp #{op_id}: {final_op:?}");
                }
            }

            FinalOp::Find(key) => {
                let before = tree.post_order_string();

                let from_model = model.contains_key(&key);
                let from_tree = tree.search(key);

                assert_eq!(from_model, from_tree, "FinalOp #{op_id}: {final_op:?}");

                if from_tree {
                    let depth = tree.depth(key);
                    assert!(
                        matches!(depth, Some(0 | 1)),
                        "FinalOp #{op_id}: {final_op:?} left key at depth {depth:?}"
                    );
                } else {
                    assert_eq!(before, tree.post_order_string(), "FinalOp #{op_id}: {final_op:?}");
                }
            }
        }

        tree.assert_invariants();
        assert_eq!(model.len(), tree.size());
        assert_eq!(model.values().sum::<usize>(), tree.node_count());
        assert!(model
            .iter()
            .flat_map(|(&key, &count)| std::iter::repeat(key).take(count))
            .eq(tree.iter()));
    }
}
