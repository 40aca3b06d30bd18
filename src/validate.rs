use core::ptr::NonNull;

use crate::{key_of, links, SplayNode, SplayTree};

/// A broken structural invariant, as reported by [`SplayTree::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A key in the left subtree of `ancestor` is greater than the ancestor's key.
    #[error("key {key} sits in the left subtree of {ancestor} but is greater")]
    LeftOutOfOrder { ancestor: i32, key: i32 },

    /// A key in the right subtree of `ancestor` is less than the ancestor's key.
    #[error("key {key} sits in the right subtree of {ancestor} but is less")]
    RightOutOfOrder { ancestor: i32, key: i32 },

    /// A child's parent link does not point back at the node holding it.
    #[error("child {child} of node {parent} does not link back to it")]
    ParentMismatch { parent: i32, child: i32 },

    /// The root has a parent link.
    #[error("root {root} has a parent link")]
    RootHasParent { root: i32 },

    /// The recorded size is not the number of distinct keys.
    #[error("size is {recorded} but the tree holds {actual} distinct keys")]
    SizeMismatch { recorded: usize, actual: usize },

    /// The recorded node count is not the number of reachable nodes.
    #[error("node count is {recorded} but {actual} nodes are reachable")]
    NodeCountMismatch { recorded: usize, actual: usize },
}

// The nearest ancestors bounding a subtree from below and above.
#[derive(Copy, Clone)]
struct Bounds {
    lower: Option<i32>,
    upper: Option<i32>,
}

impl SplayTree {
    /// Checks every structural invariant and returns all violations found.
    ///
    /// A violation does not stop the walk; the rest of the tree is still checked. An empty result
    /// means the tree is sound.
    pub fn validate(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        let Some(root) = self.root else {
            if self.size != 0 {
                violations.push(Violation::SizeMismatch {
                    recorded: self.size,
                    actual: 0,
                });
            }

            if self.nodes != 0 {
                violations.push(Violation::NodeCountMismatch {
                    recorded: self.nodes,
                    actual: 0,
                });
            }

            return violations;
        };

        unsafe {
            if links(root).parent().is_some() {
                violations.push(Violation::RootHasParent {
                    root: key_of(root),
                });
            }
        }

        let mut reachable = 0;
        let mut stack: Vec<(NonNull<SplayNode>, Bounds)> = vec![(
            root,
            Bounds {
                lower: None,
                upper: None,
            },
        )];

        while let Some((node, bounds)) = stack.pop() {
            reachable += 1;

            unsafe {
                let key = key_of(node);

                if let Some(upper) = bounds.upper.filter(|&upper| key > upper) {
                    violations.push(Violation::LeftOutOfOrder {
                        ancestor: upper,
                        key,
                    });
                } else if let Some(lower) = bounds.lower.filter(|&lower| key < lower) {
                    violations.push(Violation::RightOutOfOrder {
                        ancestor: lower,
                        key,
                    });
                }

                if let Some(left) = links(node).left() {
                    if links(left).parent() != Some(node) {
                        violations.push(Violation::ParentMismatch {
                            parent: key,
                            child: key_of(left),
                        });
                    }

                    stack.push((
                        left,
                        Bounds {
                            upper: Some(key),
                            ..bounds
                        },
                    ));
                }

                if let Some(right) = links(node).right() {
                    if links(right).parent() != Some(node) {
                        violations.push(Violation::ParentMismatch {
                            parent: key,
                            child: key_of(right),
                        });
                    }

                    stack.push((
                        right,
                        Bounds {
                            lower: Some(key),
                            ..bounds
                        },
                    ));
                }
            }
        }

        if reachable != self.nodes {
            violations.push(Violation::NodeCountMismatch {
                recorded: self.nodes,
                actual: reachable,
            });
        }

        let mut distinct = 0;
        let mut prev = None;
        for key in self.iter() {
            if prev != Some(key) {
                distinct += 1;
            }
            prev = Some(key);
        }

        if distinct != self.size {
            violations.push(Violation::SizeMismatch {
                recorded: self.size,
                actual: distinct,
            });
        }

        violations
    }

    /// Returns `true` if [`validate`](SplayTree::validate) finds no violation.
    pub fn is_valid_splay_structure(&self) -> bool {
        self.validate().is_empty()
    }

    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let violations = self.validate();

        if !violations.is_empty() {
            let report: Vec<String> = violations.iter().map(ToString::to_string).collect();
            panic!("splay tree invariants violated:\n{}", report.join("\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_valid() {
        let tree = SplayTree::new();
        assert!(tree.validate().is_empty());
        assert!(tree.is_valid_splay_structure());
    }

    #[test]
    fn detects_out_of_order_and_keeps_walking() {
        let mut tree = SplayTree::new();
        for key in [10, 5, 15] {
            tree.insert(key);
        }
        tree.assert_invariants();

        // Corrupt two leaves in place.
        let root = tree.root.unwrap();
        unsafe {
            let left = links(root).left().unwrap();
            let right = links(root).right().unwrap();
            let (lo, hi) = (key_of(left), key_of(right));
            (*left.as_ptr()).key = 100;
            (*right.as_ptr()).key = -100;

            let violations = tree.validate();
            assert!(violations.contains(&Violation::LeftOutOfOrder {
                ancestor: key_of(root),
                key: 100,
            }));
            assert!(violations.contains(&Violation::RightOutOfOrder {
                ancestor: key_of(root),
                key: -100,
            }));
            assert!(!tree.is_valid_splay_structure());

            // Restore so the tree drops cleanly.
            (*left.as_ptr()).key = lo;
            (*right.as_ptr()).key = hi;
        }

        tree.assert_invariants();
    }

    #[test]
    fn violation_messages() {
        let v = Violation::ParentMismatch {
            parent: 4,
            child: 2,
        };
        assert_eq!(v.to_string(), "child 2 of node 4 does not link back to it");

        let v = Violation::SizeMismatch {
            recorded: 3,
            actual: 2,
        };
        assert_eq!(v.to_string(), "size is 3 but the tree holds 2 distinct keys");
    }
}
