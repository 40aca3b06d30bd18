use crate::{key_of, links, Dir, Link, SplayTree};

enum CameFrom {
    Parent,
    LeftChild,
    Here,
    RightChild,
}

/// An in-order iterator over the keys of a [`SplayTree`].
///
/// Iterating does not splay; the tree shape is left untouched.
pub struct Iter<'tree> {
    tree: &'tree SplayTree,

    front_cur: Link,
    front_from: CameFrom,

    len: usize,
}

impl<'tree> Iter<'tree> {
    pub(crate) fn new(tree: &'tree SplayTree) -> Self {
        Iter {
            tree,

            front_cur: tree.root,
            front_from: CameFrom::Parent,
            len: tree.node_count(),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let mut cur = self.front_cur?;

        loop {
            match self.front_from {
                CameFrom::Parent => {
                    // Upon entering a new subtree, find the minimum element.
                    while let Some(left) = unsafe { links(cur).left() } {
                        cur = left;
                    }

                    // Once the minimum is found, its (empty) left subtree has been exhausted.
                    self.front_from = CameFrom::LeftChild;
                }

                CameFrom::LeftChild => {
                    // The left subtree has been exhausted, so this node is up next. Save off the
                    // iterator state and return it.
                    self.front_cur = Some(cur);
                    self.front_from = CameFrom::Here;
                    self.len -= 1;

                    return Some(unsafe { key_of(cur) });
                }

                CameFrom::Here => {
                    // The current node was just yielded.
                    if let Some(right) = unsafe { links(cur).right() } {
                        // If the right subtree is not empty, go there.
                        self.front_from = CameFrom::Parent;

                        cur = right;
                    } else if let Some(parent) = unsafe { links(cur).parent() } {
                        // Otherwise, ascend one level.
                        self.front_from = match unsafe { self.tree.which_child(parent, cur) } {
                            Dir::Left => CameFrom::LeftChild,
                            Dir::Right => CameFrom::RightChild,
                        };

                        cur = parent;
                    } else {
                        unreachable!()
                    }
                }

                CameFrom::RightChild => {
                    // Ascend until we find the successor element.
                    while let Some(parent) = unsafe { links(cur).parent() } {
                        match unsafe { self.tree.which_child(parent, cur) } {
                            Dir::Left => break,
                            Dir::Right => cur = parent,
                        }
                    }

                    // `cur` is now a left child; its parent is the successor.
                    match unsafe { links(cur).parent() } {
                        Some(parent) => {
                            cur = parent;
                            self.front_from = CameFrom::LeftChild;
                        }
                        None => unreachable!("ran past the maximum with items left"),
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'tree> IntoIterator for &'tree SplayTree {
    type Item = i32;
    type IntoIter = Iter<'tree>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
