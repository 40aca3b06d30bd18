//! Depth-first traversals.
//!
//! Both traversals run on an explicit stack, so a degenerate tree (say, one built from
//! monotonically increasing inserts) cannot exhaust the call stack.

use core::fmt::Write;

use crate::{key_of, links, Link, SplayTree};

impl SplayTree {
    /// Calls `visit` with every key in post-order, starting at the root.
    pub fn post_order_traverse<F: FnMut(i32)>(&self, visit: F) {
        post_order(self.root, visit);
    }

    /// Calls `visit` with every key in pre-order, starting at the root.
    pub fn pre_order_traverse<F: FnMut(i32)>(&self, visit: F) {
        pre_order(self.root, visit);
    }

    /// Post-order traversal of the subtree rooted at the first node holding `key`.
    ///
    /// Returns `false`, without calling `visit`, if no node holds `key`. Does not splay.
    pub fn post_order_traverse_from<F: FnMut(i32)>(&self, key: i32, visit: F) -> bool {
        let start = self.get_raw(key);
        post_order(start, visit);
        start.is_some()
    }

    /// Pre-order traversal of the subtree rooted at the first node holding `key`.
    ///
    /// Returns `false`, without calling `visit`, if no node holds `key`. Does not splay.
    pub fn pre_order_traverse_from<F: FnMut(i32)>(&self, key: i32, visit: F) -> bool {
        let start = self.get_raw(key);
        pre_order(start, visit);
        start.is_some()
    }

    /// Returns the keys in post-order.
    pub fn post_order_keys(&self) -> Vec<i32> {
        let mut keys = Vec::with_capacity(self.nodes);
        self.post_order_traverse(|key| keys.push(key));
        keys
    }

    /// Returns the keys in pre-order.
    pub fn pre_order_keys(&self) -> Vec<i32> {
        let mut keys = Vec::with_capacity(self.nodes);
        self.pre_order_traverse(|key| keys.push(key));
        keys
    }

    /// Renders the post-order traversal as comma-separated keys, e.g. `3,8,5`.
    ///
    /// The root comes last, so there is no separator after it.
    pub fn post_order_string(&self) -> String {
        let mut out = String::new();

        self.post_order_traverse(|key| {
            if !out.is_empty() {
                out.push(',');
            }

            // Writing to a String cannot fail.
            let _ = write!(out, "{key}");
        });

        out
    }
}

fn post_order<F: FnMut(i32)>(start: Link, mut visit: F) {
    let mut stack = Vec::new();
    stack.extend(start.map(|node| (node, false)));

    while let Some((node, expanded)) = stack.pop() {
        unsafe {
            if expanded {
                visit(key_of(node));
                continue;
            }

            // Revisit this node once both subtrees are done; the left one is popped first.
            stack.push((node, true));
            stack.extend(links(node).right().map(|right| (right, false)));
            stack.extend(links(node).left().map(|left| (left, false)));
        }
    }
}

fn pre_order<F: FnMut(i32)>(start: Link, mut visit: F) {
    let mut stack = Vec::new();
    stack.extend(start);

    while let Some(node) = stack.pop() {
        unsafe {
            visit(key_of(node));

            stack.extend(links(node).right());
            stack.extend(links(node).left());
        }
    }
}
