//! An intrusive splay tree over `i32` keys.

// Conventions used in comments:
// - `x` is the node being splayed, `p(x)` its parent and `g(x)` its grandparent.
// - A node is an `l`-child or an `r`-child depending on which link of its parent holds it.
//
// The invariants of the tree, checked by `validate()`:
// 1. Every key in the left subtree of `n` is at most `n`'s key, and every key in its right
//    subtree is at least `n`'s key. Inserts route equal keys right; only a rotation between two
//    equal keys moves one to the left of the other, so with distinct keys the left bound is strict.
// 2. Every child's parent link points at the node holding it, and the root has no parent.
// 3. `size` counts distinct keys, and is zero iff the tree is empty.
//
// Splaying stops one step short of the textbook algorithm: when `p(x)` is the root, `x` is left
// where it is. Every access therefore leaves the accessed node at depth 0 or 1.

use core::{cell::UnsafeCell, cmp::Ordering, fmt, marker::PhantomPinned, mem, ops::Not, ptr::NonNull};

use cordyceps::Linked;
use tracing::{debug, trace};

mod debug;
mod iter;
mod stats;
mod traverse;
mod validate;

#[cfg(any(test, feature = "model"))]
pub mod model;

#[cfg(test)]
mod tests;

pub use iter::Iter;
pub use stats::SplayStats;
pub use validate::Violation;

/// A splay tree keyed on `i32`.
///
/// Every access moves the touched node toward the root through zig-zig and zig-zag steps, which
/// gives amortized _O(log(n))_ operations with no balance bookkeeping. Duplicate keys are
/// allowed; each insert creates a new node, but [`size`](SplayTree::size) only counts distinct
/// keys.
pub struct SplayTree {
    root: Link,
    size: usize,
    nodes: usize,
    stats: SplayStats,
}

/// A heap-allocated tree node.
#[repr(C)]
pub(crate) struct SplayNode {
    links: Links,
    key: i32,
}

pub(crate) struct Links {
    inner: UnsafeCell<LinksInner>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

impl Not for Dir {
    type Output = Dir;

    fn not(self) -> Self::Output {
        match self {
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

#[repr(C)]
struct LinksInner {
    parent: Link,
    children: [Link; 2],
    _unpin: PhantomPinned,
}

pub(crate) type Link = Option<NonNull<SplayNode>>;

impl SplayNode {
    pub(crate) fn new(key: i32) -> Box<SplayNode> {
        Box::new(SplayNode {
            links: Links::new(),
            key,
        })
    }

    #[inline]
    pub(crate) fn key(&self) -> i32 {
        self.key
    }
}

impl fmt::Debug for SplayNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayNode")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

unsafe impl Linked<Links> for SplayNode {
    type Handle = Box<SplayNode>;

    fn into_ptr(r: Self::Handle) -> NonNull<Self> {
        Box::leak(r).into()
    }

    unsafe fn from_ptr(ptr: NonNull<Self>) -> Self::Handle {
        unsafe { Box::from_raw(ptr.as_ptr()) }
    }

    unsafe fn links(ptr: NonNull<Self>) -> NonNull<Links> {
        // SAFETY: Self is #[repr(C)] and `links` is first field
        ptr.cast()
    }
}

/// Returns the links of `node`.
///
/// # Safety
///
/// `node` must point to a live node owned by a tree, and no mutable reference to its links may be
/// alive.
#[inline]
pub(crate) unsafe fn links<'a>(node: NonNull<SplayNode>) -> &'a Links {
    unsafe { SplayNode::links(node).as_ref() }
}

/// Returns the links of `node` for mutation.
///
/// # Safety
///
/// `node` must point to a live node owned by a tree, and no other reference to its links may be
/// alive.
#[inline]
unsafe fn links_mut<'a>(node: NonNull<SplayNode>) -> &'a mut Links {
    unsafe { SplayNode::links(node).as_mut() }
}

#[inline]
pub(crate) unsafe fn key_of(node: NonNull<SplayNode>) -> i32 {
    unsafe { node.as_ref().key() }
}

impl SplayTree {
    /// Returns a new empty tree.
    pub const fn new() -> SplayTree {
        SplayTree {
            root: None,
            size: 0,
            nodes: 0,
            stats: SplayStats::new(),
        }
    }

    /// Returns `true` if the tree contains no nodes.
    pub const fn is_empty(&self) -> bool {
        let empty = self.root.is_none();

        if cfg!(debug_assertions) {
            // Can't use assert_eq!() in const fn.
            assert!(empty == (self.size == 0));
        }

        empty
    }

    /// Returns the number of distinct keys in the tree.
    ///
    /// Inserting a key that is already present adds a node but does not change the size.
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Alias for [`size`](SplayTree::size).
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns the number of nodes in the tree, duplicates included.
    pub const fn node_count(&self) -> usize {
        self.nodes
    }

    /// Returns the key held by the root node.
    pub fn root_key(&self) -> Option<i32> {
        self.root.map(|root| unsafe { key_of(root) })
    }

    /// Returns the counters accumulated since creation or the last [`reset_stats`].
    ///
    /// [`reset_stats`]: SplayTree::reset_stats
    pub const fn stats(&self) -> SplayStats {
        self.stats
    }

    /// Returns the number of comparisons counted so far.
    pub const fn compare_count(&self) -> u64 {
        self.stats.compares
    }

    /// Returns the number of zig-zig steps performed so far.
    pub const fn zig_zig_count(&self) -> u64 {
        self.stats.zig_zigs
    }

    /// Returns the number of zig-zag steps performed so far.
    pub const fn zig_zag_count(&self) -> u64 {
        self.stats.zig_zags
    }

    /// Zeroes all counters.
    pub fn reset_stats(&mut self) {
        self.stats = SplayStats::new();
    }

    /// Returns `true` if a node holds `key`.
    ///
    /// Unlike [`search`](SplayTree::search), this does not restructure the tree.
    pub fn contains(&self, key: i32) -> bool {
        self.get_raw(key).is_some()
    }

    /// Returns the depth of the first node holding `key` on the search path, the root being at
    /// depth 0. Does not restructure the tree.
    pub fn depth(&self, key: i32) -> Option<usize> {
        let mut opt_cur = self.root;
        let mut depth = 0;

        loop {
            let cur = opt_cur?;

            unsafe {
                match key.cmp(&key_of(cur)) {
                    Ordering::Less => opt_cur = links(cur).left(),
                    Ordering::Equal => return Some(depth),
                    Ordering::Greater => opt_cur = links(cur).right(),
                }
            }

            depth += 1;
        }
    }

    /// Returns an iterator over all keys in ascending order, duplicates included.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    fn get_raw(&self, key: i32) -> Link {
        let mut opt_cur = self.root;

        loop {
            let cur = opt_cur?;

            unsafe {
                match key.cmp(&key_of(cur)) {
                    Ordering::Less => opt_cur = links(cur).left(),
                    Ordering::Equal => return Some(cur),
                    Ordering::Greater => opt_cur = links(cur).right(),
                }
            }
        }
    }

    unsafe fn maybe_set_parent(&mut self, opt_node: Link, parent: Link) {
        let Some(node) = opt_node else {
            return;
        };

        unsafe { links_mut(node).set_parent(parent) };
    }

    #[inline]
    unsafe fn replace_child_or_set_root(
        &mut self,
        parent: Link,
        old_child: NonNull<SplayNode>,
        new_child: Link,
    ) {
        match parent {
            Some(parent) => unsafe { self.replace_child(parent, old_child, new_child) },
            None => self.root = new_child,
        }
    }

    // Replaces the child pointer of `parent` pointing at `old_child` with `new_child`, and points
    // `new_child`'s parent link at `parent`.
    //
    // # Safety
    //
    // The caller must ensure that `old_child` is a child node of `parent`.
    unsafe fn replace_child(
        &mut self,
        parent: NonNull<SplayNode>,
        old_child: NonNull<SplayNode>,
        new_child: Link,
    ) {
        unsafe {
            let dir = self.which_child(parent, old_child);
            debug_assert_eq!(
                links(parent).child(dir),
                Some(old_child),
                "`old_child` must be a child of `parent`"
            );

            links_mut(parent).set_child(dir, new_child);
            self.maybe_set_parent(new_child, Some(parent));
        }
    }

    // Performs a rotation, moving `up` up and its parent `down` down.
    //
    // `up` takes `down`'s place under the grandparent, or becomes the root if `down` was the root.
    fn rotate_at(&mut self, down: NonNull<SplayNode>, up: NonNull<SplayNode>) {
        unsafe {
            // - `down` becomes the `dir` child of `up`.
            // - `across` goes from the `dir` child of `up` to the `!dir` child of `down`.
            let dir = if links(down).right() == Some(up) {
                Dir::Left
            } else {
                Dir::Right
            };

            debug_assert_eq!(links(up).parent(), Some(down));

            let across = links(up).child(dir);
            links_mut(down).set_child(!dir, across);
            self.maybe_set_parent(across, Some(down));

            links_mut(up).set_child(dir, Some(down));
            let parent = links_mut(down).set_parent(Some(up));
            links_mut(up).set_parent(parent);

            match parent {
                Some(parent) => {
                    self.stats.compares += 1;
                    self.replace_child(parent, down, Some(up));
                }
                None => self.root = Some(up),
            }
        }
    }

    /// Promotes `child`, the left child of `parent`, above `parent`.
    fn rotate_right(&mut self, child: NonNull<SplayNode>, parent: NonNull<SplayNode>) {
        debug_assert_eq!(unsafe { links(parent).left() }, Some(child));
        self.rotate_at(parent, child);
    }

    /// Promotes `child`, the right child of `parent`, above `parent`.
    fn rotate_left(&mut self, child: NonNull<SplayNode>, parent: NonNull<SplayNode>) {
        debug_assert_eq!(unsafe { links(parent).right() }, Some(child));
        self.rotate_at(parent, child);
    }

    // Splays `x` toward the root, stopping once `p(x)` is the root.
    fn splay(&mut self, x: NonNull<SplayNode>) {
        unsafe {
            loop {
                let Some(parent) = links(x).parent() else {
                    debug_assert_eq!(self.root, Some(x));
                    return;
                };

                let Some(grandparent) = links(parent).parent() else {
                    trace!(key = key_of(x), "splay stopped below the root");
                    debug_assert_eq!(self.root, Some(parent));
                    return;
                };

                self.stats.compares += 2;

                match (
                    self.which_child(parent, x),
                    self.which_child(grandparent, parent),
                ) {
                    (Dir::Left, Dir::Left) => {
                        self.rotate_right(parent, grandparent);
                        self.rotate_right(x, parent);
                        self.stats.zig_zigs += 1;
                        trace!(key = key_of(x), "zig-zig right");
                    }
                    (Dir::Right, Dir::Right) => {
                        self.rotate_left(parent, grandparent);
                        self.rotate_left(x, parent);
                        self.stats.zig_zigs += 1;
                        trace!(key = key_of(x), "zig-zig left");
                    }
                    (Dir::Left, Dir::Right) => {
                        self.rotate_right(x, parent);
                        self.rotate_left(x, grandparent);
                        self.stats.zig_zags += 1;
                        trace!(key = key_of(x), "zig-zag right-left");
                    }
                    (Dir::Right, Dir::Left) => {
                        self.rotate_left(x, parent);
                        self.rotate_right(x, grandparent);
                        self.stats.zig_zags += 1;
                        trace!(key = key_of(x), "zig-zag left-right");
                    }
                }
            }
        }
    }

    /// Inserts a new node holding `key`.
    ///
    /// Duplicates are allowed and are placed in the right subtree of equal keys. The size only
    /// grows if `key` was absent. Afterwards the new node is the root or a child of the root.
    ///
    /// This operation completes in amortized _O(log(n))_ time.
    pub fn insert(&mut self, key: i32) {
        if !self.search(key) {
            self.size += 1;
        }

        let ptr = SplayNode::into_ptr(SplayNode::new(key));
        self.nodes += 1;

        let Some(mut parent) = self.root else {
            // Tree is empty. Set the new node as the root and return.
            self.root = Some(ptr);
            return;
        };

        // Descend the tree, looking for an empty slot.
        loop {
            let dir = if key < unsafe { key_of(parent) } {
                Dir::Left
            } else {
                Dir::Right
            };

            unsafe {
                match links(parent).child(dir) {
                    // Descend.
                    Some(child) => parent = child,

                    // Set the new node as child.
                    None => {
                        links_mut(parent).set_child(dir, Some(ptr));
                        links_mut(ptr).set_parent(Some(parent));
                        break;
                    }
                }
            }
        }

        self.splay(ptr);
    }

    /// Returns `true` if a node holds `key`.
    ///
    /// A hit splays the matching node, so the tree shape changes even though its contents do not.
    /// A miss leaves the tree untouched.
    pub fn search(&mut self, key: i32) -> bool {
        match self.get_raw(key) {
            Some(node) => {
                self.splay(node);
                true
            }
            None => {
                debug!(key, "search miss");
                false
            }
        }
    }

    // Returns the maximum node in the subtree.
    //
    // If the subtree root is not the maximum, also returns the maximum node's parent.
    #[inline]
    unsafe fn max_in_subtree(&self, root: NonNull<SplayNode>) -> (NonNull<SplayNode>, Link) {
        let mut parent = None;
        let mut cur = root;

        while let Some(right) = unsafe { links(cur).right() } {
            parent = Some(cur);
            cur = right;
        }

        (cur, parent)
    }

    // Returns the minimum node in the subtree.
    //
    // If the subtree root is not the minimum, also returns the minimum node's parent.
    #[inline]
    unsafe fn min_in_subtree(&self, root: NonNull<SplayNode>) -> (NonNull<SplayNode>, Link) {
        let mut parent = None;
        let mut cur = root;

        while let Some(left) = unsafe { links(cur).left() } {
            parent = Some(cur);
            cur = left;
        }

        (cur, parent)
    }

    /// Removes one node holding `key`, returning `true` if one was found.
    ///
    /// The node is splayed all the way to the root and then spliced out: its in-order predecessor
    /// takes its place, or its only child does. Removing an absent key is a no-op. The size only
    /// drops once no node holding `key` remains.
    pub fn remove(&mut self, key: i32) -> bool {
        let Some(node) = self.get_raw(key) else {
            debug!(key, "remove miss");
            return false;
        };

        self.splay(node);

        unsafe {
            // Splaying stops one level short; finish the climb.
            if let Some(parent) = links(node).parent() {
                match self.which_child(parent, node) {
                    Dir::Left => self.rotate_right(node, parent),
                    Dir::Right => self.rotate_left(node, parent),
                }
            }

            debug_assert_eq!(self.root, Some(node));

            let new_root = match (links(node).left(), links(node).right()) {
                (Some(left), Some(right)) => {
                    // The predecessor has no right child, so it can adopt `right` directly.
                    let (predecessor, predecessor_parent) = self.max_in_subtree(left);

                    if let Some(predecessor_parent) = predecessor_parent {
                        // Elevate the predecessor's left child to replace it.
                        let predecessor_left = links(predecessor).left();
                        self.replace_child(predecessor_parent, predecessor, predecessor_left);

                        links_mut(predecessor).set_left(Some(left));
                        links_mut(left).set_parent(Some(predecessor));
                    }

                    links_mut(predecessor).set_right(Some(right));
                    links_mut(right).set_parent(Some(predecessor));

                    Some(predecessor)
                }

                (Some(child), None) | (None, Some(child)) => Some(child),

                (None, None) => None,
            };

            self.maybe_set_parent(new_root, None);
            self.root = new_root;

            drop(SplayNode::from_ptr(node));
        }

        self.nodes -= 1;

        if !self.contains(key) {
            self.size -= 1;
        }

        debug!(key, size = self.size, "removed");
        true
    }

    /// Clears the tree, removing all nodes. Counters are left as they are.
    pub fn clear(&mut self) {
        let mut opt_cur = self.root;

        while let Some(cur) = opt_cur {
            unsafe {
                // Descend to the minimum node.
                let (cur, parent) = self.min_in_subtree(cur);
                let parent = parent.or_else(|| links(cur).parent());

                let right = links(cur).right();

                // Elevate the node's right child (which may be None).
                self.replace_child_or_set_root(parent, cur, right);
                self.maybe_set_parent(right, parent);

                // Drop the node.
                drop(SplayNode::from_ptr(cur));
                self.nodes -= 1;

                // If the node had no right child, climb to the parent. If the node had no parent,
                // the tree is empty.
                opt_cur = right.or(parent);
            }
        }

        self.size = 0;

        debug_assert!(self.root.is_none());
        debug_assert_eq!(self.nodes, 0);
    }

    pub(crate) unsafe fn which_child(
        &self,
        parent: NonNull<SplayNode>,
        child: NonNull<SplayNode>,
    ) -> Dir {
        if unsafe { links(parent).left() } == Some(child) {
            Dir::Left
        } else {
            Dir::Right
        }
    }
}

impl Default for SplayTree {
    fn default() -> Self {
        SplayTree::new()
    }
}

impl fmt::Debug for SplayTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayTree")
            .field("size", &self.size)
            .field("nodes", &self.nodes)
            .field("root", &self.root_key())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Drop for SplayTree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Links {
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            inner: UnsafeCell::new(LinksInner {
                parent: None,
                children: [None; 2],
                _unpin: PhantomPinned,
            }),
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Link {
        unsafe { (*self.inner.get()).parent }
    }

    #[inline]
    pub(crate) fn child(&self, dir: Dir) -> Link {
        unsafe { (*self.inner.get()).children[dir as usize] }
    }

    #[inline]
    pub(crate) fn left(&self) -> Link {
        self.child(Dir::Left)
    }

    #[inline]
    pub(crate) fn right(&self) -> Link {
        self.child(Dir::Right)
    }

    #[inline]
    fn set_parent(&mut self, parent: Link) -> Link {
        mem::replace(&mut self.inner.get_mut().parent, parent)
    }

    #[inline]
    fn set_child(&mut self, dir: Dir, child: Link) -> Link {
        mem::replace(&mut self.inner.get_mut().children[dir as usize], child)
    }

    #[inline]
    fn set_left(&mut self, left: Link) -> Link {
        self.set_child(Dir::Left, left)
    }

    #[inline]
    fn set_right(&mut self, right: Link) -> Link {
        self.set_child(Dir::Right, right)
    }
}
