use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use super::node::{is_left_child, parent_of, Node, NodeRef};

/// Plain, unbalanced binary search tree (component C1).
///
/// No rotations: worst-case depth is O(n). This is deliberate — see the
/// rationale in DESIGN.md — the persistent engines built on top reuse
/// this exact descent logic per field-history, and a self-balancing
/// variant would mean every rotation touches a version history instead
/// of a single in-place pointer.
///
/// `Bst<T, K>` separates the stored item `T` from the key it is ordered
/// by, `K`, via a projection `key_fn` and a comparator over `K`. This
/// lets the same implementation serve as a plain `Bst<i64, i64>` for
/// end users and as the per-field "version -> value" history embedded in
/// `crate::fatnode`/`crate::full` nodes, where `T` is a modification
/// record and `K` is its version.
pub struct Bst<T, K> {
    root: Option<NodeRef<T>>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    cmp: Rc<dyn Fn(&K, &K) -> Ordering>,
    len: usize,
}

/// Construct a tree where the stored item is its own key, ordered by `Ord`.
pub fn ordered<T: Ord + Clone + 'static>() -> Bst<T, T> {
    Bst::new(Rc::new(|t: &T| t.clone()), Rc::new(|a: &T, b: &T| a.cmp(b)))
}

impl<T, K> Bst<T, K> {
    pub fn new(key_fn: Rc<dyn Fn(&T) -> K>, cmp: Rc<dyn Fn(&K, &K) -> Ordering>) -> Bst<T, K> {
        Bst { root: None, key_fn, cmp, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn key_of(&self, node: &NodeRef<T>) -> K {
        (self.key_fn)(&node.borrow().key)
    }

    fn compare(&self, key: &K, node: &NodeRef<T>) -> Ordering {
        (self.cmp)(key, &self.key_of(node))
    }

    /// Insert `item`. If an item with the same key already exists, this
    /// is a no-op unless `overwrite` is set, in which case the existing
    /// node's item is replaced in place (its identity — and so any
    /// outstanding `NodeRef`s to it — is preserved). Returns the node
    /// that now holds `item`'s key, whether freshly created or not.
    pub fn insert(&mut self, item: T, overwrite: bool) -> NodeRef<T> {
        let key = (self.key_fn)(&item);
        if self.root.is_none() {
            let node = Node::new(item);
            self.root = Some(Rc::clone(&node));
            self.len += 1;
            return node;
        }

        let mut parent: Option<NodeRef<T>> = None;
        let mut curr = self.root.clone();
        while let Some(node) = curr {
            parent = Some(Rc::clone(&node));
            match self.compare(&key, &node) {
                Ordering::Less => curr = node.borrow().left.clone(),
                Ordering::Greater => curr = node.borrow().right.clone(),
                Ordering::Equal => {
                    if overwrite {
                        node.borrow_mut().key = item;
                    }
                    return node;
                }
            }
        }

        let parent = parent.expect("non-empty tree always finds an insertion parent");
        let new_node = Node::new(item);
        new_node.borrow_mut().parent = Some(Rc::downgrade(&parent));
        match self.compare(&key, &parent) {
            Ordering::Less => parent.borrow_mut().left = Some(Rc::clone(&new_node)),
            _ => parent.borrow_mut().right = Some(Rc::clone(&new_node)),
        }
        self.len += 1;
        new_node
    }

    pub fn search(&self, key: &K) -> Option<NodeRef<T>> {
        let mut curr = self.root.clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Less => curr = node.borrow().left.clone(),
                Ordering::Greater => curr = node.borrow().right.clone(),
                Ordering::Equal => return Some(node),
            }
        }
        None
    }

    /// Largest node with key <= `key`, or `None` if no such node exists.
    pub fn search_le(&self, key: &K) -> Option<NodeRef<T>> {
        let mut best: Option<NodeRef<T>> = None;
        let mut curr = self.root.clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Equal => return Some(node),
                Ordering::Less => curr = node.borrow().left.clone(),
                Ordering::Greater => {
                    curr = node.borrow().right.clone();
                    best = Some(node);
                }
            }
        }
        best
    }

    /// Smallest node with key > `key`, or `None` if no such node exists.
    pub fn search_gt(&self, key: &K) -> Option<NodeRef<T>> {
        let mut best: Option<NodeRef<T>> = None;
        let mut curr = self.root.clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Less => {
                    best = Some(Rc::clone(&node));
                    curr = node.borrow().left.clone();
                }
                _ => curr = node.borrow().right.clone(),
            }
        }
        best
    }

    pub fn delete(&mut self, key: &K) -> bool {
        let node = match self.search(key) {
            Some(n) => n,
            None => return false,
        };
        self.delete_node(&node);
        self.len -= 1;
        true
    }

    fn delete_node(&mut self, node: &NodeRef<T>) {
        let left = node.borrow().left.clone();
        let right = node.borrow().right.clone();

        if left.is_none() {
            self.transplant(node, right.as_ref());
        } else if right.is_none() {
            self.transplant(node, left.as_ref());
        } else {
            // successor has at most one child, on its right.
            let successor = self
                .successor(node)
                .unwrap_or_else(|| crate::error::invariant("two-child node always has a successor"));
            if !Rc::ptr_eq(&successor, right.as_ref().unwrap()) {
                let successor_right = successor.borrow().right.clone();
                self.transplant(&successor, successor_right.as_ref());
                successor.borrow_mut().right = right.clone();
                right.as_ref().unwrap().borrow_mut().parent = Some(Rc::downgrade(&successor));
            }
            self.transplant(node, Some(&successor));
            successor.borrow_mut().left = left.clone();
            left.as_ref().unwrap().borrow_mut().parent = Some(Rc::downgrade(&successor));
        }
    }

    /// Replace `old` with `replacement` (possibly `None`) in whatever
    /// slot its parent held it in — or as the tree root if `old` had no
    /// parent. `replacement`'s subtree is left untouched.
    fn transplant(&mut self, old: &NodeRef<T>, replacement: Option<&NodeRef<T>>) {
        match parent_of(old) {
            None => self.root = replacement.cloned(),
            Some(parent) => {
                if is_left_child(old, &parent) {
                    parent.borrow_mut().left = replacement.cloned();
                } else {
                    parent.borrow_mut().right = replacement.cloned();
                }
            }
        }
        if let Some(replacement) = replacement {
            replacement.borrow_mut().parent = old.borrow().parent.clone();
        }
    }

    fn successor(&self, node: &NodeRef<T>) -> Option<NodeRef<T>> {
        if let Some(right) = node.borrow().right.clone() {
            return Some(Self::find_min(&right));
        }
        let mut curr = Rc::clone(node);
        let mut parent = parent_of(&curr);
        while let Some(p) = parent {
            if is_left_child(&curr, &p) {
                return Some(p);
            }
            curr = p;
            parent = parent_of(&curr);
        }
        None
    }

    fn find_min(node: &NodeRef<T>) -> NodeRef<T> {
        let mut curr = Rc::clone(node);
        loop {
            let left = curr.borrow().left.clone();
            match left {
                Some(l) => curr = l,
                None => return curr,
            }
        }
    }

    /// In-order traversal of projected keys, ascending.
    pub fn inorder(&self) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::with_capacity(self.len);
        Self::inorder_walk(&self.root, &self.key_fn, &mut out);
        out
    }

    /// In-order traversal of whole node references, for callers that
    /// need more than the projected key (e.g. the fat-node field-history
    /// lookups, which need the record's value alongside its version).
    pub fn inorder_nodes(&self) -> Vec<NodeRef<T>> {
        let mut out = Vec::with_capacity(self.len);
        Self::inorder_nodes_walk(&self.root, &mut out);
        out
    }

    fn inorder_walk(node: &Option<NodeRef<T>>, key_fn: &Rc<dyn Fn(&T) -> K>, out: &mut Vec<K>)
    where
        K: Clone,
    {
        if let Some(n) = node {
            Self::inorder_walk(&n.borrow().left, key_fn, out);
            out.push(key_fn(&n.borrow().key));
            Self::inorder_walk(&n.borrow().right, key_fn, out);
        }
    }

    fn inorder_nodes_walk(node: &Option<NodeRef<T>>, out: &mut Vec<NodeRef<T>>) {
        if let Some(n) = node {
            Self::inorder_nodes_walk(&n.borrow().left, out);
            out.push(Rc::clone(n));
            Self::inorder_nodes_walk(&n.borrow().right, out);
        }
    }
}

impl<T: Clone, K> Bst<T, K> {
    /// Full structural copy: every node is reallocated, none of it is
    /// shared with `self`. This is what backs the naive partial-persistent
    /// engine (`crate::naive`), which clones the entire previous snapshot
    /// on every update rather than sharing untouched subtrees.
    pub fn deep_clone(&self) -> Bst<T, K> {
        let root = self.root.as_ref().map(|r| Self::clone_subtree(r, None));
        Bst {
            root,
            key_fn: Rc::clone(&self.key_fn),
            cmp: Rc::clone(&self.cmp),
            len: self.len,
        }
    }

    fn clone_subtree(node: &NodeRef<T>, parent: Option<Weak<RefCell<Node<T>>>>) -> NodeRef<T> {
        let borrowed = node.borrow();
        let new_node = Rc::new(RefCell::new(Node {
            key: borrowed.key.clone(),
            left: None,
            right: None,
            parent,
        }));
        let left = borrowed
            .left
            .as_ref()
            .map(|l| Self::clone_subtree(l, Some(Rc::downgrade(&new_node))));
        let right = borrowed
            .right
            .as_ref()
            .map(|r| Self::clone_subtree(r, Some(Rc::downgrade(&new_node))));
        drop(borrowed);
        new_node.borrow_mut().left = left;
        new_node.borrow_mut().right = right;
        new_node
    }
}
