//! Node-copying partial persistence (component C5), the Driscoll-Sarnak-
//! Sleator-Tarjan construction.
//!
//! Each node tolerates a bounded number of in-place modifications
//! ([`node::E`]) before it must be copied; the copy is amortized across
//! those writes rather than paid on every one, so updates cost O(1)
//! amortized extra space instead of the naive engine's O(n) and the
//! fat-node engine's O(log n)-ish history walk. An overflow cascades:
//! fixing up the overflowed node's parent pointer may itself overflow the
//! parent, all the way to the root, and fixing up its children's parent
//! pointers may cascade downward by one level in turn.

mod node;

pub use node::{Field, PNode, PNodeRef, E};

use std::cmp::Ordering;
use std::rc::Rc;

/// Partial-persistent BST built on bounded node copying.
pub struct Copying<T, K> {
    roots: Vec<Option<PNodeRef<T>>>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    cmp: Rc<dyn Fn(&K, &K) -> Ordering>,
}

impl<T: Clone, K> Copying<T, K> {
    pub fn new(key_fn: Rc<dyn Fn(&T) -> K>, cmp: Rc<dyn Fn(&K, &K) -> Ordering>) -> Self {
        Copying { roots: Vec::new(), key_fn, cmp }
    }

    pub fn get_latest_version(&self) -> Option<usize> {
        self.roots.len().checked_sub(1)
    }

    fn resolve(&self, version: Option<usize>) -> Option<usize> {
        let latest = self.get_latest_version()?;
        Some(version.unwrap_or(latest).min(latest))
    }

    fn key_of(&self, node: &PNodeRef<T>) -> K {
        (self.key_fn)(&node.key)
    }

    fn compare(&self, key: &K, node: &PNodeRef<T>) -> Ordering {
        (self.cmp)(key, &self.key_of(node))
    }

    fn is_left_child(&self, node: &PNodeRef<T>, parent: &PNodeRef<T>, version: usize) -> bool {
        match parent.get(Field::Left, version) {
            Some(l) => Rc::ptr_eq(&l, node),
            None => false,
        }
    }

    /// Write `node`'s `field` child, copying `node` forward (and
    /// cascading to its ancestors and its new copy's children) if its
    /// modification slots are already full.
    fn write_child(&mut self, node: &PNodeRef<T>, field: Field, value: Option<PNodeRef<T>>, version: usize) {
        if node.try_set_child(field, value.clone(), version) {
            return;
        }
        log::debug!("node-copying: slots full at version {}, copying node forward", version);
        let new_node = PNode::copy_forward(node, version, Some((field, value)), None);
        *node.copy.borrow_mut() = Some(Rc::clone(&new_node));
        self.relink(node, &new_node, version);
    }

    fn write_parent(&mut self, node: &PNodeRef<T>, value: Option<PNodeRef<T>>, version: usize) {
        if node.try_set_parent(value.as_ref(), version) {
            return;
        }
        log::debug!("node-copying: slots full at version {}, copying node forward", version);
        let new_node = PNode::copy_forward(node, version, None, Some(value));
        *node.copy.borrow_mut() = Some(Rc::clone(&new_node));
        self.relink(node, &new_node, version);
    }

    /// `old` has just been copied forward into `new_node`: point whoever
    /// held `old` at `new_node` instead (the tree root, or `old`'s
    /// parent), then fix up `new_node`'s own children's parent pointers,
    /// which used to point at `old`.
    fn relink(&mut self, old: &PNodeRef<T>, new_node: &PNodeRef<T>, version: usize) {
        match old.get_parent(version) {
            None => {
                if self.get_latest_version() != Some(version) {
                    self.roots.push(Some(Rc::clone(new_node)));
                } else {
                    *self.roots.last_mut().unwrap() = Some(Rc::clone(new_node));
                }
            }
            Some(parent) => {
                let side = if self.is_left_child(old, &parent, version) { Field::Left } else { Field::Right };
                self.write_child(&parent, side, Some(Rc::clone(new_node)), version);
            }
        }
        if let Some(l) = new_node.get(Field::Left, version) {
            self.write_parent(&l, Some(Rc::clone(new_node)), version);
        }
        if let Some(r) = new_node.get(Field::Right, version) {
            self.write_parent(&r, Some(Rc::clone(new_node)), version);
        }
    }

    /// Insert every key in `items` at a single new version. A no-op if
    /// `items` is empty.
    pub fn insert(&mut self, items: &[T]) -> Option<usize> {
        if items.is_empty() {
            return self.get_latest_version();
        }

        let version;
        let mut pending: &[T] = items;

        if self.roots.is_empty() {
            version = 0;
            self.roots.push(Some(PNode::new(pending[0].clone(), version)));
            pending = &pending[1..];
        } else {
            version = self.get_latest_version().unwrap() + 1;
            match self.roots.last().unwrap().clone() {
                Some(last_root) => self.roots.push(Some(last_root)),
                None => {
                    self.roots.push(Some(PNode::new(pending[0].clone(), version)));
                    pending = &pending[1..];
                }
            }
        }

        for item in pending {
            self.insert_one(item.clone(), version);
        }
        self.get_latest_version()
    }

    fn insert_one(&mut self, item: T, version: usize) {
        let mut parent: Option<PNodeRef<T>> = None;
        let mut curr = self.roots[version].clone();
        let key = (self.key_fn)(&item);
        let mut side = Field::Left;

        while let Some(node) = curr {
            match (self.cmp)(&key, &self.key_of(&node)) {
                Ordering::Equal => return,
                Ordering::Less => {
                    side = Field::Left;
                    parent = Some(Rc::clone(&node));
                    curr = node.get(Field::Left, version);
                }
                Ordering::Greater => {
                    side = Field::Right;
                    parent = Some(Rc::clone(&node));
                    curr = node.get(Field::Right, version);
                }
            }
        }

        let new_node = PNode::new(item, version);
        let parent = parent.expect("non-empty subtree always finds an insertion parent");
        self.write_parent(&new_node, Some(Rc::clone(&parent)), version);
        self.write_child(&parent, side, Some(new_node), version);
    }

    pub fn search(&self, key: &K, version: Option<usize>) -> Option<PNodeRef<T>> {
        let v = self.resolve(version)?;
        let mut curr = self.roots[v].clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Equal => return Some(node),
                Ordering::Less => curr = node.get(Field::Left, v),
                Ordering::Greater => curr = node.get(Field::Right, v),
            }
        }
        None
    }

    pub fn search_le(&self, key: &K, version: Option<usize>) -> Option<PNodeRef<T>> {
        let v = self.resolve(version)?;
        let mut best: Option<PNodeRef<T>> = None;
        let mut curr = self.roots[v].clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Equal => return Some(node),
                Ordering::Less => curr = node.get(Field::Left, v),
                Ordering::Greater => {
                    curr = node.get(Field::Right, v);
                    best = Some(node);
                }
            }
        }
        best
    }

    pub fn search_gt(&self, key: &K, version: Option<usize>) -> Option<PNodeRef<T>> {
        let v = self.resolve(version)?;
        let mut best: Option<PNodeRef<T>> = None;
        let mut curr = self.roots[v].clone();
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Less => {
                    best = Some(Rc::clone(&node));
                    curr = node.get(Field::Left, v);
                }
                _ => curr = node.get(Field::Right, v),
            }
        }
        best
    }

    /// Delete every key in `keys` at a single new version. Keys absent at
    /// that version are skipped; a batch that finds nothing allocates no
    /// new version.
    pub fn delete(&mut self, keys: &[K]) -> Option<usize> {
        if self.roots.is_empty() || keys.is_empty() {
            return self.get_latest_version();
        }
        let version = self.get_latest_version().unwrap() + 1;
        for key in keys {
            if let Some(node) = self.search(key, Some(version)) {
                self.delete_node(&node, version);
                if self.get_latest_version() != Some(version) {
                    let dup = self.roots.last().unwrap().clone();
                    self.roots.push(dup);
                }
            }
        }
        self.get_latest_version()
    }

    fn delete_node(&mut self, node: &PNodeRef<T>, version: usize) {
        let left = node.get(Field::Left, version);
        let right = node.get(Field::Right, version);

        if left.is_none() {
            self.transplant(node, right, version);
        } else if right.is_none() {
            self.transplant(node, left, version);
        } else {
            let successor = self
                .successor(node, version)
                .unwrap_or_else(|| crate::error::invariant("two-child node always has a successor"));
            if !Rc::ptr_eq(&successor, right.as_ref().unwrap()) {
                let successor_right = successor.get(Field::Right, version);
                self.transplant(&successor, successor_right, version);
                self.write_child(&successor, Field::Right, right.clone(), version);
                self.write_parent(right.as_ref().unwrap(), Some(Rc::clone(&successor)), version);
            }
            self.transplant(node, Some(Rc::clone(&successor)), version);
            self.write_child(&successor, Field::Left, left.clone(), version);
            self.write_parent(left.as_ref().unwrap(), Some(Rc::clone(&successor)), version);
        }
    }

    fn transplant(&mut self, old: &PNodeRef<T>, replacement: Option<PNodeRef<T>>, version: usize) {
        let old_parent = old.get_parent(version);
        match &old_parent {
            None => {
                if self.get_latest_version() != Some(version) {
                    self.roots.push(replacement.clone());
                } else {
                    *self.roots.last_mut().unwrap() = replacement.clone();
                }
            }
            Some(parent) => {
                let side = if self.is_left_child(old, parent, version) { Field::Left } else { Field::Right };
                self.write_child(parent, side, replacement.clone(), version);
            }
        }
        if let Some(r) = &replacement {
            self.write_parent(r, old_parent.clone(), version);
        }
    }

    fn successor(&self, node: &PNodeRef<T>, version: usize) -> Option<PNodeRef<T>> {
        if let Some(right) = node.get(Field::Right, version) {
            return Some(Self::find_min(&right, version));
        }
        let mut curr = Rc::clone(node);
        let mut parent = curr.get_parent(version);
        while let Some(p) = parent {
            if self.is_left_child(&curr, &p, version) {
                return Some(p);
            }
            curr = p;
            parent = curr.get_parent(version);
        }
        None
    }

    fn find_min(node: &PNodeRef<T>, version: usize) -> PNodeRef<T> {
        let mut curr = Rc::clone(node);
        loop {
            match curr.get(Field::Left, version) {
                Some(l) => curr = l,
                None => return curr,
            }
        }
    }

    /// In-order traversal of projected keys at `version`, ascending.
    pub fn inorder(&self, version: Option<usize>) -> Vec<K>
    where
        K: Clone,
    {
        let v = match self.resolve(version) {
            Some(v) => v,
            None => return Vec::new(),
        };
        let mut out = Vec::new();
        self.inorder_walk(&self.roots[v], v, &mut out);
        out
    }

    fn inorder_walk(&self, node: &Option<PNodeRef<T>>, version: usize, out: &mut Vec<K>)
    where
        K: Clone,
    {
        if let Some(n) = node {
            self.inorder_walk(&n.get(Field::Left, version), version, out);
            out.push((self.key_fn)(&n.key));
            self.inorder_walk(&n.get(Field::Right, version), version, out);
        }
    }
}
