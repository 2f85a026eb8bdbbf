//! Fat-node partial persistence (component C4).
//!
//! Every node carries, for each pointer field, its value as of creation
//! plus a small history of later writes. A read at version `v` is a
//! predecessor search in that history; most reads touch only the newest
//! few records since updates are sparse relative to tree size. See
//! `node.rs` for the per-field get/set rules.

mod node;

pub use node::{Field, FatNode, FatNodeRef};

use std::cmp::Ordering;
use std::rc::Rc;

/// Partial-persistent BST built on versioned field histories.
pub struct FatTree<T, K> {
    roots: Vec<Option<FatNodeRef<T>>>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    cmp: Rc<dyn Fn(&K, &K) -> Ordering>,
}

impl<T: Clone, K> FatTree<T, K> {
    pub fn new(key_fn: Rc<dyn Fn(&T) -> K>, cmp: Rc<dyn Fn(&K, &K) -> Ordering>) -> Self {
        FatTree { roots: Vec::new(), key_fn, cmp }
    }

    pub fn get_latest_version(&self) -> Option<usize> {
        self.roots.len().checked_sub(1)
    }

    fn resolve(&self, version: Option<usize>) -> Option<usize> {
        let latest = self.get_latest_version()?;
        Some(version.unwrap_or(latest).min(latest))
    }

    fn key_of(&self, node: &FatNodeRef<T>) -> K {
        (self.key_fn)(&node.key)
    }

    fn compare(&self, key: &K, node: &FatNodeRef<T>) -> Ordering {
        (self.cmp)(key, &self.key_of(node))
    }

    fn is_left_child(&self, node: &FatNodeRef<T>, parent: &FatNodeRef<T>, version: usize) -> bool {
        match parent.get(Field::Left, version) {
            Some(l) => Rc::ptr_eq(&l, node),
            None => false,
        }
    }

    /// Insert every key in `items` at a single new version. A no-op
    /// (returns the current latest version unchanged) if `items` is empty.
    pub fn insert(&mut self, items: &[T]) -> Option<usize> {
        if items.is_empty() {
            return self.get_latest_version();
        }

        let version;
        let mut pending: &[T] = items;

        if self.roots.is_empty() {
            version = 0;
            self.roots.push(Some(FatNode::new(pending[0].clone(), version)));
            pending = &pending[1..];
        } else {
            version = self.get_latest_version().unwrap() + 1;
            match self.roots.last().unwrap().clone() {
                Some(last_root) => self.roots.push(Some(last_root)),
                None => {
                    self.roots.push(Some(FatNode::new(pending[0].clone(), version)));
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
        let mut parent: Option<FatNodeRef<T>> = None;
        let mut curr = self.roots[version].clone();
        let key = (self.key_fn)(&item);

        while let Some(node) = curr {
            let order = (self.cmp)(&key, &self.key_of(&node));
            match order {
                Ordering::Equal => return, // duplicate key, no-op
                Ordering::Less => {
                    parent = Some(Rc::clone(&node));
                    curr = node.get(Field::Left, version);
                }
                Ordering::Greater => {
                    parent = Some(Rc::clone(&node));
                    curr = node.get(Field::Right, version);
                }
            }
        }

        let new_node = FatNode::new(item, version);
        let parent = parent.expect("non-empty subtree always finds an insertion parent");
        new_node.set_parent(Some(&parent), version);
        match self.compare(&key, &parent) {
            Ordering::Less => parent.set(Field::Left, Some(new_node), version),
            _ => parent.set(Field::Right, Some(new_node), version),
        }
    }

    pub fn search(&self, key: &K, version: Option<usize>) -> Option<FatNodeRef<T>> {
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

    pub fn search_le(&self, key: &K, version: Option<usize>) -> Option<FatNodeRef<T>> {
        let v = self.resolve(version)?;
        let mut best: Option<FatNodeRef<T>> = None;
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

    pub fn search_gt(&self, key: &K, version: Option<usize>) -> Option<FatNodeRef<T>> {
        let v = self.resolve(version)?;
        let mut best: Option<FatNodeRef<T>> = None;
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

    /// Delete every key in `keys` at a single new version. Keys that are
    /// absent at that version are skipped; a batch where none are found
    /// does not allocate a new version at all.
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

    fn delete_node(&mut self, node: &FatNodeRef<T>, version: usize) {
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
                successor.set(Field::Right, right.clone(), version);
                right.as_ref().unwrap().set_parent(Some(&successor), version);
            }
            self.transplant(node, Some(Rc::clone(&successor)), version);
            successor.set(Field::Left, left.clone(), version);
            left.as_ref().unwrap().set_parent(Some(&successor), version);
        }
    }

    fn transplant(&mut self, old: &FatNodeRef<T>, replacement: Option<FatNodeRef<T>>, version: usize) {
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
                if self.is_left_child(old, parent, version) {
                    parent.set(Field::Left, replacement.clone(), version);
                } else {
                    parent.set(Field::Right, replacement.clone(), version);
                }
            }
        }
        if let Some(r) = &replacement {
            r.set_parent(old_parent.as_ref(), version);
        }
    }

    fn successor(&self, node: &FatNodeRef<T>, version: usize) -> Option<FatNodeRef<T>> {
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

    fn find_min(node: &FatNodeRef<T>, version: usize) -> FatNodeRef<T> {
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

    fn inorder_walk(&self, node: &Option<FatNodeRef<T>>, version: usize, out: &mut Vec<K>)
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

#[cfg(test)]
#[path = "fatnode_test.rs"]
mod fatnode_test;
