//! Naive copy-on-write partial persistence (component C3).
//!
//! Every update clones the *entire* previous snapshot and mutates the
//! clone; the clone is appended to the version vector. This is the
//! baseline the fat-node (`crate::fatnode`) and node-copying
//! (`crate::copying`) engines exist to beat: O(n) time and space per
//! update, correct by construction because no state is ever shared
//! between two versions.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::bst::{Bst, NodeRef};

/// Partial-persistent BST built on whole-tree deep copies.
pub struct Naive<T, K> {
    roots: Vec<Rc<Bst<T, K>>>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    cmp: Rc<dyn Fn(&K, &K) -> Ordering>,
}

impl<T: Clone, K: Clone> Naive<T, K> {
    pub fn new(key_fn: Rc<dyn Fn(&T) -> K>, cmp: Rc<dyn Fn(&K, &K) -> Ordering>) -> Self {
        Naive { roots: Vec::new(), key_fn, cmp }
    }

    pub fn get_latest_version(&self) -> Option<usize> {
        self.roots.len().checked_sub(1)
    }

    fn resolve(&self, version: Option<usize>) -> Option<usize> {
        let latest = self.get_latest_version()?;
        Some(version.unwrap_or(latest).min(latest))
    }

    fn fresh_tree(&self) -> Bst<T, K> {
        Bst::new(Rc::clone(&self.key_fn), Rc::clone(&self.cmp))
    }

    /// Insert every key in `items` at a single new version. A no-op
    /// (returns the current latest version unchanged) if `items` is
    /// empty.
    pub fn insert(&mut self, items: &[T]) -> Option<usize> {
        if items.is_empty() {
            return self.get_latest_version();
        }
        let mut next = match self.roots.last() {
            Some(latest) => latest.deep_clone(),
            None => self.fresh_tree(),
        };
        for item in items {
            next.insert(item.clone(), false);
        }
        self.roots.push(Rc::new(next));
        self.get_latest_version()
    }

    /// Delete every key in `keys` at a single new version. A no-op if
    /// there are no versions yet or `keys` is empty.
    pub fn delete(&mut self, keys: &[K]) -> Option<usize> {
        if self.roots.is_empty() || keys.is_empty() {
            return self.get_latest_version();
        }
        let mut next = self.roots.last().unwrap().deep_clone();
        for key in keys {
            next.delete(key);
        }
        self.roots.push(Rc::new(next));
        self.get_latest_version()
    }

    pub fn search(&self, key: &K, version: Option<usize>) -> Option<NodeRef<T>> {
        let v = self.resolve(version)?;
        self.roots[v].search(key)
    }

    pub fn search_le(&self, key: &K, version: Option<usize>) -> Option<NodeRef<T>> {
        let v = self.resolve(version)?;
        self.roots[v].search_le(key)
    }

    pub fn search_gt(&self, key: &K, version: Option<usize>) -> Option<NodeRef<T>> {
        let v = self.resolve(version)?;
        self.roots[v].search_gt(key)
    }

    pub fn inorder(&self, version: Option<usize>) -> Vec<K> {
        match self.resolve(version) {
            Some(v) => self.roots[v].inorder(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
#[path = "naive_test.rs"]
mod naive_test;
