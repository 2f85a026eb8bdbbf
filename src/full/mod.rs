//! Full persistence (component C6): fat nodes whose versions are
//! elements of an order-maintenance list rather than consecutive
//! integers, so any past version — not only the most recent — may be
//! the base of a new update. Everything about reading and writing a
//! single field is identical to [`crate::fatnode`]; only how two
//! versions compare changes.

mod node;

pub use node::{Field, FullNode, FullNodeRef, Version};

use std::cmp::Ordering;
use std::rc::Rc;

use crate::bst::Bst;
use crate::key::CmpFn;
use crate::order_list::OrderList;

fn version_cmp() -> CmpFn<Version> {
    Rc::new(|a: &Version, b: &Version| a.label().cmp(&b.label()))
}

#[derive(Clone)]
struct RootEntry<T> {
    version: Version,
    root: Option<FullNodeRef<T>>,
}

/// Fully persistent BST: any existing [`Version`] can be passed as the
/// base of a later `insert`/`delete`, producing a sibling version rather
/// than requiring strictly linear history.
pub struct FullTree<T, K> {
    order: OrderList<()>,
    version_cmp: CmpFn<Version>,
    roots: Bst<RootEntry<T>, Version>,
    latest: Option<Version>,
    key_fn: Rc<dyn Fn(&T) -> K>,
    cmp: Rc<dyn Fn(&K, &K) -> Ordering>,
}

impl<T: Clone, K> FullTree<T, K> {
    pub fn new(key_fn: Rc<dyn Fn(&T) -> K>, cmp: Rc<dyn Fn(&K, &K) -> Ordering>) -> Self {
        let version_cmp = version_cmp();
        FullTree {
            order: OrderList::new(),
            roots: Bst::new(Rc::new(|e: &RootEntry<T>| e.version.clone()), Rc::clone(&version_cmp)),
            version_cmp,
            latest: None,
            key_fn,
            cmp,
        }
    }

    /// The version created by the most recent `insert`/`delete`, used as
    /// the implicit base when a caller does not name one. `None` until
    /// the first update.
    pub fn get_latest_version(&self) -> Option<Version> {
        self.latest.clone()
    }

    fn root_at(&self, version: &Version) -> Option<FullNodeRef<T>> {
        self.roots.search(version).and_then(|n| n.borrow().key.root.clone())
    }

    fn key_of(&self, node: &FullNodeRef<T>) -> K {
        (self.key_fn)(&node.key)
    }

    fn compare(&self, key: &K, node: &FullNodeRef<T>) -> Ordering {
        (self.cmp)(key, &self.key_of(node))
    }

    fn is_left_child(&self, node: &FullNodeRef<T>, parent: &FullNodeRef<T>, version: &Version) -> bool {
        match parent.get(Field::Left, version) {
            Some(l) => Rc::ptr_eq(&l, node),
            None => false,
        }
    }

    /// Insert every key in `items` as a new version forked from `base`
    /// (or from [`Self::get_latest_version`] if `base` is `None`). A
    /// no-op returning `base` unchanged if `items` is empty.
    pub fn insert(&mut self, base: Option<&Version>, items: &[T]) -> Option<Version> {
        let base = base.cloned().or_else(|| self.latest.clone());
        if items.is_empty() {
            return base;
        }

        let base_root = base.as_ref().and_then(|b| self.root_at(b));
        let new_version = self.order.insert(base.as_ref(), ());

        let mut root = base_root;
        let mut pending = items;
        if root.is_none() {
            root = Some(FullNode::new(pending[0].clone(), new_version.clone(), Rc::clone(&self.version_cmp)));
            pending = &pending[1..];
        }
        self.roots.insert(RootEntry { version: new_version.clone(), root: root.clone() }, true);

        let next_version = self.order.next(&new_version);
        for item in pending {
            self.insert_one(&root, item.clone(), &new_version, next_version.as_ref());
        }
        self.latest = Some(new_version.clone());
        Some(new_version)
    }

    fn insert_one(&mut self, root: &Option<FullNodeRef<T>>, item: T, version: &Version, next: Option<&Version>) {
        let mut parent: Option<FullNodeRef<T>> = None;
        let mut curr = root.clone();
        let key = (self.key_fn)(&item);

        while let Some(node) = curr {
            match (self.cmp)(&key, &self.key_of(&node)) {
                Ordering::Equal => return,
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

        let new_node = FullNode::new(item, version.clone(), Rc::clone(&self.version_cmp));
        let parent = parent.expect("non-empty subtree always finds an insertion parent");
        new_node.set_parent(Some(&parent), version, next);
        match self.compare(&key, &parent) {
            Ordering::Less => parent.set(Field::Left, Some(new_node), version, next),
            _ => parent.set(Field::Right, Some(new_node), version, next),
        }
    }

    pub fn search(&self, key: &K, version: &Version) -> Option<FullNodeRef<T>> {
        let mut curr = self.root_at(version);
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Equal => return Some(node),
                Ordering::Less => curr = node.get(Field::Left, version),
                Ordering::Greater => curr = node.get(Field::Right, version),
            }
        }
        None
    }

    pub fn search_le(&self, key: &K, version: &Version) -> Option<FullNodeRef<T>> {
        let mut best: Option<FullNodeRef<T>> = None;
        let mut curr = self.root_at(version);
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Equal => return Some(node),
                Ordering::Less => curr = node.get(Field::Left, version),
                Ordering::Greater => {
                    curr = node.get(Field::Right, version);
                    best = Some(node);
                }
            }
        }
        best
    }

    pub fn search_gt(&self, key: &K, version: &Version) -> Option<FullNodeRef<T>> {
        let mut best: Option<FullNodeRef<T>> = None;
        let mut curr = self.root_at(version);
        while let Some(node) = curr {
            match self.compare(key, &node) {
                Ordering::Less => {
                    best = Some(Rc::clone(&node));
                    curr = node.get(Field::Left, version);
                }
                _ => curr = node.get(Field::Right, version),
            }
        }
        best
    }

    /// Delete every key in `keys` as a new version forked from `base` (or
    /// the latest version). Keys absent at `base` are skipped; a batch
    /// that finds nothing still forks an (identical) new version, since
    /// unlike the partial-persistence engines a "no-op" here would be
    /// ambiguous about which branch to return.
    pub fn delete(&mut self, base: Option<&Version>, keys: &[K]) -> Option<Version> {
        let base = base.cloned().or_else(|| self.latest.clone());
        let base = match base {
            Some(b) => b,
            None => return None,
        };
        if keys.is_empty() {
            return Some(base);
        }

        let new_version = self.order.insert(Some(&base), ());
        let root = self.root_at(&base);
        self.roots.insert(RootEntry { version: new_version.clone(), root: root.clone() }, true);

        let next_version = self.order.next(&new_version);
        for key in keys {
            if let Some(node) = self.search(key, &new_version) {
                self.delete_node(&node, &new_version, next_version.as_ref());
            }
        }
        self.latest = Some(new_version.clone());
        Some(new_version)
    }

    fn delete_node(&mut self, node: &FullNodeRef<T>, version: &Version, next: Option<&Version>) {
        let left = node.get(Field::Left, version);
        let right = node.get(Field::Right, version);

        if left.is_none() {
            self.transplant(node, right, version, next);
        } else if right.is_none() {
            self.transplant(node, left, version, next);
        } else {
            let successor = self
                .successor(node, version)
                .unwrap_or_else(|| crate::error::invariant("two-child node always has a successor"));
            if !Rc::ptr_eq(&successor, right.as_ref().unwrap()) {
                let successor_right = successor.get(Field::Right, version);
                self.transplant(&successor, successor_right, version, next);
                successor.set(Field::Right, right.clone(), version, next);
                right.as_ref().unwrap().set_parent(Some(&successor), version, next);
            }
            self.transplant(node, Some(Rc::clone(&successor)), version, next);
            successor.set(Field::Left, left.clone(), version, next);
            left.as_ref().unwrap().set_parent(Some(&successor), version, next);
        }
    }

    fn transplant(
        &mut self,
        old: &FullNodeRef<T>,
        replacement: Option<FullNodeRef<T>>,
        version: &Version,
        next: Option<&Version>,
    ) {
        let old_parent = old.get_parent(version);
        match &old_parent {
            None => {
                self.roots.insert(RootEntry { version: version.clone(), root: replacement.clone() }, true);
            }
            Some(parent) => {
                if self.is_left_child(old, parent, version) {
                    parent.set(Field::Left, replacement.clone(), version, next);
                } else {
                    parent.set(Field::Right, replacement.clone(), version, next);
                }
            }
        }
        if let Some(r) = &replacement {
            r.set_parent(old_parent.as_ref(), version, next);
        }
    }

    fn successor(&self, node: &FullNodeRef<T>, version: &Version) -> Option<FullNodeRef<T>> {
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

    fn find_min(node: &FullNodeRef<T>, version: &Version) -> FullNodeRef<T> {
        let mut curr = Rc::clone(node);
        loop {
            match curr.get(Field::Left, version) {
                Some(l) => curr = l,
                None => return curr,
            }
        }
    }

    /// In-order traversal of projected keys at `version`, ascending.
    pub fn inorder(&self, version: &Version) -> Vec<K>
    where
        K: Clone,
    {
        let mut out = Vec::new();
        self.inorder_walk(&self.root_at(version), version, &mut out);
        out
    }

    fn inorder_walk(&self, node: &Option<FullNodeRef<T>>, version: &Version, out: &mut Vec<K>)
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
#[path = "full_test.rs"]
mod full_test;
