use std::cell::RefCell;
use std::rc::Rc;

use super::node::{Inner, VersionHandle};

/// Label space size, `M` in the design notes (§4.2). With `M = 2^32` a
/// relabel is triggered at most once per `O(log M)` insertions between a
/// pair of neighbors.
const LOG_M: u32 = 32;
const LABEL_SPACE: u64 = 1 << LOG_M;

/// Order-maintenance list: a doubly-linked list of labeled nodes that
/// answers `order(x, y)` in O(1) and supports O(1)-amortized insertion
/// anywhere in the sequence.
///
/// This is the version-comparability structure behind full persistence
/// (`crate::full`): rather than assigning versions consecutive integers,
/// a new version is spliced into this list immediately after its parent
/// version, and `order` tells two versions apart even though the version
/// graph itself is a tree, not a line.
pub struct OrderList<T> {
    base: Rc<RefCell<Inner<T>>>,
    end: Rc<RefCell<Inner<T>>>,
    len: usize,
}

impl<T> OrderList<T> {
    pub fn new() -> Self {
        let base = Rc::new(RefCell::new(Inner {
            label: 0,
            prev: None,
            next: None,
            value: None,
        }));
        let end = Rc::new(RefCell::new(Inner {
            label: LABEL_SPACE,
            prev: Some(Rc::downgrade(&base)),
            next: None,
            value: None,
        }));
        base.borrow_mut().next = Some(Rc::clone(&end));
        OrderList { base, end, len: 0 }
    }

    /// Number of non-sentinel nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert `value` immediately after `x`, where `x` is `None` to mean
    /// "at the head" (i.e. right after the base sentinel). Returns a
    /// handle to the freshly inserted node.
    pub fn insert(&mut self, after: Option<&VersionHandle<T>>, value: T) -> VersionHandle<T> {
        let x = match after {
            Some(h) => Rc::clone(h.ptr()),
            None => Rc::clone(&self.base),
        };
        let x_next = x.borrow().next.clone().expect("non-end node always has a next");
        let x_label = x.borrow().label;
        let next_label = x_next.borrow().label;

        let new_label = x_label + (next_label - x_label) / 2;
        let new_node = Rc::new(RefCell::new(Inner {
            label: new_label,
            prev: Some(Rc::downgrade(&x)),
            next: Some(Rc::clone(&x_next)),
            value: Some(value),
        }));

        x.borrow_mut().next = Some(Rc::clone(&new_node));
        x_next.borrow_mut().prev = Some(Rc::downgrade(&new_node));
        self.len += 1;

        let collided = new_label == x_label || new_label == next_label;
        let handle = VersionHandle::from_rc(new_node);
        if collided {
            self.relabel();
        }
        handle
    }

    /// Unlink `x` from the list. Sentinels are never removable; attempting
    /// to delete one is a silent no-op, matching search/delete semantics
    /// elsewhere in this crate.
    pub fn delete(&mut self, x: &VersionHandle<T>) {
        if Rc::ptr_eq(x.ptr(), &self.base) || Rc::ptr_eq(x.ptr(), &self.end) {
            return;
        }
        let (prev, next) = {
            let inner = x.ptr().borrow();
            (
                inner.prev.as_ref().and_then(|w| w.upgrade()),
                inner.next.clone(),
            )
        };
        if let (Some(prev), Some(next)) = (prev, next) {
            prev.borrow_mut().next = Some(Rc::clone(&next));
            next.borrow_mut().prev = Some(Rc::downgrade(&prev));
            self.len -= 1;
        }
    }

    /// `true` iff `x` occurs strictly before `y` in list order.
    pub fn order(&self, x: &VersionHandle<T>, y: &VersionHandle<T>) -> bool {
        x.ptr().borrow().label < y.ptr().borrow().label
    }

    /// The node immediately following `x`, or `None` if `x` is the last
    /// non-sentinel node.
    pub fn next(&self, x: &VersionHandle<T>) -> Option<VersionHandle<T>> {
        let next = x.ptr().borrow().next.clone()?;
        if Rc::ptr_eq(&next, &self.end) {
            return None;
        }
        Some(VersionHandle::from_rc(next))
    }

    /// O(n) indexed access into the list, counting from the first
    /// non-sentinel node. Used internally by relabeling; exposed because
    /// the contract (§4.2) calls for it.
    pub fn get(&self, index: usize) -> Option<VersionHandle<T>> {
        let mut curr = self.base.borrow().next.clone()?;
        let mut i = 0;
        loop {
            if Rc::ptr_eq(&curr, &self.end) {
                return None;
            }
            if i == index {
                return Some(VersionHandle::from_rc(curr));
            }
            let next = curr.borrow().next.clone()?;
            curr = next;
            i += 1;
        }
    }

    /// Iterate values in list order, sentinels excluded.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            curr: self.base.borrow().next.clone(),
            end: &self.end,
        }
    }

    /// Recompute every non-sentinel label as `(i+1) * floor(M/(n+2))`,
    /// restoring uniform gaps. O(n); triggered only on label collision.
    fn relabel(&mut self) {
        log::debug!("order-maintenance list: relabeling {} versions", self.len);
        let mut nodes = Vec::with_capacity(self.len);
        let mut curr = self.base.borrow().next.clone();
        while let Some(node) = curr {
            if Rc::ptr_eq(&node, &self.end) {
                break;
            }
            let next = node.borrow().next.clone();
            nodes.push(node);
            curr = next;
        }
        let step = LABEL_SPACE / (nodes.len() as u64 + 2);
        for (i, node) in nodes.iter().enumerate() {
            node.borrow_mut().label = (i as u64 + 1) * step;
        }
    }
}

impl<T> Default for OrderList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<'a, T> {
    curr: Option<Rc<RefCell<Inner<T>>>>,
    end: &'a Rc<RefCell<Inner<T>>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = VersionHandle<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.curr.take()?;
        if Rc::ptr_eq(&node, self.end) {
            return None;
        }
        self.curr = node.borrow().next.clone();
        Some(VersionHandle::from_rc(node))
    }
}
