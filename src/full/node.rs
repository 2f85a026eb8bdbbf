use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::{Rc, Weak};

use crate::bst::Bst;
use crate::key::CmpFn;
use crate::order_list::VersionHandle;

pub use crate::fatnode::Field;

/// A version identifier for the fully persistent engine: a node of an
/// order-maintenance list rather than an integer, so that a version
/// created by forking off an arbitrary past version still has a well
/// defined position relative to every other version (§"Order-maintenance
/// list").
pub type Version = VersionHandle<()>;

pub type FullNodeRef<T> = Rc<FullNode<T>>;

#[derive(Clone)]
struct Record<T> {
    version: Version,
    value: Option<FullNodeRef<T>>,
}

fn history<T>(version_cmp: CmpFn<Version>) -> Bst<Record<T>, Version> {
    Bst::new(Rc::new(|r: &Record<T>| r.version.clone()), version_cmp)
}

/// A fat node over order-maintenance versions (component C6): the same
/// "raw value at creation plus a version-indexed history" shape as
/// [`crate::fatnode::FatNode`], except every version comparison goes
/// through `order_cmp` (backed by [`crate::order_list::OrderList::order`])
/// instead of `<=` on integers.
pub struct FullNode<T> {
    pub key: T,
    pub v0: Version,
    order_cmp: CmpFn<Version>,
    left: RefCell<Option<FullNodeRef<T>>>,
    right: RefCell<Option<FullNodeRef<T>>>,
    parent: RefCell<Option<Weak<FullNode<T>>>>,
    left_hist: RefCell<Bst<Record<T>, Version>>,
    right_hist: RefCell<Bst<Record<T>, Version>>,
    parent_hist: RefCell<Bst<Record<T>, Version>>,
}

impl<T> FullNode<T> {
    pub fn new(key: T, v0: Version, order_cmp: CmpFn<Version>) -> FullNodeRef<T> {
        Rc::new(FullNode {
            key,
            v0,
            left: RefCell::new(None),
            right: RefCell::new(None),
            parent: RefCell::new(None),
            left_hist: RefCell::new(history(Rc::clone(&order_cmp))),
            right_hist: RefCell::new(history(Rc::clone(&order_cmp))),
            parent_hist: RefCell::new(history(Rc::clone(&order_cmp))),
            order_cmp,
        })
    }

    fn before_v0(&self, version: &Version) -> bool {
        (self.order_cmp)(version, &self.v0) == Ordering::Less
    }

    fn hist(&self, field: Field) -> &RefCell<Bst<Record<T>, Version>> {
        match field {
            Field::Left => &self.left_hist,
            Field::Right => &self.right_hist,
            Field::Parent => &self.parent_hist,
        }
    }

    fn current_left_right(&self, field: Field) -> Option<FullNodeRef<T>> {
        match field {
            Field::Left => self.left.borrow().clone(),
            Field::Right => self.right.borrow().clone(),
            Field::Parent => unreachable!("parent read goes through get_parent"),
        }
    }

    fn set_left_right_raw(&self, field: Field, value: Option<FullNodeRef<T>>) {
        match field {
            Field::Left => *self.left.borrow_mut() = value,
            Field::Right => *self.right.borrow_mut() = value,
            Field::Parent => unreachable!("parent write goes through set_parent"),
        }
    }

    pub fn get(&self, field: Field, version: &Version) -> Option<FullNodeRef<T>> {
        if *version == self.v0 {
            return self.current_left_right(field);
        }
        if self.before_v0(version) {
            return None;
        }
        match self.hist(field).borrow().search_le(version) {
            Some(record) => record.borrow().key.value.clone(),
            None => self.current_left_right(field),
        }
    }

    /// Write `left`/`right` at `version`. `next_version` is the
    /// immediate successor of `version` in the order-maintenance list,
    /// if one exists — it is what lets this write avoid leaking into a
    /// sibling branch that happens to sit later in list order than
    /// `version` but is not a descendant of it (§"fat-node full
    /// persistence", the extended write rule).
    pub fn set(
        &self,
        field: Field,
        value: Option<FullNodeRef<T>>,
        version: &Version,
        next_version: Option<&Version>,
    ) {
        if *version == self.v0 {
            self.set_left_right_raw(field, value);
            return;
        }
        if self.before_v0(version) {
            return;
        }
        let old_value = self.get(field, version);
        self.hist(field)
            .borrow_mut()
            .insert(Record { version: version.clone(), value }, true);
        self.guard_successor(field, version, next_version, old_value);
    }

    /// After writing field `f` at `version`, block the write from being
    /// observed by `next_version` (and, transitively, anything whose
    /// nearest-earlier record for `f` resolves to `next_version`) unless
    /// `next_version` already has its own later record for `f` — i.e.
    /// unless `next_version` is itself where this field was next
    /// legitimately rewritten.
    fn guard_successor(
        &self,
        field: Field,
        version: &Version,
        next_version: Option<&Version>,
        old_value: Option<FullNodeRef<T>>,
    ) {
        let i_plus = match next_version {
            Some(v) => v,
            None => return,
        };
        let should_guard = {
            let hist = self.hist(field).borrow();
            match hist.search_gt(version) {
                Some(v2) => (self.order_cmp)(i_plus, &v2.borrow().key.version) == Ordering::Less,
                None => true,
            }
        };
        if should_guard {
            self.hist(field)
                .borrow_mut()
                .insert(Record { version: i_plus.clone(), value: old_value }, true);
        }
    }

    pub fn get_parent(&self, version: &Version) -> Option<FullNodeRef<T>> {
        if *version == self.v0 {
            return self.parent.borrow().as_ref().and_then(Weak::upgrade);
        }
        if self.before_v0(version) {
            return None;
        }
        match self.parent_hist.borrow().search_le(version) {
            Some(record) => record.borrow().key.value.clone(),
            None => self.parent.borrow().as_ref().and_then(Weak::upgrade),
        }
    }

    pub fn set_parent(&self, value: Option<&FullNodeRef<T>>, version: &Version, next_version: Option<&Version>) {
        let weak = value.map(Rc::downgrade);
        if *version == self.v0 {
            *self.parent.borrow_mut() = weak;
            return;
        }
        if self.before_v0(version) {
            return;
        }
        let old_value = self.get_parent(version);
        let record = Record { version: version.clone(), value: value.cloned() };
        self.parent_hist.borrow_mut().insert(record, true);
        self.guard_successor(Field::Parent, version, next_version, old_value);
    }
}
