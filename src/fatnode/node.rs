use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::bst::Bst;

/// Which mutable field a read/write targets. A tagged enum rather than
/// the source's string-keyed dispatch (`"left"` / `"right"` / `"parent"`)
/// — see the "Field-indexed dispatch" note in DESIGN.md.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Left,
    Right,
    Parent,
}

pub type FatNodeRef<T> = Rc<FatNode<T>>;

/// One version-indexed modification record: "field equals `value` from
/// `version` onward" (§3, "Fat node").
#[derive(Clone)]
struct Record<T> {
    version: usize,
    value: Option<FatNodeRef<T>>,
}

/// A fat node (component C4): an immutable key plus, for each of the
/// three pointer fields, a raw "as of creation" value and a version ->
/// value history recording every later write. Reading at an old version
/// is a predecessor search in that field's history; reading at the
/// current version is an O(1) field access.
pub struct FatNode<T> {
    pub key: T,
    pub v0: usize,
    left: RefCell<Option<FatNodeRef<T>>>,
    right: RefCell<Option<FatNodeRef<T>>>,
    parent: RefCell<Option<Weak<FatNode<T>>>>,
    left_hist: RefCell<Bst<Record<T>, usize>>,
    right_hist: RefCell<Bst<Record<T>, usize>>,
    parent_hist: RefCell<Bst<Record<T>, usize>>,
}

fn history<T>() -> Bst<Record<T>, usize> {
    Bst::new(Rc::new(|r: &Record<T>| r.version), Rc::new(|a: &usize, b: &usize| a.cmp(b)))
}

impl<T> FatNode<T> {
    pub fn new(key: T, v0: usize) -> FatNodeRef<T> {
        Rc::new(FatNode {
            key,
            v0,
            left: RefCell::new(None),
            right: RefCell::new(None),
            parent: RefCell::new(None),
            left_hist: RefCell::new(history()),
            right_hist: RefCell::new(history()),
            parent_hist: RefCell::new(history()),
        })
    }

    fn hist(&self, field: Field) -> &RefCell<Bst<Record<T>, usize>> {
        match field {
            Field::Left => &self.left_hist,
            Field::Right => &self.right_hist,
            Field::Parent => &self.parent_hist,
        }
    }

    fn current_left_right(&self, field: Field) -> Option<FatNodeRef<T>> {
        match field {
            Field::Left => self.left.borrow().clone(),
            Field::Right => self.right.borrow().clone(),
            Field::Parent => unreachable!("parent read goes through get_parent"),
        }
    }

    fn set_left_right_raw(&self, field: Field, value: Option<FatNodeRef<T>>) {
        match field {
            Field::Left => *self.left.borrow_mut() = value,
            Field::Right => *self.right.borrow_mut() = value,
            Field::Parent => unreachable!("parent write goes through set_parent"),
        }
    }

    /// Read `left`/`right` at `version`. Returns `None` both for "this
    /// field is nil at `version`" and for "the node did not exist yet".
    pub fn get(&self, field: Field, version: usize) -> Option<FatNodeRef<T>> {
        if version == self.v0 {
            return self.current_left_right(field);
        }
        if version < self.v0 {
            return None;
        }
        match self.hist(field).borrow().search_le(&version) {
            Some(record) => record.borrow().key.value.clone(),
            None => self.current_left_right(field),
        }
    }

    /// Write `left`/`right` at `version`. A no-op if `version` predates
    /// the node's creation — the write is unreachable from any queryable
    /// version.
    pub fn set(&self, field: Field, value: Option<FatNodeRef<T>>, version: usize) {
        if version == self.v0 {
            self.set_left_right_raw(field, value);
            return;
        }
        if version < self.v0 {
            return;
        }
        self.hist(field).borrow_mut().insert(Record { version, value }, true);
    }

    /// Read `parent` at `version`. Parents are stored as `Weak` (never an
    /// ownership edge, per the design notes) so reads upgrade on the fly.
    pub fn get_parent(&self, version: usize) -> Option<FatNodeRef<T>> {
        if version == self.v0 {
            return self.parent.borrow().as_ref().and_then(Weak::upgrade);
        }
        if version < self.v0 {
            return None;
        }
        match self.parent_hist.borrow().search_le(&version) {
            Some(record) => record.borrow().key.value.clone(),
            None => self.parent.borrow().as_ref().and_then(Weak::upgrade),
        }
    }

    pub fn set_parent(&self, value: Option<&FatNodeRef<T>>, version: usize) {
        let weak = value.map(Rc::downgrade);
        if version == self.v0 {
            *self.parent.borrow_mut() = weak;
            return;
        }
        if version < self.v0 {
            return;
        }
        let record = Record { version, value: value.cloned() };
        self.parent_hist.borrow_mut().insert(record, true);
    }
}
