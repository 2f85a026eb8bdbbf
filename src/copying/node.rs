use std::cell::RefCell;
use std::rc::{Rc, Weak};

pub use crate::fatnode::Field;

/// How many modification slots a node carries before it must be copied
/// (the DSST "e" parameter). Two is enough to amortize a copy over the
/// two extra pointers a BST node actually needs room for (one sibling
/// field plus the parent) — see the node-copying section of DESIGN.md.
pub const E: usize = 2;

pub type PNodeRef<T> = Rc<PNode<T>>;

enum ModValue<T> {
    Child(Option<PNodeRef<T>>),
    Parent(Option<Weak<PNode<T>>>),
}

struct Mod<T> {
    field: Field,
    version: usize,
    value: ModValue<T>,
}

/// A node-copying node (component C5): a fixed "base" triple of pointers
/// as of `created`, up to [`E`] extra modification slots recording later
/// writes, and a `copy` forward pointer set once those slots fill up —
/// every read for a version at or after the copy's creation is forwarded
/// there instead of being served locally.
pub struct PNode<T> {
    pub key: T,
    pub created: usize,
    left0: RefCell<Option<PNodeRef<T>>>,
    right0: RefCell<Option<PNodeRef<T>>>,
    parent0: RefCell<Option<Weak<PNode<T>>>>,
    mods: RefCell<Vec<Mod<T>>>,
    pub(super) copy: RefCell<Option<PNodeRef<T>>>,
}

impl<T> PNode<T> {
    pub fn new(key: T, created: usize) -> PNodeRef<T> {
        Rc::new(PNode {
            key,
            created,
            left0: RefCell::new(None),
            right0: RefCell::new(None),
            parent0: RefCell::new(None),
            mods: RefCell::new(Vec::new()),
            copy: RefCell::new(None),
        })
    }

    fn base_child(&self, field: Field) -> Option<PNodeRef<T>> {
        match field {
            Field::Left => self.left0.borrow().clone(),
            Field::Right => self.right0.borrow().clone(),
            Field::Parent => unreachable!("parent is read through get_parent"),
        }
    }

    /// Read `left`/`right` at `version`, following the copy chain first.
    pub fn get(&self, field: Field, version: usize) -> Option<PNodeRef<T>> {
        if let Some(copy) = self.copy.borrow().as_ref() {
            if version >= copy.created {
                return copy.get(field, version);
            }
        }
        if version < self.created {
            return None;
        }
        let mods = self.mods.borrow();
        let mut best: Option<(usize, Option<PNodeRef<T>>)> = None;
        for m in mods.iter() {
            if m.field == field && m.version <= version {
                if best.as_ref().map_or(true, |(v, _)| m.version > *v) {
                    if let ModValue::Child(value) = &m.value {
                        best = Some((m.version, value.clone()));
                    }
                }
            }
        }
        match best {
            Some((_, value)) => value,
            None => self.base_child(field),
        }
    }

    pub fn get_parent(&self, version: usize) -> Option<PNodeRef<T>> {
        if let Some(copy) = self.copy.borrow().as_ref() {
            if version >= copy.created {
                return copy.get_parent(version);
            }
        }
        if version < self.created {
            return None;
        }
        let mods = self.mods.borrow();
        let mut best: Option<(usize, Option<Weak<PNode<T>>>)> = None;
        for m in mods.iter() {
            if m.field == Field::Parent && m.version <= version {
                if best.as_ref().map_or(true, |(v, _)| m.version > *v) {
                    if let ModValue::Parent(value) = &m.value {
                        best = Some((m.version, value.clone()));
                    }
                }
            }
        }
        match best {
            Some((_, value)) => value.and_then(|w| w.upgrade()),
            None => self.parent0.borrow().as_ref().and_then(Weak::upgrade),
        }
    }

    /// Try to record a left/right write in a free slot. `false` means the
    /// node is full and the caller must copy it forward instead.
    pub fn try_set_child(&self, field: Field, value: Option<PNodeRef<T>>, version: usize) -> bool {
        let mut mods = self.mods.borrow_mut();
        if mods.len() >= E {
            return false;
        }
        mods.push(Mod { field, version, value: ModValue::Child(value) });
        true
    }

    pub fn try_set_parent(&self, value: Option<&PNodeRef<T>>, version: usize) -> bool {
        let mut mods = self.mods.borrow_mut();
        if mods.len() >= E {
            return false;
        }
        mods.push(Mod { field: Field::Parent, version, value: ModValue::Parent(value.map(Rc::downgrade)) });
        true
    }
}

impl<T: Clone> PNode<T> {
    /// Build the replacement for `old` once its slots are full: a fresh
    /// node whose base triple is `old`'s live image at `version`, with
    /// one field (the write that caused the overflow) overridden.
    pub fn copy_forward(
        old: &PNodeRef<T>,
        version: usize,
        child_override: Option<(Field, Option<PNodeRef<T>>)>,
        parent_override: Option<Option<PNodeRef<T>>>,
    ) -> PNodeRef<T> {
        let mut left = old.get(Field::Left, version);
        let mut right = old.get(Field::Right, version);
        let mut parent = old.get_parent(version);
        if let Some((field, value)) = child_override {
            match field {
                Field::Left => left = value,
                Field::Right => right = value,
                Field::Parent => unreachable!(),
            }
        }
        if let Some(p) = parent_override {
            parent = p;
        }
        Rc::new(PNode {
            key: old.key.clone(),
            created: version,
            left0: RefCell::new(left),
            right0: RefCell::new(right),
            parent0: RefCell::new(parent.as_ref().map(Rc::downgrade)),
            mods: RefCell::new(Vec::new()),
            copy: RefCell::new(None),
        })
    }
}
