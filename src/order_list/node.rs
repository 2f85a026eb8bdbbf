use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

/// A single slot in the order-maintenance list.
///
/// `next` owns its successor; `prev` is a weak back-reference, the same
/// convention used for `parent` pointers throughout this crate (see
/// `crate::bst::Node`). Sentinels (`base`, `end`) carry `value: None` and
/// are never returned to callers.
pub(super) struct Inner<T> {
    pub(super) label: u64,
    pub(super) prev: Option<Weak<RefCell<Inner<T>>>>,
    pub(super) next: Option<Rc<RefCell<Inner<T>>>>,
    pub(super) value: Option<T>,
}

/// A handle to a node in an `OrderList`. Cloning is cheap (it clones the
/// `Rc`); two handles compare equal iff they name the same list slot.
pub struct VersionHandle<T>(pub(super) Rc<RefCell<Inner<T>>>);

impl<T> Clone for VersionHandle<T> {
    fn clone(&self) -> Self {
        VersionHandle(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for VersionHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for VersionHandle<T> {}

impl<T: std::fmt::Debug> std::fmt::Debug for VersionHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.0.borrow();
        write!(f, "Version(label: {}, value: {:?})", inner.label, inner.value)
    }
}

impl<T> VersionHandle<T> {
    pub(super) fn from_rc(rc: Rc<RefCell<Inner<T>>>) -> Self {
        VersionHandle(rc)
    }

    pub(super) fn ptr(&self) -> &Rc<RefCell<Inner<T>>> {
        &self.0
    }

    /// The monotonic position label. Exposed so engines with their own
    /// secondary index (e.g. `crate::full`'s roots tree) can compare
    /// versions without holding a reference back into the list.
    pub fn label(&self) -> u64 {
        self.0.borrow().label
    }

    pub fn value(&self) -> Ref<'_, T> {
        Ref::map(self.0.borrow(), |inner| {
            inner.value.as_ref().expect("sentinel handle leaked to caller")
        })
    }
}
