use std::cmp::Ordering;
use std::rc::Rc;

/// Type-erased, cloneable comparator handle supplied at engine-
/// construction time and shared by a tree and every node/version
/// structure it hands out. `Rc` rather than `Arc`: every engine here is
/// single-threaded (see the concurrency notes in DESIGN.md).
///
/// Every engine in this crate takes one of these rather than requiring
/// `K: Ord`, which is what lets the planar point-location slab tree
/// (`crate::planar`) order segments by the sweep-line rule instead of by
/// `Segment`'s own notion of equality.
pub type CmpFn<T> = Rc<dyn Fn(&T, &T) -> Ordering>;

/// A `CmpFn` backed by `Ord`, for callers with no custom ordering.
pub fn natural_order<T: Ord + 'static>() -> CmpFn<T> {
    Rc::new(|a: &T, b: &T| a.cmp(b))
}
