//! Planar point location by slab decomposition (component C7).
//!
//! This module is a worked *consumer* of the persistent-BST library, not
//! a computational-geometry library in its own right: it only ever
//! touches [`crate::fatnode::FatTree`] through its public contract
//! (insert/delete/search_le at a version), which is the point of
//! including it — proof that the persistent engines compose into a real
//! application. No plotting, no mesh/OBJ import: those are outside this
//! crate's scope.
//!
//! A set of non-crossing, non-vertical segments is swept left to right.
//! Between consecutive distinct x-coordinates of segment endpoints lies a
//! "slab"; inside a slab, the segments crossing it keep a fixed vertical
//! order, so that order is exactly a version of a persistent ordered set.
//! Locating a query point binary-searches the slab boundaries for the
//! containing slab, then asks that slab's version for the segment
//! immediately below (or through) the point — the [`FatTree::search_le`]
//! this whole module exists to call.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::fatnode::FatTree;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A non-vertical segment, endpoints normalized so `p1.x <= p2.x`.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub id: usize,
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub fn new(id: usize, a: Point, b: Point) -> Segment {
        assert!((a.x - b.x).abs() > f64::EPSILON, "segment {} is vertical", id);
        if a.x <= b.x {
            Segment { id, p1: a, p2: b }
        } else {
            Segment { id, p1: b, p2: a }
        }
    }

    /// Interpolated height at `x`. Callers only ever probe an `x` inside
    /// `[p1.x, p2.x]` — the slab this segment is registered for.
    fn y_at(&self, x: f64) -> f64 {
        let t = (x - self.p1.x) / (self.p2.x - self.p1.x);
        self.p1.y + t * (self.p2.y - self.p1.y)
    }

    fn is_probe(&self) -> bool {
        self.id == usize::MAX
    }

    /// Not a real segment: a query point wrapped up so it can be handed
    /// to [`FatTree::search_le`] under the same comparator as registered
    /// segments. `p1 == p2 == at` rather than a span, since a probe
    /// stands for one location, not a stretch of the sweep.
    fn probe(at: Point) -> Segment {
        Segment { id: usize::MAX, p1: at, p2: at }
    }
}

/// `true` iff `p` lies on or below `segment`, evaluated at `p.x`.
pub fn is_below_or_on_line(p: &Point, segment: &Segment) -> bool {
    p.y <= segment.y_at(p.x)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < f64::EPSILON
}

/// The height of `s` to use when comparing it against another segment:
/// a probe's is just its fixed query height, a real segment's is its
/// interpolated height at `x`.
fn height_at(s: &Segment, x: f64) -> f64 {
    if s.is_probe() {
        s.p1.y
    } else {
        s.y_at(x.clamp(s.p1.x, s.p2.x))
    }
}

/// The x-coordinate at which to compare `a` and `b`'s heights. A plain
/// pairwise function of the two segments (no sweep state): two segments
/// simultaneously registered in the tree are, by construction, always
/// both crossing whatever slab the read or write is happening in, so
/// their x-ranges always overlap and this is always well defined.
fn reference_x(a: &Segment, b: &Segment) -> f64 {
    if a.is_probe() {
        return a.p1.x;
    }
    if b.is_probe() {
        return b.p1.x;
    }
    if close(a.p1.x, b.p1.x) && close(a.p1.y, b.p1.y) {
        // shared source vertex: compare right where they meet.
        return a.p1.x;
    }
    let lo = a.p1.x.max(b.p1.x);
    let hi = a.p2.x.min(b.p2.x);
    (lo + hi) / 2.0
}

/// Sweep-line order (§6): `a` compares below `b` if it sits lower at the
/// x where they're compared, ties broken by id so equal-height segments
/// (never supposed to happen in a non-crossing subdivision, but two
/// collinear segments would otherwise be indistinguishable) still order
/// consistently.
fn segment_cmp(a: &Segment, b: &Segment) -> Ordering {
    if a.id == b.id {
        return Ordering::Equal;
    }
    let x = reference_x(a, b);
    height_at(a, x).partial_cmp(&height_at(b, x)).unwrap_or(Ordering::Equal).then_with(|| a.id.cmp(&b.id))
}

/// One slab: `[from, to)` in x, and the persistent-tree version holding
/// every segment crossing it, ordered bottom to top.
struct Slab {
    from: f64,
    to: f64,
    /// `None` means no segment crosses this slab at all.
    version: Option<usize>,
}

/// Planar point-location structure built from a fixed set of segments.
pub struct PointLocator {
    slabs: Vec<Slab>,
    tree: FatTree<Segment, Segment>,
}

impl PointLocator {
    /// Build the slab decomposition for `segments`. Segments must be
    /// pairwise non-crossing (the slab technique relies on a fixed
    /// vertical order holding across each whole slab); this is a
    /// precondition on the input, not something this constructor checks.
    ///
    /// Mirrors the per-vertex sweep of the original: each boundary x is
    /// an event point, where every segment whose right endpoint is `x`
    /// is deleted from the active set and every segment whose left
    /// endpoint is `x` is inserted, before that slab's version is
    /// recorded (§6: "delete every edge … whose tail equals the
    /// incoming vertex … insert every outgoing edge").
    pub fn build(segments: Vec<Segment>) -> PointLocator {
        let cmp: Rc<dyn Fn(&Segment, &Segment) -> Ordering> = Rc::new(segment_cmp);
        let mut tree = FatTree::new(Rc::new(|s: &Segment| s.clone()), cmp);

        let mut boundaries: Vec<f64> = segments.iter().flat_map(|s| [s.p1.x, s.p2.x]).collect();
        boundaries.sort_by(|a, b| a.partial_cmp(b).unwrap());
        boundaries.dedup_by(|a, b| close(*a, *b));

        let mut slabs = Vec::new();
        let mut active: Vec<Segment> = Vec::new();
        let mut version: Option<usize> = None;

        for window in boundaries.windows(2) {
            let (from, to) = (window[0], window[1]);

            let leaving: Vec<Segment> = active.iter().filter(|s| close(s.p2.x, from)).cloned().collect();
            active.retain(|s| !leaving.iter().any(|l| l.id == s.id));
            version = tree.delete(&leaving);

            let entering: Vec<Segment> = segments.iter().filter(|s| close(s.p1.x, from)).cloned().collect();
            active.extend(entering.iter().cloned());
            version = tree.insert(&entering);

            slabs.push(Slab { from, to, version });
        }

        PointLocator { slabs, tree }
    }

    fn slab_for(&self, x: f64) -> Option<&Slab> {
        self.slabs
            .binary_search_by(|slab| {
                if x < slab.from {
                    Ordering::Greater
                } else if x >= slab.to {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()
            .map(|i| &self.slabs[i])
    }

    /// The segment immediately at or below `point`, or `None` if `point`
    /// falls outside every slab or below every segment in its slab.
    pub fn locate(&self, point: Point) -> Option<Segment> {
        let slab = self.slab_for(point.x)?;
        let version = slab.version?;
        let found = self.tree.search_le(&Segment::probe(point), Some(version))?;
        Some(found.key.clone())
    }
}

#[cfg(test)]
#[path = "planar_test.rs"]
mod planar_test;
