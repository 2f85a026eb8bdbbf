use super::*;

fn p(x: f64, y: f64) -> Point {
    Point { x, y }
}

/// The unit square `[0,1]x[0,1]` decomposed into its bottom and top edge
/// (the two vertical sides aren't representable as non-vertical segments
/// and aren't needed: a single slab `[0,1)` already disambiguates "above
/// the bottom edge" from "below the top edge").
fn unit_square() -> PointLocator {
    let bottom = Segment::new(0, p(0.0, 0.0), p(1.0, 0.0));
    let top = Segment::new(1, p(0.0, 1.0), p(1.0, 1.0));
    PointLocator::build(vec![bottom, top])
}

#[test]
fn test_unit_square_locate_inside_and_on_edges() {
    let locator = unit_square();

    let below_top = locator.locate(p(0.5, 0.9)).expect("point under the top edge");
    assert_eq!(below_top.id, 0); // the segment immediately below y=0.9 is the bottom edge...
    // ...unless the top edge (y=1) is also "at or below" nothing above it;
    // search_le orders bottom-to-top, so the nearest-below at y=0.9 is
    // whichever registered segment has the largest y <= 0.9: the bottom
    // edge (y=0), since the top edge sits at y=1 > 0.9.

    let on_bottom = locator.locate(p(0.5, 0.0)).expect("point on the bottom edge");
    assert_eq!(on_bottom.id, 0);

    let on_top = locator.locate(p(0.5, 1.0)).expect("point on the top edge");
    assert_eq!(on_top.id, 1);

    let above_everything = locator.locate(p(0.5, 5.0)).expect("point above both edges");
    assert_eq!(above_everything.id, 1);
}

#[test]
fn test_is_below_or_on_line() {
    let flat = Segment::new(0, p(0.0, 2.0), p(10.0, 2.0));
    assert!(is_below_or_on_line(&p(5.0, 2.0), &flat));
    assert!(is_below_or_on_line(&p(5.0, 0.0), &flat));
    assert!(!is_below_or_on_line(&p(5.0, 3.0), &flat));
}

#[test]
fn test_locate_outside_every_slab_is_none() {
    let locator = unit_square();
    assert!(locator.locate(p(5.0, 0.5)).is_none());
    assert!(locator.locate(p(-1.0, 0.5)).is_none());
}

#[test]
fn test_locate_below_everything_is_none() {
    let locator = unit_square();
    assert!(locator.locate(p(0.5, -10.0)).is_none());
}

/// Two slabs, and a segment (`a`) that is active in the first but has
/// left the sweep by the second. A point sitting above where `a` would
/// have been must not resolve to `a` once it's gone — the slab at
/// `x=2` was only ever swept with `b`, which sits well above the query.
#[test]
fn test_departed_segment_is_not_visible_in_a_later_slab() {
    let a = Segment::new(0, p(0.0, 0.0), p(1.0, 0.0));
    let b = Segment::new(1, p(1.0, 10.0), p(3.0, 10.0));
    let locator = PointLocator::build(vec![a, b]);

    let found = locator.locate(p(0.5, 0.5)).expect("a still covers the first slab");
    assert_eq!(found.id, 0);

    // in the second slab only b is active, and it sits above the query;
    // the stale a from the first slab must not leak through.
    assert!(locator.locate(p(2.0, 5.5)).is_none());
}

/// Same departure, but the later slab has its own lower segment (`c`)
/// once `a` leaves: the query must resolve to `c`, not to the departed
/// `a`, even though `a`'s height would also satisfy "at or below".
#[test]
fn test_later_slab_sees_its_own_segment_not_the_departed_one() {
    let a = Segment::new(0, p(0.0, 0.0), p(1.0, 0.0));
    let b = Segment::new(1, p(1.0, 10.0), p(3.0, 10.0));
    let c = Segment::new(2, p(1.0, 2.0), p(3.0, 2.0));
    let locator = PointLocator::build(vec![a, b, c]);

    let found = locator.locate(p(2.0, 5.0)).expect("c covers the second slab below b");
    assert_eq!(found.id, 2);
}
