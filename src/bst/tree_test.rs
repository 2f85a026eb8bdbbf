use std::collections::BTreeSet;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::*;

#[test]
fn test_insert_search_inorder() {
    let mut t = ordered::<i64>();
    for k in [8, 3, 10, 1, 6, 14, 4, 7] {
        t.insert(k, false);
    }
    assert_eq!(t.inorder(), vec![1, 3, 4, 6, 7, 8, 10, 14]);
    assert!(t.search(&6).is_some());
    assert!(t.search(&99).is_none());
}

#[test]
fn test_duplicate_insert_is_noop_without_overwrite() {
    let mut t = ordered::<i64>();
    t.insert(5, false);
    t.insert(5, false);
    assert_eq!(t.len(), 1);
    assert_eq!(t.inorder(), vec![5]);
}

#[test]
fn test_search_le_and_gt() {
    let mut t = ordered::<i64>();
    for k in [10, 20, 12, 5, 1, 30] {
        t.insert(k, false);
    }
    // predecessor-of-15 must see into the right subtree, not stop at 10.
    assert_eq!(t.search_le(&15).unwrap().borrow().key, 12);
    assert_eq!(t.search_le(&1).unwrap().borrow().key, 1);
    assert!(t.search_le(&0).is_none());
    assert_eq!(t.search_gt(&12).unwrap().borrow().key, 20);
    assert!(t.search_gt(&30).is_none());
}

#[test]
fn test_delete_leaf_one_child_two_children() {
    let mut t = ordered::<i64>();
    for k in [8, 3, 10, 1, 6, 14, 4, 7] {
        t.insert(k, false);
    }
    assert!(t.delete(&4)); // leaf
    assert_eq!(t.inorder(), vec![1, 3, 6, 7, 8, 10, 14]);
    assert!(t.delete(&6)); // one child (7)
    assert_eq!(t.inorder(), vec![1, 3, 7, 8, 10, 14]);
    assert!(t.delete(&8)); // two children, root
    assert_eq!(t.inorder(), vec![1, 3, 7, 10, 14]);
    assert!(!t.delete(&999));
}

#[test]
fn test_empty_tree() {
    let t = ordered::<i64>();
    assert!(t.inorder().is_empty());
    assert!(t.search(&1).is_none());
    assert!(t.search_le(&1).is_none());
    assert!(t.search_gt(&1).is_none());
}

#[test]
fn test_random_against_btreeset_oracle() {
    let seed: u64 = rand::random();
    println!("test_random_against_btreeset_oracle seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut t = ordered::<i32>();
    let mut oracle: BTreeSet<i32> = BTreeSet::new();

    for _ in 0..2000 {
        let k = rng.gen_range(0..500);
        if rng.gen_bool(0.6) {
            t.insert(k, false);
            oracle.insert(k);
        } else {
            t.delete(&k);
            oracle.remove(&k);
        }
    }

    let got = t.inorder();
    let want: Vec<i32> = oracle.into_iter().collect();
    assert_eq!(got, want);
}
