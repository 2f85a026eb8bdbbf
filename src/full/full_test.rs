use std::rc::Rc;

use super::*;

fn identity() -> FullTree<i64, i64> {
    FullTree::new(Rc::new(|k: &i64| *k), Rc::new(|a: &i64, b: &i64| a.cmp(b)))
}

#[test]
fn test_linear_history_matches_partial_persistence() {
    let mut t = identity();
    let v0 = t.insert(None, &[8, 3, 10]).unwrap();
    let v1 = t.insert(None, &[1]).unwrap();
    let v2 = t.insert(None, &[6]).unwrap();
    let v3 = t.insert(None, &[14, 4]).unwrap();

    assert_eq!(t.inorder(&v0), vec![3, 8, 10]);
    assert_eq!(t.inorder(&v1), vec![1, 3, 8, 10]);
    assert_eq!(t.inorder(&v2), vec![1, 3, 6, 8, 10]);
    assert_eq!(t.inorder(&v3), vec![1, 3, 4, 6, 8, 10, 14]);
}

/// The defining property of full persistence: forking twice from the same
/// past version produces two independent branches, neither of which
/// disturbs the other or the version they both descend from.
#[test]
fn test_forking_from_a_past_version_creates_independent_branches() {
    let mut t = identity();
    let root = t.insert(None, &[10, 5, 15]).unwrap();

    let branch_a = t.insert(Some(&root), &[1]).unwrap();
    let branch_b = t.insert(Some(&root), &[99]).unwrap();

    assert_eq!(t.inorder(&root), vec![5, 10, 15]);
    assert_eq!(t.inorder(&branch_a), vec![1, 5, 10, 15]);
    assert_eq!(t.inorder(&branch_b), vec![5, 10, 15, 99]);

    // each branch's insert is invisible from the other.
    assert!(t.search(&1, &branch_b).is_none());
    assert!(t.search(&99, &branch_a).is_none());

    let branch_a2 = t.insert(Some(&branch_a), &[2]).unwrap();
    assert_eq!(t.inorder(&branch_a2), vec![1, 2, 5, 10, 15]);
    assert_eq!(t.inorder(&branch_a), vec![1, 5, 10, 15]);
    assert_eq!(t.inorder(&branch_b), vec![5, 10, 15, 99]);
}

#[test]
fn test_delete_forked_from_past_version() {
    let mut t = identity();
    let v0 = t.insert(None, &[10, 5, 15, 1, 7]).unwrap();
    let v1 = t.insert(None, &[20]).unwrap();

    // delete from v0, not from the latest version v1: 20 must never have
    // existed on this branch.
    let v2 = t.delete(Some(&v0), &[5]).unwrap();

    assert_eq!(t.inorder(&v0), vec![1, 5, 7, 10, 15]);
    assert_eq!(t.inorder(&v1), vec![1, 5, 7, 10, 15, 20]);
    assert_eq!(t.inorder(&v2), vec![1, 7, 10, 15]);
    assert!(t.search(&20, &v2).is_none());
}

#[test]
fn test_insert_with_no_base_defaults_to_latest() {
    let mut t = identity();
    let v0 = t.insert(None, &[1]).unwrap();
    let v1 = t.insert(None, &[2]).unwrap();
    assert_eq!(t.get_latest_version(), Some(v1.clone()));
    assert_eq!(t.inorder(&v1), vec![1, 2]);
    let _ = v0;
}

#[test]
fn test_s2_full_persistence_forks() {
    let mut t = identity();
    let v0 = t.insert(None, &[3]).unwrap();
    let v1 = t.insert(Some(&v0), &[2]).unwrap();
    let v2 = t.insert(Some(&v1), &[4]).unwrap();
    let v3 = t.insert(Some(&v2), &[5]).unwrap();
    let v4 = t.insert(Some(&v0), &[1]).unwrap();
    let v5 = t.insert(Some(&v0), &[6]).unwrap();
    let v6 = t.insert(Some(&v3), &[1]).unwrap();
    let v7 = t.insert(Some(&v3), &[6]).unwrap();

    // list order: [v0, v5, v4, v1, v2, v3, v7, v6]
    for pair in [(&v0, &v5), (&v5, &v4), (&v4, &v1), (&v1, &v2), (&v2, &v3), (&v3, &v7), (&v7, &v6)] {
        assert!(pair.0.label() < pair.1.label());
    }

    assert_eq!(t.inorder(&v3), vec![2, 3, 4, 5]);
    assert_eq!(t.inorder(&v4), vec![1, 3]);
    assert_eq!(t.inorder(&v5), vec![3, 6]);
    assert_eq!(t.inorder(&v6), vec![1, 2, 3, 4, 5]);
    assert_eq!(t.inorder(&v7), vec![2, 3, 4, 5, 6]);
}

#[test]
fn test_s3_full_persistence_deletions_across_forks() {
    let mut t = identity();
    let v0 = t.insert(None, &[10]).unwrap();
    let v1 = t.insert(Some(&v0), &[7]).unwrap();
    let v2 = t.insert(Some(&v1), &[20]).unwrap();
    let v3 = t.insert(Some(&v2), &[15]).unwrap();
    let v4 = t.insert(Some(&v3), &[25]).unwrap();

    let _v5 = t.delete(Some(&v3), &[7]).unwrap();
    let v6 = t.delete(Some(&v4), &[20]).unwrap();
    let _v7 = t.insert(Some(&v3), &[30]).unwrap();
    let v8 = t.delete(Some(&v6), &[10]).unwrap();
    let v9 = t.insert(Some(&v0), &[5]).unwrap();
    let v10 = t.delete(Some(&v0), &[10]).unwrap();

    assert_eq!(t.inorder(&v6), vec![7, 10, 15, 25]);
    assert_eq!(t.inorder(&v8), vec![7, 15, 25]);
    assert_eq!(t.inorder(&v9), vec![5, 10]);
    assert_eq!(t.inorder(&v10), Vec::<i64>::new());
}

#[test]
fn test_empty_batches_are_noop() {
    let mut t = identity();
    let v0 = t.insert(None, &[1]).unwrap();
    assert_eq!(t.insert(None, &[]), Some(v0.clone()));
    assert_eq!(t.delete(Some(&v0), &[]), Some(v0.clone()));
}
