use std::rc::Rc;

use super::*;

fn identity() -> Naive<i64, i64> {
    Naive::new(Rc::new(|k: &i64| *k), Rc::new(|a: &i64, b: &i64| a.cmp(b)))
}

#[test]
fn test_s1_partial_mixed_ops() {
    let mut t = identity();
    let v0 = t.insert(&[8, 3, 10]).unwrap();
    let _v1 = t.insert(&[1]).unwrap();
    let _v2 = t.insert(&[6]).unwrap();
    let v3 = t.insert(&[14, 4]).unwrap();
    let v4 = t.insert(&[7]).unwrap();
    let v5 = t.delete(&[4]).unwrap();
    let v6 = t.delete(&[6, 3]).unwrap();
    let v7 = t.delete(&[8]).unwrap();
    let v8 = t.insert(&[0]).unwrap();
    let v9 = t.insert(&[2, 5]).unwrap();
    let all_v9 = t.inorder(Some(v9));
    let v10 = t.delete(&all_v9).unwrap();
    let v11 = t.insert(&[1]).unwrap();

    assert_eq!(t.inorder(Some(v0)), vec![3, 8, 10]);
    assert_eq!(t.inorder(Some(v3)), vec![1, 3, 4, 6, 8, 10, 14]);
    assert_eq!(t.inorder(Some(v4)), vec![1, 3, 4, 6, 7, 8, 10, 14]);
    assert_eq!(t.inorder(Some(v5)), vec![1, 3, 6, 7, 8, 10, 14]);
    assert_eq!(t.inorder(Some(v6)), vec![1, 7, 8, 10, 14]);
    assert_eq!(t.inorder(Some(v7)), vec![1, 7, 10, 14]);
    assert_eq!(t.inorder(Some(v8)), vec![0, 1, 7, 10, 14]);
    assert_eq!(t.inorder(Some(v9)), vec![0, 1, 2, 5, 7, 10, 14]);
    assert_eq!(t.inorder(Some(v10)), Vec::<i64>::new());
    assert_eq!(t.inorder(Some(v11)), vec![1]);

    assert_eq!(t.search(&4, Some(v4)).unwrap().borrow().key, 4);
    assert!(t.search(&4, Some(v5)).is_none());
    assert_eq!(t.search(&4, Some(v4)).unwrap().borrow().key, 4);
}

#[test]
fn test_read_only_past() {
    let mut t = identity();
    let v0 = t.insert(&[10]).unwrap();
    let snapshot_before = t.inorder(Some(v0));
    let _v1 = t.insert(&[20]).unwrap();
    assert_eq!(t.inorder(Some(v0)), snapshot_before);
}

#[test]
fn test_idempotent_insert() {
    let mut t = identity();
    let v0 = t.insert(&[5]).unwrap();
    let v1 = t.insert(&[5]).unwrap();
    assert_eq!(t.inorder(Some(v0)), t.inorder(Some(v1)));
}

#[test]
fn test_empty_batches_are_noop() {
    let mut t = identity();
    assert_eq!(t.get_latest_version(), None);
    assert_eq!(t.delete(&[]), None);
    let v0 = t.insert(&[1]).unwrap();
    assert_eq!(t.insert(&[]), Some(v0));
    assert_eq!(t.delete(&[]), Some(v0));
}
