use std::rc::Rc;

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::*;

fn identity() -> FatTree<i64, i64> {
    FatTree::new(Rc::new(|k: &i64| *k), Rc::new(|a: &i64, b: &i64| a.cmp(b)))
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

    assert_eq!(t.search(&4, Some(v4)).unwrap().key, 4);
    assert!(t.search(&4, Some(v5)).is_none());
    assert_eq!(t.search(&4, Some(v4)).unwrap().key, 4);
}

#[test]
fn test_old_versions_are_unaffected_by_later_writes() {
    let mut t = identity();
    let v0 = t.insert(&[10, 5, 20, 1, 7]).unwrap();
    let before = t.inorder(Some(v0));
    let _v1 = t.insert(&[100]).unwrap();
    let _v2 = t.delete(&[5]).unwrap();
    assert_eq!(t.inorder(Some(v0)), before);
}

#[test]
fn test_search_le_and_gt_across_versions() {
    let mut t = identity();
    let v0 = t.insert(&[10, 20, 12, 5, 1, 30]).unwrap();
    assert_eq!(t.search_le(&15, Some(v0)).unwrap().key, 12);
    assert_eq!(t.search_gt(&12, Some(v0)).unwrap().key, 20);
    let v1 = t.delete(&[12]).unwrap();
    assert_eq!(t.search_le(&15, Some(v1)).unwrap().key, 10);
    assert_eq!(t.search_le(&15, Some(v0)).unwrap().key, 12);
}

// Mirrors the random insert/search/inorder/delete soak used against the
// fat-node reference: evolve the tree through random batches and check
// every query against a plain sorted-vec control at the same version.
#[test]
fn test_random_insert_against_control() {
    let seed: u64 = rand::random();
    println!("test_random_insert_against_control seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut t = identity();
    let mut control: Vec<i64> = Vec::new();
    let mut last_version = None;

    for _ in 0..300 {
        let k = rng.gen_range(0..1000);
        last_version = t.insert(&[k]);
        if !control.contains(&k) {
            control.push(k);
            control.sort_unstable();
        }
        assert_eq!(t.inorder(last_version), control);
    }
}

#[test]
fn test_random_delete_against_control() {
    let seed: u64 = rand::random();
    println!("test_random_delete_against_control seed:{}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let mut t = identity();
    let mut control: Vec<i64> = (0..200).collect();
    let v0 = t.insert(&control).unwrap();
    assert_eq!(t.inorder(Some(v0)), control);

    let mut last_version = v0;
    while !control.is_empty() {
        let idx = rng.gen_range(0..control.len());
        let k = control.remove(idx);
        last_version = t.delete(&[k]).unwrap();
        assert_eq!(t.inorder(Some(last_version)), control);
        assert!(t.search(&k, Some(last_version)).is_none());
    }
}

#[test]
fn test_delete_on_absent_key_batch_is_noop() {
    let mut t = identity();
    let v0 = t.insert(&[1, 2, 3]).unwrap();
    assert_eq!(t.delete(&[999]), Some(v0));
    assert_eq!(t.get_latest_version(), Some(v0));
}
