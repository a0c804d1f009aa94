//! Tests for contraction (`*`) and the non-contracting product (`/`).
//!
//! Covers index matching, result index order, commutativity and
//! associativity on random tensors, trivial-index bookkeeping and the rank
//! limit.

use approx::assert_relative_eq;
use itensor::{ITensor, Index, MAX_RANK, TensorError, dot};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn vector(i: &Index, data: &[f64]) -> ITensor {
    ITensor::from_vec(std::slice::from_ref(i), data.to_vec()).unwrap()
}

/// Compare two tensors with the same index set element by element.
fn assert_tensors_close(a: &ITensor, b: &ITensor) {
    let mut b = b.clone();
    b.permute_to(a.indices().nontrivial()).unwrap();
    let (va, vb) = (a.assign_to_vec(), b.assign_to_vec());
    assert_eq!(va.len(), vb.len());
    for (x, y) in va.iter().zip(&vb) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12, max_relative = 1e-10);
    }
}

#[test]
fn test_outer_product_of_vectors() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 2);
    let t = vector(&i, &[1.0, 2.0]);
    let u = vector(&j, &[3.0, 4.0]);

    let tu = &t * &u;
    assert_eq!(tu.rank(), 2);
    assert_eq!(tu.indices().nontrivial(), &[i.clone(), j.clone()]);
    let expected = [((0, 0), 3.0), ((0, 1), 4.0), ((1, 0), 6.0), ((1, 1), 8.0)];
    for ((a, b), v) in expected {
        assert_relative_eq!(tu.get(&[i.at(a), j.at(b)]).unwrap(), v);
    }
}

#[test]
fn test_dot_of_vector_with_itself() {
    let i = Index::new("i", 2);
    let t = vector(&i, &[3.0, 4.0]);
    assert_relative_eq!(dot(&t, &t).unwrap(), 25.0);

    let s = &t * &t;
    assert_eq!(s.rank(), 0);
    assert_relative_eq!(s.to_scalar().unwrap(), 25.0);
}

#[test]
fn test_matrix_product_and_result_order() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 3);
    let k = Index::new("k", 2);
    // a(i,j) = 1 + i + 2j, b(k,j) stored with k fastest.
    let a = ITensor::from_vec(&[i.clone(), j.clone()], (1..=6).map(f64::from).collect()).unwrap();
    let b = ITensor::from_vec(&[k.clone(), j.clone()], vec![1.0, 0.0, 0.0, 1.0, 1.0, 1.0]).unwrap();

    let c = &a * &b;
    assert_eq!(c.indices().nontrivial(), &[i.clone(), k.clone()]);
    for x in 0..2 {
        for z in 0..2 {
            let mut expected = 0.0;
            for y in 0..3 {
                expected += a.get(&[i.at(x), j.at(y)]).unwrap() * b.get(&[k.at(z), j.at(y)]).unwrap();
            }
            assert_relative_eq!(c.get(&[i.at(x), k.at(z)]).unwrap(), expected);
        }
    }
}

#[test]
fn test_commutativity_random() {
    let mut rng = StdRng::seed_from_u64(11);
    let i = Index::new("i", 2);
    let j = Index::new("j", 3);
    let k = Index::new("k", 4);
    let l = Index::new("l", 2);
    let a = ITensor::random_with_rng(&[i.clone(), j.clone(), k.clone()], &mut rng).unwrap();
    let b = ITensor::random_with_rng(&[k.clone(), l.clone(), i.clone()], &mut rng).unwrap();

    let ab = &a * &b;
    let ba = &b * &a;
    assert_eq!(ab.indices().nontrivial(), &[j.clone(), l.clone()]);
    assert_eq!(ba.indices().nontrivial(), &[l.clone(), j.clone()]);
    assert_tensors_close(&ab, &ba);
}

#[test]
fn test_associativity_random() {
    let mut rng = StdRng::seed_from_u64(23);
    let i = Index::new("i", 3);
    let j = Index::new("j", 2);
    let k = Index::new("k", 4);
    let l = Index::new("l", 2);
    let a = ITensor::randn_with_rng(&[i.clone(), j.clone()], &mut rng).unwrap();
    let b = ITensor::randn_with_rng(&[k.clone(), j.clone()], &mut rng).unwrap();
    let c = ITensor::randn_with_rng(&[l.clone(), k.clone()], &mut rng).unwrap();

    let left = &(&a * &b) * &c;
    let right = &a * &(&b * &c);
    assert_tensors_close(&left, &right);
}

#[test]
fn test_scale_and_sign_combine() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 2);
    let t = vector(&i, &[1.0, 2.0]) * -1e-3;
    let u = vector(&j, &[3.0, 4.0]) * 1e5;

    let tu = &t * &u;
    assert!(tu.is_negative());
    assert_relative_eq!(tu.log_scale(), t.log_scale() + u.log_scale());
    assert_relative_eq!(tu.get(&[i.at(1), j.at(1)]).unwrap(), -800.0, max_relative = 1e-12);
}

#[test]
fn test_scalar_operand_shares_buffer() {
    let i = Index::new("i", 2);
    let t = vector(&i, &[1.0, 2.0]);
    let r = &t * &ITensor::scalar(-4.0);
    assert!(r.shares_storage_with(&t));
    assert_relative_eq!(r.get(&[i.at(1)]).unwrap(), -8.0, max_relative = 1e-12);

    let l = &ITensor::scalar(0.5) * &t;
    assert_relative_eq!(l.get(&[i.at(0)]).unwrap(), 0.5, max_relative = 1e-12);

    let z = &t * &ITensor::scalar(0.0);
    assert!(z.is_zero());
}

#[test]
fn test_trivial_indices() {
    let i = Index::new("i", 2);
    let u = Index::new("u", 1);
    let w = Index::new("w", 1);
    let a = ITensor::from_vec(&[i.clone(), u.clone()], vec![1.0, 2.0]).unwrap();
    let b = ITensor::from_vec(&[i.clone(), u.clone(), w.clone()], vec![3.0, 4.0]).unwrap();

    // u on both sides is contracted; w passes through.
    let c = &a * &b;
    assert_eq!(c.rank_n(), 0);
    assert!(!c.has_index(&u));
    assert!(c.has_index(&w));
    assert_relative_eq!(c.get(&[w.at(0)]).unwrap(), 11.0);

    // In the product trivial sets are unioned.
    let p = &a / &b;
    assert!(p.has_index(&u));
    assert!(p.has_index(&w));
    assert_eq!(p.assign_to_vec(), vec![3.0, 8.0]);
}

#[test]
fn test_product_keeps_shared_indices() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 3);
    let k = Index::new("k", 2);
    let a = ITensor::from_vec(&[i.clone(), j.clone()], (1..=6).map(f64::from).collect()).unwrap();
    let b = ITensor::from_vec(&[j.clone(), k.clone()], (1..=6).map(f64::from).collect()).unwrap();

    let p = &a / &b;
    assert_eq!(p.indices().nontrivial(), &[i.clone(), j.clone(), k.clone()]);
    for x in 0..2 {
        for y in 0..3 {
            for z in 0..2 {
                let expected = a.get(&[i.at(x), j.at(y)]).unwrap() * b.get(&[j.at(y), k.at(z)]).unwrap();
                assert_relative_eq!(p.get(&[i.at(x), j.at(y), k.at(z)]).unwrap(), expected);
            }
        }
    }
}

#[test]
fn test_rank_overflow() {
    let left: Vec<Index> = (0..5).map(|n| Index::new(&format!("a{n}"), 2)).collect();
    let right: Vec<Index> = (0..5).map(|n| Index::new(&format!("b{n}"), 2)).collect();
    let a = ITensor::zeros(&left).unwrap();
    let b = ITensor::zeros(&right).unwrap();

    let err = a.contract(&b).unwrap_err();
    assert!(matches!(err, TensorError::RankOverflow { rank: 10, max: MAX_RANK }));
    assert!(matches!(a.product(&b), Err(TensorError::RankOverflow { .. })));

    // Sharing one index brings the result back under the limit.
    let mut shared = right.clone();
    shared[0] = left[0].clone();
    let b = ITensor::zeros(&shared).unwrap();
    assert_eq!(a.contract(&b).unwrap().rank_n(), MAX_RANK);
}

#[test]
#[should_panic(expected = "cannot contract a null ITensor")]
fn test_null_operand_panics() {
    let i = Index::new("i", 2);
    let _ = ITensor::null().contract(&vector(&i, &[1.0, 2.0]));
}

#[test]
#[should_panic(expected = "ITensor * failed")]
fn test_operator_panics_on_overflow() {
    let left: Vec<Index> = (0..5).map(|n| Index::new(&format!("a{n}"), 2)).collect();
    let right: Vec<Index> = (0..5).map(|n| Index::new(&format!("b{n}"), 2)).collect();
    let _ = ITensor::zeros(&left).unwrap() * ITensor::zeros(&right).unwrap();
}
