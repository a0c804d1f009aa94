//! Tests for addition, subtraction, scalar multiplication and the
//! copy-on-write discipline.

use std::f64::consts::LN_2;

use approx::assert_relative_eq;
use itensor::config::SELF_SUBTRACT_SHIFT;
use itensor::{ITensor, Index, TensorError};

fn matrix(i: &Index, j: &Index, data: &[f64]) -> ITensor {
    ITensor::from_vec(&[i.clone(), j.clone()], data.to_vec()).unwrap()
}

#[test]
fn test_add_with_opposite_index_order() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 3);
    let a = matrix(&i, &j, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    let b = matrix(&j, &i, &[10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);

    let c = &a + &b;
    assert_eq!(c.indices().nontrivial(), &[i.clone(), j.clone()]);
    for x in 0..2 {
        for y in 0..3 {
            let expected = a.get(&[i.at(x), j.at(y)]).unwrap() + b.get(&[j.at(y), i.at(x)]).unwrap();
            assert_relative_eq!(c.get(&[i.at(x), j.at(y)]).unwrap(), expected);
        }
    }

    let d = &b - &a;
    assert_eq!(d.indices().nontrivial(), &[j.clone(), i.clone()]);
    assert_relative_eq!(d.get(&[i.at(1), j.at(2)]).unwrap(), 60.0 - 6.0);
}

#[test]
fn test_add_with_different_scales() {
    let i = Index::new("i", 2);
    let a = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap() * 1e8;
    let b = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap() * -2.0;

    let c = &a + &b;
    assert_relative_eq!(c.get(&[i.at(0)]).unwrap(), 1e8 - 6.0, max_relative = 1e-12);
    let c = &b + &a;
    assert_relative_eq!(c.get(&[i.at(1)]).unwrap(), 2e8 - 8.0, max_relative = 1e-12);
    let c = &b - &a;
    assert_relative_eq!(c.get(&[i.at(1)]).unwrap(), -8.0 - 2e8, max_relative = 1e-12);
}

#[test]
fn test_add_negligible_operand() {
    let i = Index::new("i", 2);
    let big = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap();
    let small = &big * 1e-60;
    let mut huge = big.clone();
    for _ in 0..4 {
        huge *= 1e60;
    }
    let before = huge.assign_to_vec();
    huge += &small;
    for (x, y) in huge.assign_to_vec().iter().zip(&before) {
        assert_relative_eq!(*x, *y, max_relative = 1e-12);
    }
}

#[test]
fn test_mismatched_indices() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 2);
    let k = Index::new("k", 2);
    let mut a = matrix(&i, &j, &[1.0; 4]);
    let b = matrix(&i, &k, &[1.0; 4]);
    let before = a.assign_to_vec();
    assert!(matches!(
        a.try_add_assign(&b),
        Err(TensorError::IndexMismatch { .. })
    ));
    assert!(matches!(
        a.try_sub_assign(&b),
        Err(TensorError::IndexMismatch { .. })
    ));
    assert_eq!(a.assign_to_vec(), before);
}

#[test]
fn test_null_lhs_takes_rhs() {
    let i = Index::new("i", 2);
    let b = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap();

    let mut a = ITensor::null();
    a += &b;
    assert!(a.shares_storage_with(&b));
    assert_eq!(a.assign_to_vec(), vec![1.0, 2.0]);

    let mut s = ITensor::null();
    s -= &b;
    assert_eq!(s.assign_to_vec(), vec![-1.0, -2.0]);
}

#[test]
fn test_copy_on_write() {
    let i = Index::new("i", 2);
    let j = Index::new("j", 2);
    let y = matrix(&i, &j, &[1.0, 2.0, 3.0, 4.0]);
    let other = matrix(&j, &i, &[1.0, 1.0, 1.0, 1.0]);

    let mut x = y.clone();
    assert!(x.shares_storage_with(&y));
    x += &other;
    assert!(!x.shares_storage_with(&y));
    assert_eq!(y.assign_to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(x.assign_to_vec(), vec![2.0, 3.0, 4.0, 5.0]);

    let mut z = y.clone();
    z.set(&[i.at(0), j.at(1)], -1.0).unwrap();
    assert_relative_eq!(y.get(&[i.at(0), j.at(1)]).unwrap(), 3.0);

    let mut w = y.clone();
    w.apply_sign();
    assert!(w.shares_storage_with(&y));
    w.negate();
    w.apply_sign();
    assert!(!w.shares_storage_with(&y));
    assert_eq!(y.assign_to_vec(), vec![1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_self_addition_doubles_through_log_scale() {
    let i = Index::new("i", 2);
    let mut t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    let alias = t.clone();
    t += &alias;
    assert!(t.shares_storage_with(&alias));
    assert_relative_eq!(t.log_scale(), LN_2);
    assert_relative_eq!(t.get(&[i.at(1)]).unwrap(), 8.0, max_relative = 1e-12);
    assert_relative_eq!(alias.get(&[i.at(1)]).unwrap(), 4.0);
}

#[test]
fn test_self_subtraction_shifts_log_scale() {
    let i = Index::new("i", 2);
    let mut t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    let alias = t.clone();
    t -= &alias;
    assert_relative_eq!(t.log_scale(), -SELF_SUBTRACT_SHIFT);
    assert!(t.is_zero());
    // The stored values survive; scaling back up recovers them.
    assert_relative_eq!(t.lognorm(), 5f64.ln() - SELF_SUBTRACT_SHIFT, max_relative = 1e-12);
}

#[test]
fn test_equal_values_in_distinct_buffers_add_normally() {
    let i = Index::new("i", 2);
    let mut t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    let copy = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    t -= &copy;
    assert_eq!(t.log_scale(), 0.0);
    assert_eq!(t.assign_to_vec(), vec![0.0, 0.0]);
}

#[test]
fn test_scalar_law() {
    let i = Index::new("i", 3);
    let t = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, -2.0, 4.0]).unwrap();
    for f in [2.5, -0.125, 1e-30, -7e40] {
        assert_relative_eq!((&t * f).sumels(), f * t.sumels(), max_relative = 1e-12);
        assert_relative_eq!((f * &t).sumels(), f * t.sumels(), max_relative = 1e-12);
    }
}

#[test]
fn test_repeated_halving_stays_in_log_domain() {
    let i = Index::new("i", 2);
    let mut t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    let sum = t.sumels();
    for _ in 0..1000 {
        t *= 0.5;
    }
    assert!(!t.is_empty());
    assert_eq!(t.store().unwrap().as_slice(), &[3.0, 4.0]);
    assert_relative_eq!(t.log_scale(), 1000.0 * 0.5f64.ln(), max_relative = 1e-12);
    assert!(t.sumels() > 0.0);
    assert_relative_eq!(t.sumels(), sum * 0.5f64.powi(1000), max_relative = 1e-9);

    // Far beyond f64 range the log-norm still tracks the value.
    for _ in 0..2000 {
        t *= 0.5;
    }
    assert_eq!(t.sumels(), 0.0);
    assert_relative_eq!(t.lognorm(), 5f64.ln() + 3000.0 * 0.5f64.ln(), max_relative = 1e-12);
}

#[test]
fn test_normalize() {
    let i = Index::new("i", 2);
    let mut t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap() * -1e200;
    t.normalize();
    assert_relative_eq!(t.norm(), 1.0, max_relative = 1e-12);
    assert_relative_eq!(t.get(&[i.at(0)]).unwrap(), -0.6, max_relative = 1e-12);
}

#[test]
fn test_tiny_factors_scale_exactly() {
    let i = Index::new("i", 2);
    let t = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
    for f in [1e-120, 1e-300, -1e-300] {
        let scaled = &t * f;
        assert_relative_eq!(scaled.sumels(), 7.0 * f, max_relative = 1e-12);
        assert_relative_eq!(scaled.lognorm(), 5f64.ln() + f.abs().ln(), max_relative = 1e-12);
    }
    let zero = &t * 0.0;
    assert!(zero.is_zero());
}
