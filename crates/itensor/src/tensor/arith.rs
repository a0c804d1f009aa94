//! Tensor arithmetic: contraction, non-contracting product, addition.

use std::f64::consts::LN_2;

use crate::backend::{GenericBackend, PermutationBackend};
use crate::config::{RESCALE_CUTOFF, SELF_SUBTRACT_SHIFT};
use crate::contract::{ContractionProperties, ProductLayout, contract_dense, product_dense};
use crate::error::TensorError;
use crate::index::{Index, IndexVal, PrimeScope};
use crate::index_set::IndexSet;
use crate::permutation::Permutation;
use crate::storage::Dense;

use super::ITensor;

impl ITensor {
    /// Contract `self` with `other`, summing over every shared index.
    ///
    /// The result carries `self`'s free indices followed by `other`'s, in
    /// their original order. Trivial indices present on both sides are
    /// contracted; the others pass through. Log-scales add and signs
    /// multiply.
    ///
    /// # Errors
    ///
    /// Returns `RankOverflow` if the result would carry more than
    /// [`MAX_RANK`](crate::MAX_RANK) nontrivial indices.
    ///
    /// # Panics
    ///
    /// Panics if either operand is null.
    pub fn contract(&self, other: &ITensor) -> Result<ITensor, TensorError> {
        assert!(
            !self.is_null() && !other.is_null(),
            "cannot contract a null ITensor"
        );
        if other.rank() == 0 {
            return Ok(self.scaled_by_scalar(other));
        }
        if self.rank() == 0 {
            return Ok(other.scaled_by_scalar(self));
        }

        let a_idx = self.indices.nontrivial();
        let b_idx = other.indices.nontrivial();
        let props = ContractionProperties::compute(a_idx, b_idx)?;
        let store = contract_dense(self.stored(), a_idx, other.stored(), b_idx, &props);

        let trivial = symmetric_difference(self.indices.trivial(), other.indices.trivial());
        let indices = IndexSet::from_parts(props.result_indices(a_idx, b_idx), trivial)?;
        Ok(self.combine(other, store, indices))
    }

    /// Non-contracting product: shared indices are multiplied element-wise
    /// and kept; trivial index sets are unioned.
    ///
    /// # Errors
    ///
    /// Returns `RankOverflow` if the result would carry too many indices.
    pub fn product(&self, other: &ITensor) -> Result<ITensor, TensorError> {
        assert!(
            !self.is_null() && !other.is_null(),
            "cannot multiply a null ITensor"
        );
        let a_idx = self.indices.nontrivial();
        let b_idx = other.indices.nontrivial();
        let layout = ProductLayout::compute(a_idx, b_idx)?;
        let store = product_dense(self.stored(), a_idx, other.stored(), b_idx, &layout);

        let mut indices = IndexSet::from_parts(layout.result, self.indices.trivial().to_vec())?;
        indices.merge_trivial(other.indices.trivial())?;
        Ok(self.combine(other, store, indices))
    }

    /// Contract with the unit vector selected by `iv`, fixing that index.
    pub fn contract_index_val(&self, iv: &IndexVal) -> Result<ITensor, TensorError> {
        self.contract(&ITensor::from_index_val(iv)?)
    }

    /// Result with combined scale and sign.
    fn combine(&self, other: &ITensor, store: Dense, indices: IndexSet) -> ITensor {
        ITensor {
            store: Some(store),
            indices,
            log_scale: self.log_scale + other.log_scale,
            negative: self.negative ^ other.negative,
        }
    }

    /// `self` multiplied by the value of a rank-0 tensor, sharing `self`'s buffer.
    fn scaled_by_scalar(&self, scalar: &ITensor) -> ITensor {
        let v = scalar.stored()[0];
        if v == 0.0 {
            return self.with_store(Dense::zeros(self.len()));
        }
        let mut res = self.clone();
        res.log_scale += scalar.log_scale + v.abs().ln();
        res.negative ^= scalar.negative ^ (v < 0.0);
        res
    }

    /// `self += other`.
    ///
    /// A null `self` becomes a copy of `other`. The operands must carry the
    /// same index set in any order; the right-hand buffer is permuted into
    /// `self`'s order while accumulating.
    ///
    /// # Errors
    ///
    /// Returns `IndexMismatch` if the index sets differ.
    pub fn try_add_assign(&mut self, other: &ITensor) -> Result<(), TensorError> {
        assert!(!other.is_null(), "cannot add a null ITensor");
        if self.is_null() {
            *self = other.clone();
            return Ok(());
        }
        if self.is_alias_of(other) {
            self.log_scale += LN_2;
            return Ok(());
        }
        self.accumulate(other, false)
    }

    /// `self -= other`.
    ///
    /// Subtracting a tensor that aliases `self` (same buffer, index order and
    /// scale) lowers the log-scale by `SELF_SUBTRACT_SHIFT` instead of
    /// writing zeros.
    pub fn try_sub_assign(&mut self, other: &ITensor) -> Result<(), TensorError> {
        assert!(!other.is_null(), "cannot subtract a null ITensor");
        if self.is_null() {
            *self = other.clone();
            self.negate();
            return Ok(());
        }
        if self.is_alias_of(other) {
            self.log_scale -= SELF_SUBTRACT_SHIFT;
            return Ok(());
        }
        self.accumulate(other, true)
    }

    fn accumulate(&mut self, other: &ITensor, subtract: bool) -> Result<(), TensorError> {
        if !self.indices.same_set(&other.indices) {
            return Err(TensorError::IndexMismatch {
                lhs: self.indices.to_string(),
                rhs: other.indices.to_string(),
            });
        }
        let perm = Permutation::from_orders(other.indices.nontrivial(), self.indices.nontrivial())?;

        let target = self.log_scale.max(other.log_scale);
        self.normlog_to(target);
        let gap = other.log_scale - target;
        if gap < -RESCALE_CUTOFF {
            return Ok(());
        }
        // Stored values of `self` keep its deferred sign.
        let flip = self.negative ^ other.negative ^ subtract;
        let factor = if flip { -gap.exp() } else { gap.exp() };

        let src_dims = other.indices.dims();
        GenericBackend::permute_add_into(self.solo(), other.stored(), &src_dims, &perm, factor);
        Ok(())
    }
}

/// Indices present in exactly one of the two lists.
fn symmetric_difference(a: &[Index], b: &[Index]) -> Vec<Index> {
    a.iter()
        .filter(|i| !b.contains(i))
        .chain(b.iter().filter(|i| !a.contains(i)))
        .cloned()
        .collect()
}

/// Full contraction of two real tensors, or of one complex and one real
/// tensor (returning the real part).
///
/// # Errors
///
/// Returns `RankMismatch` if the contraction does not reduce to a scalar
/// (or, for a complex operand, to the ReIm index alone).
pub fn dot(x: &ITensor, y: &ITensor) -> Result<f64, TensorError> {
    dot_complex(x, y).map(|(re, _)| re)
}

/// Like [`dot`], returning `(re, im)`. The complex operand on the left is
/// conjugated.
pub fn dot_complex(x: &ITensor, y: &ITensor) -> Result<(f64, f64), TensorError> {
    if x.is_complex() || y.is_complex() {
        let res = if x.is_complex() {
            x.conj()?.contract(y)?
        } else {
            x.contract(y)?
        };
        if res.rank_n() != 1 || !res.is_complex() {
            return Err(TensorError::RankMismatch {
                expected: 1,
                actual: res.rank_n(),
            });
        }
        let re_im = Index::re_im();
        return Ok((res.get(&[re_im.at(0)])?, res.get(&[re_im.at(1)])?));
    }
    if x.rank_n() != y.rank_n() {
        return Err(TensorError::RankMismatch {
            expected: x.rank_n(),
            actual: y.rank_n(),
        });
    }
    let res = x.contract(y)?;
    Ok((res.to_scalar()?, 0.0))
}

/// Product of two site operators `a * b`, each carrying site indices at
/// prime levels 0 (input) and 1 (output).
///
/// `a` is applied after `b`; the result again has levels 0 and 1.
pub fn mult_site_ops(a: &ITensor, b: &ITensor) -> Result<ITensor, TensorError> {
    let mut a = a.clone();
    a.map_prime(1, 2, PrimeScope::Site)?;
    a.map_prime(0, 1, PrimeScope::Site)?;
    let mut res = a.contract(b)?;
    res.map_prime(2, 1, PrimeScope::Site)?;
    Ok(res)
}
