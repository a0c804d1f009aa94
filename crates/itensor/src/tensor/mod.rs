//! The dense, index-labelled tensor value type.
//!
//! An [`ITensor`] binds an [`IndexSet`] to a possibly shared [`Dense`]
//! buffer. True element values are `sign * exp(log_scale) * stored`, so long
//! chains of products keep the stored magnitudes bounded while the scale is
//! carried in `log_scale`. Flipping the sign or multiplying by a scalar is
//! O(1) and never touches the buffer.
//!
//! Cloning an `ITensor` shares the buffer. Every path that writes to the
//! buffer goes through [`ITensor::solo`], which clones the buffer first if
//! another tensor still holds it.
//!
//! # Example
//!
//! ```
//! use itensor::{ITensor, Index};
//!
//! let i = Index::new("i", 2);
//! let j = Index::new("j", 2);
//! let t = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap();
//! let u = ITensor::from_vec(std::slice::from_ref(&j), vec![3.0, 4.0]).unwrap();
//!
//! let tu = &t * &u;
//! assert_eq!(tu.get(&[i.at(1), j.at(0)]).unwrap(), 6.0);
//! ```

mod arith;
mod display;
mod io;
mod matrix;
mod ops;

pub use arith::{dot, dot_complex, mult_site_ops};
pub use display::DataDisplay;

use crate::backend::{GenericBackend, PermutationBackend};
use crate::config::{LOG_FLOOR, RESCALE_CUTOFF, ZERO_NORM_THRESHOLD};
use crate::counter::{Counter, compute_strides};
use crate::error::TensorError;
use crate::index::{Index, IndexType, IndexVal, PrimeScope};
use crate::index_set::{IndexSet, NontrivialIndices};
use crate::permutation::Permutation;
use crate::storage::Dense;

/// Dense tensor with labelled indices, deferred sign and log-scale.
#[derive(Debug, Clone, Default)]
pub struct ITensor {
    store: Option<Dense>,
    indices: IndexSet,
    log_scale: f64,
    negative: bool,
}

impl ITensor {
    /// Tensor with no storage and no indices.
    pub fn null() -> Self {
        Self::default()
    }

    /// Rank-0 tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Self::from_parts(Dense::from_vec(vec![value]), IndexSet::new())
    }

    /// Zero tensor over `indices`.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIndex` or `RankOverflow` for an invalid index list.
    pub fn zeros(indices: &[Index]) -> Result<Self, TensorError> {
        let set = IndexSet::from_indices(indices)?;
        Ok(Self::from_parts(Dense::zeros(set.size()), set))
    }

    /// Tensor over `indices` with column-major `data` (first index fastest).
    ///
    /// Trivial indices do not count toward the expected length.
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if `data.len()` differs from the product of
    /// the index dimensions.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    ///
    /// let i = Index::new("i", 2);
    /// let j = Index::new("j", 3);
    /// let t = ITensor::from_vec(&[i.clone(), j.clone()], (1..=6).map(f64::from).collect()).unwrap();
    /// assert_eq!(t.get(&[i.at(1), j.at(0)]).unwrap(), 2.0);
    /// assert_eq!(t.get(&[j.at(1), i.at(0)]).unwrap(), 3.0);
    /// assert!(ITensor::from_vec(&[i], vec![1.0]).is_err());
    /// ```
    pub fn from_vec(indices: &[Index], data: Vec<f64>) -> Result<Self, TensorError> {
        let set = IndexSet::from_indices(indices)?;
        if data.len() != set.size() {
            return Err(TensorError::SizeMismatch {
                expected: set.size(),
                actual: data.len(),
            });
        }
        Ok(Self::from_parts(Dense::from_vec(data), set))
    }

    /// Two-index tensor with `value` on the diagonal.
    ///
    /// For unequal dimensions the diagonal runs to the smaller one.
    pub fn diagonal(row: &Index, col: &Index, value: f64) -> Result<Self, TensorError> {
        let mut t = Self::zeros(&[row.clone(), col.clone()])?;
        let step: usize = compute_strides(&t.indices.dims()).iter().sum();
        let step = step.max(1);
        let data = t.solo();
        for k in 0..row.dim().min(col.dim()) {
            data[k * step] = value;
        }
        Ok(t)
    }

    /// Unit vector over `iv.index` with a one at `iv.val`.
    pub fn from_index_val(iv: &IndexVal) -> Result<Self, TensorError> {
        Self::from_index_vals(std::slice::from_ref(iv))
    }

    /// Tensor over the given indices that is one at the given values and
    /// zero elsewhere.
    pub fn from_index_vals(vals: &[IndexVal]) -> Result<Self, TensorError> {
        let indices: Vec<Index> = vals.iter().map(|iv| iv.index.clone()).collect();
        let mut t = Self::zeros(&indices)?;
        t.set(vals, 1.0)?;
        Ok(t)
    }

    pub(crate) fn from_parts(store: Dense, indices: IndexSet) -> Self {
        debug_assert_eq!(store.len(), indices.size());
        Self {
            store: Some(store),
            indices,
            log_scale: 0.0,
            negative: false,
        }
    }

    /// Same indices, new buffer, scale reset.
    pub(crate) fn with_store(&self, store: Dense) -> Self {
        Self::from_parts(store, self.indices.clone())
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.store.is_none()
    }

    /// Total number of indices (nontrivial and trivial).
    #[inline]
    pub fn rank(&self) -> usize {
        self.indices.rank()
    }

    #[inline]
    pub fn rank_n(&self) -> usize {
        self.indices.rank_n()
    }

    #[inline]
    pub fn rank_1(&self) -> usize {
        self.indices.rank_1()
    }

    #[inline]
    pub fn indices(&self) -> &IndexSet {
        &self.indices
    }

    /// Dimension of an axis; axes past the nontrivial ones are trivial.
    ///
    /// # Panics
    ///
    /// Panics if `axis >= self.rank()`.
    pub fn dim(&self, axis: usize) -> usize {
        assert!(
            axis < self.rank(),
            "axis {axis} out of range for rank {}",
            self.rank()
        );
        self.indices.nontrivial().get(axis).map_or(1, Index::dim)
    }

    /// Number of stored elements.
    pub fn len(&self) -> usize {
        self.store.as_ref().map_or(0, Dense::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn log_scale(&self) -> f64 {
        self.log_scale
    }

    /// Deferred sign flag.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    #[inline]
    pub fn fingerprint(&self) -> f64 {
        self.indices.fingerprint()
    }

    /// Underlying storage, without the sign and log-scale applied.
    pub fn store(&self) -> Option<&Dense> {
        self.store.as_ref()
    }

    pub fn shares_storage_with(&self, other: &ITensor) -> bool {
        match (&self.store, &other.store) {
            (Some(a), Some(b)) => a.shares_storage_with(b),
            _ => false,
        }
    }

    pub(crate) fn dense(&self) -> &Dense {
        match &self.store {
            Some(d) => d,
            None => panic!("operation requires a non-null ITensor"),
        }
    }

    #[inline]
    pub(crate) fn stored(&self) -> &[f64] {
        self.dense().as_slice()
    }

    /// Factor relating stored to true values.
    #[inline]
    pub(crate) fn scale_factor(&self) -> f64 {
        let s = self.log_scale.exp();
        if self.negative { -s } else { s }
    }

    /// Same storage, same indices order, same scale: one logical value.
    pub(crate) fn is_alias_of(&self, other: &ITensor) -> bool {
        self.shares_storage_with(other)
            && self.indices.nontrivial() == other.indices.nontrivial()
            && self.indices.same_set(&other.indices)
            && self.log_scale == other.log_scale
            && self.negative == other.negative
    }

    /// Exclusive mutable access to the buffer (copy-on-write gate).
    ///
    /// # Panics
    ///
    /// Panics on a null tensor.
    pub fn solo(&mut self) -> &mut [f64] {
        match &mut self.store {
            Some(d) => d.make_mut(),
            None => panic!("cannot write to a null ITensor"),
        }
    }

    // Index queries ----------------------------------------------------

    pub fn has_index(&self, index: &Index) -> bool {
        self.indices.has(index)
    }

    pub fn has_common_index(&self, other: &ITensor) -> bool {
        self.indices.has_common(&other.indices)
    }

    /// First index of `self` that `other` does not carry.
    pub fn not_in(&self, other: &ITensor) -> Option<&Index> {
        self.indices.not_in(&other.indices)
    }

    pub fn find_type(&self, kind: IndexType) -> Option<&Index> {
        self.indices.find_type(kind)
    }

    // Prime levels -----------------------------------------------------

    pub fn prime(&mut self, scope: PrimeScope) {
        self.indices.prime(scope, 1);
    }

    pub fn prime_by(&mut self, scope: PrimeScope, inc: u32) {
        self.indices.prime(scope, inc);
    }

    pub fn noprime(&mut self, scope: PrimeScope) -> Result<(), TensorError> {
        self.indices.noprime(scope)
    }

    pub fn map_prime(&mut self, old: u32, new: u32, scope: PrimeScope) -> Result<(), TensorError> {
        self.indices.map_prime(old, new, scope)
    }

    pub fn prime_index(&mut self, index: &Index, inc: u32) -> Result<(), TensorError> {
        self.indices.prime_index(index, inc)
    }

    pub fn noprime_index(&mut self, index: &Index) -> Result<(), TensorError> {
        self.indices.noprime_index(index)
    }

    pub fn map_prime_index(&mut self, index: &Index, new: u32) -> Result<(), TensorError> {
        self.indices.map_prime_index(index, new)
    }

    /// Replace index `old` by `new` (same dimension) without moving data.
    pub fn map_index(&mut self, old: &Index, new: &Index) -> Result<(), TensorError> {
        self.indices.map_index(old, new)
    }

    /// Copy with all link and site indices primed once.
    pub fn primed(&self) -> ITensor {
        let mut t = self.clone();
        t.prime(PrimeScope::Both);
        t
    }

    /// Copy with all prime levels reset.
    pub fn deprimed(&self) -> Result<ITensor, TensorError> {
        let mut t = self.clone();
        t.noprime(PrimeScope::Both)?;
        Ok(t)
    }

    // Scale control ----------------------------------------------------

    /// Fold the deferred sign into the buffer.
    pub fn apply_sign(&mut self) {
        if !self.negative {
            return;
        }
        for v in self.solo().iter_mut() {
            *v = -*v;
        }
        self.negative = false;
    }

    /// Rescale the buffer so that `log_scale` becomes `target`.
    ///
    /// If the buffer would shrink by more than `RESCALE_CUTOFF` e-folds it
    /// is set to zero instead.
    pub fn normlog_to(&mut self, target: f64) {
        let delta = target - self.log_scale;
        if delta != 0.0 {
            let data = self.solo();
            if delta > RESCALE_CUTOFF {
                data.fill(0.0);
            } else {
                let f = (-delta).exp();
                for v in data.iter_mut() {
                    *v *= f;
                }
            }
        }
        self.log_scale = target;
    }

    /// Move the buffer norm into `log_scale`, leaving a unit-norm buffer.
    pub fn normalize_log(&mut self) {
        let f = stored_norm(self.stored());
        if f != 0.0 {
            let inv = 1.0 / f;
            for v in self.solo().iter_mut() {
                *v *= inv;
            }
            self.log_scale += f.ln();
        }
    }

    /// Natural log of the norm, finite even for a zero tensor.
    pub fn lognorm(&self) -> f64 {
        (stored_norm(self.stored()) + LOG_FLOOR).ln() + self.log_scale
    }

    pub fn norm(&self) -> f64 {
        stored_norm(self.stored()) * self.log_scale.exp()
    }

    /// Sum of all elements.
    pub fn sumels(&self) -> f64 {
        self.stored().iter().sum::<f64>() * self.scale_factor()
    }

    pub fn is_zero(&self) -> bool {
        self.norm() < ZERO_NORM_THRESHOLD
    }

    /// Scale to unit norm.
    pub fn normalize(&mut self) {
        let n = self.norm();
        *self *= 1.0 / n;
    }

    /// Multiply by a real scalar without touching the buffer.
    pub fn scale_by(&mut self, fac: f64) {
        self.negative ^= fac < 0.0;
        self.log_scale += if fac == 0.0 {
            LOG_FLOOR.ln()
        } else {
            fac.abs().ln()
        };
    }

    /// Flip the deferred sign.
    pub fn negate(&mut self) {
        self.negative = !self.negative;
    }

    /// Drop sign and log-scale without touching the buffer.
    pub(crate) fn reset_scale(&mut self) {
        self.log_scale = 0.0;
        self.negative = false;
    }

    /// Bring the tensor to `sign = +`, `log_scale = 0` so that stored
    /// values are true values.
    fn materialize(&mut self) {
        self.apply_sign();
        self.normlog_to(0.0);
    }

    // Element access ---------------------------------------------------

    /// Buffer offset addressed by `vals`.
    ///
    /// Every nontrivial index must be given exactly once; values for trivial
    /// indices are accepted and must be zero.
    fn offset_of(&self, vals: &[IndexVal]) -> Result<usize, TensorError> {
        let nontrivial = self.indices.nontrivial();
        let strides = compute_strides(&self.indices.dims());
        let mut offset = 0;
        let mut matched = 0;
        for iv in vals {
            if !self.indices.has(&iv.index) {
                return Err(TensorError::IndexNotFound {
                    index: iv.index.to_string(),
                });
            }
            iv.check_bounds()?;
            if let Some(axis) = nontrivial.iter().position(|n| *n == iv.index) {
                offset += iv.val * strides[axis];
                matched += 1;
            }
        }
        if matched != nontrivial.len() || !self.covers_each_axis_once(vals) {
            return Err(TensorError::IncompleteIndexing {
                expected: nontrivial.len(),
                actual: matched,
            });
        }
        Ok(offset)
    }

    fn covers_each_axis_once(&self, vals: &[IndexVal]) -> bool {
        self.indices
            .nontrivial()
            .iter()
            .all(|n| vals.iter().filter(|iv| iv.index == *n).count() == 1)
    }

    /// Element value addressed by `vals`.
    ///
    /// # Errors
    ///
    /// `IncompleteIndexing` unless every nontrivial index is given exactly
    /// once; `IndexNotFound` for an index the tensor lacks;
    /// `IndexOutOfBounds` for a value outside its index range.
    pub fn get(&self, vals: &[IndexVal]) -> Result<f64, TensorError> {
        let offset = self.offset_of(vals)?;
        Ok(self.stored()[offset] * self.scale_factor())
    }

    /// Set the element addressed by `vals`.
    pub fn set(&mut self, vals: &[IndexVal], value: f64) -> Result<(), TensorError> {
        *self.get_mut(vals)? = value;
        Ok(())
    }

    /// Mutable reference to an element.
    ///
    /// The deferred sign and scale are folded into the buffer first, so the
    /// reference sees the true value.
    pub fn get_mut(&mut self, vals: &[IndexVal]) -> Result<&mut f64, TensorError> {
        let offset = self.offset_of(vals)?;
        self.materialize();
        Ok(&mut self.solo()[offset])
    }

    /// Value of a tensor with no nontrivial indices.
    pub fn to_scalar(&self) -> Result<f64, TensorError> {
        if self.rank_n() != 0 {
            return Err(TensorError::RankMismatch {
                expected: 0,
                actual: self.rank_n(),
            });
        }
        Ok(self.stored()[0] * self.scale_factor())
    }

    // Vector views and reordering --------------------------------------

    /// True element values in buffer order.
    pub fn assign_to_vec(&self) -> Vec<f64> {
        let f = self.scale_factor();
        self.stored().iter().map(|v| v * f).collect()
    }

    /// Replace all elements; resets sign and log-scale.
    pub fn assign_from_vec(&mut self, data: &[f64]) -> Result<(), TensorError> {
        let expected = self.indices.size();
        if data.len() != expected {
            return Err(TensorError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        self.store = Some(Dense::from_vec(data.to_vec()));
        self.log_scale = 0.0;
        self.negative = false;
        Ok(())
    }

    /// Copy the values of `other` into `self` keeping `self`'s index order.
    pub fn assign(&mut self, other: &ITensor) -> Result<(), TensorError> {
        if !self.indices.same_set(&other.indices) {
            return Err(TensorError::IndexMismatch {
                lhs: self.indices.to_string(),
                rhs: other.indices.to_string(),
            });
        }
        let order: NontrivialIndices = self.indices.nontrivial().iter().cloned().collect();
        let mut copy = other.clone();
        copy.permute_to(&order)?;
        self.store = copy.store;
        self.log_scale = copy.log_scale;
        self.negative = copy.negative;
        Ok(())
    }

    /// Reorder the nontrivial axes to `order`, moving data as needed.
    ///
    /// # Errors
    ///
    /// Returns `IndexMismatch` if `order` is not a reordering of the
    /// tensor's nontrivial indices.
    pub fn permute_to(&mut self, order: &[Index]) -> Result<(), TensorError> {
        let perm = Permutation::from_orders(self.indices.nontrivial(), order)?;
        if perm.is_identity() {
            return Ok(());
        }
        let dims = self.indices.dims();
        let mut out = vec![0.0; self.len()];
        GenericBackend::permute_into(&mut out, self.stored(), &dims, &perm);
        self.store = Some(Dense::from_vec(out));
        self.indices.reorder(order.iter().cloned().collect());
        Ok(())
    }

    /// Walk every element and check the storage and index invariants.
    pub fn check_dims(&self) -> Result<(), TensorError> {
        if let Some(t) = self.indices.trivial().iter().find(|t| !t.is_trivial()) {
            return Err(TensorError::NotTrivialIndex {
                index: t.to_string(),
            });
        }
        let mut counter = Counter::new(&self.indices.dims());
        let mut visited = 0;
        while !counter.is_done() {
            visited = counter.offset() + 1;
            counter.advance();
        }
        if visited != self.len() {
            return Err(TensorError::SizeMismatch {
                expected: visited,
                actual: self.len(),
            });
        }
        Ok(())
    }
}

pub(crate) fn stored_norm(data: &[f64]) -> f64 {
    data.iter().map(|v| v * v).sum::<f64>().sqrt()
}
