//! Index set of a tensor.
//!
//! An [`IndexSet`] keeps two containers: a bounded ordered sequence of
//! nontrivial indices (dimension > 1) that determines the buffer layout, and
//! an order-irrelevant set of trivial indices (dimension 1) that carry no
//! numeric footprint. A summed fingerprint over both is kept in sync with
//! every mutation.
//!
//! Mutations build the new index lists first and validate them before they
//! replace the current state, so a failed call leaves the set untouched.

use std::fmt;

use smallvec::SmallVec;

use crate::config::MAX_RANK;
use crate::error::TensorError;
use crate::index::{Index, IndexType, PrimeScope};

/// Inline storage for nontrivial indices.
pub type NontrivialIndices = SmallVec<[Index; MAX_RANK]>;

/// Inline storage for a dimension vector.
pub type Dims = SmallVec<[usize; MAX_RANK]>;

/// Location of an index inside an [`IndexSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Position in the nontrivial sequence (buffer axis).
    Nontrivial(usize),
    /// Position in the trivial set.
    Trivial(usize),
}

/// Nontrivial index sequence plus trivial index set.
#[derive(Debug, Clone, Default)]
pub struct IndexSet {
    nontrivial: NontrivialIndices,
    trivial: Vec<Index>,
    fingerprint: f64,
}

impl IndexSet {
    /// Empty index set (a scalar).
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `indices` into nontrivial and trivial parts.
    ///
    /// The relative order of nontrivial indices is kept; it becomes the
    /// buffer axis order.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIndex` if an index appears twice, `RankOverflow` if
    /// more than [`MAX_RANK`] indices have dimension > 1.
    pub fn from_indices(indices: &[Index]) -> Result<Self, TensorError> {
        let mut nontrivial = NontrivialIndices::new();
        let mut trivial = Vec::new();
        for index in indices {
            if index.is_trivial() {
                trivial.push(index.clone());
            } else {
                nontrivial.push(index.clone());
            }
        }
        Self::from_parts(nontrivial, trivial)
    }

    /// Build from already separated parts, validating every invariant.
    pub(crate) fn from_parts(
        nontrivial: NontrivialIndices,
        trivial: Vec<Index>,
    ) -> Result<Self, TensorError> {
        check_parts(&nontrivial, &trivial)?;
        let mut set = Self {
            nontrivial,
            trivial,
            fingerprint: 0.0,
        };
        set.refresh_fingerprint();
        Ok(set)
    }

    /// Set holding one index.
    pub(crate) fn single(index: Index) -> Self {
        let mut set = Self::new();
        if index.is_trivial() {
            set.trivial.push(index);
        } else {
            set.nontrivial.push(index);
        }
        set.refresh_fingerprint();
        set
    }

    fn refresh_fingerprint(&mut self) {
        self.fingerprint = self
            .nontrivial
            .iter()
            .chain(self.trivial.iter())
            .map(Index::fingerprint)
            .sum();
    }

    /// Validate and commit new contents.
    fn commit(
        &mut self,
        nontrivial: NontrivialIndices,
        trivial: Vec<Index>,
    ) -> Result<(), TensorError> {
        *self = Self::from_parts(nontrivial, trivial)?;
        Ok(())
    }

    /// Total number of indices.
    #[inline]
    pub fn rank(&self) -> usize {
        self.nontrivial.len() + self.trivial.len()
    }

    /// Number of nontrivial indices.
    #[inline]
    pub fn rank_n(&self) -> usize {
        self.nontrivial.len()
    }

    /// Number of trivial indices.
    #[inline]
    pub fn rank_1(&self) -> usize {
        self.trivial.len()
    }

    #[inline]
    pub fn nontrivial(&self) -> &[Index] {
        &self.nontrivial
    }

    #[inline]
    pub fn trivial(&self) -> &[Index] {
        &self.trivial
    }

    #[inline]
    pub fn fingerprint(&self) -> f64 {
        self.fingerprint
    }

    /// All indices, nontrivial first.
    pub fn iter(&self) -> impl Iterator<Item = &Index> {
        self.nontrivial.iter().chain(self.trivial.iter())
    }

    /// Dimensions of the nontrivial indices in axis order.
    pub fn dims(&self) -> Dims {
        self.nontrivial.iter().map(Index::dim).collect()
    }

    /// Number of buffer elements implied by the nontrivial dimensions.
    pub fn size(&self) -> usize {
        self.nontrivial.iter().map(Index::dim).product()
    }

    /// Locate `index`.
    pub fn find(&self, index: &Index) -> Option<Slot> {
        if let Some(pos) = self.position(index) {
            return Some(Slot::Nontrivial(pos));
        }
        self.trivial
            .iter()
            .position(|t| t == index)
            .map(Slot::Trivial)
    }

    /// Axis position of a nontrivial index.
    pub fn position(&self, index: &Index) -> Option<usize> {
        self.nontrivial.iter().position(|n| n == index)
    }

    pub fn has(&self, index: &Index) -> bool {
        self.find(index).is_some()
    }

    /// First index with the given type, nontrivial indices first.
    pub fn find_type(&self, kind: IndexType) -> Option<&Index> {
        self.iter().find(|i| i.kind() == kind)
    }

    /// True when some index appears in both sets.
    pub fn has_common(&self, other: &IndexSet) -> bool {
        self.iter().any(|i| other.has(i))
    }

    /// First index of `self` not present in `other`.
    pub fn not_in(&self, other: &IndexSet) -> Option<&Index> {
        self.iter().find(|i| !other.has(i))
    }

    /// Set equality, independent of order.
    ///
    /// The fingerprint comparison rejects most unequal sets without a scan.
    pub fn same_set(&self, other: &IndexSet) -> bool {
        if self.rank_n() != other.rank_n() || self.rank_1() != other.rank_1() {
            return false;
        }
        let scale = self.fingerprint.abs().max(1.0);
        if (self.fingerprint - other.fingerprint).abs() > 1e-12 * scale {
            return false;
        }
        self.iter().all(|i| other.has(i))
    }

    /// Add a dimension-1 index. Adding one already present is a no-op.
    pub fn add_trivial(&mut self, index: Index) -> Result<(), TensorError> {
        if !index.is_trivial() {
            return Err(TensorError::NotTrivialIndex {
                index: index.to_string(),
            });
        }
        if self.trivial.contains(&index) {
            return Ok(());
        }
        self.fingerprint += index.fingerprint();
        self.trivial.push(index);
        Ok(())
    }

    /// Union with many trivial indices (sort + dedup).
    pub fn merge_trivial<'a, I>(&mut self, indices: I) -> Result<(), TensorError>
    where
        I: IntoIterator<Item = &'a Index>,
    {
        let mut trivial = self.trivial.clone();
        for index in indices {
            if !index.is_trivial() {
                return Err(TensorError::NotTrivialIndex {
                    index: index.to_string(),
                });
            }
            trivial.push(index.clone());
        }
        trivial.sort();
        trivial.dedup();
        let nontrivial = self.nontrivial.clone();
        self.commit(nontrivial, trivial)
    }

    pub fn remove_trivial(&mut self, index: &Index) -> Result<(), TensorError> {
        let pos = self
            .trivial
            .iter()
            .position(|t| t == index)
            .ok_or_else(|| TensorError::IndexNotFound {
                index: index.to_string(),
            })?;
        let removed = self.trivial.swap_remove(pos);
        self.fingerprint -= removed.fingerprint();
        Ok(())
    }

    /// Apply `f` to every index and validate the result.
    fn map_all<F>(&mut self, f: F) -> Result<(), TensorError>
    where
        F: Fn(&Index) -> Index,
    {
        let nontrivial = self.nontrivial.iter().map(&f).collect();
        let trivial = self.trivial.iter().map(&f).collect();
        self.commit(nontrivial, trivial)
    }

    /// Apply `f` to the one index equal to `target`.
    fn map_one<F>(&mut self, target: &Index, f: F) -> Result<(), TensorError>
    where
        F: FnOnce(&Index) -> Index,
    {
        let slot = self.find(target).ok_or_else(|| TensorError::IndexNotFound {
            index: target.to_string(),
        })?;
        let mut nontrivial = self.nontrivial.clone();
        let mut trivial = self.trivial.clone();
        match slot {
            Slot::Nontrivial(p) => nontrivial[p] = f(&nontrivial[p]),
            Slot::Trivial(p) => trivial[p] = f(&trivial[p]),
        }
        self.commit(nontrivial, trivial)
    }

    /// Raise prime levels of all indices in `scope` by `inc`.
    pub fn prime(&mut self, scope: PrimeScope, inc: u32) {
        for index in self.nontrivial.iter_mut().chain(self.trivial.iter_mut()) {
            *index = index.prime_scoped(scope, inc);
        }
        self.refresh_fingerprint();
    }

    /// Reset prime levels of all indices in `scope`.
    ///
    /// Fails with `DuplicateIndex` if two indices would collapse.
    pub fn noprime(&mut self, scope: PrimeScope) -> Result<(), TensorError> {
        self.map_all(|i| i.noprime_scoped(scope))
    }

    /// Move indices in `scope` at prime level `old` to level `new`.
    pub fn map_prime(&mut self, old: u32, new: u32, scope: PrimeScope) -> Result<(), TensorError> {
        self.map_all(|i| i.map_prime(old, new, scope))
    }

    /// Raise the prime level of one index.
    pub fn prime_index(&mut self, index: &Index, inc: u32) -> Result<(), TensorError> {
        self.map_one(index, |i| i.primed_by(inc))
    }

    /// Reset the prime level of one index.
    pub fn noprime_index(&mut self, index: &Index) -> Result<(), TensorError> {
        self.map_one(index, Index::deprimed)
    }

    /// Set the prime level of one index.
    pub fn map_prime_index(&mut self, index: &Index, new: u32) -> Result<(), TensorError> {
        self.map_one(index, |i| i.with_prime(new))
    }

    /// Replace `old` by `new` in place. Dimensions must agree.
    pub fn map_index(&mut self, old: &Index, new: &Index) -> Result<(), TensorError> {
        if old.dim() != new.dim() {
            return Err(TensorError::SizeMismatch {
                expected: old.dim(),
                actual: new.dim(),
            });
        }
        self.map_one(old, |_| new.clone())
    }

    /// Reorder the nontrivial sequence. `order` must hold the same indices.
    pub(crate) fn reorder(&mut self, order: NontrivialIndices) {
        debug_assert!(order.iter().all(|i| self.position(i).is_some()));
        debug_assert_eq!(order.len(), self.nontrivial.len());
        self.nontrivial = order;
    }
}

fn checked_size(nontrivial: &[Index]) -> Option<usize> {
    nontrivial
        .iter()
        .try_fold(1usize, |acc, index| acc.checked_mul(index.dim()))
}

fn check_parts(nontrivial: &[Index], trivial: &[Index]) -> Result<(), TensorError> {
    if nontrivial.len() > MAX_RANK {
        return Err(TensorError::RankOverflow {
            rank: nontrivial.len(),
            max: MAX_RANK,
        });
    }
    if let Some(t) = trivial.iter().find(|t| !t.is_trivial()) {
        return Err(TensorError::NotTrivialIndex {
            index: t.to_string(),
        });
    }
    debug_assert!(nontrivial.iter().all(|n| !n.is_trivial()));
    checked_size(nontrivial).ok_or_else(|| TensorError::SizeOverflow {
        dims: nontrivial.iter().map(Index::dim).collect(),
    })?;
    for (pos, index) in nontrivial.iter().enumerate() {
        if nontrivial[..pos].contains(index) {
            return Err(TensorError::DuplicateIndex {
                index: index.to_string(),
            });
        }
    }
    for (pos, index) in trivial.iter().enumerate() {
        if trivial[..pos].contains(index) {
            return Err(TensorError::DuplicateIndex {
                index: index.to_string(),
            });
        }
    }
    Ok(())
}

impl PartialEq for IndexSet {
    fn eq(&self, other: &Self) -> bool {
        self.same_set(other)
    }
}

impl fmt::Display for IndexSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (n, index) in self.iter().enumerate() {
            if n > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{index}")?;
        }
        f.write_str("]")
    }
}
