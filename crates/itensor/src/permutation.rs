//! Axis permutations.
//!
//! A [`Permutation`] is stored as a source map: `perm[k]` is the axis of the
//! original layout that lands at position `k` of the permuted layout. This is
//! the convention used by [`PermutationBackend`](crate::backend::PermutationBackend).

use crate::error::TensorError;

/// Bijection on `0..len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    perm: Vec<usize>,
}

impl Permutation {
    /// Create a permutation, validating that `perm` is a bijection.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::Permutation;
    ///
    /// let p = Permutation::new(vec![2, 0, 1]).unwrap();
    /// assert_eq!(p.apply(&['a', 'b', 'c']), vec!['c', 'a', 'b']);
    /// assert!(Permutation::new(vec![0, 0]).is_err());
    /// ```
    pub fn new(perm: Vec<usize>) -> Result<Self, TensorError> {
        validate_permutation(&perm)?;
        Ok(Self { perm })
    }

    /// Build from a source map known to be a bijection.
    pub(crate) fn from_vec_unchecked(perm: Vec<usize>) -> Self {
        debug_assert!(validate_permutation(&perm).is_ok());
        Self { perm }
    }

    pub fn identity(len: usize) -> Self {
        Self {
            perm: (0..len).collect(),
        }
    }

    /// Permutation that reorders `current` into `desired`.
    ///
    /// Both slices must hold the same elements; `IndexMismatch` otherwise.
    pub fn from_orders<T>(current: &[T], desired: &[T]) -> Result<Self, TensorError>
    where
        T: PartialEq + std::fmt::Debug,
    {
        let mismatch = || TensorError::IndexMismatch {
            lhs: format!("{current:?}"),
            rhs: format!("{desired:?}"),
        };
        if current.len() != desired.len() {
            return Err(mismatch());
        }
        let perm = desired
            .iter()
            .map(|d| current.iter().position(|c| c == d))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(mismatch)?;
        // Repeated elements in `desired` would map twice to one slot.
        Self::new(perm).map_err(|_| mismatch())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.perm.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.perm.is_empty()
    }

    /// Source axes, `perm[k]` lands at position `k`.
    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.perm
    }

    pub fn is_identity(&self) -> bool {
        self.perm.iter().enumerate().all(|(i, &p)| i == p)
    }

    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.perm.len()];
        for (k, &p) in self.perm.iter().enumerate() {
            inv[p] = k;
        }
        Self { perm: inv }
    }

    /// Permutation equivalent to applying `self` then `then`.
    pub fn compose(&self, then: &Permutation) -> Self {
        assert_eq!(self.len(), then.len(), "permutation lengths differ");
        Self {
            perm: then.perm.iter().map(|&k| self.perm[k]).collect(),
        }
    }

    /// Reorder a list: `out[k] = items[perm[k]]`.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        assert_eq!(items.len(), self.len(), "permutation length mismatch");
        self.perm.iter().map(|&p| items[p].clone()).collect()
    }
}

/// Validate that `perm` is a permutation of `0..perm.len()`.
pub fn validate_permutation(perm: &[usize]) -> Result<(), TensorError> {
    let mut seen = vec![false; perm.len()];
    for &p in perm {
        if p >= perm.len() || seen[p] {
            return Err(TensorError::InvalidPermutation {
                perm: perm.to_vec(),
            });
        }
        seen[p] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(validate_permutation(&[1, 0, 2]).is_ok());
        assert!(validate_permutation(&[]).is_ok());
        assert!(validate_permutation(&[0, 2]).is_err());
        assert!(validate_permutation(&[1, 1]).is_err());
    }

    #[test]
    fn test_from_orders() {
        let p = Permutation::from_orders(&["i", "j", "k"], &["k", "i", "j"]).unwrap();
        assert_eq!(p.as_slice(), &[2, 0, 1]);
        assert_eq!(p.apply(&["i", "j", "k"]), vec!["k", "i", "j"]);
        assert!(Permutation::from_orders(&["i", "j"], &["i", "x"]).is_err());
        assert!(Permutation::from_orders(&["i", "j"], &["i", "i"]).is_err());
    }

    #[test]
    fn test_inverse_and_compose() {
        let p = Permutation::new(vec![2, 0, 3, 1]).unwrap();
        let inv = p.inverse();
        assert!(p.compose(&inv).is_identity());
        assert!(inv.compose(&p).is_identity());

        let items = [10, 20, 30, 40];
        let q = Permutation::new(vec![1, 0, 3, 2]).unwrap();
        assert_eq!(p.compose(&q).apply(&items), q.apply(&p.apply(&items)));
    }
}
