//! Odometer iteration over a dimension vector.
//!
//! Uses column-major (first index fastest) order, matching faer's default
//! matrix layout, so that the `k`-th state of a fresh [`Counter`] addresses
//! buffer offset `k`.

use smallvec::SmallVec;

use crate::config::MAX_RANK;

/// Compute column-major strides from dimensions.
///
/// ```
/// use itensor::counter::compute_strides;
///
/// assert_eq!(compute_strides(&[3, 4, 5]).as_slice(), &[1, 3, 12]);
/// assert!(compute_strides(&[]).is_empty());
/// ```
pub fn compute_strides(dims: &[usize]) -> SmallVec<[usize; MAX_RANK]> {
    let mut strides = SmallVec::with_capacity(dims.len());
    let mut stride = 1;
    for &d in dims {
        strides.push(stride);
        stride *= d;
    }
    strides
}

/// Linear offset of a multi-index under the given strides.
#[inline]
pub fn offset_of(digits: &[usize], strides: &[usize]) -> usize {
    digits.iter().zip(strides).map(|(&d, &s)| d * s).sum()
}

/// Multi-index iterator over `dims`.
///
/// A zero-length dimension vector has exactly one state (the scalar).
/// A counter is not restartable: build a fresh one per traversal.
///
/// # Example
///
/// ```
/// use itensor::Counter;
///
/// let mut c = Counter::new(&[2, 3]);
/// let mut seen = Vec::new();
/// while !c.is_done() {
///     seen.push((c.digits().to_vec(), c.offset()));
///     c.advance();
/// }
/// assert_eq!(seen.len(), 6);
/// assert_eq!(seen[1], (vec![1, 0], 1));
/// assert_eq!(seen[2], (vec![0, 1], 2));
/// ```
#[derive(Debug, Clone)]
pub struct Counter {
    dims: SmallVec<[usize; MAX_RANK]>,
    digits: SmallVec<[usize; MAX_RANK]>,
    offset: usize,
    done: bool,
}

impl Counter {
    pub fn new(dims: &[usize]) -> Self {
        Self {
            dims: SmallVec::from_slice(dims),
            digits: SmallVec::from_elem(0, dims.len()),
            offset: 0,
            done: dims.contains(&0),
        }
    }

    /// Current multi-index.
    #[inline]
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Linear column-major offset of the current multi-index.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Step to the next multi-index; sets `done` when the last digit overflows.
    pub fn advance(&mut self) {
        if self.done {
            return;
        }
        self.offset += 1;
        for (digit, &dim) in self.digits.iter_mut().zip(&self.dims) {
            *digit += 1;
            if *digit < dim {
                return;
            }
            *digit = 0;
        }
        self.done = true;
    }
}
