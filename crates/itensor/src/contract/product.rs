//! Non-contracting product.
//!
//! Indices shared by both operands are not summed: they are multiplied
//! element-wise along the shared axes. Indices unique to either side combine
//! as in an outer product. The result axes are A's indices in order followed
//! by B's unshared indices.

use smallvec::SmallVec;

use crate::config::MAX_RANK;
use crate::counter::{Counter, compute_strides};
use crate::error::TensorError;
use crate::index::Index;
use crate::index_set::NontrivialIndices;
use crate::storage::Dense;

/// Axis mapping for a non-contracting product.
#[derive(Debug, Clone)]
pub struct ProductLayout {
    /// For each axis of B, the result axis it reads its digit from.
    pub b_axes: SmallVec<[usize; MAX_RANK]>,
    /// Nontrivial indices of the result.
    pub result: NontrivialIndices,
}

impl ProductLayout {
    /// # Errors
    ///
    /// Returns `RankOverflow` if the result has more than [`MAX_RANK`] axes.
    ///
    /// # Panics
    ///
    /// Panics if two equal indices disagree on dimension.
    pub fn compute(a: &[Index], b: &[Index]) -> Result<Self, TensorError> {
        let mut result: NontrivialIndices = a.iter().cloned().collect();
        let mut b_axes = SmallVec::with_capacity(b.len());
        for ib in b {
            match a.iter().position(|ia| ia == ib) {
                Some(pos) => {
                    assert_eq!(
                        a[pos].dim(),
                        ib.dim(),
                        "index {ib} has dimension {} on one operand and {} on the other",
                        a[pos].dim(),
                        ib.dim()
                    );
                    b_axes.push(pos);
                }
                None => {
                    b_axes.push(result.len());
                    result.push(ib.clone());
                }
            }
        }
        if result.len() > MAX_RANK {
            return Err(TensorError::RankOverflow {
                rank: result.len(),
                max: MAX_RANK,
            });
        }
        Ok(Self { b_axes, result })
    }
}

/// Multiply two buffers without contracting shared axes.
pub(crate) fn product_dense(
    a: &[f64],
    a_idx: &[Index],
    b: &[f64],
    b_idx: &[Index],
    layout: &ProductLayout,
) -> Dense {
    let dims: SmallVec<[usize; MAX_RANK]> = layout.result.iter().map(Index::dim).collect();
    let a_strides = compute_strides(&dims[..a_idx.len()]);
    let b_dims: SmallVec<[usize; MAX_RANK]> = b_idx.iter().map(Index::dim).collect();
    let b_strides = compute_strides(&b_dims);

    let mut out = Vec::with_capacity(dims.iter().product());
    let mut counter = Counter::new(&dims);
    while !counter.is_done() {
        let digits = counter.digits();
        let a_off: usize = digits[..a_idx.len()]
            .iter()
            .zip(&a_strides)
            .map(|(&d, &s)| d * s)
            .sum();
        let b_off: usize = layout
            .b_axes
            .iter()
            .zip(&b_strides)
            .map(|(&axis, &s)| digits[axis] * s)
            .sum();
        out.push(a[a_off] * b[b_off]);
        counter.advance();
    }
    Dense::from_vec(out)
}
