//! Contraction properties for GEMM.
//!
//! [`ContractionProperties`] matches the nontrivial indices of two operands
//! and decides how each operand's buffer is presented to the matrix
//! multiply:
//!
//! - A is viewed as `dleft x dmid` with axes `[free..., contracted...]`
//! - B is viewed as `dmid x dright` with axes `[contracted..., free...]`,
//!   contracted axes in the same relative order as in A
//!
//! An operand already in the required axis order is used as is. One whose
//! axis blocks are swapped is used through a transposed view. Only the
//! remaining cases materialize a permuted copy.

use crate::config::MAX_RANK;
use crate::error::TensorError;
use crate::index::Index;
use crate::index_set::NontrivialIndices;
use crate::permutation::Permutation;

/// How an operand buffer becomes a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperandLayout {
    /// Buffer is already in the required axis order.
    Direct,
    /// Buffer holds the two axis blocks swapped; view it transposed.
    Transposed,
    /// Buffer must be permuted (source map into the required order).
    Permuted(Permutation),
}

/// Properties computed for a contraction `C = A * B`.
///
/// - `dleft` = product of A's free dimensions
/// - `dmid` = product of contracted dimensions
/// - `dright` = product of B's free dimensions
///
/// The contraction becomes `C(dleft, dright) = A(dleft, dmid) * B(dmid, dright)`,
/// and the axes of C are A's free indices followed by B's free indices.
#[derive(Debug, Clone)]
pub struct ContractionProperties {
    /// Contracted axis pairs: (axis in A, axis in B), in A's axis order.
    pub contracted_pairs: Vec<(usize, usize)>,

    /// Axes of A that appear in the output.
    pub uncontracted_a: Vec<usize>,

    /// Axes of B that appear in the output.
    pub uncontracted_b: Vec<usize>,

    pub dleft: usize,
    pub dmid: usize,
    pub dright: usize,

    pub layout_a: OperandLayout,
    pub layout_b: OperandLayout,
}

impl ContractionProperties {
    /// Match the nontrivial indices of A and B.
    ///
    /// # Errors
    ///
    /// Returns `RankOverflow` if the result would have more than
    /// [`MAX_RANK`] nontrivial indices.
    ///
    /// # Panics
    ///
    /// Panics if two equal indices disagree on dimension.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::Index;
    /// use itensor::contract::ContractionProperties;
    ///
    /// let i = Index::new("i", 2);
    /// let j = Index::new("j", 3);
    /// let k = Index::new("k", 4);
    /// let props = ContractionProperties::compute(
    ///     &[i.clone(), j.clone()],
    ///     &[j.clone(), k.clone()],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(props.dleft, 2);
    /// assert_eq!(props.dmid, 3);
    /// assert_eq!(props.dright, 4);
    /// ```
    pub fn compute(a: &[Index], b: &[Index]) -> Result<Self, TensorError> {
        let mut contracted_pairs = Vec::new();
        for (i, ia) in a.iter().enumerate() {
            if let Some(j) = b.iter().position(|ib| ib == ia) {
                assert_eq!(
                    ia.dim(),
                    b[j].dim(),
                    "index {ia} has dimension {} on one operand and {} on the other",
                    ia.dim(),
                    b[j].dim()
                );
                contracted_pairs.push((i, j));
            }
        }

        let contracted_a: Vec<usize> = contracted_pairs.iter().map(|&(i, _)| i).collect();
        let contracted_b: Vec<usize> = contracted_pairs.iter().map(|&(_, j)| j).collect();
        let uncontracted_a: Vec<usize> =
            (0..a.len()).filter(|i| !contracted_a.contains(i)).collect();
        let uncontracted_b: Vec<usize> =
            (0..b.len()).filter(|j| !contracted_b.contains(j)).collect();

        let rank = uncontracted_a.len() + uncontracted_b.len();
        if rank > MAX_RANK {
            return Err(TensorError::RankOverflow {
                rank,
                max: MAX_RANK,
            });
        }

        let dleft: usize = uncontracted_a.iter().map(|&i| a[i].dim()).product();
        let dmid: usize = contracted_a.iter().map(|&i| a[i].dim()).product();
        let dright: usize = uncontracted_b.iter().map(|&j| b[j].dim()).product();

        let layout_a = choose_layout(&uncontracted_a, &contracted_a);
        let layout_b = choose_layout(&contracted_b, &uncontracted_b);

        Ok(Self {
            contracted_pairs,
            uncontracted_a,
            uncontracted_b,
            dleft,
            dmid,
            dright,
            layout_a,
            layout_b,
        })
    }

    /// Nontrivial indices of the result: A's free indices, then B's.
    pub fn result_indices(&self, a: &[Index], b: &[Index]) -> NontrivialIndices {
        self.uncontracted_a
            .iter()
            .map(|&i| a[i].clone())
            .chain(self.uncontracted_b.iter().map(|&j| b[j].clone()))
            .collect()
    }

    /// Check if this is an outer product (no contracted indices).
    pub fn is_outer_product(&self) -> bool {
        self.contracted_pairs.is_empty()
    }

    /// Check if this is a full contraction (scalar result).
    pub fn is_full_contraction(&self) -> bool {
        self.uncontracted_a.is_empty() && self.uncontracted_b.is_empty()
    }
}

/// Layout that presents axes `first ++ second` as rows x cols.
fn choose_layout(first: &[usize], second: &[usize]) -> OperandLayout {
    let wanted: Vec<usize> = first.iter().chain(second).copied().collect();
    if is_identity(&wanted) {
        return OperandLayout::Direct;
    }
    let swapped: Vec<usize> = second.iter().chain(first).copied().collect();
    if is_identity(&swapped) {
        return OperandLayout::Transposed;
    }
    OperandLayout::Permuted(Permutation::from_vec_unchecked(wanted))
}

fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}
