//! GEMM-based buffer contraction using faer.

use std::borrow::Cow;

use faer::linalg::matmul::matmul;
use faer::{Accum, MatRef, Par};

use crate::backend::{AsFaerMat, GenericBackend, PermutationBackend};
use crate::contract::properties::{ContractionProperties, OperandLayout};
use crate::index::Index;
use crate::storage::Dense;

/// Contract two column-major buffers according to `props`.
///
/// `a` is laid out over `a_idx` and `b` over `b_idx`; the result is laid out
/// over `props.result_indices(a_idx, b_idx)`.
pub(crate) fn contract_dense(
    a: &[f64],
    a_idx: &[Index],
    b: &[f64],
    b_idx: &[Index],
    props: &ContractionProperties,
) -> Dense {
    let m = props.dleft;
    let k = props.dmid;
    let n = props.dright;

    let a_buf = arrange(a, a_idx, &props.layout_a);
    let b_buf = arrange(b, b_idx, &props.layout_b);
    let a_mat = matrix_view(&a_buf, &props.layout_a, m, k);
    let b_mat = matrix_view(&b_buf, &props.layout_b, k, n);

    let mut c = Dense::zeros(m * n);
    let mut c_mat = c.as_faer_mat_mut(m, n);

    // C = A * B, beta = Replace, alpha = 1
    matmul(c_mat.as_mut(), Accum::Replace, a_mat, b_mat, 1.0, Par::Seq);
    c
}

/// Buffer in the order required by `layout`, permuting only when needed.
fn arrange<'a>(data: &'a [f64], indices: &[Index], layout: &OperandLayout) -> Cow<'a, [f64]> {
    match layout {
        OperandLayout::Direct | OperandLayout::Transposed => Cow::Borrowed(data),
        OperandLayout::Permuted(perm) => {
            let dims: Vec<usize> = indices.iter().map(Index::dim).collect();
            let mut out = vec![0.0; data.len()];
            GenericBackend::permute_into(&mut out, data, &dims, perm);
            Cow::Owned(out)
        }
    }
}

fn matrix_view<'a>(
    data: &'a [f64],
    layout: &OperandLayout,
    rows: usize,
    cols: usize,
) -> MatRef<'a, f64> {
    match layout {
        OperandLayout::Transposed => data.as_faer_mat(cols, rows).transpose(),
        _ => data.as_faer_mat(rows, cols),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Reference contraction by explicit summation for 2-index operands.
    fn naive_matmul(a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Vec<f64> {
        let mut c = vec![0.0; m * n];
        for i in 0..m {
            for j in 0..n {
                for p in 0..k {
                    c[i + m * j] += a[i + m * p] * b[p + k * j];
                }
            }
        }
        c
    }

    #[test]
    fn test_gemm_matrix_multiply() {
        let (i, j, k) = (Index::new("i", 2), Index::new("j", 3), Index::new("k", 4));
        let a: Vec<f64> = (1..=6).map(f64::from).collect();
        let b: Vec<f64> = (1..=12).map(f64::from).collect();
        let a_idx = [i.clone(), j.clone()];
        let b_idx = [j.clone(), k.clone()];
        let props = ContractionProperties::compute(&a_idx, &b_idx).unwrap();

        let c = contract_dense(&a, &a_idx, &b, &b_idx, &props);
        let expected = naive_matmul(&a, &b, 2, 3, 4);
        for (x, y) in c.as_slice().iter().zip(&expected) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gemm_transposed_operands_match_direct() {
        let (i, j, k) = (Index::new("i", 2), Index::new("j", 3), Index::new("k", 4));
        let a: Vec<f64> = (1..=6).map(f64::from).collect();
        let b: Vec<f64> = (1..=12).map(f64::from).collect();

        // Transpose both buffers by hand and relabel.
        let a_t: Vec<f64> = (0..6).map(|o| a[(o / 3) + 2 * (o % 3)]).collect();
        let b_t: Vec<f64> = (0..12).map(|o| b[(o / 4) + 3 * (o % 4)]).collect();

        let direct = {
            let (ai, bi) = ([i.clone(), j.clone()], [j.clone(), k.clone()]);
            let props = ContractionProperties::compute(&ai, &bi).unwrap();
            contract_dense(&a, &ai, &b, &bi, &props)
        };
        let swapped = {
            let (ai, bi) = ([j.clone(), i.clone()], [k.clone(), j.clone()]);
            let props = ContractionProperties::compute(&ai, &bi).unwrap();
            assert_eq!(props.layout_a, OperandLayout::Transposed);
            contract_dense(&a_t, &ai, &b_t, &bi, &props)
        };
        for (x, y) in direct.as_slice().iter().zip(swapped.as_slice()) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_gemm_full_contraction() {
        let i = Index::new("i", 2);
        let idx = [i];
        let props = ContractionProperties::compute(&idx, &idx).unwrap();
        let c = contract_dense(&[3.0, 4.0], &idx, &[3.0, 4.0], &idx, &props);
        assert_eq!(c.len(), 1);
        assert_relative_eq!(c[0], 25.0);
    }
}
