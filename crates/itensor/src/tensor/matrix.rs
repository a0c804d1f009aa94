//! Conversion between tensors and faer matrices.
//!
//! Row indices form the fast (leading) part of the column-major layout and
//! column indices the slow part, so a tensor permuted to `rows ++ cols`
//! already is the matrix in memory.

use faer::{Mat, MatRef};

use crate::backend::{AsFaerMat, dense_from_faer_mat};
use crate::error::TensorError;
use crate::index::Index;
use crate::index_set::{IndexSet, NontrivialIndices};

use super::ITensor;

impl ITensor {
    /// Matrix with `rows` combined into the row dimension and `cols` into
    /// the column dimension. The sign and log-scale are applied.
    ///
    /// Trivial indices may appear in either list and are ignored.
    ///
    /// # Errors
    ///
    /// Returns `IndexMismatch` unless the nontrivial indices of `rows` and
    /// `cols` together are exactly those of the tensor.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    ///
    /// let i = Index::new("i", 2);
    /// let j = Index::new("j", 3);
    /// let t = ITensor::from_vec(&[i.clone(), j.clone()], (0..6).map(f64::from).collect()).unwrap();
    ///
    /// let m = t.to_matrix(&[j.clone()], &[i.clone()]).unwrap();
    /// assert_eq!((m.nrows(), m.ncols()), (3, 2));
    /// assert_eq!(m[(2, 1)], 5.0);
    /// ```
    pub fn to_matrix(&self, rows: &[Index], cols: &[Index]) -> Result<Mat<f64>, TensorError> {
        let order: NontrivialIndices = rows
            .iter()
            .chain(cols)
            .filter(|i| !i.is_trivial())
            .cloned()
            .collect();
        let mut t = self.clone();
        t.permute_to(&order)?;

        let nrows = nontrivial_size(rows);
        let ncols = nontrivial_size(cols);
        let f = t.scale_factor();
        let view = t.stored().as_faer_mat(nrows, ncols);
        Ok(Mat::from_fn(nrows, ncols, |r, c| view[(r, c)] * f))
    }

    /// Tensor over `rows ++ cols` holding the entries of `mat`.
    ///
    /// # Errors
    ///
    /// Returns `SizeMismatch` if the matrix shape differs from the products
    /// of the row and column dimensions, or the usual index-list errors.
    pub fn from_matrix(
        rows: &[Index],
        cols: &[Index],
        mat: MatRef<'_, f64>,
    ) -> Result<ITensor, TensorError> {
        let nrows = nontrivial_size(rows);
        let ncols = nontrivial_size(cols);
        if mat.nrows() != nrows || mat.ncols() != ncols {
            return Err(TensorError::SizeMismatch {
                expected: nrows * ncols,
                actual: mat.nrows() * mat.ncols(),
            });
        }
        let all: Vec<Index> = rows.iter().chain(cols).cloned().collect();
        let set = IndexSet::from_indices(&all)?;
        Ok(ITensor::from_parts(dense_from_faer_mat(mat), set))
    }
}

fn nontrivial_size(indices: &[Index]) -> usize {
    indices.iter().map(Index::dim).product()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_matrix_groups_indices() {
        let i = Index::new("i", 2);
        let j = Index::new("j", 3);
        let k = Index::new("k", 2);
        let data: Vec<f64> = (0..12).map(f64::from).collect();
        let t = ITensor::from_vec(&[i.clone(), j.clone(), k.clone()], data).unwrap();

        let m = t.to_matrix(&[k.clone(), i.clone()], &[j.clone()]).unwrap();
        assert_eq!((m.nrows(), m.ncols()), (4, 3));
        for a in 0..2 {
            for b in 0..3 {
                for c in 0..2 {
                    let v = t.get(&[i.at(a), j.at(b), k.at(c)]).unwrap();
                    assert_relative_eq!(m[(c + 2 * a, b)], v);
                }
            }
        }
    }

    #[test]
    fn test_to_matrix_applies_scale() {
        let i = Index::new("i", 2);
        let j = Index::new("j", 2);
        let t = ITensor::from_vec(&[i.clone(), j.clone()], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let m = t.to_matrix(&[i.clone()], &[j.clone()]).unwrap();
        let neg = (&t * -2.0).to_matrix(&[i.clone()], &[j.clone()]).unwrap();
        assert_relative_eq!(neg[(1, 1)], -2.0 * m[(1, 1)], epsilon = 1e-12);
    }

    #[test]
    fn test_to_matrix_rejects_wrong_indices() {
        let i = Index::new("i", 2);
        let j = Index::new("j", 2);
        let t = ITensor::zeros(&[i.clone(), j.clone()]).unwrap();
        assert!(matches!(
            t.to_matrix(&[i.clone()], &[]),
            Err(TensorError::IndexMismatch { .. })
        ));
    }

    #[test]
    fn test_from_matrix_roundtrip() {
        let i = Index::new("i", 2);
        let j = Index::new("j", 3);
        let u = Index::new("u", 1);
        let m = Mat::from_fn(2, 3, |r, c| (r * 10 + c) as f64);
        let t = ITensor::from_matrix(&[i.clone(), u.clone()], &[j.clone()], m.as_ref()).unwrap();
        assert!(t.has_index(&u));
        assert_relative_eq!(t.get(&[i.at(1), j.at(2)]).unwrap(), 12.0);
        let back = t.to_matrix(&[i.clone()], &[j.clone()]).unwrap();
        assert_eq!(back, m);

        let bad = Mat::<f64>::zeros(3, 3);
        assert!(matches!(
            ITensor::from_matrix(&[i], &[j], bad.as_ref()),
            Err(TensorError::SizeMismatch { .. })
        ));
    }
}
