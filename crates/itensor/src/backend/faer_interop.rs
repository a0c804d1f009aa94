//! Zero-copy views of dense storage as faer matrices.
//!
//! # Memory Layout
//!
//! Dense storage and faer both use column-major (Fortran-style) order, so a
//! buffer can be viewed as any `rows x cols` matrix with `rows * cols` equal
//! to its length, without moving data.

use faer::{MatMut, MatRef};

use crate::storage::Dense;

/// Extension trait for viewing column-major buffers as faer matrices.
pub trait AsFaerMat {
    /// View storage as an immutable `rows x cols` matrix (zero-copy).
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols != len`.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::backend::AsFaerMat;
    /// use itensor::storage::Dense;
    ///
    /// let d = Dense::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// let mat = d.as_faer_mat(2, 3);
    /// assert_eq!(mat.nrows(), 2);
    /// assert_eq!(mat[(1, 2)], 6.0);
    /// ```
    fn as_faer_mat(&self, rows: usize, cols: usize) -> MatRef<'_, f64>;

    /// View storage as a mutable matrix. Shared storage is cloned first.
    fn as_faer_mat_mut(&mut self, rows: usize, cols: usize) -> MatMut<'_, f64>;
}

impl AsFaerMat for Dense {
    fn as_faer_mat(&self, rows: usize, cols: usize) -> MatRef<'_, f64> {
        check_shape(rows, cols, self.len());
        MatRef::from_column_major_slice(self.as_slice(), rows, cols)
    }

    fn as_faer_mat_mut(&mut self, rows: usize, cols: usize) -> MatMut<'_, f64> {
        check_shape(rows, cols, self.len());
        MatMut::from_column_major_slice_mut(self.make_mut(), rows, cols)
    }
}

impl AsFaerMat for [f64] {
    fn as_faer_mat(&self, rows: usize, cols: usize) -> MatRef<'_, f64> {
        check_shape(rows, cols, self.len());
        MatRef::from_column_major_slice(self, rows, cols)
    }

    fn as_faer_mat_mut(&mut self, rows: usize, cols: usize) -> MatMut<'_, f64> {
        check_shape(rows, cols, self.len());
        MatMut::from_column_major_slice_mut(self, rows, cols)
    }
}

fn check_shape(rows: usize, cols: usize, len: usize) {
    assert_eq!(
        rows * cols,
        len,
        "Matrix dimensions ({rows} x {cols} = {}) must match storage size ({len})",
        rows * cols,
    );
}

/// Copy a faer matrix into new dense storage in column-major order.
pub fn dense_from_faer_mat(mat: MatRef<'_, f64>) -> Dense {
    let rows = mat.nrows();
    let cols = mat.ncols();
    let mut data = Vec::with_capacity(rows * cols);
    for j in 0..cols {
        for i in 0..rows {
            data.push(mat[(i, j)]);
        }
    }
    Dense::from_vec(data)
}
