//! Permutation backend trait.

use crate::permutation::Permutation;

/// Backend trait for dense buffer permutation.
///
/// Buffers are column-major over `src_dims`. The destination layout has
/// dimensions `perm.apply(src_dims)`: destination axis `k` is source axis
/// `perm.as_slice()[k]`.
pub trait PermutationBackend {
    /// Write the permuted contents of `src` into `dest`.
    ///
    /// # Panics
    ///
    /// Panics if buffer lengths disagree with `src_dims` or the permutation
    /// length differs from the number of axes.
    fn permute_into(dest: &mut [f64], src: &[f64], src_dims: &[usize], perm: &Permutation);

    /// Accumulate `factor * permuted(src)` into `dest`.
    fn permute_add_into(
        dest: &mut [f64],
        src: &[f64],
        src_dims: &[usize],
        perm: &Permutation,
        factor: f64,
    );
}
