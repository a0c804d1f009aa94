//! Generic (Counter-driven) backend implementation.

use smallvec::SmallVec;

use crate::backend::PermutationBackend;
use crate::config::MAX_RANK;
use crate::counter::{Counter, compute_strides};
use crate::permutation::Permutation;

/// Generic backend walking the destination layout with a [`Counter`].
///
/// Each destination offset is visited once in increasing order; the source
/// offset is rebuilt from the permuted multi-index.
pub struct GenericBackend;

impl GenericBackend {
    /// Visit `(dest_offset, src_offset)` pairs.
    fn for_each_pair<F>(src_dims: &[usize], perm: &Permutation, mut f: F)
    where
        F: FnMut(usize, usize),
    {
        assert_eq!(
            perm.len(),
            src_dims.len(),
            "permutation length {} does not match rank {}",
            perm.len(),
            src_dims.len()
        );
        let src_strides = compute_strides(src_dims);
        // Source stride seen by each destination axis.
        let gathered: SmallVec<[usize; MAX_RANK]> =
            perm.as_slice().iter().map(|&p| src_strides[p]).collect();
        let dest_dims: SmallVec<[usize; MAX_RANK]> =
            perm.as_slice().iter().map(|&p| src_dims[p]).collect();

        let mut counter = Counter::new(&dest_dims);
        while !counter.is_done() {
            let src_offset: usize = counter
                .digits()
                .iter()
                .zip(&gathered)
                .map(|(&d, &s)| d * s)
                .sum();
            f(counter.offset(), src_offset);
            counter.advance();
        }
    }
}

impl PermutationBackend for GenericBackend {
    fn permute_into(dest: &mut [f64], src: &[f64], src_dims: &[usize], perm: &Permutation) {
        assert_eq!(dest.len(), src.len(), "buffer lengths differ");
        if perm.is_identity() {
            dest.copy_from_slice(src);
            return;
        }
        Self::for_each_pair(src_dims, perm, |d, s| dest[d] = src[s]);
    }

    fn permute_add_into(
        dest: &mut [f64],
        src: &[f64],
        src_dims: &[usize],
        perm: &Permutation,
        factor: f64,
    ) {
        assert_eq!(dest.len(), src.len(), "buffer lengths differ");
        if perm.is_identity() {
            for (d, &s) in dest.iter_mut().zip(src) {
                *d += factor * s;
            }
            return;
        }
        Self::for_each_pair(src_dims, perm, |d, s| dest[d] += factor * src[s]);
    }
}
