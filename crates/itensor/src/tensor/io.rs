//! Binary serialization.
//!
//! Fixed-width little-endian fields, in order:
//!
//! ```text
//! null flag       u8   (1 = null, stream ends here)
//! rank_n          u32
//! log_scale       f64
//! negative        u8
//! trivial count   u64
//! storage         u64 length + f64 elements
//! nontrivial      rank_n x Index
//! trivial         count x Index
//! ```
//!
//! The fingerprint is rebuilt from the decoded indices. There is no version
//! field.

use std::io::{Read, Write};

use crate::codec;
use crate::config::MAX_RANK;
use crate::error::TensorError;
use crate::index::Index;
use crate::index_set::{IndexSet, NontrivialIndices};
use crate::storage::Dense;

use super::ITensor;

/// Upper bound on trivial indices accepted from a stream.
const MAX_TRIVIAL: usize = 1 << 20;

impl ITensor {
    /// Write the binary form of this tensor.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), TensorError> {
        let Some(store) = &self.store else {
            return codec::write_bool(w, true);
        };
        codec::write_bool(w, false)?;
        codec::write_u32(w, self.rank_n() as u32)?;
        codec::write_f64(w, self.log_scale)?;
        codec::write_bool(w, self.negative)?;
        codec::write_u64(w, self.rank_1() as u64)?;
        store.write_to(w)?;
        for index in self.indices.iter() {
            index.write_to(w)?;
        }
        Ok(())
    }

    /// Read a tensor written by [`ITensor::write_to`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedStream` if the stream ends early or its contents
    /// violate the tensor invariants (rank above the maximum, storage length
    /// not matching the index dimensions, misplaced trivial indices).
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    ///
    /// let i = Index::new("i", 2);
    /// let t = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap();
    /// let mut buf = Vec::new();
    /// t.write_to(&mut buf).unwrap();
    ///
    /// let back = ITensor::read_from(&mut buf.as_slice()).unwrap();
    /// assert_eq!(back.get(&[i.at(1)]).unwrap(), 2.0);
    /// ```
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, TensorError> {
        if codec::read_bool(r, "null flag")? {
            return Ok(ITensor::null());
        }
        let rank_n = codec::read_u32(r, "rank")? as usize;
        if rank_n > MAX_RANK {
            return Err(malformed(format!(
                "rank {rank_n} exceeds maximum {MAX_RANK}"
            )));
        }
        let log_scale = codec::read_f64(r, "log-scale")?;
        let negative = codec::read_bool(r, "sign flag")?;
        let trivial_count = codec::read_len(r, "trivial index count", MAX_TRIVIAL)?;
        let store = Dense::read_from(r)?;

        let mut nontrivial = NontrivialIndices::new();
        for _ in 0..rank_n {
            let index = Index::read_from(r)?;
            if index.is_trivial() {
                return Err(malformed(format!("trivial index {index} in nontrivial slot")));
            }
            nontrivial.push(index);
        }
        let mut trivial = Vec::with_capacity(trivial_count.min(MAX_RANK));
        for _ in 0..trivial_count {
            trivial.push(Index::read_from(r)?);
        }

        let indices = IndexSet::from_parts(nontrivial, trivial)
            .map_err(|err| malformed(format!("invalid index set: {err}")))?;
        if store.len() != indices.size() {
            return Err(malformed(format!(
                "storage holds {} elements, indices require {}",
                store.len(),
                indices.size()
            )));
        }
        Ok(ITensor {
            store: Some(store),
            indices,
            log_scale,
            negative,
        })
    }
}

fn malformed(reason: String) -> TensorError {
    TensorError::MalformedStream { reason }
}
