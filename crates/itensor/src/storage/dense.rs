//! Copy-on-write dense storage.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::codec;
use crate::error::TensorError;

/// Elements are read in chunks of at most this many before the length is trusted.
const READ_CHUNK: usize = 1 << 16;

/// Dense storage - shared contiguous array of elements in column-major order.
///
/// Cloning a `Dense` shares the buffer. [`Dense::make_mut`] is the only way to
/// obtain mutable access and clones the buffer first if it is shared, so a
/// buffer is never written while another handle can observe it.
///
/// # Example
///
/// ```
/// use itensor::storage::Dense;
///
/// let a = Dense::from_vec(vec![1.0, 2.0]);
/// let mut b = a.clone();
/// assert!(a.shares_storage_with(&b));
/// b.make_mut()[0] = 9.0;
/// assert!(!a.shares_storage_with(&b));
/// assert_eq!(a.as_slice(), &[1.0, 2.0]);
/// assert_eq!(b.as_slice(), &[9.0, 2.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Dense {
    data: Arc<Vec<f64>>,
}

impl Dense {
    /// Create dense storage with given length, zero-initialized.
    pub fn zeros(len: usize) -> Self {
        Self::from_vec(vec![0.0; len])
    }

    /// Create dense storage from existing vector (takes ownership).
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            data: Arc::new(data),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Exclusive mutable access, cloning the buffer first if it is shared.
    #[inline]
    pub fn make_mut(&mut self) -> &mut [f64] {
        Arc::make_mut(&mut self.data).as_mut_slice()
    }

    /// Number of handles sharing this buffer.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.data)
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.ref_count() > 1
    }

    /// True when both handles point at the same buffer.
    #[inline]
    pub fn shares_storage_with(&self, other: &Dense) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Take the elements, copying only if the buffer is shared.
    pub fn into_vec(self) -> Vec<f64> {
        Arc::unwrap_or_clone(self.data)
    }

    /// Write the element count followed by the raw elements.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), TensorError> {
        codec::write_u64(w, self.data.len() as u64)?;
        for &v in self.data.iter() {
            codec::write_f64(w, v)?;
        }
        Ok(())
    }

    /// Read storage written by [`Dense::write_to`].
    ///
    /// The declared count is not trusted for allocation: a stream that ends
    /// early fails with `MalformedStream` without reserving the full length.
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, TensorError> {
        let len = codec::read_len(r, "storage length", usize::MAX / 8)?;
        let mut data = Vec::with_capacity(len.min(READ_CHUNK));
        for _ in 0..len {
            data.push(codec::read_f64(r, "storage element")?);
        }
        Ok(Self::from_vec(data))
    }
}

impl std::ops::Index<usize> for Dense {
    type Output = f64;

    #[inline]
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}
