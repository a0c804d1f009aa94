//! Complex values packed into real tensors.
//!
//! A complex tensor carries the reserved [`Index::re_im`] index: value 0 of
//! that index holds the real part and value 1 the imaginary part. The
//! helpers here build the basis tensors over that index and conjugate or
//! split complex tensors.
//!
//! # Example
//!
//! ```
//! use itensor::{ITensor, Index, complex};
//!
//! let i = Index::new("i", 2);
//! let re = ITensor::from_vec(std::slice::from_ref(&i), vec![1.0, 2.0]).unwrap();
//! let im = ITensor::from_vec(std::slice::from_ref(&i), vec![3.0, 4.0]).unwrap();
//! let z = &re * &complex::complex_1() + &im * &complex::complex_i();
//! assert!(z.is_complex());
//!
//! let (zr, zi) = z.conj().unwrap().split_re_im();
//! assert_eq!(zr.get(&[i.at(1)]).unwrap(), 2.0);
//! assert_eq!(zi.get(&[i.at(1)]).unwrap(), -4.0);
//! ```

use crate::error::TensorError;
use crate::index::Index;
use crate::index_set::IndexSet;
use crate::storage::Dense;
use crate::tensor::ITensor;

fn re_im_vector(re: f64, im: f64) -> ITensor {
    ITensor::from_parts(
        Dense::from_vec(vec![re, im]),
        IndexSet::single(Index::re_im()),
    )
}

/// The complex unit `1` over the ReIm index.
pub fn complex_1() -> ITensor {
    re_im_vector(1.0, 0.0)
}

/// The imaginary unit `i` over the ReIm index.
pub fn complex_i() -> ITensor {
    re_im_vector(0.0, 1.0)
}

/// Element-wise multiplier that negates the imaginary part.
pub fn conj_tensor() -> ITensor {
    re_im_vector(1.0, -1.0)
}

impl ITensor {
    /// True if the tensor carries the ReIm index.
    pub fn is_complex(&self) -> bool {
        self.has_index(&Index::re_im())
    }

    /// Complex conjugate. A real tensor is returned unchanged (sharing its
    /// buffer).
    pub fn conj(&self) -> Result<ITensor, TensorError> {
        if !self.is_complex() {
            return Ok(self.clone());
        }
        self.product(&conj_tensor())
    }

    /// Real and imaginary parts as real tensors.
    ///
    /// For a real tensor the imaginary part is zero over the same indices.
    pub fn split_re_im(&self) -> (ITensor, ITensor) {
        if !self.is_complex() {
            return (self.clone(), self.with_store(Dense::zeros(self.len())));
        }
        let re_im = Index::re_im();
        (self * &re_im.at(0), self * &re_im.at(1))
    }
}
