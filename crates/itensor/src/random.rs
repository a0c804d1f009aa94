//! Random tensor construction.
//!
//! Uniform values are drawn from `[0, 1)`, normal values from the standard
//! normal distribution. The `_with_rng` variants take an explicit generator
//! for reproducible results.

use rand::Rng;
use rand::distr::StandardUniform;
use rand_distr::StandardNormal;

use crate::error::TensorError;
use crate::index::Index;
use crate::tensor::ITensor;

impl ITensor {
    /// Tensor over `indices` with uniform random values in `[0, 1)`.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    ///
    /// let i = Index::new("i", 2);
    /// let j = Index::new("j", 3);
    /// let t = ITensor::random(&[i, j]).unwrap();
    /// assert_eq!(t.len(), 6);
    /// assert!(t.assign_to_vec().iter().all(|v| (0.0..1.0).contains(v)));
    /// ```
    pub fn random(indices: &[Index]) -> Result<Self, TensorError> {
        Self::random_with_rng(indices, &mut rand::rng())
    }

    /// Uniform random tensor using a specific RNG.
    ///
    /// # Example
    ///
    /// ```
    /// use itensor::{ITensor, Index};
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let i = Index::new("i", 4);
    /// let t1 = ITensor::random_with_rng(std::slice::from_ref(&i), &mut StdRng::seed_from_u64(42)).unwrap();
    /// let t2 = ITensor::random_with_rng(std::slice::from_ref(&i), &mut StdRng::seed_from_u64(42)).unwrap();
    /// assert_eq!(t1.assign_to_vec(), t2.assign_to_vec());
    /// ```
    pub fn random_with_rng<R: Rng>(indices: &[Index], rng: &mut R) -> Result<Self, TensorError> {
        let mut t = Self::zeros(indices)?;
        t.randomize_with_rng(rng);
        Ok(t)
    }

    /// Tensor over `indices` with standard normal random values.
    pub fn randn(indices: &[Index]) -> Result<Self, TensorError> {
        Self::randn_with_rng(indices, &mut rand::rng())
    }

    /// Standard normal random tensor using a specific RNG.
    pub fn randn_with_rng<R: Rng>(indices: &[Index], rng: &mut R) -> Result<Self, TensorError> {
        let mut t = Self::zeros(indices)?;
        for v in t.solo() {
            *v = rng.sample(StandardNormal);
        }
        Ok(t)
    }

    /// Overwrite every element with a uniform random value in `[0, 1)`.
    ///
    /// Sign and log-scale are reset; a shared buffer is detached first.
    pub fn randomize(&mut self) {
        self.randomize_with_rng(&mut rand::rng());
    }

    pub fn randomize_with_rng<R: Rng>(&mut self, rng: &mut R) {
        self.reset_scale();
        for v in self.solo() {
            *v = rng.sample(StandardUniform);
        }
    }
}
