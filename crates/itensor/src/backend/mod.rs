//! Backend abstraction for buffer-level operations.
//!
//! # Backends
//!
//! - `GenericBackend`: Counter-driven loop implementation (always available)
//!
//! # faer Integration
//!
//! The `faer_interop` module provides zero-copy views of dense storage as
//! faer matrices, used by GEMM contraction and matrix conversion.

mod faer_interop;
mod generic;
mod permutation;

pub use faer_interop::{AsFaerMat, dense_from_faer_mat};
pub use generic::GenericBackend;
pub use permutation::PermutationBackend;
