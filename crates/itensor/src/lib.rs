//! itensor - dense tensors labelled by indices
//!
//! An [`ITensor`] is a dense column-major buffer bound to a set of
//! [`Index`] labels. Operations match indices by identity instead of by
//! position: `&a * &b` contracts every index the two tensors share,
//! `&a / &b` multiplies shared indices element-wise and keeps them, and
//! `&a + &b` aligns the index orders before adding.
//!
//! # Architecture
//!
//! ```text
//! tensor      ITensor value type, operators, I/O, matrix conversion
//!     |
//! contract    index matching (ContractionProperties), GEMM, product
//!     |
//! backend     PermutationBackend (Counter-driven), faer matrix views
//!     |
//! storage     copy-on-write Dense buffer
//! ```
//!
//! Tensors are value types. Clones share their buffer until one of them is
//! written to. A sign flag and a log-scale are kept outside the buffer so
//! that scalar multiplication is O(1) and long chains of products neither
//! overflow nor underflow.
//!
//! # Example
//!
//! ```
//! use itensor::{ITensor, Index};
//!
//! let i = Index::new("i", 2);
//! let j = Index::new("j", 3);
//! let k = Index::new("k", 2);
//!
//! // Column-major: the first index varies fastest.
//! let a = ITensor::from_vec(&[i.clone(), j.clone()], (1..=6).map(f64::from).collect()).unwrap();
//! let b = ITensor::from_vec(&[j.clone(), k.clone()], vec![1.0; 6]).unwrap();
//!
//! let c = &a * &b; // sums over j
//! assert_eq!(c.indices().nontrivial(), &[i.clone(), k.clone()]);
//! assert_eq!(c.get(&[i.at(0), k.at(1)]).unwrap(), 1.0 + 3.0 + 5.0);
//!
//! let twice = &c * 2.0;
//! assert!(twice.shares_storage_with(&c));
//! ```

pub mod backend;
mod codec;
pub mod complex;
pub mod config;
pub mod contract;
pub mod counter;
pub mod error;
pub mod index;
pub mod index_set;
pub mod permutation;
pub mod random;
pub mod storage;
pub mod tensor;

pub use config::MAX_RANK;
pub use counter::Counter;
pub use error::TensorError;
pub use index::{Index, IndexType, IndexVal, PrimeScope};
pub use index_set::{IndexSet, Slot};
pub use permutation::Permutation;
pub use storage::Dense;
pub use tensor::{DataDisplay, ITensor, dot, dot_complex, mult_site_ops};
