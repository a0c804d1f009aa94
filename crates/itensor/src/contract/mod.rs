//! Tensor contraction engine.
//!
//! Operands are matched by index identity rather than by position:
//!
//! - `gemm`: indices shared by both operands are summed; each operand is
//!   presented as a matrix (permuting only when needed) and multiplied with
//!   faer
//! - `product`: shared indices are combined element-wise instead of summed
//!
//! The tensor-level entry points are [`ITensor::contract`](crate::ITensor::contract)
//! and [`ITensor::product`](crate::ITensor::product), which also combine
//! log-scales, signs and trivial indices.
//!
//! # Example
//!
//! ```
//! use itensor::{ITensor, Index};
//!
//! let i = Index::new("i", 2);
//! let j = Index::new("j", 3);
//! let k = Index::new("k", 4);
//! let a = ITensor::from_vec(&[i.clone(), j.clone()], vec![1.0; 6]).unwrap();
//! let b = ITensor::from_vec(&[j.clone(), k.clone()], vec![1.0; 12]).unwrap();
//!
//! let c = a.contract(&b).unwrap();
//! assert_eq!(c.indices().nontrivial(), &[i, k]);
//! ```

mod gemm;
mod product;
mod properties;

pub(crate) use gemm::contract_dense;
pub(crate) use product::product_dense;
pub use product::ProductLayout;
pub use properties::{ContractionProperties, OperandLayout};
