//! Storage for tensor data.
//!
//! Only dense storage exists: a flat, reference-counted buffer of `f64`
//! values in column-major order. Shape comes from the owning tensor's
//! index set.

mod dense;

pub use dense::Dense;
