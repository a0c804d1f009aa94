//! Numeric constants shared across the crate.

/// Maximum number of nontrivial (dimension > 1) indices on a tensor.
pub const MAX_RANK: usize = 8;

/// A tensor whose norm is below this value reports `is_zero() == true`.
pub const ZERO_NORM_THRESHOLD: f64 = 1e-20;

/// Elements with magnitude at or below this are skipped when printing data.
pub const PRINT_THRESHOLD: f64 = 1e-10;

/// Added to a magnitude before taking its logarithm so that zero maps to a
/// large negative log-scale instead of `-inf`.
pub const LOG_FLOOR: f64 = 1e-100;

/// When a buffer must be rescaled down by more than this many e-folds its
/// contents are set to zero instead of underflowing element by element.
pub const RESCALE_CUTOFF: f64 = 100.0;

/// Log-scale shift applied by `t -= t`.
pub const SELF_SUBTRACT_SHIFT: f64 = 200.0;
