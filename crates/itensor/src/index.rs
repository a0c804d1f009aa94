//! Index labels for tensor axes.
//!
//! An [`Index`] is an immutable label carrying a dimension, a type tag, a
//! prime level and an identity. Two indices are equal iff they share identity,
//! type and prime level. Prime-level transformations return a new `Index`
//! with the same identity.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{Read, Write};
use std::sync::Arc;

use rand::Rng;

use crate::codec;
use crate::error::TensorError;

/// Identity reserved for the real/imaginary index.
const RE_IM_ID: u64 = 0;

/// Upper bound on index name length accepted from a stream.
const MAX_NAME_LEN: usize = 1 << 16;

/// Type tag of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IndexType {
    /// Bond between tensors in a network.
    Link,
    /// Physical site degree of freedom.
    Site,
    /// Reserved two-valued real/imaginary index used for complex packing.
    ReIm,
}

impl IndexType {
    fn to_u8(self) -> u8 {
        match self {
            IndexType::Link => 0,
            IndexType::Site => 1,
            IndexType::ReIm => 2,
        }
    }

    fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(IndexType::Link),
            1 => Some(IndexType::Site),
            2 => Some(IndexType::ReIm),
            _ => None,
        }
    }
}

/// Which index types a prime-level transformation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimeScope {
    Link,
    Site,
    Both,
}

impl PrimeScope {
    /// ReIm indices are never primed.
    #[inline]
    pub fn applies_to(self, kind: IndexType) -> bool {
        match (self, kind) {
            (_, IndexType::ReIm) => false,
            (PrimeScope::Both, _) => true,
            (PrimeScope::Link, IndexType::Link) => true,
            (PrimeScope::Site, IndexType::Site) => true,
            _ => false,
        }
    }
}

/// Immutable tensor axis label.
///
/// # Example
///
/// ```
/// use itensor::Index;
///
/// let i = Index::new("i", 3);
/// let ip = i.primed();
/// assert_ne!(i, ip);
/// assert_eq!(ip.deprimed(), i);
/// assert_eq!(ip.dim(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct Index {
    id: u64,
    dim: usize,
    kind: IndexType,
    prime_level: u32,
    name: Arc<str>,
}

impl Index {
    /// Create a new link index with a fresh identity.
    ///
    /// # Panics
    ///
    /// Panics if `dim == 0`.
    pub fn new(name: &str, dim: usize) -> Self {
        Self::with_type(name, dim, IndexType::Link)
    }

    /// Create a new site index with a fresh identity.
    pub fn site(name: &str, dim: usize) -> Self {
        Self::with_type(name, dim, IndexType::Site)
    }

    /// Create a new index of the given type with a fresh identity.
    ///
    /// # Panics
    ///
    /// Panics if `dim == 0`, or if `kind` is `ReIm` (use [`Index::re_im`]).
    pub fn with_type(name: &str, dim: usize, kind: IndexType) -> Self {
        assert!(dim >= 1, "Index {name}: dimension must be at least 1");
        assert!(
            kind != IndexType::ReIm,
            "Index {name}: ReIm indices are reserved, use Index::re_im()"
        );
        Self {
            id: rand::rng().random_range(1..=u64::MAX),
            dim,
            kind,
            prime_level: 0,
            name: Arc::from(name),
        }
    }

    /// The reserved real/imaginary index (dimension 2).
    pub fn re_im() -> Self {
        Self {
            id: RE_IM_ID,
            dim: 2,
            kind: IndexType::ReIm,
            prime_level: 0,
            name: Arc::from("ReIm"),
        }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn kind(&self) -> IndexType {
        self.kind
    }

    #[inline]
    pub fn prime_level(&self) -> u32 {
        self.prime_level
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// True when dimension is 1.
    #[inline]
    pub fn is_trivial(&self) -> bool {
        self.dim == 1
    }

    /// Order-independent numeric fingerprint.
    ///
    /// Summing fingerprints over an index set gives a cheap necessary
    /// condition for two sets being equal.
    pub fn fingerprint(&self) -> f64 {
        unit_real(self.id) * (1.0 + f64::from(self.prime_level))
    }

    /// Same identity and type, any prime level.
    pub fn noprime_equals(&self, other: &Index) -> bool {
        self.id == other.id && self.kind == other.kind
    }

    /// Copy of this index with the given prime level.
    pub fn with_prime(&self, prime_level: u32) -> Self {
        Self {
            prime_level,
            ..self.clone()
        }
    }

    /// Prime level raised by one.
    pub fn primed(&self) -> Self {
        self.primed_by(1)
    }

    pub fn primed_by(&self, inc: u32) -> Self {
        self.with_prime(self.prime_level + inc)
    }

    /// Prime level reset to zero.
    pub fn deprimed(&self) -> Self {
        self.with_prime(0)
    }

    /// Raise prime level by `inc` if `scope` applies to this index.
    pub fn prime_scoped(&self, scope: PrimeScope, inc: u32) -> Self {
        if scope.applies_to(self.kind) {
            self.primed_by(inc)
        } else {
            self.clone()
        }
    }

    /// Reset prime level if `scope` applies to this index.
    pub fn noprime_scoped(&self, scope: PrimeScope) -> Self {
        if scope.applies_to(self.kind) {
            self.deprimed()
        } else {
            self.clone()
        }
    }

    /// Change prime level `old` to `new` if `scope` applies and the level matches.
    pub fn map_prime(&self, old: u32, new: u32, scope: PrimeScope) -> Self {
        if scope.applies_to(self.kind) && self.prime_level == old {
            self.with_prime(new)
        } else {
            self.clone()
        }
    }

    /// Pair this index with a 0-based value.
    pub fn at(&self, val: usize) -> IndexVal {
        IndexVal::new(self.clone(), val)
    }

    /// Write the binary form of this index.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), TensorError> {
        codec::write_u64(w, self.id)?;
        codec::write_u64(w, self.dim as u64)?;
        codec::write_u8(w, self.kind.to_u8())?;
        codec::write_u32(w, self.prime_level)?;
        let name = self.name.as_bytes();
        codec::write_u64(w, name.len() as u64)?;
        w.write_all(name)?;
        Ok(())
    }

    /// Read an index written by [`Index::write_to`].
    pub fn read_from<R: Read>(r: &mut R) -> Result<Self, TensorError> {
        let id = codec::read_u64(r, "index id")?;
        let dim = codec::read_len(r, "index dimension", usize::MAX)?;
        if dim == 0 {
            return Err(TensorError::MalformedStream {
                reason: "index dimension is zero".to_string(),
            });
        }
        let raw_kind = codec::read_u8(r, "index type")?;
        let kind = IndexType::from_u8(raw_kind).ok_or_else(|| TensorError::MalformedStream {
            reason: format!("unknown index type tag {raw_kind}"),
        })?;
        let prime_level = codec::read_u32(r, "prime level")?;
        let name_len = codec::read_len(r, "index name length", MAX_NAME_LEN)?;
        let mut name = vec![0u8; name_len];
        r.read_exact(&mut name)
            .map_err(|_| TensorError::MalformedStream {
                reason: "truncated index name".to_string(),
            })?;
        let name = String::from_utf8(name).map_err(|_| TensorError::MalformedStream {
            reason: "index name is not valid UTF-8".to_string(),
        })?;
        Ok(Self {
            id,
            dim,
            kind,
            prime_level,
            name: Arc::from(name),
        })
    }
}

/// Map an identity to a real number in `[1, 2)`.
fn unit_real(id: u64) -> f64 {
    // splitmix64 finalizer
    let mut z = id.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    1.0 + (z >> 11) as f64 / (1u64 << 53) as f64
}

impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.kind == other.kind && self.prime_level == other.prime_level
    }
}

impl Eq for Index {}

impl Hash for Index {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.kind.hash(state);
        self.prime_level.hash(state);
    }
}

impl Ord for Index {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then(self.prime_level.cmp(&other.prime_level))
            .then(self.kind.cmp(&other.kind))
    }
}

impl PartialOrd for Index {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            IndexType::Link => "Link",
            IndexType::Site => "Site",
            IndexType::ReIm => "ReIm",
        };
        write!(f, "({},{},{})", self.name, self.dim, kind)?;
        for _ in 0..self.prime_level {
            f.write_str("'")?;
        }
        Ok(())
    }
}

/// An index paired with a 0-based value in `0..index.dim()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexVal {
    pub index: Index,
    pub val: usize,
}

impl IndexVal {
    pub fn new(index: Index, val: usize) -> Self {
        Self { index, val }
    }

    /// Check the value lies within the index range.
    pub(crate) fn check_bounds(&self) -> Result<(), TensorError> {
        if self.val >= self.index.dim() {
            return Err(TensorError::IndexOutOfBounds {
                index: self.index.to_string(),
                value: self.val,
                dim: self.index.dim(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for IndexVal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.index, self.val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_indices_are_distinct() {
        let a = Index::new("a", 2);
        let b = Index::new("a", 2);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_prime_levels() {
        let s = Index::site("s", 2);
        let sp = s.primed();
        assert_eq!(sp.prime_level(), 1);
        assert!(sp.noprime_equals(&s));
        assert_ne!(sp, s);
        assert_eq!(sp.primed_by(2).prime_level(), 3);
        assert_eq!(sp.deprimed(), s);
    }

    #[test]
    fn test_scoped_priming() {
        let l = Index::new("l", 3);
        let s = Index::site("s", 2);
        assert_eq!(l.prime_scoped(PrimeScope::Site, 1), l);
        assert_eq!(s.prime_scoped(PrimeScope::Site, 1).prime_level(), 1);
        assert_eq!(l.prime_scoped(PrimeScope::Both, 1).prime_level(), 1);
        assert_eq!(Index::re_im().prime_scoped(PrimeScope::Both, 1), Index::re_im());
    }

    #[test]
    fn test_map_prime() {
        let s = Index::site("s", 2).primed();
        assert_eq!(s.map_prime(1, 2, PrimeScope::Site).prime_level(), 2);
        assert_eq!(s.map_prime(0, 2, PrimeScope::Site).prime_level(), 1);
        assert_eq!(s.map_prime(1, 2, PrimeScope::Link).prime_level(), 1);
    }

    #[test]
    fn test_fingerprint_depends_on_prime() {
        let a = Index::new("a", 2);
        assert_ne!(a.fingerprint(), a.primed().fingerprint());
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert!(a.fingerprint() >= 1.0);
    }

    #[test]
    fn test_ordering_consistent_with_eq() {
        let a = Index::new("a", 2);
        let mut v = vec![a.primed(), a.clone(), a.clone()];
        v.sort();
        v.dedup();
        assert_eq!(v, vec![a.clone(), a.primed()]);
    }

    #[test]
    fn test_index_io_roundtrip() {
        let s = Index::site("site3", 4).primed_by(2);
        let mut buf = Vec::new();
        s.write_to(&mut buf).unwrap();
        let back = Index::read_from(&mut buf.as_slice()).unwrap();
        assert_eq!(back, s);
        assert_eq!(back.dim(), 4);
        assert_eq!(back.name(), "site3");
        assert_eq!(back.kind(), IndexType::Site);
    }

    #[test]
    fn test_index_read_rejects_zero_dim() {
        let mut buf = Vec::new();
        codec::write_u64(&mut buf, 5).unwrap();
        codec::write_u64(&mut buf, 0).unwrap();
        let err = Index::read_from(&mut buf.as_slice()).unwrap_err();
        assert!(matches!(err, TensorError::MalformedStream { .. }));
    }

    #[test]
    fn test_display() {
        let i = Index::new("i", 3).primed();
        assert_eq!(i.to_string(), "(i,3,Link)'");
        assert_eq!(i.at(2).to_string(), "(i,3,Link)'=2");
    }

    #[test]
    #[should_panic(expected = "dimension must be at least 1")]
    fn test_zero_dim_panics() {
        let _ = Index::new("z", 0);
    }
}
