//! Little-endian fixed-width field encoding for the binary tensor format.

use std::io::{self, Read, Write};

use crate::error::TensorError;

pub(crate) fn write_u8<W: Write>(w: &mut W, v: u8) -> Result<(), TensorError> {
    w.write_all(&[v])?;
    Ok(())
}

pub(crate) fn write_bool<W: Write>(w: &mut W, v: bool) -> Result<(), TensorError> {
    write_u8(w, u8::from(v))
}

pub(crate) fn write_u32<W: Write>(w: &mut W, v: u32) -> Result<(), TensorError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_u64<W: Write>(w: &mut W, v: u64) -> Result<(), TensorError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

pub(crate) fn write_f64<W: Write>(w: &mut W, v: f64) -> Result<(), TensorError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

fn read_exact<R: Read, const N: usize>(r: &mut R, what: &str) -> Result<[u8; N], TensorError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => TensorError::MalformedStream {
            reason: format!("unexpected end of stream while reading {what}"),
        },
        _ => TensorError::Io(err),
    })?;
    Ok(buf)
}

pub(crate) fn read_u8<R: Read>(r: &mut R, what: &str) -> Result<u8, TensorError> {
    Ok(read_exact::<R, 1>(r, what)?[0])
}

pub(crate) fn read_bool<R: Read>(r: &mut R, what: &str) -> Result<bool, TensorError> {
    match read_u8(r, what)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(TensorError::MalformedStream {
            reason: format!("invalid flag byte {other} for {what}"),
        }),
    }
}

pub(crate) fn read_u32<R: Read>(r: &mut R, what: &str) -> Result<u32, TensorError> {
    Ok(u32::from_le_bytes(read_exact(r, what)?))
}

pub(crate) fn read_u64<R: Read>(r: &mut R, what: &str) -> Result<u64, TensorError> {
    Ok(u64::from_le_bytes(read_exact(r, what)?))
}

pub(crate) fn read_f64<R: Read>(r: &mut R, what: &str) -> Result<f64, TensorError> {
    Ok(f64::from_le_bytes(read_exact(r, what)?))
}

/// Read a `u64` length field and check it fits in `usize` and under `limit`.
pub(crate) fn read_len<R: Read>(r: &mut R, what: &str, limit: usize) -> Result<usize, TensorError> {
    let raw = read_u64(r, what)?;
    match usize::try_from(raw) {
        Ok(len) if len <= limit => Ok(len),
        _ => Err(TensorError::MalformedStream {
            reason: format!("{what} {raw} exceeds limit {limit}"),
        }),
    }
}
