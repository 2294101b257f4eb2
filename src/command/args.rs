//! Typed access to command-line fields.
//!
//! Fields are trimmed before parsing so `meter, 50` works, though the
//! tokenizer itself never trims.

use core::str::FromStr;

use crate::error::ArgError;

/// Parse field `idx` as `T`.
pub fn field<T: FromStr>(fields: &[String], idx: usize) -> Result<T, ArgError> {
    let raw = fields.get(idx).ok_or(ArgError::Missing(idx))?;
    raw.trim().parse().map_err(|_| ArgError::Invalid(idx))
}

/// Parse field `idx` as `T`, or `default` when the line is shorter.
/// A present but malformed field is still an error.
pub fn field_or<T: FromStr>(fields: &[String], idx: usize, default: T) -> Result<T, ArgError> {
    if idx >= fields.len() {
        return Ok(default);
    }
    field(fields, idx)
}

/// Parse `N` consecutive fields starting at `first`.
pub fn fields<T: FromStr + Copy + Default, const N: usize>(
    fields: &[String],
    first: usize,
) -> Result<[T; N], ArgError> {
    let mut out = [T::default(); N];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = field(fields, first + i)?;
    }
    Ok(out)
}

/// Require exactly `n` fields after the first `skip`.
pub fn exact_count(fields: &[String], skip: usize, n: usize) -> Result<(), ArgError> {
    let have = fields.len().saturating_sub(skip);
    if have < n {
        return Err(ArgError::Missing(fields.len()));
    }
    if have > n {
        return Err(ArgError::Invalid(skip + n));
    }
    Ok(())
}
