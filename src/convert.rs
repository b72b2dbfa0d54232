//! Conversion of text values to numeric types with strict validation.
//!
//! Integer targets parse through the widest integer of their signedness
//! and are range-checked against the target; unsigned targets never
//! accept a sign. Float targets parse through f64 and must stay within
//! the finite range of the target, so overflow and `NaN` are rejected.
//! A conversion either consumes the whole trimmed fragment or fails.

use std::io::{BufRead, Seek};

use crate::error::{DbError, Result};
use crate::resolve::load_value;
use crate::stamp::Stamp;

/// Numeric primitives that can be read from a database value.
pub trait Scalar: Copy + 'static {
    /// Parses one whitespace-free field, rejecting out-of-range values.
    fn parse_field(field: &str) -> Option<Self>;
}

macro_rules! scalar_via_i64 {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            fn parse_field(field: &str) -> Option<Self> {
                let wide: i64 = field.parse().ok()?;
                if wide < Self::MIN as i64 || wide > Self::MAX as i64 {
                    return None;
                }
                Some(wide as $t)
            }
        }
    )*};
}

macro_rules! scalar_via_u64 {
    ($($t:ty),*) => {$(
        impl Scalar for $t {
            fn parse_field(field: &str) -> Option<Self> {
                let wide: u64 = field.parse().ok()?;
                if wide > Self::MAX as u64 {
                    return None;
                }
                Some(wide as $t)
            }
        }
    )*};
}

scalar_via_i64!(i8, i16, i32);
scalar_via_u64!(u8, u16, u32);

impl Scalar for i64 {
    fn parse_field(field: &str) -> Option<Self> {
        field.parse().ok()
    }
}

impl Scalar for u64 {
    fn parse_field(field: &str) -> Option<Self> {
        field.parse().ok()
    }
}

impl Scalar for f64 {
    fn parse_field(field: &str) -> Option<Self> {
        let wide: f64 = field.parse().ok()?;
        (-f64::MAX..=f64::MAX).contains(&wide).then_some(wide)
    }
}

impl Scalar for f32 {
    fn parse_field(field: &str) -> Option<Self> {
        let wide: f64 = field.parse().ok()?;
        let max = f64::from(f32::MAX);
        (-max..=max).contains(&wide).then_some(wide as f32)
    }
}

fn conversion_error(key: &str, text: &str) -> DbError {
    DbError::Conversion {
        key: key.to_string(),
        text: text.to_string(),
    }
}

/// Converts a whole value string to one scalar.
pub fn to_scalar<T: Scalar>(key: &str, text: &str) -> Result<T> {
    T::parse_field(text.trim()).ok_or_else(|| conversion_error(key, text))
}

/// Converts a whitespace-separated value string to a vector. Any field
/// failure aborts the whole array; the error carries the full original
/// value string, not the failing token.
pub fn to_array<T: Scalar>(key: &str, text: &str) -> Result<Vec<T>> {
    let nfields = text.split_whitespace().count();
    if nfields == 0 {
        return Err(conversion_error(key, text));
    }
    let mut values = Vec::with_capacity(nfields);
    for field in text.split_whitespace() {
        match T::parse_field(field) {
            Some(v) => values.push(v),
            None => return Err(conversion_error(key, text)),
        }
    }
    Ok(values)
}

/// Converts a value string to a rectangular matrix with `ncols`
/// columns, reshaping the flat element list row-major.
pub fn to_matrix<T: Scalar>(key: &str, text: &str, ncols: usize) -> Result<Vec<Vec<T>>> {
    let flat = to_array(key, text)?;
    if ncols == 0 || flat.len() % ncols != 0 {
        return Err(DbError::MatrixShape {
            key: key.to_string(),
            ncols,
        });
    }
    Ok(flat.chunks(ncols).map(<[T]>::to_vec).collect())
}

/// Resolves `key` at `date` and converts the value to one scalar.
pub fn load_scalar<T: Scalar, R: BufRead + Seek>(
    file: &mut R,
    date: Stamp,
    key: &str,
) -> Result<Option<T>> {
    match load_value(file, date, key)? {
        Some(text) => to_scalar(key, &text).map(Some),
        None => Ok(None),
    }
}

/// Resolves `key` at `date` and converts the value to a vector.
pub fn load_array<T: Scalar, R: BufRead + Seek>(
    file: &mut R,
    date: Stamp,
    key: &str,
) -> Result<Option<Vec<T>>> {
    match load_value(file, date, key)? {
        Some(text) => to_array(key, &text).map(Some),
        None => Ok(None),
    }
}

/// Resolves `key` at `date` and converts the value to a matrix with
/// `ncols` columns.
pub fn load_matrix<T: Scalar, R: BufRead + Seek>(
    file: &mut R,
    date: Stamp,
    key: &str,
    ncols: usize,
) -> Result<Option<Vec<Vec<T>>>> {
    match load_value(file, date, key)? {
        Some(text) => to_matrix(key, &text, ncols).map(Some),
        None => Ok(None),
    }
}
