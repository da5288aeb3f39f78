/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Element types.
//!
//! Which types may be attached from host arrays is decided at build time by
//! the `scalar-*` features.  The set is fixed for the lifetime of the program.

use crate::{Error, Result};

use ::num_complex::Complex;
use ::num_traits::{One, Zero};
use ::std::fmt;
use ::std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};
use ::std::str::FromStr;

/// Runtime tag for a [`Scalar`] type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "kebab-case"))]
pub enum Dtype {
    Real32,
    Real64,
    Complex32,
    Complex64,
}

impl Dtype {
    pub const ALL: [Dtype; 4] = [Dtype::Real32, Dtype::Real64, Dtype::Complex32, Dtype::Complex64];

    pub fn is_complex(self) -> bool {
        match self {
            Dtype::Real32 | Dtype::Real64 => false,
            Dtype::Complex32 | Dtype::Complex64 => true,
        }
    }

    /// Whether this build accepts host arrays of this type.
    pub fn is_enabled(self) -> bool {
        match self {
            Dtype::Real32 => cfg!(feature = "scalar-f32"),
            Dtype::Real64 => cfg!(feature = "scalar-f64"),
            Dtype::Complex32 => cfg!(feature = "scalar-c32"),
            Dtype::Complex64 => cfg!(feature = "scalar-c64"),
        }
    }

    pub fn ensure_enabled(self) -> Result<()> {
        match self.is_enabled() {
            true => Ok(()),
            false => Err(Error::UnsupportedDtype { dtype: self }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dtype::Real32 => "real32",
            Dtype::Real64 => "real64",
            Dtype::Complex32 => "complex32",
            Dtype::Complex64 => "complex64",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scalar type: {0:?}")]
pub struct ParseDtypeError(String);

impl FromStr for Dtype {
    type Err = ParseDtypeError;

    fn from_str(s: &str) -> ::std::result::Result<Dtype, ParseDtypeError> {
        match &s.to_ascii_lowercase()[..] {
            "real32" | "f32" | "float" => Ok(Dtype::Real32),
            "real64" | "f64" | "double" => Ok(Dtype::Real64),
            "complex32" | "c32" | "complex-float" => Ok(Dtype::Complex32),
            "complex64" | "c64" | "complex-double" => Ok(Dtype::Complex64),
            _ => Err(ParseDtypeError(s.to_string())),
        }
    }
}

/// Real scalar types enabled in this build.
pub fn scalars() -> Vec<Dtype> {
    Dtype::ALL.iter().cloned().filter(|d| !d.is_complex() && d.is_enabled()).collect()
}

/// Complex scalar types enabled in this build.
pub fn complex_scalars() -> Vec<Dtype> {
    Dtype::ALL.iter().cloned().filter(|d| d.is_complex() && d.is_enabled()).collect()
}

/// An element type of local and distributed matrices.
///
/// On the wire, every scalar is `PARTS` consecutive `f64` values.
pub trait Scalar
    : Copy + Default + PartialEq + fmt::Debug + fmt::Display
    + Zero + One
    + Add<Output=Self> + Sub<Output=Self> + Mul<Output=Self> + Div<Output=Self>
    + Neg<Output=Self> + AddAssign
    + Send + Sync + 'static
{
    const DTYPE: Dtype;
    const PARTS: usize;

    fn write_parts(self, out: &mut Vec<f64>);

    /// `parts` has exactly `PARTS` elements.
    fn read_parts(parts: &[f64]) -> Self;

    fn from_real(x: f64) -> Self;

    /// Squared modulus, as a real number embedded in `Self`.
    fn norm_sqr(self) -> Self;
}

/// Real scalar types, which may be fed to decompositions computed in `f64`.
pub trait RealScalar: Scalar + PartialOrd {
    fn to_f64(self) -> f64;
    fn from_f64(x: f64) -> Self;
}

macro_rules! impl_real_scalar {
    ($($T:ident => $dtype:ident,)*) => {$(
        impl Scalar for $T {
            const DTYPE: Dtype = Dtype::$dtype;
            const PARTS: usize = 1;

            #[inline]
            fn write_parts(self, out: &mut Vec<f64>) { out.push(self as f64) }
            #[inline]
            fn read_parts(parts: &[f64]) -> Self { parts[0] as $T }
            #[inline]
            fn from_real(x: f64) -> Self { x as $T }
            #[inline]
            fn norm_sqr(self) -> Self { self * self }
        }

        impl RealScalar for $T {
            #[inline]
            fn to_f64(self) -> f64 { self as f64 }
            #[inline]
            fn from_f64(x: f64) -> Self { x as $T }
        }
    )*};
}

macro_rules! impl_complex_scalar {
    ($($T:ident => $dtype:ident,)*) => {$(
        impl Scalar for Complex<$T> {
            const DTYPE: Dtype = Dtype::$dtype;
            const PARTS: usize = 2;

            #[inline]
            fn write_parts(self, out: &mut Vec<f64>) {
                out.push(self.re as f64);
                out.push(self.im as f64);
            }
            #[inline]
            fn read_parts(parts: &[f64]) -> Self { Complex::new(parts[0] as $T, parts[1] as $T) }
            #[inline]
            fn from_real(x: f64) -> Self { Complex::new(x as $T, 0.0) }
            #[inline]
            fn norm_sqr(self) -> Self { Complex::new(Complex::norm_sqr(&self), 0.0) }
        }
    )*};
}

impl_real_scalar! {
    f32 => Real32,
    f64 => Real64,
}

impl_complex_scalar! {
    f32 => Complex32,
    f64 => Complex64,
}

pub(crate) fn encode<T: Scalar>(values: &[T]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len() * T::PARTS);
    for &x in values {
        x.write_parts(&mut out);
    }
    out
}

pub(crate) fn decode<T: Scalar>(parts: &[f64]) -> Vec<T> {
    parts.chunks(T::PARTS).map(T::read_parts).collect()
}
