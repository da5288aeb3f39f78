/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! `assert_close!`, for comparing floating point data with a tolerance.
//!
//! ```ignore
//! assert_close!(1.0, 1.0 + 1e-12);
//! assert_close!(abs=1e-8, rel=1e-5, &computed[..], &expected[..]);
//! assert_close!(abs=1e-8, x, y, "while checking {}", what);
//! ```
//!
//! Real values, complex values, slices, and ndarray arrays are supported.
//! Complex values are compared one part at a time.

#[macro_use]
extern crate failure;

use ::ndarray::{ArrayBase, Data, Dimension};
use ::num_complex::Complex;
use ::std::fmt;

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {$crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}};
}

#[macro_export]
macro_rules! debug_assert_close {
    ($($t:tt)*) => {{
        #[cfg(debug_assertions)] {
            $crate::assert_close!{$($t)*}
        }
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$($assignment:tt)*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+] ) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        // `match` keeps temporaries in `$a` and `$b` alive until the end
        match (&$a, &$b) {
            (a, b) => {
                let mut abs;
                let mut rel;
                $(
                    $crate::assert_close_impl!{@stmt::assign [abs, rel] $assignment}
                )*

                if let Err(e) = $crate::CheckClose::check_close(a, b, $crate::Tolerances { abs, rel }) {
                    panic!("{} (tolerances: rel={}, abs={})\n{}", format!($($fmt)*), rel, abs, e);
                }
            },
        }
    };
    (@stmt::assign [$abs:ident, $rel:ident] [@abs $tol:expr]) => { $abs = $tol; };
    (@stmt::assign [$abs:ident, $rel:ident] [@rel $tol:expr]) => { $rel = $tol; };
}

#[doc(hidden)]
#[inline]
pub fn __is_close(a: f64, b: f64, Tolerances { abs, rel }: Tolerances) -> bool {
    // Same rule as Python's math.isclose.
    assert!(rel >= 0.0);
    assert!(abs >= 0.0);

    // infinities of the same sign
    if a == b { return true; }

    // infinities of opposite sign would give an infinite relative tolerance
    if a.is_infinite() || b.is_infinite() { return false; }

    // NaN fails here
    (a - b).abs() <= abs.max(rel * a.abs()).max(rel * b.abs())
}

#[derive(Debug, Copy, Clone)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

#[derive(Debug, Fail)]
pub struct CheckCloseError<T: fmt::Debug + Send + Sync + 'static> {
    pub values: (T, T),
    /// Position of the offending element, for containers.
    pub index: Vec<usize>,
    pub tol: Tolerances,
}

impl<T: fmt::Debug + Send + Sync + 'static> fmt::Display for CheckCloseError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ref left, ref right) = self.values;
        write!(f, "failed at index {:?}:
  left: {:?}
 right: {:?}
   tol: {:?}", self.index, left, right, self.tol)
    }
}

impl<T: fmt::Debug + Send + Sync + 'static> CheckCloseError<T> {
    fn at(mut self, index: usize) -> Self {
        self.index.insert(0, index);
        self
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    type Scalar: fmt::Debug + Send + Sync + 'static;

    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>;
}

macro_rules! impl_real {
    ($($T:ty)*) => {$(
        impl CheckClose for $T {
            type Scalar = $T;

            #[inline]
            fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<$T>> {
                match __is_close(*self as f64, *other as f64, tol) {
                    true => Ok(()),
                    false => Err(CheckCloseError { values: (*self, *other), index: vec![], tol }),
                }
            }
        }
    )*};
}

impl_real!{ f32 f64 }

impl<R> CheckClose for Complex<R>
where
    R: CheckClose + Copy + fmt::Debug + Send + Sync + 'static,
{
    type Scalar = Complex<R>;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Complex<R>>> {
        let re = self.re.check_close(&other.re, tol);
        let im = self.im.check_close(&other.im, tol);
        match re.and(im) {
            Ok(()) => Ok(()),
            Err(_) => Err(CheckCloseError { values: (*self, *other), index: vec![], tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { CheckClose::check_close(*self, *other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>> {
        assert_eq!(self.len(), other.len(), "length mismatch");
        for (k, (a, b)) in self.iter().zip(other).enumerate() {
            a.check_close(b, tol).map_err(|e| e.at(k))?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose> CheckClose<[T]> for Vec<T> {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self[..].check_close(other, tol) }
}

impl<T: CheckClose> CheckClose<Vec<T>> for [T] {
    type Scalar = T::Scalar;

    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>>
    { self.check_close(&other[..], tol) }
}

impl<A, S, S2, D> CheckClose<ArrayBase<S2, D>> for ArrayBase<S, D>
where
    A: CheckClose,
    S: Data<Elem = A>,
    S2: Data<Elem = A>,
    D: Dimension,
{
    type Scalar = A::Scalar;

    /// Elements are compared in logical order, so the memory layouts may differ.
    fn check_close(&self, other: &ArrayBase<S2, D>, tol: Tolerances) -> Result<(), CheckCloseError<Self::Scalar>> {
        assert_eq!(self.shape(), other.shape(), "shape mismatch");
        for (k, (a, b)) in self.iter().zip(other.iter()).enumerate() {
            a.check_close(b, tol).map_err(|e| e.at(k))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use ::ndarray::{arr2, ShapeBuilder};

    #[test]
    fn macro_output_can_compile() {
        assert_close!(1.0, 1.0);
        assert_close!(abs=1e-8, 1.0, 1.0);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0);
        assert_close!(1.0, 1.0,);
        assert_close!(abs=1e-8, 1.0f32, 1.0f32,);
        assert_close!(rel=1e-8, abs=1e-8, 1.0, 1.0,);
    }

    #[test]
    fn bad_parse_regression() {
        #[derive(Debug)] struct S;
        impl S { fn x(self) -> S { self } }
        impl CheckClose for S {
            type Scalar = f64;
            fn check_close(&self, _: &S, _: Tolerances) -> Result<(), CheckCloseError<f64>> { Ok(()) }
        }
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        debug_assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
        );
        assert_close!(
            abs=1e-10,
            S.x().x().x(),
            S.x().x().x(),
            "{}", "hello",
        );
    }

    #[test]
    fn complex_and_containers() {
        let a = vec![Complex::new(1.0, 2.0), Complex::new(-3.0, 0.0)];
        let b = vec![Complex::new(1.0, 2.0 + 1e-12), Complex::new(-3.0, 1e-13)];
        assert_close!(abs=1e-10, &a[..], &b[..]);

        let err = a.check_close(&vec![a[0], Complex::new(-3.0, 1.0)], Tolerances { abs: 1e-10, rel: 0.0 }).unwrap_err();
        assert_eq!(err.index, vec![1]);

        // same logical contents, different memory order
        let c = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
        let f = ::ndarray::Array2::from_shape_vec((2, 2).f(), vec![1.0, 3.0, 2.0, 4.0]).unwrap();
        assert_close!(abs=0.0, c, f);
    }

    #[test]
    fn borrows_of_temporaries() {
        let ones = || vec![1.0; 3];
        assert_close!(abs=1e-12, ones().as_slice(), &vec![1.0, 1.0, 1.0 + 1e-14][..]);
        assert_close!(ones()[..].to_vec().as_slice(), ones().as_slice(), "{}", "temporaries");
    }

    #[test]
    #[should_panic]
    fn not_close() {
        assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }

    #[test]
    #[should_panic]
    fn complex_not_close() {
        assert_close!(abs=1e-3, Complex::new(1.0, 0.0), Complex::new(1.0, 0.1));
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic)]
    fn debug_not_close() {
        debug_assert_close!(abs=0.0, rel=0.0, 1.0, 1.1);
    }
}
