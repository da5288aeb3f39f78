/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalMatrix, LocalVector, Orientation};
use crate::{DistMatrix, DistVector, MatrixSize, Scalar};

/// Anything with a global matrix shape.
pub trait Shape {
    fn size(&self) -> MatrixSize;
}

/// One-dimensional objects.
pub trait Length: Shape {
    fn length(&self) -> usize;
    fn orientation(&self) -> Orientation;
}

/// Global shape.  Identical on every process for distributed objects.
pub fn size<X: Shape + ?Sized>(x: &X) -> MatrixSize { x.size() }

/// Global length of a vector.
pub fn length<X: Length + ?Sized>(x: &X) -> usize { x.length() }

impl<'a, T: Scalar> Shape for LocalMatrix<'a, T> {
    fn size(&self) -> MatrixSize { LocalMatrix::size(self) }
}

impl<'a, T: Scalar> Shape for LocalVector<'a, T> {
    fn size(&self) -> MatrixSize { LocalVector::size(self) }
}

impl<'a, T: Scalar> Length for LocalVector<'a, T> {
    fn length(&self) -> usize { LocalVector::length(self) }
    fn orientation(&self) -> Orientation { LocalVector::orientation(self) }
}

impl<'a, T: Scalar> Shape for DistMatrix<'a, T> {
    fn size(&self) -> MatrixSize { DistMatrix::size(self) }
}

impl<'a, T: Scalar> Shape for DistVector<'a, T> {
    fn size(&self) -> MatrixSize { DistVector::size(self) }
}

impl<'a, T: Scalar> Length for DistVector<'a, T> {
    fn length(&self) -> usize { DistVector::length(self) }
    fn orientation(&self) -> Orientation { DistVector::orientation(self) }
}
