/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::algebra::Length;
use crate::{Error, MatrixSize, Result};

/// Tag of an [`Expression`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Operation {
    Expand,
}

/// An unevaluated operation over borrowed operands.
///
/// Expressions are only ever consumed by an operator that accepts them
/// (e.g. [`plus`](crate::algebra::plus)); they cannot be evaluated on their own.
#[derive(Debug)]
pub enum Expression<'e, V> {
    /// `vector` repeated along the axis it does not run along, to fill `size`.
    Expand { vector: &'e V, size: MatrixSize },
}

impl<'e, V> Expression<'e, V> {
    pub fn operation(&self) -> Operation {
        match self {
            Expression::Expand { .. } => Operation::Expand,
        }
    }

    /// Shape the expression would have if evaluated.
    pub fn size(&self) -> MatrixSize {
        match *self {
            Expression::Expand { size, .. } => size,
        }
    }
}

impl<'e, V> Clone for Expression<'e, V> {
    fn clone(&self) -> Self { *self }
}
impl<'e, V> Copy for Expression<'e, V> {}

/// Lazily broadcast a vector to a matrix of shape `size`.
///
/// A row vector must have length `size.n` and a column vector length `size.m`.
pub fn expand<V: Length>(vector: &V, size: MatrixSize) -> Result<Expression<'_, V>> {
    let orientation = vector.orientation();
    let expected = orientation.length_in(size);
    if vector.length() != expected {
        let expected = orientation.size_of(expected);
        return Err(Error::ShapeMismatch { expected, found: vector.size() });
    }
    Ok(Expression::Expand { vector, size })
}
