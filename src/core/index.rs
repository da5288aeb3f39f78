/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Error, Result};

use ::std::fmt;

/// Shape of a matrix: `m` rows by `n` columns.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixSize {
    pub m: usize,
    pub n: usize,
}

/// A (row, column) position.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixIndex {
    pub m: usize,
    pub n: usize,
}

impl MatrixSize {
    pub fn new(m: usize, n: usize) -> Self { MatrixSize { m, n } }

    pub fn transposed(self) -> Self { MatrixSize { m: self.n, n: self.m } }

    /// Number of elements.
    pub fn len(self) -> usize { self.m * self.n }

    pub fn is_empty(self) -> bool { self.len() == 0 }

    /// Row-major shape, as ndarray likes it.
    pub fn dim(self) -> (usize, usize) { (self.m, self.n) }
}

impl MatrixIndex {
    pub const ORIGIN: MatrixIndex = MatrixIndex { m: 0, n: 0 };

    pub fn new(m: usize, n: usize) -> Self { MatrixIndex { m, n } }
}

impl From<(usize, usize)> for MatrixSize {
    fn from((m, n): (usize, usize)) -> Self { MatrixSize { m, n } }
}

impl From<(usize, usize)> for MatrixIndex {
    fn from((m, n): (usize, usize)) -> Self { MatrixIndex { m, n } }
}

impl fmt::Display for MatrixSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}x{}", self.m, self.n) }
}

impl fmt::Display for MatrixIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "({}, {})", self.m, self.n) }
}

/// A rectangular block of a matrix.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatrixRange {
    /// Starting position and shape.
    Sized { first: MatrixIndex, size: MatrixSize },
    /// First and last positions, both inclusive.
    Inclusive { first: MatrixIndex, last: MatrixIndex },
}

impl MatrixRange {
    pub fn new(first: MatrixIndex, size: MatrixSize) -> Self { MatrixRange::Sized { first, size } }

    pub fn inclusive(first: MatrixIndex, last: MatrixIndex) -> Self { MatrixRange::Inclusive { first, last } }

    /// Starting position and shape, checked against a matrix of shape `bounds`.
    pub fn resolve(self, bounds: MatrixSize) -> Result<(MatrixIndex, MatrixSize)> {
        let (first, size) = match self {
            MatrixRange::Sized { first, size } => (first, size),
            MatrixRange::Inclusive { first, last } => {
                let m = last.m.saturating_add(1).saturating_sub(first.m);
                let n = last.n.saturating_add(1).saturating_sub(first.n);
                let size = MatrixSize { m, n };
                // inclusive ranges always hold at least one element
                if last.m < first.m || last.n < first.n {
                    return Err(Error::IndexOutOfRange { first, size, bounds });
                }
                (first, size)
            },
        };

        let fits = |start: usize, len: usize, bound: usize| start.checked_add(len).map_or(false, |end| end <= bound);
        match fits(first.m, size.m, bounds.m) && fits(first.n, size.n, bounds.n) {
            true => Ok((first, size)),
            false => Err(Error::IndexOutOfRange { first, size, bounds }),
        }
    }
}

impl From<(MatrixIndex, MatrixSize)> for MatrixRange {
    fn from((first, size): (MatrixIndex, MatrixSize)) -> Self { MatrixRange::Sized { first, size } }
}

impl From<(MatrixIndex, MatrixIndex)> for MatrixRange {
    fn from((first, last): (MatrixIndex, MatrixIndex)) -> Self { MatrixRange::Inclusive { first, last } }
}
