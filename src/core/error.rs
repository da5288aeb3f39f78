/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::dist::{Dist, DistWrap};
use crate::index::{MatrixIndex, MatrixSize};
use crate::scalar::Dtype;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid communicator: {reason}")]
    InvalidCommunicator { reason: String },

    #[error("cannot arrange {size} processes into a grid of height {height}")]
    InvalidGridShape { height: usize, size: usize },

    #[error("distribution [{row},{col},{wrap}] is not supported")]
    DistributionNotSupported { row: Dist, col: Dist, wrap: DistWrap },

    #[error("shape mismatch: expected {expected}, got {found}")]
    ShapeMismatch { expected: MatrixSize, found: MatrixSize },

    #[error("scalar type {dtype} is not enabled in this build")]
    UnsupportedDtype { dtype: Dtype },

    #[error("host array is not contiguous in column-major order (shape {shape:?}, strides {strides:?})")]
    NonContiguousLayout { shape: Vec<usize>, strides: Vec<isize> },

    #[error("cannot write through a read-only view")]
    ReadOnlyViolation,

    #[error("operands belong to different process grids")]
    GridMismatch,

    #[error("block of size {size} at {first} does not fit in a matrix of size {bounds}")]
    IndexOutOfRange { first: MatrixIndex, size: MatrixSize, bounds: MatrixSize },
}
