/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrices and vectors held entirely by one process.

mod buffer;
mod matrix;
mod vector;

pub use self::buffer::{LocalBuffer, Ownership};
pub use self::matrix::LocalMatrix;
pub use self::vector::{LocalVector, Orientation};
