/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Operations on local and distributed matrices.
//!
//! Every operation is available both as a trait method and as a free function
//! of the same name.  The distributed variants are collective: all processes
//! of the grid must call them, in the same order.

mod expand;
mod multiply;
mod plus;
mod reduce;
mod select;
mod shape;
mod transpose;

pub use self::expand::{expand, Expression, Operation};
pub use self::multiply::{multiply, Multiply};
pub use self::plus::{plus, Plus};
pub use self::reduce::{ColumnSums, ScaleColumns};
pub use self::select::{select, Select};
pub use self::shape::{length, size, Length, Shape};
pub use self::transpose::{transpose, Transpose};
