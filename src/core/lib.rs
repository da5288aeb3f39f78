/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrices spread over a two-dimensional grid of processes.
//!
//! A [`ProcessGrid`] arranges the processes of a communicator into a
//! `height x width` grid.  A [`Distribution`] says which process holds which
//! element of a matrix, and [`DistMatrix::copy`] moves a matrix from one
//! distribution to another.  The operations in [`algebra`] work the same on
//! local and distributed objects.

#[macro_use]
extern crate log;

mod error;
mod scalar;
mod index;
mod grid;
mod dist;
mod redist;

pub mod local;
pub mod distributed;
pub mod algebra;

pub use crate::error::{Error, Result};
pub use crate::scalar::{complex_scalars, scalars, Dtype, ParseDtypeError, RealScalar, Scalar};
pub use crate::index::{MatrixIndex, MatrixRange, MatrixSize};
pub use crate::grid::{default_height, ProcessGrid};
pub use crate::dist::{local_length, AxisLayout, Dist, DistWrap, Distribution, ParseDistributionError};
pub use crate::distributed::{DistMatrix, DistVector};
pub use crate::local::{LocalMatrix, LocalVector, Orientation, Ownership};

pub use ::dmat_comm::{Comm, Communicator, ROOT};
