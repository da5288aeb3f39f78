/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Everything the binaries need that is not linear algebra.

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;

pub type FailResult<T> = Result<T, ::failure::Error>;

pub mod config;
pub mod dataset;
pub mod logging;
mod run;
mod entry_points;

pub use crate::run::{run_pca, run_pca_on, PcaOutput};
pub use crate::entry_points::dmat_pca;
