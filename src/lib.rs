/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Dense matrices distributed over a two-dimensional grid of processes.
//!
//! This crate gathers the public API of the workspace in one place.
//!
//! ```ignore
//! use dmat::{DistMatrix, Distribution, LocalMatrix, ProcessGrid, ThreadUniverse};
//!
//! ThreadUniverse::run(4, |comm| {
//!     let grid = ProcessGrid::new(comm)?;
//!     let x = DistMatrix::make_view(&grid, LocalMatrix::from_array(&data), Distribution::STAR_STAR)?;
//!     let y = x.copy(Distribution::MC_MR);
//!     dmat::pca(&y, &Default::default())
//! });
//! ```

pub use ::dmat_core::*;
pub use ::dmat_comm::{Broadcast, SelfComm, ThreadComm, ThreadUniverse};
#[cfg(feature = "mpi-support")]
pub use ::dmat_comm::MpiComm;
pub use ::dmat_pca::{pca, Pca, PcaControl, PcaResult};

pub mod errors {
    pub use ::dmat_core::Error as CoreError;
    pub use ::dmat_pca::Error as PcaError;
}
