/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Error, Result};

use ::dmat_comm::{Comm, Communicator};
use ::std::fmt;
use ::std::sync::Arc;

/// A two-dimensional arrangement of the processes of a communicator.
///
/// Ranks are laid out column-major: the process at grid position `(row, col)`
/// has rank `row + col * height`.  Rank 0 sits at `(0, 0)` and acts as root.
///
/// Cloning is cheap; clones refer to the same grid.
#[derive(Clone)]
pub struct ProcessGrid(Arc<GridInner>);

struct GridInner {
    comm: Comm,
    // processes in the same grid row, ranked by column
    row_comm: Comm,
    // processes in the same grid column, ranked by row
    col_comm: Comm,
    height: usize,
    width: usize,
    row: usize,
    col: usize,
}

/// Largest divisor of `size` that does not exceed its square root.
pub fn default_height(size: usize) -> usize {
    let mut height = 1;
    while (height + 1) * (height + 1) <= size {
        height += 1;
    }
    while height > 1 && size % height != 0 {
        height -= 1;
    }
    height
}

fn validate(comm: &dyn Communicator) -> Result<usize> {
    let (rank, size) = (comm.rank(), comm.size());
    if size == 0 {
        return Err(Error::InvalidCommunicator { reason: "communicator has no processes".into() });
    }
    if rank >= size {
        let reason = format!("rank {} is not below the group size {}", rank, size);
        return Err(Error::InvalidCommunicator { reason });
    }
    Ok(size)
}

impl ProcessGrid {
    /// Build the most nearly square grid.
    ///
    /// # Collective
    pub fn new(comm: Comm) -> Result<Self> {
        let size = validate(&*comm)?;
        Ok(ProcessGrid::build(comm, default_height(size)))
    }

    /// Build a grid with the given number of rows.
    ///
    /// # Collective
    pub fn with_height(comm: Comm, height: usize) -> Result<Self> {
        let size = validate(&*comm)?;
        if height == 0 || size % height != 0 {
            return Err(Error::InvalidGridShape { height, size });
        }
        Ok(ProcessGrid::build(comm, height))
    }

    fn build(comm: Comm, height: usize) -> Self {
        let size = comm.size();
        let width = size / height;
        let (row, col) = (comm.rank() % height, comm.rank() / height);

        let row_comm = comm.split(row, col);
        let col_comm = comm.split(col, row);
        debug!("Process {} of {} sits at ({}, {}) of a {}x{} grid", comm.rank(), size, row, col, height, width);

        ProcessGrid(Arc::new(GridInner { comm, row_comm, col_comm, height, width, row, col }))
    }

    pub fn height(&self) -> usize { self.0.height }
    pub fn width(&self) -> usize { self.0.width }
    pub fn size(&self) -> usize { self.0.height * self.0.width }

    /// Grid row of this process.
    pub fn row(&self) -> usize { self.0.row }
    /// Grid column of this process.
    pub fn col(&self) -> usize { self.0.col }

    pub fn rank(&self) -> usize { self.0.comm.rank() }

    /// Rank in the column-major ordering of the grid.  Same as `rank`.
    pub fn vc_rank(&self) -> usize { self.0.row + self.0.col * self.0.height }

    /// Rank in the row-major ordering of the grid.
    pub fn vr_rank(&self) -> usize { self.0.col + self.0.row * self.0.width }

    pub fn rank_of(&self, row: usize, col: usize) -> usize { row + col * self.0.height }

    pub fn coords_of(&self, rank: usize) -> (usize, usize) { (rank % self.0.height, rank / self.0.height) }

    pub fn comm(&self) -> &dyn Communicator { &*self.0.comm }
    pub fn row_comm(&self) -> &dyn Communicator { &*self.0.row_comm }
    pub fn col_comm(&self) -> &dyn Communicator { &*self.0.col_comm }

    /// Whether both handles refer to the same grid.  Clones of a grid are the
    /// same grid; two grids built separately are not, even from one communicator.
    pub fn is_same(&self, other: &ProcessGrid) -> bool { Arc::ptr_eq(&self.0, &other.0) }

    pub(crate) fn ensure_same(&self, other: &ProcessGrid) -> Result<()> {
        match self.is_same(other) {
            true => Ok(()),
            false => Err(Error::GridMismatch),
        }
    }
}

impl fmt::Debug for ProcessGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessGrid")
            .field("height", &self.height())
            .field("width", &self.width())
            .field("row", &self.row())
            .field("col", &self.col())
            .finish()
    }
}
