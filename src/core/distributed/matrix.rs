/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalMatrix};
use crate::redist::{self, Window};
use crate::{Distribution, Error, MatrixSize, ProcessGrid, Result, Scalar};

/// A dense matrix spread over the processes of a [`ProcessGrid`].
///
/// Every process holds one of these with the same global size and
/// distribution; each holds its own shard of the elements in `local`.
///
/// A `DistMatrix<'a, T>` with `'a` shorter than `'static` is a view whose
/// shard lives in a host array.
#[derive(Debug)]
pub struct DistMatrix<'a, T> {
    grid: ProcessGrid,
    dist: Distribution,
    size: MatrixSize,
    local: LocalMatrix<'a, T>,
}

impl<'a, T: Scalar> DistMatrix<'a, T> {
    /// A zero matrix of the given global size.
    pub fn new(grid: &ProcessGrid, size: MatrixSize, dist: Distribution) -> DistMatrix<'static, T> {
        let local = LocalMatrix::zeros(dist.local_size(size, grid));
        DistMatrix { grid: grid.clone(), dist, size, local }
    }

    /// Adopt `local` as this process's shard, taking its shape as the global size.
    ///
    /// This is the natural way to wrap data that every process holds in full
    /// (`[STAR,STAR]`).  For any distribution where the shards are smaller
    /// than the whole, use [`DistMatrix::make_view_with_size`].
    pub fn make_view(grid: &ProcessGrid, local: LocalMatrix<'a, T>, dist: Distribution) -> Result<Self> {
        let size = local.size();
        DistMatrix::make_view_with_size(grid, local, dist, size)
    }

    /// Adopt `local` as this process's shard of a matrix of global size `size`.
    ///
    /// Fails with [`Error::ShapeMismatch`] unless `local` has exactly the shape
    /// `dist` assigns to this process.
    pub fn make_view_with_size(
        grid: &ProcessGrid,
        local: LocalMatrix<'a, T>,
        dist: Distribution,
        size: MatrixSize,
    ) -> Result<Self> {
        let expected = dist.local_size(size, grid);
        if local.size() != expected {
            return Err(Error::ShapeMismatch { expected, found: local.size() });
        }
        Ok(DistMatrix { grid: grid.clone(), dist, size, local })
    }

    pub(crate) fn from_parts(grid: &ProcessGrid, dist: Distribution, size: MatrixSize, local: LocalBuffer<'a, T>) -> Self {
        debug_assert_eq!(local.size(), dist.local_size(size, grid));
        DistMatrix { grid: grid.clone(), dist, size, local: LocalMatrix::from_buffer(local) }
    }

    /// Global size.
    pub fn size(&self) -> MatrixSize { self.size }
    pub fn distribution(&self) -> Distribution { self.dist }
    pub fn grid(&self) -> &ProcessGrid { &self.grid }

    pub fn local(&self) -> &LocalMatrix<'a, T> { &self.local }

    /// Writable access to this process's shard.  Writes here are writes to the
    /// distributed matrix (and to the host array, for views).
    pub fn local_mut(&mut self) -> &mut LocalMatrix<'a, T> { &mut self.local }

    pub fn into_local(self) -> LocalMatrix<'a, T> { self.local }

    /// Whether this process can hold elements under this distribution.  A
    /// participating process may still hold none (e.g. of an empty matrix).
    pub fn participating(&self) -> bool { self.dist.participating(&self.grid) }

    pub fn global_row(&self, local_row: usize) -> usize { self.dist.row_axis(&self.grid).global_index(local_row) }
    pub fn global_col(&self, local_col: usize) -> usize { self.dist.col_axis(&self.grid).global_index(local_col) }

    /// Whether this process holds element `(i, j)`.
    pub fn owns(&self, i: usize, j: usize) -> bool {
        i < self.size.m && j < self.size.n
            && self.dist.row_axis(&self.grid).local_index(i).is_some()
            && self.dist.col_axis(&self.grid).local_index(j).is_some()
    }

    /// Redistribute into a new matrix.  The source is left untouched.
    ///
    /// # Collective
    pub fn copy(&self, dist: Distribution) -> DistMatrix<'static, T> {
        let local = redist::redistribute(&self.grid, self.dist, self.local.buffer(), dist, Window::full(self.size));
        DistMatrix::from_parts(&self.grid, dist, self.size, local)
    }

    /// An owned copy with the same distribution.
    pub fn duplicate(&self) -> DistMatrix<'static, T> {
        DistMatrix::from_parts(&self.grid, self.dist, self.size, self.local.buffer().to_owned())
    }

    /// # Collective
    pub(crate) fn copy_window(&self, window: Window) -> DistMatrix<'static, T> {
        let local = redist::redistribute(&self.grid, self.dist, self.local.buffer(), self.dist, window);
        DistMatrix::from_parts(&self.grid, self.dist, window.size, local)
    }
}
