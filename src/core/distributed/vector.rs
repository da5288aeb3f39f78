/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalVector, Orientation};
use crate::redist::{self, Window};
use crate::{Distribution, Error, MatrixSize, ProcessGrid, Result, Scalar};

/// A vector spread over the processes of a [`ProcessGrid`].
///
/// Behaves like a `len x 1` (column) or `1 x len` (row) [`DistMatrix`](crate::DistMatrix).
#[derive(Debug)]
pub struct DistVector<'a, T> {
    grid: ProcessGrid,
    dist: Distribution,
    length: usize,
    local: LocalVector<'a, T>,
}

impl<'a, T: Scalar> DistVector<'a, T> {
    pub fn new(grid: &ProcessGrid, length: usize, orientation: Orientation, dist: Distribution) -> DistVector<'static, T> {
        let local_len = dist.local_size(orientation.size_of(length), grid).len();
        let local = LocalVector::zeros(local_len, orientation);
        DistVector { grid: grid.clone(), dist, length, local }
    }

    /// Adopt `local` as this process's shard, taking its length as the global length.
    pub fn make_view(grid: &ProcessGrid, local: LocalVector<'a, T>, dist: Distribution) -> Result<Self> {
        let length = local.length();
        DistVector::make_view_with_length(grid, local, dist, length)
    }

    /// Adopt a vector that every process holds in full, as `[STAR,STAR]`.
    pub fn replicated(grid: &ProcessGrid, local: LocalVector<'a, T>) -> Self {
        let length = local.length();
        DistVector { grid: grid.clone(), dist: Distribution::STAR_STAR, length, local }
    }

    /// Adopt `local` as this process's shard of a vector of global length `length`.
    pub fn make_view_with_length(grid: &ProcessGrid, local: LocalVector<'a, T>, dist: Distribution, length: usize) -> Result<Self> {
        let orientation = local.orientation();
        let expected = dist.local_size(orientation.size_of(length), grid);
        // an empty shard may be either 0 x 1 or 1 x 0
        if local.length() != expected.len() || (!expected.is_empty() && local.size() != expected) {
            return Err(Error::ShapeMismatch { expected, found: local.size() });
        }
        Ok(DistVector { grid: grid.clone(), dist, length, local })
    }

    pub(crate) fn from_parts(
        grid: &ProcessGrid,
        dist: Distribution,
        length: usize,
        orientation: Orientation,
        local: LocalBuffer<'a, T>,
    ) -> Self {
        match LocalVector::from_buffer(local, orientation) {
            Ok(local) => DistVector { grid: grid.clone(), dist, length, local },
            Err(e) => panic!("BUG! redistributed vector shard has the wrong shape: {}", e),
        }
    }

    pub fn length(&self) -> usize { self.length }
    pub fn orientation(&self) -> Orientation { self.local.orientation() }

    /// Global size as a matrix.
    pub fn size(&self) -> MatrixSize { self.orientation().size_of(self.length) }

    pub fn distribution(&self) -> Distribution { self.dist }
    pub fn grid(&self) -> &ProcessGrid { &self.grid }

    pub fn local(&self) -> &LocalVector<'a, T> { &self.local }
    pub fn local_mut(&mut self) -> &mut LocalVector<'a, T> { &mut self.local }
    pub fn into_local(self) -> LocalVector<'a, T> { self.local }

    /// See [`DistMatrix::participating`](crate::DistMatrix::participating).
    pub fn participating(&self) -> bool { self.dist.participating(&self.grid) }

    /// Global index of the `k`th locally held element.
    pub fn global_index(&self, k: usize) -> usize {
        match self.orientation() {
            Orientation::Column => self.dist.row_axis(&self.grid).global_index(k),
            Orientation::Row => self.dist.col_axis(&self.grid).global_index(k),
        }
    }

    /// Redistribute into a new vector.  The source is left untouched.
    ///
    /// # Collective
    pub fn copy(&self, dist: Distribution) -> DistVector<'static, T> {
        let buffer = self.matrix_shard();
        let local = redist::redistribute(&self.grid, self.dist, &buffer, dist, Window::full(self.size()));
        DistVector::from_parts(&self.grid, dist, self.length, self.orientation(), local)
    }

    pub fn duplicate(&self) -> DistVector<'static, T> {
        DistVector { grid: self.grid.clone(), dist: self.dist, length: self.length, local: self.local.to_owned() }
    }

    /// Flip orientation, keeping every element where it is.
    pub fn transposed(&self) -> DistVector<'static, T> {
        DistVector {
            grid: self.grid.clone(),
            dist: self.dist.transposed(),
            length: self.length,
            local: self.local.to_owned().flipped(),
        }
    }

    // The shard as the redistribution engine expects it: with the exact
    // matrix shape the distribution assigns to this process.
    fn matrix_shard(&self) -> LocalBuffer<'_, T> {
        let shape = self.dist.local_size(self.size(), &self.grid);
        LocalBuffer::locked(shape, self.local.as_slice())
    }
}
