/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::dmat::{DistMatrix, DistVector, Distribution, LocalMatrix, ProcessGrid, Scalar, ThreadUniverse};
use ::ndarray::{Array1, Array2};

/// Process counts for multi-process tests.  Includes square, non-square and prime grids.
pub const GRID_SIZES: &[usize] = &[1, 2, 3, 4, 6];

/// Run `f` on a grid of each size in [`GRID_SIZES`].
pub fn on_every_grid<F>(f: F)
where F: Fn(&ProcessGrid) + Sync,
{
    for &nprocs in GRID_SIZES {
        ThreadUniverse::run(nprocs, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            f(&grid)
        });
    }
}

/// Give every process the whole matrix, then redistribute.
pub fn distribute<T: Scalar>(grid: &ProcessGrid, data: &Array2<T>, dist: Distribution) -> DistMatrix<'static, T> {
    DistMatrix::make_view(grid, LocalMatrix::from_array(data), Distribution::STAR_STAR)
        .unwrap()
        .copy(dist)
}

/// Give every process the whole matrix.
pub fn gather<T: Scalar>(x: &DistMatrix<'_, T>) -> Array2<T> {
    x.copy(Distribution::STAR_STAR).local().to_array()
}

pub fn gather_vector<T: Scalar>(x: &DistVector<'_, T>) -> Array1<T> {
    x.copy(Distribution::STAR_STAR).local().to_array()
}

/// Values that differ from each other in every dtype.
pub fn distinct_of<T: Scalar>(m: usize, n: usize) -> Array2<T> {
    super::datasets::distinct(m, n).mapv(T::from_real)
}
