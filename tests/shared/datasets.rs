/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use ::ndarray::{arr2, Array2};

pub fn tiny() -> Array2<f64> {
    arr2(&[
        [1.0, 2.0],
        [3.0, 4.0],
    ])
}

/// Three samples of three features.
pub fn pca_3x3() -> Array2<f64> {
    arr2(&[
        [2.0, 0.0, -1.4],
        [2.2, 0.2, -1.5],
        [2.4, 0.1, -1.0],
    ])
}

/// More samples than features, with mixed scales.
pub fn pca_7x4() -> Array2<f64> {
    arr2(&[
        [ 4.0, 120.0, 0.31, -2.0],
        [ 2.5, 140.0, 0.27, -1.0],
        [ 3.1,  95.0, 0.45,  0.5],
        [ 5.6, 160.0, 0.12, -3.5],
        [ 1.2,  80.0, 0.58,  2.0],
        [ 3.3, 115.0, 0.33, -0.5],
        [ 4.4, 130.0, 0.25, -2.5],
    ])
}

/// Every element different, so misplaced elements get noticed.
pub fn distinct(m: usize, n: usize) -> Array2<f64> {
    Array2::from_shape_fn((m, n), |(i, j)| (100 * i + j) as f64 + 0.5)
}
