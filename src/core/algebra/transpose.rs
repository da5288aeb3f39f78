/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalMatrix, LocalVector};
use crate::{DistMatrix, DistVector, Scalar};

/// Swap rows and columns.
pub trait Transpose {
    type Output;

    fn transpose(&self) -> Self::Output;
}

/// Transpose into a new, owned object.
///
/// A distributed matrix is transposed without communication: each process
/// transposes its own shard, and the row and column rules of the distribution
/// trade places.
pub fn transpose<X: Transpose + ?Sized>(x: &X) -> X::Output { x.transpose() }

impl<'a, T: Scalar> Transpose for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn transpose(&self) -> Self::Output { LocalMatrix::from_buffer(self.buffer().transposed()) }
}

impl<'a, T: Scalar> Transpose for LocalVector<'a, T> {
    type Output = LocalVector<'static, T>;

    fn transpose(&self) -> Self::Output { self.to_owned().flipped() }
}

impl<'a, T: Scalar> Transpose for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    fn transpose(&self) -> Self::Output {
        let grid = self.grid();
        let dist = self.distribution().transposed();
        let size = self.size().transposed();

        // Shards with nothing in them need not be n x m (think of the 0 x n
        // shards of CIRC), so build those from scratch.
        let expected = dist.local_size(size, grid);
        let local = match self.local().size().is_empty() {
            true => LocalBuffer::zeros(expected),
            false => self.local().buffer().transposed(),
        };
        DistMatrix::from_parts(grid, dist, size, local)
    }
}

impl<'a, T: Scalar> Transpose for DistVector<'a, T> {
    type Output = DistVector<'static, T>;

    fn transpose(&self) -> Self::Output { self.transposed() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::Orientation;
    use crate::{Distribution, MatrixSize, ProcessGrid};
    use ::dmat_comm::ThreadUniverse;
    use ::ndarray::arr2;
    use ::pretty_assertions::assert_eq;

    #[test]
    fn local_transpose() {
        let m = LocalMatrix::from_array(&arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]));
        let t = transpose(&m);
        assert_eq!(t.size(), MatrixSize::new(3, 2));
        assert_eq!(t.to_array(), arr2(&[[1.0, 4.0], [2.0, 5.0], [3.0, 6.0]]));
        assert_eq!(transpose(&t).as_slice(), m.as_slice());

        let v = LocalVector::from_vec(vec![1.0, 2.0], Orientation::Column);
        assert_eq!(transpose(&v).size(), MatrixSize::new(1, 2));
    }

    #[test]
    fn distributed_transpose_swaps_rules() {
        let m = arr2(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        ThreadUniverse::run(6, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let full = DistMatrix::make_view(&grid, LocalMatrix::from_array(&m), Distribution::STAR_STAR).unwrap();
            for &dist in Distribution::SUPPORTED {
                let x = full.copy(dist);
                let t = transpose(&x);
                assert_eq!(t.distribution(), dist.transposed());
                assert_eq!(t.copy(Distribution::STAR_STAR).local().to_array(), m.t());

                let tt = transpose(&t);
                assert_eq!(tt.distribution(), dist);
                assert_eq!(tt.local().as_slice(), x.local().as_slice());
            }
        });
    }
}
