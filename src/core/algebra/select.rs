/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalMatrix};
use crate::redist::Window;
use crate::{DistMatrix, MatrixRange, Result, Scalar};

/// Extraction of a rectangular block.
pub trait Select {
    type Output;

    fn select(&self, range: MatrixRange) -> Result<Self::Output>;
}

/// Copy out the block described by `range`.
///
/// `range` may be a `(MatrixIndex, MatrixSize)` pair (first element and shape)
/// or a `(MatrixIndex, MatrixIndex)` pair (first and last element, inclusive).
/// Fails with [`Error::IndexOutOfRange`](crate::Error::IndexOutOfRange) if the
/// block does not fit.
///
/// A distributed block keeps the distribution of its source.
///
/// # Collective
///
/// For distributed matrices.
pub fn select<X, R>(x: &X, range: R) -> Result<X::Output>
where
    X: Select + ?Sized,
    R: Into<MatrixRange>,
{ x.select(range.into()) }

impl<'a, T: Scalar> Select for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn select(&self, range: MatrixRange) -> Result<Self::Output> {
        let (first, size) = range.resolve(self.size())?;

        let mut data = Vec::with_capacity(size.len());
        for j in first.n..first.n + size.n {
            for i in first.m..first.m + size.m {
                data.push(self.get(i, j));
            }
        }
        Ok(LocalMatrix::from_buffer(LocalBuffer::owned(size, data)))
    }
}

impl<'a, T: Scalar> Select for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    fn select(&self, range: MatrixRange) -> Result<Self::Output> {
        let (offset, size) = range.resolve(self.size())?;
        Ok(self.copy_window(Window { offset, size }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Distribution, Error, MatrixIndex, MatrixSize, ProcessGrid};
    use ::dmat_comm::ThreadUniverse;
    use ::ndarray::{arr2, s, Array2};
    use ::pretty_assertions::assert_eq;

    fn example() -> Array2<f64> {
        Array2::from_shape_fn((5, 4), |(i, j)| (10 * i + j) as f64)
    }

    #[test]
    fn local_select() {
        let m = LocalMatrix::from_array(&example());
        let block = select(&m, (MatrixIndex::new(1, 2), MatrixSize::new(3, 2))).unwrap();
        assert_eq!(block.to_array(), example().slice(s![1..4, 2..4]));

        let same = select(&m, (MatrixIndex::new(1, 2), MatrixIndex::new(3, 3))).unwrap();
        assert_eq!(same.as_slice(), block.as_slice());

        let range = (MatrixIndex::new(4, 0), MatrixSize::new(2, 1));
        match select(&m, range) {
            Err(Error::IndexOutOfRange { bounds, .. }) => assert_eq!(bounds, MatrixSize::new(5, 4)),
            other => panic!("unexpected: {:?}", other.map(|m| m.size())),
        }
    }

    #[test]
    fn distributed_select_keeps_distribution() {
        let expected = example().slice(s![1..4, 1..3]).to_owned();
        ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let full = DistMatrix::make_view(&grid, LocalMatrix::from_array(&example()), Distribution::STAR_STAR).unwrap();
            for &dist in Distribution::SUPPORTED {
                let x = full.copy(dist);
                let block = select(&x, (MatrixIndex::new(1, 1), MatrixSize::new(3, 2))).unwrap();
                assert_eq!(block.distribution(), dist);
                assert_eq!(block.size(), MatrixSize::new(3, 2));
                assert_eq!(block.copy(Distribution::STAR_STAR).local().to_array(), expected, "{}", dist);
            }
        });
    }
}
