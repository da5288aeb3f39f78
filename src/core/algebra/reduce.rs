/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Per-column reductions and scalings, as needed for centering and
//! normalizing data.

use crate::local::{LocalBuffer, LocalMatrix, LocalVector, Orientation};
use crate::scalar::{decode, encode};
use crate::{DistMatrix, DistVector, Distribution, Error, MatrixSize, Result, Scalar};

pub trait ColumnSums {
    type Output;

    /// Sum of each column, as a row vector.
    ///
    /// # Collective
    ///
    /// For distributed matrices, where the result is `[STAR,STAR]`.
    fn column_sums(&self) -> Self::Output;

    /// Sum of `|x|^2` over each column, as a row vector.
    fn column_square_sums(&self) -> Self::Output;
}

pub trait ScaleColumns<Factors: ?Sized> {
    type Output;

    /// Multiply column `j` by `factors[j]`.
    fn scale_columns(&self, factors: &Factors) -> Result<Self::Output>;
}

// Sum `f(x)` over each column of a shard; entry `k` is for the k-th global column.
fn shard_column_sums<T: Scalar>(
    shard: &LocalBuffer<'_, T>,
    ncols: usize,
    global_col: impl Fn(usize) -> usize,
    f: impl Fn(T) -> T,
) -> Vec<T> {
    let mut sums = vec![T::zero(); ncols];
    let local = shard.size();
    for lj in 0..local.n {
        let sum = &mut sums[global_col(lj)];
        for li in 0..local.m {
            *sum += f(shard.get(li, lj));
        }
    }
    sums
}

fn check_factors(size: MatrixSize, factors: MatrixSize) -> Result<()> {
    let expected = Orientation::Row.size_of(size.n);
    match factors == expected {
        true => Ok(()),
        false => Err(Error::ShapeMismatch { expected, found: factors }),
    }
}

fn scale_shard<T: Scalar>(
    shard: &LocalBuffer<'_, T>,
    factors: &[T],
    global_col: impl Fn(usize) -> usize,
) -> LocalBuffer<'static, T> {
    let local = shard.size();
    let mut data = Vec::with_capacity(local.len());
    for lj in 0..local.n {
        let factor = factors[global_col(lj)];
        for li in 0..local.m {
            data.push(shard.get(li, lj) * factor);
        }
    }
    LocalBuffer::owned(local, data)
}

impl<'a, T: Scalar> ColumnSums for LocalMatrix<'a, T> {
    type Output = LocalVector<'static, T>;

    fn column_sums(&self) -> Self::Output {
        let sums = shard_column_sums(self.buffer(), self.size().n, |j| j, |x| x);
        LocalVector::from_vec(sums, Orientation::Row)
    }

    fn column_square_sums(&self) -> Self::Output {
        let sums = shard_column_sums(self.buffer(), self.size().n, |j| j, T::norm_sqr);
        LocalVector::from_vec(sums, Orientation::Row)
    }
}

impl<'a, T: Scalar> DistMatrix<'a, T> {
    fn reduce_columns(&self, f: impl Fn(T) -> T) -> DistVector<'static, T> {
        let grid = self.grid();
        let n = self.size().n;

        // replicated elements must only be counted once
        let sums = match self.distribution().is_canonical_holder(grid) {
            true => shard_column_sums(self.local().buffer(), n, |j| self.global_col(j), f),
            false => vec![T::zero(); n],
        };

        let mut parts = encode(&sums);
        grid.comm().all_reduce_sum(&mut parts);
        let sums = LocalVector::from_vec(decode(&parts), Orientation::Row);
        DistVector::from_parts(grid, Distribution::STAR_STAR, n, Orientation::Row, sums.into_buffer())
    }
}

impl<'a, T: Scalar> ColumnSums for DistMatrix<'a, T> {
    type Output = DistVector<'static, T>;

    fn column_sums(&self) -> Self::Output { self.reduce_columns(|x| x) }

    fn column_square_sums(&self) -> Self::Output { self.reduce_columns(T::norm_sqr) }
}

impl<'a, 'v, T: Scalar> ScaleColumns<LocalVector<'v, T>> for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn scale_columns(&self, factors: &LocalVector<'v, T>) -> Result<Self::Output> {
        check_factors(self.size(), factors.size())?;
        Ok(LocalMatrix::from_buffer(scale_shard(self.buffer(), factors.as_slice(), |j| j)))
    }
}

impl<'a, 'v, T: Scalar> ScaleColumns<DistVector<'v, T>> for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    /// # Collective
    fn scale_columns(&self, factors: &DistVector<'v, T>) -> Result<Self::Output> {
        check_factors(self.size(), factors.size())?;
        self.grid().ensure_same(factors.grid())?;

        let replicated;
        let factors = match factors.distribution() == Distribution::STAR_STAR {
            true => factors.local().as_slice(),
            false => {
                replicated = factors.copy(Distribution::STAR_STAR);
                replicated.local().as_slice()
            },
        };
        let local = scale_shard(self.local().buffer(), factors, |j| self.global_col(j));
        Ok(DistMatrix::from_parts(self.grid(), self.distribution(), self.size(), local))
    }
}
