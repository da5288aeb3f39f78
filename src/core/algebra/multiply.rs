/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::LocalMatrix;
use crate::scalar::{decode, encode};
use crate::{DistMatrix, Distribution, Error, MatrixSize, Result, Scalar};

/// Matrix product.
pub trait Multiply<Rhs> {
    type Output;

    fn multiply(&self, rhs: Rhs) -> Result<Self::Output>;
}

/// The matrix product `a * b`.
///
/// Fails with [`Error::ShapeMismatch`] if the inner dimensions differ.
///
/// # Collective
///
/// For distributed operands.  The product has the distribution of `a`.
pub fn multiply<A, B>(a: &A, b: B) -> Result<A::Output>
where A: Multiply<B> + ?Sized,
{ a.multiply(b) }

fn check_inner(a: MatrixSize, b: MatrixSize) -> Result<()> {
    match a.n == b.m {
        true => Ok(()),
        false => Err(Error::ShapeMismatch { expected: MatrixSize::new(a.n, b.n), found: b }),
    }
}

impl<'a, 'r, 'b, T: Scalar> Multiply<&'r LocalMatrix<'b, T>> for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn multiply(&self, rhs: &'r LocalMatrix<'b, T>) -> Result<Self::Output> {
        check_inner(self.size(), rhs.size())?;
        Ok(LocalMatrix::from_array(&self.view().dot(&rhs.view())))
    }
}

impl<'a, 'r, 'b, T: Scalar> Multiply<&'r DistMatrix<'b, T>> for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    /// Each process multiplies a slab of columns of `a` by the matching slab
    /// of rows of `b`; the partial products are then summed everywhere.
    fn multiply(&self, rhs: &'r DistMatrix<'b, T>) -> Result<Self::Output> {
        check_inner(self.size(), rhs.size())?;
        self.grid().ensure_same(rhs.grid())?;
        let grid = self.grid();
        let size = MatrixSize::new(self.size().m, rhs.size().n);

        let a = self.copy(Distribution::STAR_VC);
        let b = rhs.copy(Distribution::VC_STAR);
        let partial = a.local().view().dot(&b.local().view());

        let partial = LocalMatrix::from_array(&partial);
        let mut parts = encode(partial.as_slice());
        grid.comm().all_reduce_sum(&mut parts);

        let product = LocalMatrix::from_column_major(size, decode(&parts))?;
        let product = DistMatrix::make_view(grid, product, Distribution::STAR_STAR)?;
        Ok(match self.distribution() {
            Distribution::STAR_STAR => product,
            dist => product.copy(dist),
        })
    }
}
