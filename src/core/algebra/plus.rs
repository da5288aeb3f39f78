/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::algebra::Expression;
use crate::local::{LocalBuffer, LocalMatrix, LocalVector, Orientation};
use crate::{DistMatrix, DistVector, Distribution, Error, MatrixSize, Result, Scalar};

/// Elementwise addition.
///
/// The result is always a new, owned object; neither operand is modified.
pub trait Plus<Rhs> {
    type Output;

    fn plus(&self, rhs: Rhs) -> Result<Self::Output>;
}

/// `lhs + rhs`, for a matrix and a matrix, a scalar, or an [`expand`](crate::algebra::expand)ed vector.
///
/// # Collective
///
/// For distributed operands.
pub fn plus<L, R>(lhs: &L, rhs: R) -> Result<L::Output>
where L: Plus<R> + ?Sized,
{ lhs.plus(rhs) }

fn check_same_size(lhs: MatrixSize, rhs: MatrixSize) -> Result<()> {
    match lhs == rhs {
        true => Ok(()),
        false => Err(Error::ShapeMismatch { expected: lhs, found: rhs }),
    }
}

fn add_elementwise<T: Scalar>(a: &LocalBuffer<'_, T>, b: &LocalBuffer<'_, T>) -> LocalBuffer<'static, T> {
    let data = a.as_slice().iter().zip(b.as_slice()).map(|(&x, &y)| x + y).collect();
    LocalBuffer::owned(a.size(), data)
}

fn add_scalar<T: Scalar>(a: &LocalBuffer<'_, T>, s: T) -> LocalBuffer<'static, T> {
    let data = a.as_slice().iter().map(|&x| x + s).collect();
    LocalBuffer::owned(a.size(), data)
}

/// Add `v[index]` to every element, where `index` is the global row (for a
/// column vector) or column (for a row vector) of the element.
fn add_broadcast<T: Scalar>(
    a: &LocalBuffer<'_, T>,
    v: &[T],
    orientation: Orientation,
    global_row: impl Fn(usize) -> usize,
    global_col: impl Fn(usize) -> usize,
) -> LocalBuffer<'static, T> {
    let local = a.size();
    let mut data = Vec::with_capacity(local.len());
    for lj in 0..local.n {
        for li in 0..local.m {
            let k = match orientation {
                Orientation::Column => global_row(li),
                Orientation::Row => global_col(lj),
            };
            data.push(a.get(li, lj) + v[k]);
        }
    }
    LocalBuffer::owned(local, data)
}

impl<'a, 'r, 'b, T: Scalar> Plus<&'r LocalMatrix<'b, T>> for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn plus(&self, rhs: &'r LocalMatrix<'b, T>) -> Result<Self::Output> {
        check_same_size(self.size(), rhs.size())?;
        Ok(LocalMatrix::from_buffer(add_elementwise(self.buffer(), rhs.buffer())))
    }
}

impl<'a, T: Scalar> Plus<T> for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn plus(&self, rhs: T) -> Result<Self::Output> {
        Ok(LocalMatrix::from_buffer(add_scalar(self.buffer(), rhs)))
    }
}

impl<'a, 'e, 'v, T: Scalar> Plus<Expression<'e, LocalVector<'v, T>>> for LocalMatrix<'a, T> {
    type Output = LocalMatrix<'static, T>;

    fn plus(&self, rhs: Expression<'e, LocalVector<'v, T>>) -> Result<Self::Output> {
        check_same_size(self.size(), rhs.size())?;
        match rhs {
            Expression::Expand { vector, .. } => {
                let out = add_broadcast(self.buffer(), vector.as_slice(), vector.orientation(), |i| i, |j| j);
                Ok(LocalMatrix::from_buffer(out))
            },
        }
    }
}

impl<'a, 'r, 'b, T: Scalar> Plus<&'r DistMatrix<'b, T>> for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    /// The right operand is first redistributed to match the left, if needed.
    fn plus(&self, rhs: &'r DistMatrix<'b, T>) -> Result<Self::Output> {
        check_same_size(self.size(), rhs.size())?;
        self.grid().ensure_same(rhs.grid())?;

        let dist = self.distribution();
        let converted;
        let rhs_local = match rhs.distribution() == dist {
            true => rhs.local().buffer(),
            false => {
                converted = rhs.copy(dist);
                converted.local().buffer()
            },
        };
        let local = add_elementwise(self.local().buffer(), rhs_local);
        Ok(DistMatrix::from_parts(self.grid(), dist, self.size(), local))
    }
}

impl<'a, T: Scalar> Plus<T> for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    fn plus(&self, rhs: T) -> Result<Self::Output> {
        let local = add_scalar(self.local().buffer(), rhs);
        Ok(DistMatrix::from_parts(self.grid(), self.distribution(), self.size(), local))
    }
}

impl<'a, 'e, 'v, T: Scalar> Plus<Expression<'e, DistVector<'v, T>>> for DistMatrix<'a, T> {
    type Output = DistMatrix<'static, T>;

    /// # Collective
    ///
    /// The vector is replicated onto every process before it is added.
    fn plus(&self, rhs: Expression<'e, DistVector<'v, T>>) -> Result<Self::Output> {
        check_same_size(self.size(), rhs.size())?;
        match rhs {
            Expression::Expand { vector, .. } => {
                self.grid().ensure_same(vector.grid())?;
                let replicated;
                let full = match vector.distribution() == Distribution::STAR_STAR {
                    true => vector.local().as_slice(),
                    false => {
                        replicated = vector.copy(Distribution::STAR_STAR);
                        replicated.local().as_slice()
                    },
                };

                let local = add_broadcast(
                    self.local().buffer(),
                    full,
                    vector.orientation(),
                    |i| self.global_row(i),
                    |j| self.global_col(j),
                );
                Ok(DistMatrix::from_parts(self.grid(), self.distribution(), self.size(), local))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::expand;
    use crate::ProcessGrid;
    use ::dmat_comm::ThreadUniverse;
    use ::ndarray::arr2;
    use ::pretty_assertions::assert_eq;

    fn m22() -> LocalMatrix<'static, f64> { LocalMatrix::from_array(&arr2(&[[1.0, 2.0], [3.0, 4.0]])) }

    #[test]
    fn local_plus_expanded_row() {
        let m = m22();
        let v = LocalVector::from_vec(vec![10.0, 20.0], Orientation::Row);
        let out = plus(&m, expand(&v, m.size()).unwrap()).unwrap();
        assert_eq!(out.to_array(), arr2(&[[11.0, 22.0], [13.0, 24.0]]));
    }

    #[test]
    fn local_plus_expanded_column() {
        let m = m22();
        let v = LocalVector::from_vec(vec![10.0, 20.0], Orientation::Column);
        let out = plus(&m, expand(&v, m.size()).unwrap()).unwrap();
        assert_eq!(out.to_array(), arr2(&[[11.0, 12.0], [23.0, 24.0]]));
    }

    #[test]
    fn expand_checks_length() {
        let v = LocalVector::from_vec(vec![10.0, 20.0, 30.0], Orientation::Row);
        match expand(&v, MatrixSize::new(2, 2)) {
            Err(Error::ShapeMismatch { expected, found }) => {
                assert_eq!(expected, MatrixSize::new(1, 2));
                assert_eq!(found, MatrixSize::new(1, 3));
            },
            other => panic!("unexpected: {:?}", other.map(|e| e.size())),
        }
    }

    #[test]
    fn local_plus_matrix_and_scalar() {
        let m = m22();
        assert_eq!(plus(&m, &m).unwrap().to_array(), arr2(&[[2.0, 4.0], [6.0, 8.0]]));
        assert_eq!(plus(&m, 0.5).unwrap().to_array(), arr2(&[[1.5, 2.5], [3.5, 4.5]]));

        let tall = LocalMatrix::<f64>::zeros(MatrixSize::new(3, 2));
        assert!(plus(&m, &tall).is_err());
    }

    #[test]
    fn distributed_plus_matches_local() {
        let expected = arr2(&[[11.0, 22.0], [13.0, 24.0]]);
        ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let m = DistMatrix::make_view(&grid, m22(), Distribution::STAR_STAR).unwrap().copy(Distribution::MC_MR);
            let v = LocalVector::from_vec(vec![10.0, 20.0], Orientation::Row);
            let v = DistVector::make_view(&grid, v, Distribution::STAR_STAR).unwrap().copy(Distribution::STAR_VR);

            let out = plus(&m, expand(&v, m.size()).unwrap()).unwrap();
            assert_eq!(out.distribution(), Distribution::MC_MR);
            assert_eq!(out.copy(Distribution::STAR_STAR).local().to_array(), expected);

            // mixed distributions: the right side follows the left
            let other = m.copy(Distribution::VC_STAR);
            let doubled = plus(&m, &other).unwrap();
            assert_eq!(doubled.distribution(), Distribution::MC_MR);
            assert_eq!(doubled.copy(Distribution::STAR_STAR).local().to_array(), arr2(&[[2.0, 4.0], [6.0, 8.0]]));
        });
    }
}
