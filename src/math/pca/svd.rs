/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! The part of PCA that happens on a single process.

use crate::{Error, Result};

use ::dmat_core::{LocalMatrix, MatrixSize, RealScalar};
use ::nalgebra::{DMatrix, DVector};
use ::std::cmp::Ordering;

/// Principal components of a prepared (centered and scaled) data matrix.
#[derive(Debug, Clone)]
pub(crate) struct Components {
    /// `n x ncomp`, orthonormal columns.
    pub coeff: DMatrix<f64>,
    /// `m x ncomp`
    pub score: DMatrix<f64>,
    pub latent: Vec<f64>,
}

pub(crate) fn num_components(size: MatrixSize, economy: bool) -> usize {
    match economy {
        true => usize::min(size.m, size.n),
        false => size.n,
    }
}

pub(crate) fn to_dmatrix<T: RealScalar>(x: &LocalMatrix<'_, T>) -> DMatrix<f64> {
    let MatrixSize { m, n } = x.size();
    DMatrix::from_iterator(m, n, x.as_slice().iter().map(|&v| v.to_f64()))
}

pub(crate) fn from_dmatrix<T: RealScalar>(x: &DMatrix<f64>) -> Result<LocalMatrix<'static, T>> {
    let size = MatrixSize::new(x.nrows(), x.ncols());
    Ok(LocalMatrix::from_column_major(size, x.iter().map(|&v| T::from_f64(v)).collect())?)
}

/// Compute `score = U * S`, `coeff = V` and `latent = S^2 / (m - 1)`, with
/// components sorted by decreasing singular value.
///
/// With `economy`, there are `min(m, n)` components.  Otherwise `V` is extended
/// to a basis of all `n` dimensions, and the extra components have zero score.
pub(crate) fn decompose(data: DMatrix<f64>, economy: bool) -> Result<Components> {
    let (m, n) = data.shape();
    let k = usize::min(m, n);
    let ncomp = num_components(MatrixSize::new(m, n), economy);

    let (u, s, v) = match k {
        0 => (DMatrix::zeros(m, 0), vec![], DMatrix::zeros(n, 0)),
        _ => {
            let svd = data.try_svd(true, true, ::std::f64::EPSILON, 0).ok_or(Error::NoConvergence)?;
            let u = svd.u.ok_or(Error::NoConvergence)?;
            let v_t = svd.v_t.ok_or(Error::NoConvergence)?;
            (u, svd.singular_values.iter().cloned().collect::<Vec<_>>(), v_t.transpose())
        },
    };

    let mut order: Vec<usize> = (0..k).collect();
    order.sort_by(|&a, &b| s[b].partial_cmp(&s[a]).unwrap_or(Ordering::Equal));

    let denom = usize::max(m.saturating_sub(1), 1) as f64;
    let mut basis = Vec::with_capacity(n);
    let mut score = DMatrix::zeros(m, ncomp);
    let mut latent = vec![0.0; ncomp];
    for (c, &j) in order.iter().enumerate() {
        let mut vj = v.column(j).clone_owned();
        let mut uj = u.column(j).clone_owned();
        if vj[vj.iamax()] < 0.0 {
            vj.neg_mut();
            uj.neg_mut();
        }
        score.set_column(c, &(uj * s[j]));
        latent[c] = s[j] * s[j] / denom;
        basis.push(vj);
    }
    complete_basis(&mut basis, n, ncomp);

    let mut coeff = DMatrix::zeros(n, ncomp);
    for (c, vc) in basis.iter().enumerate() {
        coeff.set_column(c, vc);
    }
    Ok(Components { coeff, score, latent })
}

// Gram-Schmidt against the standard basis, until there are `target` vectors.
fn complete_basis(basis: &mut Vec<DVector<f64>>, n: usize, target: usize) {
    for i in 0..n {
        if basis.len() >= target {
            break;
        }
        let mut e = DVector::zeros(n);
        e[i] = 1.0;
        for _ in 0..2 {
            for b in basis.iter() {
                let overlap = b.dot(&e);
                e -= b * overlap;
            }
        }
        let norm = e.norm();
        if norm > 1e-6 {
            e /= norm;
            if e[e.iamax()] < 0.0 {
                e.neg_mut();
            }
            basis.push(e);
        }
    }
}

/// Sample standard deviation of each column from its sum of squares, with 1
/// standing in for columns that do not vary.
pub(crate) fn column_scales(square_sums: &[f64], m: usize) -> Vec<f64> {
    let denom = usize::max(m.saturating_sub(1), 1) as f64;
    square_sums.iter()
        .map(|&sq| (sq / denom).sqrt())
        .map(|std| if std > 0.0 { std } else { 1.0 })
        .collect()
}

pub(crate) fn column_means(sums: &[f64], m: usize) -> Vec<f64> {
    match m {
        0 => vec![0.0; sums.len()],
        _ => sums.iter().map(|&s| s / m as f64).collect(),
    }
}

/// Undo the scaling of the data in the loadings, so that
/// `score * coeff^T` reproduces the unscaled (centered) data.
pub(crate) fn unscale(coeff: &mut DMatrix<f64>, scales: &[f64]) {
    for j in 0..coeff.ncols() {
        for (i, &scale) in scales.iter().enumerate() {
            coeff[(i, j)] *= scale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::dmat_assert_close::assert_close;
    use ::pretty_assertions::assert_eq;

    fn data() -> DMatrix<f64> {
        DMatrix::from_row_slice(4, 3, &[
            2.0, 0.5, -1.0,
            1.0, 1.5, 0.0,
            -3.0, 0.0, 2.0,
            0.0, -2.0, -1.0,
        ])
    }

    #[test]
    fn components_reproduce_data() {
        let x = data();
        let out = decompose(x.clone(), true).unwrap();
        assert_eq!(out.coeff.shape(), (3, 3));
        assert_eq!(out.score.shape(), (4, 3));

        let back = &out.score * out.coeff.transpose();
        assert_close!(abs=1e-10, back.as_slice(), x.as_slice());

        let gram = out.coeff.transpose() * &out.coeff;
        let identity = DMatrix::<f64>::identity(3, 3);
        assert_close!(abs=1e-10, gram.as_slice(), identity.as_slice());

        for w in out.latent.windows(2) {
            assert!(w[0] >= w[1]);
        }
        for c in 0..3 {
            let col = out.coeff.column(c);
            assert!(col[col.iamax()] > 0.0);
        }
    }

    #[test]
    fn full_mode_completes_the_basis() {
        let x = data().transpose(); // 3 x 4
        let out = decompose(x.clone(), false).unwrap();
        assert_eq!(out.coeff.shape(), (4, 4));
        assert_eq!(out.score.shape(), (3, 4));
        assert_eq!(out.latent.len(), 4);
        assert_eq!(out.latent[3], 0.0);
        assert!(out.score.column(3).iter().all(|&x| x == 0.0));

        let gram = out.coeff.transpose() * &out.coeff;
        let identity = DMatrix::<f64>::identity(4, 4);
        assert_close!(abs=1e-10, gram.as_slice(), identity.as_slice());

        let back = &out.score * out.coeff.transpose();
        assert_close!(abs=1e-10, back.as_slice(), x.as_slice());

        let economy = decompose(x, true).unwrap();
        assert_eq!(economy.coeff.shape(), (4, 3));
    }

    #[test]
    fn empty_data() {
        let out = decompose(DMatrix::zeros(0, 2), false).unwrap();
        assert_eq!(out.coeff, DMatrix::identity(2, 2));
        assert_eq!(out.latent, vec![0.0, 0.0]);

        let out = decompose(DMatrix::zeros(0, 2), true).unwrap();
        assert_eq!(out.coeff.shape(), (2, 0));
    }

    #[test]
    fn scales_and_means() {
        assert_eq!(column_scales(&[8.0, 0.0], 3), vec![2.0, 1.0]);
        assert_eq!(column_means(&[6.0, -3.0], 3), vec![2.0, -1.0]);
        assert_eq!(column_means(&[0.0], 0), vec![0.0]);
    }
}
