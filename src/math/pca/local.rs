/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::svd;
use crate::{Pca, PcaControl, PcaResult, Result};

use ::dmat_core::algebra::{expand, ColumnSums, Plus, ScaleColumns};
use ::dmat_core::{LocalMatrix, LocalVector, Orientation, RealScalar};

pub(crate) fn to_f64s<T: RealScalar>(xs: &[T]) -> Vec<f64> { xs.iter().map(|&x| x.to_f64()).collect() }
pub(crate) fn from_f64s<T: RealScalar>(xs: &[f64]) -> Vec<T> { xs.iter().map(|&x| T::from_f64(x)).collect() }

impl<'a, T: RealScalar> Pca for LocalMatrix<'a, T> {
    type Output = PcaResult<LocalMatrix<'static, T>, LocalVector<'static, T>>;

    fn pca(&self, control: &PcaControl) -> Result<Self::Output> {
        let size = self.size();

        let (mean, centered) = match control.center {
            true => {
                let mean = svd::column_means(&to_f64s(self.column_sums().as_slice()), size.m);
                let shift: Vec<f64> = mean.iter().map(|&x| -x).collect();
                let shift = LocalVector::from_vec(from_f64s(&shift), Orientation::Row);
                (mean, self.plus(expand(&shift, size)?)?)
            },
            false => (vec![0.0; size.n], self.to_owned()),
        };

        let (scales, prepared) = match control.normalize {
            true => {
                let scales = svd::column_scales(&to_f64s(centered.column_square_sums().as_slice()), size.m);
                let inverse: Vec<f64> = scales.iter().map(|&s| 1.0 / s).collect();
                let factors = LocalVector::from_vec(from_f64s(&inverse), Orientation::Row);
                (Some(scales), centered.scale_columns(&factors)?)
            },
            false => (None, centered),
        };

        let mut parts = svd::decompose(svd::to_dmatrix(&prepared), control.economy)?;
        if let Some(scales) = &scales {
            svd::unscale(&mut parts.coeff, scales);
        }

        Ok(PcaResult {
            coeff: svd::from_dmatrix(&parts.coeff)?,
            score: svd::from_dmatrix(&parts.score)?,
            latent: LocalVector::from_vec(from_f64s(&parts.latent), Orientation::Column),
            mean: LocalVector::from_vec(from_f64s(&mean), Orientation::Row),
        })
    }
}
