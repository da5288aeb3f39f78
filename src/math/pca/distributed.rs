/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{from_f64s, to_f64s};
use crate::svd::{self, Components};
use crate::{Error, Pca, PcaControl, PcaResult, Result};

use ::dmat_comm::Broadcast;
use ::dmat_core::algebra::{expand, ColumnSums, Plus, ScaleColumns};
use ::dmat_core::{DistMatrix, DistVector, Distribution, LocalVector, MatrixSize, Orientation, ProcessGrid, RealScalar, ROOT};

impl<'a, T: RealScalar> Pca for DistMatrix<'a, T> {
    type Output = PcaResult<DistMatrix<'static, T>, DistVector<'static, T>>;

    fn pca(&self, control: &PcaControl) -> Result<Self::Output> {
        let grid = self.grid();
        let size = self.size();
        let is_root = grid.rank() == ROOT;
        if is_root {
            info!("PCA of a {} matrix in {} ({:?})", size, self.distribution(), control);
        }

        let (mean, centered) = match control.center {
            true => {
                let mean = svd::column_means(&to_f64s(self.column_sums().local().as_slice()), size.m);
                let shift: Vec<f64> = mean.iter().map(|&x| -x).collect();
                let shift = DistVector::replicated(grid, LocalVector::from_vec(from_f64s(&shift), Orientation::Row));
                (mean, self.plus(expand(&shift, size)?)?)
            },
            false => (vec![0.0; size.n], self.duplicate()),
        };

        let (scales, prepared) = match control.normalize {
            true => {
                let square_sums = centered.column_square_sums();
                let scales = svd::column_scales(&to_f64s(square_sums.local().as_slice()), size.m);
                let inverse: Vec<f64> = scales.iter().map(|&s| 1.0 / s).collect();
                let factors = DistVector::replicated(grid, LocalVector::from_vec(from_f64s(&inverse), Orientation::Row));
                (Some(scales), centered.scale_columns(&factors)?)
            },
            false => (None, centered),
        };

        if is_root {
            info!("Gathering to the root for the decomposition");
        }
        let gathered = prepared.copy(Distribution::CIRC_CIRC);
        let outcome = match is_root {
            true => Some(svd::decompose(svd::to_dmatrix(gathered.local()), control.economy)),
            false => None,
        };

        // Everyone has to agree on whether there is anything to redistribute.
        let ok = bool::broadcast(grid.comm(), ROOT, outcome.as_ref().map(|r| r.is_ok()));
        let parts = match (outcome, ok) {
            (Some(Err(e)), _) => return Err(e),
            (_, false) => return Err(Error::NoConvergence),
            (Some(Ok(mut parts)), true) => {
                if let Some(scales) = &scales {
                    svd::unscale(&mut parts.coeff, scales);
                }
                Some(parts)
            },
            (None, true) => None,
        };

        let ncomp = svd::num_components(size, control.economy);
        let (coeff, score, latent) = from_root::<T>(grid, parts, size, ncomp)?;

        if is_root {
            info!("Distributing {} principal components", ncomp);
        }
        let dist = self.distribution();
        let mean = LocalVector::from_vec(from_f64s(&mean), Orientation::Row);
        Ok(PcaResult {
            coeff: coeff.copy(dist),
            score: score.copy(dist),
            latent: latent.copy(Distribution::VC_STAR),
            mean: DistVector::replicated(grid, mean).copy(Distribution::STAR_VC),
        })
    }
}

// Wrap the components held by the root as [CIRC,CIRC] objects.
fn from_root<T: RealScalar>(
    grid: &ProcessGrid,
    parts: Option<Components>,
    size: MatrixSize,
    ncomp: usize,
) -> Result<(DistMatrix<'static, T>, DistMatrix<'static, T>, DistVector<'static, T>)> {
    let circ = Distribution::CIRC_CIRC;
    let coeff_size = MatrixSize::new(size.n, ncomp);
    let score_size = MatrixSize::new(size.m, ncomp);

    Ok(match parts {
        Some(parts) => {
            let latent = LocalVector::from_vec(from_f64s(&parts.latent), Orientation::Column);
            (
                DistMatrix::make_view_with_size(grid, svd::from_dmatrix(&parts.coeff)?, circ, coeff_size)?,
                DistMatrix::make_view_with_size(grid, svd::from_dmatrix(&parts.score)?, circ, score_size)?,
                DistVector::make_view_with_length(grid, latent, circ, ncomp)?,
            )
        },
        None => (
            DistMatrix::new(grid, coeff_size, circ),
            DistMatrix::new(grid, score_size, circ),
            DistVector::new(grid, ncomp, Orientation::Column, circ),
        ),
    })
}

#[cfg(test)]
mod tests {
    use crate::{pca, PcaControl};
    use ::dmat_assert_close::assert_close;
    use ::dmat_comm::ThreadUniverse;
    use ::dmat_core::{DistMatrix, Distribution, LocalMatrix, MatrixSize, ProcessGrid};
    use ::ndarray::{arr2, Array2};
    use ::pretty_assertions::assert_eq;

    fn data() -> Array2<f64> {
        arr2(&[
            [1.0, 2.0, 0.0, -1.0],
            [0.5, -1.5, 3.0, 2.0],
            [2.0, 0.0, 1.0, 1.0],
            [-1.0, 1.0, 0.5, 0.0],
            [0.0, 2.5, -2.0, 1.5],
            [1.5, 1.0, 1.0, -0.5],
        ])
    }

    #[test]
    fn agrees_with_local() {
        let local = LocalMatrix::from_array(&data());
        for &economy in &[true, false] {
            for &normalize in &[true, false] {
                let control = PcaControl { economy, center: true, normalize };
                let expected = pca(&local, &control).unwrap();

                ThreadUniverse::run(4, |comm| {
                    let grid = ProcessGrid::new(comm).unwrap();
                    let x = DistMatrix::make_view(&grid, LocalMatrix::from_array(&data()), Distribution::STAR_STAR).unwrap();
                    for &dist in &[Distribution::STAR_STAR, Distribution::MC_MR, Distribution::VR_STAR, Distribution::CIRC_CIRC] {
                        let result = pca(&x.copy(dist), &control).unwrap();
                        assert_eq!(result.coeff.distribution(), dist);
                        assert_eq!(result.latent.distribution(), Distribution::VC_STAR);
                        assert_eq!(result.mean.distribution(), Distribution::STAR_VC);

                        let full = Distribution::STAR_STAR;
                        assert_close!(rel=1e-5, abs=1e-8, result.coeff.copy(full).local().to_array(), expected.coeff.to_array(), "{}", dist);
                        assert_close!(rel=1e-5, abs=1e-8, result.score.copy(full).local().to_array(), expected.score.to_array(), "{}", dist);
                        assert_close!(rel=1e-5, abs=1e-8, result.latent.copy(full).local().to_array(), expected.latent.to_array(), "{}", dist);
                        assert_close!(rel=1e-5, abs=1e-8, result.mean.copy(full).local().to_array(), expected.mean.to_array(), "{}", dist);
                    }
                });
            }
        }
    }

    #[test]
    fn wide_data_in_full_mode() {
        let wide = data().t().to_owned(); // 4 x 6
        ThreadUniverse::run(3, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let x = DistMatrix::make_view(&grid, LocalMatrix::from_array(&wide), Distribution::STAR_STAR).unwrap();
            let control = PcaControl { economy: false, ..PcaControl::default() };
            let result = pca(&x.copy(Distribution::MR_MC), &control).unwrap();
            assert_eq!(result.coeff.size(), MatrixSize::new(6, 6));
            assert_eq!(result.score.size(), MatrixSize::new(4, 6));
            assert_eq!(result.latent.length(), 6);

            let latent = result.latent.copy(Distribution::STAR_STAR).local().to_array();
            // centered 4-sample data has rank at most 3
            for &x in latent.iter().skip(3) {
                assert_close!(abs=1e-10, x, 0.0);
            }
        });
    }
}
