/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::config::Settings;
use crate::FailResult;

use ::dmat_comm::{Comm, ThreadUniverse};
use ::dmat_core::{DistMatrix, DistVector, Distribution, Dtype, LocalMatrix, ProcessGrid, RealScalar, ROOT};
use ::dmat_pca::pca;
use ::ndarray::Array2;
use ::serde::Serialize;

/// PCA results as plain data, for printing.
#[derive(Serialize)]
#[derive(Debug, Clone, PartialEq)]
pub struct PcaOutput {
    /// Rows of the `n x ncomp` coefficient matrix.
    pub coeff: Vec<Vec<f64>>,
    /// Rows of the `m x ncomp` score matrix.
    pub score: Vec<Vec<f64>>,
    pub latent: Vec<f64>,
    pub mean: Vec<f64>,
}

/// Run PCA on `settings.processes` threads.
pub fn run_pca(settings: &Settings, data: &Array2<f64>) -> FailResult<PcaOutput> {
    ensure!(settings.processes > 0, "the number of processes must be at least 1");
    let outputs = ThreadUniverse::run(settings.processes, |comm| run_pca_on(comm, settings, data));

    let mut root_output = None;
    for (rank, output) in outputs.into_iter().enumerate() {
        match output? {
            Some(output) => root_output = Some(output),
            None => ensure!(rank != ROOT, "BUG! root produced no output"),
        }
    }
    root_output.ok_or_else(|| format_err!("BUG! root produced no output"))
}

/// Run PCA as one process of `comm`.  The output is only produced on the root.
///
/// # Collective
pub fn run_pca_on(comm: Comm, settings: &Settings, data: &Array2<f64>) -> FailResult<Option<PcaOutput>> {
    let grid = match settings.grid_height {
        Some(height) => ProcessGrid::with_height(comm, height)?,
        None => ProcessGrid::new(comm)?,
    };

    settings.dtype.ensure_enabled()?;
    match settings.dtype {
        Dtype::Real32 => run_typed::<f32>(&grid, settings, data),
        Dtype::Real64 => run_typed::<f64>(&grid, settings, data),
        dtype => bail!("PCA requires a real dtype, not {}", dtype),
    }
}

fn run_typed<T: RealScalar>(grid: &ProcessGrid, settings: &Settings, data: &Array2<f64>) -> FailResult<Option<PcaOutput>> {
    let local = LocalMatrix::from_array(&data.mapv(T::from_f64));
    let x = DistMatrix::make_view(grid, local, Distribution::STAR_STAR)?.copy(settings.distribution);
    let result = pca(&x, &settings.pca)?;

    let coeff = rows_on_root(&result.coeff);
    let score = rows_on_root(&result.score);
    let latent = vector_on_root(&result.latent);
    let mean = vector_on_root(&result.mean);
    Ok(match grid.rank() == ROOT {
        true => Some(PcaOutput { coeff, score, latent, mean }),
        false => None,
    })
}

// Only meaningful on the root.
fn rows_on_root<T: RealScalar>(x: &DistMatrix<'_, T>) -> Vec<Vec<f64>> {
    let x = x.copy(Distribution::CIRC_CIRC);
    let local = x.local();
    let size = local.size();
    (0..size.m).map(|i| (0..size.n).map(|j| local.get(i, j).to_f64()).collect()).collect()
}

fn vector_on_root<T: RealScalar>(x: &DistVector<'_, T>) -> Vec<f64> {
    let x = x.copy(Distribution::CIRC_CIRC);
    x.local().as_slice().iter().map(|&v| v.to_f64()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::dmat_assert_close::assert_close;
    use ::dmat_pca::PcaControl;
    use ::ndarray::arr2;
    use ::pretty_assertions::assert_eq;

    fn data() -> Array2<f64> {
        arr2(&[
            [1.0, 0.5, 2.0],
            [2.0, -1.0, 0.0],
            [0.0, 1.5, 1.0],
            [3.0, 0.0, -1.0],
        ])
    }

    #[test]
    fn process_count_does_not_matter() {
        let serial = Settings::default();
        let expected = run_pca(&serial, &data()).unwrap();
        assert_eq!(expected.coeff.len(), 3);
        assert_eq!(expected.score.len(), 4);

        for &(processes, grid_height) in &[(2, None), (4, Some(1)), (6, Some(3))] {
            let settings = Settings { processes, grid_height, distribution: Distribution::MR_MC, ..Settings::default() };
            let output = run_pca(&settings, &data()).unwrap();
            for (row, expected) in output.coeff.iter().zip(&expected.coeff) {
                assert_close!(abs=1e-10, &row[..], &expected[..]);
            }
            for (row, expected) in output.score.iter().zip(&expected.score) {
                assert_close!(abs=1e-10, &row[..], &expected[..]);
            }
            assert_close!(abs=1e-10, &output.latent[..], &expected.latent[..]);
            assert_close!(abs=1e-12, &output.mean[..], &expected.mean[..]);
        }
    }

    #[test]
    fn single_precision() {
        let settings = Settings { dtype: Dtype::Real32, pca: PcaControl { economy: false, ..PcaControl::default() }, ..Settings::default() };
        let output = run_pca(&settings, &data()).unwrap();
        assert_close!(abs=1e-6, &output.mean[..], &[1.5, 0.25, 0.5][..]);
    }

    #[test]
    fn complex_is_rejected() {
        let settings = Settings { dtype: Dtype::Complex64, processes: 2, ..Settings::default() };
        assert!(run_pca(&settings, &data()).is_err());
    }

    #[test]
    fn bad_grid_height() {
        let settings = Settings { processes: 4, grid_height: Some(3), ..Settings::default() };
        assert!(run_pca(&settings, &data()).is_err());
    }

    #[test]
    fn zero_processes() {
        let settings = Settings { processes: 0, ..Settings::default() };
        let err = run_pca(&settings, &data()).unwrap_err();
        assert!(err.to_string().contains("at least 1"), "{}", err);
    }
}
