/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

mod shared;

use self::shared::datasets;
use self::shared::util::{distribute, gather, gather_vector, on_every_grid};
use ::dmat::algebra::{expand, multiply, plus, transpose};
use ::dmat::{pca, Distribution, LocalMatrix, PcaControl};
use ::dmat_assert_close::assert_close;
use ::ndarray::Array2;
use ::pretty_assertions::assert_eq;

fn controls() -> Vec<PcaControl> {
    let mut out = vec![];
    for &economy in &[true, false] {
        for &center in &[true, false] {
            for &normalize in &[true, false] {
                out.push(PcaControl { economy, center, normalize });
            }
        }
    }
    out
}

#[test]
fn reconstruct_3x3() {
    let data = datasets::pca_3x3();
    let x = LocalMatrix::from_array(&data);
    let result = pca(&x, &PcaControl::default()).unwrap();

    let back = multiply(&result.score, &transpose(&result.coeff)).unwrap();
    let back = plus(&back, expand(&result.mean, back.size()).unwrap()).unwrap();
    assert_close!(rel=1e-5, abs=1e-8, back.to_array(), data);
}

#[test]
fn reconstruct_distributed() {
    let data = datasets::pca_7x4();
    on_every_grid(|grid| {
        for control in controls() {
            for &dist in &[Distribution::MC_MR, Distribution::STAR_VR, Distribution::CIRC_CIRC] {
                let result = pca(&distribute(grid, &data, dist), &control).unwrap();
                let back = multiply(&result.score, &transpose(&result.coeff)).unwrap();
                let back = plus(&back, expand(&result.mean, back.size()).unwrap()).unwrap();
                assert_close!(rel=1e-5, abs=1e-8, gather(&back), data.clone(), "{:?} {}", control, dist);
            }
        }
    });
}

#[test]
fn local_and_replicated_agree() {
    for data in vec![datasets::pca_3x3(), datasets::pca_7x4()] {
        for control in controls() {
            let expected = pca(&LocalMatrix::from_array(&data), &control).unwrap();

            on_every_grid(|grid| {
                let result = pca(&distribute(grid, &data, Distribution::STAR_STAR), &control).unwrap();
                assert_eq!(result.coeff.size(), expected.coeff.size());
                assert_close!(rel=1e-5, abs=1e-8, gather(&result.coeff), expected.coeff.to_array());
                assert_close!(rel=1e-5, abs=1e-8, gather(&result.score), expected.score.to_array());
                assert_close!(rel=1e-5, abs=1e-8, gather_vector(&result.latent), expected.latent.to_array());
                assert_close!(rel=1e-5, abs=1e-8, gather_vector(&result.mean), expected.mean.to_array());
            });
        }
    }
}

#[test]
fn mean_is_zero_without_centering() {
    let x = LocalMatrix::from_array(&datasets::pca_7x4());
    let control = PcaControl { center: false, ..PcaControl::default() };
    let result = pca(&x, &control).unwrap();
    assert!(result.mean.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn latent_is_sorted_and_nonnegative() {
    let x = LocalMatrix::from_array(&datasets::pca_7x4());
    let control = PcaControl { normalize: true, ..PcaControl::default() };
    let latent = pca(&x, &control).unwrap().latent.to_array();
    assert!(latent.iter().all(|&x| x >= 0.0));
    for k in 1..latent.len() {
        assert!(latent[k - 1] >= latent[k]);
    }
}

#[test]
fn full_mode_on_wide_data() {
    let data: Array2<f64> = datasets::pca_7x4().t().to_owned();
    let x = LocalMatrix::from_array(&data);
    let economy = pca(&x, &PcaControl::default()).unwrap();
    let full = pca(&x, &PcaControl { economy: false, ..PcaControl::default() }).unwrap();

    assert_eq!(economy.coeff.size().n, 4);
    assert_eq!(full.coeff.size().n, 7);
    assert_eq!(full.score.size().n, 7);

    // centering leaves rank 3; the last direction is arbitrary
    let leading = |x: &LocalMatrix<'_, f64>| x.to_array().slice(::ndarray::s![.., ..3]).to_owned();
    assert_close!(rel=1e-5, abs=1e-8, leading(&full.coeff), leading(&economy.coeff));
}
