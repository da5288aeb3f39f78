/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Matrices and vectors spread over a process grid.

mod matrix;
mod vector;

pub use self::matrix::DistMatrix;
pub use self::vector::DistVector;

#[cfg(test)]
mod tests {
    use crate::local::{LocalMatrix, LocalVector, Orientation};
    use crate::{DistMatrix, DistVector, Distribution, Error, MatrixSize, ProcessGrid};
    use ::dmat_comm::{SelfComm, ThreadUniverse};
    use ::ndarray::{Array2, ShapeBuilder};
    use ::pretty_assertions::assert_eq;

    fn example(m: usize, n: usize) -> LocalMatrix<'static, f64> {
        let data = (0..m * n).map(|k| k as f64).collect();
        LocalMatrix::from_column_major(MatrixSize::new(m, n), data).unwrap()
    }

    #[test]
    fn view_aliases_host() {
        let grid = ProcessGrid::new(SelfComm::comm()).unwrap();
        let mut host = Array2::<f64>::zeros((2, 2).f());
        {
            let local = LocalMatrix::view_from(host.view_mut()).unwrap();
            let mut dist = DistMatrix::make_view(&grid, local, Distribution::STAR_STAR).unwrap();
            dist.local_mut().set(1, 0, 4.0).unwrap();

            // copies never alias
            let mut copy = dist.copy(Distribution::STAR_STAR);
            copy.local_mut().set(0, 0, -1.0).unwrap();
            assert_eq!(dist.local().get(0, 0), 0.0);
        }
        assert_eq!(host[[1, 0]], 4.0);
    }

    #[test]
    fn make_view_checks_shard_shape() {
        let out = ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let good = DistMatrix::make_view_with_size(&grid, example(2, 2), Distribution::MC_MR, MatrixSize::new(4, 3));
            let bad = DistMatrix::make_view_with_size(&grid, example(2, 2), Distribution::MC_MR, MatrixSize::new(3, 3));
            (good.map(|d| d.size()), bad.map(|d| d.size()))
        });
        // on a 2x2 grid, a 4x3 matrix under MC_MR gives 2x2 shards in grid column 0 and 2x1 in column 1
        assert_eq!(out[0].0, Ok(MatrixSize::new(4, 3)));
        assert_eq!(out[2].0, Err(Error::ShapeMismatch { expected: MatrixSize::new(2, 1), found: MatrixSize::new(2, 2) }));
        assert_eq!(out[1].1, Err(Error::ShapeMismatch { expected: MatrixSize::new(1, 2), found: MatrixSize::new(2, 2) }));
    }

    #[test]
    fn size_survives_copies() {
        ThreadUniverse::run(3, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let x = DistMatrix::make_view(&grid, example(5, 2), Distribution::STAR_STAR).unwrap();
            let y = x.copy(Distribution::VR_STAR).copy(Distribution::STAR_MC).copy(Distribution::CIRC_CIRC);
            assert_eq!(y.size(), MatrixSize::new(5, 2));
            assert_eq!(y.participating(), grid.rank() == 0);
            assert_eq!(y.copy(Distribution::STAR_STAR).local().as_slice(), x.local().as_slice());
        });
    }

    #[test]
    fn vectors_round_trip_through_shards() {
        ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let full = LocalVector::from_vec((0..7).map(|k| k as f32).collect(), Orientation::Row);
            let v = DistVector::make_view(&grid, full, Distribution::STAR_STAR).unwrap();
            let w = v.copy(Distribution::STAR_VC);

            assert_eq!(w.length(), 7);
            for k in 0..w.local().length() {
                assert_eq!(w.local().get(k), w.global_index(k) as f32);
            }
            let back = w.copy(Distribution::MR_MC).copy(Distribution::STAR_STAR);
            assert_eq!(back.local().as_slice(), v.local().as_slice());
            assert_eq!(back.orientation(), Orientation::Row);
        });
    }

    #[test]
    fn vector_views_check_length() {
        let out = ThreadUniverse::run(2, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let shard = LocalVector::<f64>::zeros(2, Orientation::Column);
            DistVector::make_view_with_length(&grid, shard, Distribution::VC_STAR, 4).is_ok()
                && DistVector::make_view_with_length(&grid, LocalVector::<f64>::zeros(2, Orientation::Column), Distribution::VC_STAR, 5).is_err()
        });
        // rank 0 holds 3 of 5 but rank 1 holds 2 of 5
        assert_eq!(out, vec![true, false]);
    }

    #[test]
    fn participation_does_not_depend_on_size() {
        let out = ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let empty = DistMatrix::<f64>::new(&grid, MatrixSize::new(0, 3), Distribution::MC_MR);
            let single = DistMatrix::<f64>::new(&grid, MatrixSize::new(1, 1), Distribution::MC_MR);
            let root_only = DistMatrix::<f64>::new(&grid, MatrixSize::new(0, 3), Distribution::CIRC_CIRC);
            let vector = DistVector::<f64>::new(&grid, 0, Orientation::Column, Distribution::VC_STAR);
            (empty.participating(), single.participating(), single.owns(0, 0), root_only.participating(), vector.participating())
        });
        assert_eq!(out[0], (true, true, true, true, true));
        for rank in 1..4 {
            assert_eq!(out[rank], (true, true, false, false, true));
        }
    }

    #[test]
    fn owns_is_bounded_by_the_global_size() {
        let grid = ProcessGrid::new(SelfComm::comm()).unwrap();
        let x = DistMatrix::make_view(&grid, example(3, 2), Distribution::STAR_STAR).unwrap();
        assert!(x.owns(2, 1));
        assert!(!x.owns(3, 0));
        assert!(!x.owns(0, 2));
        assert!(!x.owns(100, 100));
    }

    #[test]
    fn debug_formatting() {
        let grid = ProcessGrid::new(SelfComm::comm()).unwrap();
        let x = DistMatrix::make_view(&grid, example(1, 2), Distribution::STAR_STAR).unwrap();
        let text = format!("{:?}", x);
        assert!(text.contains("DistMatrix"), "{}", text);
        assert!(text.contains("[0.0, 1.0]"), "{}", text);

        let v = DistVector::replicated(&grid, LocalVector::from_vec(vec![5.0_f32], Orientation::Row));
        assert!(format!("{:?}", v).contains("DistVector"));
    }
}
