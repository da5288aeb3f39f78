/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Moving elements between distributions.
//!
//! Every element `(i, j)` of the target is fetched from exactly one
//! *designated source*: the holder of `(i, j)` under the source distribution
//! that lies closest to the receiver, i.e. the one sharing the receiver's grid
//! row (column) whenever the source distribution leaves the grid row (column)
//! unpinned.  Both sender and receiver can compute this independently, so no
//! indices are sent.  Each process packs the elements it is the designated
//! source for, per destination, in global column-major order; each receiver
//! walks its own shard in the same order and pops values off the matching
//! per-source queue.
//!
//! The transfer itself is chosen by [`Exchange::choose`].

use crate::local::LocalBuffer;
use crate::dist::Owner;
use crate::{Distribution, MatrixIndex, MatrixSize, ProcessGrid, Scalar, ROOT};

use ::dmat_comm::Communicator;

/// A block of the source matrix, addressed in source coordinates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Window {
    pub offset: MatrixIndex,
    pub size: MatrixSize,
}

impl Window {
    pub fn full(size: MatrixSize) -> Self { Window { offset: MatrixIndex::ORIGIN, size } }

    #[inline]
    fn row_of(&self, global: usize) -> Option<usize> {
        global.checked_sub(self.offset.m).filter(|&i| i < self.size.m)
    }

    #[inline]
    fn col_of(&self, global: usize) -> Option<usize> {
        global.checked_sub(self.offset.n).filter(|&j| j < self.size.n)
    }
}

/// Which collective carries the packed messages.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum Exchange {
    /// Every process already holds what it needs.
    Local,
    /// The root holds everything.
    Scatter { root: usize },
    /// The root receives everything.
    Gather { root: usize },
    /// Every process receives every element, and every element has one holder.
    AllGather,
    AllToAll,
}

impl Exchange {
    pub fn choose(grid: &ProcessGrid, source: Distribution, target: Distribution, window: &Window) -> Exchange {
        if grid.size() == 1 || source.is_replicated() {
            Exchange::Local
        } else if source == target && window.offset == MatrixIndex::ORIGIN {
            Exchange::Local
        } else if source.is_root_only() {
            Exchange::Scatter { root: ROOT }
        } else if target.is_root_only() {
            Exchange::Gather { root: ROOT }
        } else if target.is_replicated() && source.is_unique() {
            Exchange::AllGather
        } else {
            Exchange::AllToAll
        }
    }

    /// `sends[k]` is the message for process `k`; the output is indexed by source.
    ///
    /// # Collective
    fn run(self, comm: &dyn Communicator, mut sends: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
        let (me, size) = (comm.rank(), comm.size());
        let take = |sends: &mut Vec<Vec<f64>>, k: usize| ::std::mem::replace(&mut sends[k], Vec::new());

        match self {
            Exchange::Local => {
                debug_assert!(sends.iter().enumerate().all(|(k, s)| k == me || s.is_empty()));
                let mut recvs = vec![Vec::new(); size];
                recvs[me] = take(&mut sends, me);
                recvs
            },
            Exchange::Scatter { root } => {
                let chunk = comm.scatter(root, if me == root { Some(sends) } else { None });
                let mut recvs = vec![Vec::new(); size];
                recvs[root] = chunk;
                recvs
            },
            Exchange::Gather { root } => {
                debug_assert!(sends.iter().enumerate().all(|(k, s)| k == root || s.is_empty()));
                let chunk = take(&mut sends, root);
                comm.gather(root, chunk).unwrap_or_else(|| vec![Vec::new(); size])
            },
            Exchange::AllGather => comm.all_gather(take(&mut sends, me)),
            Exchange::AllToAll => comm.all_to_all(sends),
        }
    }
}

/// Holder of an element under the source distribution that feeds the calling process.
#[inline]
fn designated_source(grid: &ProcessGrid, source: Owner) -> usize {
    grid.rank_of(source.row.unwrap_or(grid.row()), source.col.unwrap_or(grid.col()))
}

/// Grid rows (or columns) of the receivers that take an element from the
/// calling process along one grid dimension.
#[inline]
fn receivers(target: Option<usize>, source_pinned: bool, mine: usize, extent: usize) -> ::std::ops::Range<usize> {
    match (target, source_pinned) {
        // the source holder is already unique along this dimension
        (Some(t), true) => t..t + 1,
        (None, true) => 0..extent,
        // replicas along this dimension each serve their own row (column)
        (Some(t), false) => if t == mine { t..t + 1 } else { t..t },
        (None, false) => mine..mine + 1,
    }
}

fn pack<T: Scalar>(
    grid: &ProcessGrid,
    source_dist: Distribution,
    source: &LocalBuffer<'_, T>,
    target_dist: Distribution,
    window: &Window,
) -> Vec<Vec<f64>> {
    let mut sends = vec![Vec::new(); grid.size()];

    let src_rows = source_dist.row_axis(grid);
    let src_cols = source_dist.col_axis(grid);
    let local = source.size();

    for lj in 0..local.n {
        let gj = src_cols.global_index(lj);
        let tj = match window.col_of(gj) {
            Some(tj) => tj,
            None => continue,
        };
        let source_col = source_dist.col_dist().owner(gj, grid);
        let target_col = target_dist.col_dist().owner(tj, grid);

        for li in 0..local.m {
            let gi = src_rows.global_index(li);
            let ti = match window.row_of(gi) {
                Some(ti) => ti,
                None => continue,
            };
            let source_owner = source_dist.row_dist().owner(gi, grid).merge(source_col);
            let target_owner = target_dist.row_dist().owner(ti, grid).merge(target_col);

            let value = source.get(li, lj);
            let rows = receivers(target_owner.row, source_owner.row.is_some(), grid.row(), grid.height());
            let cols = receivers(target_owner.col, source_owner.col.is_some(), grid.col(), grid.width());
            for c in cols {
                for r in rows.clone() {
                    value.write_parts(&mut sends[grid.rank_of(r, c)]);
                }
            }
        }
    }
    sends
}

fn unpack<T: Scalar>(
    grid: &ProcessGrid,
    source_dist: Distribution,
    target_dist: Distribution,
    window: &Window,
    recvs: Vec<Vec<f64>>,
) -> LocalBuffer<'static, T> {
    let dest_rows = target_dist.row_axis(grid);
    let dest_cols = target_dist.col_axis(grid);
    let local = target_dist.local_size(window.size, grid);

    let mut cursors = vec![0; recvs.len()];
    let mut data = Vec::with_capacity(local.len());
    for lj in 0..local.n {
        let gj = window.offset.n + dest_cols.global_index(lj);
        let source_col = source_dist.col_dist().owner(gj, grid);

        for li in 0..local.m {
            let gi = window.offset.m + dest_rows.global_index(li);
            let source_owner = source_dist.row_dist().owner(gi, grid).merge(source_col);
            let from = designated_source(grid, source_owner);

            let start = cursors[from];
            let parts = match recvs[from].get(start..start + T::PARTS) {
                Some(parts) => parts,
                None => panic!("BUG! process {} sent {} too few values", from, T::PARTS),
            };
            data.push(T::read_parts(parts));
            cursors[from] += T::PARTS;
        }
    }
    debug_assert!(
        cursors.iter().zip(&recvs).all(|(&c, r)| c == r.len()),
        "BUG! redistribution left unconsumed values",
    );
    LocalBuffer::owned(local, data)
}

/// Copy the `window` block of a `source_dist` matrix into a fresh shard of a
/// `window.size` matrix under `target_dist`.
///
/// # Collective
pub(crate) fn redistribute<T: Scalar>(
    grid: &ProcessGrid,
    source_dist: Distribution,
    source: &LocalBuffer<'_, T>,
    target_dist: Distribution,
    window: Window,
) -> LocalBuffer<'static, T> {
    let exchange = Exchange::choose(grid, source_dist, target_dist, &window);
    trace!("Redistributing {} block at {}: {} -> {} via {:?}", window.size, window.offset, source_dist, target_dist, exchange);

    let sends = pack(grid, source_dist, source, target_dist, &window);
    let recvs = exchange.run(grid.comm(), sends);
    unpack(grid, source_dist, target_dist, &window, recvs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::dmat_comm::{SelfComm, ThreadUniverse};
    use ::pretty_assertions::assert_eq;

    #[test]
    fn exchange_choice() {
        let out = ThreadUniverse::run(4, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let full = Window::full(MatrixSize::new(3, 3));
            let shifted = Window { offset: MatrixIndex::new(1, 0), size: MatrixSize::new(2, 3) };
            vec![
                Exchange::choose(&grid, Distribution::STAR_STAR, Distribution::MC_MR, &full),
                Exchange::choose(&grid, Distribution::MC_MR, Distribution::MC_MR, &full),
                Exchange::choose(&grid, Distribution::MC_MR, Distribution::MC_MR, &shifted),
                Exchange::choose(&grid, Distribution::CIRC_CIRC, Distribution::VC_STAR, &full),
                Exchange::choose(&grid, Distribution::VR_STAR, Distribution::CIRC_CIRC, &full),
                Exchange::choose(&grid, Distribution::MC_MR, Distribution::STAR_STAR, &full),
                Exchange::choose(&grid, Distribution::MC_STAR, Distribution::STAR_STAR, &full),
            ]
        });
        assert_eq!(out[2], vec![
            Exchange::Local,
            Exchange::Local,
            Exchange::AllToAll,
            Exchange::Scatter { root: 0 },
            Exchange::Gather { root: 0 },
            Exchange::AllGather,
            Exchange::AllToAll,
        ]);
    }

    #[test]
    fn single_process_window() {
        let grid = ProcessGrid::new(SelfComm::comm()).unwrap();
        let source = LocalBuffer::owned(MatrixSize::new(3, 2), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let window = Window { offset: MatrixIndex::new(1, 1), size: MatrixSize::new(2, 1) };
        let out = redistribute(&grid, Distribution::STAR_STAR, &source, Distribution::VC_STAR, window);
        assert_eq!(out.as_slice(), &[5.0, 6.0][..]);
    }

    #[test]
    fn gather_to_root() {
        // 4x2 matrix with a(i, j) = 10 * i + j, spread (VC, STAR) over 3 processes
        let out = ThreadUniverse::run(3, |comm| {
            let grid = ProcessGrid::new(comm).unwrap();
            let dist = Distribution::VC_STAR;
            let global = MatrixSize::new(4, 2);
            let local = dist.local_size(global, &grid);
            let rows = dist.row_axis(&grid);

            let mut data = vec![];
            for j in 0..local.n {
                for li in 0..local.m {
                    data.push((10 * rows.global_index(li) + j) as f64);
                }
            }
            let source = LocalBuffer::owned(local, data);
            let out = redistribute(&grid, dist, &source, Distribution::CIRC_CIRC, Window::full(global));
            (out.size(), out.as_slice().to_vec())
        });
        assert_eq!(out[0].0, MatrixSize::new(4, 2));
        assert_eq!(out[0].1, vec![0.0, 10.0, 20.0, 30.0, 1.0, 11.0, 21.0, 31.0]);
        assert_eq!(out[1], (MatrixSize::new(0, 2), vec![]));
    }
}
