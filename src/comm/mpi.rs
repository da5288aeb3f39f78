/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! MPI backend.
//!
//! The collectives are overridden to use MPI's native varcount operations.
//! Message counts are exchanged first, so that receivers can size their buffers.

use crate::{Comm, Communicator};

use ::mpi::collective::SystemOperation;
use ::mpi::datatype::{Partition, PartitionMut};
use ::mpi::environment::Universe;
use ::mpi::topology::{Color, Rank, UserCommunicator};
use ::mpi::traits::*;
use ::std::fmt;
use ::std::sync::Arc;

type Count = i32;

/// A process group backed by an MPI communicator.
pub struct MpiComm {
    inner: UserCommunicator,
}

impl MpiComm {
    /// A duplicate of `MPI_COMM_WORLD`.
    pub fn world(universe: &Universe) -> Comm {
        Arc::new(MpiComm { inner: universe.world().duplicate() })
    }

    pub fn from_user(inner: UserCommunicator) -> Comm {
        Arc::new(MpiComm { inner })
    }

    fn root(&self, root: usize) -> ::mpi::topology::Process<'_, UserCommunicator> {
        self.inner.process_at_rank(root as Rank)
    }
}

fn displacements(counts: &[Count]) -> Vec<Count> {
    counts.iter()
        .scan(0, |acc, &count| {
            let displ = *acc;
            *acc += count;
            Some(displ)
        })
        .collect()
}

fn split_by_counts(flat: Vec<f64>, counts: &[Count]) -> Vec<Vec<f64>> {
    let mut rest = &flat[..];
    counts.iter()
        .map(|&count| {
            let (head, tail) = rest.split_at(count as usize);
            rest = tail;
            head.to_vec()
        })
        .collect()
}

impl Communicator for MpiComm {
    fn rank(&self) -> usize { self.inner.rank() as usize }
    fn size(&self) -> usize { self.inner.size() as usize }

    fn send(&self, dest: usize, data: Vec<f64>) {
        self.inner.process_at_rank(dest as Rank).send(&data[..]);
    }

    fn recv(&self, source: usize) -> Vec<f64> {
        let (data, _status) = self.inner.process_at_rank(source as Rank).receive_vec::<f64>();
        data
    }

    fn split(&self, color: usize, key: usize) -> Comm {
        let color = Color::with_value(color as Rank);
        match self.inner.split_by_color_with_key(color, key as Rank) {
            Some(inner) => MpiComm::from_user(inner),
            None => panic!("BUG! MPI split produced no communicator for a defined color"),
        }
    }

    fn barrier(&self) { self.inner.barrier(); }

    fn broadcast(&self, root: usize, data: Option<Vec<f64>>) -> Vec<f64> {
        let is_root = self.rank() == root;
        let mut data = match (is_root, data) {
            (true, Some(data)) => data,
            (true, None) => panic!("root did not provide value to broadcast"),
            (false, _) => Vec::new(),
        };

        let mut len = data.len() as u64;
        self.root(root).broadcast_into(&mut len);
        data.resize(len as usize, 0.0);
        self.root(root).broadcast_into(&mut data[..]);
        data
    }

    fn gather(&self, root: usize, data: Vec<f64>) -> Option<Vec<Vec<f64>>> {
        let count = data.len() as Count;
        if self.rank() == root {
            let mut counts = vec![0 as Count; self.size()];
            self.root(root).gather_into_root(&count, &mut counts[..]);

            let displs = displacements(&counts);
            let mut flat = vec![0.0; counts.iter().sum::<Count>() as usize];
            {
                let mut partition = PartitionMut::new(&mut flat[..], &counts[..], &displs[..]);
                self.root(root).gather_varcount_into_root(&data[..], &mut partition);
            }
            Some(split_by_counts(flat, &counts))
        } else {
            self.root(root).gather_into(&count);
            self.root(root).gather_varcount_into(&data[..]);
            None
        }
    }

    fn scatter(&self, root: usize, data: Option<Vec<Vec<f64>>>) -> Vec<f64> {
        let mut count: Count = 0;
        if self.rank() == root {
            let data = data.unwrap_or_else(|| panic!("root did not provide values to scatter"));
            assert_eq!(data.len(), self.size(), "scatter needs one message per process");

            let counts = data.iter().map(|chunk| chunk.len() as Count).collect::<Vec<_>>();
            self.root(root).scatter_into_root(&counts[..], &mut count);

            let displs = displacements(&counts);
            let flat = data.concat();
            let mut own = vec![0.0; count as usize];
            let partition = Partition::new(&flat[..], &counts[..], &displs[..]);
            self.root(root).scatter_varcount_into_root(&partition, &mut own[..]);
            own
        } else {
            self.root(root).scatter_into(&mut count);
            let mut own = vec![0.0; count as usize];
            self.root(root).scatter_varcount_into(&mut own[..]);
            own
        }
    }

    fn all_gather(&self, data: Vec<f64>) -> Vec<Vec<f64>> {
        let count = data.len() as Count;
        let mut counts = vec![0 as Count; self.size()];
        self.inner.all_gather_into(&count, &mut counts[..]);

        let displs = displacements(&counts);
        let mut flat = vec![0.0; counts.iter().sum::<Count>() as usize];
        {
            let mut partition = PartitionMut::new(&mut flat[..], &counts[..], &displs[..]);
            self.inner.all_gather_varcount_into(&data[..], &mut partition);
        }
        split_by_counts(flat, &counts)
    }

    fn all_to_all(&self, data: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
        assert_eq!(data.len(), self.size(), "all_to_all needs one message per process");

        let send_counts = data.iter().map(|chunk| chunk.len() as Count).collect::<Vec<_>>();
        let mut recv_counts = vec![0 as Count; self.size()];
        self.inner.all_to_all_into(&send_counts[..], &mut recv_counts[..]);

        let send_displs = displacements(&send_counts);
        let recv_displs = displacements(&recv_counts);
        let flat = data.concat();
        let mut received = vec![0.0; recv_counts.iter().sum::<Count>() as usize];
        {
            let send = Partition::new(&flat[..], &send_counts[..], &send_displs[..]);
            let mut recv = PartitionMut::new(&mut received[..], &recv_counts[..], &recv_displs[..]);
            self.inner.all_to_all_varcount_into(&send, &mut recv);
        }
        split_by_counts(received, &recv_counts)
    }

    fn all_reduce_sum(&self, data: &mut [f64]) {
        let send = data.to_vec();
        self.inner.all_reduce_into(&send[..], data, &SystemOperation::sum());
    }
}

impl fmt::Debug for MpiComm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MpiComm")
            .field("rank", &self.rank())
            .field("size", &self.size())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::pretty_assertions::assert_eq;

    #[test]
    fn counts_to_displacements() {
        assert_eq!(displacements(&[2, 0, 3]), vec![0, 2, 2]);
        assert_eq!(split_by_counts(vec![1.0, 2.0, 3.0], &[1, 0, 2]), vec![vec![1.0], vec![], vec![2.0, 3.0]]);
    }
}
