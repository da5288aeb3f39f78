/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Process groups for distributed matrices.
//!
//! Everything in this crate follows the "multi-process, single-code" model:
//! every process in a group executes the same sequence of collective calls
//! (in the same order), and each one blocks until its peers have caught up.
//! Calling a collective on only a subset of a group will deadlock.
//!
//! All payloads travel as `Vec<f64>`.  Higher layers encode their scalars into
//! this representation (a complex number is two consecutive values).
//!
//! # Backends
//!
//! * [`SelfComm`] is a group containing only the calling process.
//! * [`ThreadComm`] runs every process of the group as a thread of the
//!   current program.  [`ThreadUniverse::run`] is the entry point.
//! * `MpiComm` (feature `mpi-support`) wraps an MPI communicator.

#[macro_use]
extern crate log;

use ::std::cell::RefCell;
use ::std::collections::VecDeque;
use ::std::fmt;
use ::std::sync::Arc;

mod thread;
mod broadcast;
#[cfg(feature = "mpi-support")]
mod mpi;

pub use crate::thread::{ThreadComm, ThreadUniverse};
pub use crate::broadcast::{Broadcast, this_process_is_root};
#[cfg(feature = "mpi-support")]
pub use crate::mpi::MpiComm;

/// Rank of the process that owns `[CIRC,CIRC]` data and roots the default collectives.
pub const ROOT: usize = 0;

/// Shared handle to a process group.
pub type Comm = Arc<dyn Communicator>;

/// A group of processes that can exchange messages.
///
/// Implementors only need to provide point-to-point messaging and `split`;
/// the collectives have default implementations in terms of those.
///
/// Messages between a given pair of processes are delivered in the order they
/// were sent.  Communication failure is fatal and panics.
pub trait Communicator: fmt::Debug {
    /// This process's index in `0..self.size()`.
    fn rank(&self) -> usize;

    /// Number of processes in the group.
    fn size(&self) -> usize;

    /// Send a message to `dest`.  May or may not block until it is received.
    fn send(&self, dest: usize, data: Vec<f64>);

    /// Block until the next message from `source` arrives.
    fn recv(&self, source: usize) -> Vec<f64>;

    /// Partition the group into subgroups by `color`.
    ///
    /// Within a subgroup, processes are ranked by `key`, with ties broken by
    /// rank in the parent group.
    ///
    /// # Collective
    fn split(&self, color: usize, key: usize) -> Comm;

    /// # Collective
    fn barrier(&self) {
        let _ = self.all_gather(Vec::new());
    }

    /// Send `data` from `root` to every process.
    ///
    /// `data` is ignored on non-root processes, and must be `Some` on the root.
    ///
    /// # Collective
    fn broadcast(&self, root: usize, data: Option<Vec<f64>>) -> Vec<f64> {
        if self.rank() == root {
            let data = data.unwrap_or_else(|| panic!("root did not provide value to broadcast"));
            for dest in (0..self.size()).filter(|&dest| dest != root) {
                self.send(dest, data.clone());
            }
            data
        } else {
            self.recv(root)
        }
    }

    /// Collect one message from every process onto `root`, ordered by rank.
    ///
    /// Returns `None` on every process but the root.
    ///
    /// # Collective
    fn gather(&self, root: usize, data: Vec<f64>) -> Option<Vec<Vec<f64>>> {
        if self.rank() == root {
            let mut own = Some(data);
            Some({
                (0..self.size())
                    .map(|source| match source == root {
                        true => own.take().unwrap_or_default(),
                        false => self.recv(source),
                    })
                    .collect()
            })
        } else {
            self.send(root, data);
            None
        }
    }

    /// Deliver the `k`th message held by `root` to process `k`.
    ///
    /// `data` is ignored on non-root processes, and must be `Some` on the root.
    ///
    /// # Collective
    fn scatter(&self, root: usize, data: Option<Vec<Vec<f64>>>) -> Vec<f64> {
        if self.rank() == root {
            let data = data.unwrap_or_else(|| panic!("root did not provide values to scatter"));
            assert_eq!(data.len(), self.size(), "scatter needs one message per process");

            let mut own = Vec::new();
            for (dest, chunk) in data.into_iter().enumerate() {
                match dest == root {
                    true => own = chunk,
                    false => self.send(dest, chunk),
                }
            }
            own
        } else {
            self.recv(root)
        }
    }

    /// Give every process a copy of every process's message, ordered by rank.
    ///
    /// # Collective
    fn all_gather(&self, data: Vec<f64>) -> Vec<Vec<f64>> {
        let me = self.rank();
        for dest in (0..self.size()).filter(|&dest| dest != me) {
            self.send(dest, data.clone());
        }

        let mut own = Some(data);
        (0..self.size())
            .map(|source| match source == me {
                true => own.take().unwrap_or_default(),
                false => self.recv(source),
            })
            .collect()
    }

    /// Personalized exchange.  `data[k]` is delivered to process `k`, and
    /// element `k` of the output is the message that process `k` addressed to us.
    ///
    /// # Collective
    fn all_to_all(&self, data: Vec<Vec<f64>>) -> Vec<Vec<f64>> {
        assert_eq!(data.len(), self.size(), "all_to_all needs one message per process");

        let me = self.rank();
        let mut own = Vec::new();
        for (dest, chunk) in data.into_iter().enumerate() {
            match dest == me {
                true => own = chunk,
                false => self.send(dest, chunk),
            }
        }

        let mut own = Some(own);
        (0..self.size())
            .map(|source| match source == me {
                true => own.take().unwrap_or_default(),
                false => self.recv(source),
            })
            .collect()
    }

    /// Elementwise sum over all processes, written back into `data`.
    ///
    /// Contributions are added in rank order, so every process obtains
    /// bitwise identical results.
    ///
    /// # Collective
    fn all_reduce_sum(&self, data: &mut [f64]) {
        let contributions = self.all_gather(data.to_vec());
        for x in data.iter_mut() {
            *x = 0.0;
        }
        for contribution in contributions {
            assert_eq!(contribution.len(), data.len(), "all_reduce_sum: length mismatch between processes");
            for (x, y) in data.iter_mut().zip(contribution) {
                *x += y;
            }
        }
    }
}

/// A group consisting of only the calling process.
#[derive(Debug, Default)]
pub struct SelfComm {
    // messages sent to ourselves
    mailbox: RefCell<VecDeque<Vec<f64>>>,
}

impl SelfComm {
    pub fn new() -> Self { Default::default() }

    pub fn comm() -> Comm { Arc::new(SelfComm::new()) }
}

impl Communicator for SelfComm {
    fn rank(&self) -> usize { 0 }
    fn size(&self) -> usize { 1 }

    fn send(&self, dest: usize, data: Vec<f64>) {
        assert_eq!(dest, 0, "SelfComm: no process with rank {}", dest);
        self.mailbox.borrow_mut().push_back(data);
    }

    fn recv(&self, source: usize) -> Vec<f64> {
        assert_eq!(source, 0, "SelfComm: no process with rank {}", source);
        self.mailbox.borrow_mut().pop_front()
            .unwrap_or_else(|| panic!("SelfComm: recv with no pending message would block forever"))
    }

    fn split(&self, _color: usize, _key: usize) -> Comm { SelfComm::comm() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::pretty_assertions::assert_eq;

    #[test]
    fn self_comm_collectives() {
        let comm = SelfComm::new();
        assert_eq!(comm.broadcast(0, Some(vec![1.0, 2.0])), vec![1.0, 2.0]);
        assert_eq!(comm.gather(0, vec![3.0]), Some(vec![vec![3.0]]));
        assert_eq!(comm.scatter(0, Some(vec![vec![4.0]])), vec![4.0]);
        assert_eq!(comm.all_gather(vec![5.0]), vec![vec![5.0]]);
        assert_eq!(comm.all_to_all(vec![vec![6.0]]), vec![vec![6.0]]);

        let mut data = [1.5, -2.0];
        comm.all_reduce_sum(&mut data);
        assert_eq!(data, [1.5, -2.0]);
    }

    #[test]
    fn self_comm_mailbox_is_fifo() {
        let comm = SelfComm::new();
        comm.send(0, vec![1.0]);
        comm.send(0, vec![2.0]);
        assert_eq!(comm.recv(0), vec![1.0]);
        assert_eq!(comm.recv(0), vec![2.0]);
    }

    #[test]
    fn self_comm_split() {
        let comm = SelfComm::comm().split(7, 3);
        assert_eq!((comm.rank(), comm.size()), (0, 1));
    }
}
