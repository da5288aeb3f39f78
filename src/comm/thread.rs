/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! A backend that runs each process of a group as a thread.
//!
//! Every ordered pair of processes gets its own channel, which gives us
//! per-pair FIFO delivery for free.

use crate::{Comm, Communicator};

use ::std::cell::Cell;
use ::std::collections::HashMap;
use ::std::fmt;
use ::std::sync::atomic::{AtomicUsize, Ordering};
use ::std::sync::{mpsc, Arc, Mutex, MutexGuard};

type Packet = Vec<f64>;

/// Entry point for running an SPMD closure on a group of threads.
pub struct ThreadUniverse;

impl ThreadUniverse {
    /// Run `func` on `nprocs` threads, each receiving its own [`Comm`] handle
    /// to the same group.  The return values are collected in rank order.
    ///
    /// # Panics
    ///
    /// Panics if `nprocs` is zero.  A panic on any thread is resumed on the
    /// calling thread after all threads have stopped.
    pub fn run<R, F>(nprocs: usize, func: F) -> Vec<R>
    where
        F: Fn(Comm) -> R + Sync,
        R: Send,
    {
        assert!(nprocs > 0, "cannot run a universe with no processes");

        let registry = Arc::new(Registry::default());
        let endpoints = mesh(&registry, nprocs);
        debug!("Spawning {} threads as processes", nprocs);

        ::std::thread::scope(|scope| {
            let func = &func;
            let handles = endpoints.into_iter().map(|endpoint| {
                let registry = registry.clone();
                scope.spawn(move || {
                    let comm: Comm = Arc::new(ThreadComm::new(endpoint, registry));
                    func(comm)
                })
            }).collect::<Vec<_>>();

            // Join everything before resuming a panic, so that the other
            // threads see their channels hang up instead of blocking forever.
            let results = handles.into_iter().map(|h| h.join()).collect::<Vec<_>>();
            results.into_iter()
                .map(|result| match result {
                    Ok(value) => value,
                    Err(payload) => ::std::panic::resume_unwind(payload),
                })
                .collect()
        })
    }
}

/// One process's view of a group of threads.
pub struct ThreadComm {
    endpoint: Endpoint,
    registry: Arc<Registry>,
    // number of times `split` has been called on this group
    splits: Cell<usize>,
}

struct Endpoint {
    mesh_id: usize,
    rank: usize,
    // indexed by destination
    outgoing: Vec<mpsc::Sender<Packet>>,
    // indexed by source
    incoming: Vec<Mutex<mpsc::Receiver<Packet>>>,
}

/// Bookkeeping shared by every thread of a universe.
#[derive(Default)]
struct Registry {
    next_mesh_id: AtomicUsize,
    // Endpoints of subgroups produced by `split` that have not been claimed yet,
    // keyed by (parent mesh, split sequence number, color).
    pending: Mutex<HashMap<(usize, usize, usize), Vec<Option<Endpoint>>>>,
}

fn mesh(registry: &Registry, size: usize) -> Vec<Endpoint> {
    let mesh_id = registry.next_mesh_id.fetch_add(1, Ordering::SeqCst);

    let mut outgoing = (0..size).map(|_| Vec::with_capacity(size)).collect::<Vec<_>>();
    let mut incoming = (0..size).map(|_| Vec::with_capacity(size)).collect::<Vec<_>>();
    for source in 0..size {
        for dest in 0..size {
            let (tx, rx) = mpsc::channel();
            outgoing[source].push(tx);
            incoming[dest].push(Mutex::new(rx));
        }
    }

    outgoing.into_iter().zip(incoming).enumerate()
        .map(|(rank, (outgoing, incoming))| Endpoint { mesh_id, rank, outgoing, incoming })
        .collect()
}

// A panic on another thread can poison a lock; the data behind it is still fine.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ThreadComm {
    fn new(endpoint: Endpoint, registry: Arc<Registry>) -> Self {
        ThreadComm { endpoint, registry, splits: Cell::new(0) }
    }

    fn claim_split_endpoint(&self, seq: usize, color: usize, size: usize, rank: usize) -> Endpoint {
        let key = (self.endpoint.mesh_id, seq, color);
        let mut pending = lock(&self.registry.pending);

        let (endpoint, exhausted) = {
            let slots = pending.entry(key).or_insert_with(|| {
                mesh(&self.registry, size).into_iter().map(Some).collect()
            });
            let endpoint = slots[rank].take();
            (endpoint, slots.iter().all(Option::is_none))
        };
        if exhausted {
            pending.remove(&key);
        }

        endpoint.unwrap_or_else(|| panic!("BUG! split endpoint {} was claimed twice", rank))
    }
}

impl Communicator for ThreadComm {
    fn rank(&self) -> usize { self.endpoint.rank }
    fn size(&self) -> usize { self.endpoint.outgoing.len() }

    fn send(&self, dest: usize, data: Vec<f64>) {
        trace!("[thread {}] send {} values to {}", self.rank(), data.len(), dest);
        if self.endpoint.outgoing[dest].send(data).is_err() {
            panic!("process {} hung up before receiving a message from {}", dest, self.rank());
        }
    }

    fn recv(&self, source: usize) -> Vec<f64> {
        let receiver = lock(&self.endpoint.incoming[source]);
        match receiver.recv() {
            Ok(data) => data,
            Err(_) => panic!("process {} hung up before sending to {}", source, self.rank()),
        }
    }

    fn split(&self, color: usize, key: usize) -> Comm {
        let seq = self.splits.get();
        self.splits.set(seq + 1);

        let table = self.all_gather(vec![color as f64, key as f64]);
        let mut members = {
            table.iter().enumerate()
                .filter(|(_, entry)| entry[0] as usize == color)
                .map(|(rank, entry)| (entry[1] as usize, rank))
                .collect::<Vec<_>>()
        };
        members.sort();

        let new_rank = {
            members.iter()
                .position(|&(_, rank)| rank == self.rank())
                .unwrap_or_else(|| panic!("BUG! process missing from its own split"))
        };
        let endpoint = self.claim_split_endpoint(seq, color, members.len(), new_rank);

        Arc::new(ThreadComm::new(endpoint, self.registry.clone()))
    }
}

impl fmt::Debug for ThreadComm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadComm")
            .field("mesh", &self.endpoint.mesh_id)
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
    fn ranks_and_sizes() {
        let out = ThreadUniverse::run(4, |comm| (comm.rank(), comm.size()));
        assert_eq!(out, vec![(0, 4), (1, 4), (2, 4), (3, 4)]);
    }

    #[test]
    fn broadcast_and_gather() {
        let out = ThreadUniverse::run(3, |comm| {
            let data = match comm.rank() {
                1 => Some(vec![1.0, 2.0, 3.0]),
                _ => None,
            };
            let data = comm.broadcast(1, data);
            let gathered = comm.gather(2, vec![comm.rank() as f64]);
            (data, gathered)
        });
        for (rank, (data, gathered)) in out.into_iter().enumerate() {
            assert_eq!(data, vec![1.0, 2.0, 3.0]);
            match rank {
                2 => assert_eq!(gathered, Some(vec![vec![0.0], vec![1.0], vec![2.0]])),
                _ => assert_eq!(gathered, None),
            }
        }
    }

    #[test]
    fn scatter_delivers_by_rank() {
        let out = ThreadUniverse::run(3, |comm| {
            let data = match comm.rank() {
                0 => Some((0..3).map(|k| vec![10.0 * k as f64; k]).collect()),
                _ => None,
            };
            comm.scatter(0, data)
        });
        assert_eq!(out, vec![vec![], vec![10.0], vec![20.0, 20.0]]);
    }

    #[test]
    fn all_to_all_is_a_transpose() {
        let out = ThreadUniverse::run(3, |comm| {
            let me = comm.rank() as f64;
            let data = (0..3).map(|dest| vec![10.0 * me + dest as f64]).collect();
            comm.all_to_all(data)
        });
        for (rank, received) in out.into_iter().enumerate() {
            let expected = (0..3).map(|source| vec![10.0 * source as f64 + rank as f64]).collect::<Vec<_>>();
            assert_eq!(received, expected);
        }
    }

    #[test]
    fn all_reduce_is_identical_everywhere() {
        let out = ThreadUniverse::run(4, |comm| {
            let mut data = vec![0.1 * (comm.rank() + 1) as f64, 1.0];
            comm.all_reduce_sum(&mut data);
            data
        });
        assert_eq!(out[0][1], 4.0);
        for data in &out {
            assert_eq!(data, &out[0]);
        }
    }

    #[test]
    fn split_orders_by_key() {
        // six processes, split into evens and odds, reversing the order
        let out = ThreadUniverse::run(6, |comm| {
            let sub = comm.split(comm.rank() % 2, 10 - comm.rank());
            let gathered = sub.all_gather(vec![comm.rank() as f64]);
            (sub.rank(), sub.size(), gathered)
        });
        assert_eq!(out[0].0, 2);
        assert_eq!(out[4].0, 0);
        assert_eq!(out[1].1, 3);
        assert_eq!(out[0].2, vec![vec![4.0], vec![2.0], vec![0.0]]);
        assert_eq!(out[3].2, vec![vec![5.0], vec![3.0], vec![1.0]]);
    }

    #[test]
    fn repeated_splits_are_independent() {
        let out = ThreadUniverse::run(4, |comm| {
            let rows = comm.split(comm.rank() % 2, comm.rank());
            let cols = comm.split(comm.rank() / 2, comm.rank());
            let mut row_sum = [comm.rank() as f64];
            let mut col_sum = [comm.rank() as f64];
            rows.all_reduce_sum(&mut row_sum);
            cols.all_reduce_sum(&mut col_sum);
            (row_sum[0], col_sum[0])
        });
        assert_eq!(out, vec![(2.0, 1.0), (4.0, 1.0), (2.0, 5.0), (4.0, 5.0)]);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn panics_propagate() {
        ThreadUniverse::run(2, |comm| {
            if comm.rank() == 1 {
                panic!("boom");
            }
        });
    }
}
