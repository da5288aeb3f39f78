/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::Communicator;

/// Helper trait to broadcast data from the root process to all processes,
/// including vectors of unknown length, and types with no default.
pub trait Broadcast: Sized {
    /// Broadcast a value from the root to other processes.
    ///
    /// The value of `value` is ignored on non-root processes, and must be `Some` on the
    /// root process.
    ///
    // NOTE: Every impl rides on `Communicator::broadcast`, so values are first
    //       encoded as f64.  Integers are exact up to 2^53.
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<Self>) -> Self;
}

impl Broadcast for Vec<f64> {
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<Vec<f64>>) -> Vec<f64>
    { comm.broadcast(root, value) }
}

macro_rules! impl_broadcast_for_primitive {
    ($($T:ident)*) => {$(
        impl Broadcast for $T {
            fn broadcast(comm: &dyn Communicator, root: usize, value: Option<$T>) -> $T {
                let buf = comm.broadcast(root, value.map(|x| vec![x as f64]));
                buf[0] as $T
            }
        }
    )*};
}
impl_broadcast_for_primitive! {
    i32 i64 isize
    u32 u64 usize
    f32 f64
}

impl Broadcast for bool {
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<bool>) -> bool {
        let buf = comm.broadcast(root, value.map(|x| vec![if x { 1.0 } else { 0.0 }]));
        buf[0] != 0.0
    }
}

impl Broadcast for Vec<usize> {
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<Vec<usize>>) -> Vec<usize> {
        let value = value.map(|v| v.into_iter().map(|x| x as f64).collect());
        comm.broadcast(root, value).into_iter().map(|x| x as usize).collect()
    }
}

impl Broadcast for String {
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<String>) -> String {
        let value = value.map(|s| s.into_bytes().into_iter().map(f64::from).collect());
        let bytes = comm.broadcast(root, value).into_iter().map(|x| x as u8).collect();
        // the root produced these bytes from a String
        String::from_utf8(bytes).unwrap_or_else(|e| panic!("BUG! broadcast corrupted a string: {}", e))
    }
}

impl<A: Broadcast, B: Broadcast> Broadcast for (A, B) {
    fn broadcast(comm: &dyn Communicator, root: usize, value: Option<(A, B)>) -> (A, B) {
        let (a, b) = match value {
            Some((a, b)) => (Some(a), Some(b)),
            None => (None, None),
        };
        let a = A::broadcast(comm, root, a);
        let b = B::broadcast(comm, root, b);
        (a, b)
    }
}

pub fn this_process_is_root(comm: &dyn Communicator, root: usize) -> bool
{ comm.rank() == root }
