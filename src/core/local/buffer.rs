/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::{Error, MatrixSize, Result, Scalar};

use ::std::fmt;

/// Who owns the elements of a [`LocalBuffer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Allocated by the library.
    Owned,
    /// Borrowed from the host, writable.
    View,
    /// Borrowed from the host, read-only.
    LockedView,
}

enum Storage<'a, T> {
    Owned(Vec<T>),
    View(&'a mut [T]),
    Locked(&'a [T]),
}

/// A column-major block of scalars: element `(i, j)` lives at `i + j * rows`.
///
/// Either owns its elements or borrows them from a host array for the
/// lifetime `'a`.  Writes to a view go straight to host memory.
pub struct LocalBuffer<'a, T> {
    storage: Storage<'a, T>,
    rows: usize,
    cols: usize,
}

impl<'a, T: Scalar> LocalBuffer<'a, T> {
    /// # Panics
    ///
    /// Panics if `data.len()` disagrees with `size`.
    pub fn owned(size: MatrixSize, data: Vec<T>) -> LocalBuffer<'static, T> {
        assert_eq!(data.len(), size.len(), "buffer length does not match its shape");
        LocalBuffer { storage: Storage::Owned(data), rows: size.m, cols: size.n }
    }

    pub fn zeros(size: MatrixSize) -> LocalBuffer<'static, T> {
        LocalBuffer::owned(size, vec![T::zero(); size.len()])
    }

    pub(crate) fn view(size: MatrixSize, data: &'a mut [T]) -> Self {
        assert_eq!(data.len(), size.len(), "view length does not match its shape");
        LocalBuffer { storage: Storage::View(data), rows: size.m, cols: size.n }
    }

    pub(crate) fn locked(size: MatrixSize, data: &'a [T]) -> Self {
        assert_eq!(data.len(), size.len(), "view length does not match its shape");
        LocalBuffer { storage: Storage::Locked(data), rows: size.m, cols: size.n }
    }

    pub fn size(&self) -> MatrixSize { MatrixSize { m: self.rows, n: self.cols } }

    pub fn ownership(&self) -> Ownership {
        match self.storage {
            Storage::Owned(_) => Ownership::Owned,
            Storage::View(_) => Ownership::View,
            Storage::Locked(_) => Ownership::LockedView,
        }
    }

    pub fn is_read_only(&self) -> bool { self.ownership() == Ownership::LockedView }

    /// Distance between the starts of consecutive columns.
    pub fn leading_dim(&self) -> usize { usize::max(self.rows, 1) }

    /// Element strides `[row, column]`.
    pub fn strides(&self) -> [usize; 2] { [1, self.leading_dim()] }

    pub fn as_slice(&self) -> &[T] {
        match &self.storage {
            Storage::Owned(data) => &data[..],
            Storage::View(data) => &data[..],
            Storage::Locked(data) => &data[..],
        }
    }

    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> {
        match &mut self.storage {
            Storage::Owned(data) => Ok(&mut data[..]),
            Storage::View(data) => Ok(&mut data[..]),
            Storage::Locked(_) => Err(Error::ReadOnlyViolation),
        }
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of bounds for {}x{} buffer", i, j, self.rows, self.cols);
        i + j * self.rows
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> T { self.as_slice()[self.offset(i, j)] }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> {
        let offset = self.offset(i, j);
        self.as_mut_slice()?[offset] = value;
        Ok(())
    }

    /// Deep copy with library-owned storage.
    pub fn to_owned(&self) -> LocalBuffer<'static, T> {
        LocalBuffer::owned(self.size(), self.as_slice().to_vec())
    }

    /// Release the borrow, copying only if the data is not already owned.
    pub fn into_owned(self) -> LocalBuffer<'static, T> {
        let size = self.size();
        match self.storage {
            Storage::Owned(data) => LocalBuffer::owned(size, data),
            Storage::View(data) => LocalBuffer::owned(size, data.to_vec()),
            Storage::Locked(data) => LocalBuffer::owned(size, data.to_vec()),
        }
    }

    /// Same elements, different shape.
    pub(crate) fn reshape(self, size: MatrixSize) -> Self {
        assert_eq!(self.rows * self.cols, size.len(), "BUG! reshape changes the element count");
        LocalBuffer { storage: self.storage, rows: size.m, cols: size.n }
    }

    /// Column-major transpose into a new buffer.
    pub fn transposed(&self) -> LocalBuffer<'static, T> {
        let size = self.size();
        let mut data = Vec::with_capacity(size.len());
        for i in 0..size.m {
            for j in 0..size.n {
                data.push(self.get(i, j));
            }
        }
        LocalBuffer::owned(size.transposed(), data)
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for LocalBuffer<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (ownership, data) = match &self.storage {
            Storage::Owned(data) => (Ownership::Owned, &data[..]),
            Storage::View(data) => (Ownership::View, &data[..]),
            Storage::Locked(data) => (Ownership::LockedView, &data[..]),
        };
        f.debug_struct("LocalBuffer")
            .field("size", &MatrixSize { m: self.rows, n: self.cols })
            .field("ownership", &ownership)
            .field("data", &data)
            .finish()
    }
}
