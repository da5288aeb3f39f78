/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalMatrix, Ownership};
use crate::{Error, MatrixSize, Result, Scalar};

use ::ndarray::{Array1, ArrayBase, ArrayView1, ArrayViewMut1, Data, Ix1};

/// Whether a vector stands as a column (`len x 1`) or a row (`1 x len`).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Orientation {
    Column,
    Row,
}

impl Orientation {
    /// Matrix shape of a vector with this orientation.
    pub fn size_of(self, len: usize) -> MatrixSize {
        match self {
            Orientation::Column => MatrixSize::new(len, 1),
            Orientation::Row => MatrixSize::new(1, len),
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Orientation::Column => Orientation::Row,
            Orientation::Row => Orientation::Column,
        }
    }

    /// The extent of `size` along which a vector of this orientation runs.
    pub fn length_in(self, size: MatrixSize) -> usize {
        match self {
            Orientation::Column => size.m,
            Orientation::Row => size.n,
        }
    }
}

/// A one-dimensional [`LocalMatrix`].
#[derive(Debug)]
pub struct LocalVector<'a, T> {
    buffer: LocalBuffer<'a, T>,
    orientation: Orientation,
}

fn check_host_layout<S, T>(host: &ArrayBase<S, Ix1>) -> Result<()>
where
    S: Data<Elem = T>,
    T: Scalar,
{
    T::DTYPE.ensure_enabled()?;
    match host.is_standard_layout() {
        true => Ok(()),
        false => Err(Error::NonContiguousLayout {
            shape: host.shape().to_vec(),
            strides: host.strides().to_vec(),
        }),
    }
}

impl<'a, T: Scalar> LocalVector<'a, T> {
    /// Attach to a writable host array without copying.  The array must have unit stride.
    pub fn view_from(host: ArrayViewMut1<'a, T>, orientation: Orientation) -> Result<Self> {
        check_host_layout(&host)?;

        let size = orientation.size_of(host.len());
        let shape = host.shape().to_vec();
        let data = host.into_slice().ok_or_else(|| Error::NonContiguousLayout { shape, strides: vec![] })?;
        Ok(LocalVector { buffer: LocalBuffer::view(size, data), orientation })
    }

    pub fn view_from_readonly(host: ArrayView1<'a, T>, orientation: Orientation) -> Result<Self> {
        check_host_layout(&host)?;

        let size = orientation.size_of(host.len());
        let shape = host.shape().to_vec();
        let data = host.to_slice().ok_or_else(|| Error::NonContiguousLayout { shape, strides: vec![] })?;
        Ok(LocalVector { buffer: LocalBuffer::locked(size, data), orientation })
    }

    pub fn zeros(len: usize, orientation: Orientation) -> LocalVector<'static, T> {
        LocalVector { buffer: LocalBuffer::zeros(orientation.size_of(len)), orientation }
    }

    pub fn from_vec(data: Vec<T>, orientation: Orientation) -> LocalVector<'static, T> {
        let size = orientation.size_of(data.len());
        LocalVector { buffer: LocalBuffer::owned(size, data), orientation }
    }

    pub(crate) fn from_buffer(buffer: LocalBuffer<'a, T>, orientation: Orientation) -> Result<Self> {
        let size = buffer.size();
        let len = orientation.length_in(size);
        // an empty shard of a vector can have either extent zero
        let buffer = match (size.is_empty(), orientation.size_of(len) == size) {
            (_, true) => buffer,
            (true, false) => buffer.reshape(orientation.size_of(0)),
            (false, false) => {
                return Err(Error::ShapeMismatch { expected: orientation.size_of(size.len()), found: size });
            },
        };
        Ok(LocalVector { buffer, orientation })
    }

    pub fn orientation(&self) -> Orientation { self.orientation }
    pub fn length(&self) -> usize { self.orientation.length_in(self.buffer.size()) }
    pub fn size(&self) -> MatrixSize { self.buffer.size() }
    pub fn ownership(&self) -> Ownership { self.buffer.ownership() }
    pub fn is_view(&self) -> bool { self.buffer.ownership() != Ownership::Owned }
    pub fn is_read_only(&self) -> bool { self.buffer.is_read_only() }

    pub fn buffer(&self) -> &LocalBuffer<'a, T> { &self.buffer }
    pub fn into_buffer(self) -> LocalBuffer<'a, T> { self.buffer }

    pub fn as_slice(&self) -> &[T] { self.buffer.as_slice() }
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> { self.buffer.as_mut_slice() }

    pub fn get(&self, k: usize) -> T { self.as_slice()[k] }

    pub fn set(&mut self, k: usize, value: T) -> Result<()> {
        self.as_mut_slice()?[k] = value;
        Ok(())
    }

    pub fn view(&self) -> ArrayView1<'_, T> { ArrayView1::from(self.as_slice()) }

    pub fn view_to_host(&mut self) -> Result<ArrayViewMut1<'_, T>> {
        Ok(ArrayViewMut1::from(self.as_mut_slice()?))
    }

    pub fn to_array(&self) -> Array1<T> { self.view().to_owned() }

    pub fn to_owned(&self) -> LocalVector<'static, T> {
        LocalVector { buffer: self.buffer.to_owned(), orientation: self.orientation }
    }

    pub fn into_owned(self) -> LocalVector<'static, T> {
        LocalVector { buffer: self.buffer.into_owned(), orientation: self.orientation }
    }

    /// Same data, as a `len x 1` or `1 x len` matrix.
    pub fn into_matrix(self) -> LocalMatrix<'a, T> { LocalMatrix::from_buffer(self.buffer) }

    /// Same data, other orientation.
    pub fn flipped(self) -> Self {
        let orientation = self.orientation.flipped();
        let size = self.buffer.size().transposed();
        LocalVector { buffer: self.buffer.reshape(size), orientation }
    }
}
