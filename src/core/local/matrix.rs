/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

use crate::local::{LocalBuffer, LocalVector, Orientation, Ownership};
use crate::{Error, MatrixSize, Result, Scalar};

use ::ndarray::{Array2, ArrayBase, ArrayView2, ArrayViewMut2, Data, Ix2, ShapeBuilder};

/// A dense matrix held entirely by the calling process.
///
/// Elements are stored column-major.  A `LocalMatrix` may be a view of a
/// host-owned ndarray, in which case no copy is made and writes through
/// the matrix are visible in the host array.
#[derive(Debug)]
pub struct LocalMatrix<'a, T> {
    buffer: LocalBuffer<'a, T>,
}

fn check_host_layout<S, T>(host: &ArrayBase<S, Ix2>) -> Result<()>
where
    S: Data<Elem = T>,
    T: Scalar,
{
    T::DTYPE.ensure_enabled()?;

    // column-major means the transpose is in standard (C) layout
    match host.t().is_standard_layout() {
        true => Ok(()),
        false => Err(Error::NonContiguousLayout {
            shape: host.shape().to_vec(),
            strides: host.strides().to_vec(),
        }),
    }
}

fn no_slice(shape: &[usize]) -> Error {
    Error::NonContiguousLayout { shape: shape.to_vec(), strides: vec![] }
}

impl<'a, T: Scalar> LocalMatrix<'a, T> {
    /// Attach to a writable host array without copying.
    ///
    /// The array must be contiguous in column-major ("Fortran") order, e.g.
    /// created with `Array2::zeros((m, n).f())`.
    pub fn view_from(host: ArrayViewMut2<'a, T>) -> Result<Self> {
        check_host_layout(&host)?;

        let size = MatrixSize::from(host.dim());
        let shape = host.shape().to_vec();
        let data = host.reversed_axes().into_slice().ok_or_else(|| no_slice(&shape))?;
        Ok(LocalMatrix { buffer: LocalBuffer::view(size, data) })
    }

    /// Attach to a host array without copying.  Writes through the
    /// resulting matrix fail with [`Error::ReadOnlyViolation`].
    pub fn view_from_readonly(host: ArrayView2<'a, T>) -> Result<Self> {
        check_host_layout(&host)?;

        let size = MatrixSize::from(host.dim());
        let shape = host.shape().to_vec();
        let data = host.reversed_axes().to_slice().ok_or_else(|| no_slice(&shape))?;
        Ok(LocalMatrix { buffer: LocalBuffer::locked(size, data) })
    }

    pub fn zeros(size: MatrixSize) -> LocalMatrix<'static, T> {
        LocalMatrix { buffer: LocalBuffer::zeros(size) }
    }

    pub fn from_column_major(size: MatrixSize, data: Vec<T>) -> Result<LocalMatrix<'static, T>> {
        if data.len() != size.len() {
            return Err(Error::ShapeMismatch { expected: size, found: MatrixSize::new(data.len(), 1) });
        }
        Ok(LocalMatrix { buffer: LocalBuffer::owned(size, data) })
    }

    /// Copy an ndarray of any layout.
    pub fn from_array<S>(array: &ArrayBase<S, Ix2>) -> LocalMatrix<'static, T>
    where S: Data<Elem = T>,
    {
        let size = MatrixSize::from(array.dim());
        // iterating the transpose in logical order visits columns first
        let data = array.t().iter().cloned().collect();
        LocalMatrix { buffer: LocalBuffer::owned(size, data) }
    }

    pub(crate) fn from_buffer(buffer: LocalBuffer<'a, T>) -> Self { LocalMatrix { buffer } }

    pub fn size(&self) -> MatrixSize { self.buffer.size() }
    pub fn ownership(&self) -> Ownership { self.buffer.ownership() }
    pub fn is_view(&self) -> bool { self.buffer.ownership() != Ownership::Owned }
    pub fn is_read_only(&self) -> bool { self.buffer.is_read_only() }
    pub fn leading_dim(&self) -> usize { self.buffer.leading_dim() }

    pub fn buffer(&self) -> &LocalBuffer<'a, T> { &self.buffer }
    pub fn into_buffer(self) -> LocalBuffer<'a, T> { self.buffer }

    /// Elements in column-major order.
    pub fn as_slice(&self) -> &[T] { self.buffer.as_slice() }
    pub fn as_mut_slice(&mut self) -> Result<&mut [T]> { self.buffer.as_mut_slice() }

    pub fn get(&self, i: usize, j: usize) -> T { self.buffer.get(i, j) }
    pub fn set(&mut self, i: usize, j: usize, value: T) -> Result<()> { self.buffer.set(i, j, value) }

    /// Read-only ndarray view of the elements.  Always allowed.
    pub fn view(&self) -> ArrayView2<'_, T> {
        let shape = self.size().dim().f();
        match ArrayView2::from_shape(shape, self.as_slice()) {
            Ok(view) => view,
            Err(e) => panic!("BUG! buffer length disagrees with its shape: {}", e),
        }
    }

    /// Writable ndarray view of the elements, sharing memory with this matrix
    /// (and with the host, if this is a view).
    pub fn view_to_host(&mut self) -> Result<ArrayViewMut2<'_, T>> {
        let shape = self.size().dim().f();
        let data = self.as_mut_slice()?;
        match ArrayViewMut2::from_shape(shape, data) {
            Ok(view) => Ok(view),
            Err(e) => panic!("BUG! buffer length disagrees with its shape: {}", e),
        }
    }

    /// Copy into a library-owned ndarray (in column-major layout).
    pub fn to_array(&self) -> Array2<T> { self.view().to_owned() }

    pub fn to_owned(&self) -> LocalMatrix<'static, T> {
        LocalMatrix { buffer: self.buffer.to_owned() }
    }

    pub fn into_owned(self) -> LocalMatrix<'static, T> {
        LocalMatrix { buffer: self.buffer.into_owned() }
    }

    /// Reinterpret a single row or column as a vector, without copying.
    pub fn into_vector(self, orientation: Orientation) -> Result<LocalVector<'a, T>> {
        LocalVector::from_buffer(self.buffer, orientation)
    }
}
