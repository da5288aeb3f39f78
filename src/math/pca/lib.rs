/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Principal component analysis of `m x n` data (`m` samples of `n` features).
//!
//! The data is optionally centered and normalized column by column, and then
//! factored by a singular value decomposition `X = U S V^T`.  The results
//! always satisfy
//!
//! ```text
//! data ~= score * coeff^T + expand(mean)
//! ```
//!
//! whatever the options (`mean` is zero when not centering).

#[macro_use]
extern crate log;

mod svd;
mod local;
mod distributed;

use ::serde::{Deserialize, Serialize};

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, ::thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] ::dmat_core::Error),

    #[error("singular value decomposition did not converge")]
    NoConvergence,
}

/// Options for [`pca`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[serde(rename_all = "kebab-case")]
pub struct PcaControl {
    /// Only compute the first `min(m, n)` components.
    ///
    /// Otherwise there are `n` components, and those past `min(m, n)` have
    /// zero score and zero variance.
    pub economy: bool,
    /// Subtract the mean of each column first.
    pub center: bool,
    /// Divide each (centered) column by its sample standard deviation first.
    pub normalize: bool,
}

impl Default for PcaControl {
    fn default() -> Self {
        PcaControl { economy: true, center: true, normalize: false }
    }
}

/// Output of [`pca`].
///
/// For a distributed input, `coeff` and `score` share its distribution,
/// `latent` is a `[VC,STAR]` column vector and `mean` is a `[STAR,VC]` row vector.
#[derive(Debug)]
pub struct PcaResult<M, V> {
    /// `n x ncomp` loadings.  Column `c` is the direction of component `c`,
    /// scaled back by the column deviations when normalizing.
    pub coeff: M,
    /// `m x ncomp` representation of the data in terms of the components.
    pub score: M,
    /// Variance of each component, in decreasing order.
    pub latent: V,
    /// Row vector of column means, or zero when not centering.
    pub mean: V,
}

pub trait Pca {
    type Output;

    fn pca(&self, control: &PcaControl) -> Result<Self::Output>;
}

/// Principal component analysis.
///
/// The sign of each component is chosen to make the largest-magnitude entry
/// of its `coeff` column positive.
///
/// # Collective
///
/// For distributed matrices.  The decomposition itself is computed on the
/// root process; if it fails, every process gets the error.
pub fn pca<X: Pca + ?Sized>(x: &X, control: &PcaControl) -> Result<X::Output> { x.pca(control) }
