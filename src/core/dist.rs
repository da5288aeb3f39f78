/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Element-cyclic distribution schemes.
//!
//! A [`Distribution`] pairs a rule for rows with a rule for columns.  Each rule
//! is a [`Dist`], which decides for every global index along its axis which
//! processes hold it:
//!
//! | rule   | held by                                               |
//! |--------|-------------------------------------------------------|
//! | `STAR` | every process                                         |
//! | `MC`   | grid row `i % height`                                 |
//! | `MR`   | grid column `i % width`                               |
//! | `VC`   | the process with column-major grid rank `i % size`    |
//! | `VR`   | the process with row-major grid rank `i % size`       |
//! | `CIRC` | the root only                                         |
//!
//! A process holds element `(i, j)` when it holds both row `i` and column `j`.

use crate::{Error, MatrixSize, ProcessGrid, Result, ROOT};

use ::std::fmt;
use ::std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "UPPERCASE"))]
pub enum Dist {
    Mc,
    Mr,
    Vc,
    Vr,
    Star,
    Circ,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde-support", serde(rename_all = "UPPERCASE"))]
pub enum DistWrap {
    Element,
    Block,
}

/// Number of elements held by the process at `shift` when `global` elements
/// are dealt round-robin to `stride` processes.
#[inline]
pub fn local_length(global: usize, shift: usize, stride: usize) -> usize {
    if global > shift { (global - shift - 1) / stride + 1 } else { 0 }
}

/// The slice of one axis held by the calling process: global indices
/// `shift, shift + stride, shift + 2 * stride, ...`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisLayout {
    pub stride: usize,
    pub shift: usize,
    /// `false` if the process holds nothing along this axis regardless of its length.
    pub participating: bool,
}

impl AxisLayout {
    pub fn local_length(&self, global: usize) -> usize {
        match self.participating {
            true => local_length(global, self.shift, self.stride),
            false => 0,
        }
    }

    #[inline]
    pub fn global_index(&self, local: usize) -> usize { self.shift + local * self.stride }

    pub fn local_index(&self, global: usize) -> Option<usize> {
        match self.participating && global % self.stride == self.shift {
            true => Some(global / self.stride),
            false => None,
        }
    }
}

/// The grid coordinates that a global index pins its holders to.
/// `None` means any row (or column) of the grid.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub(crate) struct Owner {
    pub row: Option<usize>,
    pub col: Option<usize>,
}

impl Owner {
    pub fn merge(self, other: Owner) -> Owner {
        Owner { row: self.row.or(other.row), col: self.col.or(other.col) }
    }
}

impl Dist {
    pub const ALL: [Dist; 6] = [Dist::Mc, Dist::Mr, Dist::Vc, Dist::Vr, Dist::Star, Dist::Circ];

    pub fn name(self) -> &'static str {
        match self {
            Dist::Mc => "MC",
            Dist::Mr => "MR",
            Dist::Vc => "VC",
            Dist::Vr => "VR",
            Dist::Star => "STAR",
            Dist::Circ => "CIRC",
        }
    }

    // Under CIRC, non-root processes hold no rows but keep the full column
    // extent, so their shards are 0 x n.
    fn axis(self, grid: &ProcessGrid, is_row_axis: bool) -> AxisLayout {
        let (stride, shift, participating) = match self {
            Dist::Star => (1, 0, true),
            Dist::Mc => (grid.height(), grid.row(), true),
            Dist::Mr => (grid.width(), grid.col(), true),
            Dist::Vc => (grid.size(), grid.vc_rank(), true),
            Dist::Vr => (grid.size(), grid.vr_rank(), true),
            Dist::Circ => (1, 0, !is_row_axis || grid.rank() == ROOT),
        };
        AxisLayout { stride, shift, participating }
    }

    pub(crate) fn owner(self, index: usize, grid: &ProcessGrid) -> Owner {
        let (height, width, size) = (grid.height(), grid.width(), grid.size());
        match self {
            Dist::Star => Owner::default(),
            Dist::Mc => Owner { row: Some(index % height), col: None },
            Dist::Mr => Owner { row: None, col: Some(index % width) },
            Dist::Vc => {
                let rank = index % size;
                Owner { row: Some(rank % height), col: Some(rank / height) }
            },
            Dist::Vr => {
                let rank = index % size;
                Owner { row: Some(rank / width), col: Some(rank % width) }
            },
            Dist::Circ => Owner { row: Some(0), col: Some(0) },
        }
    }

    fn spans_grid_rows(self) -> bool {
        match self {
            Dist::Mc | Dist::Vc | Dist::Vr | Dist::Circ => true,
            Dist::Mr | Dist::Star => false,
        }
    }

    fn spans_grid_cols(self) -> bool {
        match self {
            Dist::Mr | Dist::Vc | Dist::Vr | Dist::Circ => true,
            Dist::Mc | Dist::Star => false,
        }
    }
}

impl DistWrap {
    pub fn name(self) -> &'static str {
        match self {
            DistWrap::Element => "ELEMENT",
            DistWrap::Block => "BLOCK",
        }
    }
}

/// How the elements of a distributed object are spread over a [`ProcessGrid`].
///
/// Only a fixed set of `(row, col)` pairs is supported, and only element-cyclic wrapping.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Distribution {
    row: Dist,
    col: Dist,
    wrap: DistWrap,
}

macro_rules! distribution_consts {
    ($($NAME:ident = ($row:ident, $col:ident);)*) => {
        impl Distribution {
            $(
                pub const $NAME: Distribution = Distribution { row: Dist::$row, col: Dist::$col, wrap: DistWrap::Element };
            )*

            /// Every supported distribution.
            pub const SUPPORTED: &'static [Distribution] = &[$(Distribution::$NAME),*];
        }
    };
}

distribution_consts! {
    STAR_STAR = (Star, Star);
    MC_MR = (Mc, Mr);
    MR_MC = (Mr, Mc);
    MC_STAR = (Mc, Star);
    STAR_MC = (Star, Mc);
    MR_STAR = (Mr, Star);
    STAR_MR = (Star, Mr);
    VC_STAR = (Vc, Star);
    STAR_VC = (Star, Vc);
    VR_STAR = (Vr, Star);
    STAR_VR = (Star, Vr);
    CIRC_CIRC = (Circ, Circ);
}

impl Distribution {
    /// Every distribution that objects can be created with.
    pub fn supported() -> impl Iterator<Item = Distribution> { Distribution::SUPPORTED.iter().cloned() }

    pub fn new(row: Dist, col: Dist, wrap: DistWrap) -> Result<Self> {
        let dist = Distribution { row, col, wrap };
        match Distribution::SUPPORTED.contains(&dist) {
            true => Ok(dist),
            false => Err(Error::DistributionNotSupported { row, col, wrap }),
        }
    }

    pub fn row_dist(self) -> Dist { self.row }
    pub fn col_dist(self) -> Dist { self.col }
    pub fn wrap(self) -> DistWrap { self.wrap }

    /// Swap the row and column rules.  Every supported pair has a supported transpose.
    pub fn transposed(self) -> Self { Distribution { row: self.col, col: self.row, wrap: self.wrap } }

    /// Every process holds every element.
    pub fn is_replicated(self) -> bool { self == Distribution::STAR_STAR }

    /// Only the root holds anything.
    pub fn is_root_only(self) -> bool { self == Distribution::CIRC_CIRC }

    /// Every element is held by exactly one process.
    pub fn is_unique(self) -> bool {
        (self.row.spans_grid_rows() || self.col.spans_grid_rows())
            && (self.row.spans_grid_cols() || self.col.spans_grid_cols())
    }

    pub fn row_axis(self, grid: &ProcessGrid) -> AxisLayout { self.row.axis(grid, true) }
    pub fn col_axis(self, grid: &ProcessGrid) -> AxisLayout { self.col.axis(grid, false) }

    /// Shape of the calling process's shard of a `global` matrix.
    pub fn local_size(self, global: MatrixSize, grid: &ProcessGrid) -> MatrixSize {
        MatrixSize {
            m: self.row_axis(grid).local_length(global.m),
            n: self.col_axis(grid).local_length(global.n),
        }
    }

    /// Grid coordinates pinned by element `(i, j)`.
    pub(crate) fn owner(self, i: usize, j: usize, grid: &ProcessGrid) -> Owner {
        self.row.owner(i, grid).merge(self.col.owner(j, grid))
    }

    /// Whether the calling process can be assigned elements at all, whatever
    /// the global size.  Only CIRC shuts processes out.
    pub fn participating(self, grid: &ProcessGrid) -> bool {
        self.row_axis(grid).participating && self.col_axis(grid).participating
    }

    /// Whether the calling process is the one process chosen to speak for its
    /// elements when each element must be counted exactly once.
    ///
    /// Replicas are spread along grid rows or columns the scheme does not use;
    /// the one in grid row (or column) zero is chosen.
    pub fn is_canonical_holder(self, grid: &ProcessGrid) -> bool {
        let spans_rows = self.row.spans_grid_rows() || self.col.spans_grid_rows();
        let spans_cols = self.row.spans_grid_cols() || self.col.spans_grid_cols();
        (spans_rows || grid.row() == 0) && (spans_cols || grid.col() == 0)
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl fmt::Display for DistWrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.row, self.col, self.wrap)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseDistributionError {
    #[error("unknown distribution rule: {0:?}")]
    UnknownDist(String),
    #[error("unknown wrapping: {0:?}")]
    UnknownWrap(String),
    #[error("expected something like \"MC,MR\", got {0:?}")]
    Syntax(String),
    #[error("{0}")]
    Unsupported(#[from] Error),
}

impl FromStr for Dist {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> ::std::result::Result<Dist, ParseDistributionError> {
        let upper = s.trim().to_ascii_uppercase();
        Dist::ALL.iter().cloned()
            .find(|d| d.name() == upper || (upper == "*" && *d == Dist::Star))
            .ok_or_else(|| ParseDistributionError::UnknownDist(s.to_string()))
    }
}

impl FromStr for DistWrap {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> ::std::result::Result<DistWrap, ParseDistributionError> {
        match &s.trim().to_ascii_uppercase()[..] {
            "ELEMENT" => Ok(DistWrap::Element),
            "BLOCK" => Ok(DistWrap::Block),
            _ => Err(ParseDistributionError::UnknownWrap(s.to_string())),
        }
    }
}

/// Accepts `MC,MR`, `[MC,MR]`, `[MC,MR,ELEMENT]`, and `MC_MR`.
impl FromStr for Distribution {
    type Err = ParseDistributionError;

    fn from_str(s: &str) -> ::std::result::Result<Distribution, ParseDistributionError> {
        let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
        let parts = inner.split(|c| c == ',' || c == '_').collect::<Vec<_>>();
        let (row, col, wrap) = match &parts[..] {
            [row, col] => (row.parse()?, col.parse()?, DistWrap::Element),
            [row, col, wrap] => (row.parse()?, col.parse()?, wrap.parse()?),
            _ => return Err(ParseDistributionError::Syntax(s.to_string())),
        };
        Ok(Distribution::new(row, col, wrap)?)
    }
}

#[cfg(feature = "serde-support")]
mod serde_impls {
    use super::Distribution;
    use ::serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Distribution {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_str(self)
        }
    }

    impl<'de> Deserialize<'de> for Distribution {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(de::Error::custom)
        }
    }
}
