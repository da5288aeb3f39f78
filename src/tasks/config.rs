/* ************************************************************************ **
** This file is part of dmat, and is licensed under EITHER the MIT license  **
** or the Apache 2.0 license, at your option.                               **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Config files.
//!
//! Every config type is read through [`YamlRead`], which warns about keys that
//! were not used (most likely typos).

use ::dmat_core::{Distribution, Dtype};
use ::dmat_pca::PcaControl;
use ::serde::{Deserialize, Serialize};
use ::std::io::Read;

/// Provides an alternative to `serde_yaml::from_reader` that reports unused keys.
pub trait YamlRead: for<'de> Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> Result<Self, ::serde_yaml::Error>
    { YamlRead::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> Result<Self, ::serde_yaml::Error> {
        // serde_ignored needs a Deserializer, and serde_yaml only offers one for Value.
        Self::from_value(value_from_dyn_reader(r)?)
    }

    fn from_value(value: ::serde_yaml::Value) -> Result<Self, ::serde_yaml::Error>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn from_value(value: ::serde_yaml::Value) -> Result<$Type, ::serde_yaml::Error> {
                ::serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                )
            }
        }
    };
}

derive_yaml_read!{::serde_yaml::Value}
derive_yaml_read!{Settings}

fn value_from_dyn_reader(r: &mut dyn Read) -> Result<::serde_yaml::Value, ::serde_yaml::Error>
{ ::serde_yaml::from_reader(r) }

/// Settings for `dmat-pca`.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    /// Number of processes in the grid.  Ignored under MPI, where the world decides.
    #[serde(default = "defaults::processes")]
    pub processes: usize,

    /// Height of the process grid.  Chosen automatically when absent.
    #[serde(default)]
    pub grid_height: Option<usize>,

    /// How the data is spread over the grid, e.g. `"MC,MR"` or `"[VC,STAR]"`.
    #[serde(default = "defaults::distribution")]
    pub distribution: Distribution,

    #[serde(default)]
    pub pca: PcaControl,

    /// Scalar type used for the computation.  Must be real.
    #[serde(default = "defaults::dtype")]
    pub dtype: Dtype,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            processes: defaults::processes(),
            grid_height: None,
            distribution: defaults::distribution(),
            pca: Default::default(),
            dtype: defaults::dtype(),
        }
    }
}

mod defaults {
    use super::*;

    pub(crate) fn processes() -> usize { 1 }
    pub(crate) fn distribution() -> Distribution { Distribution::MC_MR }
    pub(crate) fn dtype() -> Dtype { Dtype::Real64 }
}
