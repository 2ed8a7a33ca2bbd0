//! Per-model value maps
//!
//! Upstream models publish different subsets of variables. A missing key in a
//! [`ModelValues`] means the model has no data for that slot, which is not the
//! same thing as a zero reading.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use crate::MediSnowError;

/// Numerical weather prediction models requested from the forecast provider
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeatherModel {
    GemSeamless,
    EcmwfIfs,
    GfsSeamless,
    NcepNbmConus,
    GfsGraphcast025,
    EcmwfAifs025Single,
    NcepNamConus,
}

impl WeatherModel {
    /// Every model, in the order they are requested upstream
    pub const ALL: [WeatherModel; 7] = [
        WeatherModel::GemSeamless,
        WeatherModel::EcmwfIfs,
        WeatherModel::GfsSeamless,
        WeatherModel::NcepNbmConus,
        WeatherModel::GfsGraphcast025,
        WeatherModel::EcmwfAifs025Single,
        WeatherModel::NcepNamConus,
    ];

    /// Stable identifier used as the map key in serialized output
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            WeatherModel::GemSeamless => "GemSeamless",
            WeatherModel::EcmwfIfs => "EcmwfIfs",
            WeatherModel::GfsSeamless => "GfsSeamless",
            WeatherModel::NcepNbmConus => "NcepNbmConus",
            WeatherModel::GfsGraphcast025 => "GfsGraphcast025",
            WeatherModel::EcmwfAifs025Single => "EcmwfAifs025Single",
            WeatherModel::NcepNamConus => "NcepNamConus",
        }
    }

    /// Name used by the provider in request parameters and payload keys
    #[must_use]
    pub fn api_name(self) -> &'static str {
        match self {
            WeatherModel::GemSeamless => "gem_seamless",
            WeatherModel::EcmwfIfs => "ecmwf_ifs",
            WeatherModel::GfsSeamless => "gfs_seamless",
            WeatherModel::NcepNbmConus => "ncep_nbm_conus",
            WeatherModel::GfsGraphcast025 => "gfs_graphcast025",
            WeatherModel::EcmwfAifs025Single => "ecmwf_aifs025_single",
            WeatherModel::NcepNamConus => "ncep_nam_conus",
        }
    }
}

impl fmt::Display for WeatherModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for WeatherModel {
    type Err = MediSnowError;

    /// Accepts either the identifier or the provider name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WeatherModel::ALL
            .into_iter()
            .find(|model| model.id() == s || model.api_name() == s)
            .ok_or_else(|| MediSnowError::validation(format!("unknown weather model '{s}'")))
    }
}

/// Values of one variable keyed by the model that published them
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(transparent)]
pub struct ModelValues<V>(BTreeMap<WeatherModel, V>);

impl<V> Default for ModelValues<V> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<V> ModelValues<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, model: WeatherModel, value: V) {
        self.0.insert(model, value);
    }

    #[must_use]
    pub fn get(&self, model: WeatherModel) -> Option<&V> {
        self.0.get(&model)
    }

    #[must_use]
    pub fn has_model(&self, model: WeatherModel) -> bool {
        self.0.contains_key(&model)
    }

    /// Models present in the map
    #[must_use]
    pub fn models(&self) -> Vec<WeatherModel> {
        self.0.keys().copied().collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, WeatherModel, V> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> FromIterator<(WeatherModel, V)> for ModelValues<V> {
    fn from_iter<I: IntoIterator<Item = (WeatherModel, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a, V> IntoIterator for &'a ModelValues<V> {
    type Item = (&'a WeatherModel, &'a V);
    type IntoIter = btree_map::Iter<'a, WeatherModel, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
