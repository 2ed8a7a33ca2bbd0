//! Coordinate to IANA timezone resolution
//!
//! The polygon index behind [`TzfTimezoneResolver`] takes a while to load, so
//! one instance is built at startup and shared by handle.

use tracing::debug;
use tzf_rs::DefaultFinder;

use crate::models::Coordinates;
use crate::{MediSnowError, Result};

pub trait TimezoneResolver: Send + Sync {
    /// IANA name of the timezone containing `coordinates`
    fn timezone_for(&self, coordinates: &Coordinates) -> Result<String>;
}

/// Offline resolver backed by the bundled timezone boundary data
pub struct TzfTimezoneResolver {
    finder: DefaultFinder,
}

impl TzfTimezoneResolver {
    #[must_use]
    pub fn new() -> Self {
        debug!("Loading timezone boundary index");
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for TzfTimezoneResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneResolver for TzfTimezoneResolver {
    fn timezone_for(&self, coordinates: &Coordinates) -> Result<String> {
        let name = self
            .finder
            .get_tz_name(coordinates.longitude(), coordinates.latitude());
        if name.is_empty() {
            return Err(MediSnowError::TimezoneLookup {
                latitude: coordinates.latitude(),
                longitude: coordinates.longitude(),
            });
        }
        Ok(name.to_string())
    }
}

/// Resolver that always answers with one timezone
pub struct FixedTimezoneResolver(pub String);

impl TimezoneResolver for FixedTimezoneResolver {
    fn timezone_for(&self, _coordinates: &Coordinates) -> Result<String> {
        Ok(self.0.clone())
    }
}
