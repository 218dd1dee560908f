//! # Location Registry
//!
//! Holds the curated list of known locations and answers name lookups.
//!
//! The registry is filled once at startup from a [`LocationSource`] and is
//! read-only afterwards. A failed load is not fatal: [`LocationRegistry::load_or_empty`]
//! returns an empty registry plus the error, and the rest of the
//! application keeps working in custom-only mode.
//!
//! ## Source Format
//!
//! ```json
//! [
//!   { "name": "Main Street", "bon": "123", "operator": "456", "maps": "https://maps.example/1" }
//! ]
//! ```

mod source;

pub use source::LocationSource;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::LoadError;

/// A known location with its payment-code pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Unique display name, also the lookup key
    pub name: String,
    /// BON code embedded verbatim in payloads
    pub bon: String,
    /// Operator code embedded verbatim in payloads
    pub operator: String,
    /// External map link
    pub maps: String,
}

/// Ordered, immutable collection of known locations.
#[derive(Debug, Clone, Default)]
pub struct LocationRegistry {
    locations: Vec<Location>,
}

impl LocationRegistry {
    /// Build a registry from already-validated locations.
    pub fn new(locations: Vec<Location>) -> Result<Self, LoadError> {
        validate(&locations)?;
        Ok(Self { locations })
    }

    /// Parse a JSON location list.
    pub fn from_json(bytes: &[u8]) -> Result<Self, LoadError> {
        let locations: Vec<Location> =
            serde_json::from_slice(bytes).map_err(|e| LoadError::Malformed(e.to_string()))?;
        Self::new(locations)
    }

    /// Load the registry from a source.
    pub async fn load(source: &LocationSource) -> Result<Self, LoadError> {
        let bytes = source.fetch().await?;
        Self::from_json(&bytes)
    }

    /// Load the registry, degrading to an empty one on failure.
    ///
    /// The error is returned alongside so the caller can log it and tell
    /// the user why no locations are offered.
    pub async fn load_or_empty(source: &LocationSource) -> (Self, Option<LoadError>) {
        match Self::load(source).await {
            Ok(registry) => {
                tracing::info!(%source, count = registry.len(), "loaded locations");
                (registry, None)
            }
            Err(e) => {
                tracing::warn!(%source, error = %e, "unable to load predefined locations");
                (Self::default(), Some(e))
            }
        }
    }

    /// Look up a location by exact name.
    pub fn find(&self, name: &str) -> Option<&Location> {
        self.locations.iter().find(|loc| loc.name == name)
    }

    /// All locations in source order.
    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    /// The first location, selected by default at startup.
    pub fn first(&self) -> Option<&Location> {
        self.locations.first()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Names must be non-empty and unique.
fn validate(locations: &[Location]) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for (index, loc) in locations.iter().enumerate() {
        if loc.name.trim().is_empty() {
            return Err(LoadError::Malformed(format!(
                "location #{} has an empty name",
                index + 1
            )));
        }
        if !seen.insert(loc.name.as_str()) {
            return Err(LoadError::Malformed(format!(
                "duplicate location name '{}'",
                loc.name
            )));
        }
    }
    Ok(())
}
