//! Profile and filter criteria types.
//!
//! Profiles are owned by the directory service and read-only to the
//! engagement loop. Filter criteria are owned by the settings layer and read
//! once per cycle.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Gender of a profile, used for directory filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Women,
    Men,
    Other,
}

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Mean earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

impl Location {
    /// Create a new location.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another location in meters (haversine).
    pub fn distance_m(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlon = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_M * c
    }
}

/// Inclusive age range for directory filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u8,
    pub max: u8,
}

impl AgeRange {
    /// Create a new age range.
    pub fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    /// Check whether an age falls within the range.
    pub fn contains(&self, age: u8) -> bool {
        age >= self.min && age <= self.max
    }
}

/// Criteria applied by the directory when querying nearby profiles.
///
/// Empty `genders` or `tags` lists mean "no filtering on that attribute".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Search radius in meters.
    #[serde(rename = "radius-m")]
    pub radius_m: u32,

    /// Genders to include; empty means all.
    pub genders: Vec<Gender>,

    /// Age range to include; None means all ages.
    #[serde(rename = "age-range")]
    pub age_range: Option<AgeRange>,

    /// Tag allow-list; empty means any tags.
    pub tags: Vec<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            radius_m: 10_000,
            genders: Vec::new(),
            age_range: None,
            tags: Vec::new(),
        }
    }
}

/// A user profile as served by the directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Stable user identifier.
    pub uid: String,

    /// Display name.
    pub name: String,

    /// Gender, if set on the profile.
    pub gender: Option<Gender>,

    /// Age in years, if known.
    pub age: Option<u8>,

    /// Interest tags used for overlap matching.
    pub tags: BTreeSet<String>,

    /// Last known location; absent when the user has never shared it.
    pub location: Option<Location>,

    /// Push notification token; absent when messaging was never registered.
    pub token: Option<String>,
}

impl Profile {
    /// Create a profile with just identity fields set.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the interest tags.
    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the location.
    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.location = Some(Location::new(latitude, longitude));
        self
    }

    /// Set the push token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the gender.
    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    /// Set the age.
    pub fn with_age(mut self, age: u8) -> Self {
        self.age = Some(age);
        self
    }
}
