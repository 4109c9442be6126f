//! Profile directory - the service that answers nearby-profile queries.
//!
//! The real app backs this with a cloud profile store; `InMemoryDirectory`
//! provides the same contract over a seedable in-process set, used by the CLI
//! and tests.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::domain::{FilterCriteria, Location, Profile};
use crate::error::{IcebreakrError, Result};

/// Asynchronous read access to the profile directory.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch the local user's own profile, if one exists.
    async fn self_profile(&self) -> Result<Option<Profile>>;

    /// Fetch profiles within `criteria.radius_m` of `center` matching the
    /// gender/age/tag filters. The result set may include the self profile;
    /// callers are expected to exclude it.
    async fn filtered_profiles(
        &self,
        center: Location,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Profile>>;
}

/// Seed file layout for `InMemoryDirectory`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectorySeed {
    /// The local user's profile.
    #[serde(rename = "self")]
    pub self_profile: Option<Profile>,

    /// Every other profile the directory knows about.
    pub profiles: Vec<Profile>,
}

/// In-process profile directory.
pub struct InMemoryDirectory {
    self_profile: RwLock<Option<Profile>>,
    profiles: RwLock<Vec<Profile>>,
    query_count: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryDirectory {
    /// Create a directory with the given self profile and peer set.
    pub fn new(self_profile: Option<Profile>, profiles: Vec<Profile>) -> Self {
        Self {
            self_profile: RwLock::new(self_profile),
            profiles: RwLock::new(profiles),
            query_count: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// Create an empty directory.
    pub fn empty() -> Self {
        Self::new(None, Vec::new())
    }

    /// Load a directory from a YAML seed file.
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let seed: DirectorySeed = serde_yaml::from_str(&content)?;
        Ok(Self::new(seed.self_profile, seed.profiles))
    }

    /// Replace the self profile.
    pub async fn set_self_profile(&self, profile: Option<Profile>) {
        *self.self_profile.write().await = profile;
    }

    /// Add a peer profile.
    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.push(profile);
    }

    /// Number of nearby-profile queries served (or rejected) so far.
    pub fn query_count(&self) -> usize {
        self.query_count.load(Ordering::SeqCst)
    }

    /// Make subsequent calls fail, to exercise transient-failure handling.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn matches(profile: &Profile, center: Location, criteria: &FilterCriteria) -> bool {
        let Some(location) = profile.location else {
            return false;
        };
        if location.distance_m(&center) > criteria.radius_m as f64 {
            return false;
        }
        if !criteria.genders.is_empty() {
            match profile.gender {
                Some(g) if criteria.genders.contains(&g) => {}
                _ => return false,
            }
        }
        if let Some(range) = criteria.age_range {
            match profile.age {
                Some(age) if range.contains(age) => {}
                _ => return false,
            }
        }
        if !criteria.tags.is_empty() && !profile.tags.iter().any(|t| criteria.tags.contains(t)) {
            return false;
        }
        true
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryDirectory {
    async fn self_profile(&self) -> Result<Option<Profile>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(IcebreakrError::Directory(
                "directory unavailable".to_string(),
            ));
        }
        Ok(self.self_profile.read().await.clone())
    }

    async fn filtered_profiles(
        &self,
        center: Location,
        criteria: &FilterCriteria,
    ) -> Result<Vec<Profile>> {
        self.query_count.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(IcebreakrError::Directory(
                "directory unavailable".to_string(),
            ));
        }
        let profiles = self.profiles.read().await;
        Ok(profiles
            .iter()
            .filter(|p| Self::matches(p, center, criteria))
            .cloned()
            .collect())
    }
}
