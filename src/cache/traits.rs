//! Core traits and types for the caching system.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};

/// Trait for entities that can be cached.
///
/// Implementors provide a unique cache key (the backend id) and an entity type
/// name used when reporting cache activity.
pub trait Cacheable: Clone + Send + Sync + Serialize + DeserializeOwned {
  /// Unique identifier for this entity (e.g., course id, note id)
  fn cache_key(&self) -> String;

  /// Entity type name (e.g., "course", "note")
  fn entity_type() -> &'static str;
}

/// Staleness and retention windows for a cache entry.
///
/// `stale_after` is how long data is served without a refetch; `retain_for` is
/// how long an entry unused by any reader survives before the sweep evicts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
  pub stale_after: Duration,
  pub retain_for: Duration,
}

impl CachePolicy {
  /// Frequently changing collections: files, notes, tasks, exams, announcements.
  pub const SHORT: Self = Self {
    stale_after: Duration::from_secs(2 * 60),
    retain_for: Duration::from_secs(5 * 60),
  };

  /// Courses, profile, dashboard aggregates.
  pub const MEDIUM: Self = Self {
    stale_after: Duration::from_secs(5 * 60),
    retain_for: Duration::from_secs(10 * 60),
  };

  /// Rarely changing reference data (category lists).
  pub const LONG: Self = Self {
    stale_after: Duration::from_secs(30 * 60),
    retain_for: Duration::from_secs(60 * 60),
  };
}

/// A typed cache key carrying its own staleness policy.
pub trait QueryKey {
  /// Stable string key for the cache map (e.g., "courses:list").
  fn cache_key(&self) -> String;

  /// Staleness/retention windows for entries under this key.
  fn policy(&self) -> CachePolicy;
}

/// Result from a cache operation, including data and metadata about the source.
#[derive(Debug, Clone)]
pub struct CacheResult<T> {
  /// The actual data
  pub data: T,
  /// Where the data came from
  pub source: CacheSource,
  /// Age of the data when served (None for fresh network data)
  pub age: Option<Duration>,
}

impl<T> CacheResult<T> {
  /// Create a new cache result from fresh network data.
  pub fn from_network(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Network,
      age: None,
    }
  }

  /// Create a new cache result from cached data.
  pub fn from_cache(data: T, age: Duration, is_stale: bool) -> Self {
    Self {
      data,
      source: if is_stale {
        CacheSource::CacheStale
      } else {
        CacheSource::CacheFresh
      },
      age: Some(age),
    }
  }

  /// Create a cache result served from the persistent mirror (network down).
  pub fn from_mirror(data: T) -> Self {
    Self {
      data,
      source: CacheSource::Mirror,
      age: None,
    }
  }
}

/// Indicates where cached data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Fresh data from network
  Network,
  /// Data from cache, still considered fresh
  CacheFresh,
  /// Data from cache past its staleness window, refresh running in background
  CacheStale,
  /// Network unavailable, serving the persistent mirror copy
  Mirror,
}
