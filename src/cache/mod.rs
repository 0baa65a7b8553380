//! Generic caching layer: in-memory query cache plus persistent mirror.
//!
//! This module is domain-agnostic. It provides:
//! - A process-shared query cache with per-key staleness, request
//!   de-duplication, stale-while-refresh serving, and periodic eviction
//! - A best-effort persistent mirror used as an offline fallback and as the
//!   cross-view home for derived id sets (pins, recents)

mod mirror;
mod query;
mod traits;

pub use mirror::{keys as mirror_keys, MirrorStore};
pub use query::{Janitor, QueryCache};
pub use traits::{CachePolicy, CacheResult, CacheSource, Cacheable, QueryKey};
