//! In-memory query cache that orchestrates caching logic with network fetching.
//!
//! Each key moves through empty -> fetching -> fresh -> stale, and back to empty
//! only on explicit removal. Reads on an empty key block on the first fetch;
//! reads on a stale key are served immediately while a background refresh runs;
//! concurrent reads of a fetching key share the in-flight request instead of
//! issuing a duplicate, and all of them observe the same outcome.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use color_eyre::{eyre::eyre, Result};
use futures::future::{FutureExt, Shared};
use serde::{de::DeserializeOwned, Serialize};

use super::traits::{CachePolicy, CacheResult, Cacheable, QueryKey};

/// In-flight fetch shared between concurrent readers of one key.
type SharedFetch = Shared<Pin<Box<dyn Future<Output = Result<Vec<u8>, String>> + Send>>>;

struct Entry {
  /// Serialized JSON of the cached value
  data: Vec<u8>,
  policy: CachePolicy,
  cached_at: Instant,
  last_used: Instant,
}

impl Entry {
  fn is_fresh(&self) -> bool {
    self.cached_at.elapsed() <= self.policy.stale_after
  }

  fn is_expired(&self) -> bool {
    self.last_used.elapsed() > self.policy.retain_for
  }
}

#[derive(Default)]
struct CacheState {
  entries: HashMap<String, Entry>,
  inflight: HashMap<String, SharedFetch>,
}

/// Process-shared query cache.
///
/// Explicitly constructed and handed to consumers; clones share the same state.
pub struct QueryCache {
  state: Arc<Mutex<CacheState>>,
}

impl Clone for QueryCache {
  fn clone(&self) -> Self {
    Self {
      state: Arc::clone(&self.state),
    }
  }
}

impl Default for QueryCache {
  fn default() -> Self {
    Self::new()
  }
}

enum Lookup {
  Fresh(Vec<u8>, Duration),
  Stale(Vec<u8>, Duration),
  Miss,
}

impl QueryCache {
  pub fn new() -> Self {
    Self {
      state: Arc::new(Mutex::new(CacheState::default())),
    }
  }

  /// Fetch a list with the cache-first strategy.
  ///
  /// 1. Fresh cache entry: return immediately, no network call
  /// 2. Stale entry: return the cached value, refresh in the background
  /// 3. Empty: fetch from the network, blocking this caller only
  pub async fn fetch_list<T, K, F, Fut>(&self, key: &K, fetcher: F) -> Result<CacheResult<Vec<T>>>
  where
    T: Cacheable + 'static,
    K: QueryKey,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
  {
    self.fetch_value(&key.cache_key(), key.policy(), fetcher).await
  }

  /// Fetch a single entity with the same strategy as [`fetch_list`].
  ///
  /// [`fetch_list`]: QueryCache::fetch_list
  pub async fn fetch_one<T, K, F, Fut>(&self, key: &K, fetcher: F) -> Result<CacheResult<T>>
  where
    T: Cacheable + 'static,
    K: QueryKey,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>> + Send + 'static,
  {
    self.fetch_value(&key.cache_key(), key.policy(), fetcher).await
  }

  async fn fetch_value<V, F, Fut>(
    &self,
    key: &str,
    policy: CachePolicy,
    fetcher: F,
  ) -> Result<CacheResult<V>>
  where
    V: Serialize + DeserializeOwned + Send + 'static,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V>> + Send + 'static,
  {
    let lookup = {
      let mut state = self.state.lock().expect("cache lock poisoned");
      match state.entries.get_mut(key) {
        Some(entry) => {
          entry.last_used = Instant::now();
          let age = entry.cached_at.elapsed();
          if entry.is_fresh() {
            Lookup::Fresh(entry.data.clone(), age)
          } else {
            Lookup::Stale(entry.data.clone(), age)
          }
        }
        None => Lookup::Miss,
      }
    };

    match lookup {
      Lookup::Fresh(bytes, age) => Ok(CacheResult::from_cache(decode(&bytes)?, age, false)),
      Lookup::Stale(bytes, age) => {
        self.refresh_in_background(key, policy, fetcher());
        Ok(CacheResult::from_cache(decode(&bytes)?, age, true))
      }
      Lookup::Miss => {
        let shared = self.join_fetch(key, policy, fetcher());
        match shared.await {
          Ok(bytes) => Ok(CacheResult::from_network(decode(&bytes)?)),
          Err(message) => Err(eyre!(message)),
        }
      }
    }
  }

  /// Join the in-flight fetch for `key`, registering `fut` as the fetch if none
  /// is running. The returned future yields the same result to every reader.
  fn join_fetch<V, Fut>(&self, key: &str, policy: CachePolicy, fut: Fut) -> SharedFetch
  where
    V: Serialize + Send + 'static,
    Fut: Future<Output = Result<V>> + Send + 'static,
  {
    let mut state = self.state.lock().expect("cache lock poisoned");
    if let Some(shared) = state.inflight.get(key) {
      return shared.clone();
    }

    let cache_state = Arc::clone(&self.state);
    let owned_key = key.to_string();
    let shared: SharedFetch = async move {
      let result = fut.await;
      let mut state = cache_state.lock().expect("cache lock poisoned");
      state.inflight.remove(&owned_key);
      match result {
        Ok(value) => {
          let bytes =
            serde_json::to_vec(&value).map_err(|e| format!("Failed to serialize cache entry: {}", e))?;
          state.entries.insert(
            owned_key,
            Entry {
              data: bytes.clone(),
              policy,
              cached_at: Instant::now(),
              last_used: Instant::now(),
            },
          );
          Ok(bytes)
        }
        Err(e) => Err(format!("{:#}", e)),
      }
    }
    .boxed()
    .shared();

    state.inflight.insert(key.to_string(), shared.clone());
    shared
  }

  /// Spawn a refresh for a stale key unless one is already running.
  fn refresh_in_background<V, Fut>(&self, key: &str, policy: CachePolicy, fut: Fut)
  where
    V: Serialize + Send + 'static,
    Fut: Future<Output = Result<V>> + Send + 'static,
  {
    {
      let state = self.state.lock().expect("cache lock poisoned");
      if state.inflight.contains_key(key) {
        return;
      }
    }
    let shared = self.join_fetch(key, policy, fut);
    let key = key.to_string();
    tokio::spawn(async move {
      if let Err(e) = shared.await {
        tracing::debug!(key, error = %e, "background refresh failed, serving stale data");
      }
    });
  }

  /// Peek at a cached single entity without triggering a fetch.
  pub fn get_one<T: Cacheable, K: QueryKey>(&self, key: &K) -> Option<T> {
    let mut state = self.state.lock().expect("cache lock poisoned");
    let entry = state.entries.get_mut(&key.cache_key())?;
    entry.last_used = Instant::now();
    serde_json::from_slice(&entry.data).ok()
  }

  /// Seed or replace the single entity stored under `key`.
  pub fn put_one<T: Cacheable, K: QueryKey>(&self, key: &K, item: &T) -> Result<()> {
    let bytes = serde_json::to_vec(item)
      .map_err(|e| eyre!("Failed to serialize {}: {}", T::entity_type(), e))?;
    let mut state = self.state.lock().expect("cache lock poisoned");
    state.entries.insert(
      key.cache_key(),
      Entry {
        data: bytes,
        policy: key.policy(),
        cached_at: Instant::now(),
        last_used: Instant::now(),
      },
    );
    Ok(())
  }

  /// Peek at a cached list without triggering a fetch.
  pub fn get_list<T: Cacheable, K: QueryKey>(&self, key: &K) -> Option<Vec<T>> {
    let mut state = self.state.lock().expect("cache lock poisoned");
    let entry = state.entries.get_mut(&key.cache_key())?;
    entry.last_used = Instant::now();
    serde_json::from_slice(&entry.data).ok()
  }

  /// Seed or replace the list stored under `key`.
  pub fn put_list<T: Cacheable, K: QueryKey>(&self, key: &K, items: &[T]) -> Result<()> {
    let bytes = serde_json::to_vec(items)
      .map_err(|e| eyre!("Failed to serialize {} list: {}", T::entity_type(), e))?;
    let mut state = self.state.lock().expect("cache lock poisoned");
    state.entries.insert(
      key.cache_key(),
      Entry {
        data: bytes,
        policy: key.policy(),
        cached_at: Instant::now(),
        last_used: Instant::now(),
      },
    );
    Ok(())
  }

  /// Optimistically insert a freshly created item at the head of a list key.
  ///
  /// Any previous copy with the same id is dropped first, so the item appears
  /// exactly once. Creates the entry if the key was never fetched.
  pub fn insert_head<T: Cacheable, K: QueryKey>(&self, key: &K, item: &T) -> Result<()> {
    self.patch_list(key, |items: &mut Vec<T>| {
      items.retain(|existing| existing.cache_key() != item.cache_key());
      items.insert(0, item.clone());
    })
  }

  /// Optimistically append a freshly created item to the tail of a list key.
  pub fn append<T: Cacheable, K: QueryKey>(&self, key: &K, item: &T) -> Result<()> {
    self.patch_list(key, |items: &mut Vec<T>| {
      items.retain(|existing| existing.cache_key() != item.cache_key());
      items.push(item.clone());
    })
  }

  /// Map-replace an updated item in a list key. No-op if the key is empty or
  /// the item is not present.
  pub fn replace<T: Cacheable, K: QueryKey>(&self, key: &K, item: &T) -> Result<()> {
    let cached: Option<Vec<T>> = self.get_list(key);
    let Some(mut items) = cached else {
      return Ok(());
    };
    for existing in &mut items {
      if existing.cache_key() == item.cache_key() {
        *existing = item.clone();
      }
    }
    self.put_list(key, &items)
  }

  /// Filter a deleted id out of a list key. No-op if the key is empty.
  pub fn remove_item<T: Cacheable, K: QueryKey>(&self, key: &K, id: &str) -> Result<()> {
    let cached: Option<Vec<T>> = self.get_list(key);
    let Some(mut items) = cached else {
      return Ok(());
    };
    items.retain(|existing| existing.cache_key() != id);
    self.put_list(key, &items)
  }

  fn patch_list<T, K, P>(&self, key: &K, patch: P) -> Result<()>
  where
    T: Cacheable,
    K: QueryKey,
    P: FnOnce(&mut Vec<T>),
  {
    let mut items: Vec<T> = self.get_list(key).unwrap_or_default();
    patch(&mut items);
    self.put_list(key, &items)
  }

  /// Explicitly remove a key, returning it to the empty state.
  pub fn remove_key<K: QueryKey>(&self, key: &K) {
    let mut state = self.state.lock().expect("cache lock poisoned");
    state.entries.remove(&key.cache_key());
  }

  /// Evict every entry past its retention window. Returns the eviction count.
  pub fn sweep(&self) -> usize {
    let mut state = self.state.lock().expect("cache lock poisoned");
    let before = state.entries.len();
    state.entries.retain(|_, entry| !entry.is_expired());
    before - state.entries.len()
  }

  /// Start the periodic sweep. The janitor stops when the handle is dropped.
  pub fn start_janitor(&self, every: Duration) -> Janitor {
    let cache = self.clone();
    let handle = tokio::spawn(async move {
      let mut tick = tokio::time::interval(every);
      tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
      loop {
        tick.tick().await;
        let evicted = cache.sweep();
        if evicted > 0 {
          tracing::debug!(evicted, "query cache sweep");
        }
      }
    });
    Janitor { handle }
  }
}

/// Handle for the background sweep task; aborts the task on drop.
pub struct Janitor {
  handle: tokio::task::JoinHandle<()>,
}

impl Drop for Janitor {
  fn drop(&mut self) {
    self.handle.abort();
  }
}

fn decode<V: DeserializeOwned>(bytes: &[u8]) -> Result<V> {
  serde_json::from_slice(bytes).map_err(|e| eyre!("Failed to decode cached entry: {}", e))
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicU32, Ordering};

  use serde::Deserialize;

  use super::*;
  use crate::cache::CacheSource;

  #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
  struct Item {
    id: String,
    label: String,
  }

  impl Item {
    fn new(id: &str, label: &str) -> Self {
      Self {
        id: id.to_string(),
        label: label.to_string(),
      }
    }
  }

  impl Cacheable for Item {
    fn cache_key(&self) -> String {
      self.id.clone()
    }

    fn entity_type() -> &'static str {
      "item"
    }
  }

  struct TestQuery(CachePolicy);

  impl QueryKey for TestQuery {
    fn cache_key(&self) -> String {
      "test:items".to_string()
    }

    fn policy(&self) -> CachePolicy {
      self.0
    }
  }

  fn counting_fetcher(
    counter: Arc<AtomicU32>,
    delay: Duration,
  ) -> impl Fn() -> Pin<Box<dyn Future<Output = Result<Vec<Item>>> + Send>> {
    move || {
      let counter = counter.clone();
      Box::pin(async move {
        tokio::time::sleep(delay).await;
        let n = counter.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Item::new("1", &format!("fetch-{}", n))])
      }) as Pin<Box<dyn Future<Output = Result<Vec<Item>>> + Send>>
    }
  }

  #[tokio::test]
  async fn test_fresh_hit_skips_network() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    let counter = Arc::new(AtomicU32::new(0));
    let fetcher = counting_fetcher(counter.clone(), Duration::ZERO);

    let first = cache.fetch_list(&key, &fetcher).await.unwrap();
    assert_eq!(first.source, CacheSource::Network);

    let second = cache.fetch_list(&key, &fetcher).await.unwrap();
    assert_eq!(second.source, CacheSource::CacheFresh);
    assert_eq!(second.data, first.data);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_concurrent_reads_share_one_fetch() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    let counter = Arc::new(AtomicU32::new(0));
    let fetcher = counting_fetcher(counter.clone(), Duration::from_millis(50));

    let (a, b) = tokio::join!(cache.fetch_list(&key, &fetcher), cache.fetch_list(&key, &fetcher));

    assert_eq!(a.unwrap().data, b.unwrap().data);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_fetch_error_shared_by_all_readers() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    let counter = Arc::new(AtomicU32::new(0));
    let counter_in_fetcher = counter.clone();
    let fetcher = move || {
      let counter = counter_in_fetcher.clone();
      Box::pin(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        counter.fetch_add(1, Ordering::SeqCst);
        Err::<Vec<Item>, _>(eyre!("backend unavailable"))
      }) as Pin<Box<dyn Future<Output = Result<Vec<Item>>> + Send>>
    };

    let (a, b) = tokio::join!(cache.fetch_list(&key, &fetcher), cache.fetch_list(&key, &fetcher));

    let (err_a, err_b) = (a.unwrap_err(), b.unwrap_err());
    assert_eq!(err_a.to_string(), err_b.to_string());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_stale_read_serves_cached_then_refreshes() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy {
      stale_after: Duration::ZERO,
      retain_for: Duration::from_secs(300),
    });
    let counter = Arc::new(AtomicU32::new(0));
    let fetcher = counting_fetcher(counter.clone(), Duration::ZERO);

    let first = cache.fetch_list(&key, &fetcher).await.unwrap();
    assert_eq!(first.data[0].label, "fetch-0");

    // Past the staleness window: served immediately from cache while a
    // background refresh runs.
    let second = cache.fetch_list(&key, &fetcher).await.unwrap();
    assert_eq!(second.source, CacheSource::CacheStale);
    assert_eq!(second.data[0].label, "fetch-0");

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(counter.load(Ordering::SeqCst), 2);

    let third = cache.fetch_list(&key, &fetcher).await.unwrap();
    assert_eq!(third.data[0].label, "fetch-1");
  }

  #[tokio::test]
  async fn test_insert_head_appears_exactly_once() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    cache
      .put_list(&key, &[Item::new("1", "one"), Item::new("2", "two")])
      .unwrap();

    cache.insert_head(&key, &Item::new("3", "three")).unwrap();
    // Inserting the same id again must not duplicate it.
    cache.insert_head(&key, &Item::new("3", "three")).unwrap();

    let items: Vec<Item> = cache.get_list(&key).unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, "3");
  }

  #[tokio::test]
  async fn test_insert_head_creates_missing_entry() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);

    cache.insert_head(&key, &Item::new("1", "one")).unwrap();

    let items: Vec<Item> = cache.get_list(&key).unwrap();
    assert_eq!(items, vec![Item::new("1", "one")]);
  }

  #[tokio::test]
  async fn test_put_one_and_get_one() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);

    assert!(cache.get_one::<Item, _>(&key).is_none());
    cache.put_one(&key, &Item::new("1", "one")).unwrap();
    assert_eq!(cache.get_one::<Item, _>(&key).unwrap(), Item::new("1", "one"));
  }

  #[tokio::test]
  async fn test_replace_and_remove_item() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    cache
      .put_list(&key, &[Item::new("1", "one"), Item::new("2", "two")])
      .unwrap();

    cache.replace(&key, &Item::new("2", "deux")).unwrap();
    let items: Vec<Item> = cache.get_list(&key).unwrap();
    assert_eq!(items[1].label, "deux");

    cache.remove_item::<Item, _>(&key, "1").unwrap();
    let items: Vec<Item> = cache.get_list(&key).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "2");
  }

  #[tokio::test]
  async fn test_patches_on_empty_key_do_not_fail() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);

    cache.remove_item::<Item, _>(&key, "ghost").unwrap();
    cache.replace(&key, &Item::new("ghost", "x")).unwrap();
    assert!(cache.get_list::<Item, _>(&key).is_none());
  }

  #[tokio::test]
  async fn test_sweep_evicts_only_expired() {
    let cache = QueryCache::new();
    let expired = TestQuery(CachePolicy {
      stale_after: Duration::ZERO,
      retain_for: Duration::ZERO,
    });
    let kept = KeptQuery;

    cache.put_list(&expired, &[Item::new("1", "one")]).unwrap();
    cache.put_list(&kept, &[Item::new("2", "two")]).unwrap();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(cache.sweep(), 1);
    assert!(cache.get_list::<Item, _>(&expired).is_none());
    assert!(cache.get_list::<Item, _>(&kept).is_some());
  }

  struct KeptQuery;

  impl QueryKey for KeptQuery {
    fn cache_key(&self) -> String {
      "test:kept".to_string()
    }

    fn policy(&self) -> CachePolicy {
      CachePolicy::LONG
    }
  }

  #[tokio::test]
  async fn test_remove_key_returns_to_empty() {
    let cache = QueryCache::new();
    let key = TestQuery(CachePolicy::MEDIUM);
    cache.put_list(&key, &[Item::new("1", "one")]).unwrap();

    cache.remove_key(&key);
    assert!(cache.get_list::<Item, _>(&key).is_none());
  }
}
