//! Persistent key/value mirror of selected cache entries.
//!
//! The mirror is a best-effort shadow copy: written after successful cache
//! mutations, read at startup or view-mount time as a zero-latency fallback
//! before the network answers, and never treated as authoritative. Reads that
//! fail to parse are discarded silently; writes that fail are logged and
//! swallowed. It also carries the derived sets (pins, recently opened) that
//! exist only on this client.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection};
use serde::{de::DeserializeOwned, Serialize};

/// Mirror key catalogue. Per-course keys embed the course id.
pub mod keys {
  pub const COURSES: &str = "user_courses";
  pub const COURSE_TITLES: &str = "user_course_titles";
  pub const CATEGORIES: &str = "course_categories";
  pub const PINNED_COURSES: &str = "pinned_courses";
  pub const PINNED_NOTES: &str = "pinned_notes";
  pub const RECENT_COURSES: &str = "recent_courses";

  /// Recently-opened course list cap.
  pub const RECENT_COURSES_CAP: usize = 5;

  pub fn course_files(course_id: &str) -> String {
    format!("course_files:{}", course_id)
  }

  pub fn pinned_files(course_id: &str) -> String {
    format!("pinned_files:{}", course_id)
  }
}

/// Schema for the mirror table.
const MIRROR_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS mirror (
    key TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// SQLite-backed mirror store.
pub struct MirrorStore {
  conn: Mutex<Connection>,
}

impl MirrorStore {
  /// Open the mirror at the default location under the platform data directory.
  pub fn open_default() -> Result<Self> {
    let path = Self::default_path()?;

    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create data directory: {}", e))?;
    }

    Self::open(&path)
  }

  /// Open the mirror at an explicit path.
  pub fn open(path: &Path) -> Result<Self> {
    let conn = Connection::open(path)
      .map_err(|e| eyre!("Failed to open mirror database at {}: {}", path.display(), e))?;
    Self::init(conn)
  }

  /// Open an in-memory mirror (used by tests).
  pub fn open_in_memory() -> Result<Self> {
    let conn =
      Connection::open_in_memory().map_err(|e| eyre!("Failed to open in-memory mirror: {}", e))?;
    Self::init(conn)
  }

  fn init(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(MIRROR_SCHEMA)
      .map_err(|e| eyre!("Failed to run mirror migrations: {}", e))?;

    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("studyhub").join("mirror.db"))
  }

  /// Read a mirrored value. Missing or unreadable data reads as absent.
  pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let conn = self.conn.lock().ok()?;
    let data: Vec<u8> = conn
      .query_row("SELECT data FROM mirror WHERE key = ?", params![key], |row| row.get(0))
      .ok()?;

    match serde_json::from_slice(&data) {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::debug!(key, error = %e, "discarding unreadable mirror entry");
        None
      }
    }
  }

  /// Best-effort write. Failures are logged and swallowed; callers degrade to
  /// a network fetch on the next read.
  pub fn put<T: Serialize>(&self, key: &str, value: &T) {
    if let Err(e) = self.try_put(key, value) {
      tracing::warn!(key, error = %e, "mirror write failed");
    }
  }

  fn try_put<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
    let data = serde_json::to_vec(value).map_err(|e| eyre!("serialize: {}", e))?;
    let conn = self.conn.lock().map_err(|e| eyre!("Lock poisoned: {}", e))?;
    conn
      .execute(
        "INSERT OR REPLACE INTO mirror (key, data, saved_at) VALUES (?, ?, datetime('now'))",
        params![key, data],
      )
      .map_err(|e| eyre!("write: {}", e))?;
    Ok(())
  }

  /// Best-effort removal.
  pub fn remove(&self, key: &str) {
    let result = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))
      .and_then(|conn| {
        conn
          .execute("DELETE FROM mirror WHERE key = ?", params![key])
          .map_err(|e| eyre!("delete: {}", e))
      });
    if let Err(e) = result {
      tracing::warn!(key, error = %e, "mirror delete failed");
    }
  }

  /// Toggle an id inside a mirrored id set, returning the new set.
  pub fn toggle_pin(&self, key: &str, id: &str) -> Vec<String> {
    let mut ids: Vec<String> = self.get(key).unwrap_or_default();
    if let Some(position) = ids.iter().position(|existing| existing == id) {
      ids.remove(position);
    } else {
      ids.push(id.to_string());
    }
    self.put(key, &ids);
    ids
  }

  /// Record an id at the head of a most-recent-first list, deduplicated and
  /// capped at `cap` entries. Returns the new list.
  pub fn record_recent(&self, key: &str, id: &str, cap: usize) -> Vec<String> {
    let mut ids: Vec<String> = self.get(key).unwrap_or_default();
    ids.retain(|existing| existing != id);
    ids.insert(0, id.to_string());
    ids.truncate(cap);
    self.put(key, &ids);
    ids
  }

  /// Write raw bytes; only meaningful for exercising parse-failure handling.
  #[cfg(test)]
  fn put_raw(&self, key: &str, data: &[u8]) {
    let conn = self.conn.lock().unwrap();
    conn
      .execute(
        "INSERT OR REPLACE INTO mirror (key, data, saved_at) VALUES (?, ?, datetime('now'))",
        params![key, data],
      )
      .unwrap();
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_roundtrip() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    mirror.put(keys::COURSE_TITLES, &vec!["Algebra".to_string(), "Physics".to_string()]);

    let titles: Vec<String> = mirror.get(keys::COURSE_TITLES).unwrap();
    assert_eq!(titles, vec!["Algebra", "Physics"]);
  }

  #[test]
  fn test_missing_key_is_absent() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    assert!(mirror.get::<Vec<String>>("nope").is_none());
  }

  #[test]
  fn test_malformed_entry_reads_as_absent() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    mirror.put_raw(keys::COURSES, b"{not json");

    assert!(mirror.get::<Vec<String>>(keys::COURSES).is_none());
  }

  #[test]
  fn test_shape_mismatch_reads_as_absent() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    mirror.put(keys::COURSES, &"a plain string");

    // Valid JSON, wrong shape: discarded, not an error.
    assert!(mirror.get::<Vec<u64>>(keys::COURSES).is_none());
  }

  #[test]
  fn test_remove() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    mirror.put("k", &1u32);
    mirror.remove("k");
    assert!(mirror.get::<u32>("k").is_none());
  }

  #[test]
  fn test_toggle_pin() {
    let mirror = MirrorStore::open_in_memory().unwrap();
    let key = keys::pinned_files("c1");

    assert_eq!(mirror.toggle_pin(&key, "f1"), vec!["f1"]);
    assert_eq!(mirror.toggle_pin(&key, "f2"), vec!["f1", "f2"]);
    assert_eq!(mirror.toggle_pin(&key, "f1"), vec!["f2"]);
  }

  #[test]
  fn test_record_recent_caps_and_dedupes() {
    let mirror = MirrorStore::open_in_memory().unwrap();

    for id in ["a", "b", "c", "d", "e", "f"] {
      mirror.record_recent(keys::RECENT_COURSES, id, keys::RECENT_COURSES_CAP);
    }
    let recents: Vec<String> = mirror.get(keys::RECENT_COURSES).unwrap();
    assert_eq!(recents, vec!["f", "e", "d", "c", "b"]);

    // Re-opening "d" moves it to the front without duplication.
    let recents = mirror.record_recent(keys::RECENT_COURSES, "d", keys::RECENT_COURSES_CAP);
    assert_eq!(recents, vec!["d", "f", "e", "c", "b"]);
  }
}
