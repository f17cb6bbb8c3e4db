use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::debug;

pub const TOKEN_TYPE_KEY: &str = "tokenType";
pub const TOKEN_ID_KEY: &str = "tokenId";
pub const COURSE_ID_KEY: &str = "CourseId";
pub const USER_ID_KEY: &str = "userId";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file {path} is not valid JSON: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Plain string key/value storage that outlives a single command.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// JSON object on disk, rewritten whole on every change.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text).map_err(|source| SessionError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };
        debug!("session loaded from {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let text = serde_json::to_string_pretty(entries).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text).map_err(|source| SessionError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = lock(&self.entries);
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = lock(&self.entries);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }
}

/// Typed view over the session keys. Clones share the same store.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn token(&self) -> Option<String> {
        self.store
            .get(TOKEN_TYPE_KEY)
            .or_else(|| self.store.get(TOKEN_ID_KEY))
            .filter(|t| !t.is_empty())
    }

    /// A new token invalidates any user id resolved for the previous one.
    pub fn store_token(&self, token: &str) -> Result<(), SessionError> {
        self.store.remove(USER_ID_KEY)?;
        self.store.set(TOKEN_TYPE_KEY, token)?;
        self.store.set(TOKEN_ID_KEY, token)
    }

    pub fn course_id(&self) -> Option<i64> {
        self.store.get(COURSE_ID_KEY).and_then(|v| v.trim().parse().ok())
    }

    pub fn set_course_id(&self, course_id: i64) -> Result<(), SessionError> {
        self.store.set(COURSE_ID_KEY, &course_id.to_string())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.store.get(USER_ID_KEY).and_then(|v| v.trim().parse().ok())
    }

    pub fn set_user_id(&self, user_id: i64) -> Result<(), SessionError> {
        self.store.set(USER_ID_KEY, &user_id.to_string())
    }

    /// Drops the credentials. The last viewed course id survives.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.remove(TOKEN_TYPE_KEY)?;
        self.store.remove(TOKEN_ID_KEY)?;
        self.store.remove(USER_ID_KEY)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.store.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("emarve-{}-{}.json", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn token_is_written_under_both_keys() {
        let session = Session::in_memory();
        session.store_token("abc").unwrap();

        assert_eq!(session.raw(TOKEN_TYPE_KEY).as_deref(), Some("abc"));
        assert_eq!(session.raw(TOKEN_ID_KEY).as_deref(), Some("abc"));
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn new_token_drops_previous_user_id() {
        let session = Session::in_memory();
        session.store_token("first").unwrap();
        session.set_user_id(999).unwrap();

        session.store_token("second").unwrap();

        assert_eq!(session.user_id(), None);
        assert_eq!(session.token().as_deref(), Some("second"));
    }

    #[test]
    fn clear_keeps_course_id() {
        let session = Session::in_memory();
        session.store_token("abc").unwrap();
        session.set_user_id(7).unwrap();
        session.set_course_id(3).unwrap();

        session.clear().unwrap();

        assert!(session.token().is_none());
        assert!(session.user_id().is_none());
        assert_eq!(session.course_id(), Some(3));
    }

    #[test]
    fn non_numeric_ids_read_as_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(USER_ID_KEY, "undefined").unwrap();
        let session = Session::new(store);
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn file_store_survives_reopen() {
        let path = temp_path("reopen");
        {
            let session = Session::new(Arc::new(FileStore::open(&path).unwrap()));
            session.store_token("persisted").unwrap();
            session.set_course_id(42).unwrap();
        }

        let reopened = Session::new(Arc::new(FileStore::open(&path).unwrap()));
        assert_eq!(reopened.token().as_deref(), Some("persisted"));
        assert_eq!(reopened.course_id(), Some(42));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json").unwrap();

        let result = FileStore::open(&path);
        assert!(matches!(result, Err(SessionError::Corrupt { .. })));

        let _ = fs::remove_file(&path);
    }
}
