//! Session storage port and built-in stores.
//!
//! The bearer token, cached user record, and remember flag live behind the
//! [`SessionStore`] trait and are injected into the HTTP client, so the
//! coupling between services and storage is explicit and tests can
//! substitute fakes. Writes are last-write-wins per key; there is no
//! multi-key transaction, matching the key-value storage of the original
//! console.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Failures surfaced by session stores.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Reading or writing the backing file failed.
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The session document could not be encoded or decoded.
    #[error("session document invalid: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Port over durable session state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if any.
    async fn token(&self) -> Result<Option<String>, SessionError>;

    /// Persist the bearer token, replacing any previous one.
    async fn set_token(&self, token: String) -> Result<(), SessionError>;

    /// Delete the bearer token.
    async fn clear_token(&self) -> Result<(), SessionError>;

    /// Whether the remember-me flag is set.
    async fn remember_me(&self) -> Result<bool, SessionError>;

    /// Set or clear the remember-me flag.
    async fn set_remember_me(&self, remember: bool) -> Result<(), SessionError>;

    /// Cached user record, if any.
    async fn user_info(&self) -> Result<Option<Value>, SessionError>;

    /// Persist the cached user record.
    async fn set_user_info(&self, info: Value) -> Result<(), SessionError>;

    /// Delete the cached user record.
    async fn clear_user_info(&self) -> Result<(), SessionError>;

    /// Clear token, remember flag, and user record in one sweep.
    async fn clear_all(&self) -> Result<(), SessionError>;
}

/// One session's worth of persisted state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default)]
    remember_me: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_info: Option<Value>,
}

fn unpoisoned<T>(guard: Result<T, PoisonError<T>>) -> T {
    guard.unwrap_or_else(PoisonError::into_inner)
}

/// In-process store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<SessionDocument>,
}

impl MemorySessionStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(unpoisoned(self.inner.lock()).token.clone())
    }

    async fn set_token(&self, token: String) -> Result<(), SessionError> {
        unpoisoned(self.inner.lock()).token = Some(token);
        Ok(())
    }

    async fn clear_token(&self) -> Result<(), SessionError> {
        unpoisoned(self.inner.lock()).token = None;
        Ok(())
    }

    async fn remember_me(&self) -> Result<bool, SessionError> {
        Ok(unpoisoned(self.inner.lock()).remember_me)
    }

    async fn set_remember_me(&self, remember: bool) -> Result<(), SessionError> {
        unpoisoned(self.inner.lock()).remember_me = remember;
        Ok(())
    }

    async fn user_info(&self) -> Result<Option<Value>, SessionError> {
        Ok(unpoisoned(self.inner.lock()).user_info.clone())
    }

    async fn set_user_info(&self, info: Value) -> Result<(), SessionError> {
        unpoisoned(self.inner.lock()).user_info = Some(info);
        Ok(())
    }

    async fn clear_user_info(&self) -> Result<(), SessionError> {
        unpoisoned(self.inner.lock()).user_info = None;
        Ok(())
    }

    async fn clear_all(&self) -> Result<(), SessionError> {
        *unpoisoned(self.inner.lock()) = SessionDocument::default();
        Ok(())
    }
}

/// File-backed store holding one JSON document.
///
/// Each operation is a read-modify-write of the whole document, guarded
/// against concurrent in-process access by a mutex. Concurrent writers in
/// other processes can still overwrite each other, the same accepted
/// limitation the original console had across browser tabs.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileSessionStore {
    /// Store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    /// The backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<SessionDocument, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Ok(SessionDocument::default())
            }
            Err(error) => Err(error.into()),
        }
    }

    fn save(&self, document: &SessionDocument) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn update(
        &self,
        mutate: impl FnOnce(&mut SessionDocument),
    ) -> Result<(), SessionError> {
        let _guard = unpoisoned(self.guard.lock());
        let mut document = self.load()?;
        mutate(&mut document);
        self.save(&document)
    }

    fn read(&self) -> Result<SessionDocument, SessionError> {
        let _guard = unpoisoned(self.guard.lock());
        self.load()
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.token)
    }

    async fn set_token(&self, token: String) -> Result<(), SessionError> {
        self.update(|document| document.token = Some(token))
    }

    async fn clear_token(&self) -> Result<(), SessionError> {
        self.update(|document| document.token = None)
    }

    async fn remember_me(&self) -> Result<bool, SessionError> {
        Ok(self.read()?.remember_me)
    }

    async fn set_remember_me(&self, remember: bool) -> Result<(), SessionError> {
        self.update(|document| document.remember_me = remember)
    }

    async fn user_info(&self) -> Result<Option<Value>, SessionError> {
        Ok(self.read()?.user_info)
    }

    async fn set_user_info(&self, info: Value) -> Result<(), SessionError> {
        self.update(|document| document.user_info = Some(info))
    }

    async fn clear_user_info(&self) -> Result<(), SessionError> {
        self.update(|document| document.user_info = None)
    }

    async fn clear_all(&self) -> Result<(), SessionError> {
        self.update(|document| *document = SessionDocument::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn memory_store_round_trips_tokens() {
        let store = MemorySessionStore::new();
        assert_eq!(store.token().await.expect("read"), None);

        store.set_token("abc123".to_owned()).await.expect("write");
        assert_eq!(store.token().await.expect("read"), Some("abc123".to_owned()));

        store.clear_token().await.expect("clear");
        assert_eq!(store.token().await.expect("read"), None);
    }

    #[tokio::test]
    async fn memory_store_clear_all_sweeps_every_key() {
        let store = MemorySessionStore::new();
        store.set_token("abc123".to_owned()).await.expect("token");
        store.set_remember_me(true).await.expect("remember");
        store
            .set_user_info(json!({"id": 7}))
            .await
            .expect("user info");

        store.clear_all().await.expect("clear");

        assert_eq!(store.token().await.expect("read"), None);
        assert!(!store.remember_me().await.expect("read"));
        assert_eq!(store.user_info().await.expect("read"), None);
    }

    #[tokio::test]
    async fn file_store_round_trips_across_reopen() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");

        let store = FileSessionStore::new(&path);
        store.set_token("abc123".to_owned()).await.expect("token");
        store
            .set_user_info(json!({"id": 7, "username": "alice"}))
            .await
            .expect("user info");
        drop(store);

        let reopened = FileSessionStore::new(&path);
        assert_eq!(
            reopened.token().await.expect("read"),
            Some("abc123".to_owned())
        );
        assert_eq!(
            reopened.user_info().await.expect("read"),
            Some(json!({"id": 7, "username": "alice"}))
        );
    }

    #[tokio::test]
    async fn file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileSessionStore::new(dir.path().join("absent.json"));
        assert_eq!(store.token().await.expect("read"), None);
        assert!(!store.remember_me().await.expect("read"));
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_documents() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").expect("seed corrupt file");

        let store = FileSessionStore::new(&path);
        let error = store.token().await.expect_err("corrupt file must fail");
        assert!(matches!(error, SessionError::Serialize(_)));
    }
}
