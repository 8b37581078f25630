//! Artifact Publisher
//!
//! Wraps generated payloads (game documents, code files) in handles that expose
//! an ephemeral `blob:` URL. The store only keeps weak references: an artifact is
//! released, and its URL stops resolving, as soon as the last handle is dropped.
//! Chat entries own their handles, so an artifact lives exactly as long as some
//! entry still refers to it.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::AppError;

const URL_PREFIX: &str = "blob:hgpt/";

type Registry = Mutex<HashMap<Uuid, Weak<ArtifactInner>>>;

/// Registry of live artifacts. Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct ArtifactStore {
    registry: Arc<Registry>,
}

struct ArtifactInner {
    id: Uuid,
    url: String,
    mime: String,
    file_name: String,
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
    registry: Weak<Registry>,
}

impl Drop for ArtifactInner {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut map) = registry.lock() {
                map.remove(&self.id);
            }
        }
        debug!(url = %self.url, "Artifact released");
    }
}

/// Owning reference to a published artifact.
#[derive(Clone)]
pub struct ArtifactHandle {
    inner: Arc<ArtifactInner>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes a payload and returns the handle that keeps it alive.
    pub fn publish(
        &self,
        bytes: impl Into<Vec<u8>>,
        mime: &str,
        file_name: &str,
    ) -> Result<ArtifactHandle, AppError> {
        let id = Uuid::new_v4();
        let inner = Arc::new(ArtifactInner {
            id,
            url: format!("{}{}", URL_PREFIX, id),
            mime: mime.to_string(),
            file_name: file_name.to_string(),
            bytes: bytes.into(),
            created_at: Utc::now(),
            registry: Arc::downgrade(&self.registry),
        });

        self.registry
            .lock()
            .map_err(|e| AppError::Internal(format!("Artifact registry poisoned: {}", e)))?
            .insert(id, Arc::downgrade(&inner));

        info!(url = %inner.url, mime, file_name, size = inner.bytes.len(), "Artifact published");
        Ok(ArtifactHandle { inner })
    }

    /// Resolves a URL previously returned by [`ArtifactHandle::url`].
    ///
    /// Fails with `NotFound` once every handle to the artifact has been dropped.
    pub fn open(&self, url: &str) -> Result<ArtifactHandle, AppError> {
        let id = url
            .strip_prefix(URL_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .ok_or_else(|| AppError::NotFound(format!("Not an artifact URL: {}", url)))?;

        let weak = self
            .registry
            .lock()
            .map_err(|e| AppError::Internal(format!("Artifact registry poisoned: {}", e)))?
            .get(&id)
            .cloned();

        // Upgrade outside the lock: a failed upgrade never runs Drop, but a
        // handle dropped later must be able to take the lock.
        weak.and_then(|w| w.upgrade())
            .map(|inner| ArtifactHandle { inner })
            .ok_or_else(|| AppError::NotFound(format!("Artifact released: {}", url)))
    }

    /// Number of artifacts currently referenced by at least one handle.
    pub fn live_count(&self) -> usize {
        self.registry
            .lock()
            .map(|map| map.values().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }
}

impl ArtifactHandle {
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn mime(&self) -> &str {
        &self.inner.mime
    }

    pub fn file_name(&self) -> &str {
        &self.inner.file_name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.inner.bytes
    }

    pub fn len(&self) -> usize {
        self.inner.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.bytes.is_empty()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.inner.created_at
    }

    /// The payload as UTF-8 text, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.inner.bytes).ok()
    }

    /// Writes the payload into `dir` under the artifact's file name.
    pub fn save_into(&self, dir: &Path) -> Result<PathBuf, AppError> {
        if !dir.exists() {
            info!("Creating downloads directory: {:?}", dir);
            fs::create_dir_all(dir)?;
        }
        let path = dir.join(&self.inner.file_name);
        fs::write(&path, &self.inner.bytes)?;
        info!(url = %self.inner.url, path = ?path, "Artifact saved");
        Ok(path)
    }
}

impl fmt::Debug for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactHandle")
            .field("url", &self.inner.url)
            .field("mime", &self.inner.mime)
            .field("file_name", &self.inner.file_name)
            .field("size", &self.inner.bytes.len())
            .finish()
    }
}

impl Serialize for ArtifactHandle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Artifact", 4)?;
        s.serialize_field("url", &self.inner.url)?;
        s.serialize_field("mime", &self.inner.mime)?;
        s.serialize_field("file_name", &self.inner.file_name)?;
        s.serialize_field("size", &self.inner.bytes.len())?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_open() {
        let store = ArtifactStore::new();
        let handle = store.publish("<html></html>", "text/html", "game.html").unwrap();

        assert!(handle.url().starts_with("blob:hgpt/"));
        let opened = store.open(handle.url()).unwrap();
        assert_eq!(opened.id(), handle.id());
        assert_eq!(opened.as_text(), Some("<html></html>"));
        assert_eq!(store.live_count(), 1);
    }

    #[test]
    fn test_release_on_last_drop() {
        let store = ArtifactStore::new();
        let handle = store.publish(vec![1u8, 2, 3], "application/octet-stream", "blob.bin").unwrap();
        let url = handle.url().to_string();
        let clone = handle.clone();

        drop(handle);
        assert!(store.open(&url).is_ok(), "clone still holds the artifact");

        drop(clone);
        assert!(matches!(store.open(&url), Err(AppError::NotFound(_))));
        assert_eq!(store.live_count(), 0);
    }

    #[test]
    fn test_open_rejects_foreign_urls() {
        let store = ArtifactStore::new();
        assert!(store.open("https://example.com/x").is_err());
        assert!(store.open("blob:hgpt/not-a-uuid").is_err());
        assert!(store.open(&format!("blob:hgpt/{}", Uuid::new_v4())).is_err());
    }
}
