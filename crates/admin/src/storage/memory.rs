//! In-memory object storage for tests and dry runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{ObjectStorage, StorageError, UploadFile};

/// Object storage held in memory, serving URLs under a fixed base.
#[derive(Debug)]
pub struct InMemoryStorage {
    public_base: String,
    objects: Mutex<BTreeMap<String, UploadFile>>,
    fail_uploads: AtomicBool,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new("memory://products")
    }
}

impl InMemoryStorage {
    #[must_use]
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
            objects: Mutex::new(BTreeMap::new()),
            fail_uploads: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, UploadFile>> {
        self.objects.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make later uploads fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_uploads.store(failing, Ordering::SeqCst);
    }

    /// Stored object paths, sorted.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<UploadFile> {
        self.lock().get(path).cloned()
    }
}

impl ObjectStorage for InMemoryStorage {
    async fn upload(&self, path: &str, file: &UploadFile) -> Result<String, StorageError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Api {
                status: 503,
                message: "storage unavailable".to_string(),
            });
        }

        self.lock().insert(path.to_string(), file.clone());
        Ok(format!("{}/{path}", self.public_base))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_and_fail() {
        let storage = InMemoryStorage::new("https://cdn.test/");
        let file = UploadFile::new("a.png", "image/png", vec![1, 2, 3]);

        let url = storage.upload("x.png", &file).await.unwrap();
        assert_eq!(url, "https://cdn.test/x.png");
        assert_eq!(storage.get("x.png").unwrap().bytes, vec![1, 2, 3]);

        storage.set_failing(true);
        assert!(matches!(
            storage.upload("y.png", &file).await,
            Err(StorageError::Api { status: 503, .. })
        ));
        assert_eq!(storage.paths(), vec!["x.png"]);
    }
}
