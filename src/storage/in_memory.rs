use std::collections::BTreeMap;
use std::sync::Mutex;

use super::{ObjectStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory bucket for testing.
pub struct InMemoryStore {
    public_base_url: String,
    objects: Mutex<BTreeMap<String, StoredObject>>,
    fail_puts: bool,
}

impl InMemoryStore {
    pub fn new(public_base_url: &str) -> Self {
        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(BTreeMap::new()),
            fail_puts: false,
        }
    }

    /// A store whose uploads always fail.
    pub fn failing(public_base_url: &str) -> Self {
        Self {
            fail_puts: true,
            ..Self::new(public_base_url)
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, StoredObject>> {
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.lock().get(key).cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }
}

impl ObjectStore for InMemoryStore {
    fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        if self.fail_puts {
            return Err(StorageError::Request {
                operation: "PutObject",
                key: key.to_string(),
                status: Some(403),
                code: Some("AccessDenied".to_string()),
                message: "Access Denied".to_string(),
            });
        }
        self.lock().insert(
            key.to_string(),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        // Deleting a missing key succeeds, as it does on S3.
        self.lock().remove(key);
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }
}
