//! Object storage for images.
//!
//! The bucket is addressed through [`ObjectStore`]; [`R2Store`] is the real
//! backend and [`InMemoryStore`] stands in for it in tests.

pub mod in_memory;
pub mod r2;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub use in_memory::InMemoryStore;
pub use r2::R2Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{operation} failed for key '{key}': {message}")]
    Request {
        operation: &'static str,
        key: String,
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },
    #[error("failed to start storage runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl StorageError {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NotFound",
            Self::Read { .. } => "ReadError",
            Self::Request { .. } => "RequestError",
            Self::Runtime(_) => "RuntimeError",
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Request { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => *status,
            _ => None,
        }
    }
}

pub trait ObjectStore {
    fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StorageError>;

    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Publicly addressable URL of `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub key: String,
    pub url: String,
}

/// MIME type from the file extension; unknown types are sent as octet-stream.
pub fn mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// `<stem>-<unix millis>-<8 hex chars><.ext>` for uploads without a destination.
pub fn unique_key(file_name: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("upload");
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e))
        .unwrap_or_default();

    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let suffix: [u8; 4] = rand::random();
    let hash: String = suffix.iter().map(|b| format!("{:02x}", b)).collect();

    format!("{}-{}-{}{}", stem, millis, hash, ext)
}

/// Upload a local file. The key is `destination` when given, otherwise a
/// unique name derived from the file name.
pub fn upload_file(
    store: &dyn ObjectStore,
    path: &Path,
    destination: Option<&str>,
) -> Result<Upload, StorageError> {
    if !path.is_file() {
        return Err(StorageError::NotFound(path.to_path_buf()));
    }

    let body = fs::read(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content_type = mime_type(path);

    let key = match destination.filter(|d| !d.is_empty()) {
        Some(dest) => dest.trim_start_matches('/').to_string(),
        None => {
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload");
            unique_key(file_name)
        }
    };

    let bytes = body.len();
    store.put(&key, body, content_type)?;
    tracing::info!(key = %key, bytes, content_type, "object uploaded");

    Ok(Upload {
        url: store.public_url(&key),
        key,
    })
}

pub fn delete_object(store: &dyn ObjectStore, key: &str) -> Result<(), StorageError> {
    store.delete(key)?;
    tracing::info!(key, "object deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_mime_type_known_extensions() {
        assert_eq!(mime_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(mime_type(Path::new("a.JPEG")), "image/jpeg");
        assert_eq!(mime_type(Path::new("a.png")), "image/png");
        assert_eq!(mime_type(Path::new("icon.svg")), "image/svg+xml");
        assert_eq!(mime_type(Path::new("favicon.ico")), "image/x-icon");
        assert_eq!(mime_type(Path::new("anim.gif")), "image/gif");
        assert_eq!(mime_type(Path::new("photo.WebP")), "image/webp");
        assert_eq!(mime_type(Path::new("scan.bmp")), "image/bmp");
    }

    #[test]
    fn test_mime_type_fallback() {
        assert_eq!(mime_type(Path::new("notes.txt")), "application/octet-stream");
        assert_eq!(mime_type(Path::new("no_extension")), "application/octet-stream");
    }

    #[test]
    fn test_unique_key_shape() {
        let key = unique_key("my-article.png");
        assert!(key.starts_with("my-article-"));
        assert!(key.ends_with(".png"));

        let middle = &key["my-article-".len()..key.len() - ".png".len()];
        let (millis, hash) = middle.rsplit_once('-').unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_unique_key_without_extension() {
        let key = unique_key("README");
        assert!(key.starts_with("README-"));
        assert!(!key.contains('.'));
    }

    #[test]
    fn test_upload_file_with_destination() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cover.png");
        fs::write(&path, b"\x89PNG").unwrap();

        let store = InMemoryStore::new("https://images.example.com");
        let upload = upload_file(&store, &path, Some("thumbnails/my-article.png")).unwrap();

        assert_eq!(upload.key, "thumbnails/my-article.png");
        assert_eq!(
            upload.url,
            "https://images.example.com/thumbnails/my-article.png"
        );
        let object = store.get("thumbnails/my-article.png").unwrap();
        assert_eq!(object.content_type, "image/png");
        assert_eq!(object.body, b"\x89PNG");
    }

    #[test]
    fn test_upload_file_generates_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("photo.jpg");
        fs::write(&path, b"jpeg").unwrap();

        let store = InMemoryStore::new("https://images.example.com");
        let upload = upload_file(&store, &path, None).unwrap();

        assert!(upload.key.starts_with("photo-"));
        assert!(upload.key.ends_with(".jpg"));
        assert_eq!(store.keys(), vec![upload.key.clone()]);
    }

    #[test]
    fn test_upload_missing_file() {
        let store = InMemoryStore::new("https://images.example.com");
        let err = upload_file(&store, Path::new("/nonexistent/file.png"), None).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_delete_object() {
        let store = InMemoryStore::new("https://images.example.com");
        store.put("old.png", vec![1], "image/png").unwrap();

        delete_object(&store, "old.png").unwrap();
        assert!(store.get("old.png").is_none());
    }
}
