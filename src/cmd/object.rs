//! `upload` and `delete`: single-object storage operations.

use anyhow::{Context, Result};
use std::path::Path;

use notion_blog::storage::{delete_object, upload_file, ObjectStore, Upload};

use crate::ui;

pub fn cmd_upload(file: &Path, destination: Option<&str>) -> Result<()> {
    let (_, store) = super::r2_store()?;
    upload(&store, file, destination).map(|_| ())
}

pub fn upload(store: &dyn ObjectStore, file: &Path, destination: Option<&str>) -> Result<Upload> {
    ui::info(&format!("Uploading: {}", file.display()));

    let upload = upload_file(store, file, destination)
        .with_context(|| format!("Upload failed for {}", file.display()))?;

    ui::success("Upload succeeded");
    println!("  URL: {}", upload.url);
    println!("  Key: {}", upload.key);
    Ok(upload)
}

pub fn cmd_delete(key: &str) -> Result<()> {
    let (_, store) = super::r2_store()?;
    delete(&store, key)
}

pub fn delete(store: &dyn ObjectStore, key: &str) -> Result<()> {
    ui::info(&format!("Deleting: {}", key));

    delete_object(store, key).with_context(|| format!("Delete failed for {}", key))?;

    ui::success("Delete succeeded");
    println!("  Key: {}", key);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use notion_blog::storage::InMemoryStore;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_upload_then_delete() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("architecture.png");
        fs::write(&path, b"png").unwrap();
        let store = InMemoryStore::new("https://images.example.com");

        let upload = upload(
            &store,
            &path,
            Some("articles/cloudflare-r2-blog-system/architecture.png"),
        )
        .unwrap();
        assert_eq!(
            upload.url,
            "https://images.example.com/articles/cloudflare-r2-blog-system/architecture.png"
        );

        delete(&store, &upload.key).unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_upload_failure_has_context() {
        let store = InMemoryStore::failing("https://images.example.com");
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.png");
        fs::write(&path, b"png").unwrap();

        let err = upload(&store, &path, None).unwrap_err();
        assert!(err.to_string().starts_with("Upload failed for"));
    }
}
