//! Image asset storage on the local filesystem.
//!
//! Assets live under a configurable root in per-kind subfolders (`theme`,
//! `category`, `products`, `orders`) and are served statically under
//! `/uploads`. Paths stored in the database are always web-relative with
//! forward slashes, regardless of host OS.
//!
//! Writers use randomized filenames (current time + random suffix), so
//! concurrent uploads need no locking. Deletes and copies are best-effort:
//! a missing file is logged and swallowed, never failing the parent
//! operation.

use std::path::{Path, PathBuf};

use crate::error::AppError;

/// Subfolder an asset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Theme,
    Category,
    Products,
    Orders,
}

impl AssetKind {
    /// Subfolder name under the upload root.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Theme => "theme",
            Self::Category => "category",
            Self::Products => "products",
            Self::Orders => "orders",
        }
    }
}

/// Filesystem-backed store for uploaded images.
#[derive(Debug, Clone)]
pub struct AssetStore {
    root: PathBuf,
}

impl AssetStore {
    /// Create a store rooted at `root` (usually `uploads/`).
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The on-disk root directory, for mounting the static file service.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate a collision-resistant filename preserving the extension.
    ///
    /// Mirrors the upload naming scheme: `<unix-millis>-<random><ext>`. When
    /// the original name has no extension, one is guessed from the mime
    /// subtype.
    #[must_use]
    pub fn generate_filename(original_name: &str, content_type: Option<&str>) -> String {
        let ext = Path::new(original_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .or_else(|| {
                content_type
                    .and_then(|ct| ct.rsplit('/').next())
                    .map(|sub| format!(".{sub}"))
            })
            .unwrap_or_default();
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::random();
        format!("{millis}-{suffix}{ext}")
    }

    /// Web-relative path for a stored file, always forward-slash.
    #[must_use]
    pub fn web_path(kind: AssetKind, filename: &str) -> String {
        format!("uploads/{}/{filename}", kind.dir())
    }

    /// Last path segment of a stored web path, i.e. the bare filename.
    #[must_use]
    pub fn filename_of(web_path: &str) -> &str {
        web_path.rsplit('/').next().unwrap_or(web_path)
    }

    fn fs_path(&self, kind: AssetKind, filename: &str) -> PathBuf {
        self.root.join(kind.dir()).join(filename)
    }

    /// Write `bytes` as a new asset and return its web-relative path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Internal` when the directory cannot be created or
    /// the file cannot be written.
    pub async fn store(
        &self,
        kind: AssetKind,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, AppError> {
        let dir = self.root.join(kind.dir());
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("failed to create asset dir: {e}")))?;
        let path = dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("failed to write asset: {e}")))?;
        Ok(Self::web_path(kind, filename))
    }

    /// Delete a stored asset, identified by web path or bare filename.
    ///
    /// Best-effort: failures (including absence) are logged and swallowed.
    pub async fn delete(&self, kind: AssetKind, path_or_filename: &str) {
        let filename = Self::filename_of(path_or_filename);
        if filename.is_empty() {
            return;
        }
        let path = self.fs_path(kind, filename);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to delete asset");
        }
    }

    /// Copy a product image into the order asset area under the same
    /// filename, returning the new web path.
    ///
    /// Best-effort: on any failure logs a warning and returns `None`; the
    /// caller records a null image rather than aborting.
    pub async fn copy_product_image_to_order(&self, product_image_path: &str) -> Option<String> {
        let filename = Self::filename_of(product_image_path);
        if filename.is_empty() {
            return None;
        }
        let src = self.fs_path(AssetKind::Products, filename);
        let dst_dir = self.root.join(AssetKind::Orders.dir());
        if let Err(e) = tokio::fs::create_dir_all(&dst_dir).await {
            tracing::warn!(error = %e, "failed to create order asset dir");
            return None;
        }
        let dst = dst_dir.join(filename);
        match tokio::fs::copy(&src, &dst).await {
            Ok(_) => Some(Self::web_path(AssetKind::Orders, filename)),
            Err(e) => {
                tracing::warn!(
                    src = %src.display(),
                    dst = %dst.display(),
                    error = %e,
                    "failed to copy product image for order snapshot"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_filename_keeps_extension() {
        let name = AssetStore::generate_filename("sofa.jpg", None);
        assert!(name.ends_with(".jpg"));
        assert!(name.contains('-'));
    }

    #[test]
    fn test_generate_filename_falls_back_to_mime() {
        let name = AssetStore::generate_filename("upload", Some("image/png"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_generate_filename_unique() {
        let a = AssetStore::generate_filename("x.jpg", None);
        let b = AssetStore::generate_filename("x.jpg", None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_web_path_is_forward_slash() {
        assert_eq!(
            AssetStore::web_path(AssetKind::Products, "a.jpg"),
            "uploads/products/a.jpg"
        );
        assert_eq!(
            AssetStore::web_path(AssetKind::Category, "i.png"),
            "uploads/category/i.png"
        );
    }

    #[test]
    fn test_filename_of() {
        assert_eq!(AssetStore::filename_of("uploads/products/a.jpg"), "a.jpg");
        assert_eq!(AssetStore::filename_of("a.jpg"), "a.jpg");
    }

    #[tokio::test]
    async fn test_store_and_copy_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());

        let web = store
            .store(AssetKind::Products, "chair.jpg", b"fake-image")
            .await
            .unwrap();
        assert_eq!(web, "uploads/products/chair.jpg");

        let copied = store.copy_product_image_to_order(&web).await;
        assert_eq!(copied.as_deref(), Some("uploads/orders/chair.jpg"));

        let on_disk = dir.path().join("orders").join("chair.jpg");
        assert_eq!(tokio::fs::read(on_disk).await.unwrap(), b"fake-image");
    }

    #[tokio::test]
    async fn test_copy_missing_source_degrades_to_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        let copied = store
            .copy_product_image_to_order("uploads/products/nope.jpg")
            .await;
        assert!(copied.is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());
        // Must not panic or error.
        store.delete(AssetKind::Theme, "uploads/theme/gone.jpg").await;
    }
}
