use crate::assets::atomic::atomic_write;
use crate::errors::{asset_missing, asset_path_rejected, io_error};
use placebook_core::assets::AssetStore;
use placebook_core::errors::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

/// Asset Store backed by a directory
pub struct FsAssetStore {
    root: PathBuf,
}

impl FsAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a stored path, refusing anything outside the root
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let candidate = Path::new(path);
        if candidate
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(asset_path_rejected(path, "Asset path must not contain '..'"));
        }
        if !candidate.starts_with(&self.root) {
            return Err(asset_path_rejected(path, "Asset path is outside the asset store"));
        }
        Ok(candidate.to_path_buf())
    }
}

impl AssetStore for FsAssetStore {
    fn put(&self, content: &[u8], extension: &str) -> Result<String> {
        if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(asset_path_rejected(extension, "Invalid asset file extension"));
        }

        let target = self
            .root
            .join(format!("{}.{}", Uuid::new_v4(), extension.to_ascii_lowercase()));
        atomic_write(&target, content)?;

        tracing::debug!(asset_path = %target.display(), bytes = content.len(), "Stored asset");
        Ok(target.to_string_lossy().into_owned())
    }

    fn remove(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target) {
            Ok(()) => {
                tracing::debug!(asset_path = path, "Removed asset");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(asset_missing(path)),
            Err(e) => Err(io_error("asset_remove", e)),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }
}
