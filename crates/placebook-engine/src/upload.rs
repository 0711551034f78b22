//! Upload Transport
//!
//! Accepts one binary image part, checks its MIME type and size, and
//! stores it. The returned path is what `create_place` / `signup` receive.

use placebook_core::assets::AssetStore;
use placebook_core::errors::{PlaceError, Result};
use std::path::Path;
use std::sync::Arc;

pub struct UploadTransport {
    store: Arc<dyn AssetStore>,
    allowed_mime_types: Vec<String>,
    max_bytes: usize,
}

impl UploadTransport {
    pub fn new(store: Arc<dyn AssetStore>, allowed_mime_types: Vec<String>, max_bytes: usize) -> Self {
        Self {
            store,
            allowed_mime_types: allowed_mime_types
                .into_iter()
                .map(|m| m.to_ascii_lowercase())
                .collect(),
            max_bytes,
        }
    }

    /// Store `content` and return its Asset Store path
    pub fn accept(&self, content: &[u8], mime_type: &str) -> Result<String> {
        let mime_type = mime_type.trim().to_ascii_lowercase();
        if !self.allowed_mime_types.contains(&mime_type) {
            return Err(PlaceError::InvalidUpload {
                reason: format!("unsupported file type '{}'", mime_type),
            }
            .into());
        }
        if content.is_empty() {
            return Err(PlaceError::InvalidUpload {
                reason: "file is empty".to_string(),
            }
            .into());
        }
        if content.len() > self.max_bytes {
            return Err(PlaceError::InvalidUpload {
                reason: format!("file exceeds {} bytes", self.max_bytes),
            }
            .into());
        }

        let extension = extension_for(&mime_type).ok_or_else(|| PlaceError::InvalidUpload {
            reason: format!("unsupported file type '{}'", mime_type),
        })?;
        self.store.put(content, extension)
    }
}

fn extension_for(mime_type: &str) -> Option<&str> {
    mime_type
        .strip_prefix("image/")
        .filter(|sub| !sub.is_empty() && sub.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// MIME type implied by a file name's extension, for local files
pub fn guess_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpeg" => Some("image/jpeg"),
        "jpg" => Some("image/jpg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placebook_core::errors::ExErrorKind;
    use placebook_store::FsAssetStore;
    use tempfile::TempDir;

    fn transport(dir: &TempDir) -> UploadTransport {
        UploadTransport::new(
            Arc::new(FsAssetStore::new(dir.path())),
            vec!["image/png".to_string(), "image/jpeg".to_string(), "image/jpg".to_string()],
            16,
        )
    }

    #[test]
    fn test_accepts_allowed_type() {
        let dir = TempDir::new().unwrap();
        let path = transport(&dir).accept(b"\x89PNG", "image/PNG").unwrap();
        assert!(path.ends_with(".png"));
        assert!(Path::new(&path).exists());
    }

    #[test]
    fn test_jpg_and_jpeg_keep_their_extension() {
        let dir = TempDir::new().unwrap();
        let t = transport(&dir);
        assert!(t.accept(b"jpg", "image/jpg").unwrap().ends_with(".jpg"));
        assert!(t.accept(b"jpeg", "image/jpeg").unwrap().ends_with(".jpeg"));
    }

    #[test]
    fn test_rejects_type_size_and_empty() {
        let dir = TempDir::new().unwrap();
        let t = transport(&dir);

        for (content, mime) in [
            (&b"gif"[..], "image/gif"),
            (&b"0123456789abcdefXX"[..], "image/png"),
            (&b""[..], "image/png"),
        ] {
            let err = t.accept(content, mime).unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        }
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_guess_mime_type() {
        assert_eq!(guess_mime_type(Path::new("a/b.PNG")), Some("image/png"));
        assert_eq!(guess_mime_type(Path::new("b.jpg")), Some("image/jpg"));
        assert_eq!(guess_mime_type(Path::new("b.gif")), None);
        assert_eq!(guess_mime_type(Path::new("noext")), None);
    }
}
