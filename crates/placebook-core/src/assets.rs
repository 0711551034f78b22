/// Binary asset persistence (images)
///
/// Paths returned by `put` are opaque references stored on records. The
/// store has no knowledge of places or users.
pub trait AssetStore: Send + Sync {
    /// Persist `content` and return its path
    fn put(&self, content: &[u8], extension: &str) -> crate::errors::Result<String>;

    /// Delete the asset at `path`
    fn remove(&self, path: &str) -> crate::errors::Result<()>;

    fn exists(&self, path: &str) -> bool;
}
