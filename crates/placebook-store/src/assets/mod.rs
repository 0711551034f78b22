//! Filesystem Asset Store
//!
//! Images are written under a single root with a random file name, so two
//! identical uploads never share a path and removing one cannot affect the
//! other.

pub mod atomic;
pub mod fs_store;

pub use fs_store::FsAssetStore;
