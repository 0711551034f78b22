//! placebook store - SQLite persistence and filesystem assets
//!
//! Provides:
//! - Connection setup and checksummed embedded migrations
//! - Record Store (`PlaceRepo`) and Identity Store (`UserRepo`)
//! - Transaction Coordinator (`TxCoordinator`)
//! - Filesystem Asset Store (`FsAssetStore`)

pub mod assets;
pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod tx;

// Re-export key types
pub use assets::FsAssetStore;
pub use errors::Result;
pub use repo::{PlaceRepo, UserRepo};
pub use tx::TxCoordinator;
