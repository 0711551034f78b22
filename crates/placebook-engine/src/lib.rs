//! placebook engine - orchestration layer
//!
//! Wires the domain rules in `placebook-core` to the SQLite stores in
//! `placebook-store`:
//! - `PlaceService`: the Consistency Core for place create/read/update/delete
//! - `IdentityService`: user listing, signup and login
//! - `AuthGate`: bearer token to caller identity
//! - `UploadTransport`: image intake into the Asset Store
//! - `AssetCleanup`: background asset removal after commit
//! - `EngineConfig` and the `EngineCommand` dispatcher

pub mod auth_gate;
pub mod cleanup;
pub mod commands;
pub mod config;
pub mod geocoding;
pub mod upload;

pub use auth_gate::AuthGate;
pub use cleanup::AssetCleanup;
pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult, Upload};
pub use commands::identity::{AuthSession, IdentityService};
pub use commands::place::{PlaceService, UserPlaces};
pub use commands::{Engine, EngineParts};
pub use config::EngineConfig;
pub use geocoding::HttpGeocoder;
pub use upload::UploadTransport;
