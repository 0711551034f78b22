//! placebook core - domain model and rules
//!
//! This crate provides the storage-independent pieces of placebook:
//! - Place and User models and their membership relation
//! - The error facility (closed `ExErrorKind` taxonomy)
//! - The structured logging facility
//! - Input validation and membership invariant checks
//! - Collaborator seams: geocoding, credentials, asset storage

pub mod assets;
pub mod credentials;
pub mod errors;
pub mod geocode;
pub mod logging_facility;
pub mod model;
pub mod rules;

pub use placebook_core_types as core_types;

// Re-export commonly used types
pub use assets::AssetStore;
pub use credentials::{Argon2Hasher, HmacTokenIssuer, PasswordHasher, TokenClaims, TokenIssuer};
pub use errors::{ExError, ExErrorKind, PlaceError, Result};
pub use geocode::{FixedGeocoder, Geocoder};
pub use model::{Location, NewPlace, Place, User};
