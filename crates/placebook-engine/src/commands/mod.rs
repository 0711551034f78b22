//! Command orchestration layer
//!
//! [`Engine`] owns one instance of every service, all sharing the same
//! Transaction Coordinator, Asset Store and cleanup worker.

pub mod engine_command;
pub mod identity;
pub mod place;

use placebook_core::assets::AssetStore;
use placebook_core::credentials::{Argon2Hasher, HmacTokenIssuer, PasswordHasher, TokenIssuer};
use placebook_core::errors::Result;
use placebook_core::geocode::{FixedGeocoder, Geocoder};
use placebook_core::rules::invariants::{find_membership_issues, MembershipIssue};
use placebook_core_types::Sensitive;
use placebook_store::{FsAssetStore, PlaceRepo, TxCoordinator, UserRepo};
use std::sync::Arc;

use crate::auth_gate::AuthGate;
use crate::cleanup::AssetCleanup;
use crate::config::EngineConfig;
use crate::geocoding::HttpGeocoder;
use crate::upload::UploadTransport;
use identity::IdentityService;
use place::PlaceService;

pub(crate) fn elapsed_ms(start: std::time::Instant) -> u64 {
    start.elapsed().as_millis() as u64
}

/// Collaborators an [`Engine`] is assembled from
pub struct EngineParts {
    pub tx: Arc<TxCoordinator>,
    pub assets: Arc<dyn AssetStore>,
    pub geocoder: Arc<dyn Geocoder>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub issuer: Arc<dyn TokenIssuer>,
}

impl EngineParts {
    /// Default collaborators for `config`: SQLite file, filesystem assets,
    /// Argon2, HMAC tokens, and HTTP geocoding when an API key is set
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        let tx = Arc::new(TxCoordinator::open(&config.database.path)?);
        let assets: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new(&config.assets.root));

        let geocoder: Arc<dyn Geocoder> = match &config.geocoding.api_key {
            Some(key) if !key.trim().is_empty() => Arc::new(HttpGeocoder::new(
                config.geocoding.endpoint.clone(),
                Sensitive::new(key.clone()),
            )?),
            _ => Arc::new(FixedGeocoder::new(config.geocoding.fallback())),
        };

        let hasher = Arc::new(Argon2Hasher::new(
            config.auth.argon2_memory_kib,
            config.auth.argon2_iterations,
        )?);
        let issuer = Arc::new(HmacTokenIssuer::new(
            &Sensitive::new(config.auth.token_secret.clone()),
            config.auth.token_ttl_secs,
        ));

        Ok(Self {
            tx,
            assets,
            geocoder,
            hasher,
            issuer,
        })
    }
}

pub struct Engine {
    pub places: PlaceService,
    pub identity: IdentityService,
    pub auth: AuthGate,
    pub uploads: UploadTransport,
    cleanup: Arc<AssetCleanup>,
    tx: Arc<TxCoordinator>,
}

impl Engine {
    pub fn open(config: &EngineConfig) -> Result<Self> {
        if config.uses_dev_secret() {
            tracing::warn!("auth.token_secret is the development default");
        }
        Self::assemble(config, EngineParts::from_config(config)?)
    }

    pub fn assemble(config: &EngineConfig, parts: EngineParts) -> Result<Self> {
        let cleanup = Arc::new(AssetCleanup::start(parts.assets.clone())?);

        Ok(Self {
            places: PlaceService::new(
                parts.tx.clone(),
                parts.geocoder,
                config.geocoding.fallback(),
                cleanup.clone(),
            ),
            identity: IdentityService::new(
                parts.tx.clone(),
                parts.hasher,
                parts.issuer.clone(),
                config.auth.min_password_len,
            ),
            auth: AuthGate::new(parts.issuer),
            uploads: UploadTransport::new(
                parts.assets,
                config.assets.allowed_mime_types.clone(),
                config.assets.max_bytes,
            ),
            cleanup,
            tx: parts.tx,
        })
    }

    /// Every broken link between places and membership lists
    pub fn membership_issues(&self) -> Result<Vec<MembershipIssue>> {
        self.tx.read("check", |conn| {
            let places = PlaceRepo::list_all(conn)?;
            let users = UserRepo::list(conn)?;
            tracing::debug!(places = places.len(), users = users.len(), "Loaded snapshot");
            Ok(find_membership_issues(&places, &users))
        })
    }

    /// Queue an upload nothing references for removal
    pub(crate) fn discard_upload(&self, path: &str) {
        self.cleanup.schedule(path);
    }

    /// Wait for queued asset removals to finish
    pub fn flush_cleanup(&self) {
        self.cleanup.flush();
    }
}
