#![allow(dead_code)]

use placebook_core::credentials::{Argon2Hasher, HmacTokenIssuer};
use placebook_core::geocode::{FixedGeocoder, Geocoder};
use placebook_core::model::{Location, NewPlace, User};
use placebook_core_types::Sensitive;
use placebook_engine::{Engine, EngineConfig, EngineParts};
use placebook_store::{FsAssetStore, TxCoordinator};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";

pub struct Harness {
    pub engine: Engine,
    pub tx: Arc<TxCoordinator>,
    pub dir: TempDir,
}

impl Harness {
    pub fn assets_root(&self) -> PathBuf {
        self.dir.path().join("uploads")
    }

    /// Store an image the way the upload transport would
    pub fn upload(&self) -> String {
        self.engine.uploads.accept(PNG, "image/png").unwrap()
    }

    pub fn signup(&self, name: &str) -> User {
        let image = self.upload();
        self.engine
            .identity
            .signup(
                name,
                &format!("{}@example.com", name.to_lowercase()),
                &Sensitive::new("password1".to_string()),
                &image,
            )
            .unwrap()
            .user
    }

    pub fn token_for(&self, name: &str) -> String {
        let session = self
            .engine
            .identity
            .login(
                &format!("{}@example.com", name.to_lowercase()),
                &Sensitive::new("password1".to_string()),
            )
            .unwrap();
        format!("Bearer {}", session.token.expose())
    }
}

pub fn cafe() -> NewPlace {
    NewPlace {
        title: "Cafe".to_string(),
        description: "desc".to_string(),
        address: "20 W 34th St, New York".to_string(),
    }
}

pub fn setup() -> Harness {
    setup_with_geocoder(Arc::new(FixedGeocoder::new(Location::new(
        40.7484405,
        -73.9856644,
    ))))
}

pub fn setup_with_geocoder(geocoder: Arc<dyn Geocoder>) -> Harness {
    let dir = TempDir::new().unwrap();
    let config = EngineConfig::from_defaults().unwrap();

    let tx = Arc::new(TxCoordinator::open(dir.path().join("placebook.db")).unwrap());
    let parts = EngineParts {
        tx: tx.clone(),
        assets: Arc::new(FsAssetStore::new(dir.path().join("uploads"))),
        geocoder,
        hasher: Arc::new(Argon2Hasher::new(1024, 1).unwrap()),
        issuer: Arc::new(HmacTokenIssuer::new(
            &Sensitive::new("test-secret".to_string()),
            300,
        )),
    };
    let engine = Engine::assemble(&config, parts).unwrap();

    Harness { engine, tx, dir }
}
