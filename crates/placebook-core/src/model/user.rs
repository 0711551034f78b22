use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User - an account owning an ordered list of Places
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier (UUID v7)
    pub id: String,

    pub name: String,

    /// Unique across all users, stored normalised (trimmed, lower-case)
    pub email: String,

    /// Opaque one-way hash; never serialised
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// Avatar path in the Asset Store
    pub image: String,

    /// Ids of owned places, in insertion order
    pub places: Vec<String>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            image: image.into(),
            places: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn owns(&self, place_id: &str) -> bool {
        self.places.iter().any(|id| id == place_id)
    }

    /// Append a place id to the membership list (no duplicates)
    pub fn add_place(&mut self, place_id: impl Into<String>) {
        let place_id = place_id.into();
        if !self.owns(&place_id) {
            self.places.push(place_id);
        }
    }

    /// Remove a place id; returns whether it was listed
    pub fn remove_place(&mut self, place_id: &str) -> bool {
        let before = self.places.len();
        self.places.retain(|id| id != place_id);
        self.places.len() != before
    }
}
