use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::Location;

/// Place - a record owned by exactly one User
///
/// `id`, `creator` and `image` are fixed at creation. Only `title` and
/// `description` change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier (UUID v7)
    pub id: String,

    pub title: String,
    pub description: String,
    pub address: String,
    pub location: Location,

    /// Path of the image in the Asset Store
    pub image: String,

    /// Id of the owning User; that user's `places` must list this id
    pub creator: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new Place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
}

impl Place {
    /// Build a new Place with a fresh id and current timestamps
    pub fn new(
        fields: NewPlace,
        location: Location,
        image: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7().to_string(),
            title: fields.title,
            description: fields.description,
            address: fields.address,
            location,
            image: image.into(),
            creator: creator.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.creator == user_id
    }

    /// Replace title and description and bump `updated_at`
    pub fn revise(&mut self, title: String, description: String) {
        self.title = title;
        self.description = description;
        self.updated_at = Utc::now();
    }
}
