//! Consistency Core: place operations
//!
//! Keeps every Place and its creator's membership list in step. Create and
//! delete change both inside one `run_atomic` session; update touches only
//! the place row. Checks always run cheapest first:
//!
//! 1. input rules (`InvalidInput`)
//! 2. existence (`NotFound`)
//! 3. ownership (`Unauthorized`)
//! 4. the write
//!
//! ## Logging Ownership
//!
//! Each public operation emits `log_op_start!`, then `log_op_end!` or
//! `log_op_error!`. The store layer only logs at debug.

use placebook_core::errors::{PlaceError, Result};
use placebook_core::geocode::{resolve_location, Geocoder};
use placebook_core::model::{Location, NewPlace, Place};
use placebook_core::rules::validation::{validate_new_place, validate_revision};
use placebook_core::{log_op_end, log_op_error, log_op_start};
use placebook_store::{PlaceRepo, TxCoordinator, UserRepo};
use serde::Serialize;
use std::sync::Arc;

use super::elapsed_ms;
use crate::cleanup::AssetCleanup;

/// Places of one user, in membership order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPlaces {
    pub places: Vec<Place>,
    pub count: usize,
}

pub struct PlaceService {
    tx: Arc<TxCoordinator>,
    geocoder: Arc<dyn Geocoder>,
    fallback: Location,
    cleanup: Arc<AssetCleanup>,
}

impl PlaceService {
    pub fn new(
        tx: Arc<TxCoordinator>,
        geocoder: Arc<dyn Geocoder>,
        fallback: Location,
        cleanup: Arc<AssetCleanup>,
    ) -> Self {
        Self {
            tx,
            geocoder,
            fallback,
            cleanup,
        }
    }

    /// Look up one place
    pub fn get_place_by_id(&self, place_id: &str) -> Result<Place> {
        log_op_start!("place_get", place_id = place_id);
        let start = std::time::Instant::now();

        let result = self
            .tx
            .read("place_get", |conn| PlaceRepo::get(conn, place_id))
            .and_then(|found| {
                found.ok_or_else(|| {
                    PlaceError::PlaceNotFound {
                        place_id: place_id.to_string(),
                    }
                    .into()
                })
            });

        match result {
            Ok(place) => {
                log_op_end!("place_get", duration_ms = elapsed_ms(start), place_id = place_id);
                Ok(place)
            }
            Err(e) => {
                log_op_error!("place_get", e, duration_ms = elapsed_ms(start), place_id = place_id);
                Err(e)
            }
        }
    }

    /// Places listed by `user_id`, in the order they were created
    ///
    /// A known user with no places yields an empty list; an unknown user
    /// fails `NotFound`.
    pub fn get_places_by_user(&self, user_id: &str) -> Result<UserPlaces> {
        log_op_start!("places_by_user", user_id = user_id);
        let start = std::time::Instant::now();

        let result = self.tx.read("places_by_user", |conn| {
            if UserRepo::get(conn, user_id)?.is_none() {
                return Err(PlaceError::UserNotFound {
                    user_id: user_id.to_string(),
                }
                .into());
            }
            let places = PlaceRepo::list_for_member(conn, user_id)?;
            let count = places.len();
            Ok(UserPlaces { places, count })
        });

        match result {
            Ok(found) => {
                log_op_end!(
                    "places_by_user",
                    duration_ms = elapsed_ms(start),
                    user_id = user_id,
                    count = found.count
                );
                Ok(found)
            }
            Err(e) => {
                log_op_error!("places_by_user", e, duration_ms = elapsed_ms(start), user_id = user_id);
                Err(e)
            }
        }
    }

    /// Create a place owned by `owner_id` with an already stored image
    ///
    /// `asset_path` belongs to the caller. It is left in place on failure so
    /// the same upload can be resubmitted.
    pub fn create_place(&self, owner_id: &str, fields: NewPlace, asset_path: &str) -> Result<Place> {
        log_op_start!("place_create", user_id = owner_id);
        let start = std::time::Instant::now();

        match self.create_place_impl(owner_id, fields, asset_path) {
            Ok(place) => {
                log_op_end!(
                    "place_create",
                    duration_ms = elapsed_ms(start),
                    user_id = owner_id,
                    place_id = %place.id
                );
                Ok(place)
            }
            Err(e) => {
                log_op_error!("place_create", e, duration_ms = elapsed_ms(start), user_id = owner_id);
                Err(e)
            }
        }
    }

    fn create_place_impl(&self, owner_id: &str, fields: NewPlace, asset_path: &str) -> Result<Place> {
        validate_new_place(&fields)?;

        let owner_exists = self
            .tx
            .read("place_create", |conn| UserRepo::get(conn, owner_id))?
            .is_some();
        if !owner_exists {
            return Err(PlaceError::UserNotFound {
                user_id: owner_id.to_string(),
            }
            .into());
        }

        let location = resolve_location(self.geocoder.as_ref(), &fields.address, self.fallback);
        let place = Place::new(fields, location, asset_path, owner_id);

        self.tx.run_atomic("place_create", |tx| {
            let mut owner = UserRepo::get(tx, owner_id)?.ok_or_else(|| PlaceError::UserNotFound {
                user_id: owner_id.to_string(),
            })?;
            PlaceRepo::insert(tx, &place)?;
            owner.add_place(place.id.clone());
            UserRepo::save(tx, &owner)
        })?;

        Ok(place)
    }

    /// Replace title and description of a place owned by `caller_id`
    pub fn update_place(
        &self,
        place_id: &str,
        caller_id: &str,
        title: &str,
        description: &str,
    ) -> Result<Place> {
        log_op_start!("place_update", place_id = place_id, user_id = caller_id);
        let start = std::time::Instant::now();

        match self.update_place_impl(place_id, caller_id, title, description) {
            Ok(place) => {
                log_op_end!("place_update", duration_ms = elapsed_ms(start), place_id = place_id);
                Ok(place)
            }
            Err(e) => {
                log_op_error!(
                    "place_update",
                    e,
                    duration_ms = elapsed_ms(start),
                    place_id = place_id,
                    user_id = caller_id
                );
                Err(e)
            }
        }
    }

    fn update_place_impl(
        &self,
        place_id: &str,
        caller_id: &str,
        title: &str,
        description: &str,
    ) -> Result<Place> {
        validate_revision(title, description)?;

        let mut place = self
            .tx
            .read("place_update", |conn| PlaceRepo::get(conn, place_id))?
            .ok_or_else(|| PlaceError::PlaceNotFound {
                place_id: place_id.to_string(),
            })?;

        if !place.is_owned_by(caller_id) {
            return Err(PlaceError::NotOwner {
                place_id: place_id.to_string(),
                caller_id: caller_id.to_string(),
                action: "edit",
            }
            .into());
        }

        place.revise(title.to_string(), description.to_string());

        // A delete that committed after our read leaves nothing to update
        let updated = self
            .tx
            .write("place_update", |conn| PlaceRepo::update(conn, &place))?;
        if !updated {
            return Err(PlaceError::PlaceNotFound {
                place_id: place_id.to_string(),
            }
            .into());
        }

        Ok(place)
    }

    /// Delete a place owned by `caller_id` and queue its image for removal
    pub fn delete_place(&self, place_id: &str, caller_id: &str) -> Result<Place> {
        log_op_start!("place_delete", place_id = place_id, user_id = caller_id);
        let start = std::time::Instant::now();

        match self.delete_place_impl(place_id, caller_id) {
            Ok(place) => {
                log_op_end!("place_delete", duration_ms = elapsed_ms(start), place_id = place_id);
                Ok(place)
            }
            Err(e) => {
                log_op_error!(
                    "place_delete",
                    e,
                    duration_ms = elapsed_ms(start),
                    place_id = place_id,
                    user_id = caller_id
                );
                Err(e)
            }
        }
    }

    fn delete_place_impl(&self, place_id: &str, caller_id: &str) -> Result<Place> {
        let not_found = || PlaceError::PlaceNotFound {
            place_id: place_id.to_string(),
        };

        let (place, creator) = self
            .tx
            .read("place_delete", |conn| PlaceRepo::get_with_creator(conn, place_id))?
            .ok_or_else(not_found)?;

        if creator.id != caller_id {
            return Err(PlaceError::NotOwner {
                place_id: place_id.to_string(),
                caller_id: caller_id.to_string(),
                action: "delete",
            }
            .into());
        }

        let image = place.image.clone();

        let deleted = self.tx.run_atomic("place_delete", |tx| {
            if !PlaceRepo::delete(tx, place_id)? {
                return Ok(false);
            }
            let mut owner = UserRepo::get(tx, &creator.id)?.ok_or_else(|| {
                PlaceError::UserNotFound {
                    user_id: creator.id.clone(),
                }
            })?;
            owner.remove_place(place_id);
            UserRepo::save(tx, &owner)?;
            Ok(true)
        })?;
        if !deleted {
            return Err(not_found().into());
        }

        self.cleanup.schedule(&image);
        Ok(place)
    }
}
