//! Record Store: persistence of Place rows

use crate::errors::{from_rusqlite, Result};
use crate::repo::user_repo::UserRepo;
use crate::repo::{decode_ts, encode_ts};
use placebook_core::model::{Location, Place, User};
use rusqlite::{Connection, OptionalExtension, Row};

const PLACE_COLUMNS: &str =
    "p.id, p.title, p.description, p.address, p.lat, p.lng, p.image, p.creator_id, p.created_at, p.updated_at";

/// SQLite repository for Places
pub struct PlaceRepo;

impl PlaceRepo {
    fn map_row(row: &Row<'_>) -> rusqlite::Result<Place> {
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;
        Ok(Place {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            address: row.get(3)?,
            location: Location::new(row.get(4)?, row.get(5)?),
            image: row.get(6)?,
            creator: row.get(7)?,
            created_at: decode_ts(8, &created_at)?,
            updated_at: decode_ts(9, &updated_at)?,
        })
    }

    /// Insert a new Place row
    pub fn insert(conn: &Connection, place: &Place) -> Result<()> {
        conn.execute(
            "INSERT INTO places (id, title, description, address, lat, lng, image, creator_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                place.id,
                place.title,
                place.description,
                place.address,
                place.location.lat,
                place.location.lng,
                place.image,
                place.creator,
                encode_ts(&place.created_at),
                encode_ts(&place.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;

        tracing::debug!(place_id = %place.id, creator = %place.creator, "Inserted place");
        Ok(())
    }

    /// Get a Place by id
    pub fn get(conn: &Connection, place_id: &str) -> Result<Option<Place>> {
        conn.query_row(
            &format!("SELECT {} FROM places p WHERE p.id = ?1", PLACE_COLUMNS),
            [place_id],
            Self::map_row,
        )
        .optional()
        .map_err(from_rusqlite)
    }

    /// Get a Place together with its resolved creator in one read
    ///
    /// A place whose creator row is missing is reported as absent.
    pub fn get_with_creator(conn: &Connection, place_id: &str) -> Result<Option<(Place, User)>> {
        let joined = conn
            .query_row(
                &format!(
                    "SELECT {}, u.id, u.name, u.email, u.password_hash, u.image, u.created_at
                     FROM places p JOIN users u ON u.id = p.creator_id
                     WHERE p.id = ?1",
                    PLACE_COLUMNS
                ),
                [place_id],
                |row| {
                    let place = Self::map_row(row)?;
                    let user = UserRepo::map_row_at(row, 10)?;
                    Ok((place, user))
                },
            )
            .optional()
            .map_err(from_rusqlite)?;

        match joined {
            None => Ok(None),
            Some((place, mut creator)) => {
                creator.places = UserRepo::load_memberships(conn, &creator.id)?;
                Ok(Some((place, creator)))
            }
        }
    }

    /// Persist title/description/updated_at; returns false if the row is gone
    pub fn update(conn: &Connection, place: &Place) -> Result<bool> {
        let changed = conn
            .execute(
                "UPDATE places SET title = ?2, description = ?3, updated_at = ?4 WHERE id = ?1",
                rusqlite::params![
                    place.id,
                    place.title,
                    place.description,
                    encode_ts(&place.updated_at),
                ],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }

    /// Delete a Place row; returns false if it did not exist
    pub fn delete(conn: &Connection, place_id: &str) -> Result<bool> {
        let changed = conn
            .execute("DELETE FROM places WHERE id = ?1", [place_id])
            .map_err(from_rusqlite)?;

        tracing::debug!(place_id, deleted = changed == 1, "Deleted place");
        Ok(changed == 1)
    }

    /// Places listed in `user_id`'s membership list, in membership order
    pub fn list_for_member(conn: &Connection, user_id: &str) -> Result<Vec<Place>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM user_places m JOIN places p ON p.id = m.place_id
                 WHERE m.user_id = ?1 ORDER BY m.position",
                PLACE_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let places = stmt
            .query_map([user_id], Self::map_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(places)
    }

    /// Every Place, oldest first
    pub fn list_all(conn: &Connection) -> Result<Vec<Place>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM places p ORDER BY p.created_at, p.id",
                PLACE_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let places = stmt
            .query_map([], Self::map_row)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(places)
    }
}
