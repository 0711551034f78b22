//! Identity Store: persistence of Users and their place memberships
//!
//! A user's `places` list lives in `user_places`, ordered by `position`.
//! `save` rewrites the whole list, so the row set always equals the
//! in-memory `User::places` that was last saved.

use crate::errors::{from_rusqlite, Result};
use crate::repo::{decode_ts, encode_ts};
use placebook_core::errors::{ExError, PlaceError};
use placebook_core::model::User;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, name, email, password_hash, image, created_at";

/// SQLite repository for Users
pub struct UserRepo;

impl UserRepo {
    /// Map the six user columns starting at `offset`; `places` is left empty
    pub(crate) fn map_row_at(row: &Row<'_>, offset: usize) -> rusqlite::Result<User> {
        let created_at: String = row.get(offset + 5)?;
        Ok(User {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            email: row.get(offset + 2)?,
            password_hash: row.get(offset + 3)?,
            image: row.get(offset + 4)?,
            places: Vec::new(),
            created_at: decode_ts(offset + 5, &created_at)?,
        })
    }

    fn hydrate(conn: &Connection, user: Option<User>) -> Result<Option<User>> {
        match user {
            None => Ok(None),
            Some(mut user) => {
                user.places = Self::load_memberships(conn, &user.id)?;
                Ok(Some(user))
            }
        }
    }

    /// Insert a new user row and its membership rows
    ///
    /// A duplicate email fails `InvalidInput` even when the caller's own
    /// pre-check raced with another signup.
    pub fn insert(conn: &Connection, user: &User) -> Result<()> {
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash, image, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                user.id,
                user.name,
                user.email,
                user.password_hash,
                user.image,
                encode_ts(&user.created_at),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(ref failure, Some(ref msg))
                if failure.code == ErrorCode::ConstraintViolation && msg.contains("users.email") =>
            {
                ExError::from(PlaceError::EmailTaken {
                    email: user.email.clone(),
                })
            }
            other => from_rusqlite(other),
        })?;

        Self::write_memberships(conn, &user.id, &user.places)?;
        tracing::debug!(user_id = %user.id, "Inserted user");
        Ok(())
    }

    /// Get a user by id, membership list included
    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
                [user_id],
                |row| Self::map_row_at(row, 0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Self::hydrate(conn, user)
    }

    /// Get a user by normalised email
    pub fn get_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
        let user = conn
            .query_row(
                &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
                [email],
                |row| Self::map_row_at(row, 0),
            )
            .optional()
            .map_err(from_rusqlite)?;
        Self::hydrate(conn, user)
    }

    /// All users, oldest first, memberships included
    pub fn list(conn: &Connection) -> Result<Vec<User>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM users ORDER BY created_at, id",
                USER_COLUMNS
            ))
            .map_err(from_rusqlite)?;

        let users = stmt
            .query_map([], |row| Self::map_row_at(row, 0))
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;

        users
            .into_iter()
            .map(|mut user| {
                user.places = Self::load_memberships(conn, &user.id)?;
                Ok(user)
            })
            .collect()
    }

    /// Persist profile fields and rewrite the membership list
    ///
    /// Fails `NotFound` if the user row no longer exists.
    pub fn save(conn: &Connection, user: &User) -> Result<()> {
        let changed = conn
            .execute(
                "UPDATE users SET name = ?2, image = ?3 WHERE id = ?1",
                rusqlite::params![user.id, user.name, user.image],
            )
            .map_err(from_rusqlite)?;
        if changed == 0 {
            return Err(PlaceError::UserNotFound {
                user_id: user.id.clone(),
            }
            .into());
        }

        conn.execute("DELETE FROM user_places WHERE user_id = ?1", [&user.id])
            .map_err(from_rusqlite)?;
        Self::write_memberships(conn, &user.id, &user.places)
    }

    /// Place ids listed for `user_id`, in membership order
    pub fn load_memberships(conn: &Connection, user_id: &str) -> Result<Vec<String>> {
        let mut stmt = conn
            .prepare("SELECT place_id FROM user_places WHERE user_id = ?1 ORDER BY position")
            .map_err(from_rusqlite)?;

        let ids = stmt
            .query_map([user_id], |row| row.get(0))
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<String>>>()
            .map_err(from_rusqlite)?;
        Ok(ids)
    }

    fn write_memberships(conn: &Connection, user_id: &str, places: &[String]) -> Result<()> {
        let mut stmt = conn
            .prepare("INSERT INTO user_places (user_id, place_id, position) VALUES (?1, ?2, ?3)")
            .map_err(from_rusqlite)?;
        for (position, place_id) in places.iter().enumerate() {
            stmt.execute(rusqlite::params![user_id, place_id, position as i64])
                .map_err(from_rusqlite)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_ready_in_memory;
    use placebook_core::errors::ExErrorKind;

    #[test]
    fn test_insert_and_lookup() {
        let conn = open_ready_in_memory().unwrap();
        let user = User::new("Ada", "ada@example.com", "$hash", "/img/ada.png");
        UserRepo::insert(&conn, &user).unwrap();

        assert_eq!(UserRepo::get(&conn, &user.id).unwrap(), Some(user.clone()));
        assert_eq!(
            UserRepo::get_by_email(&conn, "ada@example.com").unwrap(),
            Some(user)
        );
        assert_eq!(UserRepo::get_by_email(&conn, "bob@example.com").unwrap(), None);
    }

    #[test]
    fn test_duplicate_email_is_invalid_input() {
        let conn = open_ready_in_memory().unwrap();
        UserRepo::insert(&conn, &User::new("Ada", "ada@example.com", "h", "/a")).unwrap();

        let err = UserRepo::insert(&conn, &User::new("Eve", "ada@example.com", "h", "/e"))
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    #[test]
    fn test_save_missing_user_is_not_found() {
        let conn = open_ready_in_memory().unwrap();
        let ghost = User::new("Ghost", "ghost@example.com", "h", "/g");

        let err = UserRepo::save(&conn, &ghost).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
    }

    #[test]
    fn test_list_orders_by_creation() {
        let conn = open_ready_in_memory().unwrap();
        let first = User::new("Ada", "ada@example.com", "h", "/a");
        let second = User::new("Bob", "bob@example.com", "h", "/b");
        UserRepo::insert(&conn, &first).unwrap();
        UserRepo::insert(&conn, &second).unwrap();

        let names: Vec<String> = UserRepo::list(&conn)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["Ada", "Bob"]);
    }

    #[test]
    fn test_dangling_membership_rejected_at_commit() {
        let mut conn = open_ready_in_memory().unwrap();
        let mut user = User::new("Ada", "ada@example.com", "h", "/a");
        UserRepo::insert(&conn, &user).unwrap();

        let tx = conn.transaction().unwrap();
        user.add_place("no-such-place");
        UserRepo::save(&tx, &user).unwrap();
        assert!(tx.commit().is_err());

        assert!(UserRepo::load_memberships(&conn, &user.id).unwrap().is_empty());
    }
}
