//! Repository layer
//!
//! Row mapping for the Record Store (`places`) and the Identity Store
//! (`users` + `user_places`). Every function takes a `&Connection`, so it
//! runs the same way on a plain connection or inside a `Transaction`.

pub mod place_repo;
pub mod user_repo;

pub use place_repo::PlaceRepo;
pub use user_repo::UserRepo;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;

pub(crate) fn encode_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_ts(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
