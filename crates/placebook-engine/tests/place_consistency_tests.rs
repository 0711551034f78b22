//! Place create/read/update/delete keep places and membership lists in step

mod common;

use common::{cafe, setup, setup_with_geocoder};
use placebook_core::errors::{ExError, ExErrorKind, Result};
use placebook_core::geocode::Geocoder;
use placebook_core::model::{Location, NewPlace};
use placebook_engine::EngineConfig;
use placebook_store::{PlaceRepo, UserRepo};
use std::path::Path;
use std::sync::Arc;

struct Unreachable;

impl Geocoder for Unreachable {
    fn locate(&self, _address: &str) -> Result<Location> {
        Err(ExError::operation_failed("geocode", "connection refused"))
    }
}

#[test]
fn test_create_lists_place_under_creator() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();

    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    assert_eq!(p1.creator, u1.id);
    assert_eq!(p1.image, image);
    assert_eq!(p1.location, Location::new(40.7484405, -73.9856644));

    let owner = h
        .tx
        .read("check", |conn| UserRepo::get(conn, &u1.id))
        .unwrap()
        .unwrap();
    assert_eq!(owner.places, vec![p1.id.clone()]);

    let listed = h.engine.places.get_places_by_user(&u1.id).unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.places, vec![p1.clone()]);
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), p1);
}

#[test]
fn test_places_by_user_keeps_creation_order() {
    let h = setup();
    let u1 = h.signup("Ada");

    let mut ids = Vec::new();
    for title in ["One", "Two", "Three"] {
        let fields = NewPlace {
            title: title.to_string(),
            ..cafe()
        };
        let image = h.upload();
        ids.push(h.engine.places.create_place(&u1.id, fields, &image).unwrap().id);
    }

    let listed = h.engine.places.get_places_by_user(&u1.id).unwrap();
    let listed_ids: Vec<String> = listed.places.into_iter().map(|p| p.id).collect();
    assert_eq!(listed_ids, ids);
    assert_eq!(listed.count, 3);
}

#[test]
fn test_create_for_unknown_owner_is_not_found_and_keeps_upload() {
    let h = setup();
    let image = h.upload();

    let err = h
        .engine
        .places
        .create_place("no-such-user", cafe(), &image)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);

    h.engine.flush_cleanup();
    assert!(Path::new(&image).exists());
}

#[test]
fn test_resubmitted_upload_survives_earlier_failed_create() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let untitled = NewPlace {
        title: String::new(),
        ..cafe()
    };

    let err = h.engine.places.create_place(&u1.id, untitled, &image).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();
    h.engine.flush_cleanup();

    assert_eq!(p1.image, image);
    assert!(Path::new(&p1.image).exists());
}

#[test]
fn test_failing_geocoder_falls_back_to_configured_location() {
    let h = setup_with_geocoder(Arc::new(Unreachable));
    let u1 = h.signup("Ada");
    let image = h.upload();

    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    let fallback = EngineConfig::from_defaults().unwrap().geocoding.fallback();
    assert_eq!(p1.location, fallback);
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap().location, fallback);
}

#[test]
fn test_create_with_empty_title_is_invalid_input() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let fields = NewPlace {
        title: "  ".to_string(),
        ..cafe()
    };

    let err = h.engine.places.create_place(&u1.id, fields, &image).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(h.engine.places.get_places_by_user(&u1.id).unwrap().count, 0);
}

#[test]
fn test_failed_create_transaction_writes_nothing() {
    let h = setup();
    let u1 = h.signup("Ada");
    h.tx.write("inject_fault", |conn| {
        conn.execute_batch(
            "CREATE TRIGGER fail_membership BEFORE INSERT ON user_places
             BEGIN SELECT RAISE(ABORT, 'injected membership failure'); END;",
        )
        .map_err(placebook_store::errors::from_rusqlite)
    })
    .unwrap();
    let image = h.upload();

    let err = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::OperationFailed);
    assert!(!err.public_message().contains("injected"));
    let all = h.tx.read("check", PlaceRepo::list_all).unwrap();
    assert!(all.is_empty());

    // The upload stays with the caller for a retry
    h.engine.flush_cleanup();
    assert!(Path::new(&image).exists());
}

#[test]
fn test_get_unknown_place_and_user_are_not_found() {
    let h = setup();
    assert_eq!(
        h.engine.places.get_place_by_id("missing").unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    assert_eq!(
        h.engine.places.get_places_by_user("missing").unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_update_by_owner() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    let updated = h
        .engine
        .places
        .update_place(&p1.id, &u1.id, "Bar", "late night")
        .unwrap();

    assert_eq!(updated.id, p1.id);
    assert_eq!(updated.title, "Bar");
    assert_eq!(updated.image, p1.image);
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), updated);
}

#[test]
fn test_update_with_empty_field_performs_no_write() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    for (title, description) in [("", "x"), ("x", ""), ("  ", "  ")] {
        let err = h
            .engine
            .places
            .update_place(&p1.id, &u1.id, title, description)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    }

    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), p1);
    assert_eq!(
        h.engine.places.get_places_by_user(&u1.id).unwrap().places,
        vec![p1]
    );
}

#[test]
fn test_wrong_caller_is_unauthorized_not_not_found() {
    let h = setup();
    let u1 = h.signup("Ada");
    let u2 = h.signup("Bob");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    let update = h
        .engine
        .places
        .update_place(&p1.id, &u2.id, "Mine", "now")
        .unwrap_err();
    assert_eq!(update.kind(), ExErrorKind::Unauthorized);
    assert_eq!(update.message(), "You are not allowed to edit this place");

    let delete = h.engine.places.delete_place(&p1.id, &u2.id).unwrap_err();
    assert_eq!(delete.kind(), ExErrorKind::Unauthorized);

    // P1 and U1's membership are untouched
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), p1);
    assert_eq!(h.engine.places.get_places_by_user(&u1.id).unwrap().count, 1);
    assert!(Path::new(&image).exists());
}

#[test]
fn test_unknown_place_is_not_found_for_any_caller() {
    let h = setup();
    let u1 = h.signup("Ada");

    for caller in [u1.id.as_str(), "someone-else"] {
        assert_eq!(
            h.engine
                .places
                .update_place("missing", caller, "t", "d")
                .unwrap_err()
                .kind(),
            ExErrorKind::NotFound
        );
        assert_eq!(
            h.engine.places.delete_place("missing", caller).unwrap_err().kind(),
            ExErrorKind::NotFound
        );
    }
}

#[test]
fn test_delete_removes_place_membership_and_asset() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    let deleted = h.engine.places.delete_place(&p1.id, &u1.id).unwrap();
    assert_eq!(deleted.id, p1.id);

    assert_eq!(
        h.engine.places.get_place_by_id(&p1.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
    let listed = h.engine.places.get_places_by_user(&u1.id).unwrap();
    assert_eq!(listed.count, 0);
    let owner = h
        .tx
        .read("check", |conn| UserRepo::get(conn, &u1.id))
        .unwrap()
        .unwrap();
    assert!(owner.places.is_empty());

    h.engine.flush_cleanup();
    assert!(!Path::new(&image).exists());
}

#[test]
fn test_delete_twice_is_not_found() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();

    h.engine.places.delete_place(&p1.id, &u1.id).unwrap();
    let err = h.engine.places.delete_place(&p1.id, &u1.id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_delete_keeps_other_places_in_order() {
    let h = setup();
    let u1 = h.signup("Ada");
    let mut ids = Vec::new();
    for _ in 0..3 {
        let image = h.upload();
        ids.push(h.engine.places.create_place(&u1.id, cafe(), &image).unwrap().id);
    }

    h.engine.places.delete_place(&ids[1], &u1.id).unwrap();

    let remaining: Vec<String> = h
        .engine
        .places
        .get_places_by_user(&u1.id)
        .unwrap()
        .places
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);
}

#[test]
fn test_failed_delete_transaction_keeps_place_and_asset() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();
    h.tx.write("inject_fault", |conn| {
        conn.execute_batch(
            "CREATE TRIGGER fail_membership_delete BEFORE DELETE ON user_places
             BEGIN SELECT RAISE(ABORT, 'injected membership failure'); END;",
        )
        .map_err(placebook_store::errors::from_rusqlite)
    })
    .unwrap();

    let err = h.engine.places.delete_place(&p1.id, &u1.id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::OperationFailed);
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), p1);
    assert_eq!(h.engine.places.get_places_by_user(&u1.id).unwrap().count, 1);
    h.engine.flush_cleanup();
    assert!(Path::new(&image).exists());
}

#[test]
fn test_update_after_concurrent_delete_is_not_found() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();
    // The row is gone by the time the single-row write runs
    h.tx.write("inject_fault", |conn| {
        conn.execute_batch(
            "CREATE TRIGGER vanish_on_update BEFORE UPDATE ON places
             BEGIN SELECT RAISE(IGNORE); END;",
        )
        .map_err(placebook_store::errors::from_rusqlite)
    })
    .unwrap();

    let err = h
        .engine
        .places
        .update_place(&p1.id, &u1.id, "Bar", "late night")
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.entity_id(), Some(p1.id.as_str()));
    assert_eq!(h.engine.places.get_place_by_id(&p1.id).unwrap(), p1);
}

#[test]
fn test_delete_finding_row_gone_in_session_is_not_found() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();
    h.tx.write("inject_fault", |conn| {
        conn.execute_batch(
            "CREATE TRIGGER vanish_on_delete BEFORE DELETE ON places
             BEGIN SELECT RAISE(IGNORE); END;",
        )
        .map_err(placebook_store::errors::from_rusqlite)
    })
    .unwrap();

    let err = h.engine.places.delete_place(&p1.id, &u1.id).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    // Membership untouched and the image is not scheduled for removal
    assert_eq!(h.engine.places.get_places_by_user(&u1.id).unwrap().count, 1);
    h.engine.flush_cleanup();
    assert!(Path::new(&image).exists());
    assert!(h.engine.membership_issues().unwrap().is_empty());
}

#[test]
fn test_missing_asset_does_not_fail_delete() {
    let h = setup();
    let u1 = h.signup("Ada");
    let image = h.upload();
    let p1 = h.engine.places.create_place(&u1.id, cafe(), &image).unwrap();
    std::fs::remove_file(&image).unwrap();

    assert!(h.engine.places.delete_place(&p1.id, &u1.id).is_ok());
    h.engine.flush_cleanup();
}

#[test]
fn test_store_stays_consistent_after_mixed_operations() {
    let h = setup();
    let u1 = h.signup("Ada");
    let u2 = h.signup("Bob");
    let mut created = Vec::new();
    for owner in [&u1, &u2, &u1, &u2] {
        let image = h.upload();
        created.push(h.engine.places.create_place(&owner.id, cafe(), &image).unwrap());
    }
    h.engine.places.delete_place(&created[0].id, &u1.id).unwrap();
    let _ = h.engine.places.delete_place(&created[1].id, &u1.id);
    h.engine
        .places
        .update_place(&created[3].id, &u2.id, "Renamed", "again")
        .unwrap();

    assert!(h.engine.membership_issues().unwrap().is_empty());
}
