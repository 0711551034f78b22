//! Dispatcher: authentication, uploads and status codes

mod common;

use common::{cafe, setup, Harness, PNG};
use placebook_core::errors::ExErrorKind;
use placebook_core::model::NewPlace;
use placebook_core_types::Sensitive;
use placebook_engine::{apply_engine_command, EngineCommand, EngineCommandResult, Upload};

fn png() -> Upload {
    Upload {
        content: PNG.to_vec(),
        mime_type: "image/png".to_string(),
    }
}

fn upload_count(h: &Harness) -> usize {
    std::fs::read_dir(h.assets_root()).map(|d| d.count()).unwrap_or(0)
}

#[test]
fn test_signup_then_create_place_via_commands() {
    let h = setup();

    let signup = apply_engine_command(
        EngineCommand::Signup {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: Sensitive::new("password1".to_string()),
            image: png(),
        },
        &h.engine,
    )
    .unwrap();
    assert_eq!(signup.http_status(), 201);
    let body = signup.to_json();
    let token = body["token"].as_str().unwrap().to_string();
    let user_id = body["user"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert!(body["user"].get("password_hash").is_none());

    let created = apply_engine_command(
        EngineCommand::PlaceCreate {
            authorization: Some(format!("Bearer {}", token)),
            fields: cafe(),
            image: png(),
        },
        &h.engine,
    )
    .unwrap();
    assert_eq!(created.http_status(), 201);
    assert_eq!(created.to_json()["place"]["creator"], user_id.as_str());

    let listed = apply_engine_command(EngineCommand::PlacesByUser { user_id }, &h.engine).unwrap();
    assert_eq!(listed.http_status(), 200);
    assert_eq!(listed.to_json()["count"], 1);
}

#[test]
fn test_create_without_token_is_unauthenticated_and_stores_nothing() {
    let h = setup();

    let err = apply_engine_command(
        EngineCommand::PlaceCreate {
            authorization: None,
            fields: cafe(),
            image: png(),
        },
        &h.engine,
    )
    .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::Unauthenticated);
    assert_eq!(err.http_status(), 401);
    assert!(!h.assets_root().exists() || std::fs::read_dir(h.assets_root()).unwrap().count() == 0);
}

#[test]
fn test_bad_upload_rejected_before_signup() {
    let h = setup();

    let err = apply_engine_command(
        EngineCommand::Signup {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: Sensitive::new("password1".to_string()),
            image: Upload {
                content: b"GIF89a".to_vec(),
                mime_type: "image/gif".to_string(),
            },
        },
        &h.engine,
    )
    .unwrap_err();

    assert_eq!(err.http_status(), 400);
    assert!(h.engine.identity.get_all_users().unwrap().is_empty());
}

#[test]
fn test_delete_result_body() {
    let h = setup();
    let ada = h.signup("Ada");
    let image = h.upload();
    let place = h.engine.places.create_place(&ada.id, cafe(), &image).unwrap();

    let result = apply_engine_command(
        EngineCommand::PlaceDelete {
            authorization: Some(h.token_for("Ada")),
            place_id: place.id.clone(),
        },
        &h.engine,
    )
    .unwrap();

    assert!(matches!(result, EngineCommandResult::PlaceDeleted(_)));
    assert_eq!(result.http_status(), 200);
    assert_eq!(result.to_json()["place"]["id"], place.id.as_str());
}

#[test]
fn test_failed_create_command_removes_its_upload() {
    let h = setup();
    h.signup("Ada");
    let avatars = upload_count(&h);

    let err = apply_engine_command(
        EngineCommand::PlaceCreate {
            authorization: Some(h.token_for("Ada")),
            fields: NewPlace {
                title: "   ".to_string(),
                ..cafe()
            },
            image: png(),
        },
        &h.engine,
    )
    .unwrap_err();
    h.engine.flush_cleanup();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(upload_count(&h), avatars);
}

#[test]
fn test_failed_signup_command_removes_its_avatar() {
    let h = setup();
    h.signup("Ada");
    let avatars = upload_count(&h);

    let err = apply_engine_command(
        EngineCommand::Signup {
            name: "Ada Again".to_string(),
            email: "ada@example.com".to_string(),
            password: Sensitive::new("password1".to_string()),
            image: png(),
        },
        &h.engine,
    )
    .unwrap_err();
    h.engine.flush_cleanup();

    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(upload_count(&h), avatars);
    assert_eq!(h.engine.identity.get_all_users().unwrap().len(), 1);
}

#[test]
fn test_login_body_carries_user_and_token() {
    let h = setup();
    let ada = h.signup("Ada");

    let login = apply_engine_command(
        EngineCommand::Login {
            email: "ADA@example.com".to_string(),
            password: Sensitive::new("password1".to_string()),
        },
        &h.engine,
    )
    .unwrap();

    let body = login.to_json();
    assert_eq!(login.http_status(), 200);
    assert_eq!(body["user"]["id"], ada.id.as_str());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[test]
fn test_errors_map_to_http_status() {
    let h = setup();
    h.signup("Ada");
    let token = h.token_for("Ada");

    let missing = apply_engine_command(
        EngineCommand::PlaceUpdate {
            authorization: Some(token),
            place_id: "missing".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
        },
        &h.engine,
    )
    .unwrap_err();
    assert_eq!(missing.http_status(), 404);
    assert!(missing.request_id().is_some());

    let login = apply_engine_command(
        EngineCommand::Login {
            email: "ada@example.com".to_string(),
            password: Sensitive::new("nope-nope".to_string()),
        },
        &h.engine,
    )
    .unwrap_err();
    assert_eq!(login.http_status(), 401);
}
