//! Engine-level commands
//!
//! One variant per exposed operation. Callers that hold a raw
//! authorization header and raw upload bytes (the CLI, a future HTTP
//! transport) go through [`apply_engine_command`], which authenticates,
//! stores uploads and then calls the services in the right order.

use placebook_core::errors::Result;
use placebook_core::model::{NewPlace, Place, User};
use placebook_core_types::{RequestId, Sensitive};
use serde_json::{json, Value};
use std::fmt;

use crate::commands::identity::AuthSession;
use crate::commands::place::UserPlaces;
use crate::commands::Engine;

/// Raw upload as received from a transport
#[derive(Clone)]
pub struct Upload {
    pub content: Vec<u8>,
    pub mime_type: String,
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.content.len())
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum EngineCommand {
    PlaceGet {
        place_id: String,
    },
    PlacesByUser {
        user_id: String,
    },
    PlaceCreate {
        authorization: Option<String>,
        fields: NewPlace,
        image: Upload,
    },
    PlaceUpdate {
        authorization: Option<String>,
        place_id: String,
        title: String,
        description: String,
    },
    PlaceDelete {
        authorization: Option<String>,
        place_id: String,
    },
    UsersList,
    Signup {
        name: String,
        email: String,
        password: Sensitive<String>,
        image: Upload,
    },
    Login {
        email: String,
        password: Sensitive<String>,
    },
}

#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Place(Place),
    PlaceCreated(Place),
    PlaceUpdated(Place),
    PlaceDeleted(Place),
    UserPlaces(UserPlaces),
    Users(Vec<User>),
    SignedUp(AuthSession),
    LoggedIn(AuthSession),
}

fn session_json(session: &AuthSession) -> Value {
    json!({
        "user": session.user,
        "token": session.token.expose(),
    })
}

impl EngineCommandResult {
    /// HTTP status a transport should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            EngineCommandResult::PlaceCreated(_) | EngineCommandResult::SignedUp(_) => 201,
            _ => 200,
        }
    }

    /// Response body
    pub fn to_json(&self) -> Value {
        match self {
            EngineCommandResult::Place(place)
            | EngineCommandResult::PlaceCreated(place)
            | EngineCommandResult::PlaceUpdated(place)
            | EngineCommandResult::PlaceDeleted(place) => json!({ "place": place }),
            EngineCommandResult::UserPlaces(found) => {
                json!({ "places": found.places, "count": found.count })
            }
            EngineCommandResult::Users(users) => json!({ "users": users }),
            EngineCommandResult::SignedUp(session) | EngineCommandResult::LoggedIn(session) => {
                session_json(session)
            }
        }
    }
}

/// Authenticate, store uploads, and run one operation
///
/// The command runs inside a `request` span carrying a fresh request id;
/// a failing command returns that id on its error. An upload stored for a
/// create or signup that then fails is queued for removal.
pub fn apply_engine_command(cmd: EngineCommand, engine: &Engine) -> Result<EngineCommandResult> {
    let request_id = RequestId::new();
    let span = tracing::info_span!("request", request_id = %request_id);
    let _entered = span.enter();

    dispatch(cmd, engine).map_err(|e| e.with_request_id(request_id))
}

fn dispatch(cmd: EngineCommand, engine: &Engine) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::PlaceGet { place_id } => engine
            .places
            .get_place_by_id(&place_id)
            .map(EngineCommandResult::Place),

        EngineCommand::PlacesByUser { user_id } => engine
            .places
            .get_places_by_user(&user_id)
            .map(EngineCommandResult::UserPlaces),

        EngineCommand::PlaceCreate {
            authorization,
            fields,
            image,
        } => {
            let caller = engine.auth.authenticate(authorization.as_deref())?;
            let path = engine.uploads.accept(&image.content, &image.mime_type)?;
            engine
                .places
                .create_place(&caller, fields, &path)
                .map(EngineCommandResult::PlaceCreated)
                .map_err(|e| {
                    engine.discard_upload(&path);
                    e
                })
        }

        EngineCommand::PlaceUpdate {
            authorization,
            place_id,
            title,
            description,
        } => {
            let caller = engine.auth.authenticate(authorization.as_deref())?;
            engine
                .places
                .update_place(&place_id, &caller, &title, &description)
                .map(EngineCommandResult::PlaceUpdated)
        }

        EngineCommand::PlaceDelete {
            authorization,
            place_id,
        } => {
            let caller = engine.auth.authenticate(authorization.as_deref())?;
            engine
                .places
                .delete_place(&place_id, &caller)
                .map(EngineCommandResult::PlaceDeleted)
        }

        EngineCommand::UsersList => engine.identity.get_all_users().map(EngineCommandResult::Users),

        EngineCommand::Signup {
            name,
            email,
            password,
            image,
        } => {
            let path = engine.uploads.accept(&image.content, &image.mime_type)?;
            engine
                .identity
                .signup(&name, &email, &password, &path)
                .map(EngineCommandResult::SignedUp)
                .map_err(|e| {
                    engine.discard_upload(&path);
                    e
                })
        }

        EngineCommand::Login { email, password } => engine
            .identity
            .login(&email, &password)
            .map(EngineCommandResult::LoggedIn),
    }
}
