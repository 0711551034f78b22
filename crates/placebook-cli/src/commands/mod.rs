pub mod check;
pub mod place;
pub mod user;

use placebook_core::errors::{PlaceError, Result};
use placebook_engine::upload::guess_mime_type;
use placebook_engine::{EngineCommandResult, Upload};
use std::path::Path;

/// Print a command result body as pretty JSON
pub fn print_result(result: &EngineCommandResult) {
    print_json(&result.to_json());
}

pub fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", value),
    }
}

/// Read a local image file as an upload
pub fn read_upload(path: &Path) -> Result<Upload> {
    let content = std::fs::read(path).map_err(|e| PlaceError::InvalidUpload {
        reason: format!("cannot read {}: {}", path.display(), e),
    })?;
    let mime_type = guess_mime_type(path).unwrap_or("application/octet-stream");
    Ok(Upload {
        content,
        mime_type: mime_type.to_string(),
    })
}

/// `Authorization` header value for a raw token
pub fn bearer(token: Option<String>) -> Option<String> {
    token.map(|t| format!("Bearer {}", t))
}
