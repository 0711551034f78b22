use placebook_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// The closed set of failures any placebook operation can report. Transport
/// layers map a kind to a status code with [`ExErrorKind::http_status`] and
/// never need to inspect anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExErrorKind {
    /// Caller-supplied data fails a precondition
    InvalidInput,
    /// Referenced entity does not exist
    NotFound,
    /// Missing or invalid credentials
    Unauthenticated,
    /// Authenticated, but not the owner of the entity
    Unauthorized,
    /// Storage or transaction failure; opaque to the caller
    OperationFailed,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Unauthenticated => "ERR_UNAUTHENTICATED",
            ExErrorKind::Unauthorized => "ERR_UNAUTHORIZED",
            ExErrorKind::OperationFailed => "ERR_OPERATION_FAILED",
        }
    }

    /// HTTP status a transport layer should answer with
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidInput => 400,
            ExErrorKind::NotFound => 404,
            ExErrorKind::Unauthenticated | ExErrorKind::Unauthorized => 401,
            ExErrorKind::OperationFailed => 500,
        }
    }
}

/// Canonical structured error type
///
/// `message` is safe to show to a caller. `detail` holds infrastructure
/// text (SQLite messages, I/O errors) and is only ever logged.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    detail: Option<String>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            detail: None,
        }
    }

    /// Shorthand for a storage-layer failure with internal detail
    pub fn operation_failed(op: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(ExErrorKind::OperationFailed)
            .with_op(op)
            .with_detail(detail)
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add caller-facing message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add internal detail (logged, never surfaced)
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn http_status(&self) -> u16 {
        self.kind.http_status()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// Message to hand back to the caller
    ///
    /// `OperationFailed` always yields a generic sentence so storage
    /// internals never leak through the transport.
    pub fn public_message(&self) -> String {
        match self.kind {
            ExErrorKind::OperationFailed => {
                "Something went wrong, please try again later.".to_string()
            }
            _ if self.message.is_empty() => self.kind.code().to_string(),
            _ => self.message.clone(),
        }
    }

    /// Re-raise as `OperationFailed`, keeping this error's text as detail
    ///
    /// Used by the Transaction Coordinator: whatever aborted a session is
    /// reported to the caller as a generic failure.
    pub fn into_operation_failed(self, op: &str) -> Self {
        if self.kind == ExErrorKind::OperationFailed {
            return self;
        }
        let detail = self.to_string();
        Self::operation_failed(op, detail)
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised by placebook rules and services
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlaceError {
    // ===== Existence =====
    #[error("Could not find a place for the provided id {place_id}")]
    PlaceNotFound { place_id: String },

    #[error("Could not find user with id {user_id}")]
    UserNotFound { user_id: String },

    // ===== Authorization =====
    /// Caller is authenticated but does not own the place
    #[error("You are not allowed to {action} this place")]
    NotOwner {
        place_id: String,
        caller_id: String,
        action: &'static str,
    },

    #[error("Authentication failed: {reason}")]
    Unauthenticated { reason: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    // ===== Validation =====
    #[error("Field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Password must be at least {min_len} characters")]
    PasswordTooShort { min_len: usize },

    #[error("Could not create user, email already exists")]
    EmailTaken { email: String },

    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },
}

impl From<PlaceError> for ExError {
    fn from(err: PlaceError) -> Self {
        let message = err.to_string();
        match err {
            PlaceError::PlaceNotFound { place_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(place_id)
                .with_message(message),

            PlaceError::UserNotFound { user_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(user_id)
                .with_message(message),

            PlaceError::NotOwner { place_id, .. } => ExError::new(ExErrorKind::Unauthorized)
                .with_entity_id(place_id)
                .with_message(message),

            PlaceError::Unauthenticated { .. } | PlaceError::InvalidCredentials => {
                ExError::new(ExErrorKind::Unauthenticated).with_message(message)
            }

            PlaceError::EmailTaken { email } | PlaceError::InvalidEmail { email } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(email)
                    .with_message(message)
            }

            PlaceError::EmptyField { .. }
            | PlaceError::PasswordTooShort { .. }
            | PlaceError::InvalidUpload { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
        }
    }
}
