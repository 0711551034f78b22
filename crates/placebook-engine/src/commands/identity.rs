//! Identity operations: user listing, signup and login

use placebook_core::credentials::{PasswordHasher, TokenIssuer};
use placebook_core::errors::{PlaceError, Result};
use placebook_core::model::User;
use placebook_core::rules::validation::{normalize_email, validate_login, validate_signup};
use placebook_core::{log_op_end, log_op_error, log_op_start};
use placebook_core_types::Sensitive;
use placebook_store::{TxCoordinator, UserRepo};
use std::sync::Arc;

use super::elapsed_ms;

/// A user together with a freshly issued bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: Sensitive<String>,
}

pub struct IdentityService {
    tx: Arc<TxCoordinator>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn TokenIssuer>,
    min_password_len: usize,
}

impl IdentityService {
    pub fn new(
        tx: Arc<TxCoordinator>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn TokenIssuer>,
        min_password_len: usize,
    ) -> Self {
        Self {
            tx,
            hasher,
            issuer,
            min_password_len,
        }
    }

    pub fn get_all_users(&self) -> Result<Vec<User>> {
        log_op_start!("users_list");
        let start = std::time::Instant::now();

        match self.tx.read("users_list", UserRepo::list) {
            Ok(users) => {
                log_op_end!(
                    "users_list",
                    duration_ms = elapsed_ms(start),
                    count = users.len()
                );
                Ok(users)
            }
            Err(e) => {
                log_op_error!("users_list", e, duration_ms = elapsed_ms(start));
                Err(e)
            }
        }
    }

    /// Register a new user whose avatar is already stored at `image_path`
    pub fn signup(
        &self,
        name: &str,
        email: &str,
        password: &Sensitive<String>,
        image_path: &str,
    ) -> Result<AuthSession> {
        log_op_start!("signup");
        let start = std::time::Instant::now();

        match self.signup_impl(name, email, password, image_path) {
            Ok(session) => {
                log_op_end!(
                    "signup",
                    duration_ms = elapsed_ms(start),
                    user_id = %session.user.id
                );
                Ok(session)
            }
            Err(e) => {
                log_op_error!("signup", e, duration_ms = elapsed_ms(start));
                Err(e)
            }
        }
    }

    fn signup_impl(
        &self,
        name: &str,
        email: &str,
        password: &Sensitive<String>,
        image_path: &str,
    ) -> Result<AuthSession> {
        let email = normalize_email(email);
        validate_signup(name, &email, password.expose(), self.min_password_len)?;

        let existing = self
            .tx
            .read("signup", |conn| UserRepo::get_by_email(conn, &email))?;
        if existing.is_some() {
            return Err(PlaceError::EmailTaken { email }.into());
        }

        let hash = self.hasher.hash(password)?;
        let user = User::new(name.trim(), email, hash, image_path);

        // Unique email is enforced again by the insert itself
        self.tx.write("signup", |conn| UserRepo::insert(conn, &user))?;

        let token = self.issuer.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Exchange email and password for a token
    ///
    /// Unknown email and wrong password fail identically.
    pub fn login(&self, email: &str, password: &Sensitive<String>) -> Result<AuthSession> {
        log_op_start!("login");
        let start = std::time::Instant::now();

        match self.login_impl(email, password) {
            Ok(session) => {
                log_op_end!(
                    "login",
                    duration_ms = elapsed_ms(start),
                    user_id = %session.user.id
                );
                Ok(session)
            }
            Err(e) => {
                log_op_error!("login", e, duration_ms = elapsed_ms(start));
                Err(e)
            }
        }
    }

    fn login_impl(&self, email: &str, password: &Sensitive<String>) -> Result<AuthSession> {
        let email = normalize_email(email);
        validate_login(&email, password.expose())?;

        let user = self
            .tx
            .read("login", |conn| UserRepo::get_by_email(conn, &email))?
            .ok_or(PlaceError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash)? {
            return Err(PlaceError::InvalidCredentials.into());
        }

        let token = self.issuer.issue(&user)?;
        Ok(AuthSession { user, token })
    }
}
