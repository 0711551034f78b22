//! Redaction wrapper for credentials
//!
//! Plain-text passwords and issued bearer tokens travel through the engine
//! wrapped in `Sensitive<T>` so a stray `{:?}` in a log line never prints them.

use std::fmt;

/// Wrapper that redacts its content in Debug and Display
///
/// # Example
///
/// ```
/// use placebook_core_types::Sensitive;
///
/// let password = Sensitive::new("hunter22");
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), &"hunter22");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Call sites should be few and obvious.
    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}
