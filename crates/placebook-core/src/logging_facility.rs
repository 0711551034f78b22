//! Structured logging facility for placebook
//!
//! - Single initialization point via `init(profile)`
//! - Lifecycle macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//!   owned by the engine layer; core and store only emit `tracing::debug!`
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use placebook_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
