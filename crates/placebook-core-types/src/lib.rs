//! Core types shared across placebook facilities
//!
//! This crate provides foundational types used by the error, logging and
//! engine layers:
//!
//! - **Correlation types**: RequestId
//! - **Sensitive data**: Sensitive<T> marker for passwords and bearer tokens
//! - **Schema constants**: Canonical lifecycle event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
