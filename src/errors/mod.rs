//! # Error Handling
//!
//! Every fallible operation in this crate returns [`Result`] with a
//! [`ConfigSecretsError`]. Errors carry secret identifiers and configuration
//! paths, never secret values.

pub mod types;

pub use types::{ConfigSecretsError, Result};
