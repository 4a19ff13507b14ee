//! Payload types returned by secret stores.
//!
//! Secret payloads pass through the fetcher and the flattener before they
//! become plain configuration values. Until then they are held in
//! [`SecretString`] so that a stray `{:?}` in a log line cannot leak them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that redacts its contents in Debug, Display, and serialization.
///
/// - Debug output shows `SecretString([REDACTED])`
/// - Display output shows `[REDACTED]`
/// - Serialization outputs `"[REDACTED]"`
/// - Memory is zeroed when dropped
///
/// The raw value is only reachable through [`SecretString::expose_secret`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    /// Creates a new SecretString from a string value.
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value. Never log the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Returns the length of the secret without exposing the value.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the secret is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretString)
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Raw answer of a secret store for one identifier.
///
/// Stores fill whichever side they natively hold. A value with neither side
/// set is legal here; the fetcher rejects it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SecretValue {
    /// Text payload
    pub secret_string: Option<SecretString>,
    /// Binary payload
    pub secret_binary: Option<Vec<u8>>,
}

impl SecretValue {
    /// A value carrying a text payload.
    pub fn text(value: impl Into<SecretString>) -> Self {
        Self { secret_string: Some(value.into()), secret_binary: None }
    }

    /// A value carrying a binary payload.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self { secret_string: None, secret_binary: Some(bytes.into()) }
    }

    /// A value with no payload at all.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretValue")
            .field("secret_string", &self.secret_string)
            .field("secret_binary", &self.secret_binary.as_ref().map(|b| format!("[{} bytes]", b.len())))
            .finish()
    }
}
