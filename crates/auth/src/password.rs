//! Password wrapper that keeps secrets out of logs and zeroes them on drop.

use std::fmt;

use serde::{Deserialize, Deserializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Placeholder printed wherever a password would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A password carried by an import record.
///
/// Strength is never checked here. `Debug` and `Display` are redacted and the
/// inner value is only reachable through [`Password::expose`].
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Password {
    inner: String,
}

impl Password {
    pub fn new(inner: impl Into<String>) -> Self {
        Self {
            inner: inner.into(),
        }
    }

    /// Explicitly access the plain-text value.
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl Clone for Password {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Password").field(&REDACTED).finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<'de> Deserialize<'de> for Password {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}
