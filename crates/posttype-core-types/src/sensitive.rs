//! Secret values that must never reach a log line
//!
//! Post types may configure a master code that confirms feature and
//! unfeature operations. It is carried as `Sensitive<String>` from the
//! moment configuration is parsed.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Wrapper that redacts its content in Debug and Display
///
/// # Example
///
/// ```
/// use posttype_core_types::Sensitive;
///
/// let code = Sensitive::new("open-sesame".to_string());
/// assert_eq!(format!("{:?}", code), "***REDACTED***");
/// assert_eq!(code.expose(), "open-sesame");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the secret. Keep the borrow short and never format it.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Sensitive)
    }
}
