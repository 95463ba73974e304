//! Indian mobile phone number type.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input is not a valid Indian mobile number.
    #[error("phone number is invalid")]
    Invalid,
}

/// An Indian mobile number, stored as its ten significant digits.
///
/// Accepts an optional `+91`, `91` or `0` prefix. The first significant digit
/// must be 6-9.
///
/// ```
/// use wednfest_core::Phone;
///
/// assert_eq!(Phone::parse("+919876543210").unwrap().as_str(), "9876543210");
/// assert!(Phone::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns `PhoneError::Empty` for blank input and `PhoneError::Invalid`
    /// when the digits do not form an Indian mobile number.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        let digits = s
            .strip_prefix("+91")
            .or_else(|| (s.len() == 12).then(|| s.strip_prefix("91")).flatten())
            .or_else(|| (s.len() == 11).then(|| s.strip_prefix('0')).flatten())
            .unwrap_or(s);

        let valid = digits.len() == 10
            && digits.bytes().all(|b| b.is_ascii_digit())
            && matches!(digits.as_bytes().first(), Some(b'6'..=b'9'));

        if valid {
            Ok(Self(digits.to_owned()))
        } else {
            Err(PhoneError::Invalid)
        }
    }

    /// Returns the ten-digit number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Phone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
