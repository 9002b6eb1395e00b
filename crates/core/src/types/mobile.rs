//! Mobile number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`MobileNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum MobileNumberError {
    /// The input string is empty.
    #[error("mobile number cannot be empty")]
    Empty,
    /// The input contains a character other than digits (or a leading +).
    #[error("mobile number may only contain digits, with an optional leading +")]
    InvalidCharacter,
    /// The digit count is outside the accepted range.
    #[error("mobile number must have between {min} and {max} digits")]
    InvalidLength {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A merchant mobile number.
///
/// Accepts an optional leading `+` followed by 10-15 digits, matching the
/// E.164-style numbers merchants register with.
///
/// ## Examples
///
/// ```
/// use bodega_core::MobileNumber;
///
/// assert!(MobileNumber::parse("+14155550123").is_ok());
/// assert!(MobileNumber::parse("9876543210").is_ok());
///
/// assert!(MobileNumber::parse("").is_err());          // empty
/// assert!(MobileNumber::parse("call-me").is_err());   // letters
/// assert!(MobileNumber::parse("123456789").is_err()); // too few digits
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct MobileNumber(String);

impl MobileNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum number of digits.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `MobileNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains anything other than
    /// digits after an optional leading `+`, or has fewer than 10 or more
    /// than 15 digits.
    pub fn parse(s: &str) -> Result<Self, MobileNumberError> {
        if s.is_empty() {
            return Err(MobileNumberError::Empty);
        }

        let digits = s.strip_prefix('+').unwrap_or(s);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(MobileNumberError::InvalidCharacter);
        }

        if digits.len() < Self::MIN_DIGITS || digits.len() > Self::MAX_DIGITS {
            return Err(MobileNumberError::InvalidLength {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the mobile number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `MobileNumber` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MobileNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MobileNumber {
    type Err = MobileNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for MobileNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for MobileNumber {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for MobileNumber {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for MobileNumber {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_numbers() {
        assert!(MobileNumber::parse("+14155550123").is_ok());
        assert!(MobileNumber::parse("14155550123").is_ok());
        assert!(MobileNumber::parse("9876543210").is_ok());
        assert!(MobileNumber::parse("+123456789012345").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            MobileNumber::parse(""),
            Err(MobileNumberError::Empty)
        ));
    }

    #[test]
    fn test_parse_letters() {
        assert!(matches!(
            MobileNumber::parse("call-me-maybe"),
            Err(MobileNumberError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_plus_only() {
        assert!(matches!(
            MobileNumber::parse("+"),
            Err(MobileNumberError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_too_short() {
        assert!(matches!(
            MobileNumber::parse("123456789"),
            Err(MobileNumberError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_parse_too_long() {
        assert!(matches!(
            MobileNumber::parse("1234567890123456"),
            Err(MobileNumberError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_plus_not_counted_as_digit() {
        // 10 digits plus the sign is still valid
        assert!(MobileNumber::parse("+9876543210").is_ok());
    }

    #[test]
    fn test_display() {
        let number = MobileNumber::parse("+14155550123").unwrap();
        assert_eq!(format!("{number}"), "+14155550123");
    }
}
