//! Business category enumeration.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown business category.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown business category: {0}")]
pub struct BusinessCategoryError(pub String);

/// The fixed set of storefront types a merchant can declare.
///
/// A merchant's business category gates which master categories (and
/// therefore which master products) apply to their store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BusinessCategory {
    Grocery,
    Mobile,
    Fashion,
    Food,
    Technology,
    #[serde(rename = "Home & Appliance")]
    HomeAppliance,
}

impl BusinessCategory {
    /// All business categories, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Grocery,
        Self::Mobile,
        Self::Fashion,
        Self::Food,
        Self::Technology,
        Self::HomeAppliance,
    ];

    /// The canonical display name, as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Grocery => "Grocery",
            Self::Mobile => "Mobile",
            Self::Fashion => "Fashion",
            Self::Food => "Food",
            Self::Technology => "Technology",
            Self::HomeAppliance => "Home & Appliance",
        }
    }

    /// Parse a category from its canonical name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `BusinessCategoryError` if the name is not one of the fixed
    /// choices.
    pub fn parse(s: &str) -> Result<Self, BusinessCategoryError> {
        Self::ALL
            .iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| BusinessCategoryError(s.to_owned()))
    }
}

impl fmt::Display for BusinessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BusinessCategory {
    type Err = BusinessCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature): stored as TEXT.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for BusinessCategory {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for BusinessCategory {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for BusinessCategory {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <&str as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_names() {
        for category in BusinessCategory::ALL {
            assert_eq!(BusinessCategory::parse(category.as_str()).unwrap(), category);
        }
    }

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(
            BusinessCategory::parse("grocery").unwrap(),
            BusinessCategory::Grocery
        );
        assert_eq!(
            BusinessCategory::parse("home & appliance").unwrap(),
            BusinessCategory::HomeAppliance
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert!(BusinessCategory::parse("Automotive").is_err());
        assert!(BusinessCategory::parse("").is_err());
    }

    #[test]
    fn test_display_matches_as_str() {
        assert_eq!(
            format!("{}", BusinessCategory::HomeAppliance),
            "Home & Appliance"
        );
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&BusinessCategory::HomeAppliance).unwrap();
        assert_eq!(json, "\"Home & Appliance\"");

        let parsed: BusinessCategory = serde_json::from_str("\"Grocery\"").unwrap();
        assert_eq!(parsed, BusinessCategory::Grocery);
    }
}
