//! Typed identifiers
//!
//! `BookId` and `UserId` can only hold positive integers; every way of building one
//! (`new`, `FromStr`, deserialization) rejects anything else with
//! [`AppError::InvalidIdentifier`], so engines never reach storage with a bad id.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

macro_rules! positive_id {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
            sqlx::Type, ToSchema,
        )]
        #[serde(try_from = "i64", into = "i64")]
        #[sqlx(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> AppResult<Self> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(AppError::InvalidIdentifier(format!(
                        "{} must be a positive integer, got {}",
                        $label, value
                    )))
                }
            }

            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl TryFrom<i64> for $name {
            type Error = AppError;

            fn try_from(value: i64) -> AppResult<Self> {
                Self::new(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(raw: &str) -> AppResult<Self> {
                let value = raw.trim().parse::<i64>().map_err(|_| {
                    AppError::InvalidIdentifier(format!("{} {:?} is not a number", $label, raw))
                })?;
                Self::new(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(BookId, "book id");
positive_id!(UserId, "user id");

/// Storage-assigned loan identifier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type,
    ToSchema,
)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct LoanId(i64);

impl LoanId {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive() {
        assert!(matches!(BookId::new(0), Err(AppError::InvalidIdentifier(_))));
        assert!(matches!(UserId::new(-3), Err(AppError::InvalidIdentifier(_))));
        assert_eq!(BookId::new(7).unwrap().get(), 7);
    }

    #[test]
    fn test_parse_from_text() {
        assert_eq!(" 12 ".parse::<BookId>().unwrap().get(), 12);
        assert!(matches!("abc".parse::<UserId>(), Err(AppError::InvalidIdentifier(_))));
        assert!(matches!("1.5".parse::<BookId>(), Err(AppError::InvalidIdentifier(_))));
        assert!(matches!("NaN".parse::<BookId>(), Err(AppError::InvalidIdentifier(_))));
        assert!(matches!("-1".parse::<BookId>(), Err(AppError::InvalidIdentifier(_))));
        assert!(matches!(
            "99999999999999999999".parse::<BookId>(),
            Err(AppError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let id: UserId = serde_json::from_str("4").unwrap();
        assert_eq!(id.get(), 4);
        assert!(serde_json::from_str::<UserId>("0").is_err());
    }
}
