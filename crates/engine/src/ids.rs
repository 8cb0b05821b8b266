//! Strict identifiers for users and expenses.
//!
//! Ids often reach the engine as strings (path segments, CLI flags). They are
//! parsed here, once, into positive integers so that nothing downstream ever
//! sees a malformed id.

use core::fmt;
use std::str::FromStr;

use crate::{EngineError, ResultEngine};

fn parse_positive(value: &str, label: &str) -> ResultEngine<i64> {
    let trimmed = value.trim();
    let parsed: i64 = trimmed
        .parse()
        .map_err(|_| EngineError::InvalidIdentifier(format!("{label} id '{trimmed}'")))?;
    if parsed <= 0 {
        return Err(EngineError::InvalidIdentifier(format!(
            "{label} id must be > 0, got {parsed}"
        )));
    }
    Ok(parsed)
}

macro_rules! impl_id {
    ($name:ident, $label:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw id, rejecting values that are not positive.
            pub fn new(value: i64) -> ResultEngine<Self> {
                if value <= 0 {
                    return Err(EngineError::InvalidIdentifier(format!(
                        concat!($label, " id must be > 0, got {}"),
                        value
                    )));
                }
                Ok(Self(value))
            }

            /// Returns the raw id as stored in the database.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl FromStr for $name {
            type Err = EngineError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                parse_positive(s, $label).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

impl_id!(UserId, "user");
impl_id!(ExpenseId, "expense");
