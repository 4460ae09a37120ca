use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from a storage value without validation.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Creates an identifier from a transport value, rejecting non-positive values.
            pub fn parse_positive(value: i64) -> AppResult<Self> {
                if value <= 0 {
                    return Err(AppError::Validation(format!(
                        "{} must be a positive integer, got {value}",
                        $label
                    )));
                }

                Ok(Self(value))
            }

            /// Returns the underlying storage value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a user account.
    UserId,
    "user id"
);

numeric_id!(
    /// Identifier of an organisational department.
    DeptId,
    "department id"
);

numeric_id!(
    /// Identifier of a role.
    RoleId,
    "role id"
);

impl DeptId {
    /// Maps a stored parent reference to an optional department.
    ///
    /// Storage uses `0` (or any non-positive value) for "no parent".
    #[must_use]
    pub fn from_parent_column(value: i64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{DeptId, UserId};

    #[test]
    fn parse_positive_rejects_zero() {
        assert!(UserId::parse_positive(0).is_err());
        assert!(UserId::parse_positive(-4).is_err());
        assert_eq!(UserId::parse_positive(9).ok(), Some(UserId::new(9)));
    }

    #[test]
    fn zero_parent_column_means_root() {
        assert_eq!(DeptId::from_parent_column(0), None);
        assert_eq!(DeptId::from_parent_column(3), Some(DeptId::new(3)));
    }
}
