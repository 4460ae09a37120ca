use vireo_core::{AppResult, NonEmptyString};

use crate::RowOwnership;

/// Key/value system setting, visible according to row-level data scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemConfig {
    id: i64,
    key: NonEmptyString,
    name: String,
    value: String,
    remark: Option<String>,
    ownership: RowOwnership,
}

impl SystemConfig {
    /// Creates a config row with a validated key.
    pub fn new(
        id: i64,
        key: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
        remark: Option<String>,
        ownership: RowOwnership,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            key: NonEmptyString::new(key)?,
            name: name.into(),
            value: value.into(),
            remark,
            ownership,
        })
    }

    /// Returns the row identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the unique lookup key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the stored value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the optional remark.
    #[must_use]
    pub fn remark(&self) -> Option<&str> {
        self.remark.as_deref()
    }

    /// Returns the owner columns.
    #[must_use]
    pub fn ownership(&self) -> RowOwnership {
        self.ownership
    }
}
