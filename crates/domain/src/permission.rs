use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use vireo_core::{AppError, AppResult};

/// Permission code declared by routes and granted to roles, e.g. `sys:dept:add`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionCode(String);

impl PermissionCode {
    /// Creates a validated permission code.
    ///
    /// Codes are non-empty and contain no whitespace.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.is_empty() || value.chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "invalid permission code '{value}'"
            )));
        }

        Ok(Self(value))
    }

    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionCode {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionCode> for String {
    fn from(value: PermissionCode) -> Self {
        value.0
    }
}

impl Display for PermissionCode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::PermissionCode;

    #[test]
    fn whitespace_is_rejected() {
        assert!(PermissionCode::new("sys:dept add").is_err());
        assert!(PermissionCode::new("").is_err());
    }

    #[test]
    fn code_is_kept_verbatim() {
        let code = PermissionCode::new("sys:dept:add");
        assert!(matches!(code, Ok(ref code) if code.as_str() == "sys:dept:add"));
    }
}
