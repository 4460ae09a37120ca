use std::collections::BTreeSet;

use vireo_core::{AppResult, DeptId, NonEmptyString, RoleId};

use crate::{DataScope, DataScopeError};

/// Role-attached custom department list in its stored encoding.
///
/// Current rows hold a JSON array (`[3,7]`). Older rows may hold a
/// comma-separated string (`"3,7"`) or a single bare number (`5`); all three
/// decode to the same ordered set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomDepartmentList(String);

impl CustomDepartmentList {
    /// Wraps a raw stored value.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Encodes a department set in the current JSON-array form.
    #[must_use]
    pub fn from_departments(departments: &BTreeSet<DeptId>) -> Self {
        let ids: Vec<i64> = departments.iter().map(DeptId::as_i64).collect();
        Self(serde_json::Value::from(ids).to_string())
    }

    /// Returns the raw stored value.
    #[must_use]
    pub fn raw(&self) -> &str {
        self.0.as_str()
    }

    /// Decodes the list into an ordered department set.
    ///
    /// Non-positive identifiers are dropped. Blank content decodes to an
    /// empty set.
    pub fn parse(&self) -> Result<BTreeSet<DeptId>, DataScopeError> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return Ok(BTreeSet::new());
        }

        if trimmed.contains(',') {
            return Ok(trimmed
                .trim_matches(|character: char| matches!(character, '[' | ']' | '"' | ' '))
                .split(',')
                .filter_map(|part| part.trim().trim_matches('"').parse::<i64>().ok())
                .filter_map(positive_department)
                .collect());
        }

        if let Ok(ids) = serde_json::from_str::<Vec<i64>>(trimmed) {
            return Ok(ids.into_iter().filter_map(positive_department).collect());
        }

        trimmed
            .trim_matches('"')
            .parse::<i64>()
            .map(|id| positive_department(id).into_iter().collect())
            .map_err(|_| DataScopeError::InvalidCustomDeptEncoding {
                raw: self.0.clone(),
            })
    }
}

fn positive_department(id: i64) -> Option<DeptId> {
    (id > 0).then_some(DeptId::new(id))
}

/// Role attached to principals, carrying a row-level data scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    id: RoleId,
    name: NonEmptyString,
    code: NonEmptyString,
    data_scope: DataScope,
    custom_departments: CustomDepartmentList,
}

impl Role {
    /// Creates a role with validated name and code.
    pub fn new(
        id: RoleId,
        name: impl Into<String>,
        code: impl Into<String>,
        data_scope: DataScope,
        custom_departments: CustomDepartmentList,
    ) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::new(name)?,
            code: NonEmptyString::new(code)?,
            data_scope,
            custom_departments,
        })
    }

    /// Returns the role identifier.
    #[must_use]
    pub fn id(&self) -> RoleId {
        self.id
    }

    /// Returns the unique role name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the unique role code.
    #[must_use]
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Returns the declared data scope.
    #[must_use]
    pub fn data_scope(&self) -> DataScope {
        self.data_scope
    }

    /// Returns the stored custom department list.
    #[must_use]
    pub fn custom_departments(&self) -> &CustomDepartmentList {
        &self.custom_departments
    }
}
