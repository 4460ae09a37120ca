//! Row-level data scope primitives.
//!
//! A role declares one [`DataScope`]; a principal's roles are folded into a
//! single [`ScopeResolution`] per request, which the query scope filter turns
//! into a row predicate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vireo_core::{AppError, AppResult, DeptId, UserId};

/// Row access policy declared by a role.
///
/// Variants are declared from most restrictive to most permissive so the
/// derived ordering doubles as the aggregation rank: `max()` picks the most
/// permissive scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataScope {
    /// Only rows created by the principal.
    SelfOnly,
    /// Rows owned by an explicit, role-attached department list.
    Custom,
    /// Rows owned by the principal's home department.
    DeptOnly,
    /// Rows owned by the home department or any descendant department.
    DeptAndSub,
    /// Every row.
    All,
}

impl DataScope {
    /// Returns the stable storage code.
    #[must_use]
    pub fn code(self) -> i32 {
        match self {
            Self::All => 1,
            Self::DeptAndSub => 2,
            Self::DeptOnly => 3,
            Self::SelfOnly => 4,
            Self::Custom => 5,
        }
    }

    /// Decodes a stored value, failing closed to [`DataScope::SelfOnly`].
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self::try_from_code(code).unwrap_or(Self::SelfOnly)
    }

    /// Decodes an administrator-supplied value, rejecting unknown codes.
    pub fn try_from_code(code: i32) -> AppResult<Self> {
        match code {
            1 => Ok(Self::All),
            2 => Ok(Self::DeptAndSub),
            3 => Ok(Self::DeptOnly),
            4 => Ok(Self::SelfOnly),
            5 => Ok(Self::Custom),
            _ => Err(AppError::Validation(format!(
                "unknown data scope code '{code}'"
            ))),
        }
    }

    /// Returns a stable label used in logs and transport payloads.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::DeptAndSub => "dept_and_sub",
            Self::DeptOnly => "dept_only",
            Self::Custom => "custom",
            Self::SelfOnly => "self_only",
        }
    }
}

/// Concrete department set a principal may read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermittedDepartments {
    /// No department restriction; the set is never materialised.
    All,
    /// Explicit set. Empty means owner-only filtering.
    Listed(BTreeSet<DeptId>),
}

impl PermittedDepartments {
    /// Returns whether the department is readable.
    #[must_use]
    pub fn contains(&self, department: DeptId) -> bool {
        match self {
            Self::All => true,
            Self::Listed(departments) => departments.contains(&department),
        }
    }

    /// Returns whether only the principal's own rows remain visible.
    #[must_use]
    pub fn is_owner_only(&self) -> bool {
        matches!(self, Self::Listed(departments) if departments.is_empty())
    }

    /// Returns the listed departments, `None` for [`PermittedDepartments::All`].
    #[must_use]
    pub fn listed(&self) -> Option<&BTreeSet<DeptId>> {
        match self {
            Self::All => None,
            Self::Listed(departments) => Some(departments),
        }
    }
}

/// Effective data scope of one principal for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeResolution {
    effective_scope: DataScope,
    departments: PermittedDepartments,
}

impl ScopeResolution {
    /// Unrestricted resolution.
    #[must_use]
    pub fn unrestricted() -> Self {
        Self {
            effective_scope: DataScope::All,
            departments: PermittedDepartments::All,
        }
    }

    /// Owner-only resolution.
    #[must_use]
    pub fn owner_only() -> Self {
        Self {
            effective_scope: DataScope::SelfOnly,
            departments: PermittedDepartments::Listed(BTreeSet::new()),
        }
    }

    /// Resolution restricted to departments.
    ///
    /// An empty set collapses to [`ScopeResolution::owner_only`], as does an
    /// `All` label paired with a listed set.
    #[must_use]
    pub fn restricted(effective_scope: DataScope, departments: BTreeSet<DeptId>) -> Self {
        if departments.is_empty() || effective_scope == DataScope::All {
            return Self::owner_only();
        }

        Self {
            effective_scope,
            departments: PermittedDepartments::Listed(departments),
        }
    }

    /// Returns the aggregated scope label.
    #[must_use]
    pub fn effective_scope(&self) -> DataScope {
        self.effective_scope
    }

    /// Returns the permitted department set.
    #[must_use]
    pub fn departments(&self) -> &PermittedDepartments {
        &self.departments
    }
}

/// Failures of the data-scope and RBAC layers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataScopeError {
    /// The request carries no authenticated principal.
    #[error("no authenticated principal in request")]
    NoPrincipal,

    /// The principal carries no role, so no scope can be determined.
    #[error("user '{user_id}' has no role assigned")]
    NoRoleAssigned {
        /// Principal without roles.
        user_id: UserId,
    },

    /// The department tree is cyclic or deeper than the configured limit.
    #[error("department hierarchy below '{department}' is corrupt: {detail}")]
    CorruptHierarchy {
        /// Department the traversal started from.
        department: DeptId,
        /// Human-readable description of the defect.
        detail: String,
    },

    /// The department is unknown to the hierarchy index.
    #[error("department '{0}' does not exist")]
    DepartmentNotFound(DeptId),

    /// The principal lacks required permission codes.
    #[error("user '{user_id}' is missing permissions {missing:?}")]
    PermissionDenied {
        /// Principal that was denied.
        user_id: UserId,
        /// Required codes the principal does not hold.
        missing: Vec<String>,
    },

    /// A custom department list could not be decoded.
    #[error("invalid custom department encoding '{raw}'")]
    InvalidCustomDeptEncoding {
        /// Raw stored value.
        raw: String,
    },

    /// The principal could not be loaded from storage.
    #[error("principal could not be loaded: {0}")]
    PrincipalUnavailable(String),
}

impl From<DataScopeError> for AppError {
    fn from(value: DataScopeError) -> Self {
        let message = value.to_string();
        match value {
            DataScopeError::NoPrincipal => AppError::Unauthorized(message),
            DataScopeError::NoRoleAssigned { .. } | DataScopeError::PermissionDenied { .. } => {
                AppError::Forbidden(message)
            }
            DataScopeError::InvalidCustomDeptEncoding { .. } => AppError::Validation(message),
            DataScopeError::DepartmentNotFound(_) => AppError::NotFound(message),
            DataScopeError::CorruptHierarchy { .. } | DataScopeError::PrincipalUnavailable(_) => {
                AppError::Internal(message)
            }
        }
    }
}
