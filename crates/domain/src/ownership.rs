use vireo_core::{DeptId, UserId};

use crate::Principal;

/// Owner columns carried by every data-scoped row.
///
/// Stamped once at creation from the creating principal. The data-scope layer
/// only filters on these values and never rewrites them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowOwnership {
    creator_id: UserId,
    dept_id: Option<DeptId>,
}

impl RowOwnership {
    /// Rebuilds ownership from stored columns.
    #[must_use]
    pub fn new(creator_id: UserId, dept_id: Option<DeptId>) -> Self {
        Self {
            creator_id,
            dept_id,
        }
    }

    /// Ownership for a row created by `principal`.
    #[must_use]
    pub fn stamped_by(principal: &Principal) -> Self {
        Self {
            creator_id: principal.user_id(),
            dept_id: principal.home_department(),
        }
    }

    /// Returns the creating user.
    #[must_use]
    pub fn creator_id(&self) -> UserId {
        self.creator_id
    }

    /// Returns the owning department, `None` when the creator had none.
    #[must_use]
    pub fn dept_id(&self) -> Option<DeptId> {
        self.dept_id
    }
}
