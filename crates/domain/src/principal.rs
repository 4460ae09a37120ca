use vireo_core::{DeptId, UserId};

use crate::Role;

/// Authenticated actor of one request, with roles loaded.
///
/// Built fresh for every request from storage; never cached across requests
/// so role or department changes apply on the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    user_id: UserId,
    username: String,
    home_department: Option<DeptId>,
    roles: Vec<Role>,
}

impl Principal {
    /// Creates a principal.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        home_department: Option<DeptId>,
        roles: Vec<Role>,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            home_department,
            roles,
        }
    }

    /// Returns the account identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the department the user belongs to.
    #[must_use]
    pub fn home_department(&self) -> Option<DeptId> {
        self.home_department
    }

    /// Returns the attached roles.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns whether any attached role carries the given name.
    #[must_use]
    pub fn has_role_named(&self, role_name: &str) -> bool {
        self.roles.iter().any(|role| role.name() == role_name)
    }
}
