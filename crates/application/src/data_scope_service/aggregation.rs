use std::collections::BTreeSet;

use vireo_core::DeptId;
use vireo_domain::{
    DataScope, DataScopeError, DepartmentHierarchy, Principal, Role, ScopeResolution,
};

/// Folds all roles of a principal into one resolution.
///
/// The label is the most permissive declared scope. Departments are the
/// union of every role's contribution, so a lower-ranked role still adds its
/// departments.
pub(super) fn aggregate(
    principal: &Principal,
    hierarchy: Option<&DepartmentHierarchy>,
) -> Result<ScopeResolution, DataScopeError> {
    let roles = principal.roles();
    if roles.is_empty() {
        return Err(DataScopeError::NoRoleAssigned {
            user_id: principal.user_id(),
        });
    }

    if roles.iter().any(|role| role.data_scope() == DataScope::All) {
        return Ok(ScopeResolution::unrestricted());
    }

    let mut effective_scope = DataScope::SelfOnly;
    let mut departments = BTreeSet::new();
    for role in roles {
        effective_scope = effective_scope.max(role.data_scope());
        departments.extend(contribution(principal, role, hierarchy));
    }

    Ok(ScopeResolution::restricted(effective_scope, departments))
}

fn contribution(
    principal: &Principal,
    role: &Role,
    hierarchy: Option<&DepartmentHierarchy>,
) -> BTreeSet<DeptId> {
    match role.data_scope() {
        DataScope::All | DataScope::SelfOnly => BTreeSet::new(),
        DataScope::DeptOnly => principal.home_department().into_iter().collect(),
        DataScope::DeptAndSub => {
            let (Some(home), Some(hierarchy)) = (principal.home_department(), hierarchy) else {
                return BTreeSet::new();
            };
            home_and_descendants(principal, home, hierarchy)
        }
        DataScope::Custom => match role.custom_departments().parse() {
            Ok(departments) => departments,
            Err(error) => {
                tracing::warn!(
                    user_id = %principal.user_id(),
                    role_id = %role.id(),
                    error = %error,
                    "ignoring custom department list"
                );
                BTreeSet::new()
            }
        },
    }
}

fn home_and_descendants(
    principal: &Principal,
    home: DeptId,
    hierarchy: &DepartmentHierarchy,
) -> BTreeSet<DeptId> {
    match hierarchy.descendants(home) {
        Ok(walk) => match walk.corruption() {
            None => walk.into_departments(),
            Some(corruption) => {
                tracing::warn!(
                    user_id = %principal.user_id(),
                    department_id = %home,
                    error = %corruption.into_error(home),
                    "department hierarchy corrupt, scope limited to home department"
                );
                BTreeSet::from([home])
            }
        },
        Err(error) => {
            tracing::warn!(
                user_id = %principal.user_id(),
                department_id = %home,
                error = %error,
                "home department missing from hierarchy"
            );
            BTreeSet::new()
        }
    }
}
