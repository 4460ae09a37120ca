use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vireo_core::{AppError, AppResult, RoleId, UserId};
use vireo_domain::{CustomDepartmentList, DataScope, PermissionCode, Role};

use crate::test_support::{FakePermissionCache, dept_ids, permission};
use crate::{
    AuthorizationRepository, AuthorizationService, DataScopeConfig, RoleDeletionGuard, RoleInput,
    RoleRepository, RoleUsage,
};

use super::{RoleService, ensure_role_deletable};

#[derive(Default)]
struct FakeRoleRepository {
    roles: Mutex<Vec<Role>>,
    role_permissions: Mutex<HashMap<RoleId, BTreeSet<PermissionCode>>>,
    user_roles: Mutex<HashMap<UserId, BTreeSet<RoleId>>>,
}

impl FakeRoleRepository {
    fn build(id: RoleId, input: RoleInput) -> AppResult<Role> {
        Role::new(
            id,
            input.name,
            input.code,
            input.data_scope,
            CustomDepartmentList::from_departments(&input.custom_departments),
        )
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn find_role(&self, role_id: RoleId) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.id() == role_id)
            .cloned())
    }

    async fn create_role(&self, input: RoleInput) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        let id = RoleId::new(i64::try_from(roles.len()).unwrap_or(0) + 1);
        let role = Self::build(id, input)?;
        roles.push(role.clone());
        Ok(role)
    }

    async fn update_role(&self, role_id: RoleId, input: RoleInput) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        let role = Self::build(role_id, input)?;
        for slot in roles.iter_mut().filter(|slot| slot.id() == role_id) {
            *slot = role.clone();
        }
        Ok(role)
    }

    async fn delete_role(&self, role_id: RoleId, guard: &RoleDeletionGuard) -> AppResult<()> {
        let mut roles = self.roles.lock().await;
        if !roles.iter().any(|role| role.id() == role_id) {
            return Err(AppError::NotFound(format!("role '{role_id}' does not exist")));
        }

        let assigned_users = self
            .user_roles
            .lock()
            .await
            .values()
            .filter(|role_ids| role_ids.contains(&role_id))
            .count();
        guard(&RoleUsage {
            role_id,
            assigned_users: u64::try_from(assigned_users).unwrap_or(u64::MAX),
        })?;

        roles.retain(|role| role.id() != role_id);
        self.role_permissions.lock().await.remove(&role_id);
        Ok(())
    }

    async fn list_role_permissions(&self, role_id: RoleId) -> AppResult<BTreeSet<PermissionCode>> {
        Ok(self
            .role_permissions
            .lock()
            .await
            .get(&role_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_role_permissions(
        &self,
        role_id: RoleId,
        permissions: BTreeSet<PermissionCode>,
    ) -> AppResult<()> {
        self.role_permissions
            .lock()
            .await
            .insert(role_id, permissions);
        Ok(())
    }

    async fn replace_user_roles(
        &self,
        user_id: UserId,
        role_ids: BTreeSet<RoleId>,
    ) -> AppResult<()> {
        self.user_roles.lock().await.insert(user_id, role_ids);
        Ok(())
    }
}

struct NoAuthorizationRepository;

#[async_trait]
impl AuthorizationRepository for NoAuthorizationRepository {
    async fn list_role_names_for_user(&self, _user_id: UserId) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn list_permission_codes_for_user(
        &self,
        _user_id: UserId,
    ) -> AppResult<Vec<PermissionCode>> {
        Ok(Vec::new())
    }
}

fn service() -> (RoleService, Arc<FakeRoleRepository>, Arc<FakePermissionCache>) {
    let repository = Arc::new(FakeRoleRepository::default());
    let cache = Arc::new(FakePermissionCache::default());
    let authorization = AuthorizationService::new(
        Arc::new(NoAuthorizationRepository),
        cache.clone(),
        &DataScopeConfig::default(),
    );
    (
        RoleService::new(repository.clone(), authorization),
        repository,
        cache,
    )
}

fn input(name: &str, data_scope: DataScope, custom: &[i64]) -> RoleInput {
    RoleInput {
        name: name.to_owned(),
        code: name.to_uppercase(),
        data_scope,
        custom_departments: dept_ids(custom),
    }
}

#[tokio::test]
async fn custom_departments_are_stored_as_json_array() {
    let (service, _, _) = service();
    let role = service
        .create_role(input("auditor", DataScope::Custom, &[7, 3]))
        .await;
    let Ok(role) = role else {
        panic!("role must be created");
    };
    assert_eq!(role.custom_departments().raw(), "[3,7]");
}

#[tokio::test]
async fn non_custom_scope_clears_department_list() {
    let (service, _, _) = service();
    let role = service
        .create_role(input("manager", DataScope::DeptAndSub, &[3]))
        .await;
    assert!(matches!(role, Ok(ref role) if role.custom_departments().raw() == "[]"));
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let (service, _, _) = service();
    assert!(
        service
            .create_role(input("auditor", DataScope::SelfOnly, &[]))
            .await
            .is_ok()
    );
    let mut duplicate = input("auditor", DataScope::SelfOnly, &[]);
    duplicate.code = "OTHER".to_owned();
    let result = service.create_role(duplicate).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn update_may_keep_its_own_name() {
    let (service, _, _) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::SelfOnly, &[]))
        .await
    else {
        panic!("role must be created");
    };
    let updated = service
        .update_role(role.id(), input("auditor", DataScope::DeptOnly, &[]))
        .await;
    assert!(matches!(updated, Ok(ref role) if role.data_scope() == DataScope::DeptOnly));
}

#[tokio::test]
async fn permission_replacement_invalidates_every_cached_user() {
    let (service, repository, cache) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::SelfOnly, &[]))
        .await
    else {
        panic!("role must be created");
    };

    let codes = BTreeSet::from([permission("sys:config:list")]);
    assert!(
        service
            .replace_role_permissions(role.id(), codes.clone())
            .await
            .is_ok()
    );
    assert_eq!(
        repository.role_permissions.lock().await.get(&role.id()),
        Some(&codes)
    );
    assert_eq!(*cache.full_invalidations.lock().await, 1);
}

#[tokio::test]
async fn assigning_no_roles_is_rejected() {
    let (service, _, _) = service();
    let result = service.assign_roles(UserId::new(3), BTreeSet::new()).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn assigning_unknown_role_is_not_found() {
    let (service, _, _) = service();
    let result = service
        .assign_roles(UserId::new(3), BTreeSet::from([RoleId::new(99)]))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn assignment_invalidates_the_user_entry() {
    let (service, repository, cache) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::SelfOnly, &[]))
        .await
    else {
        panic!("role must be created");
    };

    let user_id = UserId::new(3);
    assert!(
        service
            .assign_roles(user_id, BTreeSet::from([role.id()]))
            .await
            .is_ok()
    );
    assert!(repository.user_roles.lock().await.contains_key(&user_id));
    assert_eq!(*cache.invalidated_users.lock().await, vec![user_id]);
}

#[tokio::test]
async fn role_detail_and_grants_are_readable() {
    let (service, _, _) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::Custom, &[3]))
        .await
    else {
        panic!("role must be created");
    };

    let Ok(found) = service.get_role(role.id()).await else {
        panic!("role must be found");
    };
    assert_eq!(found.name(), "auditor");
    assert!(matches!(
        service.list_role_permissions(role.id()).await,
        Ok(ref codes) if codes.is_empty()
    ));

    let codes = BTreeSet::from([permission("sys:config:list"), permission("sys:config:add")]);
    assert!(
        service
            .replace_role_permissions(role.id(), codes.clone())
            .await
            .is_ok()
    );
    assert!(matches!(
        service.list_role_permissions(role.id()).await,
        Ok(ref listed) if *listed == codes
    ));
}

#[tokio::test]
async fn unknown_role_detail_is_not_found() {
    let (service, _, _) = service();
    assert!(matches!(
        service.get_role(RoleId::new(42)).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.list_role_permissions(RoleId::new(42)).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        service.delete_role(RoleId::new(42)).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn assigned_role_cannot_be_deleted() {
    let (service, repository, cache) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::SelfOnly, &[]))
        .await
    else {
        panic!("role must be created");
    };
    assert!(
        service
            .assign_roles(UserId::new(3), BTreeSet::from([role.id()]))
            .await
            .is_ok()
    );

    let blocked = service.delete_role(role.id()).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));
    assert_eq!(repository.roles.lock().await.len(), 1);
    assert_eq!(*cache.full_invalidations.lock().await, 0);
}

#[tokio::test]
async fn unassigned_role_is_deleted_with_its_grants() {
    let (service, repository, cache) = service();
    let Ok(role) = service
        .create_role(input("auditor", DataScope::SelfOnly, &[]))
        .await
    else {
        panic!("role must be created");
    };
    assert!(
        service
            .replace_role_permissions(role.id(), BTreeSet::from([permission("sys:config:list")]))
            .await
            .is_ok()
    );

    assert!(service.delete_role(role.id()).await.is_ok());
    assert!(repository.roles.lock().await.is_empty());
    assert!(repository.role_permissions.lock().await.is_empty());
    assert_eq!(*cache.full_invalidations.lock().await, 2);
}

#[test]
fn deletion_guard_reports_assigned_users() {
    let usage = RoleUsage {
        role_id: RoleId::new(4),
        assigned_users: 2,
    };
    let Err(AppError::Conflict(message)) = ensure_role_deletable(&usage) else {
        panic!("assigned role must be refused");
    };
    assert!(message.contains("2 users"));
    assert!(
        ensure_role_deletable(&RoleUsage {
            role_id: RoleId::new(4),
            assigned_users: 0,
        })
        .is_ok()
    );
}
