//! In-memory fakes and fixtures shared by service tests.

use std::collections::{BTreeSet, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vireo_core::{AppError, AppResult, DeptId, RoleId, UserId};
use vireo_domain::{
    CustomDepartmentList, DataScope, Department, DepartmentStatus, PermissionCode, Principal, Role,
};

use crate::{
    DepartmentDeletionGuard, DepartmentInput, DepartmentListCache, DepartmentRepository,
    DepartmentUsage, PermissionCache, PrincipalRepository,
};

pub(crate) fn department(id: i64, parent: i64) -> Department {
    match Department::new(
        DeptId::new(id),
        DeptId::from_parent_column(parent),
        format!("Department {id}"),
        format!("D{id}"),
        DepartmentStatus::Enabled,
        0,
    ) {
        Ok(department) => department,
        Err(error) => panic!("invalid test department: {error}"),
    }
}

pub(crate) fn role(id: i64, name: &str, data_scope: DataScope, custom: &str) -> Role {
    match Role::new(
        RoleId::new(id),
        name,
        name.to_uppercase(),
        data_scope,
        CustomDepartmentList::from_raw(custom),
    ) {
        Ok(role) => role,
        Err(error) => panic!("invalid test role: {error}"),
    }
}

pub(crate) fn principal(user_id: i64, home: Option<i64>, roles: Vec<Role>) -> Principal {
    Principal::new(
        UserId::new(user_id),
        format!("user{user_id}"),
        home.map(DeptId::new),
        roles,
    )
}

pub(crate) fn dept_ids(values: &[i64]) -> BTreeSet<DeptId> {
    values.iter().copied().map(DeptId::new).collect()
}

pub(crate) fn permission(code: &str) -> PermissionCode {
    match PermissionCode::try_from(code.to_owned()) {
        Ok(code) => code,
        Err(error) => panic!("invalid test permission: {error}"),
    }
}

#[derive(Default)]
pub(crate) struct FakeDepartmentRepository {
    pub(crate) departments: Mutex<Vec<Department>>,
    pub(crate) member_users: Mutex<HashMap<DeptId, u64>>,
    pub(crate) referencing_roles: Mutex<HashMap<DeptId, u64>>,
    pub(crate) list_calls: Mutex<usize>,
}

impl FakeDepartmentRepository {
    pub(crate) fn with_departments(departments: Vec<Department>) -> Self {
        Self {
            departments: Mutex::new(departments),
            ..Self::default()
        }
    }
}

#[async_trait]
impl DepartmentRepository for FakeDepartmentRepository {
    async fn list_departments(&self) -> AppResult<Vec<Department>> {
        *self.list_calls.lock().await += 1;
        Ok(self.departments.lock().await.clone())
    }

    async fn find_department(&self, department_id: DeptId) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .await
            .iter()
            .find(|department| department.id() == department_id)
            .cloned())
    }

    async fn create_department(&self, input: DepartmentInput) -> AppResult<Department> {
        let mut departments = self.departments.lock().await;
        let next_id = departments
            .iter()
            .map(|department| department.id().as_i64())
            .max()
            .unwrap_or(0)
            + 1;
        let department = Department::new(
            DeptId::new(next_id),
            input.parent_id,
            input.name,
            input.code,
            input.status,
            input.sort,
        )?;
        departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        department_id: DeptId,
        input: DepartmentInput,
    ) -> AppResult<Department> {
        let mut departments = self.departments.lock().await;
        let Some(slot) = departments
            .iter_mut()
            .find(|department| department.id() == department_id)
        else {
            return Err(AppError::NotFound(format!(
                "department '{department_id}' does not exist"
            )));
        };
        *slot = Department::new(
            department_id,
            input.parent_id,
            input.name,
            input.code,
            input.status,
            input.sort,
        )?;
        Ok(slot.clone())
    }

    async fn delete_department(
        &self,
        department_id: DeptId,
        guard: &DepartmentDeletionGuard,
    ) -> AppResult<()> {
        let mut departments = self.departments.lock().await;
        if !departments
            .iter()
            .any(|department| department.id() == department_id)
        {
            return Err(AppError::NotFound(format!(
                "department '{department_id}' does not exist"
            )));
        }

        let child_departments = departments
            .iter()
            .filter(|department| department.parent_id() == Some(department_id))
            .count();
        let usage = DepartmentUsage {
            department_id,
            child_departments: u64::try_from(child_departments).unwrap_or(u64::MAX),
            member_users: self
                .member_users
                .lock()
                .await
                .get(&department_id)
                .copied()
                .unwrap_or(0),
            referencing_roles: self
                .referencing_roles
                .lock()
                .await
                .get(&department_id)
                .copied()
                .unwrap_or(0),
        };
        guard(&usage)?;

        departments.retain(|department| department.id() != department_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeDepartmentCache {
    pub(crate) departments: Mutex<Option<Vec<Department>>>,
    pub(crate) invalidations: Mutex<usize>,
}

#[async_trait]
impl DepartmentListCache for FakeDepartmentCache {
    async fn get_departments(&self) -> AppResult<Option<Vec<Department>>> {
        Ok(self.departments.lock().await.clone())
    }

    async fn set_departments(&self, departments: Vec<Department>, ttl: Duration) -> AppResult<()> {
        if !ttl.is_zero() {
            *self.departments.lock().await = Some(departments);
        }
        Ok(())
    }

    async fn invalidate_departments(&self) -> AppResult<()> {
        *self.departments.lock().await = None;
        *self.invalidations.lock().await += 1;
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakePrincipalRepository {
    pub(crate) principals: HashMap<UserId, Principal>,
    pub(crate) unavailable: bool,
}

#[async_trait]
impl PrincipalRepository for FakePrincipalRepository {
    async fn find_principal(&self, user_id: UserId) -> AppResult<Option<Principal>> {
        if self.unavailable {
            return Err(AppError::Internal("principal store offline".to_owned()));
        }
        Ok(self.principals.get(&user_id).cloned())
    }
}

#[derive(Default)]
pub(crate) struct FakePermissionCache {
    pub(crate) entries: Mutex<HashMap<UserId, BTreeSet<PermissionCode>>>,
    pub(crate) invalidated_users: Mutex<Vec<UserId>>,
    pub(crate) full_invalidations: Mutex<usize>,
}

#[async_trait]
impl PermissionCache for FakePermissionCache {
    async fn get_permissions(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<BTreeSet<PermissionCode>>> {
        Ok(self.entries.lock().await.get(&user_id).cloned())
    }

    async fn set_permissions(
        &self,
        user_id: UserId,
        permissions: BTreeSet<PermissionCode>,
        ttl: Duration,
    ) -> AppResult<()> {
        if !ttl.is_zero() {
            self.entries.lock().await.insert(user_id, permissions);
        }
        Ok(())
    }

    async fn invalidate_user(&self, user_id: UserId) -> AppResult<()> {
        self.entries.lock().await.remove(&user_id);
        self.invalidated_users.lock().await.push(user_id);
        Ok(())
    }

    async fn invalidate_all(&self) -> AppResult<()> {
        self.entries.lock().await.clear();
        *self.full_invalidations.lock().await += 1;
        Ok(())
    }
}
