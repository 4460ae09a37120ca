use std::sync::Arc;

use vireo_core::{AppError, DeptId};
use vireo_domain::DepartmentStatus;

use crate::test_support::{FakeDepartmentCache, FakeDepartmentRepository, department};
use crate::{DataScopeConfig, DepartmentInput, DepartmentUsage};

use super::{DepartmentListQuery, DepartmentService, ensure_department_deletable};

fn service(
    repository: FakeDepartmentRepository,
) -> (
    DepartmentService,
    Arc<FakeDepartmentRepository>,
    Arc<FakeDepartmentCache>,
) {
    let repository = Arc::new(repository);
    let cache = Arc::new(FakeDepartmentCache::default());
    (
        DepartmentService::new(repository.clone(), cache.clone(), &DataScopeConfig::default()),
        repository,
        cache,
    )
}

fn tree() -> FakeDepartmentRepository {
    FakeDepartmentRepository::with_departments(vec![
        department(1, 0),
        department(2, 1),
        department(3, 2),
    ])
}

fn input(parent: Option<i64>, name: &str) -> DepartmentInput {
    DepartmentInput {
        parent_id: parent.map(DeptId::new),
        name: name.to_owned(),
        code: name.to_uppercase(),
        status: DepartmentStatus::Enabled,
        sort: 0,
    }
}

#[tokio::test]
async fn list_filters_by_keyword() {
    let (service, _, _) = service(tree());
    let departments = service
        .list_departments(DepartmentListQuery {
            keywords: Some("department 2".to_owned()),
            status: None,
        })
        .await;
    let Ok(departments) = departments else {
        panic!("list must succeed");
    };
    assert_eq!(departments.len(), 1);
    assert_eq!(departments[0].id(), DeptId::new(2));
}

#[tokio::test]
async fn create_requires_existing_parent() {
    let (service, _, _) = service(tree());
    let result = service.create_department(input(Some(42), "Sales")).await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn create_invalidates_department_cache() {
    let (service, _, cache) = service(tree());
    let result = service.create_department(input(Some(1), "Sales")).await;
    assert!(matches!(result, Ok(ref department) if department.id() == DeptId::new(4)));
    assert_eq!(*cache.invalidations.lock().await, 1);
}

#[tokio::test]
async fn update_rejects_self_parent() {
    let (service, _, _) = service(tree());
    let result = service
        .update_department(DeptId::new(2), input(Some(2), "Loop"))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn update_rejects_move_below_descendant() {
    let (service, repository, cache) = service(tree());
    let result = service
        .update_department(DeptId::new(1), input(Some(3), "Root"))
        .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(repository.departments.lock().await[0].parent_id(), None);
    assert_eq!(*cache.invalidations.lock().await, 0);
}

#[tokio::test]
async fn update_of_missing_department_is_not_found() {
    let (service, _, _) = service(tree());
    let result = service
        .update_department(DeptId::new(9), input(None, "Ghost"))
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn delete_with_children_is_rejected() {
    let (service, repository, _) = service(tree());
    let result = service.delete_department(DeptId::new(2)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(repository.departments.lock().await.len(), 3);
}

#[tokio::test]
async fn delete_of_referenced_leaf_is_rejected() {
    let repository = tree();
    repository
        .referencing_roles
        .lock()
        .await
        .insert(DeptId::new(3), 1);
    let (service, _, _) = service(repository);
    let result = service.delete_department(DeptId::new(3)).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn delete_of_unused_leaf_succeeds() {
    let (service, repository, cache) = service(tree());
    assert!(service.delete_department(DeptId::new(3)).await.is_ok());
    assert_eq!(repository.departments.lock().await.len(), 2);
    assert_eq!(*cache.invalidations.lock().await, 1);
}

#[test]
fn deletion_guard_reports_member_users() {
    let usage = DepartmentUsage {
        department_id: DeptId::new(5),
        child_departments: 0,
        member_users: 2,
        referencing_roles: 0,
    };
    assert!(matches!(
        ensure_department_deletable(&usage),
        Err(AppError::Conflict(message)) if message.contains("2 users")
    ));
}
