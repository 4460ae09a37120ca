use vireo_application::{DepartmentInput, DepartmentRepository, ensure_department_deletable};
use vireo_core::AppError;
use vireo_domain::DepartmentStatus;

use super::PostgresDepartmentRepository;
use crate::test_database::{insert_user, test_pool, unique_suffix};

fn input(parent: Option<vireo_core::DeptId>, name: String) -> DepartmentInput {
    DepartmentInput {
        parent_id: parent,
        name,
        code: "TEST".to_owned(),
        status: DepartmentStatus::Enabled,
        sort: 0,
    }
}

#[tokio::test]
async fn delete_is_blocked_while_references_remain() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresDepartmentRepository::new(pool.clone());
    let suffix = unique_suffix();

    let Ok(parent) = repository
        .create_department(input(None, format!("Parent {suffix}")))
        .await
    else {
        panic!("parent must be created");
    };
    let Ok(child) = repository
        .create_department(input(Some(parent.id()), format!("Child {suffix}")))
        .await
    else {
        panic!("child must be created");
    };
    assert_eq!(child.parent_id(), Some(parent.id()));

    let blocked = repository
        .delete_department(parent.id(), &ensure_department_deletable)
        .await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    insert_user(&pool, &format!("member-{suffix}"), Some(child.id().as_i64())).await;
    let blocked = repository
        .delete_department(child.id(), &ensure_department_deletable)
        .await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let cleared = sqlx::query("UPDATE users SET dept_id = NULL WHERE dept_id = $1")
        .bind(child.id().as_i64())
        .execute(&pool)
        .await;
    assert!(cleared.is_ok());

    assert!(
        repository
            .delete_department(child.id(), &ensure_department_deletable)
            .await
            .is_ok()
    );
    assert!(matches!(
        repository.find_department(child.id()).await,
        Ok(None)
    ));
}

#[tokio::test]
async fn update_of_missing_department_is_not_found() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresDepartmentRepository::new(pool);

    let result = repository
        .update_department(
            vireo_core::DeptId::new(i64::MAX),
            input(None, "Ghost".to_owned()),
        )
        .await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn writes_under_a_missing_parent_are_rejected() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresDepartmentRepository::new(pool);
    let suffix = unique_suffix();
    let missing_parent = vireo_core::DeptId::new(i64::MAX);

    let created = repository
        .create_department(input(Some(missing_parent), format!("Orphan {suffix}")))
        .await;
    assert!(matches!(created, Err(AppError::Validation(_))));

    let Ok(department) = repository
        .create_department(input(None, format!("Root {suffix}")))
        .await
    else {
        panic!("root must be created");
    };
    let moved = repository
        .update_department(
            department.id(),
            input(Some(missing_parent), format!("Root {suffix}")),
        )
        .await;
    assert!(matches!(moved, Err(AppError::Validation(_))));

    let Ok(Some(unchanged)) = repository.find_department(department.id()).await else {
        panic!("department must remain");
    };
    assert_eq!(unchanged.parent_id(), None);

    assert!(
        repository
            .delete_department(department.id(), &ensure_department_deletable)
            .await
            .is_ok()
    );
}
