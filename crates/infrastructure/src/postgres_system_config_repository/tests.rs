use vireo_application::{
    RowFilter, SystemConfigInput, SystemConfigPageQuery, SystemConfigRepository,
};
use vireo_core::{DeptId, UserId};
use vireo_domain::RowOwnership;

use super::PostgresSystemConfigRepository;
use crate::test_database::{test_pool, unique_suffix};

fn input(key: String, name: &str) -> SystemConfigInput {
    SystemConfigInput {
        key,
        name: name.to_owned(),
        value: "on".to_owned(),
        remark: None,
    }
}

#[tokio::test]
async fn row_filter_limits_reads_updates_and_deletes() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let repository = PostgresSystemConfigRepository::new(pool);
    let suffix = unique_suffix();
    let keyword = format!("scoped {suffix}");

    let owner = UserId::new(900_001);
    let Ok(own) = repository
        .create_config(
            input(format!("own.{suffix}"), &keyword),
            RowOwnership::new(owner, Some(DeptId::new(3))),
        )
        .await
    else {
        panic!("own config must be created");
    };
    let Ok(foreign) = repository
        .create_config(
            input(format!("foreign.{suffix}"), &keyword),
            RowOwnership::new(UserId::new(900_002), Some(DeptId::new(8))),
        )
        .await
    else {
        panic!("foreign config must be created");
    };

    let query = SystemConfigPageQuery {
        keywords: Some(keyword.clone()),
        limit: 10,
        offset: 0,
    };
    let owner_filter = RowFilter::Owner(owner);
    let Ok(page) = repository.page_configs(query.clone(), &owner_filter).await else {
        panic!("page must load");
    };
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id(), own.id());

    let departments = RowFilter::Departments([DeptId::new(3), DeptId::new(8)].into());
    assert!(matches!(
        repository.page_configs(query.clone(), &departments).await,
        Ok(ref page) if page.total == 2
    ));
    assert!(matches!(
        repository.page_configs(query, &RowFilter::DenyAll).await,
        Ok(ref page) if page.total == 0
    ));

    assert!(matches!(
        repository.find_config(foreign.id(), &owner_filter).await,
        Ok(None)
    ));
    assert!(matches!(
        repository
            .update_config(foreign.id(), input(format!("renamed.{suffix}"), "x"), &owner_filter)
            .await,
        Ok(None)
    ));
    assert!(matches!(
        repository.delete_config(foreign.id(), &owner_filter).await,
        Ok(false)
    ));
    assert!(matches!(
        repository.delete_config(foreign.id(), &RowFilter::Unrestricted).await,
        Ok(true)
    ));
}
