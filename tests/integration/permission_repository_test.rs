//! MySQL permission repository against a real database
//!
//! Requires TEST_DATABASE_URL pointing at a disposable schema.
//! Run with: cargo test --test permission_repository_test -- --ignored --test-threads=1

#[path = "../helpers/mod.rs"]
mod helpers;

use std::sync::Arc;

use campus_admin::core::{AppError, Repository};
use campus_admin::permissions::{
    MySqlPermissionRepository, PermissionRepository, PermissionService, PermissionStatus,
};
use helpers::*;

#[tokio::test]
#[ignore]
async fn test_save_find_and_update_round_trip() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool);

    let saved = repo
        .save(permission("user:view", "查看用户", Some("用户管理"), PermissionStatus::Enabled))
        .await
        .unwrap();
    let id = saved.id.expect("insert assigns an id");

    let mut found = repo.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(found.permission_code, "user:view");
    assert_eq!(found.status, PermissionStatus::Enabled);

    found.status = PermissionStatus::Disabled;
    repo.save(found).await.unwrap();

    let reloaded = repo.find_by_code("user:view").await.unwrap().unwrap();
    assert_eq!(reloaded.status, PermissionStatus::Disabled);
    assert!(repo.exists_by_code("user:view").await.unwrap());
    assert!(!repo.exists_by_code("user:none").await.unwrap());
}

#[tokio::test]
#[ignore]
async fn test_update_of_missing_row_is_not_found() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool);

    let mut ghost = permission("ghost", "Ghost", None, PermissionStatus::Enabled);
    ghost.id = Some(987_654);

    assert!(matches!(repo.save(ghost).await, Err(AppError::NotFound(_))));
}

#[tokio::test]
#[ignore]
async fn test_duplicate_code_maps_to_conflict() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool);

    repo.save(permission("dup", "First", None, PermissionStatus::Enabled))
        .await
        .unwrap();
    let err = repo
        .save(permission("dup", "Second", None, PermissionStatus::Enabled))
        .await
        .unwrap_err();

    assert!(err.is_unique_violation());
}

#[tokio::test]
#[ignore]
async fn test_role_and_user_joins() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool.clone());

    let view = repo
        .save(permission("user:view", "查看用户", None, PermissionStatus::Enabled))
        .await
        .unwrap();
    let edit = repo
        .save(permission("user:edit", "编辑用户", None, PermissionStatus::Enabled))
        .await
        .unwrap();

    grant(&pool, 1, view.id.unwrap()).await;
    grant(&pool, 1, edit.id.unwrap()).await;
    grant(&pool, 2, view.id.unwrap()).await;
    assign_role(&pool, 50, 1).await;
    assign_role(&pool, 50, 2).await;

    assert_eq!(repo.find_by_role(1).await.unwrap().len(), 2);

    // Granted through both roles, listed once
    let user = repo.find_by_user(50).await.unwrap();
    let codes: Vec<&str> = user.iter().map(|p| p.permission_code.as_str()).collect();
    assert_eq!(codes, vec!["user:edit", "user:view"]);
}

#[tokio::test]
#[ignore]
async fn test_delete_removes_role_grants() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool.clone());

    let saved = repo
        .save(permission("user:view", "查看用户", None, PermissionStatus::Enabled))
        .await
        .unwrap();
    let id = saved.id.unwrap();
    grant(&pool, 1, id).await;

    assert!(repo.delete_by_id(id).await.unwrap());
    assert!(!repo.delete_by_id(id).await.unwrap());

    assert!(repo.find_by_id(id).await.unwrap().is_none());
    let grants: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM tb_role_permission WHERE permission_id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(grants, 0);
}

#[tokio::test]
#[ignore]
async fn test_grouping_paging_and_search() {
    let pool = clean_test_pool().await;
    let repo = MySqlPermissionRepository::new(pool);

    for (code, name, resource_type) in [
        ("course:add", "新增课程", Some("课程管理")),
        ("course:view", "查看课程", Some("课程管理")),
        ("user:view", "查看用户", Some("用户管理")),
        ("misc", "杂项", None),
    ] {
        repo.save(permission(code, name, resource_type, PermissionStatus::Enabled))
            .await
            .unwrap();
    }

    let counts = repo.count_group_by_resource_type().await.unwrap();
    assert_eq!(counts.len(), 3);
    assert_eq!(counts[0].resource_type, None);

    let page = repo.find_page(Some("查看"), 1, 1).await.unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].permission_code, "user:view");
    assert_eq!(repo.count_matching(Some("查看")).await.unwrap(), 2);
    assert_eq!(repo.count_matching(None).await.unwrap(), 4);

    assert_eq!(repo.find_by_name_containing("课程").await.unwrap().len(), 2);
    assert_eq!(repo.find_by_resource_type("课程管理").await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_service_create_conflict_over_mysql() {
    let pool = clean_test_pool().await;
    let service = PermissionService::new(Arc::new(MySqlPermissionRepository::new(pool)));

    service
        .create(draft("fee:view", "查看收费", Some("财务管理")))
        .await
        .unwrap();
    let err = service
        .create(draft("fee:view", "查看收费", Some("财务管理")))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
}
