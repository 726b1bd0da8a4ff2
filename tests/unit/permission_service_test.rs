//! Permission service behaviour against the in-memory repository
//!
//! Covers code uniqueness on create/update, delete semantics, the filtered
//! reads, module fallback and paging.

#[path = "../helpers/mod.rs"]
mod helpers;

use campus_admin::core::AppError;
use campus_admin::permissions::services::FALLBACK_MODULES;
use campus_admin::permissions::{PermissionDraft, PermissionStatus};
use helpers::*;

#[tokio::test]
async fn test_create_defaults_to_enabled_and_stamps_timestamps() {
    let (service, _repo) = permission_fixture();

    let created = service
        .create(draft("user:view", "查看用户", Some("用户管理")))
        .await
        .unwrap();

    assert!(created.id.is_some());
    assert_eq!(created.status, PermissionStatus::Enabled);
    assert_eq!(created.created_at, created.updated_at);
    assert!(service.exists_by_code("user:view").await.unwrap());
}

#[tokio::test]
async fn test_create_rejects_duplicate_code() {
    let (service, repo) = permission_fixture();
    service
        .create(draft("user:view", "查看用户", None))
        .await
        .unwrap();

    let err = service
        .create(draft("user:view", "Another name", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert!(err.to_string().contains("user:view"));
    assert_eq!(repo.len(), 1);
}

#[tokio::test]
async fn test_create_rejects_blank_code() {
    let (service, _repo) = permission_fixture();

    let err = service.create(draft("   ", "Name", None)).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_create_wraps_storage_failure() {
    let (service, repo) = permission_fixture();
    repo.fail_writes(true);

    let err = service
        .create(draft("user:view", "查看用户", None))
        .await
        .unwrap_err();

    match err {
        AppError::Internal(msg) => assert!(msg.starts_with("Failed to create permission")),
        other => panic!("expected Internal, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_keeping_own_code_succeeds() {
    let (service, _repo) = permission_fixture();
    let created = service
        .create(draft("user:view", "查看用户", Some("用户管理")))
        .await
        .unwrap();
    let id = created.id.unwrap();

    let updated = service
        .update(id, draft("user:view", "View users", Some("用户管理")))
        .await
        .unwrap();

    assert_eq!(updated.permission_name, "View users");
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_update_to_code_used_by_another_row_fails() {
    let (service, _repo) = permission_fixture();
    service
        .create(draft("user:view", "查看用户", None))
        .await
        .unwrap();
    let other = service
        .create(draft("user:edit", "编辑用户", None))
        .await
        .unwrap();

    let err = service
        .update(other.id.unwrap(), draft("user:view", "编辑用户", None))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    let unchanged = service.get_by_id(other.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(unchanged.permission_code, "user:edit");
}

#[tokio::test]
async fn test_update_missing_id_is_not_found() {
    let (service, _repo) = permission_fixture();

    let err = service
        .update(404, draft("user:view", "查看用户", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_update_without_status_keeps_stored_status() {
    let (service, _repo) = permission_fixture();
    let created = service
        .create(draft("user:view", "查看用户", None).with_status(PermissionStatus::Disabled))
        .await
        .unwrap();

    let updated = service
        .update(created.id.unwrap(), draft("user:view", "查看用户", None))
        .await
        .unwrap();
    assert_eq!(updated.status, PermissionStatus::Disabled);
}

#[tokio::test]
async fn test_delete_existing_and_missing() {
    let (service, repo) = permission_fixture();
    let created = service
        .create(draft("user:view", "查看用户", None))
        .await
        .unwrap();
    let id = created.id.unwrap();
    repo.grant_to_role(1, id);

    assert!(service.delete(id).await.unwrap());
    assert!(service.get_by_id(id).await.unwrap().is_none());
    assert_eq!(repo.role_grant_count(), 0);

    assert!(!service.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_delete_outcome_comes_from_the_delete_itself() {
    let (service, repo) = permission_fixture();
    let seeded = repo.seed(permission("user:view", "查看用户", None, PermissionStatus::Enabled));
    let id = seeded.id.unwrap();

    // No separate lookup: unreadable rows are still removed and reported
    repo.fail_reads(true);
    assert!(service.delete(id).await.unwrap());
    assert!(!service.delete(id).await.unwrap());

    repo.fail_reads(false);
    assert_eq!(repo.len(), 0);
}

#[tokio::test]
async fn test_batch_delete_is_best_effort() {
    let (service, repo) = permission_fixture();
    let a = repo.seed(permission("a", "A", None, PermissionStatus::Enabled));
    let b = repo.seed(permission("b", "B", None, PermissionStatus::Enabled));
    let c = repo.seed(permission("c", "C", None, PermissionStatus::Enabled));
    repo.fail_delete_of(b.id.unwrap());

    let ids = [a.id.unwrap(), b.id.unwrap(), 999, c.id.unwrap()];
    let deleted = service.batch_delete(&ids).await;

    assert_eq!(deleted, 2);
    assert_eq!(repo.len(), 1);
    assert!(service.get_by_id(b.id.unwrap()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_stats_counts_enabled_rows_by_kind() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("sys:config", "系统配置", Some("SYSTEM"), PermissionStatus::Enabled));
    repo.seed(permission("user:view", "查看用户", Some("用户管理"), PermissionStatus::Enabled));
    repo.seed(permission("course:view", "查看课程", None, PermissionStatus::Enabled));
    repo.seed(permission("sys:old", "旧权限", Some("SYSTEM"), PermissionStatus::Disabled));

    let stats = service.stats().await.unwrap();

    assert_eq!(stats.total_permissions, 4);
    assert_eq!(stats.active_permissions, 3);
    assert_eq!(stats.system_permissions, 1);
    assert_eq!(stats.module_permissions, 2);
}

#[tokio::test]
async fn test_stats_surfaces_read_failure() {
    let (service, repo) = permission_fixture();
    repo.fail_reads(true);

    assert!(matches!(service.stats().await, Err(AppError::Database(_))));
}

#[tokio::test]
async fn test_filtered_reads_are_ordered_by_code() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("user:view", "查看用户", Some("用户管理"), PermissionStatus::Enabled));
    repo.seed(permission("user:add", "新增用户", Some("用户管理"), PermissionStatus::Disabled));
    repo.seed(permission("course:view", "查看课程", Some("课程管理"), PermissionStatus::Enabled));

    let users = service.list_by_resource_type("用户管理").await.unwrap();
    let codes: Vec<&str> = users.iter().map(|p| p.permission_code.as_str()).collect();
    assert_eq!(codes, vec!["user:add", "user:view"]);

    let enabled = service.list_by_status(PermissionStatus::Enabled).await.unwrap();
    let codes: Vec<&str> = enabled.iter().map(|p| p.permission_code.as_str()).collect();
    assert_eq!(codes, vec!["course:view", "user:view"]);

    let found = service.get_by_code("course:view").await.unwrap().unwrap();
    assert_eq!(found.permission_name, "查看课程");
    assert!(service.get_by_code("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_role_and_user_permissions() {
    let (service, repo) = permission_fixture();
    let view = repo.seed(permission("user:view", "查看用户", None, PermissionStatus::Enabled));
    let edit = repo.seed(permission("user:edit", "编辑用户", None, PermissionStatus::Enabled));
    let fee = repo.seed(permission("fee:view", "查看收费", None, PermissionStatus::Enabled));

    repo.grant_to_role(10, view.id.unwrap());
    repo.grant_to_role(10, edit.id.unwrap());
    repo.grant_to_role(20, view.id.unwrap());
    repo.grant_to_role(20, fee.id.unwrap());
    repo.assign_role(7, 10);
    repo.assign_role(7, 20);

    let role = service.list_by_role(10).await.unwrap();
    assert_eq!(role.len(), 2);

    let user = service.list_by_user(7).await.unwrap();
    let codes: Vec<&str> = user.iter().map(|p| p.permission_code.as_str()).collect();
    assert_eq!(codes, vec!["fee:view", "user:edit", "user:view"]);

    assert!(service.list_by_user(8).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_search_blank_keyword_lists_everything() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("user:view", "查看用户", None, PermissionStatus::Enabled));
    repo.seed(permission("course:view", "查看课程", None, PermissionStatus::Enabled));

    assert_eq!(service.search(Some("用户")).await.unwrap().len(), 1);
    assert_eq!(service.search(Some("  ")).await.unwrap().len(), 2);
    assert_eq!(service.search(None).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_modules_sorted_and_deduplicated() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("user:view", "查看用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("user:edit", "编辑用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("course:view", "查看课程", Some("courses"), PermissionStatus::Disabled));
    repo.seed(permission("misc", "杂项", None, PermissionStatus::Enabled));

    assert_eq!(service.list_modules().await, vec!["courses", "users"]);
}

#[tokio::test]
async fn test_list_modules_falls_back_on_read_failure() {
    let (service, repo) = permission_fixture();
    repo.fail_reads(true);

    let modules = service.list_modules().await;
    assert_eq!(modules, FALLBACK_MODULES.to_vec());
}

#[tokio::test]
async fn test_enable_and_disable() {
    let (service, repo) = permission_fixture();
    let stored = repo.seed(permission("user:view", "查看用户", None, PermissionStatus::Enabled));
    let id = stored.id.unwrap();

    assert!(service.disable(id).await.unwrap());
    let disabled = service.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(disabled.status, PermissionStatus::Disabled);

    assert!(service.enable(id).await.unwrap());
    assert!(service.get_by_id(id).await.unwrap().unwrap().is_enabled());

    assert!(!service.enable(999).await.unwrap());
}

#[tokio::test]
async fn test_tree_groups_by_resource_type() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("user:view", "查看用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("user:edit", "编辑用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("course:view", "查看课程", Some("courses"), PermissionStatus::Enabled));
    repo.seed(permission("misc", "杂项", None, PermissionStatus::Enabled));

    let tree = service.tree().await.unwrap();
    let names: Vec<&str> = tree.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["courses", "users"]);
    assert_eq!(tree[1].permissions.len(), 2);
}

#[tokio::test]
async fn test_count_by_resource_type() {
    let (service, repo) = permission_fixture();
    repo.seed(permission("user:view", "查看用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("user:edit", "编辑用户", Some("users"), PermissionStatus::Enabled));
    repo.seed(permission("misc", "杂项", None, PermissionStatus::Enabled));

    let counts = service.count_by_resource_type().await.unwrap();
    assert_eq!(counts.len(), 2);
    assert_eq!(counts[0].resource_type, None);
    assert_eq!(counts[0].count, 1);
    assert_eq!(counts[1].resource_type.as_deref(), Some("users"));
    assert_eq!(counts[1].count, 2);
}

#[tokio::test]
async fn test_page_bounds_and_totals() {
    let (service, repo) = permission_fixture();
    for i in 0..25 {
        repo.seed(permission(
            &format!("perm:{:02}", i),
            &format!("权限 {}", i),
            None,
            PermissionStatus::Enabled,
        ));
    }

    let first = service.page(None, 1, 10).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.total, 25);
    assert_eq!(first.items[0].permission_code, "perm:00");

    let last = service.page(Some(" "), 3, 10).await.unwrap();
    assert_eq!(last.items.len(), 5);
    assert_eq!(last.items[0].permission_code, "perm:20");

    let filtered = service.page(Some("权限 1"), 1, 100).await.unwrap();
    assert_eq!(filtered.total, 11);

    assert!(matches!(service.page(None, 0, 10).await, Err(AppError::Validation(_))));
    assert!(matches!(service.page(None, 1, 0).await, Err(AppError::Validation(_))));
    assert!(matches!(service.page(None, 1, 101).await, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_reads_surface_errors_to_caller() {
    let (service, repo) = permission_fixture();
    repo.fail_reads(true);

    assert!(service.list().await.is_err());
    assert!(service.get_by_id(1).await.is_err());
    assert!(service.exists_by_code("x").await.is_err());
    assert!(service.search(None).await.is_err());

    let draft = PermissionDraft::new("x", "y");
    assert!(service.create(draft).await.is_err());
}
