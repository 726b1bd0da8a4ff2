//! Permission administration endpoints
//!
//! Read endpoints keep the admin console usable when the database hiccups:
//! failures are logged and answered with an empty list, `false`, or 404.
//! Writes and stats surface their errors.

use actix_web::{web, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{AppError, Result};
use crate::modules::permissions::models::{Permission, PermissionDraft, PermissionStatus};
use crate::modules::permissions::services::PermissionService;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub keyword: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ExistsQuery {
    pub code: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct BatchDeleteResponse {
    pub requested: usize,
    pub deleted: usize,
}

fn or_empty<T>(result: Result<Vec<T>>, context: &str) -> Vec<T> {
    result.unwrap_or_else(|e| {
        error!(error = %e, "{}", context);
        Vec::new()
    })
}

fn found_or_404(result: Result<Option<Permission>>, context: &str) -> HttpResponse {
    match result {
        Ok(Some(permission)) => HttpResponse::Ok().json(permission),
        Ok(None) => permission_not_found(),
        Err(e) => {
            error!(error = %e, "{}", context);
            permission_not_found()
        }
    }
}

fn permission_not_found() -> HttpResponse {
    AppError::not_found("Permission").error_response()
}

/// GET /api/permissions
pub async fn list_permissions(service: web::Data<PermissionService>) -> HttpResponse {
    let permissions = or_empty(service.list().await, "Failed to list permissions");
    HttpResponse::Ok().json(permissions)
}

/// POST /api/permissions
pub async fn create_permission(
    service: web::Data<PermissionService>,
    body: web::Json<PermissionDraft>,
) -> Result<HttpResponse> {
    let created = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

/// GET /api/permissions/stats
pub async fn get_stats(service: web::Data<PermissionService>) -> Result<HttpResponse> {
    let stats = service.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// GET /api/permissions/modules
pub async fn list_modules(service: web::Data<PermissionService>) -> HttpResponse {
    HttpResponse::Ok().json(service.list_modules().await)
}

/// GET /api/permissions/tree
pub async fn get_tree(service: web::Data<PermissionService>) -> HttpResponse {
    let tree = or_empty(service.tree().await, "Failed to build permission tree");
    HttpResponse::Ok().json(tree)
}

/// GET /api/permissions/counts
pub async fn count_by_resource_type(service: web::Data<PermissionService>) -> HttpResponse {
    let counts = or_empty(
        service.count_by_resource_type().await,
        "Failed to count permissions by resource type",
    );
    HttpResponse::Ok().json(counts)
}

/// GET /api/permissions/search?keyword=
pub async fn search_permissions(
    service: web::Data<PermissionService>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let permissions = or_empty(
        service.search(query.keyword.as_deref()).await,
        "Failed to search permissions",
    );
    HttpResponse::Ok().json(permissions)
}

/// GET /api/permissions/page?keyword=&page=&size=
pub async fn page_permissions(
    service: web::Data<PermissionService>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let page = service
        .page(query.keyword.as_deref(), query.page, query.size)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/permissions/exists?code=
pub async fn code_exists(
    service: web::Data<PermissionService>,
    query: web::Query<ExistsQuery>,
) -> HttpResponse {
    let exists = service.exists_by_code(&query.code).await.unwrap_or_else(|e| {
        error!(code = %query.code, error = %e, "Failed to check permission code");
        false
    });
    HttpResponse::Ok().json(serde_json::json!({ "exists": exists }))
}

/// GET /api/permissions/code/{code}
pub async fn get_by_code(
    service: web::Data<PermissionService>,
    code: web::Path<String>,
) -> HttpResponse {
    found_or_404(
        service.get_by_code(&code).await,
        "Failed to fetch permission by code",
    )
}

/// GET /api/permissions/status/{status}
pub async fn list_by_status(
    service: web::Data<PermissionService>,
    status: web::Path<i8>,
) -> Result<HttpResponse> {
    let status = PermissionStatus::try_from(status.into_inner()).map_err(AppError::validation)?;
    let permissions = or_empty(
        service.list_by_status(status).await,
        "Failed to list permissions by status",
    );
    Ok(HttpResponse::Ok().json(permissions))
}

/// GET /api/permissions/resource-type/{resource_type}
pub async fn list_by_resource_type(
    service: web::Data<PermissionService>,
    resource_type: web::Path<String>,
) -> HttpResponse {
    let permissions = or_empty(
        service.list_by_resource_type(&resource_type).await,
        "Failed to list permissions by resource type",
    );
    HttpResponse::Ok().json(permissions)
}

/// GET /api/permissions/role/{role_id}
pub async fn list_by_role(
    service: web::Data<PermissionService>,
    role_id: web::Path<i64>,
) -> HttpResponse {
    let permissions = or_empty(
        service.list_by_role(role_id.into_inner()).await,
        "Failed to list permissions by role",
    );
    HttpResponse::Ok().json(permissions)
}

/// GET /api/permissions/user/{user_id}
pub async fn list_by_user(
    service: web::Data<PermissionService>,
    user_id: web::Path<i64>,
) -> HttpResponse {
    let permissions = or_empty(
        service.list_by_user(user_id.into_inner()).await,
        "Failed to list permissions by user",
    );
    HttpResponse::Ok().json(permissions)
}

/// POST /api/permissions/batch-delete
pub async fn batch_delete(
    service: web::Data<PermissionService>,
    body: web::Json<BatchDeleteRequest>,
) -> HttpResponse {
    let deleted = service.batch_delete(&body.ids).await;
    HttpResponse::Ok().json(BatchDeleteResponse {
        requested: body.ids.len(),
        deleted,
    })
}

/// GET /api/permissions/{id}
pub async fn get_by_id(service: web::Data<PermissionService>, id: web::Path<i64>) -> HttpResponse {
    found_or_404(
        service.get_by_id(id.into_inner()).await,
        "Failed to fetch permission by id",
    )
}

/// PUT /api/permissions/{id}
pub async fn update_permission(
    service: web::Data<PermissionService>,
    id: web::Path<i64>,
    body: web::Json<PermissionDraft>,
) -> Result<HttpResponse> {
    let updated = service.update(id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/permissions/{id}
pub async fn delete_permission(
    service: web::Data<PermissionService>,
    id: web::Path<i64>,
) -> HttpResponse {
    let id = id.into_inner();
    let deleted = service.delete(id).await.unwrap_or_else(|e| {
        error!(id, error = %e, "Failed to delete permission");
        false
    });
    HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted }))
}

/// PUT /api/permissions/{id}/enable
pub async fn enable_permission(
    service: web::Data<PermissionService>,
    id: web::Path<i64>,
) -> HttpResponse {
    let id = id.into_inner();
    let updated = service.enable(id).await.unwrap_or_else(|e| {
        error!(id, error = %e, "Failed to enable permission");
        false
    });
    HttpResponse::Ok().json(serde_json::json!({ "updated": updated }))
}

/// PUT /api/permissions/{id}/disable
pub async fn disable_permission(
    service: web::Data<PermissionService>,
    id: web::Path<i64>,
) -> HttpResponse {
    let id = id.into_inner();
    let updated = service.disable(id).await.unwrap_or_else(|e| {
        error!(id, error = %e, "Failed to disable permission");
        false
    });
    HttpResponse::Ok().json(serde_json::json!({ "updated": updated }))
}

/// Configure routes for the permissions module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/permissions")
            .route("", web::get().to(list_permissions))
            .route("", web::post().to(create_permission))
            .route("/stats", web::get().to(get_stats))
            .route("/modules", web::get().to(list_modules))
            .route("/tree", web::get().to(get_tree))
            .route("/counts", web::get().to(count_by_resource_type))
            .route("/search", web::get().to(search_permissions))
            .route("/page", web::get().to(page_permissions))
            .route("/exists", web::get().to(code_exists))
            .route("/code/{code}", web::get().to(get_by_code))
            .route("/status/{status}", web::get().to(list_by_status))
            .route("/resource-type/{resource_type}", web::get().to(list_by_resource_type))
            .route("/role/{role_id}", web::get().to(list_by_role))
            .route("/user/{user_id}", web::get().to(list_by_user))
            .route("/batch-delete", web::post().to(batch_delete))
            .route("/{id}", web::get().to(get_by_id))
            .route("/{id}", web::put().to(update_permission))
            .route("/{id}", web::delete().to(delete_permission))
            .route("/{id}/enable", web::put().to(enable_permission))
            .route("/{id}/disable", web::put().to(disable_permission)),
    );
}
