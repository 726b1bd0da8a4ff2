use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use crate::core::{AppError, Result};
use crate::modules::permissions::models::{
    Page, Permission, PermissionDraft, PermissionModule, PermissionStats, PermissionStatus,
    ResourceTypeCount,
};
use crate::modules::permissions::repositories::PermissionRepository;

/// Module labels served when the permission table cannot be read
pub const FALLBACK_MODULES: [&str; 6] = [
    "用户管理",
    "角色管理",
    "权限管理",
    "课程管理",
    "学生管理",
    "财务管理",
];

pub const MAX_PAGE_SIZE: u32 = 100;

/// Service for permission administration (RBAC CRUD, filtered reads, counts)
pub struct PermissionService {
    repo: Arc<dyn PermissionRepository>,
}

impl PermissionService {
    pub fn new(repo: Arc<dyn PermissionRepository>) -> Self {
        Self { repo }
    }

    /// Total rows plus system/module/active counts over enabled rows
    pub async fn stats(&self) -> Result<PermissionStats> {
        let total = self.repo.count_all().await?;
        let enabled = self.repo.find_by_status(PermissionStatus::Enabled).await?;
        Ok(PermissionStats::tally(total, &enabled))
    }

    pub async fn list(&self) -> Result<Vec<Permission>> {
        self.repo.find_all().await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Permission>> {
        self.repo.find_by_id(id).await
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<Permission>> {
        self.repo.find_by_code(code).await
    }

    pub async fn exists_by_code(&self, code: &str) -> Result<bool> {
        self.repo.exists_by_code(code).await
    }

    /// Create a permission with a code no other row uses.
    /// Status defaults to enabled; both timestamps are set to now.
    pub async fn create(&self, draft: PermissionDraft) -> Result<Permission> {
        let draft = draft.validate()?;

        let taken = self
            .repo
            .exists_by_code(&draft.permission_code)
            .await
            .map_err(|e| write_failure("create", e))?;
        if taken {
            warn!(code = %draft.permission_code, "Rejected duplicate permission code");
            return Err(duplicate_code(&draft.permission_code));
        }

        let permission = Permission::from_draft(draft, Utc::now());
        let created = self
            .repo
            .save(permission)
            .await
            .map_err(|e| write_failure("create", e))?;

        info!(
            id = ?created.id,
            code = %created.permission_code,
            "Permission created"
        );
        Ok(created)
    }

    /// Overwrite all mutable fields of an existing permission.
    /// Code uniqueness is only re-checked when the code changes.
    pub async fn update(&self, id: i64, draft: PermissionDraft) -> Result<Permission> {
        let draft = draft.validate()?;

        let mut existing = self
            .repo
            .find_by_id(id)
            .await
            .map_err(|e| write_failure("update", e))?
            .ok_or_else(|| AppError::not_found(format!("Permission {}", id)))?;

        if existing.permission_code != draft.permission_code {
            let taken = self
                .repo
                .exists_by_code(&draft.permission_code)
                .await
                .map_err(|e| write_failure("update", e))?;
            if taken {
                warn!(id, code = %draft.permission_code, "Rejected duplicate permission code");
                return Err(duplicate_code(&draft.permission_code));
            }
        }

        existing.apply(draft, Utc::now());
        let updated = self
            .repo
            .save(existing)
            .await
            .map_err(|e| write_failure("update", e))?;

        info!(id, code = %updated.permission_code, "Permission updated");
        Ok(updated)
    }

    /// `Ok(false)` when no permission has this id
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let deleted = self.repo.delete_by_id(id).await?;
        if deleted {
            info!(id, "Permission deleted");
        }
        Ok(deleted)
    }

    /// Deletes ids one at a time, best-effort: a failure on one id is logged
    /// and the remaining ids are still attempted. Not atomic across the batch.
    /// Returns how many ids were actually deleted.
    pub async fn batch_delete(&self, ids: &[i64]) -> usize {
        let mut deleted = 0;
        for &id in ids {
            match self.delete(id).await {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => error!(id, error = %e, "Failed to delete permission in batch"),
            }
        }

        info!(requested = ids.len(), deleted, "Batch permission delete finished");
        deleted
    }

    pub async fn list_by_status(&self, status: PermissionStatus) -> Result<Vec<Permission>> {
        self.repo.find_by_status(status).await
    }

    pub async fn list_by_resource_type(&self, resource_type: &str) -> Result<Vec<Permission>> {
        self.repo.find_by_resource_type(resource_type).await
    }

    pub async fn list_by_role(&self, role_id: i64) -> Result<Vec<Permission>> {
        self.repo.find_by_role(role_id).await
    }

    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Permission>> {
        self.repo.find_by_user(user_id).await
    }

    /// Substring match on permission name; a blank keyword lists everything
    pub async fn search(&self, keyword: Option<&str>) -> Result<Vec<Permission>> {
        match normalize_keyword(keyword) {
            Some(keyword) => self.repo.find_by_name_containing(keyword).await,
            None => self.repo.find_all().await,
        }
    }

    /// Distinct resource types in sorted order. Degrades to
    /// [`FALLBACK_MODULES`] when the table cannot be read.
    pub async fn list_modules(&self) -> Vec<String> {
        match self.repo.find_all().await {
            Ok(permissions) => permissions
                .into_iter()
                .filter_map(|p| p.resource_type)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            Err(e) => {
                warn!(error = %e, "Falling back to static permission modules");
                FALLBACK_MODULES.iter().map(|m| m.to_string()).collect()
            }
        }
    }

    pub async fn enable(&self, id: i64) -> Result<bool> {
        self.set_status(id, PermissionStatus::Enabled).await
    }

    pub async fn disable(&self, id: i64) -> Result<bool> {
        self.set_status(id, PermissionStatus::Disabled).await
    }

    async fn set_status(&self, id: i64, status: PermissionStatus) -> Result<bool> {
        let Some(mut permission) = self.repo.find_by_id(id).await? else {
            return Ok(false);
        };

        permission.status = status;
        permission.updated_at = Utc::now();
        self.repo.save(permission).await?;

        info!(id, ?status, "Permission status changed");
        Ok(true)
    }

    /// Permissions grouped by resource type, modules sorted by name.
    /// Rows without a resource type are left out.
    pub async fn tree(&self) -> Result<Vec<PermissionModule>> {
        let mut modules: BTreeMap<String, Vec<Permission>> = BTreeMap::new();
        for permission in self.repo.find_all().await? {
            if let Some(resource_type) = permission.resource_type.clone() {
                modules.entry(resource_type).or_default().push(permission);
            }
        }

        Ok(modules
            .into_iter()
            .map(|(name, permissions)| PermissionModule { name, permissions })
            .collect())
    }

    pub async fn count_by_resource_type(&self) -> Result<Vec<ResourceTypeCount>> {
        self.repo.count_group_by_resource_type().await
    }

    /// 1-based paging over permissions, optionally filtered by name
    pub async fn page(
        &self,
        keyword: Option<&str>,
        page: u32,
        size: u32,
    ) -> Result<Page<Permission>> {
        if page == 0 {
            return Err(AppError::validation("page must be at least 1"));
        }
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(AppError::validation(format!(
                "size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }

        let keyword = normalize_keyword(keyword);
        let offset = u64::from(page - 1) * u64::from(size);
        let items = self.repo.find_page(keyword, size, offset).await?;
        let total = self.repo.count_matching(keyword).await?;

        Ok(Page {
            items,
            total,
            page,
            size,
        })
    }
}

fn normalize_keyword(keyword: Option<&str>) -> Option<&str> {
    keyword.map(str::trim).filter(|k| !k.is_empty())
}

fn duplicate_code(code: &str) -> AppError {
    AppError::conflict(format!("Permission code already exists: {}", code))
}

/// Re-signal a persistence failure during create/update
fn write_failure(action: &str, err: AppError) -> AppError {
    error!(action, error = %err, "Permission write failed");
    if err.is_unique_violation() {
        return AppError::conflict(format!(
            "Failed to {} permission: permission code already exists",
            action
        ));
    }
    match err {
        AppError::Database(e) => {
            AppError::internal(format!("Failed to {} permission: {}", action, e))
        }
        other => other,
    }
}
