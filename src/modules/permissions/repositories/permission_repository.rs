use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::{AppError, Repository, Result};
use crate::modules::permissions::models::{Permission, PermissionStatus, ResourceTypeCount};

/// Persistence operations for permissions beyond the base CRUD set
#[async_trait]
pub trait PermissionRepository: Repository<Permission, i64> {
    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>>;

    async fn exists_by_code(&self, code: &str) -> Result<bool>;

    /// Ordered by permission code
    async fn find_by_status(&self, status: PermissionStatus) -> Result<Vec<Permission>>;

    /// Ordered by permission code
    async fn find_by_resource_type(&self, resource_type: &str) -> Result<Vec<Permission>>;

    /// Permissions granted to a role
    async fn find_by_role(&self, role_id: i64) -> Result<Vec<Permission>>;

    /// Permissions granted to any role the user holds, without duplicates
    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Permission>>;

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Permission>>;

    async fn count_group_by_resource_type(&self) -> Result<Vec<ResourceTypeCount>>;

    /// One page ordered by code; `None` keyword matches everything
    async fn find_page(
        &self,
        keyword: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Permission>>;

    /// Number of rows `find_page` pages through for the same keyword
    async fn count_matching(&self, keyword: Option<&str>) -> Result<i64>;
}

const PERMISSION_COLUMNS: &str = r#"
    id, permission_code, permission_name, resource_type, resource_url,
    permission_desc, status, created_at, updated_at
"#;

/// MySQL-backed permission repository
#[derive(Clone)]
pub struct MySqlPermissionRepository {
    pool: MySqlPool,
}

impl MySqlPermissionRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn insert(&self, permission: Permission) -> Result<Permission> {
        let result = sqlx::query(
            r#"
            INSERT INTO tb_permission (
                permission_code, permission_name, resource_type, resource_url,
                permission_desc, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&permission.permission_code)
        .bind(&permission.permission_name)
        .bind(&permission.resource_type)
        .bind(&permission.resource_url)
        .bind(&permission.permission_desc)
        .bind(permission.status)
        .bind(permission.created_at)
        .bind(permission.updated_at)
        .execute(&self.pool)
        .await?;

        let mut created = permission;
        created.id = Some(result.last_insert_id() as i64);
        Ok(created)
    }

    async fn update(&self, id: i64, permission: Permission) -> Result<Permission> {
        let result = sqlx::query(
            r#"
            UPDATE tb_permission
            SET permission_code = ?, permission_name = ?, resource_type = ?,
                resource_url = ?, permission_desc = ?, status = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&permission.permission_code)
        .bind(&permission.permission_name)
        .bind(&permission.resource_type)
        .bind(&permission.resource_url)
        .bind(&permission.permission_desc)
        .bind(permission.status)
        .bind(permission.updated_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 && !self.exists_by_id(id).await? {
            return Err(AppError::not_found(format!("Permission {}", id)));
        }

        Ok(permission)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool> {
        let exists: i64 =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tb_permission WHERE id = ?)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists > 0)
    }

    async fn fetch_where(&self, clause: &str, value: &str) -> Result<Vec<Permission>> {
        let sql = format!(
            "SELECT {} FROM tb_permission WHERE {} ORDER BY permission_code",
            PERMISSION_COLUMNS, clause
        );
        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl Repository<Permission, i64> for MySqlPermissionRepository {
    async fn count_all(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tb_permission")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn find_all(&self) -> Result<Vec<Permission>> {
        let sql = format!(
            "SELECT {} FROM tb_permission ORDER BY permission_code",
            PERMISSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Permission>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>> {
        let sql = format!("SELECT {} FROM tb_permission WHERE id = ?", PERMISSION_COLUMNS);
        let row = sqlx::query_as::<_, Permission>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: Permission) -> Result<Permission> {
        match entity.id {
            Some(id) => self.update(id, entity).await,
            None => self.insert(entity).await,
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM tb_role_permission WHERE permission_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM tb_permission WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PermissionRepository for MySqlPermissionRepository {
    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>> {
        let sql = format!(
            "SELECT {} FROM tb_permission WHERE permission_code = ?",
            PERMISSION_COLUMNS
        );
        let row = sqlx::query_as::<_, Permission>(&sql)
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn exists_by_code(&self, code: &str) -> Result<bool> {
        let exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM tb_permission WHERE permission_code = ?)",
        )
        .bind(code)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists > 0)
    }

    async fn find_by_status(&self, status: PermissionStatus) -> Result<Vec<Permission>> {
        let sql = format!(
            "SELECT {} FROM tb_permission WHERE status = ? ORDER BY permission_code",
            PERMISSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_by_resource_type(&self, resource_type: &str) -> Result<Vec<Permission>> {
        self.fetch_where("resource_type = ?", resource_type).await
    }

    async fn find_by_role(&self, role_id: i64) -> Result<Vec<Permission>> {
        let rows = sqlx::query_as::<_, Permission>(
            r#"
            SELECT p.id, p.permission_code, p.permission_name, p.resource_type,
                   p.resource_url, p.permission_desc, p.status, p.created_at, p.updated_at
            FROM tb_permission p
            JOIN tb_role_permission rp ON rp.permission_id = p.id
            WHERE rp.role_id = ?
            ORDER BY p.permission_code
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Permission>> {
        let rows = sqlx::query_as::<_, Permission>(
            r#"
            SELECT DISTINCT p.id, p.permission_code, p.permission_name, p.resource_type,
                   p.resource_url, p.permission_desc, p.status, p.created_at, p.updated_at
            FROM tb_permission p
            JOIN tb_role_permission rp ON rp.permission_id = p.id
            JOIN tb_user_role ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = ?
            ORDER BY p.permission_code
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_name_containing(&self, fragment: &str) -> Result<Vec<Permission>> {
        self.fetch_where("permission_name LIKE CONCAT('%', ?, '%')", fragment)
            .await
    }

    async fn count_group_by_resource_type(&self) -> Result<Vec<ResourceTypeCount>> {
        let rows = sqlx::query_as::<_, ResourceTypeCount>(
            r#"
            SELECT resource_type, COUNT(*) AS count
            FROM tb_permission
            GROUP BY resource_type
            ORDER BY resource_type
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_page(
        &self,
        keyword: Option<&str>,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<Permission>> {
        let sql = format!(
            r#"
            SELECT {} FROM tb_permission
            WHERE (? IS NULL OR permission_name LIKE CONCAT('%', ?, '%'))
            ORDER BY permission_code
            LIMIT ? OFFSET ?
            "#,
            PERMISSION_COLUMNS
        );
        let rows = sqlx::query_as::<_, Permission>(&sql)
            .bind(keyword)
            .bind(keyword)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn count_matching(&self, keyword: Option<&str>) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM tb_permission
            WHERE (? IS NULL OR permission_name LIKE CONCAT('%', ?, '%'))
            "#,
        )
        .bind(keyword)
        .bind(keyword)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
