use async_trait::async_trait;
use sqlx::MySqlPool;

use crate::core::Result;
use crate::modules::reports::models::FeeItem;

/// Read access to fee item categories
#[async_trait]
pub trait FeeItemRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<FeeItem>>;
}

pub struct MySqlFeeItemRepository {
    pool: MySqlPool,
}

impl MySqlFeeItemRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeeItemRepository for MySqlFeeItemRepository {
    async fn find_all(&self) -> Result<Vec<FeeItem>> {
        let items = sqlx::query_as::<_, FeeItem>(
            r#"
            SELECT id, item_name, item_code, amount, fee_type
            FROM tb_fee_item
            WHERE deleted = 0
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}
