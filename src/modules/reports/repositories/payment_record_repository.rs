use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::MySqlPool;

use crate::core::Result;

/// Revenue sums over paid, non-deleted payment records.
/// `None` means no matching rows; callers treat it as zero.
#[async_trait]
pub trait PaymentRecordRepository: Send + Sync {
    /// All-time sum for one fee item
    async fn sum_amount_by_fee_item(&self, fee_item_id: i64) -> Result<Option<Decimal>>;

    /// Sum of payments with `start <= payment_time <= end`
    async fn sum_amount_by_time_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<Decimal>>;
}

pub struct MySqlPaymentRecordRepository {
    pool: MySqlPool,
}

impl MySqlPaymentRecordRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRecordRepository for MySqlPaymentRecordRepository {
    async fn sum_amount_by_fee_item(&self, fee_item_id: i64) -> Result<Option<Decimal>> {
        let sum: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount)
            FROM tb_payment_record
            WHERE fee_item_id = ? AND payment_status = 1 AND deleted = 0
            "#,
        )
        .bind(fee_item_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }

    async fn sum_amount_by_time_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Option<Decimal>> {
        let sum: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(amount)
            FROM tb_payment_record
            WHERE payment_time BETWEEN ? AND ? AND payment_status = 1 AND deleted = 0
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}
