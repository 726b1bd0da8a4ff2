use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Label used for fee items without a fee type
pub const OTHER_FEE_TYPE: &str = "其他费用";

/// Payment status counted as revenue
pub const PAYMENT_STATUS_PAID: i8 = 1;

/// Billable category that payment records reference (e.g. tuition)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct FeeItem {
    pub id: i64,
    pub item_name: String,
    pub item_code: String,
    /// Amount due per student
    pub amount: Decimal,
    pub fee_type: Option<String>,
}

impl FeeItem {
    pub fn new(id: i64, item_name: impl Into<String>, fee_type: Option<&str>) -> Self {
        let item_name = item_name.into();
        Self {
            id,
            item_code: format!("FEE-{:04}", id),
            item_name,
            amount: Decimal::ZERO,
            fee_type: fee_type.map(str::to_string),
        }
    }

    /// Aggregation label; untyped items count as "other fees"
    pub fn fee_type_label(&self) -> &str {
        self.fee_type.as_deref().unwrap_or(OTHER_FEE_TYPE)
    }
}

/// A payment transaction against a fee item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PaymentRecord {
    pub id: i64,
    pub student_id: i64,
    pub fee_item_id: i64,
    pub amount: Decimal,
    pub payment_method: String,
    pub payment_time: NaiveDateTime,
    pub transaction_no: Option<String>,
    pub payment_status: i8,
    pub deleted: bool,
}

impl PaymentRecord {
    /// Paid and not soft-deleted
    pub fn counts_as_revenue(&self) -> bool {
        self.payment_status == PAYMENT_STATUS_PAID && !self.deleted
    }
}
