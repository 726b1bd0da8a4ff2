// Test data builders
//
// Permission drafts, fee items and payment records with predictable values.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;

use campus_admin::core::Currency;
use campus_admin::permissions::{Permission, PermissionDraft, PermissionService, PermissionStatus};
use campus_admin::reports::models::{FeeItem, PaymentRecord, PAYMENT_STATUS_PAID};
use campus_admin::reports::ReportService;

use super::in_memory::{
    InMemoryFeeItemRepository, InMemoryPaymentRecordRepository, InMemoryPermissionRepository,
};

pub fn draft(code: &str, name: &str, resource_type: Option<&str>) -> PermissionDraft {
    let mut draft = PermissionDraft::new(code, name);
    draft.resource_type = resource_type.map(str::to_string);
    draft
}

/// Unsaved permission, ready for `InMemoryPermissionRepository::seed`
pub fn permission(
    code: &str,
    name: &str,
    resource_type: Option<&str>,
    status: PermissionStatus,
) -> Permission {
    Permission::from_draft(
        draft(code, name, resource_type).with_status(status),
        Utc::now(),
    )
}

/// Local wall-clock instant
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .unwrap_or_else(|| panic!("invalid test datetime {}-{}-{}", year, month, day))
}

pub fn fee_item(id: i64, name: &str, fee_type: Option<&str>) -> FeeItem {
    FeeItem::new(id, name, fee_type)
}

/// Paid, live payment
pub fn payment(id: i64, fee_item_id: i64, amount: Decimal, time: NaiveDateTime) -> PaymentRecord {
    PaymentRecord {
        id,
        student_id: 1000 + id,
        fee_item_id,
        amount,
        payment_method: "bank_transfer".to_string(),
        payment_time: time,
        transaction_no: Some(format!("TXN-{:06}", id)),
        payment_status: PAYMENT_STATUS_PAID,
        deleted: false,
    }
}

/// Service over a fresh in-memory repository; the repository is returned for
/// seeding and failure injection
pub fn permission_fixture() -> (PermissionService, Arc<InMemoryPermissionRepository>) {
    let repo = Arc::new(InMemoryPermissionRepository::new());
    (PermissionService::new(repo.clone()), repo)
}

pub struct ReportFixture {
    pub service: ReportService,
    pub fee_items: Arc<InMemoryFeeItemRepository>,
    pub payments: Arc<InMemoryPaymentRecordRepository>,
}

pub fn report_fixture(items: Vec<FeeItem>, records: Vec<PaymentRecord>) -> ReportFixture {
    let fee_items = Arc::new(InMemoryFeeItemRepository::with_items(items));
    let payments = Arc::new(InMemoryPaymentRecordRepository::with_records(records));
    ReportFixture {
        service: ReportService::new(fee_items.clone(), payments.clone(), Currency::CNY),
        fee_items,
        payments,
    }
}
