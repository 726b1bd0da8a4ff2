pub mod fee_item_repository;
pub mod payment_record_repository;

pub use fee_item_repository::{FeeItemRepository, MySqlFeeItemRepository};
pub use payment_record_repository::{MySqlPaymentRecordRepository, PaymentRecordRepository};
