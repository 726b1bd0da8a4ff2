pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{FeeTypeBreakdown, FinancialStats, MonthlyRevenue};
pub use repositories::{
    FeeItemRepository, MySqlFeeItemRepository, MySqlPaymentRecordRepository,
    PaymentRecordRepository,
};
pub use services::ReportService;
