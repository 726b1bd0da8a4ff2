pub mod report_service;

pub use report_service::{ReportService, REFUND_PLACEHOLDER, UNPAID_PLACEHOLDER};
