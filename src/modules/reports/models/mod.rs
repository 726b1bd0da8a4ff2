pub mod fee_item;
pub mod financial_report;

pub use fee_item::{FeeItem, PaymentRecord, OTHER_FEE_TYPE, PAYMENT_STATUS_PAID};
pub use financial_report::{
    percentage_of, placeholder_shares, shares, FeeTypeBreakdown, FeeTypeShare, FinancialStats,
    MonthlyRevenue, ReportFigure, ReportedAmount, PLACEHOLDER_FEE_TYPES,
};
