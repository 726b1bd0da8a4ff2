use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::core::{Currency, RevenueWindow};

/// Fixed distribution served when no fee item yields a breakdown entry
pub const PLACEHOLDER_FEE_TYPES: [(&str, i64); 5] = [
    ("学费", 50_000),
    ("住宿费", 20_000),
    ("教材费", 8_000),
    ("实验费", 5_000),
    ("其他费用", 3_000),
];

/// An amount and whether it is a stand-in rather than a computed figure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportedAmount {
    pub amount: Decimal,
    pub placeholder: bool,
}

impl ReportedAmount {
    pub fn computed(amount: Decimal) -> Self {
        Self {
            amount,
            placeholder: false,
        }
    }

    pub fn placeholder(amount: Decimal) -> Self {
        Self {
            amount,
            placeholder: true,
        }
    }
}

/// A report amount together with its display string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFigure {
    pub amount: Decimal,
    pub formatted: String,
    pub placeholder: bool,
}

impl ReportFigure {
    pub fn new(reported: ReportedAmount, currency: Currency) -> Self {
        Self {
            amount: reported.amount,
            formatted: currency.format_amount(reported.amount),
            placeholder: reported.placeholder,
        }
    }
}

/// Headline figures for one month and its year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialStats {
    pub year: i32,
    pub month: u32,
    pub monthly_revenue: ReportFigure,
    pub yearly_revenue: ReportFigure,
    pub unpaid_amount: ReportFigure,
    pub refund_amount: ReportFigure,
}

impl FinancialStats {
    /// Names of the figures that are placeholders, in display order
    pub fn placeholder_fields(&self) -> Vec<&'static str> {
        [
            ("monthly_revenue", &self.monthly_revenue),
            ("yearly_revenue", &self.yearly_revenue),
            ("unpaid_amount", &self.unpaid_amount),
            ("refund_amount", &self.refund_amount),
        ]
        .into_iter()
        .filter(|(_, figure)| figure.placeholder)
        .map(|(name, _)| name)
        .collect()
    }
}

/// Revenue collected in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: u32,
    /// "<N>月"
    pub label: String,
    pub revenue: Decimal,
}

impl MonthlyRevenue {
    pub fn new(month: u32, revenue: Decimal) -> Self {
        Self {
            month,
            label: format!("{}月", month),
            revenue,
        }
    }
}

/// One fee type's cumulative amount and share of the grand total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTypeShare {
    pub fee_type: String,
    pub amount: Decimal,
    /// Percent of the total, one decimal place
    pub percentage: Decimal,
}

/// Revenue split by fee type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeeTypeBreakdown {
    /// Period that was requested
    pub window: RevenueWindow,
    /// Always false: the sums are all-time per fee item and ignore `window`
    pub window_applied: bool,
    /// True when `entries` is the fixed fallback distribution
    pub placeholder: bool,
    pub entries: Vec<FeeTypeShare>,
}

impl FeeTypeBreakdown {
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(|e| e.amount).sum()
    }
}

/// `amount / total` rounded half-up to 4 places, as a percentage rounded
/// half-up to 1 place. Zero when `total` is not positive.
pub fn percentage_of(amount: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = (amount / total).round_dp_with_strategy(4, RoundingStrategy::MidpointAwayFromZero);
    (ratio * Decimal::ONE_HUNDRED).round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Turn per-type totals into shares of their grand total
pub fn shares<I>(amounts: I) -> Vec<FeeTypeShare>
where
    I: IntoIterator<Item = (String, Decimal)>,
{
    let amounts: Vec<(String, Decimal)> = amounts.into_iter().collect();
    let total: Decimal = amounts.iter().map(|(_, amount)| *amount).sum();

    amounts
        .into_iter()
        .map(|(fee_type, amount)| FeeTypeShare {
            percentage: percentage_of(amount, total),
            fee_type,
            amount,
        })
        .collect()
}

/// The fixed five-category fallback with percentages over its own total
pub fn placeholder_shares() -> Vec<FeeTypeShare> {
    shares(
        PLACEHOLDER_FEE_TYPES
            .iter()
            .map(|(label, amount)| (label.to_string(), Decimal::from(*amount))),
    )
}
