use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::core::period::current_year;
use crate::core::{AppError, Currency, ReportPeriod, Result, RevenueWindow};
use crate::modules::reports::models::{
    placeholder_shares, shares, FeeTypeBreakdown, FinancialStats, MonthlyRevenue, ReportFigure,
    ReportedAmount,
};
use crate::modules::reports::repositories::{FeeItemRepository, PaymentRecordRepository};

/// Stand-in for outstanding fees until receivables are tracked
pub const UNPAID_PLACEHOLDER: Decimal = Decimal::from_parts(1_500_000, 0, 0, false, 2);

/// Stand-in for refunds until a refund ledger exists
pub const REFUND_PLACEHOLDER: Decimal = Decimal::from_parts(250_000, 0, 0, false, 2);

/// Read-only revenue aggregation over payment records and fee items
pub struct ReportService {
    fee_items: Arc<dyn FeeItemRepository>,
    payments: Arc<dyn PaymentRecordRepository>,
    currency: Currency,
}

impl ReportService {
    pub fn new(
        fee_items: Arc<dyn FeeItemRepository>,
        payments: Arc<dyn PaymentRecordRepository>,
        currency: Currency,
    ) -> Self {
        Self {
            fee_items,
            payments,
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Monthly and yearly revenue plus unpaid/refund figures, formatted for display.
    /// Missing year or month default to today's.
    pub async fn financial_stats(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<FinancialStats> {
        let period = ReportPeriod::resolve(year, month)?;
        let month_window = period.month_window()?;
        let year_window = period.year_window()?;

        debug!(
            year = period.year,
            month = period.month,
            month_start = %month_window.start,
            month_end = %month_window.end,
            "Computing financial stats"
        );

        let monthly = self.revenue_in_window(month_window).await?;
        let yearly = self.revenue_in_window(year_window).await?;
        let unpaid = self.unpaid_amount();
        let refund = self.refund_amount(period.year, period.month);

        let stats = FinancialStats {
            year: period.year,
            month: period.month,
            monthly_revenue: self.figure(ReportedAmount::computed(monthly)),
            yearly_revenue: self.figure(ReportedAmount::computed(yearly)),
            unpaid_amount: self.figure(unpaid),
            refund_amount: self.figure(refund),
        };

        info!(
            year = stats.year,
            month = stats.month,
            monthly = %monthly,
            yearly = %yearly,
            "Financial stats generated"
        );
        Ok(stats)
    }

    /// Twelve entries, January through December, each summing that month's payments
    pub async fn monthly_revenue_series(&self, year: Option<i32>) -> Result<Vec<MonthlyRevenue>> {
        let year = year.unwrap_or_else(current_year);

        let mut series = Vec::with_capacity(12);
        for month in 1..=12 {
            let window = RevenueWindow::month(year, month)?;
            let revenue = self.revenue_in_window(window).await?;
            series.push(MonthlyRevenue::new(month, revenue));
        }

        Ok(series)
    }

    /// Revenue per fee type with its share of the total.
    ///
    /// The requested window (the month when given, otherwise the year) is
    /// reported back but the per-item sums are all-time: the payment sum by
    /// fee item takes no time range. Fee items sharing a label are merged.
    /// With no fee items at all the fixed placeholder distribution is returned.
    pub async fn fee_type_breakdown(
        &self,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<FeeTypeBreakdown> {
        let window = requested_window(year, month)?;
        debug!(
            start = %window.start,
            end = %window.end,
            "Fee type breakdown window (not applied to per-item sums)"
        );

        let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
        for item in self.fee_items.find_all().await? {
            let amount = self
                .payments
                .sum_amount_by_fee_item(item.id)
                .await?
                .unwrap_or(Decimal::ZERO);
            *totals
                .entry(item.fee_type_label().to_string())
                .or_insert(Decimal::ZERO) += amount;
        }

        if totals.is_empty() {
            warn!("No fee items found, serving placeholder fee type distribution");
            return Ok(FeeTypeBreakdown {
                window,
                window_applied: false,
                placeholder: true,
                entries: placeholder_shares(),
            });
        }

        Ok(FeeTypeBreakdown {
            window,
            window_applied: false,
            placeholder: false,
            entries: shares(totals),
        })
    }

    /// Document generation does not exist yet
    pub async fn export_report(
        &self,
        kind: &str,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<Vec<u8>> {
        if kind.trim().is_empty() {
            return Err(AppError::validation("report type must not be empty"));
        }
        let period = ReportPeriod::resolve(year, month)?;

        warn!(
            kind,
            year = period.year,
            month = period.month,
            "Report export requested but not implemented"
        );
        Err(AppError::unimplemented(format!("export of '{}' reports", kind)))
    }

    /// Payments within `[start, end]`; no matching rows sums to zero
    pub async fn revenue_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Decimal> {
        let window = RevenueWindow::new(start, end)?;
        self.revenue_in_window(window).await
    }

    /// Placeholder: expected-minus-paid receivables are not computed
    pub fn unpaid_amount(&self) -> ReportedAmount {
        warn!(amount = %UNPAID_PLACEHOLDER, "Unpaid amount is a placeholder figure");
        ReportedAmount::placeholder(UNPAID_PLACEHOLDER)
    }

    /// Placeholder: there is no refund ledger to read from
    pub fn refund_amount(&self, year: i32, month: u32) -> ReportedAmount {
        warn!(
            year,
            month,
            amount = %REFUND_PLACEHOLDER,
            "Refund amount is a placeholder figure"
        );
        ReportedAmount::placeholder(REFUND_PLACEHOLDER)
    }

    async fn revenue_in_window(&self, window: RevenueWindow) -> Result<Decimal> {
        let sum = self
            .payments
            .sum_amount_by_time_range(window.start, window.end)
            .await?;
        Ok(sum.unwrap_or(Decimal::ZERO))
    }

    fn figure(&self, reported: ReportedAmount) -> ReportFigure {
        ReportFigure::new(reported, self.currency)
    }
}

/// Month window when a month is given, otherwise the whole year
fn requested_window(year: Option<i32>, month: Option<u32>) -> Result<RevenueWindow> {
    let year = year.unwrap_or_else(current_year);
    match month {
        Some(month) => RevenueWindow::month(year, month),
        None => RevenueWindow::year(year),
    }
}
