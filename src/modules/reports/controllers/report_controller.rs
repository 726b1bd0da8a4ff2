use actix_web::{web, HttpResponse};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AppError, Currency, Result};
use crate::modules::reports::models::{
    FeeTypeBreakdown, FeeTypeShare, FinancialStats, MonthlyRevenue, ReportFigure,
};
use crate::modules::reports::services::ReportService;

/// Datetime layout accepted by the revenue range endpoint
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Query parameters for the revenue range endpoint (format: YYYY-MM-DDTHH:MM:SS)
#[derive(Debug, Deserialize)]
pub struct RevenueRangeQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
}

/// Amounts are rendered as strings to keep decimal precision in JSON
#[derive(Debug, Serialize)]
pub struct FigureResponse {
    pub amount: String,
    pub formatted: String,
    pub placeholder: bool,
}

#[derive(Debug, Serialize)]
pub struct FinancialStatsResponse {
    pub year: i32,
    pub month: u32,
    pub monthly_revenue: FigureResponse,
    pub yearly_revenue: FigureResponse,
    pub unpaid_amount: FigureResponse,
    pub refund_amount: FigureResponse,
}

#[derive(Debug, Serialize)]
pub struct MonthlyRevenueResponse {
    pub month: u32,
    pub label: String,
    pub revenue: String,
}

#[derive(Debug, Serialize)]
pub struct FeeTypeShareResponse {
    pub fee_type: String,
    pub amount: String,
    pub percentage: String,
}

#[derive(Debug, Serialize)]
pub struct FeeTypeBreakdownResponse {
    pub start: String,
    pub end: String,
    pub window_applied: bool,
    pub placeholder: bool,
    pub total: String,
    pub entries: Vec<FeeTypeShareResponse>,
}

#[derive(Debug, Serialize)]
pub struct RevenueRangeResponse {
    pub start: String,
    pub end: String,
    pub revenue: String,
    pub formatted: String,
}

impl From<ReportFigure> for FigureResponse {
    fn from(figure: ReportFigure) -> Self {
        Self {
            amount: figure.amount.to_string(),
            formatted: figure.formatted,
            placeholder: figure.placeholder,
        }
    }
}

impl From<FinancialStats> for FinancialStatsResponse {
    fn from(stats: FinancialStats) -> Self {
        Self {
            year: stats.year,
            month: stats.month,
            monthly_revenue: stats.monthly_revenue.into(),
            yearly_revenue: stats.yearly_revenue.into(),
            unpaid_amount: stats.unpaid_amount.into(),
            refund_amount: stats.refund_amount.into(),
        }
    }
}

impl From<MonthlyRevenue> for MonthlyRevenueResponse {
    fn from(entry: MonthlyRevenue) -> Self {
        Self {
            month: entry.month,
            label: entry.label,
            revenue: entry.revenue.to_string(),
        }
    }
}

impl From<FeeTypeShare> for FeeTypeShareResponse {
    fn from(share: FeeTypeShare) -> Self {
        Self {
            fee_type: share.fee_type,
            amount: share.amount.to_string(),
            percentage: share.percentage.to_string(),
        }
    }
}

impl From<FeeTypeBreakdown> for FeeTypeBreakdownResponse {
    fn from(breakdown: FeeTypeBreakdown) -> Self {
        Self {
            start: breakdown.window.start.format(DATETIME_FORMAT).to_string(),
            end: breakdown.window.end.format(DATETIME_FORMAT).to_string(),
            window_applied: breakdown.window_applied,
            placeholder: breakdown.placeholder,
            total: breakdown.total().to_string(),
            entries: breakdown
                .entries
                .into_iter()
                .map(FeeTypeShareResponse::from)
                .collect(),
        }
    }
}

fn parse_datetime(field: &str, value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT).map_err(|_| {
        AppError::validation(format!(
            "Invalid {} format: '{}'. Expected YYYY-MM-DDTHH:MM:SS",
            field, value
        ))
    })
}

/// GET /api/reports/financial/stats?year=&month=
pub async fn get_financial_stats(
    service: web::Data<ReportService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let stats = service.financial_stats(query.year, query.month).await?;
    Ok(HttpResponse::Ok().json(FinancialStatsResponse::from(stats)))
}

/// GET /api/reports/financial/monthly-revenue?year=
pub async fn get_monthly_revenue(
    service: web::Data<ReportService>,
    query: web::Query<YearQuery>,
) -> Result<HttpResponse> {
    let series: Vec<MonthlyRevenueResponse> = service
        .monthly_revenue_series(query.year)
        .await?
        .into_iter()
        .map(MonthlyRevenueResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(series))
}

/// GET /api/reports/financial/fee-types?year=&month=
///
/// Amounts are all-time per fee type; the response echoes the requested
/// window with `window_applied: false`.
pub async fn get_fee_type_breakdown(
    service: web::Data<ReportService>,
    query: web::Query<PeriodQuery>,
) -> Result<HttpResponse> {
    let breakdown = service.fee_type_breakdown(query.year, query.month).await?;
    Ok(HttpResponse::Ok().json(FeeTypeBreakdownResponse::from(breakdown)))
}

/// GET /api/reports/financial/revenue?start=&end=
pub async fn get_revenue_in_range(
    service: web::Data<ReportService>,
    query: web::Query<RevenueRangeQuery>,
) -> Result<HttpResponse> {
    let start = parse_datetime("start", &query.start)?;
    let end = parse_datetime("end", &query.end)?;
    debug!(%start, %end, "Revenue range requested");

    let revenue = service.revenue_in_range(start, end).await?;
    let currency: Currency = service.currency();

    Ok(HttpResponse::Ok().json(RevenueRangeResponse {
        start: start.format(DATETIME_FORMAT).to_string(),
        end: end.format(DATETIME_FORMAT).to_string(),
        revenue: revenue.to_string(),
        formatted: currency.format_amount(revenue),
    }))
}

/// GET /api/reports/financial/export?type=&year=&month=
pub async fn export_report(
    service: web::Data<ReportService>,
    query: web::Query<ExportQuery>,
) -> Result<HttpResponse> {
    let document = service
        .export_report(&query.kind, query.year, query.month)
        .await?;
    Ok(HttpResponse::Ok()
        .content_type("application/octet-stream")
        .body(document))
}

/// Configure routes for the reports module
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/reports/financial")
            .route("/stats", web::get().to(get_financial_stats))
            .route("/monthly-revenue", web::get().to(get_monthly_revenue))
            .route("/fee-types", web::get().to(get_fee_type_breakdown))
            .route("/revenue", web::get().to(get_revenue_in_range))
            .route("/export", web::get().to(export_report)),
    );
}
