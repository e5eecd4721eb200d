use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::aggregate::{
    daily_series, days_before, growth_percent, series_start, sum_amounts, DailyPoint, DatedAmount,
};
use super::first_of_month;
use crate::config::ReportSettings;
use crate::error::Result;
use crate::model::{deserialize_day, embedded_name, Amount, Embedded, EntryKind, NameRef};
use crate::remote::{fetch, Database, Query};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub today: NaiveDate,
    pub total_customers: u64,
    pub new_customers: u64,
    /// New customers within the growth window as a share of all customers
    pub customer_growth: f64,
    pub total_sales: f64,
    pub pending_payments: f64,
    pub pending_invoices: usize,
    pub monthly_income: f64,
    pub recent_transactions: Vec<RecentTransaction>,
    pub chart: Vec<DailyPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentTransaction {
    pub id: String,
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub amount: f64,
    pub description: Option<String>,
    pub category: String,
}

#[derive(Debug, Deserialize)]
struct InvoiceStatusRow {
    #[serde(default)]
    total_amount: Amount,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AmountRow {
    #[serde(default)]
    amount: Amount,
}

#[derive(Debug, Deserialize)]
struct RecentRow {
    id: String,
    #[serde(deserialize_with = "deserialize_day")]
    date: NaiveDate,
    #[serde(rename = "type")]
    kind: EntryKind,
    #[serde(default)]
    amount: Amount,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<Embedded<NameRef>>,
}

/// Fetch the headline figures shown on the dashboard as of `today`
pub fn build_dashboard<D>(db: &D, today: NaiveDate, settings: &ReportSettings) -> Result<DashboardStats>
where
    D: Database + ?Sized,
{
    tracing::info!(%today, "building dashboard");

    let total_customers = db.count(&Query::table("customers"))?;
    let window_start = days_before(today, settings.growth_window_days);
    let new_customers = db.count(&Query::table("customers").gte("created_at", window_start))?;

    let invoices: Vec<InvoiceStatusRow> =
        fetch(db, &Query::table("invoices").select("total_amount, status"))?;
    let pending: Vec<&InvoiceStatusRow> = invoices
        .iter()
        .filter(|inv| inv.status.as_deref() == Some("pending"))
        .collect();

    let monthly: Vec<AmountRow> = fetch(
        db,
        &Query::table("transactions")
            .select("amount")
            .eq("type", EntryKind::Income)
            .gte("date", first_of_month(today)),
    )?;

    let recent: Vec<RecentRow> = fetch(
        db,
        &Query::table("transactions")
            .select("id, date, type, amount, description, category:categories(name)")
            .order_desc("date")
            .limit(settings.recent_limit),
    )?;

    let chart_start = series_start(today, settings.chart_days);
    let chart_rows: Vec<DatedAmount> = fetch(
        db,
        &Query::table("transactions")
            .select("date, type, amount")
            .gte("date", chart_start)
            .lte("date", today),
    )?;

    Ok(DashboardStats {
        today,
        total_customers,
        new_customers,
        customer_growth: growth_percent(new_customers, total_customers),
        total_sales: sum_amounts(&invoices, |inv| inv.total_amount.value()),
        pending_payments: sum_amounts(&pending, |inv| inv.total_amount.value()),
        pending_invoices: pending.len(),
        monthly_income: sum_amounts(&monthly, |t| t.amount.value()),
        recent_transactions: recent
            .into_iter()
            .map(|row| RecentTransaction {
                category: embedded_name(&row.category)
                    .unwrap_or(settings.recent_uncategorized_label.as_str())
                    .to_string(),
                id: row.id,
                date: row.date,
                kind: row.kind,
                amount: row.amount.value(),
                description: row.description,
            })
            .collect(),
        chart: daily_series(&chart_rows, today, settings.chart_days),
    })
}
