use serde::Serialize;

use super::aggregate::{
    sum_amounts, top_parties, totals_by_category, CategorizedAmount, GroupTotal, PartyAmount,
};
use super::DateRange;
use crate::config::ReportSettings;
use crate::error::{BooksError, Result};
use crate::model::EntryKind;
use crate::remote::{fetch, Database, Query};

/// Income/expense summary with category breakdowns and top counterparties
#[derive(Debug, Clone, Serialize)]
pub struct FinancialReport {
    pub range: DateRange,
    pub total_income: f64,
    pub total_expense: f64,
    pub net_income: f64,
    pub income_by_category: Vec<GroupTotal>,
    pub expense_by_category: Vec<GroupTotal>,
    pub top_customers: Vec<GroupTotal>,
    pub top_suppliers: Vec<GroupTotal>,
}

fn transactions_query(kind: EntryKind, range: DateRange) -> Query {
    Query::table("transactions")
        .select("amount, category:categories(name)")
        .eq("type", kind)
        .gte("date", range.start)
        .lte("date", range.end)
}

fn invoices_query(party: &str, range: DateRange) -> Query {
    let table = format!("{party}s");
    Query::table("invoices")
        .select(format!("total_amount, {party}:{table}(name)"))
        .not_null(&format!("{party}_id"))
        .gte("date", range.start)
        .lte("date", range.end)
}

/// Fetch the rows for `range` and fold them into a report
pub fn build_report<D>(db: &D, range: DateRange, settings: &ReportSettings) -> Result<FinancialReport>
where
    D: Database + ?Sized,
{
    if settings.top_n == 0 {
        return Err(BooksError::InvalidTopN);
    }
    tracing::info!(start = %range.start, end = %range.end, "building report");

    let income: Vec<CategorizedAmount> =
        fetch(db, &transactions_query(EntryKind::Income, range))?;
    let expense: Vec<CategorizedAmount> =
        fetch(db, &transactions_query(EntryKind::Expense, range))?;
    let customer_invoices: Vec<PartyAmount> = fetch(db, &invoices_query("customer", range))?;
    let supplier_invoices: Vec<PartyAmount> = fetch(db, &invoices_query("supplier", range))?;

    Ok(fold_report(
        range,
        &income,
        &expense,
        &customer_invoices,
        &supplier_invoices,
        settings,
    ))
}

fn fold_report(
    range: DateRange,
    income: &[CategorizedAmount],
    expense: &[CategorizedAmount],
    customer_invoices: &[PartyAmount],
    supplier_invoices: &[PartyAmount],
    settings: &ReportSettings,
) -> FinancialReport {
    let total_income = sum_amounts(income, |t| t.amount.value());
    let total_expense = sum_amounts(expense, |t| t.amount.value());

    FinancialReport {
        range,
        total_income,
        total_expense,
        net_income: total_income - total_expense,
        income_by_category: totals_by_category(income, &settings.uncategorized_label),
        expense_by_category: totals_by_category(expense, &settings.uncategorized_label),
        top_customers: top_parties(
            customer_invoices,
            &settings.unknown_party_label,
            settings.top_n,
        ),
        top_suppliers: top_parties(
            supplier_invoices,
            &settings.unknown_party_label,
            settings.top_n,
        ),
    }
}
