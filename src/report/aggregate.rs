//! Grouping and summation over fetched rows.
//!
//! Everything here is a pure fold over rows that were already fetched;
//! nothing touches the database and nothing can fail.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::{day_of, embedded_name, Amount, Embedded, EntryKind, NameRef};

/// A named total, e.g. one category or one customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub name: String,
    pub total: f64,
}

/// A transaction-like row: an amount and an optional category name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategorizedAmount {
    #[serde(default)]
    pub amount: Amount,
    #[serde(default)]
    pub category: Option<Embedded<NameRef>>,
}

impl CategorizedAmount {
    pub fn new(amount: f64, category: Option<&str>) -> Self {
        Self {
            amount: Amount(amount),
            category: category.map(|name| {
                Embedded::One(NameRef {
                    name: Some(name.to_string()),
                })
            }),
        }
    }

    pub fn category_name(&self) -> Option<&str> {
        embedded_name(&self.category)
    }
}

/// An invoice-like row: a total and an optional customer or supplier name
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyAmount {
    #[serde(default)]
    pub total_amount: Amount,
    #[serde(default)]
    pub customer: Option<Embedded<NameRef>>,
    #[serde(default)]
    pub supplier: Option<Embedded<NameRef>>,
}

impl PartyAmount {
    pub fn customer(total: f64, name: Option<&str>) -> Self {
        Self {
            total_amount: Amount(total),
            customer: name.map(|n| {
                Embedded::One(NameRef {
                    name: Some(n.to_string()),
                })
            }),
            supplier: None,
        }
    }

    pub fn supplier(total: f64, name: Option<&str>) -> Self {
        Self {
            total_amount: Amount(total),
            customer: None,
            supplier: name.map(|n| {
                Embedded::One(NameRef {
                    name: Some(n.to_string()),
                })
            }),
        }
    }

    pub fn party_name(&self) -> Option<&str> {
        embedded_name(&self.customer).or_else(|| embedded_name(&self.supplier))
    }
}

/// A dated income or expense row used for the daily chart
#[derive(Debug, Clone, Deserialize)]
pub struct DatedAmount {
    /// Either a plain date or a timestamp; only the date part is used
    pub date: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub amount: Amount,
}

impl DatedAmount {
    pub fn day(&self) -> Option<NaiveDate> {
        day_of(&self.date)
    }
}

/// One day of the income/expense chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: f64,
    pub expense: f64,
}

pub fn sum_amounts<T, A>(rows: &[T], amount: A) -> f64
where
    A: Fn(&T) -> f64,
{
    rows.iter().map(amount).fold(0.0, |acc, v| acc + v)
}

/// Sum `amount` per key, keeping groups in first-encounter order.
/// Rows without a key are collected under `fallback`.
pub fn group_totals<T, K, A>(rows: &[T], key: K, amount: A, fallback: &str) -> Vec<GroupTotal>
where
    K: Fn(&T) -> Option<&str>,
    A: Fn(&T) -> f64,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut totals: Vec<GroupTotal> = Vec::new();

    for row in rows {
        let name = key(row).unwrap_or(fallback);
        let value = amount(row);
        match index.get(name) {
            Some(&i) => totals[i].total += value,
            None => {
                index.insert(name.to_string(), totals.len());
                totals.push(GroupTotal {
                    name: name.to_string(),
                    total: value,
                });
            }
        }
    }

    totals
}

/// Largest `n` totals, descending; equal totals keep their incoming order
pub fn top_n(mut totals: Vec<GroupTotal>, n: usize) -> Vec<GroupTotal> {
    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals.truncate(n);
    totals
}

pub fn totals_by_category(rows: &[CategorizedAmount], fallback: &str) -> Vec<GroupTotal> {
    group_totals(
        rows,
        CategorizedAmount::category_name,
        |r| r.amount.value(),
        fallback,
    )
}

pub fn top_parties(rows: &[PartyAmount], fallback: &str, n: usize) -> Vec<GroupTotal> {
    let totals = group_totals(
        rows,
        PartyAmount::party_name,
        |r| r.total_amount.value(),
        fallback,
    );
    top_n(totals, n)
}

/// Longest chart `daily_series` will build
pub const MAX_CHART_DAYS: u32 = 366;

/// `days` before `day`, saturating at the earliest representable date
pub fn days_before(day: NaiveDate, days: u32) -> NaiveDate {
    day.checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// First day of a `days`-long chart ending at `end`; `days` is capped at
/// [`MAX_CHART_DAYS`]
pub fn series_start(end: NaiveDate, days: u32) -> NaiveDate {
    days_before(end, days.clamp(1, MAX_CHART_DAYS) - 1)
}

/// Income and expense per day for the `days` days ending at `end`, oldest first
pub fn daily_series(rows: &[DatedAmount], end: NaiveDate, days: u32) -> Vec<DailyPoint> {
    if days == 0 {
        return Vec::new();
    }
    let start = series_start(end, days);

    let mut points: Vec<DailyPoint> = start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|date| DailyPoint {
            date,
            income: 0.0,
            expense: 0.0,
        })
        .collect();

    for row in rows {
        let Some(day) = row.day() else { continue };
        if day < start || day > end {
            continue;
        }
        let Some(point) = points.get_mut((day - start).num_days() as usize) else {
            continue;
        };
        match row.kind {
            EntryKind::Income => point.income += row.amount.value(),
            EntryKind::Expense => point.expense += row.amount.value(),
        }
    }

    points
}

/// Share of `new` in `total` as a percentage; zero when either side is zero
pub fn growth_percent(new: u64, total: u64) -> f64 {
    if new == 0 || total == 0 {
        return 0.0;
    }
    new as f64 / total as f64 * 100.0
}
