use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::{embedded_name, Embedded, NameRef};
use super::category::EntryKind;
use super::day::deserialize_day;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    BankTransfer,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::CreditCard => write!(f, "credit card"),
            PaymentMethod::BankTransfer => write!(f, "bank transfer"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Transaction {
    pub id: String,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub category_id: Option<String>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Present when selected with `category:categories(name)`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Embedded<NameRef>>,
}

impl Transaction {
    pub fn category_name(&self) -> Option<&str> {
        embedded_name(&self.category)
    }
}
