use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::amount::{embedded_name, Embedded, NameRef};
use super::day::deserialize_day;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_uppercase())
    }
}

/// Which side of the business an invoice is issued to or received from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counterparty<'a> {
    Customer(&'a str),
    Supplier(&'a str),
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Invoice {
    pub id: String,
    pub invoice_number: String,
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    #[serde(deserialize_with = "deserialize_day")]
    pub due_date: NaiveDate,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub supplier_id: Option<String>,
    pub total_amount: f64,
    #[serde(default)]
    pub vat_amount: f64,
    pub status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Embedded<NameRef>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Embedded<NameRef>>,
}

impl Invoice {
    /// The referenced customer or supplier. Exclusivity is not enforced by the
    /// database; when both are set the customer wins.
    pub fn counterparty(&self) -> Option<Counterparty<'_>> {
        match (self.customer_id.as_deref(), self.supplier_id.as_deref()) {
            (Some(id), _) => Some(Counterparty::Customer(id)),
            (None, Some(id)) => Some(Counterparty::Supplier(id)),
            (None, None) => None,
        }
    }

    /// Name of the embedded counterparty row, if it was selected
    pub fn counterparty_name(&self) -> Option<&str> {
        match self.counterparty()? {
            Counterparty::Customer(_) => embedded_name(&self.customer),
            Counterparty::Supplier(_) => embedded_name(&self.supplier),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct InvoiceItem {
    pub id: String,
    pub invoice_id: String,
    pub product_id: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub vat_rate: f64,
    #[serde(default)]
    pub vat_amount: f64,
    pub total_amount: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invoice(customer: Option<&str>, supplier: Option<&str>) -> Invoice {
        serde_json::from_value(json!({
            "id": "inv-1",
            "invoice_number": "F-001",
            "date": "2024-03-01",
            "due_date": "2024-03-31",
            "customer_id": customer,
            "supplier_id": supplier,
            "total_amount": 1180.0,
            "vat_amount": 180.0,
            "status": "pending",
            "customer": {"name": "Acme"},
            "supplier": {"name": "Tedarik AŞ"}
        }))
        .unwrap()
    }

    #[test]
    fn counterparty_follows_the_set_side() {
        assert_eq!(
            invoice(Some("c1"), None).counterparty(),
            Some(Counterparty::Customer("c1"))
        );
        assert_eq!(
            invoice(None, Some("s1")).counterparty(),
            Some(Counterparty::Supplier("s1"))
        );
        assert_eq!(invoice(None, None).counterparty(), None);
    }

    #[test]
    fn counterparty_prefers_customer_when_both_are_set() {
        let inv = invoice(Some("c1"), Some("s1"));
        assert_eq!(inv.counterparty(), Some(Counterparty::Customer("c1")));
        assert_eq!(inv.counterparty_name(), Some("Acme"));
    }

    #[test]
    fn status_parses_and_displays() {
        let inv = invoice(Some("c1"), None);
        assert_eq!(inv.status, PaymentStatus::Pending);
        assert_eq!(inv.status.to_string(), "PENDING");
        assert_eq!(inv.counterparty_name(), Some("Acme"));
    }
}
