use std::fmt;
use std::str::FromStr;

use crate::error::BooksError;
use crate::remote::Query;

/// Tables exposed by the hosted database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Profiles,
    Customers,
    Suppliers,
    Products,
    Categories,
    Transactions,
    Invoices,
    InvoiceItems,
    BankAccounts,
}

impl Table {
    pub const ALL: [Table; 9] = [
        Table::Profiles,
        Table::Customers,
        Table::Suppliers,
        Table::Products,
        Table::Categories,
        Table::Transactions,
        Table::Invoices,
        Table::InvoiceItems,
        Table::BankAccounts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::Customers => "customers",
            Table::Suppliers => "suppliers",
            Table::Products => "products",
            Table::Categories => "categories",
            Table::Transactions => "transactions",
            Table::Invoices => "invoices",
            Table::InvoiceItems => "invoice_items",
            Table::BankAccounts => "bank_accounts",
        }
    }

    /// Query used by `books list`: all columns, related names, default order
    pub fn listing_query(self) -> Query {
        let query = Query::table(self.name());
        match self {
            Table::Profiles => query.order_asc("email"),
            Table::Customers | Table::Suppliers | Table::Products => query.order_asc("name"),
            Table::Categories => query.order_asc("type").order_asc("name"),
            Table::Transactions => query
                .select("*, category:categories(name)")
                .order_desc("date"),
            Table::Invoices => query
                .select("*, customer:customers(name), supplier:suppliers(name)")
                .order_desc("date"),
            Table::InvoiceItems => query.order_asc("created_at"),
            Table::BankAccounts => query.order_asc("bank_name"),
        }
    }

    fn names() -> String {
        Self::ALL
            .iter()
            .map(|t| t.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Table {
    type Err = BooksError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|t| t.name() == normalized)
            .ok_or_else(|| BooksError::UnknownTable(s.to_string(), Self::names()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_table_names_leniently() {
        assert_eq!("customers".parse::<Table>().unwrap(), Table::Customers);
        assert_eq!("bank-accounts".parse::<Table>().unwrap(), Table::BankAccounts);
        assert_eq!("Invoice_Items".parse::<Table>().unwrap(), Table::InvoiceItems);
    }

    #[test]
    fn unknown_table_lists_the_valid_ones() {
        let err = "ledger".parse::<Table>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ledger"));
        assert!(message.contains("bank_accounts"));
    }

    #[test]
    fn listing_queries_embed_related_names() {
        let params = Table::Invoices.listing_query().params();
        assert!(params.contains(&(
            "select".to_string(),
            "*, customer:customers(name), supplier:suppliers(name)".to_string()
        )));
        assert!(params.contains(&("order".to_string(), "date.desc".to_string())));

        let params = Table::Categories.listing_query().params();
        assert!(params.contains(&("order".to_string(), "type.asc,name.asc".to_string())));
    }
}
