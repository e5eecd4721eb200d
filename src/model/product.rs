use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit: String,
    pub price: f64,
    /// Percentage, e.g. 18 for 18%
    #[serde(default)]
    pub vat_rate: f64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
