use serde::{Deserialize, Serialize};

/// A customer or supplier row; both tables share the same columns
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Party {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tax_number: Option<String>,
    #[serde(default)]
    pub tax_office: Option<String>,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

pub type Customer = Party;
pub type Supplier = Party;
