use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ReportSettings {
    pub top_n: usize,
    /// Label for transactions without a category in report groupings
    pub uncategorized_label: String,
    /// Label for invoices whose customer or supplier could not be resolved
    pub unknown_party_label: String,
    /// Label for uncategorized rows in the dashboard's recent list
    pub recent_uncategorized_label: String,
    pub recent_limit: usize,
    pub chart_days: u32,
    pub growth_window_days: u32,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            uncategorized_label: "Diğer".to_string(),
            unknown_party_label: "Bilinmeyen".to_string(),
            recent_uncategorized_label: "Kategorisiz".to_string(),
            recent_limit: 10,
            chart_days: 7,
            growth_window_days: 30,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: "₺".to_string(),
        }
    }
}
