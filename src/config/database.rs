use serde::{Deserialize, Serialize};

fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for the hosted database
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// User JWT; the API key is sent as the bearer token when absent
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            access_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DatabaseSettings {
    /// Apply BOOKS_DATABASE_URL, BOOKS_API_KEY and BOOKS_ACCESS_TOKEN overrides
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("BOOKS_DATABASE_URL") {
            self.url = Some(url);
        }
        if let Some(key) = lookup("BOOKS_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(token) = lookup("BOOKS_ACCESS_TOKEN") {
            self.access_token = Some(token);
        }
        self
    }
}
