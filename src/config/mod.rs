mod database;
mod report;

pub use database::DatabaseSettings;
pub use report::{DisplaySettings, ReportSettings};

use crate::error::{BooksError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

/// Get the config directory path (~/.books/)
pub fn config_dir() -> Result<PathBuf> {
    // First try XDG-style directories
    if let Some(proj_dirs) = ProjectDirs::from("", "", "books") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    // Fallback to ~/.books/
    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
        BooksError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".books"))
}

/// Load config.toml from the config directory
pub fn load_config(config_dir: &Path) -> Result<Config> {
    if !config_dir.exists() {
        return Err(BooksError::ConfigNotFound(config_dir.to_path_buf()));
    }
    let path = config_dir.join("config.toml");
    if !path.exists() {
        return Err(BooksError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    parse_config(&content).map_err(|e| BooksError::ConfigParse { path, source: e })
}

fn parse_config(content: &str) -> std::result::Result<Config, toml::de::Error> {
    let config: Config = toml::from_str(content)?;
    Ok(Config {
        database: config
            .database
            .with_env_overrides(|name| std::env::var(name).ok()),
        ..config
    })
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[database]
url = "https://your-project.supabase.co"
api_key = "your-anon-key"
# access_token = "eyJ..."   # optional user JWT, defaults to api_key
timeout_secs = 10

# BOOKS_DATABASE_URL, BOOKS_API_KEY and BOOKS_ACCESS_TOKEN override the values above.

[report]
top_n = 5                              # customers/suppliers shown in reports
uncategorized_label = "Diğer"
unknown_party_label = "Bilinmeyen"
recent_uncategorized_label = "Kategorisiz"
recent_limit = 10
chart_days = 7
growth_window_days = 30

[display]
currency_symbol = "₺"
"#;
