pub mod config;
pub mod display;
pub mod error;
pub mod model;
pub mod notify;
pub mod remote;
pub mod report;

pub use config::{Config, DatabaseSettings, DisplaySettings, ReportSettings};
pub use error::{BooksError, Result};
pub use remote::{Database, MemoryDatabase, Query, RestClient};
pub use report::{build_dashboard, build_report, DashboardStats, DateRange, FinancialReport};
