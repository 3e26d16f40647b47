pub mod config;
pub mod error;
pub mod schema;
pub mod types;

pub use config::AnalyticsConfig;
pub use error::{InsightError, InsightResult};
pub use types::{DailyBusinessRecord, MarketingEvent, RawBusinessRow, SourceTables};
