use serde::Deserialize;

use crate::error::{InsightError, InsightResult};
use crate::schema::BusinessColumns;

/// Root analytics configuration. Loaded from environment variables with the
/// prefix `MARKETING_INSIGHTS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyticsConfig {
    /// Trailing window for the rolling revenue/spend averages.
    #[serde(default = "default_rolling_window_days")]
    pub rolling_window_days: usize,
    /// Lag scan half-width used when the request does not choose one.
    #[serde(default = "default_max_lag_days")]
    pub default_max_lag_days: u32,
    /// Hard upper bound on the lag scan half-width.
    #[serde(default = "default_max_lag_cap")]
    pub max_lag_cap: u32,
    #[serde(default = "default_top_campaigns_limit")]
    pub top_campaigns_limit: usize,
    /// Rows kept in the daily attribution breakdown sample.
    #[serde(default = "default_attribution_sample_rows")]
    pub attribution_sample_rows: usize,
    #[serde(default)]
    pub schema: BusinessColumns,
}

fn default_rolling_window_days() -> usize {
    7
}
fn default_max_lag_days() -> u32 {
    14
}
fn default_max_lag_cap() -> u32 {
    30
}
fn default_top_campaigns_limit() -> usize {
    15
}
fn default_attribution_sample_rows() -> usize {
    50
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            rolling_window_days: default_rolling_window_days(),
            default_max_lag_days: default_max_lag_days(),
            max_lag_cap: default_max_lag_cap(),
            top_campaigns_limit: default_top_campaigns_limit(),
            attribution_sample_rows: default_attribution_sample_rows(),
            schema: BusinessColumns::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load configuration from environment variables.
    pub fn load() -> InsightResult<Self> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("MARKETING_INSIGHTS")
                .separator("__")
                .try_parsing(true)
                .list_separator(","),
        );

        let config = builder
            .build()
            .map_err(|e| InsightError::Config(e.to_string()))?;
        config
            .try_deserialize()
            .map_err(|e| InsightError::Config(e.to_string()))
    }
}
