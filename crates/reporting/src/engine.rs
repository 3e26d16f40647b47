//! Request/response facade over the analytics modules. Each call validates
//! the request, applies the filter stage, and assembles one page view-model
//! from scratch; nothing is cached between calls.

use chrono::{DateTime, Utc};
use insight_core::schema;
use insight_core::{
    AnalyticsConfig, InsightError, InsightResult, MarketingEvent, RawBusinessRow, SourceTables,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::attribution::{self, AttributionReport};
use crate::filter::{self, FilterRequest};
use crate::kpi::{self, CampaignKpi, ChannelKpi, OverviewSummary};
use crate::lag::{self, ChannelLagScan};
use crate::timeseries::{self, RollingPoint, SpendGrid};

/// Overview page: KPI header, channel table, top campaigns, and the two
/// time-series blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewPage {
    pub summary: OverviewSummary,
    pub channel_kpis: Vec<ChannelKpi>,
    pub top_campaigns: Vec<CampaignKpi>,
    pub spend_by_channel: SpendGrid,
    pub rolling: Vec<RollingPoint>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagDiagnosticsPage {
    pub max_lag_days: u32,
    pub channels: Vec<ChannelLagScan>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionPage {
    pub report: AttributionReport,
    pub generated_at: DateTime<Utc>,
}

/// Owns the immutable source tables for the lifetime of the process and
/// serves synchronous, request-scoped view computations.
#[derive(Debug)]
pub struct InsightEngine {
    tables: SourceTables,
    config: AnalyticsConfig,
}

impl InsightEngine {
    pub fn new(tables: SourceTables, config: AnalyticsConfig) -> Self {
        info!(
            marketing_rows = tables.marketing.len(),
            business_rows = tables.business.len(),
            "Insight engine initialized"
        );
        Self { tables, config }
    }

    /// Build an engine from loader output, mapping the loosely-typed
    /// business rows through the configured schema.
    pub fn from_raw(
        marketing: Vec<MarketingEvent>,
        business: Vec<RawBusinessRow>,
        config: AnalyticsConfig,
    ) -> InsightResult<Self> {
        let business = schema::map_business_rows(&config.schema, &business)?;
        Ok(Self::new(SourceTables::new(marketing, business), config))
    }

    pub fn tables(&self) -> &SourceTables {
        &self.tables
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// KPI summary, channel table, top campaigns, and time series for the
    /// requested filter window.
    pub fn overview(&self, request: &FilterRequest) -> InsightResult<OverviewPage> {
        request.validate()?;
        let view = filter::apply(&self.tables, request);
        debug!(
            marketing_rows = view.marketing.len(),
            business_rows = view.business.len(),
            "Overview recomputed"
        );

        Ok(OverviewPage {
            summary: kpi::overview_summary(&view),
            channel_kpis: kpi::channel_kpis(&view),
            top_campaigns: kpi::top_campaigns(&view, self.config.top_campaigns_limit),
            spend_by_channel: timeseries::daily_spend_by_channel(&view),
            rolling: timeseries::revenue_spend_rolling(&view, self.config.rolling_window_days),
            generated_at: Utc::now(),
        })
    }

    /// Lag scan for every requested channel. `max_lag` of `None` uses the
    /// configured default; values beyond the cap are rejected.
    pub fn lag_diagnostics(
        &self,
        request: &FilterRequest,
        max_lag: Option<u32>,
    ) -> InsightResult<LagDiagnosticsPage> {
        request.validate()?;
        let max_lag = max_lag.unwrap_or(self.config.default_max_lag_days);
        if max_lag > self.config.max_lag_cap {
            return Err(InsightError::Validation(format!(
                "max lag {max_lag} exceeds cap {}",
                self.config.max_lag_cap
            )));
        }

        let view = filter::apply(&self.tables, request);
        let channels = lag::scan_channels(&view, request, max_lag);
        debug!(
            channels = channels.len(),
            max_lag, "Lag diagnostics recomputed"
        );

        Ok(LagDiagnosticsPage {
            max_lag_days: max_lag,
            channels,
            generated_at: Utc::now(),
        })
    }

    /// Proportional new-customer attribution for the requested window.
    pub fn acquisition(&self, request: &FilterRequest) -> InsightResult<AcquisitionPage> {
        request.validate()?;
        let view = filter::apply(&self.tables, request);
        let report = attribution::attribute_new_customers(&view, self.config.attribution_sample_rows);
        debug!(rows = report.rows.len(), "Acquisition attribution recomputed");

        Ok(AcquisitionPage {
            report,
            generated_at: Utc::now(),
        })
    }
}
