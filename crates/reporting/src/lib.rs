//! Marketing analytics over immutable source tables — filtering, channel
//! KPI aggregation, rolling time series, lag/cross-correlation diagnostics,
//! and proportional acquisition attribution.

pub mod attribution;
pub mod engine;
pub mod export;
pub mod filter;
pub mod kpi;
pub mod lag;
pub mod stats;
pub mod timeseries;

#[cfg(test)]
pub(crate) mod testutil;

pub use attribution::{AttributionReport, AttributionRow, ChannelAttribution};
pub use engine::{AcquisitionPage, InsightEngine, LagDiagnosticsPage, OverviewPage};
pub use filter::{FilterRequest, FilteredView};
pub use kpi::{CampaignKpi, ChannelKpi, OverviewSummary};
pub use lag::{ChannelLagScan, LagPoint};
pub use timeseries::{RollingPoint, SpendGrid, SpendGridRow};
