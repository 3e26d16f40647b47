//! Filter stage — narrows the source tables to a date window, a channel
//! subset, and an optional exact-match state.

use chrono::NaiveDate;
use insight_core::{
    DailyBusinessRecord, InsightError, InsightResult, MarketingEvent, SourceTables,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Filter parameters for one view computation. Carried explicitly into the
/// pure functions downstream; there is no implicit session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub channels: Vec<String>,
    /// Exact, case-sensitive state match. Blank or whitespace means "all".
    pub state: Option<String>,
}

impl FilterRequest {
    pub fn new(start: NaiveDate, end: NaiveDate, channels: Vec<String>) -> Self {
        Self {
            start,
            end,
            channels,
            state: None,
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn validate(&self) -> InsightResult<()> {
        if self.start > self.end {
            return Err(InsightError::Validation(format!(
                "date range start {} is after end {}",
                self.start, self.end
            )));
        }
        if self.channels.is_empty() {
            return Err(InsightError::Validation(
                "channel set must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// The effective state filter: trimmed, `None` when blank.
    pub fn state_filter(&self) -> Option<&str> {
        self.state
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Read-only subset of the source tables for one request. Empty views are
/// legal; downstream aggregates yield zero sums and NaN ratios.
#[derive(Debug, Clone, Default)]
pub struct FilteredView {
    pub marketing: Vec<MarketingEvent>,
    pub business: Vec<DailyBusinessRecord>,
}

/// Apply the filter stage. The marketing table is restricted by date,
/// channel, and state; the business table by date only.
pub fn apply(tables: &SourceTables, request: &FilterRequest) -> FilteredView {
    let channels: HashSet<&str> = request.channels.iter().map(String::as_str).collect();
    let state = request.state_filter();

    let marketing = tables
        .marketing
        .iter()
        .filter(|e| e.date >= request.start && e.date <= request.end)
        .filter(|e| channels.contains(e.channel.as_str()))
        .filter(|e| state.is_none_or(|s| e.state == s))
        .cloned()
        .collect();

    let business = tables
        .business
        .iter()
        .filter(|r| r.date >= request.start && r.date <= request.end)
        .cloned()
        .collect();

    FilteredView {
        marketing,
        business,
    }
}
