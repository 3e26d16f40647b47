use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One marketing record at (date, channel, campaign, state) grain.
/// Loaded once per session by the external table loader and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketingEvent {
    pub date: NaiveDate,
    pub channel: String,
    pub campaign: String,
    pub state: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
}

/// One business record per calendar day, after schema mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBusinessRecord {
    pub date: NaiveDate,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub new_customers: f64,
    pub orders: f64,
}

/// A business row as delivered by the loader: a date plus named numeric
/// cells. Mapped into [`DailyBusinessRecord`] through the validated schema
/// in [`crate::schema`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBusinessRow {
    pub date: NaiveDate,
    pub values: HashMap<String, f64>,
}

/// The process-lifetime immutable data store. Every derived view is a pure
/// function of these tables plus the request parameters.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub marketing: Vec<MarketingEvent>,
    pub business: Vec<DailyBusinessRecord>,
}

impl SourceTables {
    pub fn new(marketing: Vec<MarketingEvent>, business: Vec<DailyBusinessRecord>) -> Self {
        Self {
            marketing,
            business,
        }
    }

    /// Sorted distinct channel identifiers present in the marketing table.
    pub fn channels(&self) -> Vec<String> {
        self.marketing
            .iter()
            .map(|e| e.channel.clone())
            .collect::<std::collections::BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Earliest and latest marketing dates, if any rows are loaded.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.marketing.iter().map(|e| e.date).min()?;
        let max = self.marketing.iter().map(|e| e.date).max()?;
        Some((min, max))
    }
}
