//! Shared test fixtures.

use chrono::NaiveDate;
use insight_core::{DailyBusinessRecord, MarketingEvent, SourceTables};

use crate::filter::{self, FilterRequest, FilteredView};

pub fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[allow(clippy::too_many_arguments)]
pub fn event(
    date_s: &str,
    channel: &str,
    campaign: &str,
    state: &str,
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
) -> MarketingEvent {
    MarketingEvent {
        date: date(date_s),
        channel: channel.to_string(),
        campaign: campaign.to_string(),
        state: state.to_string(),
        impressions,
        clicks,
        spend,
        attributed_revenue,
    }
}

pub fn business_record(
    date_s: &str,
    total_revenue: f64,
    gross_profit: f64,
    new_customers: f64,
    orders: f64,
) -> DailyBusinessRecord {
    DailyBusinessRecord {
        date: date(date_s),
        total_revenue,
        gross_profit,
        new_customers,
        orders,
    }
}

pub fn tables(
    marketing: Vec<MarketingEvent>,
    business: Vec<DailyBusinessRecord>,
) -> SourceTables {
    SourceTables::new(marketing, business)
}

pub fn request(start: &str, end: &str, channels: &[&str]) -> FilterRequest {
    FilterRequest::new(
        date(start),
        date(end),
        channels.iter().map(|c| c.to_string()).collect(),
    )
}

/// Filtered view over the whole fixture, no state filter.
pub fn view(
    marketing: Vec<MarketingEvent>,
    business: Vec<DailyBusinessRecord>,
    start: &str,
    end: &str,
    channels: &[&str],
) -> FilteredView {
    filter::apply(&tables(marketing, business), &request(start, end, channels))
}

/// The two-channel worked example: search spends [10, 20, 30] with revenue
/// [20, 40, 90], social spends [5, 5, 5] with revenue [10, 5, 5], over
/// 2024-01-01..03.
pub fn two_channel_fixture() -> SourceTables {
    tables(
        vec![
            event("2024-01-01", "search", "brand", "CA", 1000, 100, 10.0, 20.0),
            event("2024-01-02", "search", "brand", "CA", 1000, 100, 20.0, 40.0),
            event("2024-01-03", "search", "brand", "CA", 1000, 100, 30.0, 90.0),
            event("2024-01-01", "social", "promo", "CA", 500, 25, 5.0, 10.0),
            event("2024-01-02", "social", "promo", "CA", 500, 25, 5.0, 5.0),
            event("2024-01-03", "social", "promo", "CA", 500, 25, 5.0, 5.0),
        ],
        vec![
            business_record("2024-01-01", 200.0, 80.0, 10.0, 40.0),
            business_record("2024-01-02", 300.0, 120.0, 20.0, 60.0),
            business_record("2024-01-03", 400.0, 160.0, 30.0, 80.0),
        ],
    )
}
