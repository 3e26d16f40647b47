//! Proportional acquisition attribution — daily new customers credited to
//! channels in proportion to each channel's share of that day's attributed
//! revenue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::FilteredView;

/// One (date, channel) attribution cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionRow {
    pub date: NaiveDate,
    pub channel: String,
    pub attributed_revenue: f64,
    /// Channel share of the day's total attributed revenue; 0.0 when the
    /// day's total is zero.
    pub revenue_share: f64,
    /// Fractional new customers credited to the channel for the day.
    pub attributed_customers: f64,
}

/// Per-channel total of attributed new customers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelAttribution {
    pub channel: String,
    pub total_attributed_customers: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionReport {
    /// Full (date, channel) grid, date then channel ascending.
    pub rows: Vec<AttributionRow>,
    /// Channels ranked by total attributed customers, descending.
    pub channel_totals: Vec<ChannelAttribution>,
    /// Breakdown sample: most recent dates first, largest share first.
    pub daily_sample: Vec<AttributionRow>,
}

/// Run the attribution model over a filtered view. `sample_rows` bounds the
/// daily breakdown sample.
pub fn attribute_new_customers(view: &FilteredView, sample_rows: usize) -> AttributionReport {
    let mut revenue: BTreeMap<(NaiveDate, String), f64> = BTreeMap::new();
    for e in &view.marketing {
        *revenue
            .entry((e.date, e.channel.clone()))
            .or_insert(0.0) += e.attributed_revenue;
    }

    let mut daily_totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for ((date, _), rev) in &revenue {
        *daily_totals.entry(*date).or_insert(0.0) += rev;
    }

    let mut customers_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in &view.business {
        *customers_by_date.entry(r.date).or_insert(0.0) += r.new_customers;
    }

    let rows: Vec<AttributionRow> = revenue
        .into_iter()
        .map(|((date, channel), attributed_revenue)| {
            let total = daily_totals[&date];
            // Zero total revenue means an undefined share; attribute zero
            // customers rather than failing.
            let revenue_share = if total == 0.0 {
                0.0
            } else {
                attributed_revenue / total
            };
            let new_customers = customers_by_date.get(&date).copied().unwrap_or(0.0);
            AttributionRow {
                date,
                channel,
                attributed_revenue,
                revenue_share,
                attributed_customers: revenue_share * new_customers,
            }
        })
        .collect();

    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in &rows {
        *totals.entry(row.channel.as_str()).or_insert(0.0) += row.attributed_customers;
    }
    let mut channel_totals: Vec<ChannelAttribution> = totals
        .into_iter()
        .map(|(channel, total_attributed_customers)| ChannelAttribution {
            channel: channel.to_string(),
            total_attributed_customers,
        })
        .collect();
    channel_totals.sort_by(|a, b| {
        b.total_attributed_customers
            .total_cmp(&a.total_attributed_customers)
    });

    let mut daily_sample = rows.clone();
    daily_sample.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.revenue_share.total_cmp(&a.revenue_share))
    });
    daily_sample.truncate(sample_rows);

    AttributionReport {
        rows,
        channel_totals,
        daily_sample,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use crate::testutil::{business_record, date, event, request, tables, two_channel_fixture};

    #[test]
    fn test_shares_sum_to_one_per_date() {
        let t = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 50);
        let mut per_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for row in &report.rows {
            *per_date.entry(row.date).or_insert(0.0) += row.revenue_share;
        }
        for (_, share_sum) in per_date {
            assert!((share_sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_daily_customers_conserved() {
        let t = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 50);

        // 2024-01-02: 20 new customers split across search and social.
        let day: Vec<_> = report
            .rows
            .iter()
            .filter(|r| r.date == date("2024-01-02"))
            .collect();
        let attributed: f64 = day.iter().map(|r| r.attributed_customers).sum();
        assert!((attributed - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_channel_ranking_descending() {
        let t = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 50);
        assert_eq!(report.channel_totals.len(), 2);
        assert_eq!(report.channel_totals[0].channel, "search");
        assert!(
            report.channel_totals[0].total_attributed_customers
                >= report.channel_totals[1].total_attributed_customers
        );

        let total: f64 = report
            .channel_totals
            .iter()
            .map(|c| c.total_attributed_customers)
            .sum();
        // All 60 new customers across the window are handed out.
        assert!((total - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_revenue_day_attributes_zero_customers() {
        let t = tables(
            vec![
                event("2024-01-01", "search", "c1", "CA", 100, 10, 5.0, 0.0),
                event("2024-01-01", "social", "c2", "CA", 100, 10, 5.0, 0.0),
            ],
            vec![business_record("2024-01-01", 100.0, 40.0, 12.0, 30.0)],
        );
        let req = request("2024-01-01", "2024-01-01", &["search", "social"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 50);
        for row in &report.rows {
            assert_eq!(row.revenue_share, 0.0);
            assert_eq!(row.attributed_customers, 0.0);
        }
    }

    #[test]
    fn test_marketing_date_without_business_row() {
        let t = tables(
            vec![event("2024-01-01", "search", "c1", "CA", 100, 10, 5.0, 50.0)],
            vec![],
        );
        let req = request("2024-01-01", "2024-01-01", &["search"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 50);
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].revenue_share, 1.0);
        // No new_customers value for the day: zero fill.
        assert_eq!(report.rows[0].attributed_customers, 0.0);
    }

    #[test]
    fn test_daily_sample_ordering_and_truncation() {
        let t = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&t, &req);

        let report = attribute_new_customers(&view, 3);
        assert_eq!(report.daily_sample.len(), 3);
        // Most recent date first, larger share first within the date.
        assert_eq!(report.daily_sample[0].date, date("2024-01-03"));
        assert_eq!(report.daily_sample[0].channel, "search");
        assert!(
            report.daily_sample[0].revenue_share >= report.daily_sample[1].revenue_share
                || report.daily_sample[0].date > report.daily_sample[1].date
        );
    }
}
