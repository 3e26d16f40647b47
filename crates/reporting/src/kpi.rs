//! Channel and campaign KPI aggregation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::filter::FilteredView;
use crate::stats::ratio;

/// Headline totals for the current filter window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewSummary {
    pub total_spend: f64,
    pub total_attributed_revenue: f64,
    pub total_business_revenue: f64,
    pub total_gross_profit: f64,
    pub total_new_customers: f64,
    /// attributed_revenue / spend; NaN when spend is zero.
    pub overall_roas: f64,
}

/// Aggregate for one channel, with ratios computed on the sums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelKpi {
    pub channel: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub campaigns: usize,
    pub ctr: f64,
    pub cpc: f64,
    pub roas: f64,
}

/// Aggregate at (channel, campaign) grain, used for the top-campaigns
/// ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignKpi {
    pub channel: String,
    pub campaign: String,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub roas: f64,
}

#[derive(Default)]
struct Sums {
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
}

impl Sums {
    fn add(&mut self, impressions: u64, clicks: u64, spend: f64, revenue: f64) {
        self.impressions += impressions;
        self.clicks += clicks;
        self.spend += spend;
        self.attributed_revenue += revenue;
    }
}

/// Headline totals over the filtered view. An empty view yields zero sums
/// and a NaN roas.
pub fn overview_summary(view: &FilteredView) -> OverviewSummary {
    let total_spend: f64 = view.marketing.iter().map(|e| e.spend).sum();
    let total_attributed_revenue: f64 =
        view.marketing.iter().map(|e| e.attributed_revenue).sum();

    OverviewSummary {
        total_spend,
        total_attributed_revenue,
        total_business_revenue: view.business.iter().map(|r| r.total_revenue).sum(),
        total_gross_profit: view.business.iter().map(|r| r.gross_profit).sum(),
        total_new_customers: view.business.iter().map(|r| r.new_customers).sum(),
        overall_roas: ratio(total_attributed_revenue, total_spend),
    }
}

/// Per-channel KPI table, sorted by total spend descending.
pub fn channel_kpis(view: &FilteredView) -> Vec<ChannelKpi> {
    let mut sums: BTreeMap<&str, Sums> = BTreeMap::new();
    let mut campaigns: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for e in &view.marketing {
        sums.entry(e.channel.as_str()).or_default().add(
            e.impressions,
            e.clicks,
            e.spend,
            e.attributed_revenue,
        );
        campaigns
            .entry(e.channel.as_str())
            .or_default()
            .insert(e.campaign.as_str());
    }

    let mut table: Vec<ChannelKpi> = sums
        .into_iter()
        .map(|(channel, s)| ChannelKpi {
            channel: channel.to_string(),
            impressions: s.impressions,
            clicks: s.clicks,
            spend: s.spend,
            attributed_revenue: s.attributed_revenue,
            campaigns: campaigns.get(channel).map_or(0, |c| c.len()),
            ctr: ratio(s.clicks as f64, s.impressions as f64),
            cpc: ratio(s.spend, s.clicks as f64),
            roas: ratio(s.attributed_revenue, s.spend),
        })
        .collect();

    table.sort_by(|a, b| b.spend.total_cmp(&a.spend));
    table
}

/// Top campaigns by roas, descending. Rows with zero spend or a non-finite
/// roas are dropped; ties keep (channel, campaign) order via stable sort.
pub fn top_campaigns(view: &FilteredView, limit: usize) -> Vec<CampaignKpi> {
    let mut sums: BTreeMap<(&str, &str), Sums> = BTreeMap::new();

    for e in &view.marketing {
        sums.entry((e.channel.as_str(), e.campaign.as_str()))
            .or_default()
            .add(e.impressions, e.clicks, e.spend, e.attributed_revenue);
    }

    let mut table: Vec<CampaignKpi> = sums
        .into_iter()
        .map(|((channel, campaign), s)| CampaignKpi {
            channel: channel.to_string(),
            campaign: campaign.to_string(),
            impressions: s.impressions,
            clicks: s.clicks,
            spend: s.spend,
            attributed_revenue: s.attributed_revenue,
            roas: ratio(s.attributed_revenue, s.spend),
        })
        .filter(|row| row.spend != 0.0 && row.roas.is_finite())
        .collect();

    table.sort_by(|a, b| b.roas.total_cmp(&a.roas));
    table.truncate(limit);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter;
    use crate::filter::FilteredView;
    use crate::testutil::{event, request, two_channel_fixture, view};

    #[test]
    fn test_worked_two_channel_example() {
        let tables = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&tables, &req);

        let table = channel_kpis(&view);
        assert_eq!(table.len(), 2);

        // Sorted by spend descending: search (60) before social (15).
        let search = &table[0];
        assert_eq!(search.channel, "search");
        assert_eq!(search.spend, 60.0);
        assert_eq!(search.attributed_revenue, 150.0);
        assert_eq!(search.roas, 2.5);

        let social = &table[1];
        assert_eq!(social.channel, "social");
        assert_eq!(social.spend, 15.0);
        assert_eq!(social.attributed_revenue, 20.0);
        assert!((social.roas - 20.0 / 15.0).abs() < 1e-12);
    }

    #[test]
    fn test_channel_spend_additivity() {
        let tables = two_channel_fixture();
        let req = request("2024-01-01", "2024-01-03", &["search", "social"]);
        let view = filter::apply(&tables, &req);

        let view_total: f64 = view.marketing.iter().map(|e| e.spend).sum();
        let kpi_total: f64 = channel_kpis(&view).iter().map(|k| k.spend).sum();
        assert!((view_total - kpi_total).abs() < 1e-9);
    }

    #[test]
    fn test_zero_spend_roas_is_nan() {
        let view = view(
            vec![event("2024-01-01", "organic", "c1", "CA", 100, 10, 0.0, 50.0)],
            vec![],
            "2024-01-01",
            "2024-01-31",
            &["organic"],
        );

        let table = channel_kpis(&view);
        assert!(table[0].roas.is_nan());
    }

    #[test]
    fn test_zero_impressions_and_clicks_ratios_are_nan() {
        let view = view(
            vec![event("2024-01-01", "search", "c1", "CA", 0, 0, 10.0, 20.0)],
            vec![],
            "2024-01-01",
            "2024-01-31",
            &["search"],
        );

        let table = channel_kpis(&view);
        assert!(table[0].ctr.is_nan());
        assert!(table[0].cpc.is_nan());
    }

    #[test]
    fn test_distinct_campaign_count() {
        let view = view(
            vec![
                event("2024-01-01", "search", "brand", "CA", 100, 10, 5.0, 10.0),
                event("2024-01-02", "search", "brand", "CA", 100, 10, 5.0, 10.0),
                event("2024-01-03", "search", "generic", "CA", 100, 10, 5.0, 10.0),
            ],
            vec![],
            "2024-01-01",
            "2024-01-31",
            &["search"],
        );

        assert_eq!(channel_kpis(&view)[0].campaigns, 2);
    }

    #[test]
    fn test_top_campaigns_excludes_non_finite_and_sorts_descending() {
        let view = view(
            vec![
                event("2024-01-01", "search", "good", "CA", 100, 10, 10.0, 50.0),
                event("2024-01-01", "search", "better", "CA", 100, 10, 10.0, 80.0),
                event("2024-01-01", "search", "unspent", "CA", 100, 10, 0.0, 30.0),
            ],
            vec![],
            "2024-01-01",
            "2024-01-31",
            &["search"],
        );

        let top = top_campaigns(&view, 15);
        assert_eq!(top.len(), 2);
        assert!(top.iter().all(|c| c.roas.is_finite()));
        assert_eq!(top[0].campaign, "better");
        assert!(top[0].roas >= top[1].roas);
    }

    #[test]
    fn test_top_campaigns_respects_limit_and_tie_order() {
        let events = (0..20)
            .map(|i| {
                event(
                    "2024-01-01",
                    "search",
                    &format!("camp{i:02}"),
                    "CA",
                    100,
                    10,
                    10.0,
                    20.0,
                )
            })
            .collect();
        let view = view(events, vec![], "2024-01-01", "2024-01-31", &["search"]);

        let top = top_campaigns(&view, 15);
        assert_eq!(top.len(), 15);
        // All tied on roas: stable sort keeps (channel, campaign) order.
        assert_eq!(top[0].campaign, "camp00");
        assert_eq!(top[14].campaign, "camp14");
    }

    #[test]
    fn test_empty_view_summary() {
        let view = FilteredView::default();
        let summary = overview_summary(&view);
        assert_eq!(summary.total_spend, 0.0);
        assert_eq!(summary.total_attributed_revenue, 0.0);
        assert!(summary.overall_roas.is_nan());
    }
}
