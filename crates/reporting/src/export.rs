//! Delimited-text and JSON export of derived tables. Produces strings; the
//! external collaborator owns file handles and downloads.

use insight_core::{DailyBusinessRecord, InsightResult, MarketingEvent};
use serde::Serialize;

use crate::attribution::AttributionRow;
use crate::kpi::{CampaignKpi, ChannelKpi};
use crate::lag::ChannelLagScan;
use crate::timeseries::{RollingPoint, SpendGrid};

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// NaN cells render empty, matching how undefined ratios are displayed.
fn num(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

fn csv(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut out = header.join(",");
    out.push('\n');
    for row in rows {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

pub fn channel_kpis_csv(table: &[ChannelKpi]) -> String {
    csv(
        &[
            "channel",
            "impressions",
            "clicks",
            "spend",
            "attributed_revenue",
            "campaigns",
            "ctr",
            "cpc",
            "roas",
        ],
        table
            .iter()
            .map(|k| {
                vec![
                    quoted(&k.channel),
                    k.impressions.to_string(),
                    k.clicks.to_string(),
                    num(k.spend),
                    num(k.attributed_revenue),
                    k.campaigns.to_string(),
                    num(k.ctr),
                    num(k.cpc),
                    num(k.roas),
                ]
            })
            .collect(),
    )
}

pub fn top_campaigns_csv(table: &[CampaignKpi]) -> String {
    csv(
        &[
            "channel",
            "campaign",
            "impressions",
            "clicks",
            "spend",
            "attributed_revenue",
            "roas",
        ],
        table
            .iter()
            .map(|c| {
                vec![
                    quoted(&c.channel),
                    quoted(&c.campaign),
                    c.impressions.to_string(),
                    c.clicks.to_string(),
                    num(c.spend),
                    num(c.attributed_revenue),
                    num(c.roas),
                ]
            })
            .collect(),
    )
}

/// Filtered marketing rows, exportable verbatim.
pub fn marketing_events_csv(rows: &[MarketingEvent]) -> String {
    csv(
        &[
            "date",
            "channel",
            "campaign",
            "state",
            "impressions",
            "clicks",
            "spend",
            "attributed_revenue",
        ],
        rows.iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    quoted(&e.channel),
                    quoted(&e.campaign),
                    quoted(&e.state),
                    e.impressions.to_string(),
                    e.clicks.to_string(),
                    num(e.spend),
                    num(e.attributed_revenue),
                ]
            })
            .collect(),
    )
}

pub fn business_records_csv(rows: &[DailyBusinessRecord]) -> String {
    csv(
        &[
            "date",
            "total_revenue",
            "gross_profit",
            "new_customers",
            "orders",
        ],
        rows.iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    num(r.total_revenue),
                    num(r.gross_profit),
                    num(r.new_customers),
                    num(r.orders),
                ]
            })
            .collect(),
    )
}

pub fn attribution_csv(rows: &[AttributionRow]) -> String {
    csv(
        &[
            "date",
            "channel",
            "attributed_revenue",
            "revenue_share",
            "attributed_customers",
        ],
        rows.iter()
            .map(|r| {
                vec![
                    r.date.to_string(),
                    quoted(&r.channel),
                    num(r.attributed_revenue),
                    num(r.revenue_share),
                    num(r.attributed_customers),
                ]
            })
            .collect(),
    )
}

/// Wide-form daily spend: one column per channel plus the total.
pub fn spend_grid_csv(grid: &SpendGrid) -> String {
    let mut header: Vec<&str> = vec!["date"];
    header.extend(grid.channels.iter().map(String::as_str));
    header.push("total_spend");

    csv(
        &header,
        grid.rows
            .iter()
            .map(|row| {
                let mut cells = vec![row.date.to_string()];
                cells.extend(row.spend.iter().map(|&v| num(v)));
                cells.push(num(row.total_spend));
                cells
            })
            .collect(),
    )
}

pub fn rolling_csv(points: &[RollingPoint]) -> String {
    csv(
        &["date", "revenue", "revenue_avg", "spend", "spend_avg"],
        points
            .iter()
            .map(|p| {
                vec![
                    p.date.to_string(),
                    num(p.revenue),
                    num(p.revenue_avg),
                    num(p.spend),
                    num(p.spend_avg),
                ]
            })
            .collect(),
    )
}

pub fn lag_results_csv(results: &[ChannelLagScan]) -> String {
    csv(
        &["channel", "best_lag_days", "max_corr"],
        results
            .iter()
            .map(|r| {
                vec![
                    quoted(&r.channel),
                    r.best_lag_days.to_string(),
                    num(r.best_correlation),
                ]
            })
            .collect(),
    )
}

/// The full per-channel (lag, correlation) curves, one row per point.
pub fn lag_curve_csv(results: &[ChannelLagScan]) -> String {
    csv(
        &["channel", "lag", "corr"],
        results
            .iter()
            .flat_map(|r| {
                r.curve.iter().map(|p| {
                    vec![
                        quoted(&r.channel),
                        p.lag.to_string(),
                        num(p.correlation),
                    ]
                })
            })
            .collect(),
    )
}

/// Pretty JSON for any derived view-model.
pub fn to_json<T: Serialize>(value: &T) -> InsightResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
