//! Lag / cross-correlation diagnostic: for each channel, scan integer day
//! offsets and find the one where daily spend best correlates with the
//! business orders signal.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::{FilterRequest, FilteredView};
use crate::stats::{pearson, shift_forward};

/// Sentinel standing in for NaN during the best-lag search. Any defined
/// correlation beats it.
const UNDEFINED_CORR: f64 = f64::NEG_INFINITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LagPoint {
    /// Signed day offset. Negative: spend shifted toward later days.
    pub lag: i32,
    /// Pearson correlation at this offset; NaN when a series has zero
    /// variance.
    pub correlation: f64,
}

/// Lag scan result for one channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelLagScan {
    pub channel: String,
    pub best_lag_days: i32,
    pub best_correlation: f64,
    /// Full (lag, correlation) curve for plotting, ordered -L..=L.
    pub curve: Vec<LagPoint>,
}

/// Every calendar day in [start, end], inclusive.
fn calendar_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut d = start;
    while d <= end {
        days.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }
    days
}

/// Reindex a date-keyed series over the full calendar, missing days as zero.
fn reindex(series: &BTreeMap<NaiveDate, f64>, days: &[NaiveDate]) -> Vec<f64> {
    days.iter()
        .map(|d| series.get(d).copied().unwrap_or(0.0))
        .collect()
}

fn correlation_at_lag(spend: &[f64], orders: &[f64], lag: i32) -> f64 {
    if lag < 0 {
        let shifted = shift_forward(spend, lag.unsigned_abs() as usize);
        pearson(&shifted, orders)
    } else {
        let shifted = shift_forward(orders, lag as usize);
        pearson(spend, &shifted)
    }
}

/// Scan lags -max_lag..=max_lag for every channel in the request, in request
/// order. The best lag is the first maximum of the defined correlations;
/// channels whose correlations are all undefined report NaN at -max_lag.
pub fn scan_channels(
    view: &FilteredView,
    request: &FilterRequest,
    max_lag: u32,
) -> Vec<ChannelLagScan> {
    let days = calendar_days(request.start, request.end);

    let mut orders_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in &view.business {
        *orders_by_date.entry(r.date).or_insert(0.0) += r.orders;
    }
    let orders = reindex(&orders_by_date, &days);

    let max_lag = max_lag as i32;
    let mut results = Vec::with_capacity(request.channels.len());

    for channel in &request.channels {
        let mut spend_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for e in view.marketing.iter().filter(|e| &e.channel == channel) {
            *spend_by_date.entry(e.date).or_insert(0.0) += e.spend;
        }
        let spend = reindex(&spend_by_date, &days);

        let curve: Vec<LagPoint> = (-max_lag..=max_lag)
            .map(|lag| LagPoint {
                lag,
                correlation: correlation_at_lag(&spend, &orders, lag),
            })
            .collect();

        let mut best_idx = 0;
        let mut best_value = UNDEFINED_CORR;
        for (i, point) in curve.iter().enumerate() {
            let value = if point.correlation.is_nan() {
                UNDEFINED_CORR
            } else {
                point.correlation
            };
            // Strict comparison: first occurrence wins on ties.
            if value > best_value {
                best_value = value;
                best_idx = i;
            }
        }

        results.push(ChannelLagScan {
            channel: channel.clone(),
            best_lag_days: curve[best_idx].lag,
            best_correlation: curve[best_idx].correlation,
            curve,
        });
    }

    results
}
