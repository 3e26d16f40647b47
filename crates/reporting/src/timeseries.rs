//! Daily spend/revenue time series and trailing rolling averages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::filter::FilteredView;
use crate::stats::trailing_mean;

/// Wide-form daily spend: one value per channel per date, plus the total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendGrid {
    /// Sorted distinct channels present in the filtered marketing rows;
    /// column order for every row's `spend` vector.
    pub channels: Vec<String>,
    pub rows: Vec<SpendGridRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendGridRow {
    pub date: NaiveDate,
    pub spend: Vec<f64>,
    pub total_spend: f64,
}

/// One joined point of the revenue-vs-spend rolling comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub revenue: f64,
    pub revenue_avg: f64,
    pub spend: f64,
    pub spend_avg: f64,
}

/// Pivot the filtered marketing rows into a daily wide-form spend grid.
/// Dates are the distinct days with marketing data, ascending; days where a
/// channel has no rows read as zero.
pub fn daily_spend_by_channel(view: &FilteredView) -> SpendGrid {
    let channels: Vec<String> = view
        .marketing
        .iter()
        .map(|e| e.channel.clone())
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    let index: BTreeMap<&str, usize> = channels
        .iter()
        .enumerate()
        .map(|(i, c)| (c.as_str(), i))
        .collect();

    let mut by_date: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for e in &view.marketing {
        let cells = by_date
            .entry(e.date)
            .or_insert_with(|| vec![0.0; channels.len()]);
        cells[index[e.channel.as_str()]] += e.spend;
    }

    let rows = by_date
        .into_iter()
        .map(|(date, spend)| {
            let total_spend = spend.iter().sum();
            SpendGridRow {
                date,
                spend,
                total_spend,
            }
        })
        .collect();

    SpendGrid { channels, rows }
}

/// Business revenue joined with total marketing spend, each with a trailing
/// rolling average whose window shrinks at the head of the series.
///
/// The spend average is computed over the spend series' own date sequence
/// and then joined onto the revenue dates, with zero fill for days that
/// carry no marketing data.
pub fn revenue_spend_rolling(view: &FilteredView, window: usize) -> Vec<RollingPoint> {
    let mut revenue_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for r in &view.business {
        *revenue_by_date.entry(r.date).or_insert(0.0) += r.total_revenue;
    }

    let mut spend_by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for e in &view.marketing {
        *spend_by_date.entry(e.date).or_insert(0.0) += e.spend;
    }

    let revenue_values: Vec<f64> = revenue_by_date.values().copied().collect();
    let revenue_avg = trailing_mean(&revenue_values, window);

    let spend_values: Vec<f64> = spend_by_date.values().copied().collect();
    let spend_avg = trailing_mean(&spend_values, window);
    let spend_rolled: BTreeMap<NaiveDate, (f64, f64)> = spend_by_date
        .keys()
        .zip(spend_values.iter().zip(&spend_avg))
        .map(|(date, (&spend, &avg))| (*date, (spend, avg)))
        .collect();

    revenue_by_date
        .keys()
        .enumerate()
        .map(|(i, date)| {
            let (spend, spend_avg) = spend_rolled.get(date).copied().unwrap_or((0.0, 0.0));
            RollingPoint {
                date: *date,
                revenue: revenue_values[i],
                revenue_avg: revenue_avg[i],
                spend,
                spend_avg,
            }
        })
        .collect()
}
