//! Explicit schema mapping for the daily business table.
//!
//! The column that carries the orders signal is named in configuration
//! rather than discovered by substring match, so a renamed or absent column
//! surfaces as a reportable error instead of a silently wrong series.

use serde::Deserialize;

use crate::error::{InsightError, InsightResult};
use crate::types::{DailyBusinessRecord, RawBusinessRow};

pub const BUSINESS_TABLE: &str = "daily_business";

/// Column names expected in the raw business table.
#[derive(Debug, Clone, Deserialize)]
pub struct BusinessColumns {
    #[serde(default = "default_total_revenue")]
    pub total_revenue: String,
    #[serde(default = "default_gross_profit")]
    pub gross_profit: String,
    #[serde(default = "default_new_customers")]
    pub new_customers: String,
    #[serde(default = "default_orders")]
    pub orders: String,
}

fn default_total_revenue() -> String {
    "total_revenue".to_string()
}
fn default_gross_profit() -> String {
    "gross_profit".to_string()
}
fn default_new_customers() -> String {
    "new_customers".to_string()
}
fn default_orders() -> String {
    "orders".to_string()
}

impl Default for BusinessColumns {
    fn default() -> Self {
        Self {
            total_revenue: default_total_revenue(),
            gross_profit: default_gross_profit(),
            new_customers: default_new_customers(),
            orders: default_orders(),
        }
    }
}

impl BusinessColumns {
    fn required(&self) -> [&str; 4] {
        [
            self.total_revenue.as_str(),
            self.gross_profit.as_str(),
            self.new_customers.as_str(),
            self.orders.as_str(),
        ]
    }
}

/// Map loader-delivered business rows into typed daily records, validating
/// that every configured column is present in every row.
pub fn map_business_rows(
    columns: &BusinessColumns,
    rows: &[RawBusinessRow],
) -> InsightResult<Vec<DailyBusinessRecord>> {
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        for column in columns.required() {
            if !row.values.contains_key(column) {
                return Err(InsightError::MissingColumn {
                    table: BUSINESS_TABLE.to_string(),
                    column: column.to_string(),
                });
            }
        }

        records.push(DailyBusinessRecord {
            date: row.date,
            total_revenue: row.values[columns.total_revenue.as_str()],
            gross_profit: row.values[columns.gross_profit.as_str()],
            new_customers: row.values[columns.new_customers.as_str()],
            orders: row.values[columns.orders.as_str()],
        });
    }

    Ok(records)
}
