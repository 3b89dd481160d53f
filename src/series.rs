// =============================================================================
// Price Series Normalization
// =============================================================================
//
// Raw daily rows arrive from the price-history collaborator as strings in
// whatever shape the source table had: locale thousands separators, reverse
// chronological order, overlapping pages (duplicate dates), partially empty
// cells. This module turns them into a validated, immutable `PriceSeries`:
//
//   1. Strip formatting and parse the five numeric fields; a field that does
//      not parse becomes `None`, never zero.
//   2. Drop rows without a parseable date or close.
//   3. Stable-sort ascending by date, then deduplicate by date keeping the
//      first occurrence.
//   4. Reject series shorter than the configured minimum with a `SkipReason`.
//
// The normalizer is a pure transform: same rows in, same series out.
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::SkipReason;

/// Date formats accepted for raw rows. KRX sources use the dotted form;
/// the other two cover common re-exports of the same tables.
const DATE_FORMATS: [&str; 3] = ["%Y.%m.%d", "%Y-%m-%d", "%Y/%m/%d"];

// =============================================================================
// Raw input
// =============================================================================

/// One scraped daily row, all fields as delivered (strings). An empty string
/// stands for a missing cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBarRow {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub open: String,
    #[serde(default)]
    pub high: String,
    #[serde(default)]
    pub low: String,
    #[serde(default)]
    pub close: String,
    #[serde(default)]
    pub volume: String,
}

impl RawBarRow {
    pub fn new(
        date: impl Into<String>,
        open: impl Into<String>,
        high: impl Into<String>,
        low: impl Into<String>,
        close: impl Into<String>,
        volume: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            open: open.into(),
            high: high.into(),
            low: low.into(),
            close: close.into(),
            volume: volume.into(),
        }
    }
}

// =============================================================================
// Validated bars
// =============================================================================

/// One validated daily bar. `close` is always present; the optional fields are
/// `None` when the source cell was missing, unparseable, or invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Immutable, date-ascending, date-unique sequence of bars for one instrument.
///
/// Only the normalizer constructs one; it lives for a single classification
/// pass and is never shared across instruments or runs.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Normalize raw rows into a validated series.
    ///
    /// Returns `SkipReason::MalformedInput` when rows were supplied but none
    /// parsed, and `SkipReason::InsufficientData` when fewer than `min_bars`
    /// bars survive.
    pub fn from_raw_rows(rows: &[RawBarRow], min_bars: usize) -> Result<Self, SkipReason> {
        let mut bars: Vec<PriceBar> = rows.iter().filter_map(parse_row).collect();
        let dropped = rows.len() - bars.len();

        if bars.is_empty() {
            if rows.is_empty() {
                return Err(SkipReason::InsufficientData {
                    have: 0,
                    need: min_bars,
                });
            }
            return Err(SkipReason::MalformedInput {
                total_rows: rows.len(),
            });
        }

        // Stable sort, so for duplicate dates "first after sort" is the row
        // that came first in the input.
        bars.sort_by_key(|b| b.date);
        let before_dedup = bars.len();
        bars.dedup_by_key(|b| b.date);
        let deduped = before_dedup - bars.len();

        debug!(
            total = rows.len(),
            kept = bars.len(),
            dropped,
            deduped,
            "normalized price rows"
        );

        if bars.len() < min_bars {
            return Err(SkipReason::InsufficientData {
                have: bars.len(),
                need: min_bars,
            });
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close prices in date order.
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Volumes in date order; `None` where the source cell was unusable.
    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    #[cfg(test)]
    pub(crate) fn from_bars(bars: Vec<PriceBar>) -> Self {
        Self { bars }
    }
}

// =============================================================================
// Row parsing
// =============================================================================

/// Parse one raw row. `None` when the date or close is unusable.
fn parse_row(row: &RawBarRow) -> Option<PriceBar> {
    let date = parse_date(&row.date)?;
    let close = parse_price(&row.close)?;

    let open = parse_price(&row.open);
    let mut high = parse_price(&row.high);
    let mut low = parse_price(&row.low);

    // An inverted high/low pair is inconsistent; trust neither value.
    if let (Some(h), Some(l)) = (high, low) {
        if h < l {
            high = None;
            low = None;
        }
    }

    Some(PriceBar {
        date,
        open,
        high,
        low,
        close,
        volume: parse_price(&row.volume),
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Strip thousands separators and whitespace, then parse. Negative and
/// non-finite values are invalid for prices and volumes and become `None`.
fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, ',' | ' ')).collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value)
}
