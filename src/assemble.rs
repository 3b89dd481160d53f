// =============================================================================
// Result assembly — rounding and formatting for one classified instrument
// =============================================================================
//
// Everything analytical happens upstream; this module only shapes numbers
// into the fixed record layout the export side consumes. KRW prices are
// integers, so close/MA/band legs round to i64 (half away from zero). No
// thousands separators here, locale formatting belongs to presentation.

use serde::Serialize;

use crate::classifier::ClassificationResult;
use crate::types::{Status, SymbolMeta};

/// One row of scan output. Field order is the export order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRecord {
    pub code: String,
    pub name: String,
    /// Daily change string passed through verbatim from the listing side.
    pub change_pct: String,
    pub close: i64,
    pub ma: i64,
    /// Rounded close minus rounded MA, so the gap always matches the two
    /// displayed integers.
    pub ma_gap: i64,
    /// Signed percentage with two decimals, `"-"` when undefined.
    pub disparity: String,
    /// `"{stop} / {target}"` in whole KRW, `"-"` when the ATR is undefined.
    pub band: String,
    pub status: Status,
    pub rationale: String,
    /// Symbol code for the UI's detail-page deep link.
    pub link_code: String,
}

/// Half-away-from-zero, matching how the venue quotes whole-KRW prices.
fn round_i64(value: f64) -> i64 {
    value.round() as i64
}

fn format_disparity(disparity: Option<f64>) -> String {
    match disparity {
        Some(pct) => format!("{pct:+.2}%"),
        None => "-".to_string(),
    }
}

fn format_band(band: Option<(f64, f64)>) -> String {
    match band {
        Some((stop, target)) => format!("{} / {}", round_i64(stop), round_i64(target)),
        None => "-".to_string(),
    }
}

/// Build the output row for one instrument.
pub fn assemble_record(
    meta: &SymbolMeta,
    close: f64,
    sma: f64,
    disparity: Option<f64>,
    band: Option<(f64, f64)>,
    classification: &ClassificationResult,
) -> OutputRecord {
    let close_i = round_i64(close);
    let ma_i = round_i64(sma);

    OutputRecord {
        code: meta.code.clone(),
        name: meta.name.clone(),
        change_pct: meta.change_pct.clone(),
        close: close_i,
        ma: ma_i,
        ma_gap: close_i - ma_i,
        disparity: format_disparity(disparity),
        band: format_band(band),
        status: classification.status,
        rationale: classification.rationale.join("; "),
        link_code: meta.code.clone(),
    }
}
