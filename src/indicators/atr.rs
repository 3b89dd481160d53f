// =============================================================================
// Average True Range (ATR) — rolling mean variant
// =============================================================================
//
// True Range (TR) per bar:
//   TR_0 = H_0 - L_0                      (no previous close yet)
//   TR_t = max(H - L, |H - prevClose|, |L - prevClose|)
//
// ATR here is the plain rolling mean of the last `period` TR values, not
// Wilder's recursive smoothing. The first-bar fallback means `period` bars
// already yield a defined ATR, which the protective band depends on.

use super::IndicatorSeries;
use crate::series::PriceBar;

/// Compute the ATR series over `bars`, aligned 1:1 with the input.
///
/// A bar with a missing high or low has no TR; every rolling window that
/// contains it is undefined. `period == 0` yields all `None`.
pub fn calculate_atr(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut result = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return result;
    }

    // --- Step 1: True Range per bar ------------------------------------------
    let mut tr_values: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let tr = match (bar.high, bar.low) {
            (Some(high), Some(low)) => {
                if i == 0 {
                    Some(high - low)
                } else {
                    let prev_close = bars[i - 1].close;
                    let hl = high - low;
                    let hc = (high - prev_close).abs();
                    let lc = (low - prev_close).abs();
                    Some(hl.max(hc).max(lc))
                }
            }
            _ => None,
        };
        tr_values.push(tr.filter(|v| v.is_finite()));
    }

    // --- Step 2: rolling mean over full windows ------------------------------
    for i in (period - 1)..bars.len() {
        let window = &tr_values[i + 1 - period..=i];
        if window.iter().any(|v| v.is_none()) {
            continue;
        }
        let mean = window.iter().flatten().sum::<f64>() / period as f64;
        if mean.is_finite() {
            result[i] = Some(mean);
        }
    }

    result
}

/// Stop / target pair bracketing `close` at the configured ATR multiples.
///
/// Zero ATR collapses both legs onto the close; no clamping or flooring is
/// applied, the caller formats whatever comes back.
pub fn protective_band(close: f64, atr: f64, stop_mult: f64, target_mult: f64) -> (f64, f64) {
    (close - stop_mult * atr, close + target_mult * atr)
}
