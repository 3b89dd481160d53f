// =============================================================================
// CCI (Commodity Channel Index)
// =============================================================================
//
//   TP  = (high + low + close) / 3
//   CCI = (TP - SMA(TP, period)) / (0.015 * (MAD + eps))
//
// MAD is the mean absolute deviation of the window's typical prices from
// their own mean. The epsilon keeps the denominator nonzero on a flat
// window, where the numerator is also zero and the CCI collapses to ~0
// instead of blowing up.

use super::IndicatorSeries;
use crate::series::PriceBar;

/// Keeps the denominator defined on zero-spread windows.
const MAD_EPSILON: f64 = 1e-9;

/// Compute CCI over `bars` with the given lookback.
///
/// A position is defined only when every bar in the window behind it carries
/// high, low, and close. A bar with a missing high or low poisons every
/// window that contains it.
pub fn calculate_cci(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    let mut result = vec![None; bars.len()];
    if period == 0 || bars.len() < period {
        return result;
    }

    let typical: Vec<Option<f64>> = bars
        .iter()
        .map(|b| match (b.high, b.low) {
            (Some(high), Some(low)) => Some((high + low + b.close) / 3.0),
            _ => None,
        })
        .collect();

    for i in (period - 1)..bars.len() {
        let Some(tp) = typical[i] else { continue };
        let window = &typical[i + 1 - period..=i];
        if window.iter().any(|v| v.is_none()) {
            continue;
        }

        let mean = window.iter().flatten().sum::<f64>() / period as f64;
        let mad = window
            .iter()
            .flatten()
            .map(|v| (v - mean).abs())
            .sum::<f64>()
            / period as f64;

        let cci = (tp - mean) / (0.015 * (mad + MAD_EPSILON));
        if cci.is_finite() {
            result[i] = Some(cci);
        }
    }

    result
}
