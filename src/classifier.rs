// =============================================================================
// Signal Classifier — ordered rule cascade
// =============================================================================
//
// Stateless. Each instrument is classified fresh from a `SignalSnapshot` of
// the latest indicator points; the first matching rule decides the status and
// later rules are never consulted. A rule whose inputs are undefined simply
// does not match, so thin or poisoned indicator series degrade toward
// `Neutral` instead of erroring.
//
// After the winning rule, two independent annotators append to the rationale:
//   - CCI threshold crossings (confirmation only, never change the status)
//   - a momentum-direction suffix from the histogram's last step
// =============================================================================

use crate::config::ScanConfig;
use crate::indicators::{IndicatorSeries, IndicatorSet};
use crate::series::PriceSeries;
use crate::types::Status;

/// The latest indicator points one classification needs, pulled off the full
/// series once so the rule cascade reads plain fields.
#[derive(Debug, Clone, Copy)]
pub struct SignalSnapshot {
    pub close: f64,
    pub prev_close: f64,
    pub sma: Option<f64>,
    pub prev_sma: Option<f64>,
    pub hist: Option<f64>,
    pub prev_hist: Option<f64>,
    pub prev2_hist: Option<f64>,
    pub disparity: Option<f64>,
    pub cci: Option<f64>,
    pub prev_cci: Option<f64>,
    pub volume: Option<f64>,
    pub vol_ma: Option<f64>,
}

fn point(series: &IndicatorSeries, index: usize) -> Option<f64> {
    series.get(index).copied().flatten()
}

impl SignalSnapshot {
    /// Capture the last two (three for the histogram) points of every series.
    ///
    /// Needs at least two bars; the normalizer's minimum-bar gate means this
    /// never trips in the scan path.
    pub fn capture(series: &PriceSeries, indicators: &IndicatorSet) -> Option<Self> {
        let n = series.len();
        if n < 2 {
            return None;
        }
        let bars = series.bars();
        let last = n - 1;
        let prev = n - 2;

        Some(Self {
            close: bars[last].close,
            prev_close: bars[prev].close,
            sma: point(&indicators.sma, last),
            prev_sma: point(&indicators.sma, prev),
            hist: point(&indicators.macd.histogram, last),
            prev_hist: point(&indicators.macd.histogram, prev),
            prev2_hist: (n >= 3).then(|| point(&indicators.macd.histogram, n - 3)).flatten(),
            disparity: point(&indicators.disparity, last),
            cci: point(&indicators.cci, last),
            prev_cci: point(&indicators.cci, prev),
            volume: bars[last].volume,
            vol_ma: point(&indicators.vol_ma, last),
        })
    }
}

/// Winning status plus the ordered rationale tokens behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    pub status: Status,
    pub rationale: Vec<String>,
}

/// Run the full cascade: base rule, CCI crossing confirmations, momentum
/// suffix.
pub fn classify_snapshot(snap: &SignalSnapshot, config: &ScanConfig) -> ClassificationResult {
    let (status, mut rationale) = base_status(snap, config);
    append_cci_crossings(snap, config, &mut rationale);

    if let (Some(hist), Some(prev_hist)) = (snap.hist, snap.prev_hist) {
        if hist > prev_hist {
            rationale.push("accelerating".to_string());
        } else if hist < prev_hist {
            rationale.push("decelerating".to_string());
        }
        // Exactly equal: no suffix.
    }

    ClassificationResult { status, rationale }
}

/// The ordered price/MA/momentum rules. First match wins.
fn base_status(snap: &SignalSnapshot, config: &ScanConfig) -> (Status, Vec<String>) {
    // ── Rule 1: momentum reversal at or above the average ────────────────
    if let (Some(sma), Some(hist), Some(prev_hist)) = (snap.sma, snap.hist, snap.prev_hist) {
        if prev_hist > 0.0 && hist <= 0.0 && snap.close >= sma {
            return (Status::StrongSell, vec!["momentum flip".to_string()]);
        }
    }

    // ── Rule 2: moving-average breakout ──────────────────────────────────
    if let (Some(sma), Some(prev_sma), Some(hist)) = (snap.sma, snap.prev_sma, snap.hist) {
        if snap.prev_close < prev_sma && snap.close > sma && hist > 0.0 {
            let mut tokens = vec!["moving-average breakout".to_string()];
            let surged = matches!(
                (snap.volume, snap.vol_ma),
                (Some(v), Some(vm)) if v > config.volume_surge_ratio * vm
            );
            if surged {
                tokens.push("volume surge".to_string());
                return (Status::StrongBuy, tokens);
            }
            return (Status::Breakout, tokens);
        }
    }

    // ── Rule 3: overextension above the average ──────────────────────────
    if let (Some(sma), Some(disparity)) = (snap.sma, snap.disparity) {
        if snap.close > sma && disparity > config.overextension_ceiling_pct {
            return (Status::Overheated, vec!["disparity stretch".to_string()]);
        }
    }

    // ── Rule 4: pullback support near the average ────────────────────────
    if let (Some(disparity), Some(hist)) = (snap.disparity, snap.hist) {
        if disparity.abs() < config.proximity_band_pct && hist >= 0.0 {
            return (
                Status::BuyInterest,
                vec!["support at moving average".to_string()],
            );
        }
    }

    // ── Rule 5: fading momentum inside an uptrend ────────────────────────
    if let (Some(sma), Some(hist), Some(prev_hist), Some(prev2_hist)) =
        (snap.sma, snap.hist, snap.prev_hist, snap.prev2_hist)
    {
        if hist < prev_hist && prev_hist < prev2_hist && snap.close > sma {
            return (Status::HoldFading, vec!["momentum fade".to_string()]);
        }
    }

    // ── Rule 6: sustained uptrend ────────────────────────────────────────
    if let (Some(sma), Some(hist)) = (snap.sma, snap.hist) {
        if snap.close > sma && hist > 0.0 {
            return (Status::Hold, vec!["trend intact".to_string()]);
        }
    }

    // ── Rule 7: accelerating downtrend ───────────────────────────────────
    if let (Some(sma), Some(hist), Some(prev_hist)) = (snap.sma, snap.hist, snap.prev_hist) {
        if snap.close < sma && hist < prev_hist {
            return (Status::Sell, vec!["downtrend pressure".to_string()]);
        }
    }

    // ── Rule 8: recovery attempt below the average ───────────────────────
    if let (Some(sma), Some(hist), Some(prev_hist)) = (snap.sma, snap.hist, snap.prev_hist) {
        if snap.close < sma && hist > prev_hist {
            return (Status::Watch, vec!["momentum improving".to_string()]);
        }
    }

    // ── Rule 9: default ──────────────────────────────────────────────────
    (Status::Neutral, vec!["no clear signal".to_string()])
}

/// CCI threshold crossings confirm the base status; they never replace it.
fn append_cci_crossings(snap: &SignalSnapshot, config: &ScanConfig, tokens: &mut Vec<String>) {
    let (Some(prev), Some(cur)) = (snap.prev_cci, snap.cci) else {
        return;
    };
    let level = config.cci_breakout_level;

    if prev <= level && cur > level {
        tokens.push(format!("CCI +{level:.0} breakout"));
    }
    if prev >= -level && cur < -level {
        tokens.push(format!("CCI -{level:.0} breakdown"));
    }
    if prev > level && cur <= level {
        tokens.push("CCI overbought retreat".to_string());
    }
}
