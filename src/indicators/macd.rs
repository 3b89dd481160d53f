// =============================================================================
// MACD (Moving Average Convergence Divergence)
// =============================================================================
//
//   line      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(line, signal_span)
//   histogram = line - signal
//
// All three component EMAs are seeded with their first input value, so the
// whole triple is defined from position 0 onward. The classifier only reads
// the histogram, but line and signal are kept for output enrichment and
// tests.

use super::{ema, IndicatorSeries};

/// The three MACD component series, each aligned 1:1 with the input closes.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub line: IndicatorSeries,
    pub signal: IndicatorSeries,
    pub histogram: IndicatorSeries,
}

impl MacdSeries {
    fn undefined(len: usize) -> Self {
        Self {
            line: vec![None; len],
            signal: vec![None; len],
            histogram: vec![None; len],
        }
    }
}

/// Compute MACD over `closes` with the given spans.
///
/// # Edge cases
/// - Any span of zero, or `fast >= slow`, makes the oscillator meaningless;
///   all three series come back fully `None` rather than panicking.
/// - A non-finite close truncates the underlying EMA cascades; positions
///   past the truncation point are `None`.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_span: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_span == 0 || fast >= slow {
        return MacdSeries::undefined(closes.len());
    }

    let fast_ema = ema::ema_values(closes, fast);
    let slow_ema = ema::ema_values(closes, slow);
    let defined = fast_ema.len().min(slow_ema.len());

    let line_values: Vec<f64> = fast_ema
        .iter()
        .zip(slow_ema.iter())
        .take(defined)
        .map(|(f, s)| f - s)
        .collect();
    let signal_values = ema::ema_values(&line_values, signal_span);
    let defined = defined.min(signal_values.len());

    let mut out = MacdSeries::undefined(closes.len());
    for i in 0..defined {
        let line = line_values[i];
        let signal = signal_values[i];
        out.line[i] = Some(line);
        out.signal[i] = Some(signal);
        out.histogram[i] = Some(line - signal);
    }
    out
}
