// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// Recursive exponential average:
//
//   multiplier = 2 / (span + 1)
//   EMA_0      = value_0
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The series is seeded with the first value, not an SMA of the first `span`
// values, so every position is defined. The same cascade is used for every
// EMA in the crate, including the MACD signal line, which keeps the MACD
// histogram consistent with the disparity and SMA windows it is compared
// against.

use super::IndicatorSeries;

/// Compute the EMA series for `values` over `span`, aligned with the input.
///
/// # Edge cases
/// - `span == 0` => all `None` (division by zero guard)
/// - A non-finite intermediate value stops the cascade; remaining positions
///   are `None` since the recursion cannot recover a trustworthy state.
pub fn calculate_ema(values: &[f64], span: usize) -> IndicatorSeries {
    let mut result = vec![None; values.len()];
    if span == 0 || values.is_empty() {
        return result;
    }

    let multiplier = 2.0 / (span as f64 + 1.0);

    let mut prev = values[0];
    if !prev.is_finite() {
        return result;
    }
    result[0] = Some(prev);

    for (i, &value) in values.iter().enumerate().skip(1) {
        // Delta form of the recursion; a constant series stays bit-exact,
        // which downstream sign tests on the MACD histogram rely on.
        let ema = prev + multiplier * (value - prev);
        if !ema.is_finite() {
            break;
        }
        result[i] = Some(ema);
        prev = ema;
    }

    result
}

/// Same cascade over plain values, for internal composition (the MACD module
/// feeds one EMA output into another). Produces one value per input position;
/// empty when `span == 0` or the first value is non-finite.
pub(crate) fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    calculate_ema(values, span)
        .into_iter()
        .flatten()
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ema_empty_input() {
        assert!(calculate_ema(&[], 5).is_empty());
    }

    #[test]
    fn ema_span_zero() {
        assert_eq!(calculate_ema(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn ema_seeded_with_first_value() {
        let ema = calculate_ema(&[42.0, 42.0, 42.0], 5);
        assert_eq!(ema, vec![Some(42.0), Some(42.0), Some(42.0)]);
    }

    #[test]
    fn ema_known_values() {
        // span = 3 => multiplier = 0.5
        let values = vec![2.0, 4.0, 8.0];
        let ema = calculate_ema(&values, 3);
        assert_eq!(ema[0], Some(2.0));
        assert_eq!(ema[1], Some(3.0)); // 4*0.5 + 2*0.5
        assert_eq!(ema[2], Some(5.5)); // 8*0.5 + 3*0.5
    }

    #[test]
    fn ema_every_position_defined() {
        let values: Vec<f64> = (1..=40).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 12);
        assert_eq!(ema.len(), 40);
        assert!(ema.iter().all(|v| v.is_some()));
    }

    #[test]
    fn ema_tracks_the_series_from_below_on_an_uptrend() {
        let values: Vec<f64> = (1..=60).map(|x| x as f64).collect();
        let ema = calculate_ema(&values, 12);
        let last = ema.last().unwrap().unwrap();
        assert!(last < 60.0);
        assert!(last > 50.0);
    }

    #[test]
    fn ema_stops_on_nan_input() {
        let values = vec![1.0, 2.0, f64::NAN, 4.0];
        let ema = calculate_ema(&values, 3);
        assert_eq!(ema[0], Some(1.0));
        assert!(ema[1].is_some());
        assert_eq!(ema[2], None);
        assert_eq!(ema[3], None);
    }

    #[test]
    fn ema_values_matches_aligned_form() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let plain = ema_values(&values, 4);
        let aligned = calculate_ema(&values, 4);
        assert_eq!(plain.len(), 10);
        for (p, a) in plain.iter().zip(aligned.iter()) {
            assert_eq!(Some(*p), *a);
        }
    }
}
