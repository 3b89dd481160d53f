// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// Arithmetic mean of the last `window` values. The output is aligned with the
// input: positions before the window fills are `None`.

use super::IndicatorSeries;

/// Compute the SMA series for `values` over `window`.
///
/// # Edge cases
/// - `window == 0` => all `None` (division by zero guard)
/// - `values.len() < window` => all `None`
/// - Non-finite window sums produce `None` at that position.
pub fn calculate_sma(values: &[f64], window: usize) -> IndicatorSeries {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for i in (window - 1)..values.len() {
        let sum: f64 = values[i + 1 - window..=i].iter().sum();
        let mean = sum / window as f64;
        if mean.is_finite() {
            result[i] = Some(mean);
        }
    }

    result
}

/// SMA over a series that may itself contain gaps (the volume series).
///
/// A window containing any missing value yields `None`; gaps are never
/// treated as zero.
pub fn calculate_sma_optional(values: &[Option<f64>], window: usize) -> IndicatorSeries {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for i in (window - 1)..values.len() {
        let window_values = &values[i + 1 - window..=i];
        if window_values.iter().any(|v| v.is_none()) {
            continue;
        }
        let sum: f64 = window_values.iter().flatten().sum();
        let mean = sum / window as f64;
        if mean.is_finite() {
            result[i] = Some(mean);
        }
    }

    result
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(calculate_sma(&[], 5).is_empty());
    }

    #[test]
    fn sma_window_zero() {
        assert_eq!(calculate_sma(&[1.0, 2.0, 3.0], 0), vec![None, None, None]);
    }

    #[test]
    fn sma_leading_run_is_undefined() {
        let values: Vec<f64> = (1..=5).map(|x| x as f64).collect();
        let sma = calculate_sma(&values, 3);
        assert_eq!(sma.len(), 5);
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
        assert_eq!(sma[4], Some(4.0));
    }

    #[test]
    fn sma_exact_window_boundary() {
        // Exactly `window` values: defined only at the last position.
        let values = vec![10.0; 20];
        let sma = calculate_sma(&values, 20);
        assert!(sma[..19].iter().all(|v| v.is_none()));
        assert_eq!(sma[19], Some(10.0));
    }

    #[test]
    fn sma_one_short_of_window_is_all_undefined() {
        let values = vec![10.0; 19];
        let sma = calculate_sma(&values, 20);
        assert!(sma.iter().all(|v| v.is_none()));
    }

    #[test]
    fn sma_optional_gap_poisons_its_windows() {
        let values = vec![
            Some(10.0),
            Some(20.0),
            None,
            Some(40.0),
            Some(50.0),
            Some(60.0),
        ];
        let sma = calculate_sma_optional(&values, 3);
        // Windows touching index 2 stay undefined.
        assert_eq!(sma[2], None);
        assert_eq!(sma[3], None);
        assert_eq!(sma[4], None);
        assert_eq!(sma[5], Some(50.0));
    }

    #[test]
    fn sma_optional_matches_plain_sma_without_gaps() {
        let plain: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let wrapped: Vec<Option<f64>> = plain.iter().copied().map(Some).collect();
        assert_eq!(
            calculate_sma(&plain, 4),
            calculate_sma_optional(&wrapped, 4)
        );
    }
}
