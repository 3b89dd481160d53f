// =============================================================================
// Disparity — close vs. moving average, in percent
// =============================================================================
//
//   disparity = (close - MA) / MA * 100
//
// Positive means the close sits above its average, negative below. The
// overextension and proximity rules in the classifier both read this series.

use super::IndicatorSeries;

/// Compute the disparity series for `closes` against an aligned MA series.
///
/// Undefined wherever the MA is undefined or too close to zero to divide by.
pub fn calculate_disparity(closes: &[f64], sma: &IndicatorSeries) -> IndicatorSeries {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let ma = sma.get(i).copied().flatten()?;
            if ma.abs() < f64::EPSILON {
                return None;
            }
            let pct = (close - ma) / ma * 100.0;
            pct.is_finite().then_some(pct)
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disparity_known_values() {
        let closes = vec![110.0, 95.0, 100.0];
        let sma = vec![Some(100.0), Some(100.0), Some(100.0)];
        let disp = calculate_disparity(&closes, &sma);
        assert_eq!(disp, vec![Some(10.0), Some(-5.0), Some(0.0)]);
    }

    #[test]
    fn disparity_undefined_where_ma_is() {
        let closes = vec![100.0, 101.0, 102.0];
        let sma = vec![None, None, Some(101.0)];
        let disp = calculate_disparity(&closes, &sma);
        assert_eq!(disp[0], None);
        assert_eq!(disp[1], None);
        assert!(disp[2].is_some());
    }

    #[test]
    fn disparity_guards_zero_ma() {
        let closes = vec![100.0];
        let sma = vec![Some(0.0)];
        assert_eq!(calculate_disparity(&closes, &sma), vec![None]);
    }

    #[test]
    fn disparity_tolerates_length_mismatch() {
        let closes = vec![100.0, 101.0];
        let sma = vec![Some(100.0)];
        let disp = calculate_disparity(&closes, &sma);
        assert_eq!(disp.len(), 2);
        assert_eq!(disp[0], Some(0.0));
        assert_eq!(disp[1], None);
    }
}
