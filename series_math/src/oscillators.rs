//! Oscillator indicator calculations
//!
//! Contains window implementations of:
//! - Rate of Change (ROC)
//! - Relative Strength Index (RSI)

use crate::{check_window, Result};

/// Period used by `RSI(X)` when no period argument is given
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Percent change of `current` against `reference`.
///
/// Returns NaN when the reference is zero or either value is missing.
pub fn roc(current: f64, reference: f64) -> f64 {
    if reference == 0.0 {
        return f64::NAN;
    }
    (current - reference) / reference * 100.0
}

/// Relative Strength Index over the deltas of a trailing window.
///
/// `window` holds the values from `max(0, i - period)` up to and including the
/// current index, so a full window yields `period` deltas. Gains and losses
/// are plain sums, not smoothed averages:
/// - no losses: 100
/// - losses but no gains: 0
/// - otherwise `100 - 100 / (1 + gains / losses)`
pub fn rsi(window: &[f64]) -> Result<f64> {
    check_window(window)?;

    let mut gains = 0.0;
    let mut losses = 0.0;
    for pair in window.windows(2) {
        let change = pair[1] - pair[0];
        if change.is_nan() {
            return Ok(f64::NAN);
        }
        if change > 0.0 {
            gains += change;
        } else if change < 0.0 {
            losses -= change;
        }
    }

    if losses == 0.0 {
        return Ok(100.0);
    }
    if gains == 0.0 {
        return Ok(0.0);
    }

    Ok(100.0 - 100.0 / (1.0 + gains / losses))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_roc_calculation() {
        assert_relative_eq!(roc(121.0, 110.0), 10.0, epsilon = 1e-12);
        assert_relative_eq!(roc(90.0, 100.0), -10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roc_zero_reference() {
        assert!(roc(5.0, 0.0).is_nan());
    }

    #[test]
    fn test_rsi_all_gains() {
        assert_eq!(rsi(&[1.0, 2.0, 3.0]).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_all_losses() {
        assert_eq!(rsi(&[3.0, 2.0, 1.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_window_counts_as_no_losses() {
        assert_eq!(rsi(&[5.0, 5.0, 5.0]).unwrap(), 100.0);
        assert_eq!(rsi(&[5.0]).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_mixed() {
        // gains = 2 + 1 = 3, losses = 1
        let value = rsi(&[10.0, 12.0, 11.0, 12.0]).unwrap();
        assert_relative_eq!(value, 75.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rsi_missing_value() {
        assert!(rsi(&[1.0, f64::NAN, 2.0]).unwrap().is_nan());
    }
}
