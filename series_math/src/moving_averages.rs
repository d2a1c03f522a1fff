//! Moving average calculations
//!
//! Contains window implementations of:
//! - Simple Moving Average (SMA)
//! - Exponential Moving Average (EMA)

use crate::{check_period, check_window, MathError, Result};

/// Simple Moving Average of a trailing window.
///
/// The window is whatever the caller cut from the series, so a window clipped
/// at the start of a series averages over fewer values. Missing values (NaN)
/// propagate into the result.
pub fn sma(window: &[f64]) -> Result<f64> {
    check_window(window)?;
    Ok(window.iter().sum::<f64>() / window.len() as f64)
}

/// Exponential Moving Average of a trailing window.
///
/// `window` holds the values from `max(0, i - period)` up to and including
/// the current index `i`. The recurrence is seeded with the current value and
/// walks backward towards the oldest value:
///
/// `ema = value * k + ema * (1 - k)` with `k = 2 / (period + 1)`.
pub fn ema(window: &[f64], period: usize) -> Result<f64> {
    check_period(period)?;
    let Some((current, history)) = window.split_last() else {
        return Err(MathError::InsufficientData(
            "Window contains no values".to_string(),
        ));
    };

    let k = 2.0 / (period as f64 + 1.0);

    let mut value = *current;
    for &older in history.iter().rev() {
        value = older * k + value * (1.0 - k);
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_calculation() {
        let window = [10.0, 20.0, 30.0];
        assert_relative_eq!(sma(&window).unwrap(), 20.0);
    }

    #[test]
    fn test_sma_single_value_is_identity() {
        assert_relative_eq!(sma(&[42.5]).unwrap(), 42.5);
    }

    #[test]
    fn test_sma_propagates_missing() {
        assert!(sma(&[1.0, f64::NAN]).unwrap().is_nan());
    }

    #[test]
    fn test_sma_empty_window() {
        assert!(sma(&[]).is_err());
    }

    #[test]
    fn test_ema_seeded_with_current_value() {
        // k = 2 / 3; seed 12, then 11 * k + 12 * (1 - k), then 10 * k + ...
        let window = [10.0, 11.0, 12.0];
        let k = 2.0 / 3.0;
        let step1 = 11.0 * k + 12.0 * (1.0 - k);
        let expected = 10.0 * k + step1 * (1.0 - k);
        assert_relative_eq!(ema(&window, 2).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_first_index_returns_value() {
        assert_relative_eq!(ema(&[7.0], 5).unwrap(), 7.0);
    }

    #[test]
    fn test_ema_zero_period() {
        assert!(ema(&[1.0, 2.0], 0).is_err());
    }
}
