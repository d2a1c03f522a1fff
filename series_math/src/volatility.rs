//! Volatility calculations

use crate::{check_window, Result};
use statrs::statistics::Statistics;

/// Population standard deviation (divide by `n`) of a trailing window.
pub fn population_std_dev(window: &[f64]) -> Result<f64> {
    check_window(window)?;
    Ok(window.iter().population_std_dev())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_population_std_dev() {
        let window = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std_dev(&window).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_value_has_no_spread() {
        assert_relative_eq!(population_std_dev(&[3.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_window() {
        assert!(population_std_dev(&[]).is_err());
    }
}
