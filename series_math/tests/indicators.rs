use approx::assert_relative_eq;
use series_math::{ema, population_std_dev, roc, rsi, sma, trailing_range, MathError};

fn window(values: &[f64], index: usize, len: usize) -> &[f64] {
    &values[trailing_range(index, len)]
}

#[test]
fn test_sma_window_of_one_is_identity() {
    let values = [100.0, 110.0, 121.0, 90.5];
    for i in 0..values.len() {
        assert_eq!(sma(window(&values, i, 1)).unwrap(), values[i]);
    }
}

#[test]
fn test_sma_clipped_window() {
    let values = [2.0, 4.0, 6.0, 8.0];
    // Only two values exist up to index 1
    assert_relative_eq!(sma(window(&values, 1, 3)).unwrap(), 3.0);
    assert_relative_eq!(sma(window(&values, 3, 3)).unwrap(), 6.0);
}

#[test]
fn test_roc_on_compounding_series() {
    let values = [100.0, 110.0, 121.0];
    assert_relative_eq!(roc(values[2], values[1]), 10.0, epsilon = 1e-9);
    assert_relative_eq!(roc(values[2], values[0]), 21.0, epsilon = 1e-9);
}

#[test]
fn test_population_std_dev_three_points() {
    let values = [100.0, 110.0, 121.0];
    let expected = (220.666_666_666_666_7_f64 / 3.0).sqrt();
    assert_relative_eq!(
        population_std_dev(window(&values, 2, 3)).unwrap(),
        expected,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        population_std_dev(window(&values, 2, 3)).unwrap(),
        8.5765,
        epsilon = 1e-4
    );
}

#[test]
fn test_rsi_uses_period_plus_one_values() {
    let values = [10.0, 11.0, 10.0, 12.0, 13.0];
    // Period 2 at index 4: deltas 2 and 1, no losses
    assert_eq!(rsi(window(&values, 4, 3)).unwrap(), 100.0);
    // Period 3 at index 4: deltas -1, 2, 1
    let value = rsi(window(&values, 4, 4)).unwrap();
    assert_relative_eq!(value, 75.0, epsilon = 1e-12);
}

#[test]
fn test_ema_period_errors() {
    assert_eq!(
        ema(&[1.0], 0),
        Err(MathError::InvalidInput(
            "Period must be greater than zero".to_string()
        ))
    );
}
