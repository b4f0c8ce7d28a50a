//! Indicator engine: SMA and RSI over an ascending bar series.
//!
//! Pure functions; `None` marks a value that is not computable yet, which
//! the store persists as NULL.

use crate::db::models::Bar;

/// Simple moving average of `values` over a trailing `window`.
///
/// The first `window - 1` outputs are `None`: no full window exists yet and
/// emitting zero there would poison downstream consumers.
pub fn simple_moving_average(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    let mut sum: f64 = values[..window].iter().sum();
    result[window - 1] = Some(sum / window as f64);

    for i in window..n {
        sum += values[i] - values[i - window];
        result[i] = Some(sum / window as f64);
    }

    result
}

/// Relative strength index of `closes` over a trailing `window`.
///
/// Average gain/loss are plain rolling means with a minimum sample count of
/// one: before the window fills, the mean runs over however many samples
/// exist so far. That always yields a number once prices have moved, at the
/// cost of early-series accuracy, and is deliberate.
///
/// The first bar has no previous close, so it contributes a zero gain and a
/// zero loss sample. When both averages are zero (a flat price run, or the
/// very first bar) the gain/loss ratio is indeterminate and the output is
/// `None`. When only the loss average is zero, RSI saturates to 100.
pub fn relative_strength(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let n = closes.len();
    let mut result = vec![None; n];
    if window == 0 || n == 0 {
        return result;
    }

    let mut gains = vec![0.0; n];
    let mut losses = vec![0.0; n];
    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        gains[i] = delta.max(0.0);
        losses[i] = (-delta).max(0.0);
    }

    for i in 0..n {
        let start = (i + 1).saturating_sub(window);
        let samples = (i - start + 1) as f64;
        let avg_gain: f64 = gains[start..=i].iter().sum::<f64>() / samples;
        let avg_loss: f64 = losses[start..=i].iter().sum::<f64>() / samples;

        result[i] = if avg_gain == 0.0 && avg_loss == 0.0 {
            None
        } else if avg_loss == 0.0 {
            Some(100.0)
        } else {
            let rs = avg_gain / avg_loss;
            Some(100.0 - 100.0 / (1.0 + rs))
        };
    }

    result
}

/// Fill the `sma` and `rsi` slots of every bar in place.
///
/// Input must be ascending by date; output keeps length and order.
pub fn add_indicators(bars: &mut [Bar], sma_window: usize, rsi_window: usize) {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma = simple_moving_average(&closes, sma_window);
    let rsi = relative_strength(&closes, rsi_window);

    for (bar, (sma, rsi)) in bars.iter_mut().zip(sma.into_iter().zip(rsi)) {
        bar.sma = sma;
        bar.rsi = rsi;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a computed value");
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    fn make_bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                Bar::raw(
                    format!("2024-01-{:02}", i + 1),
                    close,
                    close + 1.0,
                    close - 1.0,
                    close,
                    1_000,
                )
            })
            .collect()
    }

    #[test]
    fn sma_window_two_scenario() {
        // Closes 10, 12, 11, 13 with window 2
        let result = simple_moving_average(&[10.0, 12.0, 11.0, 13.0], 2);
        assert_eq!(result.len(), 4);
        assert_eq!(result[0], None);
        assert_approx(result[1], 11.0);
        assert_approx(result[2], 11.5);
        assert_approx(result[3], 12.0);
    }

    #[test]
    fn sma_leading_nones_then_exact_means() {
        let values = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0];
        let result = simple_moving_average(&values, 5);
        for v in &result[..4] {
            assert_eq!(*v, None);
        }
        assert_approx(result[4], 12.0);
        assert_approx(result[5], 13.0);
        assert_approx(result[6], 14.0);
    }

    #[test]
    fn sma_window_one_is_close() {
        let result = simple_moving_average(&[100.0, 200.0, 300.0], 1);
        assert_approx(result[0], 100.0);
        assert_approx(result[1], 200.0);
        assert_approx(result[2], 300.0);
    }

    #[test]
    fn sma_too_few_values() {
        let result = simple_moving_average(&[10.0, 11.0], 5);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_first_bar_is_undefined() {
        let result = relative_strength(&[100.0, 101.0, 102.0], 14);
        assert_eq!(result[0], None);
    }

    #[test]
    fn rsi_all_gains_saturates_to_100() {
        let result = relative_strength(&[100.0, 101.0, 102.0, 103.0], 14);
        assert_approx(result[1], 100.0);
        assert_approx(result[3], 100.0);
    }

    #[test]
    fn rsi_all_losses_is_zero() {
        let result = relative_strength(&[103.0, 102.0, 101.0, 100.0], 14);
        assert_approx(result[1], 0.0);
        assert_approx(result[3], 0.0);
    }

    #[test]
    fn rsi_flat_run_is_undefined() {
        let result = relative_strength(&[50.0, 50.0, 50.0, 50.0], 14);
        assert!(result.iter().all(|v| v.is_none()));
    }

    #[test]
    fn rsi_rolling_mean_before_window_fills() {
        // Plain rolling means with min sample count 1 (not Wilder smoothing):
        // closes 10, 12, 11, 13 → gains [0,2,0,2], losses [0,0,1,0]
        let result = relative_strength(&[10.0, 12.0, 11.0, 13.0], 14);
        assert_eq!(result[0], None);
        assert_approx(result[1], 100.0); // avg_loss 0, avg_gain > 0
        assert_approx(result[2], 100.0 - 100.0 / 3.0); // rs = (2/3)/(1/3) = 2
        assert_approx(result[3], 80.0); // rs = 1.0/0.25 = 4
    }

    #[test]
    fn rsi_window_slides_once_full() {
        // Window 2: at index 3 only samples from indexes 2..=3 count
        let result = relative_strength(&[10.0, 12.0, 11.0, 13.0], 2);
        // gains [0,2,0,2], losses [0,0,1,0]; window at 3: avg_gain 1, avg_loss 0.5
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 2.0));
    }

    #[test]
    fn rsi_bounded_when_emitted() {
        let closes = [100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0];
        for v in relative_strength(&closes, 3).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {v}");
        }
    }

    #[test]
    fn add_indicators_keeps_length_and_order() {
        let mut bars = make_bars(&[10.0, 12.0, 11.0, 13.0]);
        add_indicators(&mut bars, 2, 14);

        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].date, "2024-01-01");
        assert_eq!(bars[0].sma, None);
        assert_approx(bars[1].sma, 11.0);
        assert_approx(bars[3].sma, 12.0);
        assert_eq!(bars[0].rsi, None);
        assert_approx(bars[3].rsi, 80.0);
    }
}
