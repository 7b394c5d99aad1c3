//! Technical indicators over DataFrame columns.
//!
//! Each function takes a frame plus column name(s), evaluates the indicator
//! through the lazy engine, and returns the frame with the result appended.
//! Rolling windows require a full window of values, so every indicator with a
//! window of `w` starts with `w - 1` (or, when differencing first, `w`) null
//! rows. A missing column surfaces as polars' column-not-found error.

use polars::prelude::*;

fn full_window(window: usize) -> RollingOptionsFixedWindow {
    RollingOptionsFixedWindow {
        window_size: window,
        min_periods: window,
        ..Default::default()
    }
}

/// Difference between the current value and the value `periods` rows back,
/// appended as `{column}_delta_{periods}`.
pub fn delta(df: &DataFrame, column: &str, periods: i64) -> PolarsResult<DataFrame> {
    let expr = (col(column) - col(column).shift(lit(periods)))
        .alias(format!("{column}_delta_{periods}"));
    df.clone().lazy().with_columns([expr]).collect()
}

/// Natural log of the ratio to the previous row, appended as
/// `{column}_log_return`.
pub fn log_return(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let expr = (col(column) / col(column).shift(lit(1)))
        .log(lit(std::f64::consts::E))
        .alias(format!("{column}_log_return"));
    df.clone().lazy().with_columns([expr]).collect()
}

/// Simple moving average over `window` rows, appended as
/// `{column}_sma_{window}`.
pub fn sma(df: &DataFrame, column: &str, window: usize) -> PolarsResult<DataFrame> {
    let expr = col(column)
        .rolling_mean(full_window(window))
        .alias(format!("{column}_sma_{window}"));
    df.clone().lazy().with_columns([expr]).collect()
}

/// Relative Strength Index, appended as `{column}_rsi_{window}`.
///
/// `RSI = 100 - 100 / (1 + avg_gain / avg_loss)` where the averages are
/// rolling means of the one-row gains and losses.
pub fn rsi(df: &DataFrame, column: &str, window: usize) -> PolarsResult<DataFrame> {
    let diff = col(column) - col(column).shift(lit(1));
    let gain = when(diff.clone().gt(lit(0.0)))
        .then(diff.clone())
        .otherwise(lit(0.0));
    let loss = when(diff.clone().lt(lit(0.0)))
        .then(-diff)
        .otherwise(lit(0.0));
    let avg_gain = gain.rolling_mean(full_window(window));
    let avg_loss = loss.rolling_mean(full_window(window));

    let expr = (lit(100.0) - lit(100.0) / (lit(1.0) + avg_gain / avg_loss))
        .alias(format!("{column}_rsi_{window}"));
    df.clone().lazy().with_columns([expr]).collect()
}

/// Bollinger bands: rolling mean plus bands `num_std` sample standard
/// deviations out, appended as `{column}_bb_mid`, `{column}_bb_upper` and
/// `{column}_bb_lower`.
pub fn bollinger_bands(
    df: &DataFrame,
    column: &str,
    window: usize,
    num_std: f64,
) -> PolarsResult<DataFrame> {
    let mid = col(column).rolling_mean(full_window(window));
    let std = col(column).rolling_std(full_window(window));
    let upper = mid.clone() + lit(num_std) * std.clone();
    let lower = mid.clone() - lit(num_std) * std;

    df.clone()
        .lazy()
        .with_columns([
            mid.alias(format!("{column}_bb_mid")),
            upper.alias(format!("{column}_bb_upper")),
            lower.alias(format!("{column}_bb_lower")),
        ])
        .collect()
}

/// Average True Range over `window` rows, appended as `atr`.
///
/// The true range is the largest of high-low, |high - previous close| and
/// |low - previous close|; on the first row only high-low is defined.
pub fn atr(
    df: &DataFrame,
    high: &str,
    low: &str,
    close: &str,
    window: usize,
) -> PolarsResult<DataFrame> {
    let prev_close = col(close).shift(lit(1));
    let high_low = col(high) - col(low);
    let high_close = (col(high) - prev_close.clone()).abs();
    let low_close = (col(low) - prev_close).abs();
    let true_range = max_horizontal([high_low, high_close, low_close])?;

    let expr = true_range.rolling_mean(full_window(window)).alias("atr");
    df.clone().lazy().with_columns([expr]).collect()
}
