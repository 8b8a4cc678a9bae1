//! Statistics primitives over `&[f64]` series.
//!
//! Degenerate input never panics or produces NaN: empty series, single-point
//! series and zero-variance series map to the documented sentinels below.

use serde::{Deserialize, Serialize};

/// Minimum number of points before a slope is considered meaningful.
pub const MIN_TREND_POINTS: usize = 3;

/// Confidence reported when there is too little history to fit a line.
pub const MIN_PREDICTION_CONFIDENCE: f64 = 30.0;
pub const MAX_PREDICTION_CONFIDENCE: f64 = 90.0;

/// Ordinary least squares fit of a series against its index `0..n-1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl Regression {
    pub fn at(&self, index: f64) -> f64 {
        self.intercept + self.slope * index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub value: f64,
    pub confidence: f64,
}

/// Arithmetic mean; 0 for an empty series.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Population standard deviation (divides by n); 0 for an empty series.
pub fn standard_deviation(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean_val = mean(values);
    let variance = values.iter()
        .map(|v| (v - mean_val).powi(2))
        .sum::<f64>() / values.len() as f64;
    variance.max(0.0).sqrt()
}

/// Unsigned distance from the mean in standard deviations. A zero (or
/// non-finite) deviation means "no deviation" and yields 0.
pub fn z_score(value: f64, mean: f64, std: f64) -> f64 {
    if std == 0.0 || !std.is_finite() {
        return 0.0;
    }
    ((value - mean) / std).abs()
}

/// Pearson correlation coefficient in [-1, 1].
///
/// Returns 0 when the lengths differ, either series is empty, or either
/// series has zero variance.
pub fn pearson_correlation(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() != ys.len() || xs.is_empty() {
        return 0.0;
    }

    let mean_x = mean(xs);
    let mean_y = mean(ys);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}

/// OLS fit against the index. `None` for fewer than two points.
///
/// A zero-variance series is fitted perfectly by its flat line, so its
/// R² is reported as 1.
pub fn linear_regression(values: &[f64]) -> Option<Regression> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let n_f = n as f64;
    let mean_x = (n_f - 1.0) / 2.0;
    let mean_y = mean(values);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxy += dx * (y - mean_y);
        sxx += dx * dx;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let ss_tot: f64 = values.iter().map(|y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = values.iter()
        .enumerate()
        .map(|(i, y)| (y - (intercept + slope * i as f64)).powi(2))
        .sum();

    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    };

    Some(Regression { slope, intercept, r_squared })
}

/// OLS slope per index step; 0 for fewer than three points.
pub fn linear_trend(values: &[f64]) -> f64 {
    if values.len() < MIN_TREND_POINTS {
        return 0.0;
    }
    linear_regression(values).map(|r| r.slope).unwrap_or(0.0)
}

/// Extrapolates the OLS line `periods` steps past the last point.
///
/// Confidence is R² as a percentage clamped to [30, 90]. With fewer than
/// three points the last value (0 if empty) is returned at confidence 30.
pub fn predict_next(values: &[f64], periods: usize) -> Prediction {
    if values.len() < MIN_TREND_POINTS {
        return Prediction {
            value: values.last().copied().unwrap_or(0.0),
            confidence: MIN_PREDICTION_CONFIDENCE,
        };
    }

    match linear_regression(values) {
        Some(fit) => {
            let target = (values.len() + periods) as f64 - 1.0;
            Prediction {
                value: fit.at(target),
                confidence: (fit.r_squared * 100.0)
                    .clamp(MIN_PREDICTION_CONFIDENCE, MAX_PREDICTION_CONFIDENCE),
            }
        }
        None => Prediction {
            value: values.last().copied().unwrap_or(0.0),
            confidence: MIN_PREDICTION_CONFIDENCE,
        },
    }
}

/// Mean absolute first difference; 0 for fewer than two points.
pub fn variability(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let total: f64 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    total / (values.len() - 1) as f64
}

/// Trailing simple moving average.
///
/// A window of 0 or an empty series gives no points; a window longer than
/// the series gives the single overall mean.
pub fn moving_average(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 || values.is_empty() {
        return Vec::new();
    }
    if window >= values.len() {
        return vec![mean(values)];
    }
    values.windows(window).map(mean).collect()
}
