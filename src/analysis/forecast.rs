//! Forecasting strategies.
//!
//! Two strategies coexist and are kept separate because they answer
//! different questions: [`ShortHorizonForecaster`] fits an OLS line and
//! predicts the next value, [`MultiStepForecaster`] runs Holt linear
//! smoothing and projects several steps ahead with decaying confidence.

use crate::analysis::stats::{predict_next, Prediction};
use crate::models::{Forecast, History, Insight, InsightKind, Metric, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastStrategy {
    ShortHorizon,
    MultiStep,
}

impl fmt::Display for ForecastStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForecastStrategy::ShortHorizon => f.write_str("short_horizon"),
            ForecastStrategy::MultiStep => f.write_str("multi_step"),
        }
    }
}

/// OLS extrapolation `periods` steps past the end of the series.
#[derive(Debug, Clone, Copy)]
pub struct ShortHorizonForecaster {
    pub periods: usize,
}

impl Default for ShortHorizonForecaster {
    fn default() -> Self {
        Self { periods: 1 }
    }
}

impl ShortHorizonForecaster {
    pub fn predict(&self, values: &[f64]) -> Prediction {
        predict_next(values, self.periods)
    }

    pub fn forecast(&self, values: &[f64]) -> Forecast {
        let prediction = self.predict(values);
        Forecast {
            step: self.periods,
            value: prediction.value,
            confidence: prediction.confidence,
        }
    }
}

/// Holt linear smoothing; step `i` is `level + i * trend` at confidence
/// `max(30, 90 - 10 i)`.
#[derive(Debug, Clone, Copy)]
pub struct MultiStepForecaster {
    pub alpha: f64,
    pub beta: f64,
}

impl Default for MultiStepForecaster {
    fn default() -> Self {
        Self { alpha: 0.3, beta: 0.1 }
    }
}

impl MultiStepForecaster {
    /// Final `(level, trend)` after smoothing the whole series.
    pub fn smooth(&self, values: &[f64]) -> (f64, f64) {
        match values {
            [] => (0.0, 0.0),
            [only] => (*only, 0.0),
            [first, second, rest @ ..] => {
                let mut level = *second;
                let mut trend = second - first;
                for &value in rest {
                    let previous_level = level;
                    level = self.alpha * value + (1.0 - self.alpha) * (level + trend);
                    trend = self.beta * (level - previous_level) + (1.0 - self.beta) * trend;
                }
                (level, trend)
            }
        }
    }

    pub fn forecast(&self, values: &[f64], steps: usize) -> Vec<Forecast> {
        let (level, trend) = self.smooth(values);
        (1..=steps).map(|step| project(level, trend, step)).collect()
    }

    /// Projections at arbitrary offsets, e.g. 30, 60 and 120 ticks out.
    pub fn project_at(&self, values: &[f64], offsets: &[usize]) -> Vec<Forecast> {
        let (level, trend) = self.smooth(values);
        offsets.iter().map(|&step| project(level, trend, step)).collect()
    }
}

fn project(level: f64, trend: f64, step: usize) -> Forecast {
    Forecast {
        step,
        value: level + step as f64 * trend,
        confidence: multi_step_confidence(step),
    }
}

pub fn multi_step_confidence(step: usize) -> f64 {
    (90.0 - step as f64 * 10.0).max(30.0)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricForecast {
    pub metric: Metric,
    pub strategy: ForecastStrategy,
    pub points: Vec<Forecast>,
}

/// Next-tick OLS prediction for every metric.
pub fn predict_metrics(history: &History) -> Vec<MetricForecast> {
    let forecaster = ShortHorizonForecaster::default();
    Metric::ALL
        .iter()
        .map(|&metric| MetricForecast {
            metric,
            strategy: ForecastStrategy::ShortHorizon,
            points: vec![forecaster.forecast(&history.values(metric))],
        })
        .collect()
}

/// Cross-metric multi-step forecasts.
pub fn forecast_metrics(history: &History, steps: usize) -> Vec<MetricForecast> {
    let forecaster = MultiStepForecaster::default();
    Metric::ALL
        .iter()
        .map(|&metric| MetricForecast {
            metric,
            strategy: ForecastStrategy::MultiStep,
            points: forecaster.forecast(&history.values(metric), steps),
        })
        .collect()
}

pub fn long_horizon(history: &History, metric: Metric, offsets: &[usize]) -> MetricForecast {
    MetricForecast {
        metric,
        strategy: ForecastStrategy::MultiStep,
        points: MultiStepForecaster::default().project_at(&history.values(metric), offsets),
    }
}

/// Flags metrics that are currently normal but whose furthest multi-step
/// forecast leaves the normal range.
pub fn projection_insights(history: &History, forecasts: &[MetricForecast]) -> Vec<Insight> {
    let latest = match history.latest() {
        Some(reading) => reading,
        None => return Vec::new(),
    };

    forecasts
        .iter()
        .filter(|f| f.strategy == ForecastStrategy::MultiStep)
        .filter_map(|f| {
            let point = f.points.last()?;
            let current = latest.value(f.metric);
            if !f.metric.is_normal(current) || f.metric.is_normal(point.value) {
                return None;
            }
            let (low, high) = f.metric.normal_range();
            let direction = if point.value > high { "above" } else { "below" };
            Some(
                Insight::new(
                    InsightKind::Trend,
                    Severity::Medium,
                    format!("{} heading out of range", f.metric.name()),
                    format!(
                        "{} is projected to reach {:.1} {} within {} readings, {} the {:.1}-{:.1} range",
                        f.metric.name(), point.value, f.metric.unit(), point.step, direction, low, high
                    ),
                    point.confidence,
                    "Holt linear smoothing (alpha 0.3, beta 0.1) over the history window",
                )
                .with_metric(f.metric, point.value),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::fixtures::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_short_horizon_matches_ols() {
        let forecast = ShortHorizonForecaster::default().forecast(&[70.0, 72.0, 74.0, 76.0, 78.0]);
        assert_eq!(forecast.step, 1);
        assert_relative_eq!(forecast.value, 80.0, epsilon = 1e-9);
        assert_eq!(forecast.confidence, 90.0);
    }

    #[test]
    fn test_multi_step_on_exact_line_extends_line() {
        let forecasts = MultiStepForecaster::default().forecast(&[10.0, 12.0, 14.0, 16.0, 18.0], 3);
        assert_eq!(forecasts.len(), 3);
        assert_relative_eq!(forecasts[0].value, 20.0, epsilon = 1e-9);
        assert_relative_eq!(forecasts[2].value, 24.0, epsilon = 1e-9);
    }

    #[test]
    fn test_multi_step_confidence_decays_to_floor() {
        let forecasts = MultiStepForecaster::default().forecast(&[1.0, 2.0, 3.0], 8);
        let confidences: Vec<f64> = forecasts.iter().map(|f| f.confidence).collect();
        assert_eq!(confidences, vec![80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 30.0, 30.0]);
    }

    #[test]
    fn test_multi_step_degenerate_series_is_flat() {
        let forecaster = MultiStepForecaster::default();
        let single = forecaster.forecast(&[97.0], 2);
        assert_eq!(single[0].value, 97.0);
        assert_eq!(single[1].value, 97.0);
        assert_eq!(forecaster.forecast(&[], 1)[0].value, 0.0);
    }

    #[test]
    fn test_strategies_disagree_on_noisy_series() {
        let values = [70.0, 90.0, 72.0, 88.0, 71.0, 95.0];
        let ols = ShortHorizonForecaster::default().forecast(&values).value;
        let holt = MultiStepForecaster::default().forecast(&values, 1)[0].value;
        assert!((ols - holt).abs() > 1e-6);
    }

    #[test]
    fn test_long_horizon_offsets() {
        let history = history_of((0..6).map(|i| reading(70.0 + i as f64, 120.0, 80.0, 36.8, 98.0)).collect());
        let projection = long_horizon(&history, Metric::HeartRate, &[30, 60]);
        assert_eq!(projection.points.len(), 2);
        assert_eq!(projection.points[0].step, 30);
        assert_relative_eq!(projection.points[0].value, 105.0, epsilon = 1e-9);
        assert_eq!(projection.points[1].confidence, 30.0);
    }

    #[test]
    fn test_forecast_metrics_covers_every_metric() {
        let history = history_of(vec![resting(), resting(), resting()]);
        let forecasts = forecast_metrics(&history, 2);
        assert_eq!(forecasts.len(), Metric::ALL.len());
        assert!(forecasts.iter().all(|f| f.points.len() == 2));
        let next = predict_metrics(&history);
        assert!(next.iter().all(|f| f.strategy == ForecastStrategy::ShortHorizon));
        assert_relative_eq!(next[0].points[0].value, 75.0, epsilon = 1e-9);
    }

    #[test]
    fn test_projection_insight_for_rising_heart_rate() {
        let history = history_of((0..6).map(|i| reading(80.0 + 3.0 * i as f64, 120.0, 80.0, 36.8, 98.0)).collect());
        let forecasts = forecast_metrics(&history, 3);
        let insights = projection_insights(&history, &forecasts);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Trend);
        assert_eq!(insights[0].related_metric, Some(Metric::HeartRate));
        assert_eq!(insights[0].confidence, 60.0);
    }

    #[test]
    fn test_projection_ignores_already_abnormal_metrics() {
        let history = history_of((0..6).map(|i| reading(110.0 + 3.0 * i as f64, 120.0, 80.0, 36.8, 98.0)).collect());
        let forecasts = forecast_metrics(&history, 3);
        assert!(projection_insights(&history, &forecasts).is_empty());
        assert!(projection_insights(&History::new(5), &forecasts).is_empty());
    }
}
