//! Z-score anomaly detection against a subject's baseline.

use crate::analysis::baseline::BaselineStore;
use crate::analysis::stats::{pearson_correlation, z_score};
use crate::models::{Baseline, History, Insight, InsightKind, Metric, Reading, Severity};
use serde::{Deserialize, Serialize};

pub const ANOMALY_Z_THRESHOLD: f64 = 2.0;
pub const CRITICAL_Z_THRESHOLD: f64 = 3.0;
pub const CORRELATION_WINDOW: usize = 10;
pub const CORRELATION_THRESHOLD: f64 = 0.7;

/// Metrics that emit anomaly insights. Temperature and oxygen saturation
/// deviations reach the caller only through the risk score.
pub const ANOMALY_METRICS: [Metric; 2] = [Metric::HeartRate, Metric::Systolic];

/// Unsigned z-score of every metric of a reading against a baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScores {
    pub heart_rate: f64,
    pub systolic: f64,
    pub diastolic: f64,
    pub temperature: f64,
    pub oxygen_saturation: f64,
}

impl ZScores {
    pub fn of(reading: &Reading, baseline: &Baseline) -> Self {
        let z = |metric: Metric| {
            let reference = baseline.get(metric);
            z_score(reading.value(metric), reference.mean, reference.std)
        };
        Self {
            heart_rate: z(Metric::HeartRate),
            systolic: z(Metric::Systolic),
            diastolic: z(Metric::Diastolic),
            temperature: z(Metric::Temperature),
            oxygen_saturation: z(Metric::OxygenSaturation),
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::Systolic => self.systolic,
            Metric::Diastolic => self.diastolic,
            Metric::Temperature => self.temperature,
            Metric::OxygenSaturation => self.oxygen_saturation,
        }
    }
}

/// Runs detection against the subject's stored baseline.
pub fn detect_anomalies(
    store: &BaselineStore,
    subject_id: &str,
    current: &Reading,
    history: &History,
) -> Vec<Insight> {
    detect_against(&store.get(subject_id), current, history)
}

/// Every qualifying call emits its insights; suppression across ticks is
/// left to the alert log.
pub fn detect_against(baseline: &Baseline, current: &Reading, history: &History) -> Vec<Insight> {
    let z_scores = ZScores::of(current, baseline);
    let mut insights = Vec::new();

    for metric in ANOMALY_METRICS {
        let z = z_scores.get(metric);
        if z > ANOMALY_Z_THRESHOLD {
            insights.push(anomaly_insight(metric, current.value(metric), z, baseline));
        }
    }

    if let Some(insight) = correlation_insight(history) {
        insights.push(insight);
    }

    insights
}

fn anomaly_insight(metric: Metric, value: f64, z: f64, baseline: &Baseline) -> Insight {
    let severity = if z > CRITICAL_Z_THRESHOLD {
        Severity::Critical
    } else {
        Severity::High
    };
    let reference = baseline.get(metric);
    let direction = if value >= reference.mean { "above" } else { "below" };

    Insight::new(
        InsightKind::Anomaly,
        severity,
        format!("{} anomaly detected", metric.name()),
        format!(
            "{} of {:.0} {} is {:.1} standard deviations {} the personal baseline of {:.1} {}",
            metric.name(), value, metric.unit(), z, direction, reference.mean, metric.unit()
        ),
        (z * 25.0).min(95.0),
        format!(
            "z-score {:.2} against baseline mean {:.1} ± {:.1} ({} samples)",
            z, reference.mean, reference.std, baseline.sample_count
        ),
    )
    .with_metric(metric, value)
}

fn correlation_insight(history: &History) -> Option<Insight> {
    if history.len() < CORRELATION_WINDOW {
        return None;
    }

    let heart_rate = history.recent_values(Metric::HeartRate, CORRELATION_WINDOW);
    let systolic = history.recent_values(Metric::Systolic, CORRELATION_WINDOW);
    let r = pearson_correlation(&heart_rate, &systolic);
    if r.abs() <= CORRELATION_THRESHOLD {
        return None;
    }

    let relation = if r > 0.0 { "rising together" } else { "moving in opposite directions" };
    Some(Insight::new(
        InsightKind::Correlation,
        Severity::Medium,
        "Heart rate and blood pressure are coupled",
        format!(
            "Over the last {} readings heart rate and systolic pressure are {} (r = {:.2})",
            CORRELATION_WINDOW, relation, r
        ),
        r.abs() * 100.0,
        format!("Pearson correlation {:.3} exceeds ±{}", r, CORRELATION_THRESHOLD),
    ))
}
