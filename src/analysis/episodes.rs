//! Episode risk heuristics.
//!
//! Each episode kind owns a table of threshold rules over the recent window.
//! A matching rule adds its fixed increment to the probability and names
//! itself as a trigger.

use crate::analysis::stats::{linear_trend, pearson_correlation, variability};
use crate::models::insight::clamp_probability;
use crate::models::{EpisodeKind, EpisodePrediction, History, Metric, Severity};

pub const EPISODE_WINDOW: usize = 10;
pub const MIN_EPISODE_HISTORY: usize = 5;
pub const REPORTING_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    /// OLS slope per tick.
    Trend(Metric),
    /// Mean absolute tick-to-tick change.
    Variability(Metric),
    Latest(Metric),
    Correlation(Metric, Metric),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison {
    Above(f64),
    Below(f64),
}

impl Comparison {
    fn holds(&self, value: f64) -> bool {
        match *self {
            Comparison::Above(threshold) => value > threshold,
            Comparison::Below(threshold) => value < threshold,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EpisodeRule {
    pub signal: Signal,
    pub comparison: Comparison,
    pub increment: f64,
    pub trigger: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct EpisodeProfile {
    pub kind: EpisodeKind,
    pub timeframe: &'static str,
    pub rules: &'static [EpisodeRule],
    pub recommendations: &'static [&'static str],
}

const fn rule(signal: Signal, comparison: Comparison, increment: f64, trigger: &'static str) -> EpisodeRule {
    EpisodeRule { signal, comparison, increment, trigger }
}

pub static EPISODE_TABLE: [EpisodeProfile; 3] = [
    EpisodeProfile {
        kind: EpisodeKind::CardiacEvent,
        timeframe: "next 24 hours",
        rules: &[
            rule(Signal::Variability(Metric::HeartRate), Comparison::Above(20.0), 0.3, "High heart rate variability"),
            rule(Signal::Trend(Metric::HeartRate), Comparison::Above(2.0), 0.25, "Rising heart rate trend"),
            rule(Signal::Latest(Metric::HeartRate), Comparison::Above(110.0), 0.2, "Resting tachycardia"),
            rule(
                Signal::Correlation(Metric::HeartRate, Metric::Systolic),
                Comparison::Above(0.8),
                0.15,
                "Heart rate and blood pressure rising together",
            ),
        ],
        recommendations: &[
            "Avoid strenuous activity until reviewed",
            "Record an ECG if chest pain or palpitations occur",
            "Contact a cardiologist if symptoms persist",
        ],
    },
    EpisodeProfile {
        kind: EpisodeKind::HypertensiveCrisis,
        timeframe: "next 48 hours",
        rules: &[
            rule(Signal::Trend(Metric::Systolic), Comparison::Above(3.0), 0.3, "Rapidly rising systolic pressure"),
            rule(Signal::Latest(Metric::Systolic), Comparison::Above(160.0), 0.4, "Systolic pressure above 160 mmHg"),
            rule(Signal::Latest(Metric::Diastolic), Comparison::Above(100.0), 0.2, "Diastolic pressure above 100 mmHg"),
            rule(Signal::Variability(Metric::Systolic), Comparison::Above(15.0), 0.1, "Unstable blood pressure"),
        ],
        recommendations: &[
            "Take prescribed antihypertensive medication",
            "Reduce sodium intake",
            "Recheck blood pressure in 30 minutes at rest",
        ],
    },
    EpisodeProfile {
        kind: EpisodeKind::RespiratoryDistress,
        timeframe: "next 12 hours",
        rules: &[
            rule(Signal::Trend(Metric::OxygenSaturation), Comparison::Below(-0.5), 0.35, "Falling oxygen saturation"),
            rule(Signal::Latest(Metric::OxygenSaturation), Comparison::Below(92.0), 0.4, "Oxygen saturation below 92%"),
            rule(Signal::Latest(Metric::Temperature), Comparison::Above(38.0), 0.15, "Fever"),
            rule(Signal::Trend(Metric::HeartRate), Comparison::Above(2.0), 0.1, "Compensatory heart rate increase"),
        ],
        recommendations: &[
            "Sit upright and practice slow breathing",
            "Check inhaler or supplemental oxygen availability",
            "Seek urgent care if breathlessness worsens",
        ],
    },
];

fn measure(signal: Signal, history: &History) -> f64 {
    let window = |metric| history.recent_values(metric, EPISODE_WINDOW);
    match signal {
        Signal::Trend(metric) => linear_trend(&window(metric)),
        Signal::Variability(metric) => variability(&window(metric)),
        Signal::Latest(metric) => history.latest().map(|r| r.value(metric)).unwrap_or(0.0),
        Signal::Correlation(a, b) => pearson_correlation(&window(a), &window(b)),
    }
}

pub fn severity_for(probability: f64) -> Severity {
    if probability >= 0.7 {
        Severity::Critical
    } else if probability >= 0.5 {
        Severity::High
    } else {
        Severity::Medium
    }
}

/// Evaluates one profile regardless of the reporting threshold.
pub fn evaluate(profile: &EpisodeProfile, history: &History) -> EpisodePrediction {
    let mut probability = 0.0;
    let mut triggers = Vec::new();

    for rule in profile.rules {
        if rule.comparison.holds(measure(rule.signal, history)) {
            probability += rule.increment;
            triggers.push(rule.trigger.to_string());
        }
    }

    let probability = clamp_probability(probability);
    EpisodePrediction {
        episode_kind: profile.kind,
        probability,
        timeframe: profile.timeframe.to_string(),
        severity: severity_for(probability),
        confidence: (50.0 + 10.0 * triggers.len() as f64).min(85.0),
        triggers,
        recommendations: profile.recommendations.iter().map(|r| r.to_string()).collect(),
    }
}

/// Predictions whose probability reaches the reporting threshold.
/// Fewer than five readings yields none.
pub fn predict_episodes(history: &History) -> Vec<EpisodePrediction> {
    if history.len() < MIN_EPISODE_HISTORY {
        return Vec::new();
    }
    EPISODE_TABLE
        .iter()
        .map(|profile| evaluate(profile, history))
        .filter(|prediction| prediction.probability >= REPORTING_THRESHOLD)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::fixtures::*;
    use approx::assert_relative_eq;

    fn steady(n: usize) -> History {
        history_of((0..n).map(|_| resting()).collect())
    }

    #[test]
    fn test_short_history_predicts_nothing() {
        let history = history_of((0..4).map(|_| reading(130.0, 180.0, 110.0, 39.0, 88.0)).collect());
        assert!(predict_episodes(&history).is_empty());
    }

    #[test]
    fn test_steady_vitals_predict_nothing() {
        assert!(predict_episodes(&steady(10)).is_empty());
    }

    #[test]
    fn test_hypertensive_crisis_from_rising_pressure() {
        let history = history_of(
            (0..8)
                .map(|i| reading(75.0, 140.0 + 4.0 * i as f64, 95.0 + i as f64, 36.8, 98.0))
                .collect(),
        );
        let predictions = predict_episodes(&history);
        assert_eq!(predictions.len(), 1);
        let crisis = &predictions[0];
        assert_eq!(crisis.episode_kind, EpisodeKind::HypertensiveCrisis);
        // trend 4/tick, latest 168 systolic, latest 102 diastolic
        assert_relative_eq!(crisis.probability, 0.9, epsilon = 1e-9);
        assert_eq!(crisis.severity, Severity::Critical);
        assert_eq!(crisis.triggers.len(), 3);
        assert_eq!(crisis.confidence, 80.0);
        assert_eq!(crisis.timeframe, "next 48 hours");
        assert_eq!(crisis.recommendations.len(), 3);
    }

    #[test]
    fn test_respiratory_distress_from_falling_oxygen() {
        let history = history_of(
            (0..6)
                .map(|i| reading(75.0, 120.0, 80.0, 36.8, 97.0 - 1.2 * i as f64))
                .collect(),
        );
        let predictions = predict_episodes(&history);
        assert_eq!(predictions.len(), 1);
        assert_eq!(predictions[0].episode_kind, EpisodeKind::RespiratoryDistress);
        assert_relative_eq!(predictions[0].probability, 0.75, epsilon = 1e-9);
        assert_eq!(
            predictions[0].triggers,
            vec!["Falling oxygen saturation".to_string(), "Oxygen saturation below 92%".to_string()]
        );
    }

    #[test]
    fn test_cardiac_variability_rule_alone_reports_medium() {
        let history = history_of(
            [70.0, 95.0, 70.0, 95.0, 70.0, 95.0, 70.0, 95.0]
                .iter()
                .map(|hr| reading(*hr, 120.0, 80.0, 36.8, 98.0))
                .collect(),
        );
        let prediction = evaluate(&EPISODE_TABLE[0], &history);
        assert_eq!(prediction.episode_kind, EpisodeKind::CardiacEvent);
        assert_relative_eq!(prediction.probability, 0.3, epsilon = 1e-9);
        assert_eq!(prediction.severity, Severity::Medium);
        assert_eq!(prediction.confidence, 60.0);
    }

    #[test]
    fn test_all_cardiac_rules_fire_together() {
        let history = history_of(
            (0..10)
                .map(|i| {
                    let hr = if i % 2 == 0 { 100.0 + 8.0 * i as f64 } else { 130.0 + 8.0 * i as f64 };
                    reading(hr, 130.0 + 6.0 * i as f64, 90.0, 36.8, 98.0)
                })
                .collect(),
        );
        let prediction = evaluate(&EPISODE_TABLE[0], &history);
        assert!(prediction.probability <= 1.0);
        assert_eq!(prediction.triggers.len(), 4);
        assert_relative_eq!(prediction.probability, 0.9, epsilon = 1e-9);
        assert_eq!(prediction.confidence, 85.0);
    }
}
