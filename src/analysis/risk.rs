//! Category and overall risk scoring.

use crate::analysis::anomaly::ZScores;
use crate::analysis::baseline::BaselineStore;
use crate::analysis::forecast::ShortHorizonForecaster;
use crate::models::{Baseline, History, Reading, RiskScore, RiskTrend};

/// Fixed contribution of each category to the overall score.
pub const CARDIOVASCULAR_WEIGHT: f64 = 0.5;
pub const RESPIRATORY_WEIGHT: f64 = 0.3;
pub const METABOLIC_WEIGHT: f64 = 0.2;

pub const TREND_WINDOW: usize = 5;
pub const TREND_MARGIN: f64 = 10.0;

const MATURE_BASELINE_SAMPLES: usize = 10;
const MATURE_CONFIDENCE: f64 = 85.0;

pub fn cardiovascular_risk(z: &ZScores) -> f64 {
    ((z.heart_rate + z.systolic + z.diastolic) * 15.0).min(100.0)
}

pub fn respiratory_risk(z: &ZScores) -> f64 {
    (z.oxygen_saturation * 25.0).min(100.0)
}

pub fn metabolic_risk(z: &ZScores) -> f64 {
    (z.temperature * 20.0).min(100.0)
}

pub fn weighted_overall(cardiovascular: f64, respiratory: f64, metabolic: f64) -> f64 {
    cardiovascular * CARDIOVASCULAR_WEIGHT
        + respiratory * RESPIRATORY_WEIGHT
        + metabolic * METABOLIC_WEIGHT
}

pub fn baseline_confidence(sample_count: usize) -> f64 {
    if sample_count > MATURE_BASELINE_SAMPLES {
        MATURE_CONFIDENCE
    } else {
        (sample_count as f64 * 7.0).min(70.0)
    }
}

/// Compares a one-step forecast of `series` with the current score.
/// Shorter series than the trend window are always stable.
pub fn classify_trend(series: &[f64], current: f64) -> RiskTrend {
    if series.len() < TREND_WINDOW {
        return RiskTrend::Stable;
    }
    let predicted = ShortHorizonForecaster::default().predict(series).value;
    if predicted > current + TREND_MARGIN {
        RiskTrend::Deteriorating
    } else if predicted < current - TREND_MARGIN {
        RiskTrend::Improving
    } else {
        RiskTrend::Stable
    }
}

impl RiskScore {
    /// Builds the boundary representation: every field a whole percentage,
    /// the overall score the rounded weighted sum of the unrounded categories.
    pub fn from_categories(
        cardiovascular: f64,
        respiratory: f64,
        metabolic: f64,
        confidence: f64,
        trend: RiskTrend,
    ) -> Self {
        Self {
            overall: weighted_overall(cardiovascular, respiratory, metabolic).round(),
            cardiovascular: cardiovascular.round(),
            respiratory: respiratory.round(),
            metabolic: metabolic.round(),
            confidence: crate::models::insight::clamp_percent(confidence),
            trend,
        }
    }
}

pub fn score(store: &BaselineStore, subject_id: &str, current: &Reading, history: &History) -> RiskScore {
    score_against(&store.get(subject_id), current, history)
}

pub fn score_against(baseline: &Baseline, current: &Reading, history: &History) -> RiskScore {
    let z = ZScores::of(current, baseline);
    let cardiovascular = cardiovascular_risk(&z);

    let series: Vec<f64> = history
        .recent(TREND_WINDOW)
        .map(|reading| cardiovascular_risk(&ZScores::of(reading, baseline)))
        .collect();

    RiskScore::from_categories(
        cardiovascular,
        respiratory_risk(&z),
        metabolic_risk(&z),
        baseline_confidence(baseline.sample_count),
        classify_trend(&series, cardiovascular),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::fixtures::*;
    use crate::models::MetricBaseline;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    fn mature_baseline() -> Baseline {
        Baseline {
            heart_rate: MetricBaseline::new(75.0, 10.0, 60.0, 90.0),
            systolic: MetricBaseline::new(120.0, 10.0, 100.0, 140.0),
            diastolic: MetricBaseline::new(80.0, 5.0, 70.0, 90.0),
            temperature: MetricBaseline::new(36.8, 0.5, 36.0, 37.5),
            oxygen_saturation: MetricBaseline::new(98.0, 1.0, 96.0, 100.0),
            sample_count: 20,
        }
    }

    #[test]
    fn test_category_formulas() {
        let current = reading(95.0, 130.0, 85.0, 37.8, 96.0);
        let score = score_against(&mature_baseline(), &current, &History::new(20));

        // z = 2 + 1 + 1 for cardiovascular, 2 for oxygen, 2 for temperature
        assert_eq!(score.cardiovascular, 60.0);
        assert_eq!(score.respiratory, 50.0);
        assert_eq!(score.metabolic, 40.0);
        assert_eq!(score.overall, 53.0);
        assert_eq!(score.confidence, 85.0);
        assert_eq!(score.trend, RiskTrend::Stable);
    }

    #[test]
    fn test_categories_cap_at_100() {
        let current = reading(150.0, 180.0, 110.0, 41.0, 80.0);
        let score = score_against(&mature_baseline(), &current, &History::new(20));
        assert_eq!(score.cardiovascular, 100.0);
        assert_eq!(score.respiratory, 100.0);
        assert_eq!(score.metabolic, 100.0);
        assert_eq!(score.overall, 100.0);
    }

    #[test]
    fn test_confidence_grows_with_samples() {
        assert_eq!(baseline_confidence(0), 0.0);
        assert_eq!(baseline_confidence(4), 28.0);
        assert_eq!(baseline_confidence(10), 70.0);
        assert_eq!(baseline_confidence(11), 85.0);
    }

    #[test]
    fn test_trend_classification() {
        assert_eq!(classify_trend(&[10.0, 25.0, 40.0, 55.0, 70.0], 70.0), RiskTrend::Deteriorating);
        assert_eq!(classify_trend(&[70.0, 55.0, 40.0, 25.0, 10.0], 10.0), RiskTrend::Improving);
        assert_eq!(classify_trend(&[30.0; 5], 30.0), RiskTrend::Stable);
        assert_eq!(classify_trend(&[10.0, 40.0, 70.0, 100.0], 100.0), RiskTrend::Stable);
    }

    #[test]
    fn test_rising_history_marks_deteriorating() {
        let baseline = mature_baseline();
        let readings: Vec<_> = (0..5)
            .map(|i| reading(75.0 + 6.0 * i as f64, 120.0 + 6.0 * i as f64, 80.0, 36.8, 98.0))
            .collect();
        let current = readings[4].clone();
        let score = score_against(&baseline, &current, &history_of(readings));
        assert_eq!(score.trend, RiskTrend::Deteriorating);
    }

    #[test]
    fn test_store_lookup_uses_default_baseline() {
        let store = BaselineStore::new();
        let score = score(&store, "p-1", &resting(), &History::new(20));
        assert_eq!(score.overall, 0.0);
        assert_eq!(score.confidence, 0.0);
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert_relative_eq!(
            CARDIOVASCULAR_WEIGHT + RESPIRATORY_WEIGHT + METABOLIC_WEIGHT,
            1.0,
            epsilon = 1e-12
        );
    }

    proptest! {
        #[test]
        fn overall_is_rounded_weighted_sum(
            cardiovascular in 0.0f64..=100.0,
            respiratory in 0.0f64..=100.0,
            metabolic in 0.0f64..=100.0,
            confidence in 0.0f64..=100.0,
        ) {
            let score = RiskScore::from_categories(
                cardiovascular, respiratory, metabolic, confidence, RiskTrend::Stable,
            );
            let expected = (cardiovascular * 0.5 + respiratory * 0.3 + metabolic * 0.2).round();
            prop_assert_eq!(score.overall, expected);
        }
    }
}
