//! Per-subject baseline tracking.

use crate::analysis::stats::{mean, standard_deviation};
use crate::models::{Baseline, History, Metric, MetricBaseline};
use log::debug;
use std::collections::HashMap;

/// Summarises every metric over the full supplied window.
///
/// An empty history yields the population default baseline.
pub fn compute_baseline(history: &History) -> Baseline {
    if history.is_empty() {
        return Baseline::population_default();
    }

    let mut baseline = Baseline::population_default();
    for metric in Metric::ALL {
        let values = history.values(metric);
        *baseline.get_mut(metric) = summarize(&values);
    }
    baseline.sample_count = history.len();
    baseline
}

fn summarize(values: &[f64]) -> MetricBaseline {
    MetricBaseline {
        mean: mean(values),
        std: standard_deviation(values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Baselines keyed by subject id for the lifetime of one monitoring session.
///
/// Lookups for unknown subjects fall back to the population default.
#[derive(Debug, Default)]
pub struct BaselineStore {
    baselines: HashMap<String, Baseline>,
}

impl BaselineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the subject's baseline from `history` and stores it.
    pub fn update(&mut self, subject_id: &str, history: &History) -> Baseline {
        let baseline = compute_baseline(history);
        debug!(
            "Baseline for {} recomputed from {} samples (HR {:.1} ± {:.1})",
            subject_id, baseline.sample_count, baseline.heart_rate.mean, baseline.heart_rate.std
        );
        self.baselines.insert(subject_id.to_string(), baseline.clone());
        baseline
    }

    pub fn get(&self, subject_id: &str) -> Baseline {
        self.baselines
            .get(subject_id)
            .cloned()
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn insert(&mut self, subject_id: &str, baseline: Baseline) {
        self.baselines.insert(subject_id.to_string(), baseline);
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::fixtures::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_history_returns_default_baseline() {
        let mut store = BaselineStore::new();
        let baseline = store.update("p-1", &History::new(20));
        assert_eq!(baseline, Baseline::population_default());
        assert_eq!(baseline.heart_rate.mean, 75.0);
        assert_eq!(baseline.heart_rate.std, 15.0);
        assert_eq!(baseline.sample_count, 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_subject_falls_back_to_default() {
        let store = BaselineStore::new();
        assert_eq!(store.get("nobody"), Baseline::population_default());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_baseline_summarizes_full_window() {
        let history = history_of(vec![
            reading(70.0, 110.0, 70.0, 36.5, 97.0),
            reading(80.0, 130.0, 90.0, 37.1, 99.0),
        ]);
        let mut store = BaselineStore::new();
        let baseline = store.update("p-1", &history);

        assert_eq!(baseline.sample_count, 2);
        assert_relative_eq!(baseline.heart_rate.mean, 75.0, epsilon = 1e-12);
        assert_relative_eq!(baseline.heart_rate.std, 5.0, epsilon = 1e-12);
        assert_eq!(baseline.systolic.min, 110.0);
        assert_eq!(baseline.systolic.max, 130.0);
        assert_relative_eq!(baseline.temperature.mean, 36.8, epsilon = 1e-9);
        assert_eq!(store.get("p-1"), baseline);
    }

    #[test]
    fn test_update_replaces_rather_than_accumulates() {
        let mut store = BaselineStore::new();
        store.update("p-1", &history_of(vec![reading(100.0, 120.0, 80.0, 36.8, 98.0)]));
        let baseline = store.update("p-1", &history_of(vec![reading(60.0, 120.0, 80.0, 36.8, 98.0)]));
        assert_eq!(baseline.heart_rate.mean, 60.0);
        assert_eq!(baseline.heart_rate.std, 0.0);
        assert_eq!(baseline.sample_count, 1);
    }
}
