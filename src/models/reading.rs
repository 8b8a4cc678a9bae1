use super::Metric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BloodPressure {
    pub systolic: f64,
    pub diastolic: f64,
}

/// One timestamped vital-sign sample. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub heart_rate: f64,
    pub blood_pressure: BloodPressure,
    pub temperature: f64,
    pub oxygen_sat: f64,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::HeartRate => self.heart_rate,
            Metric::Systolic => self.blood_pressure.systolic,
            Metric::Diastolic => self.blood_pressure.diastolic,
            Metric::Temperature => self.temperature,
            Metric::OxygenSaturation => self.oxygen_sat,
        }
    }

    /// Metrics whose value falls outside the normal resting range.
    pub fn out_of_range(&self) -> Vec<Metric> {
        Metric::ALL
            .iter()
            .copied()
            .filter(|metric| !metric.is_normal(self.value(*metric)))
            .collect()
    }
}

/// Bounded, ordered window of readings for one subject. Oldest first.
#[derive(Debug, Clone)]
pub struct History {
    capacity: usize,
    readings: VecDeque<Reading>,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            readings: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a reading, evicting the oldest once the window is full.
    pub fn push(&mut self, reading: Reading) {
        if self.readings.len() == self.capacity {
            self.readings.pop_front();
        }
        self.readings.push_back(reading);
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.readings.back()
    }

    /// The last `n` readings, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Reading> {
        let skip = self.readings.len().saturating_sub(n);
        self.readings.iter().skip(skip)
    }

    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(metric)).collect()
    }

    pub fn recent_values(&self, metric: Metric, n: usize) -> Vec<f64> {
        self.recent(n).map(|r| r.value(metric)).collect()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_history_evicts_oldest_on_overflow() {
        let mut history = History::new(3);
        for hr in [60.0, 70.0, 80.0, 90.0] {
            history.push(reading(hr, 120.0, 80.0, 36.8, 98.0));
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.values(Metric::HeartRate), vec![70.0, 80.0, 90.0]);
        assert_eq!(history.latest().unwrap().heart_rate, 90.0);
    }

    #[test]
    fn test_recent_values_returns_tail_in_order() {
        let history = history_of((0..8).map(|i| reading(60.0 + i as f64, 120.0, 80.0, 36.8, 98.0)).collect());
        assert_eq!(history.recent_values(Metric::HeartRate, 3), vec![65.0, 66.0, 67.0]);
        assert_eq!(history.recent_values(Metric::HeartRate, 50).len(), 8);
    }

    #[test]
    fn test_out_of_range_lists_abnormal_metrics() {
        let r = reading(112.0, 120.0, 80.0, 38.2, 98.0);
        assert_eq!(r.out_of_range(), vec![Metric::HeartRate, Metric::Temperature]);
        assert!(resting().out_of_range().is_empty());
    }

    #[test]
    fn test_reading_serializes_with_feed_field_names() {
        let json = serde_json::to_value(resting()).unwrap();
        assert_eq!(json["heartRate"], 75.0);
        assert_eq!(json["bloodPressure"]["systolic"], 120.0);
        assert_eq!(json["oxygenSat"], 98.0);
        assert!(json.get("timestamp").is_some());
    }
}
