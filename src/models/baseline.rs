use super::Metric;
use serde::{Deserialize, Serialize};

/// Summary statistics of one metric over a subject's history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBaseline {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl MetricBaseline {
    pub const fn new(mean: f64, std: f64, min: f64, max: f64) -> Self {
        Self { mean, std, min, max }
    }
}

/// Per-subject "normal" reference used for z-scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Baseline {
    pub heart_rate: MetricBaseline,
    pub systolic: MetricBaseline,
    pub diastolic: MetricBaseline,
    pub temperature: MetricBaseline,
    pub oxygen_saturation: MetricBaseline,
    pub sample_count: usize,
}

impl Baseline {
    /// Population-typical ranges used before any history exists.
    pub fn population_default() -> Self {
        Self {
            heart_rate: MetricBaseline::new(75.0, 15.0, 60.0, 100.0),
            systolic: MetricBaseline::new(120.0, 15.0, 90.0, 140.0),
            diastolic: MetricBaseline::new(80.0, 10.0, 60.0, 90.0),
            temperature: MetricBaseline::new(36.8, 0.5, 36.1, 37.5),
            oxygen_saturation: MetricBaseline::new(98.0, 1.5, 95.0, 100.0),
            sample_count: 0,
        }
    }

    pub fn get(&self, metric: Metric) -> &MetricBaseline {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Systolic => &self.systolic,
            Metric::Diastolic => &self.diastolic,
            Metric::Temperature => &self.temperature,
            Metric::OxygenSaturation => &self.oxygen_saturation,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut MetricBaseline {
        match metric {
            Metric::HeartRate => &mut self.heart_rate,
            Metric::Systolic => &mut self.systolic,
            Metric::Diastolic => &mut self.diastolic,
            Metric::Temperature => &mut self.temperature,
            Metric::OxygenSaturation => &mut self.oxygen_saturation,
        }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::population_default()
    }
}
