pub mod reading;
pub mod baseline;
pub mod insight;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use reading::*;
pub use baseline::*;
pub use insight::*;

/// The vital signs carried by every reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    HeartRate,
    Systolic,
    Diastolic,
    Temperature,
    OxygenSaturation,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::HeartRate,
        Metric::Systolic,
        Metric::Diastolic,
        Metric::Temperature,
        Metric::OxygenSaturation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::HeartRate => "Heart rate",
            Metric::Systolic => "Systolic pressure",
            Metric::Diastolic => "Diastolic pressure",
            Metric::Temperature => "Temperature",
            Metric::OxygenSaturation => "Oxygen saturation",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::HeartRate => "bpm",
            Metric::Systolic | Metric::Diastolic => "mmHg",
            Metric::Temperature => "°C",
            Metric::OxygenSaturation => "%",
        }
    }

    /// Inclusive resting adult range used for out-of-range flags.
    pub fn normal_range(&self) -> (f64, f64) {
        match self {
            Metric::HeartRate => (60.0, 100.0),
            Metric::Systolic => (90.0, 140.0),
            Metric::Diastolic => (60.0, 90.0),
            Metric::Temperature => (36.1, 37.5),
            Metric::OxygenSaturation => (95.0, 100.0),
        }
    }

    pub fn is_normal(&self, value: f64) -> bool {
        let (low, high) = self.normal_range();
        value >= low && value <= high
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            Metric::HeartRate => "heart_rate",
            Metric::Systolic => "systolic",
            Metric::Diastolic => "diastolic",
            Metric::Temperature => "temperature",
            Metric::OxygenSaturation => "oxygen_saturation",
        };
        f.write_str(key)
    }
}
