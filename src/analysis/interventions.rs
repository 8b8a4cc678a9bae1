//! Static intervention impact table.

use crate::models::{Metric, Reading};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intervention {
    Exercise,
    DietModification,
    StressReduction,
    MedicationAdherence,
}

impl Intervention {
    pub const ALL: [Intervention; 4] = [
        Intervention::Exercise,
        Intervention::DietModification,
        Intervention::StressReduction,
        Intervention::MedicationAdherence,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Intervention::Exercise => "exercise",
            Intervention::DietModification => "diet_modification",
            Intervention::StressReduction => "stress_reduction",
            Intervention::MedicationAdherence => "medication_adherence",
        }
    }

    pub fn effect(&self) -> &'static InterventionEffect {
        // Table order matches `ALL`.
        &INTERVENTION_TABLE[*self as usize]
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Intervention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intervention::ALL
            .iter()
            .copied()
            .find(|i| i.key() == s)
            .ok_or_else(|| format!("Unknown intervention: {}", s))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InterventionEffect {
    pub intervention: Intervention,
    pub timeframe: &'static str,
    pub confidence: f64,
    /// Expected reduction per metric.
    pub deltas: &'static [(Metric, f64)],
}

pub static INTERVENTION_TABLE: [InterventionEffect; 4] = [
    InterventionEffect {
        intervention: Intervention::Exercise,
        timeframe: "4-6 weeks",
        confidence: 75.0,
        deltas: &[(Metric::HeartRate, 5.0), (Metric::Systolic, 5.0), (Metric::Diastolic, 3.0)],
    },
    InterventionEffect {
        intervention: Intervention::DietModification,
        timeframe: "6-8 weeks",
        confidence: 70.0,
        deltas: &[(Metric::Systolic, 8.0), (Metric::Diastolic, 4.0)],
    },
    InterventionEffect {
        intervention: Intervention::StressReduction,
        timeframe: "2-4 weeks",
        confidence: 65.0,
        deltas: &[(Metric::HeartRate, 6.0), (Metric::Systolic, 4.0), (Metric::Diastolic, 2.0)],
    },
    InterventionEffect {
        intervention: Intervention::MedicationAdherence,
        timeframe: "1-2 weeks",
        confidence: 85.0,
        deltas: &[(Metric::Systolic, 12.0), (Metric::Diastolic, 6.0)],
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricImpact {
    pub metric: Metric,
    pub current: f64,
    pub projected: f64,
    pub improvement: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionImpact {
    pub intervention: Intervention,
    pub timeframe: String,
    pub confidence: f64,
    pub impacts: Vec<MetricImpact>,
}

/// Subtracts the table deltas from the current reading.
pub fn intervention_impact(intervention: Intervention, current: &Reading) -> InterventionImpact {
    let effect = intervention.effect();
    InterventionImpact {
        intervention: effect.intervention,
        timeframe: effect.timeframe.to_string(),
        confidence: effect.confidence,
        impacts: effect
            .deltas
            .iter()
            .map(|&(metric, delta)| {
                let value = current.value(metric);
                MetricImpact {
                    metric,
                    current: value,
                    projected: value - delta,
                    improvement: delta,
                }
            })
            .collect(),
    }
}

pub fn impact_by_name(name: &str, current: &Reading) -> Option<InterventionImpact> {
    name.parse::<Intervention>()
        .ok()
        .map(|intervention| intervention_impact(intervention, current))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reading::fixtures::*;

    #[test]
    fn test_table_order_matches_enum() {
        for intervention in Intervention::ALL {
            assert_eq!(intervention.effect().intervention, intervention);
        }
    }

    #[test]
    fn test_medication_adherence_projection() {
        let current = reading(82.0, 150.0, 95.0, 36.8, 98.0);
        let impact = intervention_impact(Intervention::MedicationAdherence, &current);
        assert_eq!(impact.timeframe, "1-2 weeks");
        assert_eq!(impact.confidence, 85.0);
        assert_eq!(impact.impacts.len(), 2);
        assert_eq!(impact.impacts[0].metric, Metric::Systolic);
        assert_eq!(impact.impacts[0].projected, 138.0);
        assert_eq!(impact.impacts[1].projected, 89.0);
    }

    #[test]
    fn test_lookup_by_name() {
        let current = resting();
        let impact = impact_by_name("exercise", &current).unwrap();
        assert_eq!(impact.intervention, Intervention::Exercise);
        assert_eq!(impact.impacts[0].projected, 70.0);
        assert!(impact_by_name("meditation_retreat", &current).is_none());
    }

    #[test]
    fn test_every_key_round_trips_through_lookup() {
        for intervention in Intervention::ALL {
            let impact = impact_by_name(&intervention.to_string(), &resting()).unwrap();
            assert_eq!(impact.intervention, intervention);
        }
    }
}
