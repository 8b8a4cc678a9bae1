use serde::{Deserialize, Serialize};
use crate::analysis::{InterventionImpact, MetricForecast};
use crate::config::Role;
use crate::models::{Baseline, EpisodePrediction, Insight, Reading, RiskScore, RiskTrend, Severity};

/// Everything the analysis chain produced for one subject on one tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: usize,
    pub reading: Reading,
    pub baseline: Baseline,
    pub risk: RiskScore,
    /// Every insight emitted this tick, before suppression.
    pub insights: Vec<Insight>,
    /// Insights delivered after repeat suppression.
    pub alerts: Vec<Insight>,
    pub forecasts: Vec<MetricForecast>,
    pub episodes: Vec<EpisodePrediction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectTimeline {
    pub subject_id: String,
    pub name: String,
    pub role: Role,
    pub ticks: Vec<TickReport>,
    pub interventions: Vec<InterventionImpact>,
    pub long_horizon: Vec<MetricForecast>,
}

impl SubjectTimeline {
    pub fn latest(&self) -> Option<&TickReport> {
        self.ticks.last()
    }

    pub fn peak_risk(&self) -> f64 {
        self.ticks.iter()
            .map(|t| t.risk.overall)
            .fold(0.0, f64::max)
    }

    pub fn mean_risk(&self) -> f64 {
        if self.ticks.is_empty() {
            return 0.0;
        }
        self.ticks.iter().map(|t| t.risk.overall).sum::<f64>() / self.ticks.len() as f64
    }

    pub fn alert_count(&self) -> usize {
        self.ticks.iter().map(|t| t.alerts.len()).sum()
    }

    pub fn alerts_at_least(&self, severity: Severity) -> usize {
        self.ticks.iter()
            .flat_map(|t| t.alerts.iter())
            .filter(|a| a.severity >= severity)
            .count()
    }

    pub fn deteriorating_ticks(&self) -> usize {
        self.ticks.iter()
            .filter(|t| t.risk.trend == RiskTrend::Deteriorating)
            .count()
    }

    /// Highest-probability episode seen during the session.
    pub fn worst_episode(&self) -> Option<&EpisodePrediction> {
        self.ticks.iter()
            .flat_map(|t| t.episodes.iter())
            .max_by(|a, b| a.probability.total_cmp(&b.probability))
    }
}
