use super::Metric;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Anomaly,
    Correlation,
    Recommendation,
    Trend,
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InsightKind::Anomaly => "anomaly",
            InsightKind::Correlation => "correlation",
            InsightKind::Recommendation => "recommendation",
            InsightKind::Trend => "trend",
        };
        f.write_str(label)
    }
}

/// A labelled, severity-tagged observation. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// Whole percentage in [0, 100].
    pub confidence: f64,
    pub related_metric: Option<Metric>,
    pub related_value: Option<f64>,
    pub explanation: String,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        severity: Severity,
        title: impl Into<String>,
        description: impl Into<String>,
        confidence: f64,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            title: title.into(),
            description: description.into(),
            confidence: clamp_percent(confidence),
            related_metric: None,
            related_value: None,
            explanation: explanation.into(),
        }
    }

    pub fn with_metric(mut self, metric: Metric, value: f64) -> Self {
        self.related_metric = Some(metric);
        self.related_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTrend {
    Improving,
    Stable,
    Deteriorating,
}

impl fmt::Display for RiskTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskTrend::Improving => "improving",
            RiskTrend::Stable => "stable",
            RiskTrend::Deteriorating => "deteriorating",
        };
        f.write_str(label)
    }
}

/// Category and overall risk, as whole percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub overall: f64,
    pub cardiovascular: f64,
    pub respiratory: f64,
    pub metabolic: f64,
    pub confidence: f64,
    pub trend: RiskTrend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeKind {
    CardiacEvent,
    HypertensiveCrisis,
    RespiratoryDistress,
}

impl fmt::Display for EpisodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EpisodeKind::CardiacEvent => "cardiac_event",
            EpisodeKind::HypertensiveCrisis => "hypertensive_crisis",
            EpisodeKind::RespiratoryDistress => "respiratory_distress",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodePrediction {
    pub episode_kind: EpisodeKind,
    /// In [0, 1].
    pub probability: f64,
    pub timeframe: String,
    pub severity: Severity,
    pub confidence: f64,
    pub triggers: Vec<String>,
    pub recommendations: Vec<String>,
}

/// One forecast point; `step` counts ticks ahead of the latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub step: usize,
    pub value: f64,
    pub confidence: f64,
}

pub(crate) fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0).round()
}

pub(crate) fn clamp_probability(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}
