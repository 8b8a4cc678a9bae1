use super::SubjectTimeline;
use crate::analysis::stats::{mean, standard_deviation};
use crate::models::{EpisodeKind, Severity};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub n_subjects: usize,
    pub n_ticks: usize,
    pub suppressed_alerts: usize,
    pub risk: RiskSummary,
    pub subjects: Vec<SubjectSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RiskSummary {
    pub final_overall_mean: f64,
    pub final_overall_sd: f64,
    pub peak_overall_mean: f64,
    pub peak_overall_sd: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub subject_id: String,
    pub final_overall: f64,
    pub peak_overall: f64,
    pub mean_overall: f64,
    pub alerts: usize,
    pub critical_alerts: usize,
    pub deteriorating_ticks: usize,
    pub episodes: BTreeMap<String, f64>,
}

impl SubjectSummary {
    pub fn from_timeline(timeline: &SubjectTimeline) -> Self {
        let mut episodes = BTreeMap::new();
        for prediction in timeline.ticks.iter().flat_map(|t| t.episodes.iter()) {
            let entry = episodes
                .entry(prediction.episode_kind.to_string())
                .or_insert(0.0_f64);
            *entry = entry.max(prediction.probability);
        }

        Self {
            subject_id: timeline.subject_id.clone(),
            final_overall: timeline.latest().map(|t| t.risk.overall).unwrap_or(0.0),
            peak_overall: timeline.peak_risk(),
            mean_overall: timeline.mean_risk(),
            alerts: timeline.alert_count(),
            critical_alerts: timeline.alerts_at_least(Severity::Critical),
            deteriorating_ticks: timeline.deteriorating_ticks(),
            episodes,
        }
    }

    pub fn peak_episode_probability(&self, kind: EpisodeKind) -> f64 {
        self.episodes.get(&kind.to_string()).copied().unwrap_or(0.0)
    }
}

impl SessionSummary {
    pub fn from_timelines(timelines: &[SubjectTimeline], suppressed_alerts: usize) -> Self {
        let subjects: Vec<SubjectSummary> = timelines.iter()
            .map(SubjectSummary::from_timeline)
            .collect();

        let finals: Vec<f64> = subjects.iter().map(|s| s.final_overall).collect();
        let peaks: Vec<f64> = subjects.iter().map(|s| s.peak_overall).collect();

        Self {
            n_subjects: timelines.len(),
            n_ticks: timelines.iter().map(|t| t.ticks.len()).max().unwrap_or(0),
            suppressed_alerts,
            risk: RiskSummary {
                final_overall_mean: mean(&finals),
                final_overall_sd: standard_deviation(&finals),
                peak_overall_mean: mean(&peaks),
                peak_overall_sd: standard_deviation(&peaks),
            },
            subjects,
        }
    }
}
