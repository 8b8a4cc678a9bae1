pub mod population;
pub mod individual;
pub mod variability;
pub mod generator;
pub mod alerts;

use std::collections::HashMap;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use crate::analysis::{anomaly, episodes, forecast, interventions, recommend, risk, BaselineStore};
use crate::config::Config;
use crate::error::HealthResult;
use crate::models::{History, Metric, Severity};

pub use population::*;
pub use individual::*;
pub use generator::VitalsGenerator;
pub use alerts::AlertLog;

/// One monitoring session. Owns the baseline store, the per-subject
/// histories and the alert log; all are dropped when the session ends.
pub struct MonitorSession {
    config: Config,
    generator: VitalsGenerator,
    baselines: BaselineStore,
    histories: HashMap<String, History>,
    alerts: AlertLog,
    timelines: Vec<SubjectTimeline>,
    tick: usize,
}

pub struct SessionOutcome {
    pub timelines: Vec<SubjectTimeline>,
    pub summary: SessionSummary,
}

impl MonitorSession {
    pub fn new(config: Config, seed: Option<u64>) -> HealthResult<Self> {
        Self::with_start(config, seed, Utc::now())
    }

    pub fn with_start(config: Config, seed: Option<u64>, start: DateTime<Utc>) -> HealthResult<Self> {
        config.validate()?;

        let generator = VitalsGenerator::new(seed, start, config.session.tick_interval_secs);
        let capacity = config.session.window_capacity;
        let histories = config.subjects.iter()
            .map(|s| (s.id.clone(), History::new(capacity)))
            .collect();
        let timelines = config.subjects.iter()
            .map(|s| SubjectTimeline {
                subject_id: s.id.clone(),
                name: s.name.clone(),
                role: s.role,
                ticks: Vec::with_capacity(config.session.ticks),
                interventions: Vec::new(),
                long_horizon: Vec::new(),
            })
            .collect();
        let alerts = AlertLog::new(config.session.alert_cooldown_ticks);

        Ok(Self {
            config,
            generator,
            baselines: BaselineStore::new(),
            histories,
            alerts,
            timelines,
            tick: 0,
        })
    }

    pub fn current_tick(&self) -> usize {
        self.tick
    }

    #[cfg(test)]
    pub fn baselines(&self) -> &BaselineStore {
        &self.baselines
    }

    #[cfg(test)]
    pub fn history(&self, subject_id: &str) -> Option<&History> {
        self.histories.get(subject_id)
    }

    /// Runs the analysis chain once for every subject.
    pub fn tick(&mut self) -> HealthResult<Vec<TickReport>> {
        let tick = self.tick;
        let steps = self.config.forecast.steps;
        let mut reports = Vec::with_capacity(self.config.subjects.len());

        for (subject, timeline) in self.config.subjects.iter().zip(self.timelines.iter_mut()) {
            let reading = self.generator.next_reading(subject, tick)?;
            let history = self.histories
                .entry(subject.id.clone())
                .or_insert_with(|| History::new(self.config.session.window_capacity));
            history.push(reading.clone());

            let baseline = self.baselines.update(&subject.id, history);

            let mut insights = anomaly::detect_anomalies(&self.baselines, &subject.id, &reading, history);
            let risk_score = risk::score(&self.baselines, &subject.id, &reading, history);
            insights.extend(recommend::recommend(&risk_score, &reading));

            let mut forecasts = forecast::predict_metrics(history);
            forecasts.extend(forecast::forecast_metrics(history, steps));
            insights.extend(forecast::projection_insights(history, &forecasts));

            let episode_predictions = episodes::predict_episodes(history);
            let alerts = self.alerts.filter(&subject.id, tick, insights.clone());

            for alert in alerts.iter().filter(|a| a.severity == Severity::Critical) {
                warn!("[{}] tick {}: {}", subject.id, tick, alert.title);
            }
            debug!(
                "[{}] tick {}: HR {:.0} BP {:.0}/{:.0} risk {:.0} ({}), {} insights, {} delivered",
                subject.id, tick, reading.heart_rate, reading.blood_pressure.systolic,
                reading.blood_pressure.diastolic, risk_score.overall, risk_score.trend,
                insights.len(), alerts.len()
            );

            let report = TickReport {
                tick,
                reading,
                baseline,
                risk: risk_score,
                insights,
                alerts,
                forecasts,
                episodes: episode_predictions,
            };
            timeline.ticks.push(report.clone());
            reports.push(report);
        }

        self.tick += 1;
        Ok(reports)
    }

    /// Executes every configured tick. With `follow`, sleeps the tick
    /// interval between ticks like a live dashboard.
    pub fn run(&mut self, follow: bool) -> HealthResult<()> {
        let total = self.config.session.ticks;
        info!("Starting monitoring session: {} subjects, {} ticks", self.config.subjects.len(), total);

        let interval = std::time::Duration::from_secs_f64(self.config.session.tick_interval_secs);
        for n in 1..=total {
            self.tick()?;
            if n % 10 == 0 || n == total {
                info!("Completed tick {}/{}", self.current_tick(), total);
            }
            if follow && n < total {
                std::thread::sleep(interval);
            }
        }

        info!("Monitoring session completed, baselines held for {} subjects", self.baselines.len());
        Ok(())
    }

    /// Ends the session, attaching intervention impacts and long-horizon
    /// projections computed from each subject's final state.
    pub fn finish(mut self) -> SessionOutcome {
        let offsets = self.config.forecast.long_horizon.clone();
        let selected = self.config.interventions.clone();

        for timeline in &mut self.timelines {
            let Some(history) = self.histories.get(&timeline.subject_id) else {
                continue;
            };
            if let Some(latest) = history.latest() {
                timeline.interventions = selected.iter()
                    .filter_map(|name| interventions::impact_by_name(name, latest))
                    .collect();
            }
            if !offsets.is_empty() {
                timeline.long_horizon = Metric::ALL.iter()
                    .map(|&metric| forecast::long_horizon(history, metric, &offsets))
                    .collect();
            }
        }

        let summary = SessionSummary::from_timelines(&self.timelines, self.alerts.suppressed());
        SessionOutcome {
            timelines: self.timelines,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Baseline, InsightKind};
    use chrono::TimeZone;

    fn session(ticks: usize) -> MonitorSession {
        let mut config = Config::default();
        config.session.ticks = ticks;
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        MonitorSession::with_start(config, Some(42), start).unwrap()
    }

    #[test]
    fn test_tick_reports_every_subject() {
        let mut session = session(5);
        let reports = session.tick().unwrap();
        assert_eq!(reports.len(), 3);
        assert_eq!(session.current_tick(), 1);
        assert!(reports.iter().all(|r| r.baseline.sample_count == 1));
        assert!(reports.iter().all(|r| r.episodes.is_empty()));
    }

    #[test]
    fn test_history_is_bounded_by_window() {
        let mut session = session(30);
        session.run(false).unwrap();
        let history = session.history("p-001").unwrap();
        assert_eq!(history.len(), 20);
        assert_eq!(session.baselines().get("p-001").sample_count, 20);
        assert_ne!(session.baselines().get("p-001"), Baseline::population_default());
    }

    #[test]
    fn test_delivered_alerts_are_subset_of_insights() {
        let mut session = session(40);
        session.run(false).unwrap();
        let outcome = session.finish();
        for timeline in &outcome.timelines {
            for report in &timeline.ticks {
                assert!(report.alerts.len() <= report.insights.len());
                for alert in &report.alerts {
                    assert!(report.insights.contains(alert));
                }
            }
        }
    }

    #[test]
    fn test_drifting_subject_accumulates_risk() {
        let mut session = session(60);
        session.run(false).unwrap();
        let outcome = session.finish();

        let hypertensive = &outcome.timelines[1];
        let latest = hypertensive.latest().unwrap();
        assert!(latest.reading.blood_pressure.systolic > 160.0);
        assert!(hypertensive.worst_episode().is_some());
        assert!(hypertensive.ticks.iter()
            .flat_map(|t| t.insights.iter())
            .any(|i| i.kind == InsightKind::Recommendation));
    }

    #[test]
    fn test_finish_attaches_interventions_and_projections() {
        let mut session = session(12);
        session.run(false).unwrap();
        let outcome = session.finish();

        assert_eq!(outcome.summary.n_subjects, 3);
        assert_eq!(outcome.summary.n_ticks, 12);
        for timeline in &outcome.timelines {
            assert_eq!(timeline.interventions.len(), 4);
            assert_eq!(timeline.long_horizon.len(), Metric::ALL.len());
            assert!(timeline.long_horizon.iter().all(|f| f.points.len() == 3));
        }
    }

    #[test]
    fn test_finish_honours_selected_interventions() {
        let mut config = Config::default();
        config.session.ticks = 3;
        config.interventions = vec!["exercise".to_string()];
        let mut session = MonitorSession::new(config, Some(9)).unwrap();
        session.run(false).unwrap();
        let outcome = session.finish();
        assert!(outcome.timelines.iter().all(|t| t.interventions.len() == 1));
    }

    #[test]
    fn test_same_seed_reproduces_session() {
        let mut a = session(15);
        let mut b = session(15);
        a.run(false).unwrap();
        b.run(false).unwrap();
        let a = a.finish();
        let b = b.finish();
        for (x, y) in a.timelines.iter().zip(&b.timelines) {
            let rx: Vec<f64> = x.ticks.iter().map(|t| t.risk.overall).collect();
            let ry: Vec<f64> = y.ticks.iter().map(|t| t.risk.overall).collect();
            assert_eq!(rx, ry);
        }
    }
}
