use std::collections::HashMap;
use log::debug;
use crate::models::{Insight, InsightKind, Metric, Severity};

/// Subject, kind, metric, severity and title. The title tells apart
/// distinct rules that share a kind and severity.
type AlertKey = (String, InsightKind, Option<Metric>, Severity, String);

/// Suppresses insights that repeat within a cooldown window.
///
/// The detectors re-emit on every qualifying tick; this log decides what is
/// actually delivered. Escalation to a new severity is a new key and is
/// always delivered.
#[derive(Debug)]
pub struct AlertLog {
    cooldown_ticks: usize,
    last_delivered: HashMap<AlertKey, usize>,
    suppressed: usize,
}

impl AlertLog {
    pub fn new(cooldown_ticks: usize) -> Self {
        Self {
            cooldown_ticks,
            last_delivered: HashMap::new(),
            suppressed: 0,
        }
    }

    pub fn filter(&mut self, subject_id: &str, tick: usize, insights: Vec<Insight>) -> Vec<Insight> {
        let mut delivered = Vec::with_capacity(insights.len());

        for insight in insights {
            let key = (
                subject_id.to_string(),
                insight.kind,
                insight.related_metric,
                insight.severity,
                insight.title.clone(),
            );
            let recent = self.last_delivered
                .get(&key)
                .map(|&last| tick.saturating_sub(last) < self.cooldown_ticks)
                .unwrap_or(false);

            if recent {
                debug!("Suppressed repeat alert for {}: {}", subject_id, insight.title);
                self.suppressed += 1;
                continue;
            }

            self.last_delivered.insert(key, tick);
            delivered.push(insight);
        }

        delivered
    }

    pub fn suppressed(&self) -> usize {
        self.suppressed
    }
}
