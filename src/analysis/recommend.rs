//! Recommendation insights derived from the risk score.

use crate::models::{Insight, InsightKind, Metric, Reading, RiskScore, RiskTrend, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskCategory {
    Overall,
    Cardiovascular,
    Respiratory,
    Metabolic,
}

impl RiskCategory {
    pub fn of(&self, score: &RiskScore) -> f64 {
        match self {
            RiskCategory::Overall => score.overall,
            RiskCategory::Cardiovascular => score.cardiovascular,
            RiskCategory::Respiratory => score.respiratory,
            RiskCategory::Metabolic => score.metabolic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    AtLeast(RiskCategory, f64),
    /// Below the threshold with a mature baseline behind the score.
    SettledBelow(RiskCategory, f64),
    Trend(RiskTrend),
}

impl Condition {
    fn matches(&self, score: &RiskScore) -> bool {
        match *self {
            Condition::AtLeast(category, threshold) => category.of(score) >= threshold,
            Condition::SettledBelow(category, threshold) => {
                category.of(score) < threshold && score.confidence >= 70.0
            }
            Condition::Trend(trend) => score.trend == trend,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RecommendationRule {
    pub condition: Condition,
    pub severity: Severity,
    pub title: &'static str,
    pub description: &'static str,
    pub explanation: &'static str,
}

pub static RECOMMENDATION_RULES: [RecommendationRule; 6] = [
    RecommendationRule {
        condition: Condition::AtLeast(RiskCategory::Overall, 70.0),
        severity: Severity::Critical,
        title: "Seek clinical assessment",
        description: "Several vital signs are far from the personal baseline at once",
        explanation: "Overall risk score is at or above 70",
    },
    RecommendationRule {
        condition: Condition::AtLeast(RiskCategory::Cardiovascular, 60.0),
        severity: Severity::High,
        title: "Schedule a cardiovascular review",
        description: "Heart rate and blood pressure deviate strongly from baseline",
        explanation: "Cardiovascular risk score is at or above 60",
    },
    RecommendationRule {
        condition: Condition::AtLeast(RiskCategory::Respiratory, 50.0),
        severity: Severity::High,
        title: "Monitor oxygen saturation closely",
        description: "Oxygen saturation is outside its usual band for this subject",
        explanation: "Respiratory risk score is at or above 50",
    },
    RecommendationRule {
        condition: Condition::AtLeast(RiskCategory::Metabolic, 40.0),
        severity: Severity::Medium,
        title: "Check for fever or infection",
        description: "Body temperature has moved away from the personal baseline",
        explanation: "Metabolic risk score is at or above 40",
    },
    RecommendationRule {
        condition: Condition::Trend(RiskTrend::Deteriorating),
        severity: Severity::Medium,
        title: "Increase monitoring frequency",
        description: "Cardiovascular risk is projected to rise over the next reading",
        explanation: "Short-horizon forecast exceeds the current cardiovascular score by more than 10",
    },
    RecommendationRule {
        condition: Condition::SettledBelow(RiskCategory::Overall, 20.0),
        severity: Severity::Low,
        title: "Vitals within personal baseline",
        description: "Keep up current routines and hydration",
        explanation: "Overall risk score below 20 with an established baseline",
    },
];

/// Rule-table recommendations plus one insight per out-of-range vital.
pub fn recommend(score: &RiskScore, current: &Reading) -> Vec<Insight> {
    let mut insights: Vec<Insight> = RECOMMENDATION_RULES
        .iter()
        .filter(|rule| rule.condition.matches(score))
        .map(|rule| {
            Insight::new(
                InsightKind::Recommendation,
                rule.severity,
                rule.title,
                rule.description,
                score.confidence,
                rule.explanation,
            )
        })
        .collect();

    insights.extend(current.out_of_range().into_iter().map(|metric| out_of_range_insight(metric, current, score)));
    insights
}

fn out_of_range_insight(metric: Metric, current: &Reading, score: &RiskScore) -> Insight {
    let value = current.value(metric);
    let (low, high) = metric.normal_range();
    Insight::new(
        InsightKind::Recommendation,
        Severity::Medium,
        format!("{} outside normal range", metric.name()),
        format!(
            "{} of {:.1} {} is outside {:.1}-{:.1} {}; recheck at rest",
            metric.name(), value, metric.unit(), low, high, metric.unit()
        ),
        score.confidence,
        "Population resting range check, independent of the personal baseline",
    )
    .with_metric(metric, value)
}
