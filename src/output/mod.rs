use crate::analysis::stats::moving_average;
use crate::models::{EpisodeKind, Metric};
use crate::simulation::{SessionOutcome, SessionSummary, SubjectTimeline};
use crate::error::HealthResult;
use std::path::Path;
use std::fs::File;
use log::info;

pub fn save_results<P: AsRef<Path>>(outcome: &SessionOutcome, output_dir: P) -> HealthResult<()> {
    let output_path = output_dir.as_ref();
    let timelines = &outcome.timelines;

    save_readings(timelines, &output_path.join("readings.csv"))?;
    save_alerts(timelines, &output_path.join("insights.csv"))?;
    save_risk_scores(timelines, &output_path.join("risk_scores.csv"))?;
    save_forecasts(timelines, &output_path.join("forecasts.csv"))?;

    save_json(&episode_log(timelines), &output_path.join("episodes.json"))?;
    save_json(&intervention_log(timelines), &output_path.join("interventions.json"))?;
    save_json(&outcome.summary, &output_path.join("session_summary.json"))?;

    generate_report(outcome, output_path)?;

    info!("All results saved to {:?}", output_path);
    Ok(())
}

fn save_readings<P: AsRef<Path>>(timelines: &[SubjectTimeline], path: P) -> HealthResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "SUBJECT_ID", "TICK", "TIMESTAMP", "HEART_RATE", "SYSTOLIC", "DIASTOLIC",
        "TEMPERATURE", "OXYGEN_SAT",
    ])?;

    for timeline in timelines {
        for report in &timeline.ticks {
            let r = &report.reading;
            writer.write_record(&[
                timeline.subject_id.clone(),
                report.tick.to_string(),
                r.timestamp.to_rfc3339(),
                r.heart_rate.to_string(),
                r.blood_pressure.systolic.to_string(),
                r.blood_pressure.diastolic.to_string(),
                r.temperature.to_string(),
                r.oxygen_sat.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

fn save_alerts<P: AsRef<Path>>(timelines: &[SubjectTimeline], path: P) -> HealthResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "SUBJECT_ID", "TICK", "KIND", "SEVERITY", "TITLE", "CONFIDENCE",
        "METRIC", "VALUE", "DESCRIPTION", "EXPLANATION",
    ])?;

    for timeline in timelines {
        for report in &timeline.ticks {
            for alert in &report.alerts {
                writer.write_record(&[
                    timeline.subject_id.clone(),
                    report.tick.to_string(),
                    alert.kind.to_string(),
                    alert.severity.to_string(),
                    alert.title.clone(),
                    alert.confidence.to_string(),
                    alert.related_metric.map(|m| m.to_string()).unwrap_or_default(),
                    alert.related_value.map(|v| v.to_string()).unwrap_or_default(),
                    alert.description.clone(),
                    alert.explanation.clone(),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn save_risk_scores<P: AsRef<Path>>(timelines: &[SubjectTimeline], path: P) -> HealthResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "SUBJECT_ID", "TICK", "OVERALL", "CARDIOVASCULAR", "RESPIRATORY", "METABOLIC",
        "CONFIDENCE", "TREND",
    ])?;

    for timeline in timelines {
        for report in &timeline.ticks {
            let risk = &report.risk;
            writer.write_record(&[
                timeline.subject_id.clone(),
                report.tick.to_string(),
                risk.overall.to_string(),
                risk.cardiovascular.to_string(),
                risk.respiratory.to_string(),
                risk.metabolic.to_string(),
                risk.confidence.to_string(),
                risk.trend.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Forecasts made on the final tick plus the long-horizon projections.
fn save_forecasts<P: AsRef<Path>>(timelines: &[SubjectTimeline], path: P) -> HealthResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(["SUBJECT_ID", "METRIC", "STRATEGY", "STEP", "VALUE", "CONFIDENCE"])?;

    for timeline in timelines {
        let latest = timeline.latest().map(|t| t.forecasts.as_slice()).unwrap_or(&[]);
        for forecast in latest.iter().chain(timeline.long_horizon.iter()) {
            for point in &forecast.points {
                writer.write_record(&[
                    timeline.subject_id.clone(),
                    forecast.metric.to_string(),
                    forecast.strategy.to_string(),
                    point.step.to_string(),
                    point.value.to_string(),
                    point.confidence.to_string(),
                ])?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn episode_log(timelines: &[SubjectTimeline]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = timelines.iter()
        .flat_map(|timeline| {
            timeline.ticks.iter().flat_map(move |report| {
                report.episodes.iter().map(move |episode| {
                    serde_json::json!({
                        "subject_id": timeline.subject_id,
                        "tick": report.tick,
                        "prediction": episode,
                    })
                })
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

fn intervention_log(timelines: &[SubjectTimeline]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = timelines.iter()
        .map(|timeline| {
            serde_json::json!({
                "subject_id": timeline.subject_id,
                "interventions": timeline.interventions,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

fn save_json<T: serde::Serialize, P: AsRef<Path>>(value: &T, path: P) -> HealthResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

/// Markdown session report, one section per subject under its role's view.
pub fn generate_report<P: AsRef<Path>>(outcome: &SessionOutcome, output_dir: P) -> HealthResult<()> {
    let report_path = output_dir.as_ref().join("monitoring_report.md");
    std::fs::write(report_path, render_report(outcome))?;
    Ok(())
}

pub fn render_report(outcome: &SessionOutcome) -> String {
    let summary: &SessionSummary = &outcome.summary;
    let mut report = format!(
        r#"# Vital Signs Monitoring Report

## Session Overview
- **Subjects**: {}
- **Ticks**: {}
- **Repeat alerts suppressed**: {}

## Overall Risk
- Final mean: {:.1} (SD {:.1})
- Peak mean: {:.1} (SD {:.1})
"#,
        summary.n_subjects,
        summary.n_ticks,
        summary.suppressed_alerts,
        summary.risk.final_overall_mean,
        summary.risk.final_overall_sd,
        summary.risk.peak_overall_mean,
        summary.risk.peak_overall_sd,
    );

    for (timeline, subject) in outcome.timelines.iter().zip(&summary.subjects) {
        report.push_str(&format!(
            "\n## {} ({})\n_{}_\n\n",
            timeline.name, timeline.subject_id, timeline.role.view_title()
        ));

        if let Some(latest) = timeline.latest() {
            let r = &latest.reading;
            report.push_str(&format!(
                "- **Latest vitals**: HR {:.0} bpm, BP {:.0}/{:.0} mmHg, {:.1} °C, SpO2 {:.0}%\n",
                r.heart_rate, r.blood_pressure.systolic, r.blood_pressure.diastolic,
                r.temperature, r.oxygen_sat
            ));
            let heart_rates: Vec<f64> = timeline.ticks.iter().map(|t| t.reading.heart_rate).collect();
            if let Some(smoothed) = moving_average(&heart_rates, 5).last() {
                report.push_str(&format!("- **Heart rate, 5-reading average**: {:.1} bpm\n", smoothed));
            }
            report.push_str(&format!(
                "- **Risk**: overall {:.0}, cardiovascular {:.0}, respiratory {:.0}, metabolic {:.0} ({}, confidence {:.0}%)\n",
                latest.risk.overall, latest.risk.cardiovascular, latest.risk.respiratory,
                latest.risk.metabolic, latest.risk.trend, latest.risk.confidence
            ));
        }

        report.push_str(&format!(
            "- **Peak overall risk**: {:.0} (mean {:.1})\n- **Alerts delivered**: {} ({} critical)\n",
            subject.peak_overall, subject.mean_overall, subject.alerts, subject.critical_alerts
        ));

        let episodes: Vec<String> = [
            EpisodeKind::CardiacEvent,
            EpisodeKind::HypertensiveCrisis,
            EpisodeKind::RespiratoryDistress,
        ]
        .iter()
        .filter_map(|kind| {
            let p = subject.peak_episode_probability(*kind);
            (p > 0.0).then(|| format!("{} {:.0}%", kind, p * 100.0))
        })
        .collect();
        if !episodes.is_empty() {
            report.push_str(&format!("- **Peak episode risk**: {}\n", episodes.join(", ")));
        }
        if let Some(worst) = timeline.worst_episode() {
            report.push_str(&format!(
                "- **Most likely episode**: {} ({} severity, {}): {}\n",
                worst.episode_kind, worst.severity, worst.timeframe, worst.recommendations.join("; ")
            ));
        }

        if let Some(projection) = timeline.long_horizon.iter().find(|f| f.metric == Metric::Systolic) {
            let points: Vec<String> = projection.points.iter()
                .map(|p| format!("+{} ticks: {:.0}", p.step, p.value))
                .collect();
            report.push_str(&format!("- **Systolic projection**: {}\n", points.join(", ")));
        }

        for impact in &timeline.interventions {
            let deltas: Vec<String> = impact.impacts.iter()
                .map(|m| format!("{} {:.0} → {:.0}", m.metric, m.current, m.projected))
                .collect();
            report.push_str(&format!(
                "- _{}_ ({}): {}\n",
                impact.intervention, impact.timeframe, deltas.join(", ")
            ));
        }
    }

    report
}
