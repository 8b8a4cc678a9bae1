use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use crate::error::{HealthError, HealthResult};
use crate::analysis::Intervention;
use crate::models::Metric;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    pub subjects: Vec<SubjectConfig>,
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default = "default_interventions")]
    pub interventions: Vec<String>,
}

fn default_interventions() -> Vec<String> {
    Intervention::ALL.iter().map(|i| i.key().to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub ticks: usize,
    pub tick_interval_secs: f64,   // Dashboard refresh, 3-10 s
    pub window_capacity: usize,    // Readings kept per subject
    pub alert_cooldown_ticks: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ticks: 60,
            tick_interval_secs: 5.0,
            window_capacity: 20,
            alert_cooldown_ticks: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    pub steps: usize,
    pub long_horizon: Vec<usize>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            steps: 3,
            long_horizon: vec![30, 60, 120],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Clinician,
    Caregiver,
}

impl Role {
    pub fn view_title(&self) -> &'static str {
        match self {
            Role::Patient => "My health overview",
            Role::Clinician => "Clinical monitoring view",
            Role::Caregiver => "Caregiver summary",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectConfig {
    pub id: String,
    pub name: String,
    #[serde(default = "default_role")]
    pub role: Role,
    pub profile: VitalProfile,
}

fn default_role() -> Role {
    Role::Patient
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalProfile {
    pub heart_rate: MetricProfile,
    pub systolic: MetricProfile,
    pub diastolic: MetricProfile,
    pub temperature: MetricProfile,
    pub oxygen_saturation: MetricProfile,
}

impl VitalProfile {
    pub fn get(&self, metric: Metric) -> &MetricProfile {
        match metric {
            Metric::HeartRate => &self.heart_rate,
            Metric::Systolic => &self.systolic,
            Metric::Diastolic => &self.diastolic,
            Metric::Temperature => &self.temperature,
            Metric::OxygenSaturation => &self.oxygen_saturation,
        }
    }

    pub fn resting_adult() -> Self {
        Self {
            heart_rate: MetricProfile::new(75.0, 4.0, 40.0, 180.0),
            systolic: MetricProfile::new(120.0, 5.0, 80.0, 220.0),
            diastolic: MetricProfile::new(80.0, 3.0, 50.0, 130.0),
            temperature: MetricProfile::new(36.8, 0.15, 35.0, 41.0),
            oxygen_saturation: MetricProfile::new(98.0, 0.6, 80.0, 100.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricProfile {
    pub mean: f64,
    pub sd: f64,               // Tick-to-tick noise
    #[serde(default)]
    pub drift: f64,            // Change of the mean per tick
    pub bounds: (f64, f64),    // Hard clamp on generated values
}

impl MetricProfile {
    pub fn new(mean: f64, sd: f64, lower: f64, upper: f64) -> Self {
        Self { mean, sd, drift: 0.0, bounds: (lower, upper) }
    }

    pub fn with_drift(mut self, drift: f64) -> Self {
        self.drift = drift;
        self
    }
}

impl Default for Config {
    /// Three demo subjects: stable, drifting hypertensive, declining respiratory.
    fn default() -> Self {
        let stable = VitalProfile::resting_adult();

        let mut hypertensive = VitalProfile::resting_adult();
        hypertensive.heart_rate = hypertensive.heart_rate.with_drift(0.3);
        hypertensive.systolic = MetricProfile::new(135.0, 6.0, 80.0, 220.0).with_drift(1.2);
        hypertensive.diastolic = MetricProfile::new(88.0, 3.0, 50.0, 130.0).with_drift(0.5);

        let mut respiratory = VitalProfile::resting_adult();
        respiratory.oxygen_saturation = MetricProfile::new(96.0, 0.5, 80.0, 100.0).with_drift(-0.15);
        respiratory.temperature = MetricProfile::new(37.2, 0.1, 35.0, 41.0).with_drift(0.03);
        respiratory.heart_rate = MetricProfile::new(82.0, 4.0, 40.0, 180.0).with_drift(0.4);

        Self {
            session: SessionConfig::default(),
            subjects: vec![
                SubjectConfig {
                    id: "p-001".to_string(),
                    name: "Stable patient".to_string(),
                    role: Role::Patient,
                    profile: stable,
                },
                SubjectConfig {
                    id: "p-002".to_string(),
                    name: "Hypertensive patient".to_string(),
                    role: Role::Clinician,
                    profile: hypertensive,
                },
                SubjectConfig {
                    id: "p-003".to_string(),
                    name: "Respiratory patient".to_string(),
                    role: Role::Caregiver,
                    profile: respiratory,
                },
            ],
            forecast: ForecastConfig::default(),
            interventions: default_interventions(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> HealthResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> HealthResult<()> {
        self.validate_session()?;

        if self.subjects.is_empty() {
            return Err(HealthError::InvalidConfig(
                "At least one subject must be specified".to_string()
            ));
        }

        let mut seen = HashSet::new();
        for subject in &self.subjects {
            if subject.id.trim().is_empty() {
                return Err(HealthError::InvalidConfig("Subject id must not be empty".to_string()));
            }
            if !seen.insert(subject.id.as_str()) {
                return Err(HealthError::InvalidConfig(
                    format!("Duplicate subject id: {}", subject.id)
                ));
            }
            self.validate_profile(subject)?;
        }

        for name in &self.interventions {
            name.parse::<Intervention>().map_err(HealthError::InvalidConfig)?;
        }

        if self.forecast.steps == 0 {
            return Err(HealthError::Validation(
                "Forecast steps must be at least 1".to_string()
            ));
        }

        Ok(())
    }

    fn validate_session(&self) -> HealthResult<()> {
        if self.session.ticks == 0 {
            return Err(HealthError::Validation("Tick count must be positive".to_string()));
        }
        if self.session.window_capacity < 3 {
            return Err(HealthError::Validation(
                "History window must hold at least 3 readings".to_string()
            ));
        }
        if !(self.session.tick_interval_secs >= 0.0) {
            return Err(HealthError::Validation(
                "Tick interval must be non-negative".to_string()
            ));
        }
        Ok(())
    }

    fn validate_profile(&self, subject: &SubjectConfig) -> HealthResult<()> {
        for metric in Metric::ALL {
            let profile = subject.profile.get(metric);
            let (lower, upper) = profile.bounds;

            if !(profile.sd >= 0.0) {
                return Err(HealthError::Validation(
                    format!("{}: {} sd must be non-negative", subject.id, metric)
                ));
            }
            if lower >= upper {
                return Err(HealthError::Validation(
                    format!("{}: {} lower bound must be below upper bound", subject.id, metric)
                ));
            }
            if profile.mean < lower || profile.mean > upper {
                return Err(HealthError::Validation(
                    format!("{}: {} mean {} outside bounds", subject.id, metric, profile.mean)
                ));
            }
        }
        Ok(())
    }
}
