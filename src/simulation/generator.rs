use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use crate::config::SubjectConfig;
use crate::error::HealthResult;
use crate::models::{BloodPressure, Metric, Reading};
use super::variability::{display_precision, drifted_mean, sample_vital};

/// Source of synthetic readings. A sensor feed would replace this type.
pub struct VitalsGenerator {
    rng: StdRng,
    start: DateTime<Utc>,
    interval_ms: i64,
}

impl VitalsGenerator {
    pub fn new(seed: Option<u64>, start: DateTime<Utc>, interval_secs: f64) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let interval_ms = (interval_secs * 1000.0).round() as i64;

        Self { rng, start, interval_ms }
    }

    pub fn timestamp(&self, tick: usize) -> DateTime<Utc> {
        self.start + Duration::milliseconds(self.interval_ms.saturating_mul(tick as i64))
    }

    /// Produces the reading for `subject` at `tick`, every field present.
    pub fn next_reading(&mut self, subject: &SubjectConfig, tick: usize) -> HealthResult<Reading> {
        let profile = &subject.profile;
        let mut sample = |metric: Metric, decimals: i32| -> HealthResult<f64> {
            let metric_profile = profile.get(metric);
            let center = drifted_mean(metric_profile, tick);
            let value = sample_vital(center, metric_profile, &mut self.rng)?;
            Ok(display_precision(value, decimals))
        };

        let heart_rate = sample(Metric::HeartRate, 0)?;
        let systolic = sample(Metric::Systolic, 0)?;
        let diastolic = sample(Metric::Diastolic, 0)?;
        let temperature = sample(Metric::Temperature, 1)?;
        let oxygen_sat = sample(Metric::OxygenSaturation, 0)?;

        Ok(Reading {
            heart_rate,
            blood_pressure: BloodPressure { systolic, diastolic },
            temperature,
            oxygen_sat,
            timestamp: self.timestamp(tick),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_same_seed_same_readings() {
        let config = Config::default();
        let subject = &config.subjects[0];
        let mut a = VitalsGenerator::new(Some(11), start(), 5.0);
        let mut b = VitalsGenerator::new(Some(11), start(), 5.0);
        for tick in 0..10 {
            assert_eq!(a.next_reading(subject, tick).unwrap(), b.next_reading(subject, tick).unwrap());
        }
    }

    #[test]
    fn test_timestamps_advance_by_interval() {
        let config = Config::default();
        let mut generator = VitalsGenerator::new(Some(1), start(), 5.0);
        let reading = generator.next_reading(&config.subjects[0], 12).unwrap();
        assert_eq!(reading.timestamp, start() + Duration::seconds(60));
    }

    #[test]
    fn test_timestamp_past_i32_ticks() {
        let generator = VitalsGenerator::new(Some(1), start(), 5.0);
        let tick = i32::MAX as usize + 1;
        assert_eq!(generator.timestamp(tick), start() + Duration::seconds(5 * tick as i64));
    }

    #[test]
    fn test_readings_respect_profile_bounds() {
        let config = Config::default();
        let subject = &config.subjects[2];
        let mut generator = VitalsGenerator::new(Some(3), start(), 5.0);
        for tick in 0..200 {
            let reading = generator.next_reading(subject, tick).unwrap();
            assert!(reading.oxygen_sat <= 100.0 && reading.oxygen_sat >= 80.0);
            assert!(reading.temperature <= 41.0);
        }
    }
}
