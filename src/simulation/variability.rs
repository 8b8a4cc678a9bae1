use rand_distr::{Distribution, Normal};
use crate::config::MetricProfile;
use crate::error::{HealthError, HealthResult};

/// Mean of a drifting profile after `tick` ticks.
pub fn drifted_mean(profile: &MetricProfile, tick: usize) -> f64 {
    profile.mean + profile.drift * tick as f64
}

/// Gaussian sample around `center`, clamped to the profile bounds.
pub fn sample_vital<R: rand::Rng>(
    center: f64,
    profile: &MetricProfile,
    rng: &mut R,
) -> HealthResult<f64> {
    let (lower, upper) = profile.bounds;
    if profile.sd <= 0.0 {
        return Ok(center.clamp(lower, upper));
    }

    let normal = Normal::new(center, profile.sd)
        .map_err(|e| HealthError::Random(e.to_string()))?;
    let value = normal.sample(rng);
    Ok(value.clamp(lower, upper))
}

/// Rounds to the precision a bedside monitor would display.
pub fn display_precision(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
