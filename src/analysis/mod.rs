pub mod stats;
pub mod baseline;
pub mod anomaly;
pub mod risk;
pub mod forecast;
pub mod episodes;
pub mod interventions;
pub mod recommend;

pub use baseline::BaselineStore;
pub use forecast::MetricForecast;
pub use interventions::{Intervention, InterventionImpact};
