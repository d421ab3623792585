//! Campsite occupancy model on top of the event kernel.

pub mod admission;
pub mod arrivals;
pub mod config;
pub mod distributions;
pub mod experiment;
pub mod model;
pub mod statistics;

// Re-export commonly used types
pub use admission::{AdmissionState, GroupAdmission};
pub use arrivals::ArrivalGenerator;
pub use config::CampsiteConfig;
pub use experiment::ExperimentRunner;
pub use model::{CamperForm, Campsite, CampsiteWorld, Group, PerForm, SiteCategory};
pub use statistics::{AggregateResult, RunResult, Series, StatisticsCollector, UsageCategory};
