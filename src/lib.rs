//! Discrete-event simulation of campsite occupancy.
//!
//! [`core`] is a small cooperative process scheduler with capacity
//! resources; [`campsite`] builds the arrival and admission model on it
//! and averages repeated runs.

pub mod campsite;
pub mod core;

// Re-export commonly used types
pub use crate::campsite::{AggregateResult, CampsiteConfig, ExperimentRunner, RunResult};
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::process::{Context, Process, Suspend};
pub use crate::core::resources::{Acquire, Capacity, LevelResource, Resource, SlotResource};
pub use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
pub use crate::core::types::{ProcessId, SimTime};
