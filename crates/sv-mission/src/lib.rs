//! Powering, mission fuel and reliability estimation.
//!
//! Composes the resistance regression from `sv-curves` into brake power at a
//! given speed, then integrates a fixed mission profile into fuel load, MCR
//! and engine duty, optionally with flywheel energy storage covering loiter.

pub mod error;
pub mod mission;
pub mod powering;
pub mod reliability;

pub use error::{MissionError, MissionResult};
pub use mission::{MissionEstimate, MissionEstimator, MissionFuel, MissionLegs, MissionProfile};
pub use powering::{EfficiencyConfig, PoweringModel, PoweringResult, brake_power};
pub use reliability::{ReliabilityConfig, ReliabilityEstimate, failure_probability};
