//! Error types for mission integration.

use sv_core::SvError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MissionError {
    #[error("Invalid mission profile: loiter hours would be {loiter_hours:.2}")]
    InvalidMissionProfile { loiter_hours: f64 },

    #[error("Energy storage cannot charge: cruise surplus over loiter is {surplus_kw} kW")]
    StorageCannotCharge { surplus_kw: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(transparent)]
    Core(#[from] SvError),
}

pub type MissionResult<T> = Result<T, MissionError>;
