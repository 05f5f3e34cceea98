//! sv-pipeline: evaluation of one complete design vector.
//!
//! One evaluation runs the stages in dependency order:
//! resolve dimensions → hull form → powering → mission fuel → weight →
//! stability → reliability → feasibility.
//!
//! Evaluation never fails: stage failures are recorded as
//! [`InfeasibilityReason`]s on the returned [`EvaluatedDesign`].
//! [`PipelineError`] is reserved for configuration problems.

pub mod config;
pub mod design;
pub mod error;
pub mod evaluate;
pub mod feasibility;
pub mod stage;

pub use config::{PipelineConfig, WeightCurveKind};
pub use design::{DesignInput, DesignVector};
pub use error::{PipelineError, PipelineResult};
pub use evaluate::{EvaluatedDesign, Pipeline};
pub use feasibility::{FeasibilityConfig, InfeasibilityReason};
pub use stage::{Stage, StageEvent, StageOutcome};
