//! Design space exploration.
//!
//! A [`DesignSampler`] proposes design vectors inside a [`DesignSpace`]; the
//! [`Explorer`] evaluates them in parallel batches through the pipeline and
//! feeds results back to the sampler in proposal order.

pub mod error;
pub mod explorer;
pub mod rank;
pub mod sampler;
pub mod space;

pub use error::{ExploreError, ExploreResult};
pub use explorer::{Case, ExplorationStats, Exploration, Explorer};
pub use rank::{Objective, best_by, pareto_front};
pub use sampler::{
    DesignSampler, GridSampler, LatinHypercubeSampler, LocalSearchSampler, SamplerConfig,
    UniformSampler,
};
pub use space::{DesignSpace, SpaceKind, Variable};
