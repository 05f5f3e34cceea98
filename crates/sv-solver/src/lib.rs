//! Dimension resolver for ratio-defined designs.
//!
//! Given L/B, B/T, T/L and Cb, finds absolute principal dimensions inside the
//! configured bounds where the estimated weight balances the displacement.
//! Two strategies are provided: a forward sweep over length accepting the
//! first balanced hull, and a projected Newton iteration on the relative
//! weight-displacement residual.

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod resolver;
pub mod sweep;

pub use error::{ResolveError, ResolveResult};
pub use newton::{NewtonConfig, NewtonResult, newton_solve};
pub use resolver::{
    DesignRatios, DimensionResolver, ResolveStrategy, ResolvedDimensions, ResolverConfig,
};
