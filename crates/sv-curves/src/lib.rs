//! Empirical curves for small naval vessels.
//!
//! Pure, stateless regressions taking principal dimensions and coefficients
//! and returning physical estimates:
//! - [`hull`]: displacement, wetted surface, depth
//! - [`resistance`]: Series 64 residuary resistance, table driven
//! - [`weights`]: Grubisic and Parsons weight breakdowns
//! - [`stability`]: transverse metacentric height
//! - [`storage`]: flywheel energy storage mass
//!
//! Inputs are plain [`Real`](sv_core::Real) in the unit named by the argument
//! (meters, tonnes, knots, kilowatts). Regressions that divide by quantities
//! which can vanish return [`Flagged`](sv_core::Flagged) values.

pub mod hull;
pub mod resistance;
pub mod stability;
pub mod storage;
pub mod weights;

pub use hull::{HullForm, displacement, estimate_depth, hull_form, volume, wetted_surface};
pub use resistance::{ResistanceBin, ResistanceEstimate, ResistanceTable, froude_number};
pub use stability::{StabilityEstimate, metacentric_height};
pub use storage::{energy_from_power, storage_mass};
pub use weights::{
    FuelAllowance, GrubisicWeights, ParsonsWeights, WeightBreakdown, WeightCurve, WeightInput,
    weight_estimate, weight_estimate_with_fuel,
};
