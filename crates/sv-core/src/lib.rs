//! sv-core: shared foundation for the surface vessel design crates.
//!
//! Contains:
//! - units (uom SI types + constructors, physical constants)
//! - numeric (Real + tolerances + float helpers)
//! - diagnostics (flags raised by empirical curves on degenerate input)
//! - error (shared error types)

pub mod diagnostics;
pub mod error;
pub mod numeric;
pub mod units;

pub use diagnostics::{Condition, Diagnostic, Flagged};
pub use error::{SvError, SvResult};
pub use numeric::*;
pub use units::*;
