//! Domain models with validation at construction
//!
//! Path input is validated when parsed into these types.
//! Invalid input returns ValidationError, not panic.

pub mod coordinate;
pub mod diagnostics;
pub mod studies;
pub mod validation;

pub use coordinate::Coordinate;
pub use diagnostics::{Diagnostics, DiagnosticsFailure, DiagnosticsReport};
pub use studies::{LocationDissociation, LocationStudies, TermDissociation, TermStudies};
pub use validation::ValidationError;
