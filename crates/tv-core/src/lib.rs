//! tv-core: shared foundation for thermovolt.
//!
//! Contains:
//! - units (uom SI types + constructors for the quantities we report)
//! - numeric (fixed-point integer helpers with truncating semantics)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

pub use error::{TvError, TvResult};
pub use numeric::*;
pub use units::*;
