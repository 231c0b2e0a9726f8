//! Shared functionality
//!
//! Geometry, source locations and the error types used by the other pixfont crates.
//!

pub mod errors;
pub mod location;
pub mod types;
