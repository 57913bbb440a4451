//! Messages crossing thread boundaries.
//!
//! Submodules:
//! - [`pet`] – events sent by the workers to the coordination thread
//! - [`interaction`] – commands sent to the interaction worker
pub mod interaction;
pub mod pet;
